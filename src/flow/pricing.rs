use std::cmp::Ordering;
use std::collections::VecDeque;

use rayon::prelude::*;

use crate::flow::network::FlowNetwork;
use crate::graph::{TransportGraph, Truncated};
use crate::types::*;

/// Universes at least this large are priced on the rayon pool.
const PARALLEL_PRICING_ARCS: usize = 1 << 16;

/// An arc offered to the restricted network.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Candidate {
    pub source: u32,
    pub target: u32,
    pub cost: Cost,
    /// Reduced cost under the potentials it was priced with.
    pub reduced: Cost,
}

impl Candidate {
    /// Most violated first; ties by source, then target.
    pub fn priority(&self, other: &Self) -> Ordering {
        self.reduced
            .total_cmp(&other.reduced)
            .then(self.source.cmp(&other.source))
            .then(self.target.cmp(&other.target))
    }
}

/// A feasible set of starting arcs together with the cost of a plan that uses only them.
#[derive(Debug, Clone)]
pub struct InitialBasis {
    pub arcs: Vec<Candidate>,
    pub bound: Cost,
}

/// The full set of arcs a network may use, enumerated or priced on demand.
pub trait ArcUniverse: Sync {
    /// Upper bound on the cost of any arc.
    fn max_cost(&self) -> Cost;

    /// Number of arcs.
    fn size(&self) -> usize;

    /// Nodes `0..sources()` are the only ones with outgoing arcs.
    fn sources(&self) -> usize;

    fn for_each_arc(&self, f: &mut dyn FnMut(Candidate));

    fn initial_basis(&self) -> InitialBasis;

    /// The most negative reduced cost arc leaving `source`, if below `-tolerance`.
    /// Ties go to the smallest target.
    fn best_arc(&self, source: NodeId, pi: &[Cost], tolerance: Cost) -> Option<Candidate>;
}

/// Best violated arc per source, sorted by priority and capped at `batch` (0 for no cap).
pub fn price<U: ArcUniverse>(
    universe: &U,
    pi: &[Cost],
    tolerance: Cost,
    batch: usize,
) -> Vec<Candidate> {
    let sources = universe.sources();
    let mut candidates: Vec<Candidate> = if universe.size() >= PARALLEL_PRICING_ARCS {
        (0..sources)
            .into_par_iter()
            .filter_map(|s| universe.best_arc(s, pi, tolerance))
            .collect()
    } else {
        (0..sources)
            .filter_map(|s| universe.best_arc(s, pi, tolerance))
            .collect()
    };

    candidates.sort_by(Candidate::priority);
    if batch > 0 {
        candidates.truncate(batch);
    }
    candidates
}

/// Keeps the better of two candidates under `Candidate::priority`.
#[inline(always)]
fn keep_best(best: &mut Option<Candidate>, c: Candidate) {
    match best {
        Some(b) if b.priority(&c) != Ordering::Greater => {}
        _ => *best = Some(c),
    }
}

/// Every supply node to every demand node, with costs computed from coordinates.
pub struct BipartiteArcs<'a, 's> {
    graph: &'a TransportGraph<'s>,
    network: &'a FlowNetwork,
}

impl<'a, 's> BipartiteArcs<'a, 's> {
    pub fn new(graph: &'a TransportGraph<'s>, network: &'a FlowNetwork) -> Self {
        BipartiteArcs { graph, network }
    }

    #[inline(always)]
    fn cost(&self, s: NodeId, t: NodeId) -> Cost {
        self.graph.cost(self.network.points[s], self.network.points[t])
    }

    fn candidate(&self, s: NodeId, t: NodeId) -> Candidate {
        Candidate {
            source: s as u32,
            target: t as u32,
            cost: self.cost(s, t),
            reduced: 0.0,
        }
    }

    /// North-west corner rule over both sides sorted by coordinate.
    fn north_west_corner(&self, arcs: &mut Vec<Candidate>) -> Cost {
        let support = self.graph.support();
        let net = self.network;
        let by_coordinate = |range: std::ops::Range<usize>| {
            let mut nodes: Vec<NodeId> = range.collect();
            nodes.sort_by_key(|&v| (support.point(net.points[v]), v));
            nodes
        };
        let senders = by_coordinate(0..net.n_supply);
        let receivers = by_coordinate(net.n_supply..net.len());

        let mut bound = 0.0;
        let (mut i, mut j) = (0, 0);
        let (mut left, mut right) = match (senders.first(), receivers.first()) {
            (Some(&s), Some(&t)) => (net.supply[s], -net.supply[t]),
            _ => return bound,
        };

        while i < senders.len() && j < receivers.len() {
            let (s, t) = (senders[i], receivers[j]);
            let arc = self.candidate(s, t);
            let moved = left.min(right);
            bound += moved * arc.cost;
            arcs.push(arc);
            left -= moved;
            right -= moved;
            if left <= right {
                i += 1;
                if let Some(&s) = senders.get(i) {
                    left = net.supply[s];
                }
            } else {
                j += 1;
                if let Some(&t) = receivers.get(j) {
                    right = -net.supply[t];
                }
            }
        }
        bound
    }
}

impl ArcUniverse for BipartiteArcs<'_, '_> {
    fn max_cost(&self) -> Cost {
        self.graph.max_cost()
    }

    fn size(&self) -> usize {
        self.network.n_supply * (self.network.len() - self.network.n_supply)
    }

    fn sources(&self) -> usize {
        self.network.n_supply
    }

    fn for_each_arc(&self, f: &mut dyn FnMut(Candidate)) {
        for s in 0..self.network.n_supply {
            for t in self.network.n_supply..self.network.len() {
                f(self.candidate(s, t));
            }
        }
    }

    /// North-west corner arcs plus, for every supply node, the arc to its nearest demand node.
    fn initial_basis(&self) -> InitialBasis {
        let mut arcs = Vec::new();
        let bound = self.north_west_corner(&mut arcs);

        let support = self.graph.support();
        let net = self.network;
        let mut demand_node = vec![None; support.len()];
        for t in net.n_supply..net.len() {
            demand_node[net.points[t].index()] = Some(t);
        }
        let index = support.index();
        for s in 0..net.n_supply {
            let nearest = index
                .nearest_where(support.point(net.points[s]), |p| demand_node[p.index()].is_some())
                .and_then(|p| demand_node[p.index()]);
            if let Some(t) = nearest {
                arcs.push(self.candidate(s, t));
            }
        }

        arcs.sort_by_key(|c| (c.source, c.target));
        arcs.dedup_by_key(|c| (c.source, c.target));
        InitialBasis { arcs, bound }
    }

    fn best_arc(&self, s: NodeId, pi: &[Cost], tolerance: Cost) -> Option<Candidate> {
        let mut best = None;
        let mut threshold = -tolerance;
        for t in self.network.n_supply..self.network.len() {
            let cost = self.cost(s, t);
            let reduced = cost + pi[s] - pi[t];
            if reduced < threshold {
                threshold = reduced;
                best = Some(Candidate {
                    source: s as u32,
                    target: t as u32,
                    cost,
                    reduced,
                });
            }
        }
        best
    }
}

/// The arcs of a truncated topology; nodes are support points.
pub struct ExplicitArcs<'a, 's> {
    graph: &'a TransportGraph<'s>,
    truncated: &'a Truncated,
    network: &'a FlowNetwork,
}

impl<'a, 's> ExplicitArcs<'a, 's> {
    pub fn new(
        graph: &'a TransportGraph<'s>,
        truncated: &'a Truncated,
        network: &'a FlowNetwork,
    ) -> Self {
        debug_assert_eq!(truncated.arcs.nodes(), network.len());
        ExplicitArcs {
            graph,
            truncated,
            network,
        }
    }

    fn edge_cost(&self, s: u32, t: u32) -> Cost {
        self.graph.cost(PointId::from_raw(s), PointId::from_raw(t))
    }

    /// Cost of the unique flow that routes the supplies over the spanning tree.
    fn tree_flow_cost(&self) -> Cost {
        let n = self.network.len();
        let mut adjacency: Vec<Vec<u32>> = vec![Vec::new(); n];
        for &(s, t) in &self.truncated.tree {
            adjacency[s as usize].push(t);
            adjacency[t as usize].push(s);
        }

        let mut parent = vec![u32::MAX; n];
        let mut order = Vec::with_capacity(n);
        let mut queue = VecDeque::new();
        let mut seen = vec![false; n];
        if n > 0 {
            seen[0] = true;
            queue.push_back(0u32);
        }
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &w in &adjacency[v as usize] {
                if !seen[w as usize] {
                    seen[w as usize] = true;
                    parent[w as usize] = v;
                    queue.push_back(w);
                }
            }
        }

        let mut subtree = self.network.supply.clone();
        let mut bound = 0.0;
        for &v in order.iter().rev() {
            let p = parent[v as usize];
            if p == u32::MAX {
                continue;
            }
            let carried = subtree[v as usize];
            bound += carried.abs() * self.edge_cost(v, p);
            subtree[p as usize] += carried;
        }
        bound
    }
}

impl ArcUniverse for ExplicitArcs<'_, '_> {
    fn max_cost(&self) -> Cost {
        self.truncated.arcs.max_cost()
    }

    fn size(&self) -> usize {
        self.truncated.arcs.len()
    }

    fn sources(&self) -> usize {
        self.truncated.arcs.nodes()
    }

    fn for_each_arc(&self, f: &mut dyn FnMut(Candidate)) {
        for (s, t, cost) in self.truncated.arcs.iter() {
            f(Candidate {
                source: s as u32,
                target: t as u32,
                cost,
                reduced: 0.0,
            });
        }
    }

    /// The spanning tree in both directions.
    fn initial_basis(&self) -> InitialBasis {
        let mut arcs = Vec::with_capacity(2 * self.truncated.tree.len());
        for &(s, t) in &self.truncated.tree {
            let cost = self.edge_cost(s, t);
            for (source, target) in [(s, t), (t, s)] {
                arcs.push(Candidate {
                    source,
                    target,
                    cost,
                    reduced: 0.0,
                });
            }
        }
        InitialBasis {
            arcs,
            bound: self.tree_flow_cost(),
        }
    }

    fn best_arc(&self, s: NodeId, pi: &[Cost], tolerance: Cost) -> Option<Candidate> {
        let arcs = &self.truncated.arcs;
        let mut best = None;
        for e in arcs.out_arcs(s) {
            let t = arcs.target(e);
            let cost = arcs.cost(e);
            let reduced = cost + pi[s] - pi[t];
            if reduced < -tolerance {
                keep_best(
                    &mut best,
                    Candidate {
                        source: s as u32,
                        target: t as u32,
                        cost,
                        reduced,
                    },
                );
            }
        }
        best
    }
}
