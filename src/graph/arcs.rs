use std::ops::Range;

use crate::types::*;

/// Arena of directed arcs, sorted by source, with CSR adjacency.
#[derive(Debug, Clone, Default)]
pub struct ArcSet {
    source: Vec<u32>,
    target: Vec<u32>,
    cost: Vec<Cost>,
    /// `first_out[v]..first_out[v + 1]` are the arcs leaving `v`.
    first_out: Vec<u32>,
}

impl ArcSet {
    /// Builds the arena for `nodes` nodes. Parallel arcs keep the cheapest copy.
    pub fn from_arcs(nodes: usize, mut arcs: Vec<(u32, u32, Cost)>) -> Self {
        arcs.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)).then(a.2.total_cmp(&b.2)));
        arcs.dedup_by(|next, kept| next.0 == kept.0 && next.1 == kept.1);

        let mut set = ArcSet {
            source: Vec::with_capacity(arcs.len()),
            target: Vec::with_capacity(arcs.len()),
            cost: Vec::with_capacity(arcs.len()),
            first_out: vec![0; nodes + 1],
        };
        for (s, t, c) in arcs {
            set.first_out[s as usize + 1] += 1;
            set.source.push(s);
            set.target.push(t);
            set.cost.push(c);
        }
        for v in 0..nodes {
            set.first_out[v + 1] += set.first_out[v];
        }
        set
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.source.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    #[inline(always)]
    pub fn nodes(&self) -> usize {
        self.first_out.len().saturating_sub(1)
    }

    #[inline(always)]
    pub fn source(&self, arc: ArcId) -> NodeId {
        self.source[arc] as usize
    }

    #[inline(always)]
    pub fn target(&self, arc: ArcId) -> NodeId {
        self.target[arc] as usize
    }

    #[inline(always)]
    pub fn cost(&self, arc: ArcId) -> Cost {
        self.cost[arc]
    }

    /// Arcs leaving `node`, ordered by target.
    #[inline(always)]
    pub fn out_arcs(&self, node: NodeId) -> Range<ArcId> {
        self.first_out[node] as usize..self.first_out[node + 1] as usize
    }

    pub fn max_cost(&self) -> Cost {
        self.cost.iter().copied().fold(0.0, f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId, Cost)> + '_ {
        (0..self.len()).map(|e| (self.source(e), self.target(e), self.cost(e)))
    }
}
