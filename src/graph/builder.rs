use log::debug;

use crate::config::GroundMetric;
use crate::graph::{ArcSet, Truncated};
use crate::problem::{ChebyshevEdge, ChebyshevIndex, Support};
use crate::types::*;
use crate::utils::DisjointSets;

/// Arcs between points within the square window of `radius`, both directions.
///
/// An arc is skipped when a support point sits on the first lattice step of
/// its direction, since the collinear path through it costs the same. When
/// the window graph falls apart, the edges of the Chebyshev minimum spanning
/// tree that are longer than the radius reconnect it.
pub(super) fn build_truncated(support: &Support, metric: GroundMetric, radius: u32) -> Truncated {
    let n = support.len();
    let index = support.index();

    let mut arcs = Vec::new();
    let mut pruned = 0;
    for (i, &p) in support.points().iter().enumerate() {
        for q_id in index.within_window(p, radius) {
            if q_id.index() == i {
                continue;
            }
            let (dx, dy) = p.delta(support.point(q_id));
            if has_intermediate(support, p, dx, dy) {
                pruned += 1;
                continue;
            }
            arcs.push((i as u32, q_id.raw(), metric.cost(dx, dy)));
        }
    }

    // Kruskal over the window edges gives the initial basis tree.
    let mut edges: Vec<(Cost, u32, u32)> = arcs
        .iter()
        .map(|&(s, t, c)| (c, s.min(t), s.max(t)))
        .collect();
    edges.sort_by(|a, b| a.0.total_cmp(&b.0).then((a.1, a.2).cmp(&(b.1, b.2))));

    let mut sets = DisjointSets::new(n);
    let mut tree = Vec::with_capacity(n.saturating_sub(1));
    for (_, s, t) in edges {
        if sets.union(s as usize, t as usize) {
            tree.push((s, t));
        }
    }

    let window_components = sets.components();
    let mut fallback = 0;
    let points = support.points();
    for (s, t) in bridge_components(points, &mut sets) {
        let (dx, dy) = points[s as usize].delta(points[t as usize]);
        let cost = metric.cost(dx, dy);
        arcs.push((s, t, cost));
        arcs.push((t, s, cost));
        tree.push((s, t));
        fallback += 1;
    }

    let arcs = ArcSet::from_arcs(n, arcs);
    debug!(
        "truncated graph: {} points, radius {}, {} arcs ({} pruned), {} window components, {} fallback edges",
        n,
        radius,
        arcs.len(),
        pruned,
        window_components,
        fallback
    );

    Truncated {
        radius,
        arcs,
        tree,
        fallback,
    }
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// True if `p + (dx, dy) / gcd(dx, dy)` is a support point other than the target.
fn has_intermediate(support: &Support, p: Point, dx: i64, dy: i64) -> bool {
    let g = gcd(dx.abs(), dy.abs());
    if g <= 1 {
        return false;
    }
    p.offset(dx / g, dy / g)
        .and_then(|step| support.find(step))
        .is_some()
}

/// Edges of the Chebyshev minimum spanning tree that join the sets of `sets`,
/// which must be the components of the graph of edges no longer than some
/// radius. Edges are ordered by `(distance, lower id, higher id)`, so the tree
/// is unique and its edges longer than the radius do not depend on it.
///
/// Borůvka rounds: each component but the largest is taken out of the index
/// in turn and its points ask for the closest point left, then every cheapest
/// edge is merged.
pub(super) fn bridge_components(points: &[Point], sets: &mut DisjointSets) -> Vec<(u32, u32)> {
    let mut bridges: Vec<ChebyshevEdge> = Vec::new();
    if sets.components() <= 1 {
        return Vec::new();
    }

    let mut index = ChebyshevIndex::new(points);
    while sets.components() > 1 {
        let mut members: Vec<(usize, u32)> = (0..points.len())
            .map(|i| (sets.find(i), i as u32))
            .collect();
        members.sort_unstable();

        // The largest component is left out: every other one still finds its
        // cheapest edge, and those are enough to shrink the forest.
        let components: Vec<&[(usize, u32)]> = members.chunk_by(|a, b| a.0 == b.0).collect();
        let largest = components
            .iter()
            .enumerate()
            .max_by_key(|&(k, c)| (c.len(), std::cmp::Reverse(k)))
            .map_or(0, |(k, _)| k);

        let mut cheapest = Vec::with_capacity(components.len());
        for (k, component) in components.into_iter().enumerate() {
            if k == largest {
                continue;
            }
            for &(_, i) in component {
                index.remove(i);
            }
            let mut best = None;
            for &(_, i) in component {
                index.lower_closest(i, &mut best);
            }
            for &(_, i) in component {
                index.insert(i);
            }
            cheapest.extend(best);
        }

        cheapest.sort_unstable();
        cheapest.dedup();
        for edge @ (_, s, t) in cheapest {
            if sets.union(s as usize, t as usize) {
                bridges.push(edge);
            }
        }
    }

    bridges.sort_unstable();
    debug!("{} bridge edges between window components", bridges.len());
    bridges.into_iter().map(|(_, s, t)| (s, t)).collect()
}
