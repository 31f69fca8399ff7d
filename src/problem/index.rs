use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

use crate::types::*;

type IndexedPoint = GeomWithData<[f64; 2], u32>;

fn entry(points: &[Point], id: u32) -> IndexedPoint {
    GeomWithData::new(points[id as usize].as_array(), id)
}

/// Precomputed spatial lookups over the points of a support
pub struct SupportIndex {
    tree: RTree<IndexedPoint>,
}

impl SupportIndex {
    /// Bulk-load an R-tree over the points, tagged with their position
    pub fn new(points: &[Point]) -> Self {
        let entries = (0..points.len() as u32).map(|i| entry(points, i)).collect();
        SupportIndex {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Points inside the square window of the given radius (borders included), sorted by id
    pub fn within_window(&self, center: Point, radius: u32) -> Vec<PointId> {
        let r = radius as f64;
        let [cx, cy] = center.as_array();
        let envelope = AABB::from_corners([cx - r, cy - r], [cx + r, cy + r]);
        let mut found: Vec<PointId> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|entry| PointId::from_raw(entry.data))
            .collect();
        found.sort_unstable();
        found
    }

    /// The closest point accepted by `accept`, if any
    pub fn nearest_where(&self, center: Point, accept: impl Fn(PointId) -> bool) -> Option<PointId> {
        self.tree
            .nearest_neighbor_iter(&center.as_array())
            .map(|entry| PointId::from_raw(entry.data))
            .find(|&id| accept(id))
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }
}


/// An edge keyed by `(chebyshev distance, lower id, higher id)`.
pub type ChebyshevEdge = (i64, u32, u32);

/// R-tree whose points can be taken out and put back, for Chebyshev
/// closest-point queries against the points currently inside.
pub struct ChebyshevIndex<'a> {
    points: &'a [Point],
    tree: RTree<IndexedPoint>,
}

impl<'a> ChebyshevIndex<'a> {
    pub fn new(points: &'a [Point]) -> Self {
        let entries = (0..points.len() as u32).map(|i| entry(points, i)).collect();
        ChebyshevIndex {
            points,
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn remove(&mut self, id: u32) {
        self.tree.remove(&entry(self.points, id));
    }

    pub fn insert(&mut self, id: u32) {
        self.tree.insert(entry(self.points, id));
    }

    /// Lowers `best` to the smallest edge from `from` to a point in the index.
    ///
    /// Candidates come in Euclidean order, and the Chebyshev distance is at
    /// least the Euclidean one over sqrt(2), which ends the scan.
    pub fn lower_closest(&self, from: u32, best: &mut Option<ChebyshevEdge>) {
        let p = self.points[from as usize];
        for candidate in self.tree.nearest_neighbor_iter(&p.as_array()) {
            let to = candidate.data;
            let q = self.points[to as usize];
            if let Some((d, _, _)) = *best {
                let (dx, dy) = p.delta(q);
                if (dx as f64).hypot(dy as f64) > (d as f64 + 0.5) * std::f64::consts::SQRT_2 {
                    break;
                }
            }
            let edge = (p.chebyshev(q), from.min(to), from.max(to));
            if best.is_none_or(|b| edge < b) {
                *best = Some(edge);
            }
        }
    }
}
