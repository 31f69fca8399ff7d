use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::OnceLock;

use crate::error::InputError;
use crate::problem::index::SupportIndex;
use crate::problem::check_len;
use crate::types::*;

/// The set of grid cells shared by every distribution of a comparison.
///
/// Input coordinates may repeat; repeated cells collapse into one point and
/// their weights are summed when a distribution is built.
pub struct Support {
    /// Unique points, in order of first appearance.
    points: Vec<Point>,
    /// For each input position, the point it was merged into.
    input: Vec<PointId>,
    lookup: HashMap<Point, PointId>,
    index: OnceLock<SupportIndex>,
}

impl Support {
    /// Build a support from parallel coordinate arrays
    pub fn new(x: &[Coord], y: &[Coord]) -> Result<Self, InputError> {
        check_len("Y", x.len(), y.len())?;
        Self::from_points(x.iter().zip(y).map(|(&x, &y)| Point::new(x, y)))
    }

    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Result<Self, InputError> {
        let mut unique = Vec::new();
        let mut input = Vec::new();
        let mut lookup = HashMap::new();

        for p in points {
            let id = match lookup.entry(p) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    let id = PointId::from_index(unique.len())
                        .ok_or(InputError::TooManyPoints(unique.len() + 1))?;
                    unique.push(p);
                    *e.insert(id)
                }
            };
            input.push(id);
        }

        if input.is_empty() {
            return Err(InputError::EmptyInput);
        }

        Ok(Support {
            points: unique,
            input,
            lookup,
            index: OnceLock::new(),
        })
    }

    /// Number of distinct points.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: construction rejects empty input.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of coordinates the support was built from, duplicates included.
    #[inline(always)]
    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    #[inline(always)]
    pub fn point(&self, id: PointId) -> Point {
        self.points[id.index()]
    }

    #[inline(always)]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The point an input position was merged into.
    #[inline(always)]
    pub fn point_of_input(&self, position: usize) -> PointId {
        self.input[position]
    }

    #[inline(always)]
    pub fn find(&self, p: Point) -> Option<PointId> {
        self.lookup.get(&p).copied()
    }

    /// R-tree over the points, built on first use.
    pub fn index(&self) -> &SupportIndex {
        self.index.get_or_init(|| SupportIndex::new(&self.points))
    }

    /// Per-axis extent `(max x - min x, max y - min y)`.
    pub fn extent(&self) -> (i64, i64) {
        let (mut lo_x, mut lo_y) = (i64::MAX, i64::MAX);
        let (mut hi_x, mut hi_y) = (i64::MIN, i64::MIN);
        for p in &self.points {
            lo_x = lo_x.min(p.x as i64);
            hi_x = hi_x.max(p.x as i64);
            lo_y = lo_y.min(p.y as i64);
            hi_y = hi_y.max(p.y as i64);
        }
        (hi_x - lo_x, hi_y - lo_y)
    }

    /// Sum input weights onto the distinct points.
    pub(crate) fn aggregate(&self, weights: impl Iterator<Item = Mass>) -> Vec<Mass> {
        let mut merged = vec![0.0; self.points.len()];
        for (position, w) in weights.enumerate() {
            merged[self.input[position].index()] += w;
        }
        merged
    }
}
