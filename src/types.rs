pub type Coord = i32;
pub type Mass = f64;
pub type Cost = f64;

/// Index of a node in a flow network.
pub type NodeId = usize;

/// Index of an arc slot in an arc arena.
pub type ArcId = usize;

/// An integer grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    #[inline(always)]
    pub fn new(x: Coord, y: Coord) -> Self {
        Point { x, y }
    }

    /// Coordinate difference `other - self`, widened so it never overflows.
    #[inline(always)]
    pub fn delta(self, other: Point) -> (i64, i64) {
        (
            other.x as i64 - self.x as i64,
            other.y as i64 - self.y as i64,
        )
    }

    /// Largest absolute coordinate difference.
    #[inline(always)]
    pub fn chebyshev(self, other: Point) -> i64 {
        let (dx, dy) = self.delta(other);
        dx.abs().max(dy.abs())
    }

    /// Returns the point displaced by `(dx, dy)`, or `None` outside the `i32` range.
    pub fn offset(self, dx: i64, dy: i64) -> Option<Point> {
        let x = Coord::try_from(self.x as i64 + dx).ok()?;
        let y = Coord::try_from(self.y as i64 + dy).ok()?;
        Some(Point { x, y })
    }

    #[inline(always)]
    pub fn as_array(self) -> [f64; 2] {
        [self.x as f64, self.y as f64]
    }
}

/// Identifier of a point inside a `Support`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PointId(u32);

impl PointId {
    /// Returns None if the index does not fit the identifier range.
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(PointId)
    }

    #[inline(always)]
    pub fn from_raw(raw: u32) -> Self {
        PointId(raw)
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub fn raw(self) -> u32 {
        self.0
    }
}
