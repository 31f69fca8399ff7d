use bytemuck::Pod;

/// Row-major dense matrix over a flat Vec.
#[derive(Debug, Clone)]
pub struct Matrix2<T> {
    pub data: Vec<T>,
    pub rows: usize,
    pub cols: usize,
}

/// N×M weights, one distribution per column.
pub type WeightMatrix = Matrix2<f64>;

impl<T: Clone> Matrix2<T> {
    pub fn new(rows: usize, cols: usize, init: T) -> Self {
        Self {
            data: vec![init; rows * cols],
            rows,
            cols,
        }
    }

    /// Wraps row-major data; `None` if the length is not `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == rows * cols).then_some(Self { data, rows, cols })
    }

    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.cols + col]
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.cols + col]
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = &T> + '_ {
        self.data[col..].iter().step_by(self.cols.max(1)).take(self.rows)
    }
}

impl<T: Pod> Matrix2<T> {
    /// Byte image of a column, usable as a map key for element types without `Eq`.
    pub fn column_bytes(&self, col: usize) -> Vec<u8> {
        let column: Vec<T> = self.column(col).copied().collect();
        bytemuck::cast_slice::<T, u8>(&column).to_vec()
    }
}

// Byte-wise comparison, so NaN payloads compare equal to themselves.
impl<T: Pod> PartialEq for Matrix2<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && bytemuck::cast_slice::<T, u8>(&self.data)
                == bytemuck::cast_slice::<T, u8>(&other.data)
    }
}

impl<T: Pod> Eq for Matrix2<T> {}
