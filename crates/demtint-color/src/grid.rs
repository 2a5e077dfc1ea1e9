//! Row-major 2-D grid.

use crate::{ColorError, Result};

/// A dense 2-D grid stored in row-major order.
///
/// For elevation data, row 0 is the northern edge and column 0 the western
/// edge, matching the layout of GeoTIFF rasters.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `fill`.
    pub fn new(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![fill; rows * cols],
        }
    }

    /// Keep every `stride`-th row and column, starting at the first.
    pub fn decimate(&self, stride: usize) -> Result<Self> {
        if stride == 0 {
            return Err(ColorError::InvalidStride(stride));
        }
        if stride == 1 {
            return Ok(self.clone());
        }

        let rows = self.rows.div_ceil(stride);
        let cols = self.cols.div_ceil(stride);
        let mut data = Vec::with_capacity(rows * cols);
        for r in (0..self.rows).step_by(stride) {
            let row = self.row(r);
            data.extend(row.iter().step_by(stride).cloned());
        }

        Ok(Self { rows, cols, data })
    }
}

impl<T> Grid<T> {
    /// Wrap a row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(ColorError::ShapeMismatch {
                expected_rows: rows,
                expected_cols: cols,
                detail: format!("{} cells", data.len()),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a grid from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(ColorError::ShapeMismatch {
                    expected_rows: n_rows,
                    expected_cols: n_cols,
                    detail: format!("row {} with {} columns", i, row.len()),
                });
            }
            data.extend(row);
        }

        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the cell at `(row, col)`, or `None` if out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Borrow one row.
    ///
    /// # Panics
    /// Panics if `row >= self.rows()`.
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// The underlying row-major buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Apply `f` to every cell, keeping the shape.
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}
