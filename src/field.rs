//! Flat-layout scalar fields on rectangular grids.
//!
//! Both the model grid coordinates and the atlas constituent planes are
//! stored this way. Layout: `data[j * nx + i]` for row j, column i.

/// A scalar field on a rectangular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Field2D {
    /// Field values, row-major.
    pub data: Vec<f64>,
    /// Number of rows.
    pub ny: usize,
    /// Number of columns.
    pub nx: usize,
}

impl Field2D {
    /// Create a field filled with zeros.
    pub fn zeros(ny: usize, nx: usize) -> Self {
        Self {
            data: vec![0.0; ny * nx],
            ny,
            nx,
        }
    }

    /// Create a field by evaluating `f(j, i)` at every cell.
    pub fn from_fn<F>(ny: usize, nx: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut field = Self::zeros(ny, nx);
        for j in 0..ny {
            for i in 0..nx {
                field.data[j * nx + i] = f(j, i);
            }
        }
        field
    }

    /// Get the value at row j, column i.
    #[inline]
    pub fn get(&self, j: usize, i: usize) -> f64 {
        self.data[j * self.nx + i]
    }

    /// Set the value at row j, column i.
    #[inline]
    pub fn set(&mut self, j: usize, i: usize, value: f64) {
        self.data[j * self.nx + i] = value;
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the field has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Count NaN cells.
    pub fn count_nans(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }

    /// Compare shapes and values within an absolute tolerance.
    ///
    /// NaN compares equal to NaN, so masked cells do not break equality.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        if self.ny != other.ny || self.nx != other.nx {
            return false;
        }
        self.data.iter().zip(&other.data).all(|(a, b)| {
            if a.is_nan() && b.is_nan() {
                true
            } else {
                (a - b).abs() <= tol
            }
        })
    }
}
