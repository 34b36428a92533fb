//! Spin image histogram storage

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut2, Axis};
use serde::{Deserialize, Serialize};

/// A square 2D histogram describing the surface around an oriented point.
///
/// Rows run along the β axis (height along the reference normal, with row
/// `resolution / 2` at β = 0 and rows above it at positive β). Columns run
/// along the α axis (radial distance from the normal line), starting at
/// α = 0 in column 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinImage {
    grid: Array2<f64>,
}

impl SpinImage {
    /// Create an all-zero image with `resolution × resolution` bins
    pub fn zeros(resolution: usize) -> Self {
        Self {
            grid: Array2::zeros((resolution, resolution)),
        }
    }

    /// Wrap an existing square grid
    pub fn from_array(grid: Array2<f64>) -> Result<Self> {
        let (rows, cols) = grid.dim();
        if rows != cols {
            return Err(Error::InvalidInput(format!(
                "spin image grid must be square, got {}x{}",
                rows, cols
            )));
        }
        Ok(Self { grid })
    }

    /// Number of bins along each axis
    pub fn resolution(&self) -> usize {
        self.grid.nrows()
    }

    /// Value of bin (`row`, `col`), if in range
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.grid.get((row, col)).copied()
    }

    pub fn as_array(&self) -> ArrayView2<'_, f64> {
        self.grid.view()
    }

    pub fn as_array_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.grid.view_mut()
    }

    pub fn into_array(self) -> Array2<f64> {
        self.grid
    }

    /// Iterate over rows, top (largest β) first
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.grid.axis_iter(Axis(0))
    }

    /// Sum of all bins.
    ///
    /// Every accepted neighbor deposits a total weight of one, so this equals
    /// the number of contributing neighbors up to rounding.
    pub fn total_weight(&self) -> f64 {
        self.grid.sum()
    }

    /// Largest bin value, or 0 for an empty image
    pub fn max_value(&self) -> f64 {
        self.grid.iter().copied().fold(0.0, f64::max)
    }

    /// True when every bin is zero
    pub fn is_zero(&self) -> bool {
        self.grid.iter().all(|&v| v == 0.0)
    }

    /// Copy scaled so that all bins sum to one. An all-zero image stays zero.
    pub fn normalized(&self) -> Self {
        let total = self.total_weight();
        if total <= 0.0 {
            return self.clone();
        }
        Self {
            grid: &self.grid / total,
        }
    }

    /// Pearson correlation coefficient between two images of equal resolution.
    ///
    /// Returns a value in `[-1, 1]`, with 1 meaning the images are identical
    /// up to a positive linear scale. Returns 0 when either image is constant.
    pub fn correlation(&self, other: &SpinImage) -> Result<f64> {
        if self.grid.dim() != other.grid.dim() {
            return Err(Error::InvalidInput(format!(
                "cannot correlate spin images of resolution {} and {}",
                self.resolution(),
                other.resolution()
            )));
        }

        let n = self.grid.len() as f64;
        if n == 0.0 {
            return Ok(0.0);
        }

        let (mut sum_p, mut sum_q, mut sum_pq, mut sum_pp, mut sum_qq) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for (&p, &q) in self.grid.iter().zip(other.grid.iter()) {
            sum_p += p;
            sum_q += q;
            sum_pq += p * q;
            sum_pp += p * p;
            sum_qq += q * q;
        }

        let denominator = ((n * sum_pp - sum_p * sum_p) * (n * sum_qq - sum_q * sum_q)).sqrt();
        if !(denominator > 0.0) {
            return Ok(0.0);
        }

        Ok(((n * sum_pq - sum_p * sum_q) / denominator).clamp(-1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_zeros() {
        let image = SpinImage::zeros(4);
        assert_eq!(image.resolution(), 4);
        assert!(image.is_zero());
        assert_eq!(image.total_weight(), 0.0);
        assert_eq!(image.get(3, 3), Some(0.0));
        assert_eq!(image.get(4, 0), None);
    }

    #[test]
    fn test_from_array_rejects_non_square() {
        assert!(SpinImage::from_array(Array2::zeros((2, 3))).is_err());
        assert!(SpinImage::from_array(Array2::zeros((3, 3))).is_ok());
    }

    #[test]
    fn test_normalized() {
        let image = SpinImage::from_array(array![[1.0, 3.0], [0.0, 4.0]]).unwrap();
        let normalized = image.normalized();
        assert_relative_eq!(normalized.total_weight(), 1.0);
        assert_relative_eq!(normalized.get(1, 1).unwrap(), 0.5);
        assert_eq!(image.max_value(), 4.0);

        let empty = SpinImage::zeros(3);
        assert!(empty.normalized().is_zero());
    }

    #[test]
    fn test_correlation() {
        let a = SpinImage::from_array(array![[1.0, 0.0], [0.0, 2.0]]).unwrap();
        let scaled = SpinImage::from_array(array![[2.0, 0.0], [0.0, 4.0]]).unwrap();
        let inverted = SpinImage::from_array(array![[0.0, 2.0], [2.0, 0.0]]).unwrap();

        assert_relative_eq!(a.correlation(&a).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(a.correlation(&scaled).unwrap(), 1.0, epsilon = 1e-12);
        assert!(a.correlation(&inverted).unwrap() < 0.0);
    }

    #[test]
    fn test_correlation_constant_and_mismatch() {
        let a = SpinImage::from_array(array![[1.0, 0.0], [0.0, 2.0]]).unwrap();
        assert_eq!(a.correlation(&SpinImage::zeros(2)).unwrap(), 0.0);
        assert!(a.correlation(&SpinImage::zeros(3)).is_err());
    }

    #[test]
    fn test_rows_top_first() {
        let image = SpinImage::from_array(array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let first: Vec<f64> = image.rows().next().unwrap().to_vec();
        assert_eq!(first, vec![1.0, 2.0]);
    }
}
