use rand::prelude::*;
use serde::{Serialize, Deserialize};

use crate::data::feature_vector::FeatureVector;

/// Dense row-major matrix of `rows × cols` cells stored in one flat buffer.
///
/// The flat layout is what optimizers see: cell `(row, col)` lives at
/// `row * cols + col`, so a classifier's weight matrix and its gradient share
/// the same indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Uniform samples in [-scale, scale) drawn from `rng`.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, scale: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for cell in res.data.iter_mut() {
            *cell = (rng.gen::<f64>() * 2.0 - 1.0) * scale;
        }
        res
    }

    pub fn from_flat(rows: usize, cols: usize, data: Vec<f64>) -> Matrix {
        assert_eq!(data.len(), rows * cols, "flat buffer does not match {rows}x{cols}");
        Matrix { rows, cols, data }
    }

    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.index_of(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let i = self.index_of(row, col);
        self.data[i] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    /// Adds `factor * value` to cell `(row, index)` for every stored entry of
    /// the sparse vector.
    pub fn row_plus_sparse(&mut self, row: usize, fv: &FeatureVector, factor: f64) {
        let offset = row * self.cols;
        for (index, value) in fv.iter() {
            self.data[offset + index] += factor * value;
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}
