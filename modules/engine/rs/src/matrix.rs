use std::ops::{Index, IndexMut};

use derive_getters::Getters;
use derive_more::Constructor;
use eyre::{eyre, Result};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Default, Constructor)]
pub struct Dims {
    pub rows: usize,
    pub cols: usize,
}

impl Dims {
    pub fn size(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }
}

/// Dense row-major matrix addressed by (row, col).
#[derive(Clone, PartialEq, Debug, Getters)]
pub struct Matrix<T> {
    dims: Dims,
    #[getter(skip)]
    data: Vec<T>,
}

impl<T: Clone> Matrix<T> {
    /// Allocate a matrix filled with `value`. Fails instead of aborting when the allocation is not
    /// possible.
    pub fn filled(dims: Dims, value: T) -> Result<Self> {
        let size = dims
            .size()
            .ok_or_else(|| eyre!("Matrix dimensions overflow: {dims:?}"))?;

        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|err| eyre!("Failed to allocate a {dims:?} matrix: {err}"))?;
        data.resize(size, value);

        Ok(Self { dims, data })
    }
}

impl<T> Matrix<T> {
    pub fn rows(&self) -> usize {
        self.dims.rows
    }

    pub fn cols(&self) -> usize {
        self.dims.cols
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.dims.rows && col < self.dims.cols {
            Some(&self.data[row * self.dims.cols + col])
        } else {
            None
        }
    }

    #[inline(always)]
    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.dims.rows, "Row {row} is out of bounds for {:?}", self.dims);
        &self.data[row * self.dims.cols..(row + 1) * self.dims.cols]
    }

    #[inline(always)]
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        assert!(row < self.dims.rows, "Row {row} is out of bounds for {:?}", self.dims);
        &mut self.data[row * self.dims.cols..(row + 1) * self.dims.cols]
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(col < self.dims.cols, "Column {col} is out of bounds for {:?}", self.dims);
        &self.row(row)[col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline(always)]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(col < self.dims.cols, "Column {col} is out of bounds for {:?}", self.dims);
        &mut self.row_mut(row)[col]
    }
}
