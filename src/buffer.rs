use itertools::Itertools;

use crate::errors::{Result, TileFormatError};

#[derive(Debug, Clone, PartialEq)]
pub struct Buffer<T, const ND: usize> {
    // Row-major
    data: Box<[T]>,
    shape: [usize; ND],
}

impl<T: Copy, const ND: usize> Buffer<T, ND> {
    pub fn new_filled(shape: [usize; ND], value: T) -> Self {
        Self {
            data: vec![value; shape.iter().product()].into_boxed_slice(),
            shape,
        }
    }
}

impl<T, const ND: usize> Buffer<T, ND> {
    pub fn from_vec(shape: [usize; ND], data: Vec<T>) -> Result<Self> {
        let expected = shape.iter().product();
        if data.len() != expected {
            Err(TileFormatError::BufferLength {
                shape: shape.to_vec(),
                expected,
                actual: data.len(),
            })?
        }
        Ok(Self {
            data: data.into_boxed_slice(),
            shape,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn shape(&self) -> [usize; ND] {
        self.shape
    }
}

impl<T, const ND: usize> AsRef<[T]> for Buffer<T, ND> {
    fn as_ref(&self) -> &[T] {
        &self.data
    }
}

impl<T> Buffer<T, 2> {
    /// Fills an (H, W) buffer from `(row, col)` positions.
    pub fn from_shape_fn(shape: [usize; 2], f: impl FnMut((usize, usize)) -> T) -> Self {
        let [height, width] = shape;
        let data = (0..height)
            .cartesian_product(0..width)
            .map(f)
            .collect();
        Self { data, shape }
    }
}

impl<T> Buffer<T, 3> {
    /// Contiguous (H, W) plane of channel `band`.
    pub fn band(&self, band: usize) -> &[T] {
        let [_, height, width] = self.shape;
        let plane = height * width;
        &self.data[band * plane..(band + 1) * plane]
    }
}
