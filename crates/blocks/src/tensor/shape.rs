//! Lightweight wrapper for tensor shapes and dimension bookkeeping.

use thiserror::Error;

/// Stores the logical dimensions of a tensor.
///
/// A rank-0 shape describes a scalar and holds exactly one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

/// Failures raised while relating shapes to each other or to flat buffers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("cannot broadcast shape {from:?} to {to:?}")]
    Broadcast { from: Vec<usize>, to: Vec<usize> },
    #[error("shape {dims:?} holds {expected} elements, got {actual}")]
    ElementCount {
        dims: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("index {index:?} is out of bounds for shape {dims:?}")]
    IndexOutOfBounds { index: Vec<usize>, dims: Vec<usize> },
}

impl Shape {
    /// Constructs a new shape from the provided dimensions.
    pub fn new<D: Into<Vec<usize>>>(dims: D) -> Self {
        Shape { dims: dims.into() }
    }

    /// Rank-0 shape used by scalar tensors.
    pub fn scalar() -> Self {
        Shape { dims: Vec::new() }
    }

    /// Borrow the raw dimension slice for downstream calculations.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns the rank (number of axes) of the shape.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Computes the total number of elements implied by the shape.
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Row-major strides, in elements.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![0; self.dims.len()];
        let mut acc = 1;
        for (stride, dim) in strides.iter_mut().zip(self.dims.iter()).rev() {
            *stride = acc;
            acc *= dim;
        }
        strides
    }

    /// Flat row-major offset of a multi-index.
    pub fn offset(&self, index: &[usize]) -> Result<usize, ShapeError> {
        if index.len() != self.dims.len()
            || index.iter().zip(self.dims.iter()).any(|(i, d)| i >= d)
        {
            return Err(ShapeError::IndexOutOfBounds {
                index: index.to_vec(),
                dims: self.dims.clone(),
            });
        }
        Ok(index
            .iter()
            .zip(self.strides())
            .map(|(i, stride)| i * stride)
            .sum())
    }

    /// Strides that read `self`-shaped data as if it had shape `target`.
    ///
    /// Dimensions are aligned from the right. A source dimension of 1 (or a missing leading
    /// dimension) repeats along the target axis and gets stride 0.
    pub fn broadcast_strides(&self, target: &Shape) -> Result<Vec<usize>, ShapeError> {
        let err = || ShapeError::Broadcast {
            from: self.dims.clone(),
            to: target.dims.clone(),
        };
        if self.rank() > target.rank() {
            return Err(err());
        }
        let lead = target.rank() - self.rank();
        let own = self.strides();
        let mut strides = vec![0; target.rank()];
        for (axis, (&dim, &stride)) in self.dims.iter().zip(own.iter()).enumerate() {
            let target_dim = target.dims[lead + axis];
            if dim == target_dim {
                strides[lead + axis] = if dim == 1 { 0 } else { stride };
            } else if dim == 1 {
                strides[lead + axis] = 0;
            } else {
                return Err(err());
            }
        }
        Ok(strides)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::new(dims.to_vec())
    }
}
