use rand::RngCore;

use super::{InitializationError, Initializer};
use crate::tensor::{DType, Shape, Tensor};

/// Fills the target with a fixed value, broadcasting arrays across the shape.
///
/// The value follows right-aligned broadcasting: a vector of length `n` repeats along the rows
/// of an `(m, n)` target, a column of shape `(n, 1)` repeats along the columns of `(n, m)`.
/// The random source is never read, so [`Constant::materialize`] works without one.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    value: Tensor,
}

impl Constant {
    pub fn new(value: impl Into<Tensor>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn scalar(value: f64) -> Self {
        Self::new(Tensor::scalar(value))
    }

    pub fn value(&self) -> &Tensor {
        &self.value
    }

    /// Broadcasts the value to `shape` in the configured floatX dtype.
    pub fn materialize(&self, shape: &Shape) -> Result<Tensor, InitializationError> {
        self.materialize_as(shape, crate::config::floatx())
    }

    pub fn materialize_as(&self, shape: &Shape, dtype: DType) -> Result<Tensor, InitializationError> {
        Ok(self.value.broadcast_to(shape)?.cast(dtype))
    }
}

impl Initializer for Constant {
    fn generate_as(
        &self,
        _rng: &mut dyn RngCore,
        shape: &Shape,
        dtype: DType,
    ) -> Result<Tensor, InitializationError> {
        self.materialize_as(shape, dtype)
    }
}
