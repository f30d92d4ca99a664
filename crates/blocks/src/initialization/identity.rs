use rand::RngCore;

use super::{ensure_finite, matrix_dims, InitializationError, Initializer};
use crate::tensor::{DType, Shape, Tensor};

/// Scaled identity matrix; rectangular shapes get `mult` on the leading diagonal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Identity {
    mult: f64,
}

impl Identity {
    pub fn new(mult: f64) -> Result<Self, InitializationError> {
        ensure_finite("mult", mult)?;
        Ok(Self { mult })
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self { mult: 1.0 }
    }
}

impl Initializer for Identity {
    fn generate_as(
        &self,
        _rng: &mut dyn RngCore,
        shape: &Shape,
        dtype: DType,
    ) -> Result<Tensor, InitializationError> {
        let (rows, cols) = matrix_dims("identity", shape)?;
        let mut values = vec![0.0; rows * cols];
        for i in 0..rows.min(cols) {
            values[i * cols + i] = self.mult;
        }
        Ok(Tensor::from_f64(shape.clone(), values, dtype)?)
    }
}
