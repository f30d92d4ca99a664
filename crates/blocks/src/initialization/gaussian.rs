use rand::RngCore;
use rand_distr::{Distribution, Normal};

use super::{ensure_finite, InitializationError, Initializer};
use crate::tensor::{DType, Shape, Tensor};

/// Independent samples from `N(mean, std^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsotropicGaussian {
    mean: f64,
    std: f64,
}

impl IsotropicGaussian {
    pub fn new(mean: f64, std: f64) -> Result<Self, InitializationError> {
        ensure_finite("mean", mean)?;
        ensure_finite("std", std)?;
        if std < 0.0 {
            return Err(InitializationError::InvalidParameter {
                name: "std",
                value: std,
                reason: "must be non-negative",
            });
        }
        Ok(Self { mean, std })
    }

    /// Zero-mean Gaussian with the given standard deviation.
    pub fn with_std(std: f64) -> Result<Self, InitializationError> {
        Self::new(0.0, std)
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }
}

impl Default for IsotropicGaussian {
    fn default() -> Self {
        Self {
            mean: 0.0,
            std: 1.0,
        }
    }
}

impl Initializer for IsotropicGaussian {
    fn generate_as(
        &self,
        rng: &mut dyn RngCore,
        shape: &Shape,
        dtype: DType,
    ) -> Result<Tensor, InitializationError> {
        let normal = Normal::new(self.mean, self.std).map_err(|_| {
            InitializationError::InvalidParameter {
                name: "std",
                value: self.std,
                reason: "rejected by the normal distribution",
            }
        })?;
        let values: Vec<f64> = (0..shape.num_elements())
            .map(|_| normal.sample(rng))
            .collect();
        Ok(Tensor::from_f64(shape.clone(), values, dtype)?)
    }
}
