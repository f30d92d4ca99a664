use rand::RngCore;
use rand_distr::{Distribution, Uniform as UniformDistribution};

use super::{ensure_finite, InitializationError, Initializer};
use crate::tensor::{DType, Shape, Tensor};

/// Independent samples from `U[mean - width / 2, mean + width / 2)`.
///
/// The interval is given either by its width or by the standard deviation of the distribution,
/// in which case `width = std * sqrt(12)`. Exactly one of the two must be supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    mean: f64,
    width: f64,
}

impl Uniform {
    pub fn new(
        mean: f64,
        width: Option<f64>,
        std: Option<f64>,
    ) -> Result<Self, InitializationError> {
        ensure_finite("mean", mean)?;
        let width = match (width, std) {
            (Some(width), Some(std)) => {
                return Err(InitializationError::AmbiguousParameterization { width, std })
            }
            (None, None) => return Err(InitializationError::MissingParameterization),
            (Some(width), None) => width,
            (None, Some(std)) => {
                ensure_positive("std", std)?;
                std * 12f64.sqrt()
            }
        };
        ensure_positive("width", width)?;
        let half = width / 2.0;
        if !((mean - half).is_finite() && (mean + half).is_finite()) {
            return Err(InitializationError::InvalidParameter {
                name: "width",
                value: width,
                reason: "interval bounds overflow",
            });
        }
        if mean - half >= mean + half {
            return Err(InitializationError::InvalidParameter {
                name: "width",
                value: width,
                reason: "is too small to form an interval around the mean",
            });
        }
        Ok(Self { mean, width })
    }

    pub fn with_width(mean: f64, width: f64) -> Result<Self, InitializationError> {
        Self::new(mean, Some(width), None)
    }

    pub fn with_std(mean: f64, std: f64) -> Result<Self, InitializationError> {
        Self::new(mean, None, Some(std))
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Standard deviation implied by the width.
    pub fn std(&self) -> f64 {
        self.width / 12f64.sqrt()
    }
}

fn ensure_positive(name: &'static str, value: f64) -> Result<(), InitializationError> {
    ensure_finite(name, value)?;
    if value <= 0.0 {
        return Err(InitializationError::InvalidParameter {
            name,
            value,
            reason: "must be positive",
        });
    }
    Ok(())
}

impl Initializer for Uniform {
    /// Samples directly in the target precision so every value stays below the upper bound
    /// after storage.
    fn generate_as(
        &self,
        rng: &mut dyn RngCore,
        shape: &Shape,
        dtype: DType,
    ) -> Result<Tensor, InitializationError> {
        let half = self.width / 2.0;
        let (low, high) = (self.mean - half, self.mean + half);
        let len = shape.num_elements();
        match dtype {
            DType::F64 => {
                let uniform = UniformDistribution::new(low, high);
                let values: Vec<f64> = (0..len).map(|_| uniform.sample(rng)).collect();
                Ok(Tensor::from_vec(shape.clone(), values)?)
            }
            DType::F32 => {
                let (low, high) = (low as f32, high as f32);
                if !(low.is_finite() && high.is_finite() && low < high) {
                    return Err(InitializationError::InvalidParameter {
                        name: "width",
                        value: self.width,
                        reason: "does not form an interval in float32",
                    });
                }
                let uniform = UniformDistribution::new(low, high);
                let values: Vec<f32> = (0..len).map(|_| uniform.sample(rng)).collect();
                Ok(Tensor::from_vec(shape.clone(), values)?)
            }
        }
    }
}
