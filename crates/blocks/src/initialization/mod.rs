//! Parameter initialization schemes.
//!
//! An [`Initializer`] maps an explicit random source and a target shape to a freshly generated
//! [`Tensor`]. Initializers hold only their configuration: all randomness comes from the
//! `rng` argument, so the same seed and shape always produce the same array.
//!
//! ```
//! use blocks::initialization::{Initializer, IsotropicGaussian};
//! use blocks::tensor::Shape;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(2014);
//! let weights = IsotropicGaussian::new(0.0, 0.01)?.generate(&mut rng, &Shape::new([3, 4]))?;
//! assert_eq!(weights.shape().dims(), &[3, 4]);
//! # Ok::<(), blocks::initialization::InitializationError>(())
//! ```

pub mod config;
mod constant;
mod gaussian;
mod identity;
mod orthogonal;
mod sparse;
mod uniform;

use std::fmt;

use rand::RngCore;
use thiserror::Error;

use crate::tensor::{DType, Shape, ShapeError, Tensor};

pub use config::InitializerConfig;
pub use constant::Constant;
pub use gaussian::IsotropicGaussian;
pub use identity::Identity;
pub use orthogonal::Orthogonal;
pub use sparse::{Sparse, SparseCount};
pub use uniform::Uniform;

/// Errors raised while configuring an initializer or generating values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InitializationError {
    #[error("uniform initialization takes a width or a std, not both (width={width}, std={std})")]
    AmbiguousParameterization { width: f64, std: f64 },
    #[error("uniform initialization needs either a width or a std")]
    MissingParameterization,
    #[error("invalid {name} {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("{scheme} initialization requires a 2D shape, got {dims:?}")]
    UnsupportedRank {
        scheme: &'static str,
        dims: Vec<usize>,
    },
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// A stateless scheme producing parameter values from a random source and a shape.
pub trait Initializer: fmt::Debug + Send + Sync {
    /// Generates an array of `shape` stored as `dtype`.
    fn generate_as(
        &self,
        rng: &mut dyn RngCore,
        shape: &Shape,
        dtype: DType,
    ) -> Result<Tensor, InitializationError>;

    /// Generates an array of `shape` in the configured floatX dtype.
    fn generate(&self, rng: &mut dyn RngCore, shape: &Shape) -> Result<Tensor, InitializationError> {
        self.generate_as(rng, shape, crate::config::floatx())
    }

    /// Overwrites `tensor` with freshly generated values, keeping its shape and dtype.
    fn initialize(
        &self,
        tensor: &mut Tensor,
        rng: &mut dyn RngCore,
    ) -> Result<(), InitializationError> {
        let values = self.generate_as(rng, tensor.shape(), tensor.dtype())?;
        tensor.assign(&values)?;
        Ok(())
    }
}

pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<(), InitializationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InitializationError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

/// Returns `(rows, cols)` or an [`InitializationError::UnsupportedRank`] for `scheme`.
pub(crate) fn matrix_dims(
    scheme: &'static str,
    shape: &Shape,
) -> Result<(usize, usize), InitializationError> {
    match shape.dims() {
        &[rows, cols] => Ok((rows, cols)),
        dims => Err(InitializationError::UnsupportedRank {
            scheme,
            dims: dims.to_vec(),
        }),
    }
}
