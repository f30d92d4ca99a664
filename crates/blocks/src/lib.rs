//! Toolbox for building machine learning models.
//!
//! The crate centres on [`initialization`]: stateless schemes that turn an explicit random
//! source and a target shape into a parameter array. Around it sit a host [`tensor`] type,
//! parameter-owning [`nn`] layers exposed through [`module::Module`], and
//! [`params::InitializationPlan`] to seed every parameter of a model at once.

pub mod config;
mod env;
pub mod initialization;
pub mod module;
pub mod nn;
pub mod params;
pub mod tensor;

pub use initialization::{InitializationError, Initializer};
pub use tensor::{DType, Shape, Tensor};

/// Package version, as published.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
