//! Core host tensor abstractions.
//!
//! The tensor module defines shapes, dtypes, the storage element trait, and the dense host
//! tensor that initializers write into and layers read from.

pub mod dtype;
mod host_tensor;
pub mod shape;
pub mod storage;

pub use dtype::DType;
pub use host_tensor::Tensor;
pub use shape::{Shape, ShapeError};
pub use storage::{Storage, StorageElement};
