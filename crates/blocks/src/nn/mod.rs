//! Neural network building blocks whose parameters are seeded by initialization plans.
//!
//! Layers hold their weights and biases in host tensors and expose them through
//! [`Module`](crate::module::Module), so a single
//! [`InitializationPlan`](crate::params::InitializationPlan) can fill a whole model.

pub mod activations;
pub mod layers;

pub use activations::Activation;
pub use layers::*;
