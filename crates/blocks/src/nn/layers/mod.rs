//! Host-side layers that own initializable parameters.

pub mod linear;
pub mod mlp;

pub use linear::Linear;
pub use mlp::Mlp;
