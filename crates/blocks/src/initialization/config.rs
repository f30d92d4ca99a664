//! Serializable description of an initializer, for models configured from JSON.
//!
//! ```
//! use blocks::initialization::InitializerConfig;
//!
//! let config: InitializerConfig =
//!     serde_json::from_str(r#"{"kind": "uniform", "mean": 0.0, "width": 0.05}"#)?;
//! let init = config.build()?;
//! # let _ = init;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::sync::Arc;

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use super::{
    Constant, Identity, Initializer, IsotropicGaussian, Orthogonal, Sparse, SparseCount, Uniform,
};
use crate::tensor::{Shape, Tensor};

fn one() -> f64 {
    1.0
}

/// Value a [`Constant`] initializer broadcasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstantValue {
    Scalar(f64),
    Vector(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

impl ConstantValue {
    fn into_tensor(self) -> Result<Tensor> {
        match self {
            ConstantValue::Scalar(value) => Ok(Tensor::scalar(value)),
            ConstantValue::Vector(values) => Ok(Tensor::from(values)),
            ConstantValue::Matrix(rows) => {
                let width = rows.first().map(Vec::len).unwrap_or(0);
                ensure!(
                    rows.iter().all(|row| row.len() == width),
                    "constant matrix rows must all have length {width}"
                );
                let shape = Shape::new([rows.len(), width]);
                Ok(Tensor::from_vec(shape, rows.concat())?)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitializerConfig {
    Constant {
        value: ConstantValue,
    },
    IsotropicGaussian {
        #[serde(default)]
        mean: f64,
        #[serde(default = "one")]
        std: f64,
    },
    Uniform {
        #[serde(default)]
        mean: f64,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        std: Option<f64>,
    },
    Identity {
        #[serde(default = "one")]
        mult: f64,
    },
    Orthogonal {
        #[serde(default = "one")]
        scale: f64,
    },
    Sparse {
        num_init: SparseCount,
        weights_init: Box<InitializerConfig>,
        #[serde(default)]
        sparse_init: Option<Box<InitializerConfig>>,
    },
}

impl InitializerConfig {
    /// Validates the parameters and constructs the initializer.
    pub fn build(&self) -> Result<Arc<dyn Initializer>> {
        let init: Arc<dyn Initializer> = match self {
            InitializerConfig::Constant { value } => {
                Arc::new(Constant::new(value.clone().into_tensor()?))
            }
            InitializerConfig::IsotropicGaussian { mean, std } => {
                Arc::new(IsotropicGaussian::new(*mean, *std)?)
            }
            InitializerConfig::Uniform { mean, width, std } => {
                Arc::new(Uniform::new(*mean, *width, *std)?)
            }
            InitializerConfig::Identity { mult } => Arc::new(Identity::new(*mult)?),
            InitializerConfig::Orthogonal { scale } => Arc::new(Orthogonal::new(*scale)?),
            InitializerConfig::Sparse {
                num_init,
                weights_init,
                sparse_init,
            } => {
                let mut sparse = Sparse::new(*num_init, weights_init.build()?)?;
                if let Some(sparse_init) = sparse_init {
                    sparse = sparse.with_sparse_init(sparse_init.build()?);
                }
                Arc::new(sparse)
            }
        };
        Ok(init)
    }
}
