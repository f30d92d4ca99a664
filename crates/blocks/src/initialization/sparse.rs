use std::sync::Arc;

use rand::seq::index;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::{matrix_dims, InitializationError, Initializer};
use crate::tensor::{DType, Shape, Tensor};

/// How many entries per row a [`Sparse`] initializer fills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SparseCount {
    /// A fixed number of entries.
    Exact(usize),
    /// A fraction of the row length in `(0, 1]`, rounded up.
    Fraction(f64),
}

impl SparseCount {
    fn resolve(self, row_len: usize) -> Result<usize, InitializationError> {
        let count = match self {
            SparseCount::Exact(count) => count,
            SparseCount::Fraction(fraction) => (fraction * row_len as f64).ceil() as usize,
        };
        if count > row_len {
            return Err(InitializationError::InvalidParameter {
                name: "num_init",
                value: count as f64,
                reason: "exceeds the number of columns",
            });
        }
        Ok(count)
    }
}

/// Fills `num_init` randomly chosen entries per row from `weights_init`.
///
/// The remaining entries are zero, or drawn from `sparse_init` when one is given. Positions
/// within a row are sampled uniformly without replacement.
#[derive(Debug, Clone)]
pub struct Sparse {
    num_init: SparseCount,
    weights_init: Arc<dyn Initializer>,
    sparse_init: Option<Arc<dyn Initializer>>,
}

impl Sparse {
    pub fn new(
        num_init: SparseCount,
        weights_init: Arc<dyn Initializer>,
    ) -> Result<Self, InitializationError> {
        if let SparseCount::Fraction(fraction) = num_init {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(InitializationError::InvalidParameter {
                    name: "num_init",
                    value: fraction,
                    reason: "fraction must lie in (0, 1]",
                });
            }
        }
        Ok(Self {
            num_init,
            weights_init,
            sparse_init: None,
        })
    }

    /// Uses `init` for the entries that are not selected instead of zeros.
    pub fn with_sparse_init(mut self, init: Arc<dyn Initializer>) -> Self {
        self.sparse_init = Some(init);
        self
    }

    pub fn num_init(&self) -> SparseCount {
        self.num_init
    }
}

impl Initializer for Sparse {
    fn generate_as(
        &self,
        rng: &mut dyn RngCore,
        shape: &Shape,
        dtype: DType,
    ) -> Result<Tensor, InitializationError> {
        let (rows, cols) = matrix_dims("sparse", shape)?;
        let count = self.num_init.resolve(cols)?;
        let mut values = match &self.sparse_init {
            Some(init) => init.generate_as(rng, shape, DType::F64)?.to_f64_vec(),
            None => vec![0.0; rows * cols],
        };
        let row_shape = Shape::new([count]);
        for row in 0..rows {
            let positions = index::sample(rng, cols, count);
            let picked = self.weights_init.generate_as(rng, &row_shape, DType::F64)?;
            for (col, value) in positions.iter().zip(picked.to_f64_vec()) {
                values[row * cols + col] = value;
            }
        }
        Ok(Tensor::from_f64(shape.clone(), values, dtype)?)
    }
}
