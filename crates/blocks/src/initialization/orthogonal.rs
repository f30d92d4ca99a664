use rand::RngCore;
use rand_distr::{Distribution, StandardNormal};

use super::{ensure_finite, matrix_dims, InitializationError, Initializer};
use crate::tensor::{DType, Shape, Tensor};

/// Columns whose norm falls below this after projection are treated as degenerate.
const DEGENERATE_NORM: f64 = 1e-10;

/// Random (semi-)orthogonal matrix scaled by `scale`.
///
/// A standard-normal matrix is orthonormalized with modified Gram-Schmidt, which yields the `Q`
/// factor of a QR decomposition whose `R` has a positive diagonal. For `rows >= cols` the
/// columns are orthonormal, otherwise the rows are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orthogonal {
    scale: f64,
}

impl Orthogonal {
    pub fn new(scale: f64) -> Result<Self, InitializationError> {
        ensure_finite("scale", scale)?;
        Ok(Self { scale })
    }
}

impl Default for Orthogonal {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Initializer for Orthogonal {
    fn generate_as(
        &self,
        rng: &mut dyn RngCore,
        shape: &Shape,
        dtype: DType,
    ) -> Result<Tensor, InitializationError> {
        let (rows, cols) = matrix_dims("orthogonal", shape)?;
        let (tall, narrow) = if rows >= cols { (rows, cols) } else { (cols, rows) };

        let mut basis: Vec<Vec<f64>> = Vec::with_capacity(narrow);
        for _ in 0..narrow {
            let mut column: Vec<f64> = (0..tall).map(|_| StandardNormal.sample(rng)).collect();
            // Second projection pass keeps the basis orthogonal in finite precision.
            for _ in 0..2 {
                for q in &basis {
                    let dot: f64 = q.iter().zip(&column).map(|(a, b)| a * b).sum();
                    for (c, qv) in column.iter_mut().zip(q) {
                        *c -= dot * qv;
                    }
                }
            }
            let norm = column.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm < DEGENERATE_NORM {
                return Err(InitializationError::InvalidParameter {
                    name: "norm",
                    value: norm,
                    reason: "sampled matrix is rank deficient",
                });
            }
            column.iter_mut().for_each(|v| *v /= norm);
            basis.push(column);
        }

        let mut values = vec![0.0; rows * cols];
        for (j, q) in basis.iter().enumerate() {
            for (i, &v) in q.iter().enumerate() {
                let (r, c) = if rows >= cols { (i, j) } else { (j, i) };
                values[r * cols + c] = v * self.scale;
            }
        }
        Ok(Tensor::from_f64(shape.clone(), values, dtype)?)
    }
}
