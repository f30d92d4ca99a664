//! Element-wise non-linearities applied by host-side layers.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::tensor::Tensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Identity,
    Tanh,
    Logistic,
    Rectifier,
    /// Normalizes each row of a 2-D input into a probability distribution.
    Softmax,
}

impl Activation {
    pub fn apply(&self, input: &Tensor) -> Result<Tensor> {
        let mut out = input.clone();
        match self {
            Activation::Identity => {}
            Activation::Tanh => out.map_inplace(f64::tanh),
            Activation::Logistic => out.map_inplace(|x| 1.0 / (1.0 + (-x).exp())),
            Activation::Rectifier => out.map_inplace(|x| x.max(0.0)),
            Activation::Softmax => return softmax(input),
        }
        Ok(out)
    }
}

fn softmax(input: &Tensor) -> Result<Tensor> {
    let dims = input.shape().dims();
    ensure!(
        dims.len() == 2,
        "softmax expects 2D input, got shape {:?}",
        dims
    );
    let cols = dims[1];
    let mut values = input.to_f64_vec();
    for row in values.chunks_mut(cols.max(1)) {
        let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut sum = 0.0;
        for v in row.iter_mut() {
            *v = (*v - max).exp();
            sum += *v;
        }
        for v in row.iter_mut() {
            *v /= sum;
        }
    }
    Ok(Tensor::from_f64(
        input.shape().clone(),
        values,
        input.dtype(),
    )?)
}
