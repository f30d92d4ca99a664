//! Fully connected layer whose parameters live in host tensors.
//!
//! The layer is allocated with zero parameters; an
//! [`InitializationPlan`](crate::params::InitializationPlan) fills them before use.

use anyhow::{ensure, Result};

use crate::module::{Module, ParamVisitor, ParamVisitorMut, TensorRole};
use crate::tensor::{Shape, Tensor};

/// Fully connected layer `y = x W + b`.
#[derive(Debug, Clone)]
pub struct Linear {
    pub weight: Tensor,
    pub bias: Option<Tensor>,
}

impl Linear {
    /// Allocates a zero `[input_dim, output_dim]` weight and optional `[output_dim]` bias in the
    /// configured floatX dtype.
    pub fn new(input_dim: usize, output_dim: usize, use_bias: bool) -> Result<Self> {
        ensure!(
            input_dim > 0 && output_dim > 0,
            "linear dims must be positive, got {input_dim}x{output_dim}"
        );
        let weight = Tensor::zeros(Shape::new([input_dim, output_dim]));
        let bias = use_bias.then(|| Tensor::zeros(Shape::new([output_dim])));
        Ok(Self { weight, bias })
    }

    /// Wraps existing parameters, validating that they fit together.
    pub fn from_tensors(weight: Tensor, bias: Option<Tensor>) -> Result<Self> {
        let weight_dims = weight.shape().dims();
        ensure!(
            weight_dims.len() == 2,
            "linear weight must be 2D, got {:?}",
            weight_dims
        );
        if let Some(bias) = &bias {
            ensure!(
                bias.shape().dims() == [weight_dims[1]],
                "linear bias shape {:?} does not match output dim {}",
                bias.shape().dims(),
                weight_dims[1]
            );
        }
        Ok(Self { weight, bias })
    }

    pub fn input_dim(&self) -> usize {
        self.weight.shape().dims()[0]
    }

    pub fn output_dim(&self) -> usize {
        self.weight.shape().dims()[1]
    }

    /// Projects a `[batch, input_dim]` input to `[batch, output_dim]`.
    pub fn apply(&self, input: &Tensor) -> Result<Tensor> {
        let dims = input.shape().dims();
        ensure!(
            dims.len() == 2,
            "linear expects 2D input, got shape {:?}",
            dims
        );
        ensure!(
            dims[1] == self.input_dim(),
            "input features ({}) must match weight rows ({})",
            dims[1],
            self.input_dim()
        );

        let mut output = input.matmul(&self.weight)?;
        if let Some(bias) = &self.bias {
            let bias = bias.broadcast_to(output.shape())?;
            let summed: Vec<f64> = output
                .to_f64_vec()
                .iter()
                .zip(bias.to_f64_vec())
                .map(|(y, b)| y + b)
                .collect();
            output = Tensor::from_f64(output.shape().clone(), summed, output.dtype())?;
        }
        Ok(output)
    }
}

impl Module for Linear {
    fn visit_params(&self, v: &mut ParamVisitor<'_>) -> Result<()> {
        v.param("weight", TensorRole::Weight, &self.weight)?;
        if let Some(bias) = &self.bias {
            v.param("bias", TensorRole::Bias, bias)?;
        }
        Ok(())
    }

    fn visit_params_mut(&mut self, v: &mut ParamVisitorMut<'_>) -> Result<()> {
        v.param("weight", TensorRole::Weight, &mut self.weight)?;
        if let Some(bias) = &mut self.bias {
            v.param("bias", TensorRole::Bias, bias)?;
        }
        Ok(())
    }
}
