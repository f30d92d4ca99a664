//! Multi-layer perceptron built from [`Linear`] layers.

use super::linear::Linear;
use crate::module::{Module, ParamVisitor, ParamVisitorMut};
use crate::nn::activations::Activation;
use crate::tensor::Tensor;
use anyhow::{ensure, Result};

/// Stack of `Linear -> activation` pairs.
#[derive(Debug, Clone)]
pub struct Mlp {
    pub layers: Vec<Linear>,
    pub activations: Vec<Activation>,
}

impl Mlp {
    /// `dims` lists the input dimension followed by every layer's output dimension, so it must
    /// hold one more entry than `activations`.
    pub fn new(activations: Vec<Activation>, dims: &[usize], use_bias: bool) -> Result<Self> {
        ensure!(!activations.is_empty(), "mlp needs at least one layer");
        ensure!(
            dims.len() == activations.len() + 1,
            "mlp with {} activations needs {} dims, got {:?}",
            activations.len(),
            activations.len() + 1,
            dims
        );
        let layers = dims
            .windows(2)
            .map(|pair| Linear::new(pair[0], pair[1], use_bias))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            layers,
            activations,
        })
    }

    pub fn input_dim(&self) -> usize {
        self.layers[0].input_dim()
    }

    pub fn output_dim(&self) -> usize {
        self.layers[self.layers.len() - 1].output_dim()
    }

    /// Runs every layer in order on a `[batch, input_dim]` input.
    pub fn apply(&self, input: &Tensor) -> Result<Tensor> {
        let mut hidden = input.clone();
        for (layer, activation) in self.layers.iter().zip(&self.activations) {
            hidden = activation.apply(&layer.apply(&hidden)?)?;
        }
        Ok(hidden)
    }
}

impl Module for Mlp {
    fn visit_params(&self, v: &mut ParamVisitor<'_>) -> Result<()> {
        for (i, layer) in self.layers.iter().enumerate() {
            v.scoped(&format!("linear_{i}"), |v| layer.visit_params(v))?;
        }
        Ok(())
    }

    fn visit_params_mut(&mut self, v: &mut ParamVisitorMut<'_>) -> Result<()> {
        for (i, layer) in self.layers.iter_mut().enumerate() {
            v.scoped(&format!("linear_{i}"), |v| layer.visit_params_mut(v))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Shape;

    #[test]
    fn dims_must_match_activations() {
        assert!(Mlp::new(vec![Activation::Tanh], &[3, 4, 5], true).is_err());
        assert!(Mlp::new(vec![], &[3], true).is_err());
    }

    #[test]
    fn param_names_follow_layers() {
        let mlp = Mlp::new(
            vec![Activation::Tanh, Activation::Identity],
            &[3, 4, 2],
            true,
        )
        .unwrap();
        let names: Vec<String> = mlp
            .param_names()
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec![
                "linear_0.weight",
                "linear_0.bias",
                "linear_1.weight",
                "linear_1.bias"
            ]
        );
    }

    #[test]
    fn zero_parameters_give_zero_output() {
        let mlp = Mlp::new(vec![Activation::Rectifier], &[3, 2], true).unwrap();
        let out = mlp.apply(&Tensor::ones(Shape::new([4, 3]))).unwrap();
        assert_eq!(out.shape().dims(), &[4, 2]);
        assert!(out.to_f64_vec().iter().all(|&v| v == 0.0));
    }
}
