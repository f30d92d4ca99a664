use std::sync::Arc;

use blocks::initialization::{Constant, IsotropicGaussian, Orthogonal};
use blocks::module::{Module, ParamVisitor, ParamVisitorMut, TensorRole};
use blocks::nn::{Activation, Linear, Mlp};
use blocks::params::{param_seed, InitializationPlan};
use blocks::tensor::{Shape, Tensor};

fn gaussian_plan(seed: u64) -> InitializationPlan {
    InitializationPlan::new(seed)
        .with_weights(Arc::new(IsotropicGaussian::new(0.0, 0.1).unwrap()))
        .with_biases(Arc::new(Constant::scalar(0.5)))
}

#[test]
fn plan_fills_every_parameter() {
    let mut mlp = Mlp::new(
        vec![Activation::Tanh, Activation::Softmax],
        &[4, 8, 3],
        true,
    )
    .unwrap();
    let records = gaussian_plan(1).apply(&mut mlp).unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "linear_0.bias",
            "linear_0.weight",
            "linear_1.bias",
            "linear_1.weight"
        ]
    );
    for record in &records {
        assert_eq!(record.seed, param_seed(1, &record.name).unwrap());
    }
    for layer in &mlp.layers {
        assert!(layer.weight.to_f64_vec().iter().any(|&v| v != 0.0));
        let bias = layer.bias.as_ref().unwrap();
        assert!(bias.to_f64_vec().iter().all(|&v| v == 0.5));
    }

    let out = mlp.apply(&Tensor::ones(Shape::new([2, 4]))).unwrap();
    for r in 0..2 {
        let sum: f64 = out.row(r).unwrap().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}

#[test]
fn plan_is_reproducible_and_seed_sensitive() {
    let build = || Mlp::new(vec![Activation::Identity], &[5, 5], false).unwrap();
    let (mut a, mut b, mut c) = (build(), build(), build());
    gaussian_plan(7).apply(&mut a).unwrap();
    gaussian_plan(7).apply(&mut b).unwrap();
    gaussian_plan(8).apply(&mut c).unwrap();
    assert_eq!(a.layers[0].weight, b.layers[0].weight);
    assert_ne!(a.layers[0].weight, c.layers[0].weight);
}

/// Visits the same two parameters as `Ordered`, in reverse order.
struct Reversed {
    first: Linear,
    second: Linear,
}

impl Module for Reversed {
    fn visit_params(&self, v: &mut ParamVisitor<'_>) -> anyhow::Result<()> {
        v.scoped("second", |v| self.second.visit_params(v))?;
        v.scoped("first", |v| self.first.visit_params(v))
    }

    fn visit_params_mut(&mut self, v: &mut ParamVisitorMut<'_>) -> anyhow::Result<()> {
        v.scoped("second", |v| self.second.visit_params_mut(v))?;
        v.scoped("first", |v| self.first.visit_params_mut(v))
    }
}

#[test]
fn values_do_not_depend_on_visit_order() {
    let mut forward = Mlp::new(
        vec![Activation::Identity, Activation::Identity],
        &[3, 3, 3],
        false,
    )
    .unwrap();
    let mut reversed = Reversed {
        first: Linear::new(3, 3, false).unwrap(),
        second: Linear::new(3, 3, false).unwrap(),
    };
    let plan = InitializationPlan::new(3).with_weights(Arc::new(Orthogonal::default()));
    plan.apply(&mut forward).unwrap();
    plan.apply(&mut reversed).unwrap();

    let mut expected = Linear::new(3, 3, false).unwrap();
    struct Named<'a>(&'a mut Linear);
    impl Module for Named<'_> {
        fn visit_params(&self, v: &mut ParamVisitor<'_>) -> anyhow::Result<()> {
            v.scoped("first", |v| self.0.visit_params(v))
        }
        fn visit_params_mut(&mut self, v: &mut ParamVisitorMut<'_>) -> anyhow::Result<()> {
            v.scoped("first", |v| self.0.visit_params_mut(v))
        }
    }
    plan.apply(&mut Named(&mut expected)).unwrap();
    assert_eq!(expected.weight, reversed.first.weight);
    assert_ne!(forward.layers[0].weight, reversed.first.weight);
}

#[test]
fn missing_bias_initializer_is_an_error() {
    let mut layer = Linear::new(2, 2, true).unwrap();
    let plan =
        InitializationPlan::new(0).with_weights(Arc::new(IsotropicGaussian::default()));
    let err = plan.apply(&mut layer).unwrap_err();
    assert!(err.to_string().contains("bias"), "{err}");
}

#[test]
fn layers_without_bias_need_no_bias_initializer() {
    let mut layer = Linear::new(2, 2, false).unwrap();
    let plan =
        InitializationPlan::new(0).with_weights(Arc::new(IsotropicGaussian::default()));
    let records = plan.apply(&mut layer).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].role, TensorRole::Weight);
}

struct Duplicated {
    a: Tensor,
    b: Tensor,
}

impl Module for Duplicated {
    fn visit_params(&self, v: &mut ParamVisitor<'_>) -> anyhow::Result<()> {
        v.param("w", TensorRole::Weight, &self.a)?;
        v.param("w", TensorRole::Weight, &self.b)
    }

    fn visit_params_mut(&mut self, v: &mut ParamVisitorMut<'_>) -> anyhow::Result<()> {
        v.param("w", TensorRole::Weight, &mut self.a)?;
        v.param("w", TensorRole::Weight, &mut self.b)
    }
}

#[test]
fn duplicate_names_are_rejected() {
    let mut module = Duplicated {
        a: Tensor::zeros(Shape::new([2])),
        b: Tensor::zeros(Shape::new([2])),
    };
    let err = gaussian_plan(0).apply(&mut module).unwrap_err();
    assert!(err.to_string().contains("duplicate"), "{err}");
}

#[test]
fn shape_errors_surface_with_parameter_name() {
    let mut layer = Linear::new(3, 2, false).unwrap();
    let plan = InitializationPlan::new(0).with_weights(Arc::new(Constant::new(vec![1.0, 2.0, 3.0])));
    let err = plan.apply(&mut layer).unwrap_err();
    assert!(err.to_string().contains("weight"), "{err}");
    assert!(err
        .downcast_ref::<blocks::InitializationError>()
        .is_some());
}
