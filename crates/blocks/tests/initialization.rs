use blocks::config;
use blocks::initialization::{
    Constant, InitializationError, Initializer, IsotropicGaussian, Uniform,
};
use blocks::tensor::{Shape, Tensor};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn rng() -> StdRng {
    StdRng::seed_from_u64(20140120)
}

fn check_constant(init: Constant, shape: [usize; 2], expected: Vec<f64>) {
    let shape = Shape::new(shape);
    let generated = init.materialize(&shape).unwrap();
    assert_eq!(generated.dtype(), config::floatx());
    assert_eq!(generated.shape(), &shape);
    assert_eq!(generated.to_f64_vec(), expected);
}

#[test]
fn constant_scalar_fills_shape() {
    check_constant(Constant::scalar(5.0), [5, 5], vec![5.0; 25]);
}

#[test]
fn constant_vector_broadcasts_along_rows() {
    let expected: Vec<f64> = (0..7).flat_map(|_| [1.0, 2.0, 3.0]).collect();
    check_constant(Constant::new(vec![1.0, 2.0, 3.0]), [7, 3], expected);
}

#[test]
fn constant_column_broadcasts_along_columns() {
    let column = Tensor::from_vec(Shape::new([3, 1]), vec![1.0f64, 2.0, 3.0]).unwrap();
    check_constant(
        Constant::new(column),
        [3, 2],
        vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0],
    );
}

#[test]
fn constant_ignores_random_source() {
    let init = Constant::scalar(-2.0);
    let shape = Shape::new([3, 4]);
    let a = init.generate(&mut rng(), &shape).unwrap();
    let b = init.generate(&mut StdRng::seed_from_u64(1), &shape).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, init.materialize(&shape).unwrap());
}

fn check_gaussian(rng: &mut StdRng, mean: f64, std: f64, shape: [usize; 2]) {
    let shape = Shape::new(shape);
    let weights = IsotropicGaussian::new(mean, std)
        .unwrap()
        .generate(rng, &shape)
        .unwrap();
    assert_eq!(weights.shape(), &shape);
    assert_eq!(weights.dtype(), config::floatx());
    assert!(
        (weights.mean() - mean).abs() < 1e-2,
        "mean {} far from {}",
        weights.mean(),
        mean
    );
    assert!(
        (weights.std() - std).abs() < 1e-2,
        "std {} far from {}",
        weights.std(),
        std
    );
}

#[test]
fn gaussian_matches_configured_moments() {
    let mut rng = rng();
    check_gaussian(&mut rng, 0.0, 1.0, [500, 600]);
    check_gaussian(&mut rng, 5.0, 3.0, [600, 500]);
}

fn check_uniform(
    rng: &mut StdRng,
    mean: f64,
    width: Option<f64>,
    std: Option<f64>,
    shape: [usize; 2],
) {
    let shape = Shape::new(shape);
    let weights = Uniform::new(mean, width, std)
        .unwrap()
        .generate(rng, &shape)
        .unwrap();
    assert_eq!(weights.shape(), &shape);
    assert_eq!(weights.dtype(), config::floatx());
    assert!((weights.mean() - mean).abs() < 1e-2);
    let expected_std = match width {
        Some(width) => width / 12f64.sqrt(),
        None => std.unwrap(),
    };
    assert!(
        (weights.std() - expected_std).abs() < 1e-2,
        "std {} far from {}",
        weights.std(),
        expected_std
    );
}

#[test]
fn uniform_matches_configured_moments() {
    let mut rng = rng();
    check_uniform(&mut rng, 0.0, Some(0.05), None, [500, 600]);
    check_uniform(&mut rng, 0.0, None, Some(0.001), [600, 500]);
    check_uniform(&mut rng, 5.0, None, Some(0.004), [700, 300]);
}

#[test]
fn uniform_with_width_and_std_is_rejected() {
    let err = Uniform::new(0.0, Some(1.0), Some(1.0)).unwrap_err();
    assert!(matches!(
        err,
        InitializationError::AmbiguousParameterization { .. }
    ));
}

#[test]
fn initialize_overwrites_in_place() {
    let mut tensor = Tensor::zeros(Shape::new([16, 16]));
    let dtype = tensor.dtype();
    IsotropicGaussian::new(1.0, 0.5)
        .unwrap()
        .initialize(&mut tensor, &mut rng())
        .unwrap();
    assert_eq!(tensor.dtype(), dtype);
    assert_eq!(tensor.shape().dims(), &[16, 16]);
    assert!(tensor.to_f64_vec().iter().any(|&v| v != 0.0));
}

#[test]
fn initializers_are_object_safe() {
    let schemes: Vec<Box<dyn Initializer>> = vec![
        Box::new(Constant::scalar(0.0)),
        Box::new(IsotropicGaussian::default()),
        Box::new(Uniform::with_width(0.0, 1.0).unwrap()),
    ];
    let shape = Shape::new([2, 3]);
    for scheme in &schemes {
        let first = scheme.generate(&mut rng(), &shape).unwrap();
        let second = scheme.generate(&mut rng(), &shape).unwrap();
        assert_eq!(first, second, "{scheme:?} is not deterministic");
    }
}
