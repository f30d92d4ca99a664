use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{anyhow, ensure, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::initialization::Initializer;
use crate::module::{Module, ParamVisitorMut, TensorRole};
use crate::tensor::Tensor;

/// Derives the RNG seed for parameter `name` from a base seed.
///
/// The seed depends only on `(seed, name)`, so a parameter receives the same values no matter
/// in which order a module visits its parameters.
pub fn param_seed(seed: u64, name: &str) -> Result<u64> {
    ensure!(name.is_ascii(), "param name must be ASCII, got '{name}'");
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"blocks:param-seed:v1");
    hasher.update(&seed.to_le_bytes());
    hasher.update(name.as_bytes());
    let hash = hasher.finalize();
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&hash.as_bytes()[..8]);
    Ok(u64::from_le_bytes(raw))
}

/// Record of one parameter written by [`InitializationPlan::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitializedParam {
    pub name: String,
    pub role: TensorRole,
    pub seed: u64,
}

/// Assigns an initializer to every parameter role and seeds each parameter independently.
#[derive(Clone, Debug)]
pub struct InitializationPlan {
    seed: u64,
    weights_init: Option<Arc<dyn Initializer>>,
    biases_init: Option<Arc<dyn Initializer>>,
}

impl Default for InitializationPlan {
    fn default() -> Self {
        Self::new(crate::config::default_seed())
    }
}

impl InitializationPlan {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            weights_init: None,
            biases_init: None,
        }
    }

    pub fn with_weights(mut self, init: Arc<dyn Initializer>) -> Self {
        self.weights_init = Some(init);
        self
    }

    pub fn with_biases(mut self, init: Arc<dyn Initializer>) -> Self {
        self.biases_init = Some(init);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn initializer_for(&self, role: TensorRole) -> Option<&Arc<dyn Initializer>> {
        match role {
            TensorRole::Weight => self.weights_init.as_ref(),
            TensorRole::Bias => self.biases_init.as_ref(),
        }
    }

    /// Regenerates every parameter of `module` in place.
    ///
    /// Fails on duplicate parameter names and on parameters whose role has no initializer.
    /// The returned records are sorted by name.
    pub fn apply<M: Module + ?Sized>(&self, module: &mut M) -> Result<Vec<InitializedParam>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut initialized: Vec<InitializedParam> = Vec::new();

        let mut init_one = |name: &str, role: TensorRole, tensor: &mut Tensor| -> Result<()> {
            ensure!(
                seen.insert(name.to_string()),
                "duplicate parameter name '{name}'"
            );
            let init = self
                .initializer_for(role)
                .ok_or_else(|| anyhow!("no initializer configured for {role:?} parameter '{name}'"))?;
            let seed = param_seed(self.seed, name)?;
            let mut rng = StdRng::seed_from_u64(seed);
            init.initialize(tensor, &mut rng)
                .with_context(|| format!("initializing '{name}'"))?;
            tracing::debug!(
                param = name,
                ?role,
                shape = ?tensor.shape().dims(),
                seed,
                "initialized parameter"
            );
            initialized.push(InitializedParam {
                name: name.to_string(),
                role,
                seed,
            });
            Ok(())
        };

        let mut visitor = ParamVisitorMut::new(&mut init_one);
        module.visit_params_mut(&mut visitor)?;
        initialized.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(initialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_depend_on_name_and_base() {
        let a = param_seed(1, "linear_0.weight").unwrap();
        assert_eq!(a, param_seed(1, "linear_0.weight").unwrap());
        assert_ne!(a, param_seed(1, "linear_1.weight").unwrap());
        assert_ne!(a, param_seed(2, "linear_0.weight").unwrap());
        assert!(param_seed(1, "poids_é").is_err());
    }
}
