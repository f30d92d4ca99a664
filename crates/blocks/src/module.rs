use anyhow::{ensure, Result};

use crate::tensor::Tensor;

pub type VisitParamsFn<'a> = dyn FnMut(&str, TensorRole, &Tensor) -> Result<()> + 'a;
pub type VisitParamsMutFn<'a> = dyn FnMut(&str, TensorRole, &mut Tensor) -> Result<()> + 'a;

/// What a parameter is used for; initialization plans pick a scheme per role.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TensorRole {
    Weight,
    Bias,
}

fn check_segment(kind: &str, segment: &str) -> Result<()> {
    ensure!(!segment.is_empty(), "parameter {kind} must be non-empty");
    ensure!(
        !segment.contains('.'),
        "parameter {kind} must not contain '.', got '{segment}'"
    );
    ensure!(
        segment.is_ascii(),
        "parameter {kind} must be ASCII, got '{segment}'"
    );
    Ok(())
}

#[derive(Default)]
struct ParamPath {
    segments: Vec<String>,
    scratch: String,
}

impl ParamPath {
    fn push(&mut self, segment: &str) -> Result<()> {
        check_segment("path segments", segment)?;
        self.segments.push(segment.to_string());
        Ok(())
    }

    fn pop(&mut self) {
        let _ = self.segments.pop();
    }

    /// Dotted name of `leaf` under the current scope.
    fn join(&mut self, leaf: &str) -> Result<&str> {
        check_segment("leaf names", leaf)?;
        self.scratch.clear();
        for seg in &self.segments {
            self.scratch.push_str(seg);
            self.scratch.push('.');
        }
        self.scratch.push_str(leaf);
        Ok(self.scratch.as_str())
    }
}

pub struct ParamVisitor<'a> {
    path: ParamPath,
    f: &'a mut VisitParamsFn<'a>,
}

impl<'a> ParamVisitor<'a> {
    pub fn new(f: &'a mut VisitParamsFn<'a>) -> Self {
        Self {
            path: ParamPath::default(),
            f,
        }
    }

    pub fn scoped(
        &mut self,
        segment: &str,
        inner: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        self.path.push(segment)?;
        let out = inner(self);
        self.path.pop();
        out
    }

    pub fn param(&mut self, leaf: &str, role: TensorRole, tensor: &Tensor) -> Result<()> {
        let name = self.path.join(leaf)?;
        (self.f)(name, role, tensor)
    }
}

pub struct ParamVisitorMut<'a> {
    path: ParamPath,
    f: &'a mut VisitParamsMutFn<'a>,
}

impl<'a> ParamVisitorMut<'a> {
    pub fn new(f: &'a mut VisitParamsMutFn<'a>) -> Self {
        Self {
            path: ParamPath::default(),
            f,
        }
    }

    pub fn scoped(
        &mut self,
        segment: &str,
        inner: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        self.path.push(segment)?;
        let out = inner(self);
        self.path.pop();
        out
    }

    pub fn param(&mut self, leaf: &str, role: TensorRole, tensor: &mut Tensor) -> Result<()> {
        let name = self.path.join(leaf)?;
        (self.f)(name, role, tensor)
    }
}

/// A component owning named parameters.
pub trait Module {
    fn visit_params(&self, v: &mut ParamVisitor<'_>) -> Result<()>;
    fn visit_params_mut(&mut self, v: &mut ParamVisitorMut<'_>) -> Result<()>;

    /// Collects `(name, role)` for every parameter in visiting order.
    fn param_names(&self) -> Result<Vec<(String, TensorRole)>> {
        let mut names = Vec::new();
        let mut collect = |name: &str, role: TensorRole, _: &Tensor| -> Result<()> {
            names.push((name.to_string(), role));
            Ok(())
        };
        let mut visitor = ParamVisitor::new(&mut collect);
        self.visit_params(&mut visitor)?;
        Ok(names)
    }
}
