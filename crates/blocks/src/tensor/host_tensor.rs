//! Host-backed tensor holding generated parameters, layer inputs, and test fixtures.

use super::dtype::DType;
use super::shape::{Shape, ShapeError};
use super::storage::{Storage, StorageElement};
use anyhow::{ensure, Result};

/// Dense row-major tensor stored in host memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    storage: Storage,
}

impl Tensor {
    /// Constructs a tensor from typed values, validating the length against the shape.
    pub fn from_vec<E: StorageElement>(shape: Shape, data: Vec<E>) -> Result<Self, ShapeError> {
        check_len(&shape, data.len())?;
        Ok(Tensor {
            shape,
            storage: E::into_storage(data),
        })
    }

    /// Constructs a tensor of `dtype` from `f64` values, narrowing when needed.
    pub fn from_f64(shape: Shape, data: Vec<f64>, dtype: DType) -> Result<Self, ShapeError> {
        check_len(&shape, data.len())?;
        Ok(Tensor {
            shape,
            storage: Storage::from_f64(dtype, data),
        })
    }

    /// Rank-0 `F64` tensor.
    pub fn scalar(value: f64) -> Self {
        Tensor {
            shape: Shape::scalar(),
            storage: Storage::F64(vec![value]),
        }
    }

    /// Returns a tensor of the requested shape and dtype filled with `value`.
    pub fn full(shape: Shape, value: f64, dtype: DType) -> Self {
        let len = shape.num_elements();
        Tensor {
            shape,
            storage: Storage::from_f64(dtype, vec![value; len]),
        }
    }

    /// Returns a zero-initialized tensor in the configured floatX dtype.
    pub fn zeros(shape: Shape) -> Self {
        Self::full(shape, 0.0, crate::config::floatx())
    }

    /// Returns a one-initialized tensor in the configured floatX dtype.
    pub fn ones(shape: Shape) -> Self {
        Self::full(shape, 1.0, crate::config::floatx())
    }

    /// Returns the total number of elements stored in the tensor.
    pub fn len(&self) -> usize {
        self.shape.num_elements()
    }

    /// Reports whether the tensor contains zero elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Provides access to the tensor shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the scalar dtype of the tensor payload.
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Borrows the typed data slice, panicking if the dtype differs.
    pub fn data<E: StorageElement>(&self) -> &[E] {
        match E::view(&self.storage) {
            Some(values) => values,
            None => panic!(
                "tensor data is stored as {}, not {}",
                self.dtype(),
                E::DTYPE
            ),
        }
    }

    /// Copies every element into an `f64` vector in row-major order.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.storage.to_f64_vec()
    }

    /// Returns a copy stored as `dtype`.
    pub fn cast(&self, dtype: DType) -> Tensor {
        if dtype == self.dtype() {
            return self.clone();
        }
        Tensor {
            shape: self.shape.clone(),
            storage: Storage::from_f64(dtype, self.to_f64_vec()),
        }
    }

    /// Reads one element, widened to `f64`.
    pub fn get(&self, index: &[usize]) -> Result<f64, ShapeError> {
        let offset = self.shape.offset(index)?;
        Ok(self.storage.get_f64(offset))
    }

    /// Applies a unary function in place over every scalar element.
    pub fn map_inplace<F>(&mut self, mut f: F)
    where
        F: FnMut(f64) -> f64,
    {
        match &mut self.storage {
            Storage::F32(values) => {
                for v in values {
                    *v = f32::from_f64(f(v.to_f64()));
                }
            }
            Storage::F64(values) => {
                for v in values {
                    *v = f(*v);
                }
            }
        }
    }

    /// Replaces the contents with `other`, which must have the same shape; the dtype of `self`
    /// is kept.
    pub fn assign(&mut self, other: &Tensor) -> Result<(), ShapeError> {
        if other.shape != self.shape {
            return Err(ShapeError::Broadcast {
                from: other.shape.dims().to_vec(),
                to: self.shape.dims().to_vec(),
            });
        }
        self.storage = Storage::from_f64(self.dtype(), other.to_f64_vec());
        Ok(())
    }

    /// Materializes the tensor repeated along `target`, following right-aligned broadcasting.
    pub fn broadcast_to(&self, target: &Shape) -> Result<Tensor, ShapeError> {
        let strides = self.shape.broadcast_strides(target)?;
        let dims = target.dims();
        let len = target.num_elements();
        let mut values = Vec::with_capacity(len);
        let mut index = vec![0usize; dims.len()];
        for _ in 0..len {
            let offset: usize = index.iter().zip(strides.iter()).map(|(i, s)| i * s).sum();
            values.push(self.storage.get_f64(offset));
            for axis in (0..dims.len()).rev() {
                index[axis] += 1;
                if index[axis] < dims[axis] {
                    break;
                }
                index[axis] = 0;
            }
        }
        Tensor::from_f64(target.clone(), values, self.dtype())
    }

    /// Arithmetic mean over all elements.
    pub fn mean(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        let values = self.to_f64_vec();
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Population standard deviation over all elements.
    pub fn std(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        let mean = self.mean();
        let values = self.to_f64_vec();
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
        var.sqrt()
    }

    /// Returns row `index` of a 2-D tensor.
    pub fn row(&self, index: usize) -> Result<Vec<f64>> {
        let (rows, cols) = self.matrix_dims()?;
        ensure!(index < rows, "row {index} out of range for {rows} rows");
        Ok((0..cols)
            .map(|c| self.storage.get_f64(index * cols + c))
            .collect())
    }

    /// Swaps the axes of a 2-D tensor.
    pub fn transpose(&self) -> Result<Tensor> {
        let (rows, cols) = self.matrix_dims()?;
        let src = self.to_f64_vec();
        let mut out = vec![0.0; rows * cols];
        for r in 0..rows {
            for c in 0..cols {
                out[c * rows + r] = src[r * cols + c];
            }
        }
        Ok(Tensor::from_f64(
            Shape::new([cols, rows]),
            out,
            self.dtype(),
        )?)
    }

    /// Matrix product of two 2-D tensors, accumulated in `f64` and stored as `self`'s dtype.
    pub fn matmul(&self, rhs: &Tensor) -> Result<Tensor> {
        let (m, k) = self.matrix_dims()?;
        let (k_rhs, n) = rhs.matrix_dims()?;
        ensure!(
            k == k_rhs,
            "matmul inner dimensions differ: {:?} x {:?}",
            self.shape.dims(),
            rhs.shape.dims()
        );
        let a = self.to_f64_vec();
        let b = rhs.to_f64_vec();
        let mut out = vec![0.0; m * n];
        for i in 0..m {
            for p in 0..k {
                let lhs = a[i * k + p];
                if lhs == 0.0 {
                    continue;
                }
                let row = &b[p * n..(p + 1) * n];
                for (dst, &value) in out[i * n..(i + 1) * n].iter_mut().zip(row) {
                    *dst += lhs * value;
                }
            }
        }
        Ok(Tensor::from_f64(Shape::new([m, n]), out, self.dtype())?)
    }

    fn matrix_dims(&self) -> Result<(usize, usize)> {
        ensure!(
            self.shape.rank() == 2,
            "expected a 2D tensor, got shape {:?}",
            self.shape.dims()
        );
        Ok((self.shape.dims()[0], self.shape.dims()[1]))
    }
}

impl From<f64> for Tensor {
    fn from(value: f64) -> Self {
        Tensor::scalar(value)
    }
}

impl From<Vec<f64>> for Tensor {
    /// Rank-1 `F64` tensor over `values`.
    fn from(values: Vec<f64>) -> Self {
        Tensor {
            shape: Shape::new([values.len()]),
            storage: Storage::F64(values),
        }
    }
}

fn check_len(shape: &Shape, actual: usize) -> Result<(), ShapeError> {
    let expected = shape.num_elements();
    if actual != expected {
        return Err(ShapeError::ElementCount {
            dims: shape.dims().to_vec(),
            expected,
            actual,
        });
    }
    Ok(())
}
