//! Defines the scalar element trait implemented by host-side tensors.

use super::dtype::DType;

/// Trait describing numeric behaviour required by tensor storages.
///
/// Initializers sample in `f64` and convert into the storage element, so every implementation
/// must round-trip through `f64` and report the [`DType`] it is stored as.
pub trait StorageElement: Copy + Default + PartialEq + Send + Sync {
    /// Dtype tag for tensors backed by this element type.
    const DTYPE: DType;

    /// Converts from a 64-bit float into this element type.
    fn from_f64(v: f64) -> Self;
    /// Widens the element into a 64-bit float.
    fn to_f64(self) -> f64;
    /// Moves a typed vector into the matching [`Storage`] variant.
    fn into_storage(values: Vec<Self>) -> Storage;
    /// Borrows the storage as a typed slice when the dtype matches.
    fn view(storage: &Storage) -> Option<&[Self]>;
}

impl StorageElement for f32 {
    const DTYPE: DType = DType::F32;

    fn from_f64(v: f64) -> Self {
        v as f32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn into_storage(values: Vec<Self>) -> Storage {
        Storage::F32(values)
    }

    fn view(storage: &Storage) -> Option<&[Self]> {
        match storage {
            Storage::F32(values) => Some(values.as_slice()),
            _ => None,
        }
    }
}

impl StorageElement for f64 {
    const DTYPE: DType = DType::F64;

    fn from_f64(v: f64) -> Self {
        v
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn into_storage(values: Vec<Self>) -> Storage {
        Storage::F64(values)
    }

    fn view(storage: &Storage) -> Option<&[Self]> {
        match storage {
            Storage::F64(values) => Some(values.as_slice()),
            _ => None,
        }
    }
}

/// Typed backing buffer of a host tensor, one variant per [`DType`].
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl Storage {
    /// Builds a buffer of `dtype` by narrowing (or copying) `f64` values.
    pub fn from_f64(dtype: DType, values: Vec<f64>) -> Self {
        match dtype {
            DType::F32 => Storage::F32(values.into_iter().map(f32::from_f64).collect()),
            DType::F64 => Storage::F64(values),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            Storage::F32(_) => DType::F32,
            Storage::F64(_) => DType::F64,
        }
    }

    /// Reads element `index` widened to `f64`.
    pub fn get_f64(&self, index: usize) -> f64 {
        match self {
            Storage::F32(values) => values[index].to_f64(),
            Storage::F64(values) => values[index],
        }
    }

    /// Copies the buffer into a fresh `f64` vector.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Storage::F32(values) => values.iter().map(|v| v.to_f64()).collect(),
            Storage::F64(values) => values.clone(),
        }
    }
}
