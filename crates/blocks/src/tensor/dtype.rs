//! Enumerates the scalar element types host tensors can hold.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logical dtype identifier for host tensors and the process-wide floatX setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    /// 32-bit floating point following IEEE-754 semantics.
    #[serde(rename = "float32")]
    F32,
    /// 64-bit floating point following IEEE-754 semantics.
    #[serde(rename = "float64")]
    F64,
}

impl DType {
    /// Canonical lowercase name, matching the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            DType::F32 => "float32",
            DType::F64 => "float64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "float32" | "f32" => Ok(DType::F32),
            "float64" | "f64" => Ok(DType::F64),
            other => Err(format!("unsupported floating point dtype '{other}'")),
        }
    }
}
