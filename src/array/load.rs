//! Array input from JSON
//!
//! Accepts a number, a boolean, or arbitrarily nested lists of them. Integers
//! stay integers unless any element is fractional.

use super::{ArrayError, NdArray, Scalar};
use serde_json::Value;
use std::path::Path;

impl NdArray {
    /// Parse a JSON document such as `[[1, 2], [3, 4]]`
    pub fn from_json_str(input: &str) -> Result<NdArray, ArrayError> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| ArrayError::InvalidInput(e.to_string()))?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> Result<NdArray, ArrayError> {
        let mut data = Vec::new();
        let shape = flatten(value, &mut data)?;
        NdArray::from_shape_vec(shape, data)
    }

    /// Read and parse a JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<NdArray> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read array file {}", path.display()))?;
        let array = NdArray::from_json_str(&contents)
            .with_context(|| format!("Failed to parse array file {}", path.display()))?;
        Ok(array)
    }
}

/// Push leaves onto `data` depth-first and return the shape of `value`
fn flatten(value: &Value, data: &mut Vec<Scalar>) -> Result<Vec<usize>, ArrayError> {
    match value {
        Value::Bool(b) => {
            data.push(Scalar::Bool(*b));
            Ok(Vec::new())
        }
        Value::Number(n) => {
            let scalar = match n.as_i64() {
                Some(i) => Scalar::Int(i),
                None => Scalar::Float(n.as_f64().ok_or_else(|| {
                    ArrayError::InvalidInput(format!("unrepresentable number {}", n))
                })?),
            };
            data.push(scalar);
            Ok(Vec::new())
        }
        Value::Array(items) => {
            let mut inner: Option<Vec<usize>> = None;
            for item in items {
                let shape = flatten(item, data)?;
                match &inner {
                    None => inner = Some(shape),
                    Some(expected) if *expected != shape => return Err(ArrayError::RaggedInput),
                    Some(_) => {}
                }
            }
            let mut shape = vec![items.len()];
            shape.extend(inner.unwrap_or_default());
            Ok(shape)
        }
        other => Err(ArrayError::InvalidInput(format!(
            "expected number, boolean or list, found {}",
            other
        ))),
    }
}
