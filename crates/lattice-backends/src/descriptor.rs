//! Graph descriptor format
//!
//! A graph artifact is a directory holding one descriptor per backend
//! (`graph_fallback.json`, `graph_portable.json`, ...) plus an optional
//! little-endian f32 weights file referenced by the descriptor. Each
//! descriptor declares the input/output buffers of the graph and the
//! precompiled op list to execute over them.

use crate::error::{BackendError, Result};
use serde::{Deserialize, Serialize};

/// Declared shape of one input or output buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferSpec {
    /// Buffer name, unique within the descriptor
    pub name: String,
    /// Number of f32 elements
    pub size: usize,
}

/// One precompiled elementwise operation
///
/// `input` indexes into the descriptor's input buffers, `output` into its
/// output buffers. The referenced buffers must have equal sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphOp {
    /// `out[i] = in[i]`
    Copy { input: usize, output: usize },
    /// `out[i] = in[i] * factor`
    Scale { input: usize, output: usize, factor: f32 },
    /// `out[i] = in[i] + amount`
    Offset { input: usize, output: usize, amount: f32 },
    /// `out[i] = max(in[i], 0)`
    Relu { input: usize, output: usize },
}

impl GraphOp {
    /// Input buffer index
    pub fn input(&self) -> usize {
        match *self {
            GraphOp::Copy { input, .. }
            | GraphOp::Scale { input, .. }
            | GraphOp::Offset { input, .. }
            | GraphOp::Relu { input, .. } => input,
        }
    }

    /// Output buffer index
    pub fn output(&self) -> usize {
        match *self {
            GraphOp::Copy { output, .. }
            | GraphOp::Scale { output, .. }
            | GraphOp::Offset { output, .. }
            | GraphOp::Relu { output, .. } => output,
        }
    }
}

/// Parsed graph descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDescriptor {
    /// Input buffer declarations
    pub inputs: Vec<BufferSpec>,
    /// Output buffer declarations
    pub outputs: Vec<BufferSpec>,
    /// Precompiled op list, executed in order
    #[serde(default)]
    pub ops: Vec<GraphOp>,
    /// Relative path of the sidecar weights file, if the graph has one
    #[serde(default)]
    pub weights: Option<String>,
}

impl GraphDescriptor {
    /// Descriptor file name for the given backend name
    pub fn file_name(backend_name: &str) -> String {
        format!("graph_{backend_name}.json")
    }

    /// Check that every op references existing buffers of matching sizes
    pub fn validate(&self) -> Result<()> {
        for (index, op) in self.ops.iter().enumerate() {
            let input = self.inputs.get(op.input()).ok_or_else(|| {
                BackendError::invalid_op(index, format!("input buffer {} out of range", op.input()))
            })?;
            let output = self.outputs.get(op.output()).ok_or_else(|| {
                BackendError::invalid_op(index, format!("output buffer {} out of range", op.output()))
            })?;
            if input.size != output.size {
                return Err(BackendError::invalid_op(
                    index,
                    format!(
                        "buffer size mismatch: input '{}' has {} elements, output '{}' has {}",
                        input.name, input.size, output.name, output.size
                    ),
                ));
            }
        }
        Ok(())
    }
}
