//! Shared types for backend configuration and graph buffers

use crate::error::{BackendError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Well-known backend names
///
/// The set is open-ended: a candidate order may contain names outside this
/// list, and the selector treats them like backends that failed to start.
pub mod names {
    /// Device-accelerated execution
    pub const ACCELERATED: &str = "accelerated";
    /// Portable precompiled execution
    pub const PORTABLE: &str = "portable";
    /// Pure software execution, always available
    pub const FALLBACK: &str = "fallback";
}

/// Per-backend configuration values, keyed by backend name
///
/// Values are opaque to the selection logic; each backend interprets its own
/// entry and ignores fields it does not understand. An absent entry means
/// backend defaults.
pub type BackendOptions = HashMap<String, serde_json::Value>;

/// Shared numeric buffer exposed by a loaded graph
///
/// Input buffers are written by the caller before `run`, output buffers are
/// read after. The buffer length is fixed by the graph descriptor at load
/// time; clones share the same storage.
#[derive(Clone)]
pub struct GraphBuffer {
    name: String,
    data: Arc<RwLock<Vec<f32>>>,
}

impl GraphBuffer {
    /// Create a zero-filled buffer of `len` elements
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            data: Arc::new(RwLock::new(vec![0.0; len])),
        }
    }

    /// Buffer name as declared in the graph descriptor
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of f32 elements
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Overwrite the buffer contents
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::BufferSizeMismatch`] if `values` does not
    /// match the buffer length.
    pub fn write(&self, values: &[f32]) -> Result<()> {
        let mut data = self.data.write();
        if values.len() != data.len() {
            return Err(BackendError::BufferSizeMismatch {
                expected: data.len(),
                actual: values.len(),
            });
        }
        data.copy_from_slice(values);
        Ok(())
    }

    /// Copy the buffer contents out
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.read().clone()
    }

    /// Read access to the underlying elements
    pub fn with_read<R>(&self, f: impl FnOnce(&[f32]) -> R) -> R {
        f(&self.data.read())
    }

    /// Mutable access to the underlying elements
    pub(crate) fn with_write<R>(&self, f: impl FnOnce(&mut [f32]) -> R) -> R {
        f(&mut self.data.write())
    }
}

impl std::fmt::Debug for GraphBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphBuffer")
            .field("name", &self.name)
            .field("len", &self.len())
            .finish()
    }
}
