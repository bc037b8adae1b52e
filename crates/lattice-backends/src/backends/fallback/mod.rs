//! Pure software fallback backend
//!
//! Reference implementation of the [`Backend`] trait. Initialization never
//! fails, which is what makes it suitable as the guaranteed last candidate
//! in a selection order. Graphs are interpreted op by op on every `run`.

use crate::backend::{names, Backend, GraphBuffer, GraphRunner};
use crate::backends::common::{execute_ops, load_graph, LoadedGraph, DEFAULT_CHUNK_SIZE};
use crate::error::{BackendError, Result};
use std::path::Path;

/// Reads the `chunk_size` field out of an opaque backend options value,
/// ignoring anything else the caller put there
pub(crate) fn chunk_size_from_options(options: Option<&serde_json::Value>) -> usize {
    options
        .and_then(|value| value.get("chunk_size"))
        .and_then(|value| value.as_u64())
        .map(|value| value as usize)
        .filter(|&value| value > 0)
        .unwrap_or(DEFAULT_CHUNK_SIZE)
}

/// Pure software backend, always available
pub struct FallbackBackend {
    chunk_size: usize,
}

impl FallbackBackend {
    /// Create a fallback backend from its opaque options entry
    ///
    /// Recognized options: `{"chunk_size": <bytes>}` for weight streaming.
    pub fn new(options: Option<&serde_json::Value>) -> Self {
        Self {
            chunk_size: chunk_size_from_options(options),
        }
    }
}

impl Backend for FallbackBackend {
    fn name(&self) -> &'static str {
        names::FALLBACK
    }

    fn init(&mut self) -> Result<()> {
        // Nothing to probe: interpretation happens on the host CPU.
        Ok(())
    }

    fn create_runner(&self) -> Result<Box<dyn GraphRunner>> {
        Ok(Box::new(FallbackRunner {
            chunk_size: self.chunk_size,
            graph: None,
        }))
    }
}

/// Runner that interprets the descriptor op list on every `run`
pub struct FallbackRunner {
    chunk_size: usize,
    graph: Option<LoadedGraph>,
}

impl GraphRunner for FallbackRunner {
    fn load(&mut self, location: &Path, progress: Option<&mut dyn FnMut(u64, u64)>) -> Result<()> {
        let graph = load_graph(location, names::FALLBACK, self.chunk_size, progress)?;
        self.graph = Some(graph);
        Ok(())
    }

    fn input_buffers(&self) -> Vec<GraphBuffer> {
        self.graph.as_ref().map(|g| g.inputs.clone()).unwrap_or_default()
    }

    fn output_buffers(&self) -> Vec<GraphBuffer> {
        self.graph.as_ref().map(|g| g.outputs.clone()).unwrap_or_default()
    }

    fn run(&mut self) -> Result<()> {
        let graph = self.graph.as_ref().ok_or(BackendError::NotLoaded)?;
        execute_ops(&graph.descriptor.ops, &graph.inputs, &graph.outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_always_succeeds() {
        let mut backend = FallbackBackend::new(None);
        assert!(backend.init().is_ok());
        assert_eq!(backend.name(), "fallback");
    }

    #[test]
    fn run_before_load_reports_not_loaded() {
        let backend = FallbackBackend::new(None);
        let mut runner = backend.create_runner().unwrap();
        assert!(matches!(runner.run().unwrap_err(), BackendError::NotLoaded));
        assert!(runner.input_buffers().is_empty());
    }

    #[test]
    fn chunk_size_option_is_honored() {
        let options = serde_json::json!({"chunk_size": 128, "unrelated": true});
        assert_eq!(chunk_size_from_options(Some(&options)), 128);
    }

    #[test]
    fn bad_chunk_size_falls_back_to_default() {
        let options = serde_json::json!({"chunk_size": 0});
        assert_eq!(chunk_size_from_options(Some(&options)), DEFAULT_CHUNK_SIZE);
        let options = serde_json::json!({"chunk_size": "lots"});
        assert_eq!(chunk_size_from_options(Some(&options)), DEFAULT_CHUNK_SIZE);
        assert_eq!(chunk_size_from_options(None), DEFAULT_CHUNK_SIZE);
    }
}
