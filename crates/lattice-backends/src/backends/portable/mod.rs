//! Portable precompiled backend
//!
//! Executes the same artifacts as the fallback backend but lowers the
//! descriptor op list into a [`CompiledPlan`] once at load time, so repeated
//! `run` calls skip op dispatch.

use crate::backend::{names, Backend, GraphBuffer, GraphRunner};
use crate::backends::common::{load_graph, CompiledPlan, LoadedGraph};
use crate::backends::fallback::chunk_size_from_options;
use crate::error::{BackendError, Result};
use std::path::Path;

/// Portable backend with load-time plan compilation
pub struct PortableBackend {
    chunk_size: usize,
}

impl PortableBackend {
    /// Create a portable backend from its opaque options entry
    ///
    /// Recognized options: `{"chunk_size": <bytes>}` for weight streaming.
    pub fn new(options: Option<&serde_json::Value>) -> Self {
        Self {
            chunk_size: chunk_size_from_options(options),
        }
    }
}

impl Backend for PortableBackend {
    fn name(&self) -> &'static str {
        names::PORTABLE
    }

    fn init(&mut self) -> Result<()> {
        // Plan execution runs on the host CPU, no substrate to bring up.
        Ok(())
    }

    fn create_runner(&self) -> Result<Box<dyn GraphRunner>> {
        Ok(Box::new(PortableRunner {
            chunk_size: self.chunk_size,
            loaded: None,
        }))
    }
}

/// Runner that executes a plan compiled at load time
pub struct PortableRunner {
    chunk_size: usize,
    loaded: Option<(LoadedGraph, CompiledPlan)>,
}

impl GraphRunner for PortableRunner {
    fn load(&mut self, location: &Path, progress: Option<&mut dyn FnMut(u64, u64)>) -> Result<()> {
        let graph = load_graph(location, names::PORTABLE, self.chunk_size, progress)?;
        let plan = CompiledPlan::compile(&graph.descriptor)?;
        self.loaded = Some((graph, plan));
        Ok(())
    }

    fn input_buffers(&self) -> Vec<GraphBuffer> {
        self.loaded
            .as_ref()
            .map(|(g, _)| g.inputs.clone())
            .unwrap_or_default()
    }

    fn output_buffers(&self) -> Vec<GraphBuffer> {
        self.loaded
            .as_ref()
            .map(|(g, _)| g.outputs.clone())
            .unwrap_or_default()
    }

    fn run(&mut self) -> Result<()> {
        let (graph, plan) = self.loaded.as_ref().ok_or(BackendError::NotLoaded)?;
        plan.execute(&graph.inputs, &graph.outputs)
    }
}
