//! Device-accelerated backend
//!
//! Initialization probes for an execution device and fails cleanly when none
//! is present, which on most hosts is the path that hands selection over to
//! the portable or fallback backend. The probe reads
//! `LATTICE_ACCELERATED_DEVICE`, the same variable the device runtime
//! publishes when a device is registered.

use crate::backend::{names, Backend, GraphBuffer, GraphRunner};
use crate::backends::common::{load_graph, CompiledPlan, LoadedGraph};
use crate::backends::fallback::chunk_size_from_options;
use crate::error::{BackendError, Result};
use std::path::Path;

/// Environment variable naming the registered execution device
pub const DEVICE_ENV: &str = "LATTICE_ACCELERATED_DEVICE";

/// Device-accelerated backend
pub struct AcceleratedBackend {
    chunk_size: usize,
    device: Option<String>,
}

impl AcceleratedBackend {
    /// Create an accelerated backend from its opaque options entry
    ///
    /// Recognized options: `{"chunk_size": <bytes>}` for weight streaming.
    pub fn new(options: Option<&serde_json::Value>) -> Self {
        Self {
            chunk_size: chunk_size_from_options(options),
            device: None,
        }
    }

    fn probe_device() -> Result<String> {
        match std::env::var(DEVICE_ENV) {
            Ok(device) if !device.trim().is_empty() => Ok(device),
            _ => Err(BackendError::DeviceUnavailable(format!(
                "{DEVICE_ENV} is not set; no execution device registered"
            ))),
        }
    }
}

impl Backend for AcceleratedBackend {
    fn name(&self) -> &'static str {
        names::ACCELERATED
    }

    fn init(&mut self) -> Result<()> {
        let device = Self::probe_device()?;
        tracing::info!(device = %device, "accelerated device registered");
        self.device = Some(device);
        Ok(())
    }

    fn create_runner(&self) -> Result<Box<dyn GraphRunner>> {
        if self.device.is_none() {
            return Err(BackendError::init_failed("accelerated backend not initialized"));
        }
        Ok(Box::new(AcceleratedRunner {
            chunk_size: self.chunk_size,
            loaded: None,
        }))
    }
}

/// Runner that stages graphs for device submission
pub struct AcceleratedRunner {
    chunk_size: usize,
    loaded: Option<(LoadedGraph, CompiledPlan)>,
}

impl GraphRunner for AcceleratedRunner {
    fn load(&mut self, location: &Path, progress: Option<&mut dyn FnMut(u64, u64)>) -> Result<()> {
        let graph = load_graph(location, names::ACCELERATED, self.chunk_size, progress)?;
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
        // TODO: submit the plan through the device command queue once the
        // driver bindings land; until then steps execute host-side.
        plan.execute(&graph.inputs, &graph.outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_fails_without_a_device() {
        // The test environment never registers a device.
        if std::env::var(DEVICE_ENV).is_ok() {
            return;
        }
        let mut backend = AcceleratedBackend::new(None);
        let err = backend.init().unwrap_err();
        assert!(matches!(err, BackendError::DeviceUnavailable(_)));
    }

    #[test]
    fn create_runner_requires_init() {
        let backend = AcceleratedBackend::new(None);
        assert!(backend.create_runner().is_err());
    }
}
