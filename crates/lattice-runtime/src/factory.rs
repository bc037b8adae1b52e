//! Backend construction seam
//!
//! [`StandardFactory`] is the tagged dispatch over the known backend names.
//! Tests and embedders with custom providers inject their own factory via
//! [`crate::Session::with_factory`].

use lattice_backends::{
    names, AcceleratedBackend, Backend, BackendError, FallbackBackend, PortableBackend,
};

/// Constructs a cold (uninitialized) backend instance for a candidate name
pub trait BackendFactory: Send + Sync {
    /// Build the backend registered under `name`, passing through that
    /// name's opaque options entry
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::UnknownBackend`] for names outside the
    /// factory's registry. The selector treats this the same as a backend
    /// that failed to initialize.
    fn construct(
        &self,
        name: &str,
        options: Option<&serde_json::Value>,
    ) -> lattice_backends::Result<Box<dyn Backend>>;
}

/// Dispatch over the three built-in backends
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardFactory;

impl BackendFactory for StandardFactory {
    fn construct(
        &self,
        name: &str,
        options: Option<&serde_json::Value>,
    ) -> lattice_backends::Result<Box<dyn Backend>> {
        match name {
            names::ACCELERATED => Ok(Box::new(AcceleratedBackend::new(options))),
            names::PORTABLE => Ok(Box::new(PortableBackend::new(options))),
            names::FALLBACK => Ok(Box::new(FallbackBackend::new(options))),
            other => Err(BackendError::UnknownBackend(other.to_string())),
        }
    }
}
