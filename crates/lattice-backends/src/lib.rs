//! Execution backends for lattice graph artifacts
//!
//! This crate provides:
//! - **Capability contracts**: the [`Backend`] and [`GraphRunner`] traits
//!   every execution provider implements
//! - **Graph descriptors**: the on-disk artifact format and its loader
//! - **Reference backends**: `accelerated`, `portable`, and `fallback`
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              Graph artifact (dir)             │
//! │   graph_<backend>.json + optional weights     │
//! └──────────────────────┬────────────────────────┘
//!                        │ GraphRunner::load
//!         ┌──────────────┼──────────────┐
//!         ▼              ▼              ▼
//!  ┌────────────┐ ┌────────────┐ ┌────────────┐
//!  │accelerated │ │  portable  │ │  fallback  │
//!  └────────────┘ └────────────┘ └────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use lattice_backends::{Backend, FallbackBackend};
//! use std::path::Path;
//!
//! # fn main() -> lattice_backends::Result<()> {
//! let mut backend = FallbackBackend::new(None);
//! backend.init()?;
//!
//! let mut runner = backend.create_runner()?;
//! runner.load(Path::new("model/"), None)?;
//!
//! let inputs = runner.input_buffers();
//! inputs[0].write(&[1.0, 2.0, 3.0, 4.0])?;
//! runner.run()?;
//! let result = runner.output_buffers()[0].to_vec();
//! # let _ = result;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod backends;
pub mod descriptor;
pub mod error;

// Re-export public API
pub use backend::{names, Backend, BackendOptions, GraphBuffer, GraphRunner};
pub use backends::{AcceleratedBackend, FallbackBackend, PortableBackend};
pub use descriptor::{BufferSpec, GraphDescriptor, GraphOp};
pub use error::{BackendError, Result};
