//! Backend negotiation and graph preparation for lattice
//!
//! This crate is the control plane over `lattice-backends`: given a caller
//! preference order it tries execution backends one by one, settles on the
//! first that initializes, loads a graph artifact through it, and falls back
//! to the remaining candidates when loading fails. Partial failure at either
//! stage (initialization, loading) never aborts the operation while a
//! candidate remains untried.
//!
//! # Usage
//!
//! ```no_run
//! use lattice_runtime::{PrepareOptions, Session};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new();
//! let mut graph = session.prepare(
//!     Path::new("models/resnet"),
//!     PrepareOptions::default()
//!         .with_order(vec!["accelerated", "portable"])
//!         .with_progress(|loaded, total| eprintln!("{loaded}/{total}")),
//! )?;
//!
//! graph.input_buffers()[0].write(&[0.5; 3072])?;
//! graph.run()?;
//! let scores = graph.output_buffers()[0].to_vec();
//! println!("ran on {}: {:?}", graph.backend_name(), &scores[..4]);
//! # Ok(())
//! # }
//! ```
//!
//! # Guarantees
//!
//! - Candidates are tried strictly in queue order, never concurrently; each
//!   name is consumed permanently after one attempt, whether it failed at
//!   init or at load time.
//! - The software fallback backend is always the final candidate.
//! - Only [`Error::ExhaustedCandidates`] reaches the caller; every
//!   per-candidate failure is a logged diagnostic.
//! - One backend selection is active per [`Session`]; entry points take
//!   `&mut self`, so a session cannot race against itself.

pub mod error;
pub mod factory;
pub mod prepare;
pub mod session;

// Re-export public API
pub use error::{Error, Result};
pub use factory::{BackendFactory, StandardFactory};
pub use prepare::{GraphInterface, PrepareOptions, ProgressCallback};
pub use session::{BackendOrder, Session};

// The contracts callers implement or consume
pub use lattice_backends::{names, Backend, BackendError, BackendOptions, GraphBuffer, GraphRunner};
