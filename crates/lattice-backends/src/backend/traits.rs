//! Capability contracts for execution backends
//!
//! A [`Backend`] is an interchangeable execution provider for precompiled
//! computation graphs. Backends are constructed cold, asked to initialize,
//! and once initialized hand out [`GraphRunner`]s scoped to one graph
//! artifact each.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 Backend trait                 │
//! │  - init()                                     │
//! │  - create_runner()                            │
//! └──────────────────────┬────────────────────────┘
//!                        │
//!         ┌──────────────┼──────────────┐
//!         ▼              ▼              ▼
//!  ┌────────────┐ ┌────────────┐ ┌────────────┐
//!  │accelerated │ │  portable  │ │  fallback  │
//!  └────────────┘ └────────────┘ └────────────┘
//! ```

use super::types::GraphBuffer;
use crate::error::Result;
use std::path::Path;

/// An interchangeable execution provider for computation graphs
///
/// Implementations are expected to fail cleanly from [`Backend::init`] when
/// the execution substrate they need is unavailable; the caller treats such
/// failures as non-fatal and moves on to the next candidate.
pub trait Backend: Send + Sync {
    /// Name under which this backend is selected (e.g. `"fallback"`)
    fn name(&self) -> &'static str;

    /// Bring up the execution substrate
    ///
    /// Called exactly once per constructed instance, before
    /// [`Backend::create_runner`]. An instance whose `init` failed is
    /// discarded, never retried.
    fn init(&mut self) -> Result<()>;

    /// Construct a runner scoped to one graph artifact
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot produce a runner, which the
    /// caller treats like a failed load.
    fn create_runner(&self) -> Result<Box<dyn GraphRunner>>;
}

impl std::fmt::Debug for dyn Backend + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").field("name", &self.name()).finish()
    }
}

/// Loads and executes one graph artifact on an initialized backend
///
/// The runner lifecycle is `load` once, then any number of `run` calls.
/// Buffer accessors return empty sets until a load has succeeded.
pub trait GraphRunner: Send {
    /// Load the graph artifact stored at `location`
    ///
    /// `progress` is invoked zero or more times with
    /// `(loaded_bytes, total_bytes)` while artifact data streams in; values
    /// are monotonically non-decreasing and the callback is never invoked
    /// after `load` returns.
    fn load(&mut self, location: &Path, progress: Option<&mut dyn FnMut(u64, u64)>) -> Result<()>;

    /// Buffers the caller writes input data into
    fn input_buffers(&self) -> Vec<GraphBuffer>;

    /// Buffers the caller reads results from
    fn output_buffers(&self) -> Vec<GraphBuffer>;

    /// Execute the loaded graph over the current input buffer contents
    ///
    /// # Errors
    ///
    /// Returns [`crate::BackendError::NotLoaded`] if no load has succeeded.
    fn run(&mut self) -> Result<()>;
}
