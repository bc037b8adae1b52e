//! Graph preparation: backend selection combined with artifact loading
//!
//! `prepare` layers a retry loop on top of [`Session`] selection: a backend
//! that initializes but cannot load the artifact is abandoned and selection
//! resumes with the remaining candidates. Initialization failures and load
//! failures therefore burn candidates from the same queue, and each backend
//! name gets at most one attempt at either stage per call.
//!
//! ```text
//! Selecting ──init ok──▶ Loading ──load ok──▶ Succeeded
//!     ▲                     │
//!     └─────load failed─────┘         (queue empty ⇒ Failed)
//! ```

use crate::error::{Error, Result};
use crate::session::{BackendOrder, Session};
use lattice_backends::{Backend, BackendOptions, GraphBuffer, GraphRunner};
use std::path::Path;

/// Progress callback receiving `(loaded_bytes, total_bytes)`
pub type ProgressCallback = Box<dyn FnMut(u64, u64) + Send>;

/// Options for [`Session::prepare`]
#[derive(Default)]
pub struct PrepareOptions {
    /// Candidate order for backend selection
    pub backend_order: BackendOrder,
    /// Opaque per-backend configuration
    pub backend_options: BackendOptions,
    /// Forwarded verbatim to the loading backend; never invoked after
    /// `prepare` returns
    pub progress: Option<ProgressCallback>,
}

impl PrepareOptions {
    /// Set the candidate order
    pub fn with_order(mut self, order: impl Into<BackendOrder>) -> Self {
        self.backend_order = order.into();
        self
    }

    /// Set the per-backend options
    pub fn with_backend_options(mut self, options: BackendOptions) -> Self {
        self.backend_options = options;
        self
    }

    /// Set the progress callback
    pub fn with_progress(mut self, progress: impl FnMut(u64, u64) + Send + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }
}

/// A loaded graph bound to the backend that loaded it
///
/// Buffer sets are fixed at construction. Write inputs, call
/// [`GraphInterface::run`], read outputs.
pub struct GraphInterface {
    backend_name: String,
    input_buffers: Vec<GraphBuffer>,
    output_buffers: Vec<GraphBuffer>,
    runner: Box<dyn GraphRunner>,
}

impl GraphInterface {
    /// Name of the backend the graph ended up on
    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// Buffers to write input data into
    pub fn input_buffers(&self) -> &[GraphBuffer] {
        &self.input_buffers
    }

    /// Buffers to read results from
    pub fn output_buffers(&self) -> &[GraphBuffer] {
        &self.output_buffers
    }

    /// Execute the graph over the current input buffer contents
    pub fn run(&mut self) -> lattice_backends::Result<()> {
        self.runner.run()
    }
}

impl std::fmt::Debug for GraphInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphInterface")
            .field("backend_name", &self.backend_name)
            .field("inputs", &self.input_buffers.len())
            .field("outputs", &self.output_buffers.len())
            .finish()
    }
}

impl Session {
    /// Select a backend and load the graph artifact at `location`
    ///
    /// Selection and loading retry independently: a load failure demotes the
    /// active backend and re-enters selection over the remaining candidates.
    /// There is no iteration cap; the loop terminates because every pass
    /// either returns or consumes at least one queued candidate.
    ///
    /// # Errors
    ///
    /// [`Error::ExhaustedCandidates`] when no remaining backend can both
    /// initialize and load the artifact.
    #[tracing::instrument(skip(self, options), fields(location = %location.display()))]
    pub fn prepare(&mut self, location: &Path, options: PrepareOptions) -> Result<GraphInterface> {
        let PrepareOptions {
            backend_order,
            backend_options,
            mut progress,
        } = options;

        self.initialize(backend_order, backend_options)?;

        loop {
            let Some(active) = self.active.as_ref() else {
                // initialize/select_next only return Ok with an active
                // backend in place
                return Err(Error::ExhaustedCandidates);
            };
            let backend_name = active.name.clone();

            match load_on(active.backend.as_ref(), location, progress.as_deref_mut()) {
                Ok(runner) => {
                    let input_buffers = runner.input_buffers();
                    let output_buffers = runner.output_buffers();
                    tracing::info!(
                        backend = %backend_name,
                        inputs = input_buffers.len(),
                        outputs = output_buffers.len(),
                        "graph prepared"
                    );
                    return Ok(GraphInterface {
                        backend_name,
                        input_buffers,
                        output_buffers,
                        runner,
                    });
                }
                Err(err) => {
                    tracing::error!(
                        backend = %backend_name,
                        error = %err,
                        "graph loading failed, trying next backend"
                    );
                    self.select_next()?;
                }
            }
        }
    }
}

/// One load attempt against one backend: runner creation plus artifact load
fn load_on(
    backend: &dyn Backend,
    location: &Path,
    progress: Option<&mut (dyn FnMut(u64, u64) + Send + 'static)>,
) -> lattice_backends::Result<Box<dyn GraphRunner>> {
    let mut runner = backend.create_runner()?;
    runner.load(location, progress.map(|cb| cb as &mut dyn FnMut(u64, u64)))?;
    Ok(runner)
}
