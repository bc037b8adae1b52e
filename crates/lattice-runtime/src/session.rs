//! Backend selection session
//!
//! A [`Session`] owns the candidate queue, the per-backend options, and the
//! currently active backend. Entry points take `&mut self`, so the "latest
//! successful selection is visible to the subsequent load step" guarantee
//! holds per session object rather than through process-wide state, and
//! concurrent selection races are ruled out by the borrow checker instead of
//! being documented away.

use crate::error::{Error, Result};
use crate::factory::{BackendFactory, StandardFactory};
use lattice_backends::{names, Backend, BackendOptions};
use std::collections::VecDeque;

/// Caller preference for the candidate order
///
/// The software fallback is not part of the order; it is appended
/// unconditionally when the queue is built, so selection always has at least
/// one candidate to try.
#[derive(Debug, Clone, Default)]
pub enum BackendOrder {
    /// `["accelerated", "portable"]`
    #[default]
    Preferred,
    /// A single preferred backend
    Single(String),
    /// An explicit ordering, tried front to back
    Ordered(Vec<String>),
}

impl BackendOrder {
    pub(crate) fn into_queue(self) -> VecDeque<String> {
        let mut queue: VecDeque<String> = match self {
            BackendOrder::Preferred => [names::ACCELERATED, names::PORTABLE]
                .into_iter()
                .map(str::to_string)
                .collect(),
            BackendOrder::Single(name) => std::iter::once(name).collect(),
            BackendOrder::Ordered(order) => order.into(),
        };
        // Appended even when already present: a duplicate only costs one
        // extra attempt, while deduplication could reorder the caller's list.
        queue.push_back(names::FALLBACK.to_string());
        queue
    }
}

impl From<&str> for BackendOrder {
    fn from(name: &str) -> Self {
        BackendOrder::Single(name.to_string())
    }
}

impl From<String> for BackendOrder {
    fn from(name: String) -> Self {
        BackendOrder::Single(name)
    }
}

impl From<Vec<String>> for BackendOrder {
    fn from(order: Vec<String>) -> Self {
        BackendOrder::Ordered(order)
    }
}

impl From<Vec<&str>> for BackendOrder {
    fn from(order: Vec<&str>) -> Self {
        BackendOrder::Ordered(order.into_iter().map(str::to_string).collect())
    }
}

pub(crate) struct ActiveBackend {
    pub(crate) name: String,
    pub(crate) backend: Box<dyn Backend>,
}

/// Owns backend selection state: candidate queue, options, active backend
///
/// # Example
///
/// ```no_run
/// use lattice_runtime::Session;
///
/// # fn main() -> lattice_runtime::Result<()> {
/// let mut session = Session::new();
/// let backend = session.initialize(vec!["accelerated", "portable"], Default::default())?;
/// println!("selected {backend}");
/// # Ok(())
/// # }
/// ```
pub struct Session {
    factory: Box<dyn BackendFactory>,
    queue: VecDeque<String>,
    options: BackendOptions,
    pub(crate) active: Option<ActiveBackend>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session using the built-in backend set
    pub fn new() -> Self {
        Self::with_factory(Box::new(StandardFactory))
    }

    /// Create a session with a custom backend factory
    pub fn with_factory(factory: Box<dyn BackendFactory>) -> Self {
        Self {
            factory,
            queue: VecDeque::new(),
            options: BackendOptions::new(),
            active: None,
        }
    }

    /// Name of the currently active backend, if a selection has succeeded
    pub fn active_backend_name(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.name.as_str())
    }

    /// Candidate names not yet tried in the current selection pass
    pub fn remaining_candidates(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    /// Build the candidate queue from `order`, store `options`, and select
    /// the first backend that initializes
    ///
    /// The queue is rebuilt from scratch on every call; a successful call
    /// unconditionally replaces any previously active backend.
    ///
    /// # Errors
    ///
    /// [`Error::ExhaustedCandidates`] when no candidate initializes.
    #[tracing::instrument(skip(self, order, options))]
    pub fn initialize(&mut self, order: impl Into<BackendOrder>, options: BackendOptions) -> Result<String> {
        self.queue = order.into().into_queue();
        self.options = options;
        self.select_next()
    }

    /// Advance to the next viable candidate
    ///
    /// Pops names off the queue front until one constructs and initializes.
    /// Construction failures (including unknown names) and initialization
    /// failures are deliberately indistinguishable here: both are logged and
    /// consume exactly one candidate. On success the active backend is
    /// replaced; the previous instance is dropped, its teardown being its
    /// own concern.
    ///
    /// # Errors
    ///
    /// [`Error::ExhaustedCandidates`] once the queue is empty.
    pub fn select_next(&mut self) -> Result<String> {
        loop {
            let Some(name) = self.queue.pop_front() else {
                tracing::warn!("backend candidates exhausted");
                return Err(Error::ExhaustedCandidates);
            };

            let mut backend = match self.factory.construct(&name, self.options.get(&name)) {
                Ok(backend) => backend,
                Err(err) => {
                    tracing::warn!(backend = %name, error = %err, "backend unavailable, trying next candidate");
                    continue;
                }
            };

            if let Err(err) = backend.init() {
                tracing::warn!(backend = %name, error = %err, "backend failed to initialize, trying next candidate");
                continue;
            }

            tracing::info!(backend = %name, "backend selected");
            self.active = Some(ActiveBackend {
                name: name.clone(),
                backend,
            });
            return Ok(name);
        }
    }
}
