//! Selection and fallback behavior driven by scripted backends
//!
//! These tests replace the backend factory with scripted doubles so each
//! candidate's init/load outcome is fixed, then assert on the order and
//! count of attempts.

use lattice_runtime::{
    Backend, BackendError, BackendFactory, BackendOptions, Error, GraphBuffer, GraphRunner,
    PrepareOptions, Session,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Copy)]
struct Script {
    init_ok: bool,
    load_ok: bool,
}

type AttemptLog = Arc<Mutex<Vec<String>>>;

struct ScriptedFactory {
    scripts: HashMap<String, Script>,
    log: AttemptLog,
}

impl ScriptedFactory {
    fn new(scripts: &[(&str, bool, bool)]) -> (Self, AttemptLog) {
        let log = AttemptLog::default();
        let factory = Self {
            scripts: scripts
                .iter()
                .map(|&(name, init_ok, load_ok)| (name.to_string(), Script { init_ok, load_ok }))
                .collect(),
            log: Arc::clone(&log),
        };
        (factory, log)
    }
}

impl BackendFactory for ScriptedFactory {
    fn construct(
        &self,
        name: &str,
        _options: Option<&serde_json::Value>,
    ) -> lattice_backends::Result<Box<dyn Backend>> {
        let Some(&script) = self.scripts.get(name) else {
            return Err(BackendError::UnknownBackend(name.to_string()));
        };
        Ok(Box::new(ScriptedBackend {
            name: name.to_string(),
            script,
            log: Arc::clone(&self.log),
        }))
    }
}

struct ScriptedBackend {
    name: String,
    script: Script,
    log: AttemptLog,
}

impl Backend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn init(&mut self) -> lattice_backends::Result<()> {
        self.log.lock().push(format!("init:{}", self.name));
        if self.script.init_ok {
            Ok(())
        } else {
            Err(BackendError::init_failed("scripted init failure"))
        }
    }

    fn create_runner(&self) -> lattice_backends::Result<Box<dyn GraphRunner>> {
        Ok(Box::new(ScriptedRunner {
            name: self.name.clone(),
            script: self.script,
            log: Arc::clone(&self.log),
            loaded: false,
        }))
    }
}

struct ScriptedRunner {
    name: String,
    script: Script,
    log: AttemptLog,
    loaded: bool,
}

impl GraphRunner for ScriptedRunner {
    fn load(&mut self, _location: &Path, progress: Option<&mut dyn FnMut(u64, u64)>) -> lattice_backends::Result<()> {
        self.log.lock().push(format!("load:{}", self.name));
        if let Some(cb) = progress {
            cb(8, 8);
        }
        if self.script.load_ok {
            self.loaded = true;
            Ok(())
        } else {
            Err(BackendError::DescriptorMissing("scripted".into()))
        }
    }

    fn input_buffers(&self) -> Vec<GraphBuffer> {
        if self.loaded {
            vec![GraphBuffer::new("in", 2)]
        } else {
            Vec::new()
        }
    }

    fn output_buffers(&self) -> Vec<GraphBuffer> {
        if self.loaded {
            vec![GraphBuffer::new("out", 2)]
        } else {
            Vec::new()
        }
    }

    fn run(&mut self) -> lattice_backends::Result<()> {
        if self.loaded {
            Ok(())
        } else {
            Err(BackendError::NotLoaded)
        }
    }
}

fn attempts(log: &AttemptLog) -> Vec<String> {
    log.lock().clone()
}

#[test]
fn every_candidate_failing_init_exhausts_in_order() {
    let (factory, log) = ScriptedFactory::new(&[
        ("alpha", false, false),
        ("beta", false, false),
        ("fallback", false, false),
    ]);
    let mut session = Session::with_factory(Box::new(factory));

    let result = session.initialize(vec!["alpha", "beta"], BackendOptions::new());
    assert!(matches!(result, Err(Error::ExhaustedCandidates)));
    // Each candidate attempted exactly once, in the original order.
    assert_eq!(attempts(&log), vec!["init:alpha", "init:beta", "init:fallback"]);
    assert_eq!(session.active_backend_name(), None);
}

#[test]
fn load_failure_moves_to_next_candidate_without_reattempting() {
    let (factory, log) = ScriptedFactory::new(&[
        ("alpha", true, false),
        ("beta", true, true),
        ("fallback", true, true),
    ]);
    let mut session = Session::with_factory(Box::new(factory));

    let graph = session
        .prepare(
            Path::new("unused"),
            PrepareOptions::default().with_order(vec!["alpha", "beta"]),
        )
        .unwrap();

    assert_eq!(graph.backend_name(), "beta");
    assert_eq!(
        attempts(&log),
        vec!["init:alpha", "load:alpha", "init:beta", "load:beta"]
    );
}

#[test]
fn all_load_failures_exhaust_after_one_attempt_per_backend() {
    let (factory, log) = ScriptedFactory::new(&[
        ("alpha", true, false),
        ("beta", true, false),
        ("fallback", true, false),
    ]);
    let mut session = Session::with_factory(Box::new(factory));

    let result = session.prepare(
        Path::new("unused"),
        PrepareOptions::default().with_order(vec!["alpha", "beta"]),
    );
    assert!(matches!(result, Err(Error::ExhaustedCandidates)));

    let load_attempts: Vec<_> = attempts(&log)
        .into_iter()
        .filter(|entry| entry.starts_with("load:"))
        .collect();
    assert_eq!(load_attempts, vec!["load:alpha", "load:beta", "load:fallback"]);
}

#[test]
fn failed_init_hands_selection_to_next_name() {
    let (factory, _log) = ScriptedFactory::new(&[
        ("accelerated", false, false),
        ("portable", true, true),
        ("fallback", true, true),
    ]);
    let mut session = Session::with_factory(Box::new(factory));

    let graph = session
        .prepare(
            Path::new("unused"),
            PrepareOptions::default().with_order(vec!["accelerated", "portable"]),
        )
        .unwrap();
    assert_eq!(graph.backend_name(), "portable");
}

#[test]
fn unknown_names_are_skipped_like_init_failures() {
    let (factory, log) = ScriptedFactory::new(&[("fallback", true, true)]);
    let mut session = Session::with_factory(Box::new(factory));

    let selected = session
        .initialize(vec!["typo-backend", "another-typo"], BackendOptions::new())
        .unwrap();
    assert_eq!(selected, "fallback");
    // Unscripted names fail at construction, so only fallback reached init.
    assert_eq!(attempts(&log), vec!["init:fallback"]);
}

#[test]
fn initialize_replaces_previous_selection_completely() {
    let (factory, _log) = ScriptedFactory::new(&[("alpha", true, true), ("beta", true, true), ("fallback", true, true)]);
    let mut session = Session::with_factory(Box::new(factory));

    session.initialize("alpha", BackendOptions::new()).unwrap();
    assert_eq!(session.active_backend_name(), Some("alpha"));

    session.initialize("beta", BackendOptions::new()).unwrap();
    assert_eq!(session.active_backend_name(), Some("beta"));
    // The rebuilt queue holds only the unconsumed fallback candidate.
    assert_eq!(session.remaining_candidates().collect::<Vec<_>>(), vec!["fallback"]);
}

#[test]
fn progress_callback_is_forwarded_to_the_loading_backend() {
    let (factory, _log) = ScriptedFactory::new(&[("fallback", true, true)]);
    let mut session = Session::with_factory(Box::new(factory));

    let reports: Arc<Mutex<Vec<(u64, u64)>>> = Arc::default();
    let sink = Arc::clone(&reports);
    session
        .prepare(
            Path::new("unused"),
            PrepareOptions::default()
                .with_order(Vec::<String>::new())
                .with_progress(move |loaded, total| sink.lock().push((loaded, total))),
        )
        .unwrap();

    assert_eq!(reports.lock().as_slice(), &[(8, 8)]);
}
