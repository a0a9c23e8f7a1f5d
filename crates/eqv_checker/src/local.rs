//! In-process backend over the shared engine session.

use crate::backend::Backend;
use crate::session::{global_session, EngineSession};
use eqv_api_models::{BackendKind, ComparisonResult, Verdict};
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub struct LocalBackend {
    session: Arc<Mutex<EngineSession>>,
}

impl LocalBackend {
    /// Backend over the process-wide session.
    pub fn new() -> Self {
        Self {
            session: global_session(),
        }
    }

    /// Backend over a caller-owned session.
    pub fn with_session(session: Arc<Mutex<EngineSession>>) -> Self {
        Self { session }
    }
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn compare(&self, latex_a: &str, latex_b: &str) -> ComparisonResult {
        let started = Instant::now();
        let mut session = match self.session.lock() {
            Ok(guard) => guard,
            // Session state is a counter; usable even after a caller
            // panicked while holding the lock.
            Err(poisoned) => poisoned.into_inner(),
        };
        match session.compare(latex_a, latex_b) {
            Ok(comparison) => {
                let verdict = if comparison.equal {
                    Verdict::Equal
                } else {
                    Verdict::NotEqual
                };
                ComparisonResult {
                    is_equal: verdict,
                    expr1_canonical: comparison.canonical_a,
                    expr2_canonical: comparison.canonical_b,
                    simplified_diff: comparison.simplified_diff,
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    engine: BackendKind::Local,
                    error: None,
                }
            }
            Err(err) => {
                tracing::warn!(target: "checker", %err, "local comparison failed");
                ComparisonResult::error(
                    BackendKind::Local,
                    started.elapsed().as_millis() as u64,
                    err.to_string(),
                )
            }
        }
    }
}
