//! The shared engine session.
//!
//! Comparisons run one at a time against a single lazily-created
//! session; concurrent callers queue on the mutex around it. The
//! handle is reference-counted so callers (and tests) can also own a
//! private session instead of the process-wide one.

use crate::error::CheckError;
use eqv_engine::{compare_exprs, Comparison};
use std::sync::{Arc, Mutex, OnceLock};

/// Exclusive handle over the parse/evaluate/compare pipeline.
#[derive(Debug, Default)]
pub struct EngineSession {
    comparisons: u64,
}

impl EngineSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse both inputs and run the equivalence cascade.
    pub fn compare(&mut self, latex_a: &str, latex_b: &str) -> Result<Comparison, CheckError> {
        let a = eqv_parser::parse_latex(latex_a)?;
        let b = eqv_parser::parse_latex(latex_b)?;
        self.comparisons += 1;
        tracing::debug!(
            target: "session",
            n = self.comparisons,
            %a,
            %b,
            "running comparison"
        );
        Ok(compare_exprs(&a, &b))
    }

    /// Number of comparisons this session has completed.
    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }
}

static SESSION: OnceLock<Arc<Mutex<EngineSession>>> = OnceLock::new();

/// The process-wide session, created on first use.
pub fn global_session() -> Arc<Mutex<EngineSession>> {
    SESSION
        .get_or_init(|| Arc::new(Mutex::new(EngineSession::new())))
        .clone()
}
