//! Remote canonicalization backend.
//!
//! Each input goes through one canonicalization lookup; the verdict is
//! exact string equality of the two canonical forms. The reported diff
//! is textual, "0" on a match and `A - (B)` otherwise; it is never a
//! recomputed simplification, unlike the local backend's.

use crate::backend::Backend;
use crate::error::CheckError;
use eqv_api_models::{BackendKind, CanonicalizeResponse, ComparisonResult, Verdict};
use std::thread;
use std::time::{Duration, Instant};

/// One canonicalization lookup. Substitutable so the backend can be
/// exercised without a network.
pub trait CanonicalizeService: Send + Sync {
    fn canonicalize(&self, latex: &str) -> Result<CanonicalizeResponse, CheckError>;
}

/// HTTP lookup against the canonicalization endpoint: a GET with the
/// LaTeX in the `str` query parameter, answering a JSON
/// [`CanonicalizeResponse`].
pub struct HttpCanonicalizeService {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpCanonicalizeService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();
        Self {
            agent,
            endpoint: endpoint.into(),
        }
    }
}

impl CanonicalizeService for HttpCanonicalizeService {
    fn canonicalize(&self, latex: &str) -> Result<CanonicalizeResponse, CheckError> {
        let response = self
            .agent
            .get(&self.endpoint)
            .query("str", latex)
            .call()
            .map_err(|err| CheckError::Transport(err.to_string()))?;
        response
            .into_json()
            .map_err(|err| CheckError::Transport(err.to_string()))
    }
}

pub struct RemoteBackend<S> {
    service: S,
}

impl<S: CanonicalizeService> RemoteBackend<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

impl RemoteBackend<HttpCanonicalizeService> {
    pub fn over_http(endpoint: impl Into<String>) -> Self {
        Self::new(HttpCanonicalizeService::new(endpoint))
    }
}

impl<S: CanonicalizeService> Backend for RemoteBackend<S> {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn compare(&self, latex_a: &str, latex_b: &str) -> ComparisonResult {
        let started = Instant::now();
        // Both lookups go out at once.
        let (first, second) = thread::scope(|scope| {
            let a = scope.spawn(|| self.service.canonicalize(latex_a));
            let b = scope.spawn(|| self.service.canonicalize(latex_b));
            (join_lookup(a), join_lookup(b))
        });
        let elapsed = started.elapsed().as_millis() as u64;

        let (a, b) = match (first, second) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(target: "checker", %err, "remote lookup failed");
                return ComparisonResult::error(BackendKind::Remote, elapsed, err.to_string());
            }
        };

        let equal = a.expr_str == b.expr_str;
        ComparisonResult {
            is_equal: if equal {
                Verdict::Equal
            } else {
                Verdict::NotEqual
            },
            simplified_diff: if equal {
                "0".to_string()
            } else {
                format!("{} - ({})", a.expr_str, b.expr_str)
            },
            expr1_canonical: a.expr_str,
            expr2_canonical: b.expr_str,
            processing_time_ms: elapsed,
            engine: BackendKind::Remote,
            error: None,
        }
    }
}

fn join_lookup(
    handle: thread::ScopedJoinHandle<'_, Result<CanonicalizeResponse, CheckError>>,
) -> Result<CanonicalizeResponse, CheckError> {
    handle
        .join()
        .unwrap_or_else(|_| Err(CheckError::Transport("lookup thread panicked".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockService {
        responses: HashMap<String, String>,
    }

    impl MockService {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self {
                responses: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl CanonicalizeService for MockService {
        fn canonicalize(&self, latex: &str) -> Result<CanonicalizeResponse, CheckError> {
            let canonical = self
                .responses
                .get(latex)
                .ok_or_else(|| CheckError::Transport(format!("no mapping for '{}'", latex)))?;
            Ok(CanonicalizeResponse {
                expr_srepr: format!("Srepr({})", canonical),
                expr_str: canonical.clone(),
                latex: canonical.clone(),
            })
        }
    }

    #[test]
    fn matching_canonical_forms_are_equal() {
        let backend = RemoteBackend::new(MockService::new(&[("x+1", "x + 1"), ("1+x", "x + 1")]));
        let result = backend.compare("x+1", "1+x");
        assert_eq!(result.is_equal, Verdict::Equal);
        assert_eq!(result.simplified_diff, "0");
        assert_eq!(result.engine, BackendKind::Remote);
    }

    #[test]
    fn mismatched_forms_report_a_textual_diff() {
        let backend = RemoteBackend::new(MockService::new(&[("x^2", "x**2"), ("x^3", "x**3")]));
        let result = backend.compare("x^2", "x^3");
        assert_eq!(result.is_equal, Verdict::NotEqual);
        assert_eq!(result.simplified_diff, "x**2 - (x**3)");
        assert_eq!(result.expr1_canonical, "x**2");
        assert_eq!(result.expr2_canonical, "x**3");
    }

    #[test]
    fn failed_lookup_is_indeterminate() {
        let backend = RemoteBackend::new(MockService::new(&[("x", "x")]));
        let result = backend.compare("x", "\\unknown");
        assert_eq!(result.is_equal, Verdict::Unknown);
        assert!(result.error.as_deref().is_some_and(|m| m.contains("lookup")));
    }
}
