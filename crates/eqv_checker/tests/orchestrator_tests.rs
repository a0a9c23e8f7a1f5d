//! End-to-end orchestration through the `Backend` trait object.

use eqv_api_models::{BackendKind, Verdict};
use eqv_checker::{Backend, CheckerConfig, EngineSession, LocalBackend};
use std::sync::{Arc, Mutex};

fn local() -> Box<dyn Backend> {
    Box::new(LocalBackend::with_session(Arc::new(Mutex::new(
        EngineSession::new(),
    ))))
}

#[test]
fn local_backend_covers_the_acceptance_pairs() {
    let backend = local();
    let equal_pairs = [
        ("x+1", "1+x"),
        ("\\sin^2(x)+\\cos^2(x)", "1"),
        ("e^{i\\pi}", "-1"),
        ("\\frac{d}{dx}(x^2+3x)", "2x+3"),
        ("\\int_0^1 x^2 dx", "\\frac{1}{3}"),
    ];
    for (a, b) in equal_pairs {
        let result = backend.compare(a, b);
        assert_eq!(result.is_equal, Verdict::Equal, "{} vs {}", a, b);
        assert_eq!(result.simplified_diff, "0");
        assert!(result.error.is_none());
    }

    let result = backend.compare("x^2", "x^3");
    assert_eq!(result.is_equal, Verdict::NotEqual);
    assert_ne!(result.simplified_diff, "0");
}

#[test]
fn malformed_input_never_panics() {
    let backend = local();
    for bad in ["\\frac{1}{", "(x", "", "x+"] {
        let result = backend.compare(bad, "x");
        assert_eq!(result.is_equal, Verdict::Unknown);
        assert!(result.error.as_deref().is_some_and(|m| !m.is_empty()));
    }
}

#[test]
fn result_serializes_to_the_wire_shape() {
    let result = local().compare("x+1", "1+x");
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["isEqual"], serde_json::json!(true));
    assert_eq!(value["engine"], serde_json::json!("local"));
    assert!(value["expr1Canonical"].is_string());
    assert!(value["processingTimeMs"].is_u64());
}

#[test]
fn default_config_yields_a_local_backend() {
    let backend = CheckerConfig::default().backend();
    assert_eq!(backend.kind(), BackendKind::Local);
    let result = backend.compare("2x+3x", "5x");
    assert_eq!(result.is_equal, Verdict::Equal);
}
