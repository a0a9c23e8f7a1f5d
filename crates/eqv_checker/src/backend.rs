use eqv_api_models::{BackendKind, ComparisonResult};

/// A comparison strategy.
///
/// Implementations never return `Err` and never panic outward: every
/// failure is folded into a [`ComparisonResult`] with an `Unknown`
/// verdict and an error message, so a caller can always render the
/// outcome.
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn compare(&self, latex_a: &str, latex_b: &str) -> ComparisonResult;
}
