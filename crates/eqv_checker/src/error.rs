use eqv_parser::ParseError;
use thiserror::Error;

/// Failures that reach the orchestrator. Everything else (a cascade
/// stage giving up, an operator without a closed form) is absorbed
/// further down and never surfaces as an error.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("remote lookup failed: {0}")]
    Transport(String),
}
