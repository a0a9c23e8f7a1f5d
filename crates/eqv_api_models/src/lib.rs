//! Wire model for serializable comparison output.
//!
//! Provides the stable output format shared by the CLI, the local
//! backend and the remote backend, plus the request/response shapes of
//! the external collaborators (canonicalization service, handwriting
//! recognition). Field names follow the frontend wire contract
//! (`isEqual`, `expr1Canonical`, ...).

pub mod wire;

pub use wire::{
    BackendKind, CanonicalizeResponse, ComparisonResult, RecognitionResponse, Verdict,
};
