//! Comparison orchestration.
//!
//! Ties the parser and the engine together behind two interchangeable
//! backends: [`LocalBackend`] runs the full in-process pipeline over a
//! single shared session, [`RemoteBackend`] canonicalizes both inputs
//! through an external service and compares the canonical strings.
//! Either way the caller gets a well-formed [`ComparisonResult`]; no
//! failure path panics or escapes as an `Err`.
//!
//! [`ComparisonResult`]: eqv_api_models::ComparisonResult

pub mod backend;
pub mod config;
pub mod error;
pub mod local;
pub mod remote;
pub mod session;

pub use backend::Backend;
pub use config::CheckerConfig;
pub use error::CheckError;
pub use local::LocalBackend;
pub use remote::{CanonicalizeService, HttpCanonicalizeService, RemoteBackend};
pub use session::{global_session, EngineSession};
