//! Runtime configuration and backend selection.

use crate::backend::Backend;
use crate::local::LocalBackend;
use crate::remote::RemoteBackend;
use eqv_api_models::BackendKind;

/// Canonicalization endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str =
    "https://20oljrihy1.execute-api.ap-northeast-2.amazonaws.com/default/latex_canonical_transfer_lambda";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    pub backend: BackendKind,
    pub endpoint: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Local,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl CheckerConfig {
    /// Defaults overridden by `EQV_BACKEND` (local|remote) and
    /// `EQV_ENDPOINT`. An unparseable backend name is ignored with a
    /// warning rather than failing startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("EQV_BACKEND") {
            match value.parse() {
                Ok(kind) => config.backend = kind,
                Err(err) => {
                    tracing::warn!(target: "checker", %err, "ignoring EQV_BACKEND");
                }
            }
        }
        if let Ok(value) = std::env::var("EQV_ENDPOINT") {
            config.endpoint = value;
        }
        config
    }

    /// Instantiate the configured backend.
    pub fn backend(&self) -> Box<dyn Backend> {
        match self.backend {
            BackendKind::Local => Box::new(LocalBackend::new()),
            BackendKind::Remote => Box::new(RemoteBackend::over_http(self.endpoint.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_backend_is_local() {
        let config = CheckerConfig::default();
        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.backend().kind(), BackendKind::Local);
    }

    #[test]
    fn remote_config_builds_remote_backend() {
        let config = CheckerConfig {
            backend: BackendKind::Remote,
            endpoint: "http://127.0.0.1:1/latex".to_string(),
        };
        assert_eq!(config.backend().kind(), BackendKind::Remote);
    }
}
