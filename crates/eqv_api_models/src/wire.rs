use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tri-state equality verdict.
///
/// Serialized as `true` / `false` / `null`: `isEqual` is a nullable
/// boolean on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Equal,
    NotEqual,
    /// Neither proven equal nor unequal (error or unresolvable).
    Unknown,
}

impl Verdict {
    pub fn as_option(self) -> Option<bool> {
        match self {
            Verdict::Equal => Some(true),
            Verdict::NotEqual => Some(false),
            Verdict::Unknown => None,
        }
    }

    pub fn from_option(value: Option<bool>) -> Self {
        match value {
            Some(true) => Verdict::Equal,
            Some(false) => Verdict::NotEqual,
            None => Verdict::Unknown,
        }
    }
}

impl Serialize for Verdict {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Verdict::from_option(Option::<bool>::deserialize(
            deserializer,
        )?))
    }
}

/// Which comparison backend produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Full in-process parse/evaluate/simplify pipeline.
    Local,
    /// Remote canonicalization service, string-equality verdict.
    Remote,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(BackendKind::Local),
            "remote" => Ok(BackendKind::Remote),
            other => Err(format!("unknown backend '{}', expected local|remote", other)),
        }
    }
}

/// The packaged outcome of one comparison request.
///
/// Produced once per request and immutable afterwards. Every failure
/// path yields one of these with `verdict = Unknown` and an error
/// message; nothing escapes the orchestrator as a panic or Err.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// `true` / `false` / `null`.
    pub is_equal: Verdict,
    /// Canonical string of the first expression after evaluation.
    pub expr1_canonical: String,
    /// Canonical string of the second expression after evaluation.
    pub expr2_canonical: String,
    /// Canonical string of the simplified difference. For the remote
    /// backend this is either "0" or a textual subtraction, never a
    /// recomputed simplification.
    pub simplified_diff: String,
    /// Wall-clock time for the whole comparison.
    pub processing_time_ms: u64,
    /// Backend that produced the result.
    pub engine: BackendKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComparisonResult {
    /// An indeterminate result carrying an error message and empty
    /// canonical forms.
    pub fn error(engine: BackendKind, elapsed_ms: u64, message: impl Into<String>) -> Self {
        Self {
            is_equal: Verdict::Unknown,
            expr1_canonical: String::new(),
            expr2_canonical: String::new(),
            simplified_diff: String::new(),
            processing_time_ms: elapsed_ms,
            engine,
            error: Some(message.into()),
        }
    }
}

/// Response of the remote canonicalization lookup for one LaTeX string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalizeResponse {
    /// Internal representation of the canonical expression.
    pub expr_srepr: String,
    /// Canonical string form; equality is decided by exact string
    /// match of this field across the two lookups.
    pub expr_str: String,
    /// Normalized LaTeX rendering.
    pub latex: String,
}

/// Response shape of the external handwriting-recognition service.
///
/// The recognized `latex` payload is ordinary parser input; no other
/// part of the core interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verdict_serializes_as_nullable_bool() {
        assert_eq!(serde_json::to_value(Verdict::Equal).unwrap(), json!(true));
        assert_eq!(
            serde_json::to_value(Verdict::NotEqual).unwrap(),
            json!(false)
        );
        assert_eq!(serde_json::to_value(Verdict::Unknown).unwrap(), json!(null));
    }

    #[test]
    fn result_uses_camel_case_fields() {
        let result = ComparisonResult {
            is_equal: Verdict::Equal,
            expr1_canonical: "x + 1".to_string(),
            expr2_canonical: "1 + x".to_string(),
            simplified_diff: "0".to_string(),
            processing_time_ms: 12,
            engine: BackendKind::Local,
            error: None,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["isEqual"], json!(true));
        assert_eq!(value["expr1Canonical"], json!("x + 1"));
        assert_eq!(value["processingTimeMs"], json!(12));
        assert_eq!(value["engine"], json!("local"));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn error_result_is_indeterminate() {
        let result = ComparisonResult::error(BackendKind::Remote, 3, "boom");
        assert_eq!(result.is_equal, Verdict::Unknown);
        assert_eq!(result.expr1_canonical, "");
        assert_eq!(result.error.as_deref(), Some("boom"));
    }

    #[test]
    fn canonicalize_response_round_trips() {
        let text = r#"{"expr_srepr":"Add(Symbol('x'), Integer(1))","expr_str":"x + 1","latex":"x + 1"}"#;
        let resp: CanonicalizeResponse = serde_json::from_str(text).unwrap();
        assert_eq!(resp.expr_str, "x + 1");
    }

    #[test]
    fn backend_kind_from_str() {
        assert_eq!("local".parse::<BackendKind>().unwrap(), BackendKind::Local);
        assert!("sympy".parse::<BackendKind>().is_err());
    }
}
