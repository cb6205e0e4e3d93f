//! Line-delimited JSON-RPC wire protocol spoken with miners.
//!
//! Every message is a single JSON object terminated by `\n`. Requests carry
//! an `id`; server-pushed notifications (`set_extranonce`,
//! `mining.set_difficulty`, `mining.notify`) do not.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Per-request errors, recovered locally and reported to the miner. The
/// session stays alive after one of these.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StratumError {
    #[error("job-not-found")]
    JobNotFound,
    #[error("duplicate-share")]
    DuplicateShare,
    #[error("low-difficulty-share")]
    LowDifficultyShare,
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal-error")]
    InternalError,
}

impl StratumError {
    pub fn code(self) -> i32 {
        match self {
            StratumError::JobNotFound => 20,
            StratumError::DuplicateShare => 21,
            StratumError::LowDifficultyShare => 22,
            StratumError::Unauthorized => 24,
            StratumError::InternalError => 25,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            StratumError::JobNotFound => "job-not-found",
            StratumError::DuplicateShare => "duplicate-share",
            StratumError::LowDifficultyShare => "low-difficulty-share",
            StratumError::Unauthorized => "unauthorized",
            StratumError::InternalError => "internal-error",
        }
    }

    /// JSON-RPC error triple `[code, message, null]`.
    pub fn to_value(self) -> Value {
        serde_json::json!([self.code(), self.message(), Value::Null])
    }
}

/// A request sent by the miner: `{"id":N,"method":"...","params":[...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StratumRequest {
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

/// A response to a request, or an error triple.
#[derive(Debug, Clone, Serialize)]
pub struct StratumResponse {
    pub id: Value,
    pub result: Option<Value>,
    pub error: Option<Value>,
}

impl StratumResponse {
    pub fn ok(id: Value, result: Value) -> Self {
        Self { id, result: Some(result), error: None }
    }

    pub fn err(id: Value, error: StratumError) -> Self {
        Self { id, result: None, error: Some(error.to_value()) }
    }

    pub fn to_line(&self) -> String {
        let mut s = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        s.push('\n');
        s
    }
}

/// A server-pushed notification, no `id` field.
#[derive(Debug, Clone, Serialize)]
pub struct StratumNotification {
    pub method: &'static str,
    pub params: Vec<Value>,
}

impl StratumNotification {
    pub fn set_extranonce(extranonce_hex: &str) -> Self {
        Self { method: "set_extranonce", params: vec![Value::String(extranonce_hex.to_string())] }
    }

    pub fn set_difficulty(difficulty: f64) -> Self {
        Self { method: "mining.set_difficulty", params: vec![serde_json::json!(difficulty)] }
    }

    pub fn notify(job_id: &str, payload_hex: &str) -> Self {
        Self {
            method: "mining.notify",
            params: vec![Value::String(job_id.to_string()), Value::String(payload_hex.to_string())],
        }
    }

    pub fn to_line(&self) -> String {
        let mut s = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        s.push('\n');
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(StratumError::JobNotFound.code(), 20);
        assert_eq!(StratumError::DuplicateShare.code(), 21);
        assert_eq!(StratumError::LowDifficultyShare.code(), 22);
        assert_eq!(StratumError::Unauthorized.code(), 24);
        assert_eq!(StratumError::InternalError.code(), 25);
    }

    #[test]
    fn notify_has_two_params() {
        let n = StratumNotification::notify("1", "deadbeef");
        assert_eq!(n.params.len(), 2);
        assert_eq!(n.method, "mining.notify");
    }

    #[test]
    fn response_line_is_newline_terminated() {
        let r = StratumResponse::ok(Value::from(1), Value::Bool(true));
        assert!(r.to_line().ends_with('\n'));
    }
}
