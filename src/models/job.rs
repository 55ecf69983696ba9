use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub const GENERIC_FAILURE: &str = "Prediction failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed | JobStatus::Canceled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Starting => "starting",
            JobStatus::Processing => "processing",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Canceled => "canceled",
            JobStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobUrls {
    #[serde(default)]
    pub get: Option<String>,
}

/// Prediction document as returned by the generation service on submit and on every poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub output: Option<JsonValue>,
    #[serde(default)]
    pub error: Option<JsonValue>,
    #[serde(default)]
    pub urls: JobUrls,
}

impl Job {
    /// Output fragments joined in service order. A bare string is taken as-is.
    pub fn output_text(&self) -> String {
        match &self.output {
            Some(JsonValue::Array(fragments)) => fragments
                .iter()
                .map(|f| match f {
                    JsonValue::String(s) => s.clone(),
                    JsonValue::Null => String::new(),
                    other => other.to_string(),
                })
                .collect(),
            Some(JsonValue::String(s)) => s.clone(),
            Some(JsonValue::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    pub fn error_detail(&self) -> String {
        match &self.error {
            Some(JsonValue::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(JsonValue::Null) | None => GENERIC_FAILURE.to_string(),
            Some(JsonValue::String(_)) => GENERIC_FAILURE.to_string(),
            Some(other) => other.to_string(),
        }
    }

    pub fn poll_target(&self) -> Option<&str> {
        self.urls.get.as_deref().filter(|u| !u.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(doc: JsonValue) -> Job {
        serde_json::from_value(doc).unwrap()
    }

    #[test]
    fn fragments_join_without_separator() {
        let j = job(json!({
            "id": "p1",
            "status": "succeeded",
            "output": ["{\"jawa", "ban\":", "\"A\"}"],
            "urls": { "get": "http://x/predictions/p1" }
        }));
        assert_eq!(j.output_text(), "{\"jawaban\":\"A\"}");
        assert_eq!(j.poll_target(), Some("http://x/predictions/p1"));
    }

    #[test]
    fn string_and_null_output() {
        let s = job(json!({ "id": "p", "status": "succeeded", "output": "plain" }));
        assert_eq!(s.output_text(), "plain");
        let n = job(json!({ "id": "p", "status": "succeeded", "output": null }));
        assert_eq!(n.output_text(), "");
        assert_eq!(n.poll_target(), None);
    }

    #[test]
    fn unknown_status_is_not_terminal() {
        let j = job(json!({ "id": "p", "status": "queued" }));
        assert_eq!(j.status, JobStatus::Unknown);
        assert!(!j.status.is_terminal());
        assert!(JobStatus::Canceled.is_terminal());
    }

    #[test]
    fn failure_detail_falls_back_to_generic() {
        let j = job(json!({ "id": "p", "status": "failed", "error": null }));
        assert_eq!(j.error_detail(), GENERIC_FAILURE);
        let k = job(json!({ "id": "p", "status": "failed", "error": "CUDA out of memory" }));
        assert_eq!(k.error_detail(), "CUDA out of memory");
    }
}
