use crate::models::case_record::CaseMode;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CaseJsonRequest {
    #[serde(default)]
    #[validate(length(max = 20000))]
    pub case_text: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub prompt: Option<String>,
}

impl CaseJsonRequest {
    /// Empty or malformed bodies select generate mode instead of failing.
    /// `prompt` only applies to generate mode and is dropped otherwise, so it
    /// is never length-checked when a case is being analyzed.
    pub fn from_body(body: &[u8]) -> Self {
        let mut request: Self = serde_json::from_slice(body).unwrap_or_default();
        if request.is_analysis() {
            request.prompt = None;
        }
        request
    }

    fn is_analysis(&self) -> bool {
        self.case_text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    pub fn into_mode(self) -> CaseMode {
        match self
            .case_text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
        {
            Some(case_text) => CaseMode::Analyze { case_text },
            None => CaseMode::Generate {
                custom_request: self.prompt,
            },
        }
    }
}
