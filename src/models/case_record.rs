use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub const TITLE_MAX_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuspectId {
    A,
    B,
    C,
}

impl SuspectId {
    pub const ALL: [SuspectId; 3] = [SuspectId::A, SuspectId::B, SuspectId::C];

    pub fn as_str(self) -> &'static str {
        match self {
            SuspectId::A => "A",
            SuspectId::B => "B",
            SuspectId::C => "C",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suspect {
    pub id: SuspectId,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "deskripsi")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(rename = "judul")]
    pub title: String,
    #[serde(rename = "lokasi")]
    pub location: String,
    #[serde(rename = "laporan")]
    pub report: String,
    #[serde(rename = "tersangka")]
    pub suspects: Vec<Suspect>,
    #[serde(rename = "jawaban")]
    pub answer: SuspectId,
    #[serde(rename = "penjelasan")]
    pub explanation: String,
}

impl CaseRecord {
    pub fn title_is_concise(&self) -> bool {
        self.title.chars().count() <= TITLE_MAX_CHARS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(rename = "jawaban")]
    pub answer: SuspectId,
    #[serde(rename = "penjelasan")]
    pub explanation: String,
}

/// What the caller asked for. Blank case text means a fresh case is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseMode {
    Generate { custom_request: Option<String> },
    Analyze { case_text: String },
}

/// Validated model output, passed back to the caller exactly as parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedRecord {
    Case(JsonValue),
    Analysis(JsonValue),
}

impl GeneratedRecord {
    pub fn body(&self) -> &JsonValue {
        match self {
            GeneratedRecord::Case(v) | GeneratedRecord::Analysis(v) => v,
        }
    }

    pub fn into_body(self) -> JsonValue {
        match self {
            GeneratedRecord::Case(v) | GeneratedRecord::Analysis(v) => v,
        }
    }

    /// Typed view of a case. `None` when the lenient shape check let through
    /// suspects that do not fit `{id, nama, deskripsi}`.
    pub fn case_record(&self) -> Option<CaseRecord> {
        match self {
            GeneratedRecord::Case(v) => serde_json::from_value(v.clone()).ok(),
            GeneratedRecord::Analysis(_) => None,
        }
    }

    pub fn analysis_record(&self) -> Option<AnalysisRecord> {
        match self {
            GeneratedRecord::Analysis(v) => serde_json::from_value(v.clone()).ok(),
            GeneratedRecord::Case(_) => None,
        }
    }
}
