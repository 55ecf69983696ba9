use crate::models::case_record::{CaseRecord, SuspectId};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

pub const CASE_KEYS: [&str; 6] = [
    "judul",
    "lokasi",
    "laporan",
    "tersangka",
    "jawaban",
    "penjelasan",
];
pub const SUSPECT_COUNT: usize = 3;
pub const MIN_EXPLANATION_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Case,
    Analysis,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Case => "case",
            ShapeKind::Analysis => "analysis",
        }
    }

    pub fn invalid_message(self) -> &'static str {
        match self {
            ShapeKind::Case => "Output kasus tidak valid. Harus ada {judul, lokasi, laporan, tersangka(3), jawaban(A|B|C), penjelasan}.",
            ShapeKind::Analysis => "Output analisis tidak valid. Harus { jawaban: 'A|B|C', penjelasan: '...' }",
        }
    }
}

/// `Lenient` only checks what the UI needs to render a case. `Strict` also
/// requires well-formed suspects with ids A, B, C and an answer naming one of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    #[default]
    Lenient,
    Strict,
}

pub fn validate(value: &JsonValue, kind: ShapeKind) -> bool {
    validate_with(value, kind, ValidationMode::Lenient)
}

pub fn validate_with(value: &JsonValue, kind: ShapeKind, mode: ValidationMode) -> bool {
    match kind {
        ShapeKind::Case => {
            is_case_shaped(value) && (mode == ValidationMode::Lenient || is_strict_case(value))
        }
        ShapeKind::Analysis => is_analysis_shaped(value),
    }
}

fn has_single_letter_answer(obj: &serde_json::Map<String, JsonValue>) -> bool {
    obj.get("jawaban")
        .and_then(|v| v.as_str())
        .and_then(SuspectId::parse)
        .is_some()
}

fn is_case_shaped(value: &JsonValue) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    if !CASE_KEYS.iter().all(|k| obj.contains_key(*k)) {
        return false;
    }
    let suspects_ok = obj
        .get("tersangka")
        .and_then(|v| v.as_array())
        .is_some_and(|a| a.len() == SUSPECT_COUNT);
    suspects_ok && has_single_letter_answer(obj)
}

fn is_strict_case(value: &JsonValue) -> bool {
    let Ok(record) = serde_json::from_value::<CaseRecord>(value.clone()) else {
        return false;
    };
    if !record.title_is_concise() {
        tracing::debug!(title = %record.title, "case title longer than advised");
    }
    let ids: HashSet<SuspectId> = record.suspects.iter().map(|s| s.id).collect();
    ids.len() == SUSPECT_COUNT && ids.contains(&record.answer)
}

fn is_analysis_shaped(value: &JsonValue) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let explanation_ok = obj
        .get("penjelasan")
        .and_then(|v| v.as_str())
        .is_some_and(|s| s.chars().count() >= MIN_EXPLANATION_CHARS);
    has_single_letter_answer(obj) && explanation_ok
}
