use crate::error::{Error, Result};
use crate::models::case_record::{CaseMode, GeneratedRecord};
use crate::services::job_service::{JobRunner, PredictionApi};
use crate::services::prompt_service::{build_prompt, with_retry_note};
use crate::utils::json_extract::extract_json;
use crate::utils::validation::{validate_with, ShapeKind, ValidationMode};
use serde_json::Value as JsonValue;
use tracing::Instrument;
use uuid::Uuid;

pub const MAX_ATTEMPTS: u32 = 2;

enum Attempt {
    Valid(JsonValue),
    Invalid {
        raw: String,
        parsed: Option<JsonValue>,
    },
}

/// Prompt, submit, poll, extract, validate; one retry when the output has the wrong shape.
pub struct CaseService<A> {
    runner: JobRunner<A>,
    validation: ValidationMode,
}

impl<A: PredictionApi> CaseService<A> {
    pub fn new(runner: JobRunner<A>, validation: ValidationMode) -> Self {
        Self { runner, validation }
    }

    pub async fn run(&self, mode: &CaseMode) -> Result<GeneratedRecord> {
        let kind = shape_kind(mode);
        let span = tracing::info_span!("case_pipeline", run_id = %Uuid::new_v4(), kind = kind.as_str());

        async move {
            let prompt = build_prompt(mode);
            let mut attempt_prompt = prompt.clone();

            for attempt in 1..=MAX_ATTEMPTS {
                match self.attempt(&attempt_prompt, kind, attempt).await? {
                    Attempt::Valid(value) => return Ok(wrap(kind, value)),
                    Attempt::Invalid { raw, parsed } if attempt == MAX_ATTEMPTS => {
                        tracing::warn!(attempt, "output still invalid after retry");
                        return Err(Error::InvalidShape {
                            message: kind.invalid_message().to_string(),
                            raw,
                            parsed,
                        });
                    }
                    Attempt::Invalid { parsed, .. } => {
                        tracing::warn!(attempt, parsed = parsed.is_some(), "invalid output, retrying once");
                        attempt_prompt = with_retry_note(&prompt);
                    }
                }
            }

            Err(Error::Internal("retry loop exited without an outcome".to_string()))
        }
        .instrument(span)
        .await
    }

    async fn attempt(&self, prompt: &str, kind: ShapeKind, attempt: u32) -> Result<Attempt> {
        let completed = self.runner.run(prompt).await?;
        let raw = completed.output;
        tracing::debug!(attempt, job_id = %completed.job.id, raw = %raw, "model output");

        let parsed = extract_json(&raw);
        let valid = parsed
            .as_ref()
            .is_some_and(|v| validate_with(v, kind, self.validation));

        Ok(match parsed {
            Some(value) if valid => Attempt::Valid(value),
            parsed => Attempt::Invalid { raw, parsed },
        })
    }
}

pub fn shape_kind(mode: &CaseMode) -> ShapeKind {
    match mode {
        CaseMode::Generate { .. } => ShapeKind::Case,
        CaseMode::Analyze { .. } => ShapeKind::Analysis,
    }
}

fn wrap(kind: ShapeKind, value: JsonValue) -> GeneratedRecord {
    match kind {
        ShapeKind::Case => GeneratedRecord::Case(value),
        ShapeKind::Analysis => GeneratedRecord::Analysis(value),
    }
}
