use crate::error::{Error, Result};
use crate::models::job::{Job, JobStatus};
use crate::services::replicate_service::GenerationParams;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep_until, timeout_at, Instant};

/// Remote prediction API. `ReplicateService` is the production implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionApi: Send + Sync {
    async fn create_prediction(&self, prompt: &str, params: &GenerationParams) -> Result<Job>;
    async fn get_prediction(&self, job: &Job) -> Result<Job>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(900),
            timeout: Duration::from_millis(90_000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletedJob {
    pub job: Job,
    pub output: String,
    pub polls: u32,
}

pub struct JobRunner<A> {
    api: A,
    params: GenerationParams,
    poll: PollSettings,
}

impl<A: PredictionApi> JobRunner<A> {
    pub fn new(api: A, params: GenerationParams, poll: PollSettings) -> Self {
        Self { api, params, poll }
    }

    pub fn poll_settings(&self) -> PollSettings {
        self.poll
    }

    pub async fn submit(&self, prompt: &str) -> Result<Job> {
        let job = self.api.create_prediction(prompt, &self.params).await?;
        tracing::info!(job_id = %job.id, status = job.status.as_str(), "prediction submitted");
        Ok(job)
    }

    /// Polls until the job is terminal or the budget runs out. The last tick is
    /// clamped to the deadline so the whole budget is used; no poll starts after
    /// it. A job that is abandoned keeps running remotely.
    pub async fn await_completion(&self, mut job: Job) -> Result<CompletedJob> {
        let started = Instant::now();
        let deadline = started + self.poll.timeout;
        let mut polls = 0u32;

        loop {
            match job.status {
                JobStatus::Succeeded => {
                    let output = job.output_text();
                    tracing::info!(
                        job_id = %job.id,
                        polls,
                        elapsed_ms = elapsed_ms(started),
                        output_len = output.len(),
                        "prediction succeeded"
                    );
                    return Ok(CompletedJob { job, output, polls });
                }
                JobStatus::Failed | JobStatus::Canceled => {
                    let detail = job.error_detail();
                    tracing::warn!(job_id = %job.id, status = job.status.as_str(), error = %detail, "prediction failed");
                    return Err(Error::RemoteFailed(detail));
                }
                _ => {}
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(self.timed_out(&job, started, polls));
            }
            let tick = (now + self.poll.interval).min(deadline);
            sleep_until(tick).await;

            // The tick landing on the deadline still gets one interval to answer.
            let poll_deadline = deadline.max(tick + self.poll.interval);
            job = match timeout_at(poll_deadline, self.api.get_prediction(&job)).await {
                Ok(polled) => polled?,
                Err(_) => return Err(self.timed_out(&job, started, polls)),
            };
            polls += 1;
            tracing::debug!(job_id = %job.id, status = job.status.as_str(), polls, "prediction polled");
        }
    }

    pub async fn run(&self, prompt: &str) -> Result<CompletedJob> {
        let job = self.submit(prompt).await?;
        self.await_completion(job).await
    }

    fn timed_out(&self, job: &Job, started: Instant, polls: u32) -> Error {
        let elapsed_ms = elapsed_ms(started);
        tracing::warn!(job_id = %job.id, polls, elapsed_ms, "prediction abandoned after polling budget");
        Error::PollTimeout {
            elapsed_ms,
            budget_ms: self.poll.timeout.as_millis() as u64,
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
