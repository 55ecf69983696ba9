use crate::error::{Error, Result};
use crate::models::job::Job;
use crate::services::job_service::PredictionApi;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::json;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 650,
            temperature: 0.2,
            top_p: 0.9,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReplicateSettings {
    pub api_base: String,
    pub model: String,
    pub model_version: Option<String>,
}

#[derive(Clone)]
pub struct ReplicateService {
    client: Client,
    api_token: String,
    settings: ReplicateSettings,
}

impl ReplicateService {
    pub fn new(api_token: String, client: Client, settings: ReplicateSettings) -> Self {
        Self {
            client,
            api_token,
            settings,
        }
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.api_token)
    }

    pub fn predictions_url(&self) -> String {
        match self.settings.model_version {
            Some(_) => format!("{}/predictions", self.settings.api_base),
            None => format!(
                "{}/models/{}/predictions",
                self.settings.api_base, self.settings.model
            ),
        }
    }

    fn submission_body(&self, prompt: &str, params: &GenerationParams) -> serde_json::Value {
        let input = json!({
            "prompt": prompt,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
            "top_p": params.top_p,
        });
        match &self.settings.model_version {
            Some(version) => json!({ "version": version, "input": input }),
            None => json!({ "input": input }),
        }
    }

    fn poll_url(&self, job: &Job) -> Result<Url> {
        let raw = match job.poll_target() {
            Some(target) => target.to_string(),
            None => format!("{}/predictions/{}", self.settings.api_base, job.id),
        };
        Url::parse(&raw).map_err(|e| Error::Transport(format!("Invalid poll URL {}: {}", raw, e)))
    }

    async fn read_job(res: Response) -> Result<Job> {
        let text = res.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Transport(format!("Unreadable prediction document: {}", e)))
    }
}

#[async_trait]
impl PredictionApi for ReplicateService {
    async fn create_prediction(&self, prompt: &str, params: &GenerationParams) -> Result<Job> {
        let res = self
            .client
            .post(self.predictions_url())
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&self.submission_body(prompt, params))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(status, body = %body, "generation service rejected submission");
            return Err(Error::RemoteRejected { status, body });
        }

        Self::read_job(res).await
    }

    async fn get_prediction(&self, job: &Job) -> Result<Job> {
        let res = self
            .client
            .get(self.poll_url(job)?)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "Poll returned {}: {}",
                status, body
            )));
        }

        Self::read_job(res).await
    }
}
