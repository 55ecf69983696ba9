pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::{
    case_service::CaseService, job_service::JobRunner, replicate_service::ReplicateService,
};
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// `None` when no generation-service credential is configured; every
    /// generation request then fails with `MissingCredential`.
    pub case_service: Option<Arc<CaseService<ReplicateService>>>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let Some(token) = config.replicate_api_token.clone() else {
            tracing::warn!("REPLICATE_API_TOKEN is not set; generation requests will fail");
            return Ok(Self { case_service: None });
        };

        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Internal(format!("HTTP client setup failed: {}", e)))?;

        let replicate = ReplicateService::new(token, http_client, config.replicate_settings());
        let runner = JobRunner::new(replicate, config.generation_params(), config.poll_settings());
        let case_service = CaseService::new(runner, config.validation_mode());

        Ok(Self {
            case_service: Some(Arc::new(case_service)),
        })
    }
}
