//! bio.tools registry API client
//!
//! Submits one tool record per request and classifies the response body
//! rather than the HTTP status: the registry reports validation failures as
//! JSON bodies on error statuses, and a created tool is recognized solely by
//! a string-valued `id` field.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;

use crate::model::RegistryConfig;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no registry token configured, set BIOTOOLS_TOKEN")]
    MissingToken,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    ParseError(String),
}

/// Classification of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The registry created the tool and returned its identifier.
    Created { id: String },
    /// The registry answered but did not create the tool; `details` is the
    /// full response body (typically a per-field error payload).
    Rejected { details: Value },
    /// The request never produced a parseable response (connect failure,
    /// timeout, malformed body).
    Failed { reason: String },
}

/// Submits tool records to a registry.
#[async_trait]
pub trait ToolSubmitter: Send + Sync {
    /// Attempt to create one tool. Never fails outright; every error is
    /// folded into a [`SubmissionOutcome`] so callers can keep going.
    async fn create_tool(&self, tool: &Value) -> SubmissionOutcome;
}

/// Client for the bio.tools registry submission API.
pub struct RegistryClient {
    client: Client,
    base_url: String,
    token: String,
}

impl RegistryClient {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let token = config
            .token
            .clone()
            .ok_or(RegistryError::MissingToken)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent("biotools-harvest/0.1")
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token,
        })
    }

    async fn post_tool(&self, tool: &Value) -> Result<Value, RegistryError> {
        let url = format!("{}/api/tool/", self.base_url);

        tracing::debug!(url = %url, "Posting tool record");

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Token {}", self.token))
            .json(tool)
            .send()
            .await?;

        // Error statuses still carry a JSON body worth classifying.
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| RegistryError::ParseError(e.to_string()))?;

        Ok(body)
    }
}

#[async_trait]
impl ToolSubmitter for RegistryClient {
    async fn create_tool(&self, tool: &Value) -> SubmissionOutcome {
        match self.post_tool(tool).await {
            Ok(body) => classify_response(body),
            Err(error) => SubmissionOutcome::Failed {
                reason: error.to_string(),
            },
        }
    }
}

/// A creation is confirmed iff the response carries a string-valued `id`.
pub fn classify_response(body: Value) -> SubmissionOutcome {
    match body.get("id") {
        Some(Value::String(id)) => SubmissionOutcome::Created { id: id.clone() },
        _ => SubmissionOutcome::Rejected { details: body },
    }
}
