//! Stateless adapter to the external text-completion service.
//!
//! One request, one response. There is no retry, backoff, or streaming: a
//! failed call is terminal for that request, and callers learn about it
//! only through the absent result.

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::GuardianConfig;

/// Generative text service seam: prompt in, completion text out.
///
/// Implementations must resolve every failure mode (network, status,
/// malformed payload) to `None` rather than an error.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Option<String>;
}

// ── Wire format ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn for_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// `candidates[0].content.parts[0].text`, if every level is present.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// ── HTTP client ──────────────────────────────────────────────────────

/// HTTP client for the completion service.
pub struct CompletionClient {
    http: reqwest::Client,
    endpoint: String,
    credential: String,
}

impl CompletionClient {
    pub fn new(config: &GuardianConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.completion_endpoint.clone(),
            credential: config.completion_credential.clone(),
        }
    }

    async fn request(&self, prompt: &str) -> anyhow::Result<Option<String>> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.credential.as_str())])
            .json(&GenerateRequest::for_prompt(prompt))
            .send()
            .await
            .context("failed to reach completion service")?
            .error_for_status()
            .context("completion service returned error status")?
            .json::<GenerateResponse>()
            .await
            .context("failed to parse completion response")?;
        Ok(response.first_text())
    }
}

#[async_trait]
impl CompletionBackend for CompletionClient {
    async fn complete(&self, prompt: &str) -> Option<String> {
        match self.request(prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "completion request failed");
                None
            }
        }
    }
}
