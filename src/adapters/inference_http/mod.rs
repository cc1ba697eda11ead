//! HTTP client for a Gemini-style `generateContent` endpoint.
//!
//! The chunk is sent inline as base64 together with the instruction
//! contract, and JSON output is requested. Only the first text part of the
//! first candidate is returned; validating it is the dispatcher's job.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::InferenceConfig;
use crate::domain::errors::DomainError;
use crate::domain::model::{ChunkPayload, Credential};
use crate::ports::InferencePort;

/// HTTP inference adapter
pub struct HttpInferenceAdapter {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
    }
}

impl HttpInferenceAdapter {
    pub fn new(config: &InferenceConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing client (connection pooling across adapters)
    pub fn with_client(client: reqwest::Client, config: &InferenceConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn request_body(payload: &ChunkPayload, instructions: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": payload.mime_type,
                            "data": STANDARD.encode(&payload.bytes),
                        }
                    },
                    { "text": instructions },
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
            },
        })
    }
}

#[async_trait]
impl InferencePort for HttpInferenceAdapter {
    async fn validate_credential(&self, credential: &Credential) -> Result<(), DomainError> {
        if credential.expose().chars().any(char::is_whitespace) {
            return Err(DomainError::CredentialRejected(
                "API key must not contain whitespace".to_string(),
            ));
        }
        Ok(())
    }

    async fn detect_scenes(
        &self,
        credential: &Credential,
        payload: &ChunkPayload,
        instructions: &str,
    ) -> Result<String, DomainError> {
        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", credential.expose())
            .json(&Self::request_body(payload, instructions))
            .send()
            .await
            .map_err(|e| DomainError::InferenceFailed(format!("request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DomainError::CredentialRejected(format!(
                "inference service answered {}",
                status
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::InferenceFailed(format!("{}: {}", status, body)));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DomainError::MalformedResponse(format!("undecodable body: {}", e)))?;

        parsed
            .first_text()
            .ok_or_else(|| DomainError::MalformedResponse("no text candidate in response".to_string()))
    }
}
