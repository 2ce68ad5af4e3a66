// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{BoxFuture, GenerationClient, GenerationError};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Response bodies quoted in errors are cut to this many characters.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Gemini `generateContent` REST endpoint.
///
/// Without an API key the client still constructs; every call then fails with
/// [`GenerationError::MissingCredential`] so the caller falls back instead of crashing at startup.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| GenerationError::Transport(err.to_string()))?;
        Ok(Self { http, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn call(&self, prompt: &str) -> Result<String, GenerationError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(GenerationError::MissingCredential);
        };

        let body =
            GenerateRequest { contents: [RequestContent { parts: [RequestPart { text: prompt }] }] };
        debug!(
            model = self.config.model.as_str(),
            prompt_len = prompt.len();
            "calling generation service"
        );

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            warn!(status = status.as_u16(); "generation service rejected the request");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        parse_response(&text)
    }
}

fn transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::Transport(err.to_string())
    }
}

/// Concatenates the text parts of the first candidate.
fn parse_response(body: &str) -> Result<String, GenerationError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|err| GenerationError::Malformed(err.to_string()))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

impl GenerationClient for GeminiClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>> {
        Box::pin(self.call(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_response, GeminiClient, GeminiConfig};
    use crate::generate::{GenerationClient, GenerationError};

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "flowchart TD\n"}, {"text": "A --> B"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        assert_eq!(parse_response(body), Ok("flowchart TD\nA --> B".to_owned()));
    }

    #[test]
    fn missing_or_blank_text_is_empty_response() {
        assert_eq!(parse_response("{}"), Err(GenerationError::EmptyResponse));
        assert_eq!(
            parse_response(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#),
            Err(GenerationError::EmptyResponse)
        );
        assert_eq!(
            parse_response(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(GenerationError::EmptyResponse)
        );
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert!(matches!(parse_response("<html>"), Err(GenerationError::Malformed(_))));
    }

    #[test]
    fn builds_generate_content_url() {
        let client = GeminiClient::new(GeminiConfig {
            endpoint: "http://localhost:9000/".to_owned(),
            ..GeminiConfig::default()
        })
        .expect("client");
        assert_eq!(
            client.url(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let client = GeminiClient::new(GeminiConfig::default()).expect("client");
        assert_eq!(client.generate("prompt").await, Err(GenerationError::MissingCredential));
    }
}
