// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Calls to the text-generation service.
//!
//! One call per request: no retries, no streaming. Every failure comes back as a
//! [`GenerationError`] and the caller decides what to show instead.

pub mod gemini;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

pub use gemini::{GeminiClient, GeminiConfig};

/// Boxed future so the client can live behind `dyn`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("no API credential configured (set GEMINI_API_KEY)")]
    MissingCredential,
    #[error("request to the generation service failed: {0}")]
    Transport(String),
    #[error("generation service timed out")]
    Timeout,
    #[error("generation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed generation response: {0}")]
    Malformed(String),
    #[error("generation service returned no text")]
    EmptyResponse,
}

impl GenerationError {
    /// The provider answered but there was nothing to draw.
    pub fn is_empty_response(&self) -> bool {
        matches!(self, Self::EmptyResponse)
    }
}

pub trait GenerationClient: Send + Sync {
    /// Sends `prompt` and returns the raw response text.
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>>;
}

impl<T: GenerationClient + ?Sized> GenerationClient for std::sync::Arc<T> {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>> {
        (**self).generate(prompt)
    }
}
