// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Environment-driven configuration.

use std::time::Duration;

use crate::classify::Classifier;
use crate::generate::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use crate::generate::GeminiConfig;

pub const DEFAULT_HTTP_PORT: u16 = 27436;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "ALGOFLOW_MODEL";
pub const ENDPOINT_VAR: &str = "ALGOFLOW_ENDPOINT";
pub const TIMEOUT_VAR: &str = "ALGOFLOW_TIMEOUT_SECS";
pub const PORT_VAR: &str = "ALGOFLOW_HTTP_PORT";
pub const KEYWORDS_VAR: &str = "ALGOFLOW_KEYWORDS";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds greater than zero (got {value:?})")]
    InvalidTimeout { var: &'static str, value: String },
    #[error("{var} must be a port number (got {value:?})")]
    InvalidPort { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub http_port: u16,
    /// `None` keeps the built-in vocabulary.
    pub keywords: Option<Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { gemini: GeminiConfig::default(), http_port: DEFAULT_HTTP_PORT, keywords: None }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let timeout = match get(TIMEOUT_VAR) {
            None => DEFAULT_TIMEOUT,
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout { var: TIMEOUT_VAR, value }),
            },
        };

        let http_port = match get(PORT_VAR) {
            None => DEFAULT_HTTP_PORT,
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { var: PORT_VAR, value })?,
        };

        let keywords = get(KEYWORDS_VAR).map(|raw| {
            raw.split(',').map(str::trim).filter(|k| !k.is_empty()).map(str::to_owned).collect()
        });

        Ok(Self {
            gemini: GeminiConfig {
                api_key: get(API_KEY_VAR),
                model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
                endpoint: get(ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
                timeout,
            },
            http_port,
            keywords,
        })
    }

    pub fn classifier(&self) -> Classifier {
        match &self.keywords {
            Some(keywords) => Classifier::with_keywords(keywords),
            None => Classifier::default(),
        }
    }
}
