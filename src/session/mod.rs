// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Request lifecycle for the single conversion session.
//!
//! [`Session::apply`] is a pure reducer: it takes a [`Transition`] and returns the next session or
//! a [`TransitionError`], never touching the current one. Every submit and clear bumps the
//! generation token; a result carrying an older token is rejected as stale, so when two
//! submissions race the last one wins.

mod controller;

use std::fmt;

use serde::Serialize;

pub use controller::SessionController;

use crate::classify::Classifier;
use crate::convert::{Conversion, FallbackKind};
use crate::model::{AlgorithmText, DiagramSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    EmptyInput,
    NotAnAlgorithm,
    /// Reported by the consumer after the diagram failed to render.
    RenderFailed(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("Please enter an algorithm description."),
            Self::NotAnAlgorithm => f.write_str(
                "This doesn't appear to be an algorithm description. Please describe a process, \
                 procedure, or algorithm with steps, conditions, or technical terms.",
            ),
            Self::RenderFailed(message) => write!(f, "Error rendering diagram: {message}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Ready(DiagramSource),
    Failed(FailureReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StateName {
    Idle,
    Loading,
    Ready,
    Failed,
}

impl StateName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RequestState {
    pub fn name(&self) -> StateName {
        match self {
            Self::Idle => StateName::Idle,
            Self::Loading => StateName::Loading,
            Self::Ready(_) => StateName::Ready,
            Self::Failed(_) => StateName::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Accepted text; generation starts.
    Begin(AlgorithmText),
    /// Text stopped by the gate before any generation call.
    Reject { text: String, reason: FailureReason },
    /// A conversion finished for the submission that carried `generation`.
    Resolve { generation: u64, conversion: Conversion },
    RenderFailed(String),
    Clear,
}

impl Transition {
    /// Runs the input gate: empty text and text the classifier turns down become
    /// [`Transition::Reject`], anything else [`Transition::Begin`].
    pub fn submit(text: impl Into<String>, classifier: &Classifier) -> Self {
        let text = text.into();
        match AlgorithmText::new(text.as_str()) {
            Err(_) => Self::Reject { text, reason: FailureReason::EmptyInput },
            Ok(algorithm) if !classifier.classify(algorithm.as_str()).is_algorithm() => {
                Self::Reject { text, reason: FailureReason::NotAnAlgorithm }
            }
            Ok(algorithm) => Self::Begin(algorithm),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("stale result (started at generation {started}, session is at {current})")]
    StaleGeneration { started: u64, current: u64 },
    #[error("cannot apply {transition} while {from}")]
    InvalidTransition { from: StateName, transition: &'static str },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    state: RequestState,
    algorithm_text: String,
    generation: u64,
    full_response: Option<String>,
    fallback: Option<FallbackKind>,
}

impl Session {
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn algorithm_text(&self) -> &str {
        &self.algorithm_text
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn full_response(&self) -> Option<&str> {
        self.full_response.as_deref()
    }

    pub fn fallback(&self) -> Option<FallbackKind> {
        self.fallback
    }

    pub fn diagram(&self) -> Option<&DiagramSource> {
        match &self.state {
            RequestState::Ready(diagram) => Some(diagram),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FailureReason> {
        match &self.state {
            RequestState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn apply(&self, transition: Transition) -> Result<Session, TransitionError> {
        let from = self.state.name();
        let invalid =
            |transition: &'static str| TransitionError::InvalidTransition { from, transition };

        match transition {
            Transition::Begin(text) => Ok(Session {
                state: RequestState::Loading,
                algorithm_text: text.into_string(),
                generation: self.generation + 1,
                full_response: None,
                fallback: None,
            }),
            Transition::Reject { text, reason } => Ok(Session {
                state: RequestState::Failed(reason),
                algorithm_text: text,
                generation: self.generation + 1,
                full_response: None,
                fallback: None,
            }),
            Transition::Resolve { generation, conversion } => {
                if generation != self.generation {
                    return Err(TransitionError::StaleGeneration {
                        started: generation,
                        current: self.generation,
                    });
                }
                if from != StateName::Loading {
                    return Err(invalid("resolve"));
                }
                Ok(Session {
                    state: RequestState::Ready(conversion.diagram),
                    algorithm_text: self.algorithm_text.clone(),
                    generation: self.generation,
                    full_response: conversion.full_response,
                    fallback: conversion.fallback,
                })
            }
            Transition::RenderFailed(message) => {
                if from != StateName::Ready {
                    return Err(invalid("render_failed"));
                }
                Ok(Session {
                    state: RequestState::Failed(FailureReason::RenderFailed(message)),
                    full_response: None,
                    fallback: None,
                    ..self.clone()
                })
            }
            Transition::Clear => {
                Ok(Session { generation: self.generation + 1, ..Session::default() })
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.name(),
            algorithm_text: self.algorithm_text.clone(),
            mermaid_code: self.diagram().map(|d| d.as_str().to_owned()).unwrap_or_default(),
            error: self.error().map(ToString::to_string),
            full_response: self.full_response().map(str::to_owned),
            fallback: self.fallback,
            generation: self.generation,
        }
    }
}

/// Observable session state, as served to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub state: StateName,
    pub algorithm_text: String,
    pub mermaid_code: String,
    pub error: Option<String>,
    /// Raw model reply behind the current diagram.
    pub full_response: Option<String>,
    pub fallback: Option<FallbackKind>,
    pub generation: u64,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Session::default().snapshot()
    }
}
