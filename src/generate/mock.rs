// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scripted stand-in for the generation service, for tests and offline runs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use super::{BoxFuture, GenerationClient, GenerationError};

/// Replies from a queue, then repeats the fallback reply forever.
///
/// With a gate attached every call parks until [`Notify::notify_one`] releases it, which lets a
/// test observe the `Loading` state or race two submissions.
#[derive(Debug)]
pub struct ScriptedClient {
    queue: Mutex<VecDeque<Result<String, GenerationError>>>,
    fallback: Result<String, GenerationError>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_fallback(Ok(text.into()))
    }

    pub fn failing(err: GenerationError) -> Self {
        Self::with_fallback(Err(err))
    }

    fn with_fallback(fallback: Result<String, GenerationError>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            gate: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queues one reply ahead of the fallback.
    pub fn then(self, reply: Result<String, GenerationError>) -> Self {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(reply);
        }
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|prompts| prompts.clone()).unwrap_or_default()
    }

    fn next_reply(&self) -> Result<String, GenerationError> {
        self.queue
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl GenerationClient for ScriptedClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(prompt.to_owned());
            }
            let reply = self.next_reply();
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            reply
        })
    }
}
