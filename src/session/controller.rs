// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::{watch, Mutex};

use super::{Session, SessionSnapshot, Transition, TransitionError};
use crate::classify::Classifier;
use crate::convert::Converter;
use crate::model::AlgorithmText;

/// Drives the shared [`Session`] through the conversion pipeline.
///
/// Each transition is applied under the session mutex and published on a watch channel. The
/// mutex is not held across the generation call.
#[derive(Debug, Clone)]
pub struct SessionController {
    session: Arc<Mutex<Session>>,
    converter: Converter,
    classifier: Arc<Classifier>,
    updates: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionController {
    pub fn new(converter: Converter, classifier: Classifier) -> Self {
        let (updates, _) = watch::channel(SessionSnapshot::default());
        Self {
            session: Arc::new(Mutex::new(Session::default())),
            converter,
            classifier: Arc::new(classifier),
            updates: Arc::new(updates),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    fn commit(&self, session: &mut Session, transition: Transition) -> Result<(), TransitionError> {
        let next = session.apply(transition)?;
        *session = next;
        let snapshot = session.snapshot();
        debug!(state:% = snapshot.state, generation = snapshot.generation; "session transition");
        self.updates.send_replace(snapshot);
        Ok(())
    }

    /// Gates `text`, then converts it. Rejected text fails without a generation call.
    ///
    /// A result that was superseded by a later submit or clear while generating is dropped; the
    /// returned snapshot then shows whatever the session moved on to.
    pub async fn submit(&self, text: impl Into<String>) -> SessionSnapshot {
        let started = {
            let mut session = self.session.lock().await;
            let transition = Transition::submit(text, &self.classifier);
            let begun = match &transition {
                Transition::Begin(text) => Some(text.clone()),
                _ => None,
            };
            // Begin and Reject apply from every state.
            if let Err(err) = self.commit(&mut session, transition) {
                debug!(err:err; "submit not applied");
            }
            match begun {
                Some(text) => (session.generation(), text),
                None => return session.snapshot(),
            }
        };

        self.resolve(started).await
    }

    async fn resolve(&self, (generation, text): (u64, AlgorithmText)) -> SessionSnapshot {
        let conversion = self.converter.convert(&text).await;
        let fallback = conversion.fallback;

        let mut session = self.session.lock().await;
        match self.commit(&mut session, Transition::Resolve { generation, conversion }) {
            Ok(()) => {
                info!(generation, fallback:? = fallback; "diagram ready");
            }
            Err(err) => {
                info!(err:err; "discarding conversion result");
            }
        }
        session.snapshot()
    }

    /// Clears, then submits the previously stored text again.
    pub async fn regenerate(&self) -> SessionSnapshot {
        let text = {
            let mut session = self.session.lock().await;
            let text = session.algorithm_text().to_owned();
            if let Err(err) = self.commit(&mut session, Transition::Clear) {
                debug!(err:err; "clear not applied");
            }
            text
        };
        self.submit(text).await
    }

    pub async fn clear(&self) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        if let Err(err) = self.commit(&mut session, Transition::Clear) {
            debug!(err:err; "clear not applied");
        }
        session.snapshot()
    }

    /// Records that the consumer could not render the current diagram.
    pub async fn report_render_error(
        &self,
        message: impl Into<String>,
    ) -> Result<SessionSnapshot, TransitionError> {
        let mut session = self.session.lock().await;
        self.commit(&mut session, Transition::RenderFailed(message.into()))?;
        Ok(session.snapshot())
    }
}
