// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One conversion: prompt, generate, extract, repair.
//!
//! A conversion never fails. Provider errors are absorbed into one of two fallback diagrams and
//! flagged on the result so callers can tell the user.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use crate::format::mermaid::{check_flowchart, extract, repair};
use crate::generate::{GenerationClient, GenerationError};
use crate::model::{AlgorithmText, DiagramSource};
use crate::prompt::build_prompt;

const MINIMAL_FALLBACK: &str = r#"flowchart TD
    Start([Start])
    Process["Process Algorithm"]
    End([End])
    Start --> Process
    Process --> End"#;

const DETAILED_FALLBACK: &str = r"flowchart TD
    Start([Start])
    Input[/Read Input/]
    Process[Process Algorithm]
    Output[\Show Result\]
    End([End])
    Start --> Input
    Input --> Process
    Process --> Output
    Output --> End";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackKind {
    /// Start, process, end. The provider could not be reached or refused the call.
    Minimal,
    /// Start, input, process, output, end. The provider answered without a diagram.
    Detailed,
}

impl FallbackKind {
    pub fn for_error(err: &GenerationError) -> Self {
        if err.is_empty_response() {
            Self::Detailed
        } else {
            Self::Minimal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Detailed => "detailed",
        }
    }
}

impl fmt::Display for FallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn fallback_diagram(kind: FallbackKind) -> DiagramSource {
    match kind {
        FallbackKind::Minimal => repair(MINIMAL_FALLBACK),
        FallbackKind::Detailed => repair(DETAILED_FALLBACK),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub diagram: DiagramSource,
    /// Raw provider text, kept for debugging. `None` when no response arrived.
    pub full_response: Option<String>,
    pub fallback: Option<FallbackKind>,
}

impl Conversion {
    fn fallback(kind: FallbackKind, full_response: Option<String>) -> Self {
        Self { diagram: fallback_diagram(kind), full_response, fallback: Some(kind) }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

#[derive(Clone)]
pub struct Converter {
    client: Arc<dyn GenerationClient>,
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").finish_non_exhaustive()
    }
}

impl Converter {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    pub async fn convert(&self, text: &AlgorithmText) -> Conversion {
        let prompt = build_prompt(text);
        info!(words = text.word_count(); "converting algorithm description");

        let raw = match self.client.generate(&prompt).await {
            Ok(raw) => raw,
            Err(err) => {
                let kind = FallbackKind::for_error(&err);
                warn!(err:err, fallback:% = kind; "generation failed, using fallback diagram");
                return Conversion::fallback(kind, None);
            }
        };
        debug!(raw = raw.as_str(); "raw model response");

        let candidate = extract(&raw);
        let diagram = repair(&candidate);
        debug!(code = diagram.as_str(); "repaired diagram");

        if diagram.statements().next().is_none() {
            warn!("model response carried no diagram statements, using fallback diagram");
            return Conversion::fallback(FallbackKind::Detailed, Some(raw));
        }
        if let Err(err) = check_flowchart(diagram.as_str()) {
            warn!(err:err; "repaired diagram still fails the strict check");
        }

        Conversion { diagram, full_response: Some(raw), fallback: None }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{fallback_diagram, Converter, FallbackKind};
    use crate::format::mermaid::check_flowchart;
    use crate::generate::mock::ScriptedClient;
    use crate::generate::GenerationError;
    use crate::model::AlgorithmText;
    use rstest::rstest;

    fn text() -> AlgorithmText {
        AlgorithmText::new("Read n. If n is even print even, else print odd.").expect("text")
    }

    #[tokio::test]
    async fn repairs_fenced_response() {
        let raw = "Here you go:\n```mermaid\nflowchart TD\n  A[\"Read n\"] --> B{n % 2 == 0?}\n  B -- Yes --> C[\\Even\\]\n```";
        let client = Arc::new(ScriptedClient::replying(raw));
        let conversion = Converter::new(client.clone()).convert(&text()).await;

        assert_eq!(conversion.fallback, None);
        assert_eq!(conversion.full_response.as_deref(), Some(raw));
        assert_eq!(
            conversion.diagram.as_str(),
            "flowchart TD\nA[Read n] --> B{n % 2 == 0?}\nB -->|Yes| C[\\Even\\]"
        );
        assert_eq!(client.calls(), 1);
        assert!(client.prompts()[0].contains("If n is even print even"));
    }

    #[rstest]
    #[case(GenerationError::MissingCredential, FallbackKind::Minimal)]
    #[case(GenerationError::Timeout, FallbackKind::Minimal)]
    #[case(GenerationError::Status { status: 503, body: String::new() }, FallbackKind::Minimal)]
    #[case(GenerationError::EmptyResponse, FallbackKind::Detailed)]
    #[tokio::test]
    async fn provider_errors_become_fallbacks(
        #[case] err: GenerationError,
        #[case] expected: FallbackKind,
    ) {
        let conversion =
            Converter::new(Arc::new(ScriptedClient::failing(err))).convert(&text()).await;
        assert_eq!(conversion.fallback, Some(expected));
        assert_eq!(conversion.full_response, None);
        assert_eq!(conversion.diagram, fallback_diagram(expected));
    }

    #[tokio::test]
    async fn prose_only_response_uses_detailed_fallback() {
        let client = ScriptedClient::replying("Sorry, I can only help with algorithms.");
        let conversion = Converter::new(Arc::new(client)).convert(&text()).await;
        assert_eq!(conversion.fallback, Some(FallbackKind::Detailed));
        assert!(conversion.full_response.is_some());
    }

    #[test]
    fn fallback_diagrams_are_canonical() {
        let minimal = fallback_diagram(FallbackKind::Minimal);
        assert_eq!(
            minimal.as_str(),
            "flowchart TD\nStart([Start])\nProcess[Process Algorithm]\nEnd([End])\nStart --> Process\nProcess --> End"
        );
        let detailed = check_flowchart(fallback_diagram(FallbackKind::Detailed).as_str())
            .expect("detailed fallback checks");
        assert_eq!(detailed.nodes.len(), 5);
        assert_eq!(detailed.edges.len(), 4);
    }
}
