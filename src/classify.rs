// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Heuristic gate in front of the generation call.
//!
//! Text passes when it mentions a known algorithm or process term, uses a sequencing cue
//! ("step 2", "then", "finally", ...), or is long enough to plausibly describe a procedure.
//! Rejected text never reaches the model.

use std::sync::OnceLock;

use regex::Regex;

pub const DEFAULT_KEYWORDS: &[&str] = &[
    "algorithm",
    "sort",
    "search",
    "loop",
    "iterate",
    "function",
    "method",
    "procedure",
    "step",
    "process",
    "condition",
    "if",
    "else",
    "while",
    "for",
    "binary search",
    "bubble sort",
    "quick sort",
    "merge sort",
    "linear search",
    "depth first",
    "breadth first",
    "recursive",
    "dynamic programming",
    "flowchart",
    "diagram",
    "pseudocode",
    "input",
    "output",
    "variable",
    "array",
    "list",
    "tree",
    "graph",
    "node",
    "edge",
    "traversal",
    "implementation",
    "execute",
    "run",
    "compute",
    "calculate",
    "solve",
    "optimize",
    "efficient",
    "complexity",
    "big o",
    "time complexity",
    "space complexity",
    "data structure",
    "programming",
    "code",
    "logic",
    "sequence",
    "workflow",
    "automation",
    "processing",
];

/// Descriptions longer than this many words pass on length alone.
pub const LONG_DESCRIPTION_WORDS: usize = 15;

/// Why a text was accepted, in the order the checks run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    Keyword(String),
    SequencingCue,
    LongDescription,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub reason: Option<Reason>,
}

impl Classification {
    pub fn is_algorithm(&self) -> bool {
        self.reason.is_some()
    }
}

fn sequencing_cue_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)step\s*\d+|first|second|third|then|next|finally|lastly")
            .expect("valid sequencing cue regex")
    })
}

#[derive(Debug, Clone)]
pub struct Classifier {
    keywords: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_keywords(DEFAULT_KEYWORDS.iter().copied())
    }
}

impl Classifier {
    /// Replaces the vocabulary. Keywords are matched lowercase; blank entries are dropped.
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Substring matching throughout, so "for" also matches "format". No side effects.
    pub fn classify(&self, text: &str) -> Classification {
        let lowered = text.to_lowercase();

        if let Some(keyword) = self.keywords.iter().find(|keyword| lowered.contains(keyword.as_str()))
        {
            return Classification { reason: Some(Reason::Keyword(keyword.clone())) };
        }
        if sequencing_cue_regex().is_match(text) {
            return Classification { reason: Some(Reason::SequencingCue) };
        }
        if text.split_whitespace().count() > LONG_DESCRIPTION_WORDS {
            return Classification { reason: Some(Reason::LongDescription) };
        }
        Classification { reason: None }
    }
}
