// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use regex::Regex;

fn fenced_block_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // The language tag only counts when a newline follows it, so ```flowchart TD ...``` keeps
    // its root keyword.
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)```(?:[A-Za-z0-9_+-]*[ \t]*\r?\n)?(.*?)```").expect("valid fence regex")
    })
}

fn open_fence_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)```(?:[A-Za-z0-9_+-]*[ \t]*\r?\n)?(.*)").expect("valid open fence regex")
    })
}

fn root_keyword_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)\b(?:flowchart|graph)[ \t]+(?:TD|TB|BT|LR|RL)\b")
            .expect("valid root keyword regex")
    })
}

/// Pulls the diagram candidate out of a raw model response.
///
/// The first fenced block wins over surrounding prose; an unterminated fence is read to the end.
/// Inside the candidate, text before the first root keyword is discarded. Text without any root
/// keyword passes through trimmed, and the repair chain decides what survives.
pub fn extract(raw: &str) -> String {
    let mut candidate = raw.trim();

    if let Some(caps) = fenced_block_regex().captures(candidate) {
        if let Some(inner) = caps.get(1) {
            candidate = inner.as_str().trim();
        }
    } else if let Some(caps) = open_fence_regex().captures(candidate) {
        if let Some(inner) = caps.get(1) {
            candidate = inner.as_str().trim();
        }
    }

    if let Some(found) = root_keyword_regex().find(candidate) {
        candidate = &candidate[found.start()..];
    }

    candidate.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::extract;
    use rstest::rstest;

    #[rstest]
    #[case("```mermaid\nflowchart TD\nA --> B\n```", "flowchart TD\nA --> B")]
    #[case("Sure! Here it is:\n```\nflowchart LR\nA --> B\n```\nHope this helps.", "flowchart LR\nA --> B")]
    #[case("```flowchart TD\nA --> B```", "flowchart TD\nA --> B")]
    #[case("```mermaid\nflowchart TD\nA --> B", "flowchart TD\nA --> B")]
    #[case("Diagram follows.\nflowchart TD\nA --> B", "flowchart TD\nA --> B")]
    #[case("Graph TD\nA --> B", "Graph TD\nA --> B")]
    #[case("  A --> B  ", "A --> B")]
    #[case("", "")]
    fn extracts_candidate(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(extract(raw), expected);
    }

    #[test]
    fn first_fenced_block_wins() {
        let raw = "```mermaid\nflowchart TD\nA --> B\n```\n```mermaid\nflowchart TD\nC --> D\n```";
        assert_eq!(extract(raw), "flowchart TD\nA --> B");
    }
}
