// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MermaidIdentError {
    Empty,
    ContainsWhitespace,
    InvalidChar { ch: char },
    /// Lowercase `end` closes a subgraph and breaks the renderer when used as a node.
    Reserved,
}

impl fmt::Display for MermaidIdentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("must not be empty"),
            Self::ContainsWhitespace => f.write_str("must not contain whitespace"),
            Self::InvalidChar { ch } => write!(f, "contains invalid character: '{ch}'"),
            Self::Reserved => f.write_str("'end' is reserved"),
        }
    }
}

impl std::error::Error for MermaidIdentError {}

/// Node ids are ASCII letters and digits only.
pub(super) fn validate_mermaid_ident(ident: &str) -> Result<(), MermaidIdentError> {
    if ident.is_empty() {
        return Err(MermaidIdentError::Empty);
    }
    if ident.chars().any(char::is_whitespace) {
        return Err(MermaidIdentError::ContainsWhitespace);
    }
    if let Some(ch) = ident.chars().find(|c| !c.is_ascii_alphanumeric()) {
        return Err(MermaidIdentError::InvalidChar { ch });
    }
    if ident == "end" {
        return Err(MermaidIdentError::Reserved);
    }
    Ok(())
}

/// Drops everything [`validate_mermaid_ident`] would reject. May return an empty string.
pub(super) fn sanitize_mermaid_ident(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();
    if cleaned == "end" {
        "End".to_owned()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::{sanitize_mermaid_ident, validate_mermaid_ident, MermaidIdentError};
    use rstest::rstest;

    #[rstest]
    #[case("node-1", "node1")]
    #[case("my_node", "mynode")]
    #[case("Décision", "Dcision")]
    #[case("end", "End")]
    #[case("--", "")]
    fn sanitizes_to_alphanumerics(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(sanitize_mermaid_ident(raw), expected);
    }

    #[test]
    fn validation_names_the_offending_character() {
        assert_eq!(validate_mermaid_ident("A1"), Ok(()));
        assert_eq!(validate_mermaid_ident(""), Err(MermaidIdentError::Empty));
        assert_eq!(validate_mermaid_ident("a b"), Err(MermaidIdentError::ContainsWhitespace));
        assert_eq!(validate_mermaid_ident("a_b"), Err(MermaidIdentError::InvalidChar { ch: '_' }));
        assert_eq!(validate_mermaid_ident("end"), Err(MermaidIdentError::Reserved));
        assert_eq!(validate_mermaid_ident("End"), Ok(()));
    }
}
