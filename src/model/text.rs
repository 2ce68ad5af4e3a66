// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// Input rejected before any generation call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("algorithm text is required")]
    Empty,
    #[error("text does not look like an algorithm description")]
    NotAnAlgorithm,
}

/// A user-supplied algorithm description.
///
/// Only enforces that the text is non-empty once surrounding whitespace is ignored; the text
/// itself is kept verbatim so the prompt sees exactly what the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlgorithmText {
    value: String,
}

impl AlgorithmText {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty);
        }
        Ok(Self { value })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    pub fn word_count(&self) -> usize {
        self.value.split_whitespace().count()
    }
}

impl fmt::Display for AlgorithmText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for AlgorithmText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
