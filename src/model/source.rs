// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::Serialize;

/// Flowchart source that went through the repair chain.
///
/// There is no public constructor: the only way to obtain one is
/// [`crate::format::mermaid::repair`], so holding a `DiagramSource` means the text has been
/// normalized into the renderer grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DiagramSource(String);

impl DiagramSource {
    pub(crate) fn from_repaired(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Lines after the root declaration.
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.0.lines().skip(1)
    }
}

impl fmt::Display for DiagramSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DiagramSource {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
