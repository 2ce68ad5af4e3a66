// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

/// The six flowchart node shapes, each with exactly one canonical spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    /// Oval, `([label])`.
    Terminal,
    /// Left-slant parallelogram, `[/label/]`.
    Input,
    /// Right-slant parallelogram, `[\label\]`.
    Output,
    /// Rectangle, `[label]`.
    Process,
    /// Diamond, `{label}`.
    Decision,
    /// Cylinder, `[(label)]`.
    Storage,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        Self::Terminal,
        Self::Input,
        Self::Output,
        Self::Process,
        Self::Decision,
        Self::Storage,
    ];

    pub fn open(self) -> &'static str {
        match self {
            Self::Terminal => "([",
            Self::Input => "[/",
            Self::Output => "[\\",
            Self::Process => "[",
            Self::Decision => "{",
            Self::Storage => "[(",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            Self::Terminal => "])",
            Self::Input => "/]",
            Self::Output => "\\]",
            Self::Process => "]",
            Self::Decision => "}",
            Self::Storage => ")]",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Terminal => "oval",
            Self::Input => "parallelogram (left slant)",
            Self::Output => "parallelogram (right slant)",
            Self::Process => "rectangle",
            Self::Decision => "diamond",
            Self::Storage => "cylinder",
        }
    }

    /// What the shape stands for in the flowchart convention.
    pub fn role(self) -> &'static str {
        match self {
            Self::Terminal => "Start/End",
            Self::Input => "Input",
            Self::Output => "Output",
            Self::Process => "Process",
            Self::Decision => "Decision",
            Self::Storage => "Storage/Database",
        }
    }

    /// Renders `label` in this shape's canonical spelling.
    pub fn wrap(self, label: &str) -> String {
        let mut out = String::with_capacity(label.len() + 4);
        out.push_str(self.open());
        out.push_str(label);
        out.push_str(self.close());
        out
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Flowchart layout orientation from the root declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    TopDown,
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopDown => "TD",
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid flowchart direction: {0} (expected TD/TB/BT/LR/RL)")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Case-insensitive, so model output like `flowchart td` still resolves.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TD" => Ok(Self::TopDown),
            "TB" => Ok(Self::TopBottom),
            "BT" => Ok(Self::BottomTop),
            "LR" => Ok(Self::LeftRight),
            "RL" => Ok(Self::RightLeft),
            _ => Err(ParseDirectionError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, ShapeKind};

    #[test]
    fn wraps_in_canonical_delimiters() {
        assert_eq!(ShapeKind::Terminal.wrap("Start"), "([Start])");
        assert_eq!(ShapeKind::Input.wrap("Read n"), "[/Read n/]");
        assert_eq!(ShapeKind::Output.wrap("Print n"), "[\\Print n\\]");
        assert_eq!(ShapeKind::Storage.wrap("Users"), "[(Users)]");
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("td".parse::<Direction>(), Ok(Direction::TopDown));
        assert_eq!("LR".parse::<Direction>(), Ok(Direction::LeftRight));
        assert!("XY".parse::<Direction>().is_err());
    }
}
