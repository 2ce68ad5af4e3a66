// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core value types shared by the pipeline.
//!
//! User input enters as [`AlgorithmText`], leaves as [`DiagramSource`]; the flowchart vocabulary
//! ([`ShapeKind`], [`Direction`]) is shared by the prompt template and the repair chain.

pub mod shape;
pub mod source;
pub mod text;

pub use shape::{Direction, ParseDirectionError, ShapeKind};
pub use source::DiagramSource;
pub use text::{AlgorithmText, ValidationError};
