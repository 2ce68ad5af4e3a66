// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram text handling.
//!
//! Currently this module only covers Mermaid flowcharts: pulling a candidate out of a model
//! response, repairing it, and strictly checking the result.

pub mod mermaid;
