// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Algoflow: algorithm descriptions in, renderable Mermaid flowcharts out.
//!
//! A description is gated by [`classify`], turned into a prompt by [`prompt`], sent to a
//! [`generate::GenerationClient`], and the answer is extracted and repaired by
//! [`format::mermaid`]. [`convert`] ties one pass together; [`session`] tracks the request
//! lifecycle and [`server`] exposes both over HTTP.

pub mod classify;
pub mod config;
pub mod convert;
pub mod format;
pub mod generate;
pub mod model;
pub mod prompt;
pub mod server;
pub mod session;
