// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mermaid flowchart extraction, repair and checking.

mod extract;
pub mod flowchart;
mod ident;
pub mod repair;
mod scan;

pub use extract::extract;
pub use ident::MermaidIdentError;
pub use flowchart::{
    check_flowchart, FlowEdgeSummary, FlowNodeSummary, FlowchartSummary,
    MermaidFlowchartCheckError,
};
pub use repair::{repair, RepairRule, REPAIR_RULES};
