// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;

use crate::model::{AlgorithmText, ShapeKind};

/// Labels longer than this tend to overflow the rendered shapes.
pub const MAX_LABEL_CHARS: usize = 18;

const WORKED_EXAMPLE: &str = r"flowchart TD
    Start([Start])
    Input1[/Get Material Name/]
    Process1[Convert to Lowercase]
    Decision1{In Ductile List?}
    Output1[\Return Ductile\]
    Decision2{In Brittle List?}
    Output2[\Return Brittle\]
    Output3[\Return Unknown\]
    End([End])

    Start --> Input1
    Input1 --> Process1
    Process1 --> Decision1
    Decision1 -->|Yes| Output1
    Decision1 -->|No| Decision2
    Decision2 -->|Yes| Output2
    Decision2 -->|No| Output3
    Output1 --> End
    Output2 --> End
    Output3 --> End";

fn example_label(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Terminal => "Start",
        ShapeKind::Input => "Input Text",
        ShapeKind::Output => "Output Text",
        ShapeKind::Process => "Process Step",
        ShapeKind::Decision => "Question?",
        ShapeKind::Storage => "Database",
    }
}

/// Embeds `text` into the fixed instruction template. Deterministic: equal input, equal prompt.
pub fn build_prompt(text: &AlgorithmText) -> String {
    let mut prompt = String::with_capacity(2048 + text.as_str().len());

    prompt.push_str(
        "You are an expert at converting algorithm descriptions into valid Mermaid flowchart \
         syntax using PROPER FLOWCHART SHAPES.\n\nMANDATORY SHAPE RULES:\n",
    );
    for (idx, kind) in ShapeKind::ALL.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}. {}: {} - {}",
            idx + 1,
            kind.role(),
            kind.wrap(example_label(*kind)),
            kind.name()
        );
    }

    prompt.push_str("\nCRITICAL SYNTAX RULES:\n");
    let rules = [
        "Use ONLY \"flowchart TD\" format".to_owned(),
        "Node IDs: simple letters/numbers (A, B, C1, Input1, etc.)".to_owned(),
        "NO quotes around text".to_owned(),
        "Decision branches: D -->|Yes| E or D -->|No| F".to_owned(),
        format!("Keep labels under {MAX_LABEL_CHARS} characters"),
        "NO special characters in node IDs".to_owned(),
    ];
    for (idx, rule) in rules.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {rule}", idx + 1);
    }

    prompt.push_str("\nCORRECT EXAMPLE:\n");
    prompt.push_str(WORKED_EXAMPLE);
    prompt.push_str("\n\nConvert this algorithm using EXACT shape conventions:\n");
    prompt.push_str(text.as_str());
    prompt.push_str(
        "\n\nReturn ONLY valid Mermaid flowchart code. NO explanations, NO markdown blocks.\n",
    );
    prompt
}
