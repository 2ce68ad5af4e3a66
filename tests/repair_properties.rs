// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Properties the repair chain promises for any input, checked on text stitched together from
//! the pieces model replies are made of.

use algoflow::format::mermaid::{check_flowchart, repair};
use proptest::prelude::*;

const IDS: &[&str] = &["A", "B", "C", "node-1", "node_2", "end", "x1", "Check"];

const SHAPE_PIECES: &[&str] = &[
    "[", "]", "(", ")", "{", "}", "[[", "]]", "((", "))", "{{", "}}", "([", "])", "[(", ")]", "[/",
    "/]", "[\\", "\\]",
];

const OPENERS: &[&str] = &["[", "(", "{", "[[", "((", "{{", "([", "[(", "[/", "[\\"];

const LABELS: &[&str] = &["Read n", "n / 2", "done?", "x (y)", "/home/", "C:\\"];

const SEPARATORS: &[&str] = &["\n", "; ", " & "];

const ARROWS: &[&str] = &[
    "-->", "->", "---", "-.->", "==>", "--", "==", "--o", "--x", "<-->", "-- yes -->", "|", "|No|",
];

const NOISE: &[&str] = &[
    " ", "  ", "\n", "\"", "\u{201C}", "\u{201D}", "`", "\\\"", ",", ":", ";", "&", "/", "\\", "?",
    ">", "#", "%%", ":::hot", "Start", "is n > 0", "Go to", "C:\\", "flowchart TD", "graph LR",
    "subgraph", "style", "```",
];

fn fragment() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        3 => prop::sample::select(IDS),
        3 => prop::sample::select(SHAPE_PIECES),
        2 => prop::sample::select(ARROWS),
        3 => prop::sample::select(NOISE),
    ]
}

fn messy_source() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..40).prop_map(|pieces| pieces.concat())
}

/// Well-formed statements with the usual defects mixed in.
fn messy_chart() -> impl Strategy<Value = String> {
    let node = (
        prop::sample::select(IDS),
        prop::sample::select(OPENERS),
        prop::sample::select(LABELS),
    )
        .prop_map(|(id, open, label)| format!("{id}{open}{label}{}", close_for(open)));
    let separator = prop::sample::select(SEPARATORS);
    prop::collection::vec((node, prop::sample::select(ARROWS), separator), 1..8).prop_map(
        |statements| {
            let mut out = String::from("graph TD;");
            for (node, arrow, separator) in statements {
                out.push_str(separator);
                out.push_str(&node);
                out.push(' ');
                out.push_str(arrow);
            }
            out.push_str(" B");
            out
        },
    )
}

fn close_for(open: &str) -> String {
    open.chars()
        .rev()
        .map(|c| match c {
            '[' => ']',
            '(' => ')',
            '{' => '}',
            other => other,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn repair_is_idempotent(input in messy_source()) {
        let once = repair(&input);
        prop_assert_eq!(repair(once.as_str()), once);
    }

    #[test]
    fn repaired_source_passes_the_strict_check(input in messy_source()) {
        let repaired = repair(&input);
        let summary = check_flowchart(repaired.as_str());
        prop_assert!(summary.is_ok(), "{:?} repaired to {:?}: {:?}", input, repaired, summary);
    }

    #[test]
    fn charts_keep_alphanumeric_ids_and_stay_fixed(input in messy_chart()) {
        let repaired = repair(&input);
        let summary = check_flowchart(repaired.as_str())
            .map_err(|err| TestCaseError::fail(format!("{repaired:?}: {err}")))?;
        prop_assert!(summary
            .nodes
            .keys()
            .all(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())));
        prop_assert_eq!(repair(repaired.as_str()), repaired);
    }
}
