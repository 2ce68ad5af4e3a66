// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use super::ident::validate_mermaid_ident;
pub use super::ident::MermaidIdentError;
use super::repair::ILLEGAL_LABEL_CHARS;

use crate::model::{Direction, ShapeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MermaidFlowchartCheckError {
    MissingHeader,
    InvalidDirection {
        line_no: usize,
        direction: String,
    },
    UnsupportedSyntax {
        line_no: usize,
        line: String,
    },
    InvalidNodeId {
        line_no: usize,
        name: String,
        reason: MermaidIdentError,
    },
    NonCanonicalShape {
        line_no: usize,
        token: String,
    },
    EmptyNodeLabel {
        line_no: usize,
        token: String,
    },
    EmptyEdgeLabel {
        line_no: usize,
        line: String,
    },
    IllegalLabelChar {
        line_no: usize,
        label: String,
        ch: char,
    },
    QuotationMark {
        line_no: usize,
    },
    ConflictingNodeShape {
        line_no: usize,
        mermaid_id: String,
        existing_shape: ShapeKind,
        new_shape: ShapeKind,
    },
}

impl fmt::Display for MermaidFlowchartCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => {
                f.write_str("expected 'flowchart <direction>' as the first non-empty line")
            }
            Self::InvalidDirection { line_no, direction } => write!(
                f,
                "invalid flowchart direction on line {line_no}: {direction} (expected TD/TB/LR/RL/BT)"
            ),
            Self::UnsupportedSyntax { line_no, line } => {
                write!(f, "unsupported flowchart syntax on line {line_no}: {line}")
            }
            Self::InvalidNodeId { line_no, name, reason } => {
                write!(f, "invalid node id on line {line_no}: {name} ({reason})")
            }
            Self::NonCanonicalShape { line_no, token } => write!(
                f,
                "non-canonical node shape on line {line_no}: {token} (expected one of ([..]) [/../] [\\..\\] [..] {{..}} [(..)])"
            ),
            Self::EmptyNodeLabel { line_no, token } => {
                write!(f, "empty node label on line {line_no}: {token}")
            }
            Self::EmptyEdgeLabel { line_no, line } => {
                write!(f, "empty edge label on line {line_no}: {line}")
            }
            Self::IllegalLabelChar { line_no, label, ch } => {
                write!(f, "label on line {line_no} contains '{ch}': {label:?}")
            }
            Self::QuotationMark { line_no } => {
                write!(f, "quotation mark on line {line_no}")
            }
            Self::ConflictingNodeShape { line_no, mermaid_id, existing_shape, new_shape } => {
                write!(
                    f,
                    "conflicting shape for node '{mermaid_id}' on line {line_no}: {existing_shape} vs {new_shape}"
                )
            }
        }
    }
}

impl std::error::Error for MermaidFlowchartCheckError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNodeSummary {
    pub shape: ShapeKind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowEdgeSummary {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

/// What a chart that passed [`check_flowchart`] contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowchartSummary {
    pub direction: Direction,
    pub nodes: BTreeMap<String, FlowNodeSummary>,
    pub edges: Vec<FlowEdgeSummary>,
}

fn is_edge_op_start_char(ch: char) -> bool {
    matches!(ch, '<' | '-' | '=' | '.')
}

fn is_edge_op_char(ch: char) -> bool {
    matches!(ch, '<' | '>' | '-' | '=' | '.')
}

/// Splits at the first edge operator that sits outside a shape literal.
fn split_once_edge_operator(line: &str) -> Option<(&str, &str, &str)> {
    let mut in_label: Option<char> = None;
    let mut op_start: Option<usize> = None;

    for (idx, ch) in line.char_indices() {
        if let Some(close) = in_label {
            if ch == close {
                in_label = None;
            }
            continue;
        }

        match ch {
            '[' => in_label = Some(']'),
            '(' => in_label = Some(')'),
            '{' => in_label = Some('}'),
            _ => {}
        }

        if in_label.is_some() {
            continue;
        }

        if is_edge_op_start_char(ch) {
            op_start = Some(idx);
            break;
        }
    }

    let start = op_start?;
    let end = line[start..]
        .char_indices()
        .find(|&(_, ch)| !is_edge_op_char(ch))
        .map(|(idx, _)| start + idx)
        .unwrap_or(line.len());

    Some((&line[..start], &line[start..end], &line[end..]))
}

fn check_label(label: &str, line_no: usize) -> Result<(), MermaidFlowchartCheckError> {
    if let Some(ch) = label.chars().find(|c| ILLEGAL_LABEL_CHARS.contains(c)) {
        return Err(MermaidFlowchartCheckError::IllegalLabelChar {
            line_no,
            label: label.to_owned(),
            ch,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeSpec {
    mermaid_id: String,
    shape: Option<(ShapeKind, String)>,
}

const LABEL_EDGE_SLASHES: [char; 2] = ['/', '\\'];

/// Shapes sharing an opening bracket are tried longest spelling first.
const SHAPE_MATCH_ORDER: [ShapeKind; 6] = [
    ShapeKind::Terminal,
    ShapeKind::Storage,
    ShapeKind::Input,
    ShapeKind::Output,
    ShapeKind::Process,
    ShapeKind::Decision,
];

fn parse_node_spec(token: &str, line_no: usize) -> Result<NodeSpec, MermaidFlowchartCheckError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(MermaidFlowchartCheckError::UnsupportedSyntax {
            line_no,
            line: token.to_owned(),
        });
    }

    let open_idx = trimmed.find(['[', '(', '{']);
    let id_raw = &trimmed[..open_idx.unwrap_or(trimmed.len())];
    validate_mermaid_ident(id_raw).map_err(|reason| MermaidFlowchartCheckError::InvalidNodeId {
        line_no,
        name: id_raw.to_owned(),
        reason,
    })?;

    let Some(open_idx) = open_idx else {
        return Ok(NodeSpec { mermaid_id: id_raw.to_owned(), shape: None });
    };

    let literal = &trimmed[open_idx..];
    let non_canonical =
        || MermaidFlowchartCheckError::NonCanonicalShape { line_no, token: trimmed.to_owned() };

    let (kind, label) = SHAPE_MATCH_ORDER
        .iter()
        .find_map(|kind| {
            let label = literal.strip_prefix(kind.open())?.strip_suffix(kind.close())?;
            Some((*kind, label))
        })
        .ok_or_else(non_canonical)?;

    if label != label.trim() {
        return Err(non_canonical());
    }
    // `/]`, `\]` and friends are trapezoid delimiters to the renderer.
    if label.starts_with(LABEL_EDGE_SLASHES) || label.ends_with(LABEL_EDGE_SLASHES) {
        return Err(non_canonical());
    }
    if label.is_empty() {
        return Err(MermaidFlowchartCheckError::EmptyNodeLabel {
            line_no,
            token: trimmed.to_owned(),
        });
    }
    check_label(label, line_no)?;

    Ok(NodeSpec { mermaid_id: id_raw.to_owned(), shape: Some((kind, label.to_owned())) })
}

fn declare_node(
    nodes: &mut BTreeMap<String, FlowNodeSummary>,
    spec: NodeSpec,
    line_no: usize,
) -> Result<String, MermaidFlowchartCheckError> {
    let NodeSpec { mermaid_id, shape } = spec;

    let Some((kind, label)) = shape else {
        // A bare reference renders as a rectangle labelled with its id until declared.
        nodes.entry(mermaid_id.clone()).or_insert_with(|| FlowNodeSummary {
            shape: ShapeKind::Process,
            label: mermaid_id.clone(),
        });
        return Ok(mermaid_id);
    };

    match nodes.get_mut(&mermaid_id) {
        None => {
            nodes.insert(mermaid_id.clone(), FlowNodeSummary { shape: kind, label });
        }
        Some(existing) if existing.label == mermaid_id && existing.shape == ShapeKind::Process => {
            // implicit node from an earlier edge, upgrade to the explicit declaration.
            *existing = FlowNodeSummary { shape: kind, label };
        }
        Some(existing) if existing.shape != kind => {
            return Err(MermaidFlowchartCheckError::ConflictingNodeShape {
                line_no,
                mermaid_id,
                existing_shape: existing.shape,
                new_shape: kind,
            });
        }
        Some(existing) => existing.label = label,
    }

    Ok(mermaid_id)
}

/// Checks that `input` is already in the exact grammar the repair chain produces.
///
/// Accepted:
/// - `flowchart <TD|TB|BT|LR|RL>` as the first non-empty line
/// - node declarations using the six canonical shape spellings, or bare ids
/// - edges `<a> --> <b>`, optionally labelled `<a> -->|<label>| <b>`, chained on one line
///
/// Anything else (other arrows, quotes, directives, labels with delimiter characters) is
/// rejected with the offending line.
pub fn check_flowchart(input: &str) -> Result<FlowchartSummary, MermaidFlowchartCheckError> {
    let mut direction: Option<Direction> = None;
    let mut nodes = BTreeMap::<String, FlowNodeSummary>::new();
    let mut edges = Vec::<FlowEdgeSummary>::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.contains(['"', '\u{201C}', '\u{201D}']) {
            return Err(MermaidFlowchartCheckError::QuotationMark { line_no });
        }

        if direction.is_none() {
            let mut parts = trimmed.split_whitespace();
            if parts.next() != Some("flowchart") {
                return Err(MermaidFlowchartCheckError::MissingHeader);
            }
            let Some(raw_direction) = parts.next() else {
                return Err(MermaidFlowchartCheckError::MissingHeader);
            };
            let parsed = match raw_direction {
                "TD" | "TB" | "BT" | "LR" | "RL" => raw_direction.parse::<Direction>().ok(),
                _ => None,
            };
            let Some(parsed) = parsed else {
                return Err(MermaidFlowchartCheckError::InvalidDirection {
                    line_no,
                    direction: raw_direction.to_owned(),
                });
            };
            if parts.next().is_some() {
                return Err(MermaidFlowchartCheckError::UnsupportedSyntax {
                    line_no,
                    line: trimmed.to_owned(),
                });
            }
            direction = Some(parsed);
            continue;
        }

        let unsupported =
            || MermaidFlowchartCheckError::UnsupportedSyntax { line_no, line: trimmed.to_owned() };

        let Some((first_raw, first_op, tail)) = split_once_edge_operator(trimmed) else {
            let spec = parse_node_spec(trimmed, line_no)?;
            declare_node(&mut nodes, spec, line_no)?;
            continue;
        };

        let mut current = declare_node(&mut nodes, parse_node_spec(first_raw, line_no)?, line_no)?;
        let mut op = first_op;
        let mut rest = tail;

        loop {
            if op != "-->" {
                return Err(unsupported());
            }

            let mut label: Option<String> = None;
            let rhs_and_more = if let Some(after) = rest.strip_prefix('|') {
                let end_idx = after.find('|').ok_or_else(unsupported)?;
                let raw_label = &after[..end_idx];
                if raw_label.trim().is_empty() {
                    return Err(MermaidFlowchartCheckError::EmptyEdgeLabel {
                        line_no,
                        line: trimmed.to_owned(),
                    });
                }
                check_label(raw_label, line_no)?;
                label = Some(raw_label.to_owned());
                &after[end_idx + 1..]
            } else {
                rest
            };

            let (rhs_raw, next) = match split_once_edge_operator(rhs_and_more) {
                Some((rhs_raw, next_op, next_rest)) => (rhs_raw, Some((next_op, next_rest))),
                None => (rhs_and_more, None),
            };
            let rhs = declare_node(&mut nodes, parse_node_spec(rhs_raw, line_no)?, line_no)?;
            edges.push(FlowEdgeSummary { from: current, to: rhs.clone(), label });

            let Some((next_op, next_rest)) = next else {
                break;
            };
            current = rhs;
            op = next_op;
            rest = next_rest;
        }
    }

    let direction = direction.ok_or(MermaidFlowchartCheckError::MissingHeader)?;
    Ok(FlowchartSummary { direction, nodes, edges })
}

#[cfg(test)]
mod tests {
    use super::{check_flowchart, MermaidFlowchartCheckError};
    use crate::model::{Direction, ShapeKind};
    use rstest::rstest;

    #[test]
    fn accepts_canonical_chart() {
        let input = [
            "flowchart LR",
            "Start([Start]) --> Read[/Read n/]",
            "Read --> Check{n > 0?}",
            r"Check -->|Yes| Show[\Print n\]",
            "Check -->|No| Save[(Log)] --> Stop([End])",
            "Show --> Stop",
        ]
        .join("\n");

        let summary = check_flowchart(&input).expect("check");
        assert_eq!(summary.direction, Direction::LeftRight);
        assert_eq!(summary.nodes.len(), 6);
        assert_eq!(summary.nodes["Read"].shape, ShapeKind::Input);
        assert_eq!(summary.nodes["Save"].shape, ShapeKind::Storage);
        assert_eq!(summary.nodes["Stop"].label, "End");
        assert_eq!(summary.edges.len(), 6);
        assert_eq!(summary.edges[2].label.as_deref(), Some("Yes"));
        assert_eq!(summary.edges[4].from, "Save");
    }

    #[test]
    fn implicit_node_upgrades_to_declaration() {
        let summary = check_flowchart("flowchart TD\nA --> B\nB{Done?}").expect("check");
        assert_eq!(summary.nodes["A"].label, "A");
        assert_eq!(summary.nodes["B"].shape, ShapeKind::Decision);
    }

    #[rstest]
    #[case("A --> B", MermaidFlowchartCheckError::MissingHeader)]
    #[case("graph TD\nA --> B", MermaidFlowchartCheckError::MissingHeader)]
    #[case(
        "flowchart XY",
        MermaidFlowchartCheckError::InvalidDirection { line_no: 1, direction: "XY".to_owned() }
    )]
    #[case("flowchart TD\nA[\"x\"]", MermaidFlowchartCheckError::QuotationMark { line_no: 2 })]
    #[case(
        "flowchart TD\nA ==> B",
        MermaidFlowchartCheckError::UnsupportedSyntax { line_no: 2, line: "A ==> B".to_owned() }
    )]
    #[case(
        "flowchart TD\nA((x))",
        MermaidFlowchartCheckError::NonCanonicalShape { line_no: 2, token: "A((x))".to_owned() }
    )]
    #[case(
        "flowchart TD\nA[Open /home/]",
        MermaidFlowchartCheckError::NonCanonicalShape {
            line_no: 2,
            token: "A[Open /home/]".to_owned()
        }
    )]
    #[case(
        "flowchart TD\nA[Path C\\]",
        MermaidFlowchartCheckError::NonCanonicalShape {
            line_no: 2,
            token: r"A[Path C\]".to_owned()
        }
    )]
    #[case(
        "flowchart TD\nS([Go to /])",
        MermaidFlowchartCheckError::NonCanonicalShape {
            line_no: 2,
            token: "S([Go to /])".to_owned()
        }
    )]
    #[case(
        "flowchart TD\nA[]",
        MermaidFlowchartCheckError::EmptyNodeLabel { line_no: 2, token: "A[]".to_owned() }
    )]
    #[case(
        "flowchart TD\nA[a, b]",
        MermaidFlowchartCheckError::IllegalLabelChar { line_no: 2, label: "a, b".to_owned(), ch: ',' }
    )]
    fn rejects_non_canonical_input(
        #[case] input: &str,
        #[case] expected: MermaidFlowchartCheckError,
    ) {
        assert_eq!(check_flowchart(input), Err(expected));
    }

    #[test]
    fn rejects_bad_ids_and_conflicting_shapes() {
        let err = check_flowchart("flowchart TD\nnode_1[x]").unwrap_err();
        assert!(matches!(err, MermaidFlowchartCheckError::InvalidNodeId { .. }));

        let err = check_flowchart("flowchart TD\nA[x]\nA{x}").unwrap_err();
        assert!(matches!(err, MermaidFlowchartCheckError::ConflictingNodeShape { .. }));
    }
}
