// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The repair chain: an ordered list of named text rewrites that turns loosely formatted model
//! output into flowchart source the renderer accepts.
//!
//! Rule order is load-bearing. Later rules assume the shapes are already canonically spelled
//! (rule 3) and that labels no longer contain delimiter characters (rule 4). Running the whole
//! chain on its own output changes nothing.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use log::trace;
use regex::Regex;

use super::ident::{sanitize_mermaid_ident, validate_mermaid_ident};
use super::scan::{
    is_close_delim, is_open_delim, is_open_label_arrow, lex_text, render_segments, scan_line,
    Segment, ShapeLiteral, Token,
};
use crate::model::{DiagramSource, Direction, ShapeKind};

/// A single named rewrite step.
#[derive(Debug, Clone, Copy)]
pub struct RepairRule {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

pub const REPAIR_RULES: &[RepairRule] = &[
    RepairRule { name: "split_statements", apply: split_statements },
    RepairRule { name: "strip_quotes", apply: strip_quotes },
    RepairRule { name: "normalize_brackets", apply: normalize_brackets },
    RepairRule { name: "sanitize_labels", apply: sanitize_labels },
    RepairRule { name: "sanitize_node_ids", apply: sanitize_node_ids },
    RepairRule { name: "repair_edges", apply: repair_edges },
    RepairRule { name: "normalize_whitespace", apply: normalize_whitespace },
    RepairRule { name: "shape_document", apply: shape_document },
];

/// Characters the renderer cannot take inside a node or edge label.
pub const ILLEGAL_LABEL_CHARS: &[char] = &['(', ')', '[', ']', '{', '}', ',', ':', ';', '|'];

const QUOTE_CHARS: &[char] = &['"', '\u{201C}', '\u{201D}', '\u{201E}', '`'];

const DIRECTIVE_KEYWORDS: &[&str] =
    &["subgraph", "end", "classDef", "class", "style", "linkStyle", "click", "direction"];

/// Runs every rule in [`REPAIR_RULES`] over `candidate`.
///
/// Total: any input yields a document, in the worst case just the root declaration.
pub fn repair(candidate: &str) -> DiagramSource {
    let mut text = candidate.to_owned();
    for rule in REPAIR_RULES {
        let next = (rule.apply)(&text);
        if next != text {
            trace!(rule = rule.name; "repair rule rewrote candidate");
        }
        text = next;
    }
    DiagramSource::from_repaired(text)
}

/// Parses a root declaration (`flowchart TD`, `graph lr;`, bare `flowchart`).
pub(crate) fn parse_root_declaration(line: &str) -> Option<Direction> {
    let mut words = line.trim().trim_end_matches(';').split_whitespace();
    let keyword = words.next()?;
    if !keyword.eq_ignore_ascii_case("flowchart") && !keyword.eq_ignore_ascii_case("graph") {
        return None;
    }
    match (words.next(), words.next()) {
        (None, _) => Some(Direction::default()),
        (Some(direction), None) => direction.parse().ok(),
        _ => None,
    }
}

fn is_directive(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.starts_with("%%") {
        return true;
    }
    let first = trimmed.split_whitespace().next().unwrap_or("").trim_end_matches(';');
    DIRECTIVE_KEYWORDS.contains(&first)
}

/// Applies `f` to lines that can hold node or edge statements.
fn map_statement_lines(text: &str, f: impl Fn(&str) -> String) -> String {
    text.lines()
        .map(|line| {
            if parse_root_declaration(line).is_some() || is_directive(line) {
                line.to_owned()
            } else {
                f(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn map_segments(line: &str, mut f: impl FnMut(Segment) -> Segment) -> String {
    let segments: Vec<Segment> = scan_line(line).into_iter().map(&mut f).collect();
    render_segments(&segments)
}

/// Replaces illegal label characters with spaces, collapses whitespace and trims.
pub(crate) fn sanitize_label(label: &str) -> String {
    let replaced: String =
        label.chars().map(|c| if ILLEGAL_LABEL_CHARS.contains(&c) { ' ' } else { c }).collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn wrapped_quote_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r#"\(\[\s*"([^"\n]*)"\s*\]\)"#, "([${1}])"),
            (r#"\[\(\s*"([^"\n]*)"\s*\)\]"#, "[(${1})]"),
            (r#"\[/\s*"([^"\n]*)"\s*/\]"#, "[/${1}/]"),
            (r#"\[\\\s*"([^"\n]*)"\s*\\\]"#, r"[\${1}\]"),
            (r#"\[\s*"([^"\n]*)"\s*\]"#, "[${1}]"),
            (r#"\{\s*"([^"\n]*)"\s*\}"#, "{${1}}"),
            (r#"\(\s*"([^"\n]*)"\s*\)"#, "(${1})"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            (Regex::new(pattern).expect("valid quote pattern regex"), replacement)
        })
        .collect()
    })
}

fn pipe_label_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\|([^|\n]*)\|").expect("valid pipe label regex"))
}

fn class_suffix_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r":::[\w-]+").expect("valid class suffix regex"))
}

/// Rule 1: one statement per line. A `;` outside shapes, quotes and pipe labels ends a
/// statement, so `graph TD; A-->B;` becomes two lines. Comments and directives such as
/// `style A fill:#f9f;stroke:#333` stay whole.
pub fn split_statements(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines() {
        if is_directive(line) {
            out.push(line);
            continue;
        }
        match split_top_level(line) {
            pieces if pieces.len() == 1 => out.push(line),
            pieces => out.extend(pieces.into_iter().filter(|piece| !piece.trim().is_empty())),
        }
    }
    out.join("\n")
}

fn split_top_level(line: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut in_pipe = false;
    let mut start = 0usize;

    for (pos, ch) in line.char_indices() {
        match ch {
            '"' => in_quote = !in_quote,
            _ if in_quote => {}
            c if is_open_delim(c) => depth += 1,
            c if is_close_delim(c) => depth = depth.saturating_sub(1),
            '|' if depth == 0 => in_pipe = !in_pipe,
            ';' if depth == 0 && !in_pipe => {
                pieces.push(&line[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    pieces.push(&line[start..]);
    pieces
}

/// Rule 2: unwrap quoted labels in every shape form, then drop any quotation mark left.
pub fn strip_quotes(text: &str) -> String {
    let mut out = text.to_owned();
    for (regex, replacement) in wrapped_quote_patterns() {
        out = regex.replace_all(&out, *replacement).into_owned();
    }
    out.replace("\\\"", "").chars().filter(|c| !QUOTE_CHARS.contains(c)).collect()
}

/// Rule 3: respell every shape literal canonically and drop delimiters that belong to no shape
/// (including the doubled closers the model likes to emit).
pub fn normalize_brackets(text: &str) -> String {
    map_statement_lines(text, |line| {
        map_segments(line, |segment| match segment {
            Segment::Text(text) => Segment::Text(
                text.chars()
                    .map(|c| if is_open_delim(c) || is_close_delim(c) { ' ' } else { c })
                    .collect(),
            ),
            node => node,
        })
    })
}

/// Rule 4: clean shape labels and pipe edge labels without touching shape delimiters.
pub fn sanitize_labels(text: &str) -> String {
    map_statement_lines(text, |line| {
        map_segments(line, |segment| match segment {
            Segment::Node(shape) => Segment::Node(sanitize_shape_label(shape)),
            Segment::Text(text) => Segment::Text(
                pipe_label_regex()
                    .replace_all(&text, |caps: &regex::Captures<'_>| {
                        let label = sanitize_label(&caps[1]);
                        if label.is_empty() {
                            String::new()
                        } else {
                            format!("|{label}|")
                        }
                    })
                    .into_owned(),
            ),
        })
    })
}

fn sanitize_shape_label(shape: ShapeLiteral) -> ShapeLiteral {
    let mut label = trim_edge_slashes(&sanitize_label(&shape.label));
    if label.is_empty() {
        label = trim_edge_slashes(&sanitize_label(&shape.id));
    }
    if label.is_empty() {
        label = "Node".to_owned();
    }
    ShapeLiteral { label, ..shape }
}

/// A slash or backslash next to a closing or opening delimiter reads as a trapezoid side.
fn trim_edge_slashes(label: &str) -> String {
    label.trim_matches(|c: char| c == '/' || c == '\\' || c.is_whitespace()).to_owned()
}

/// Rule 5: identifiers keep only ASCII alphanumerics. Bare identifiers in node position are
/// cleaned too so edges keep pointing at the renamed nodes; words inside an inline
/// `-- label -->` are left for rule 6.
pub fn sanitize_node_ids(text: &str) -> String {
    map_statement_lines(text, |line| {
        let mut in_inline_label = false;
        map_segments(line, |segment| match segment {
            Segment::Node(shape) => {
                let mut id = sanitize_mermaid_ident(&shape.id);
                if id.is_empty() {
                    id = sanitize_mermaid_ident(&shape.label);
                }
                if id.is_empty() {
                    id = "Node".to_owned();
                }
                in_inline_label = false;
                Segment::Node(ShapeLiteral { id, ..shape })
            }
            Segment::Text(text) => {
                let text = class_suffix_regex().replace_all(&text, "");
                let mut out = String::with_capacity(text.len());
                for token in lex_text(&text) {
                    match token {
                        Token::Arrow(arrow) => {
                            in_inline_label = is_open_label_arrow(arrow);
                            out.push_str(arrow);
                        }
                        Token::Word(word) if !in_inline_label => {
                            out.push_str(&sanitize_mermaid_ident(word));
                        }
                        Token::Word(word) => out.push_str(word),
                        Token::Space => out.push(' '),
                        Token::Amp => out.push('&'),
                        Token::Label(label) => {
                            out.push('|');
                            out.push_str(label);
                            out.push('|');
                        }
                    }
                }
                Segment::Text(out)
            }
        })
    })
}

/// Rule 6: `A -- yes --> B` becomes `A -->|yes| B`, every arrow variant becomes `-->`, and a
/// pipe label separated from its arrow is reattached.
pub fn repair_edges(text: &str) -> String {
    map_statement_lines(text, |line| {
        map_segments(line, |segment| match segment {
            Segment::Text(text) => Segment::Text(repair_edge_text(&text)),
            node => node,
        })
    })
}

fn repair_edge_text(text: &str) -> String {
    let tokens = lex_text(text);
    let mut out = String::with_capacity(text.len());
    let mut idx = 0usize;

    while idx < tokens.len() {
        match tokens[idx] {
            Token::Arrow(arrow) if is_open_label_arrow(arrow) => {
                if let Some((label, next)) = inline_edge_label(&tokens, idx + 1) {
                    push_edge(&mut out, &label);
                    idx = next;
                } else {
                    out.push_str(arrow);
                    idx += 1;
                }
            }
            Token::Arrow(_) => {
                let mut next = idx + 1;
                while matches!(tokens.get(next), Some(Token::Space)) {
                    next += 1;
                }
                if let Some(Token::Label(label)) = tokens.get(next) {
                    push_edge(&mut out, &sanitize_label(label));
                    idx = next + 1;
                } else {
                    out.push_str("-->");
                    idx += 1;
                }
            }
            Token::Space => {
                out.push(' ');
                idx += 1;
            }
            Token::Word(word) => {
                out.push_str(word);
                idx += 1;
            }
            Token::Amp => {
                out.push('&');
                idx += 1;
            }
            Token::Label(label) => {
                out.push('|');
                out.push_str(label);
                out.push('|');
                idx += 1;
            }
        }
    }

    out
}

fn push_edge(out: &mut String, label: &str) {
    out.push_str("-->");
    if !label.is_empty() {
        out.push('|');
        out.push_str(label);
        out.push('|');
    }
}

/// Words between an opening `--` and the next finishing arrow, plus the index after that arrow.
fn inline_edge_label(tokens: &[Token<'_>], from: usize) -> Option<(String, usize)> {
    let mut words = Vec::new();
    for (idx, token) in tokens.iter().enumerate().skip(from) {
        match *token {
            Token::Space => {}
            Token::Word(word) => words.push(word),
            Token::Amp => words.push("&"),
            Token::Arrow(arrow) if !is_open_label_arrow(arrow) => {
                if words.is_empty() {
                    return None;
                }
                return Some((sanitize_label(&words.join(" ")), idx + 1));
            }
            _ => return None,
        }
    }
    None
}

/// Rule 7: one space around each arrow (an arrow owns its pipe label), single spaces elsewhere,
/// trimmed lines, no blank lines.
pub fn normalize_whitespace(text: &str) -> String {
    let padded = map_statement_lines(text, |line| {
        map_segments(line, |segment| match segment {
            Segment::Text(text) => Segment::Text(pad_arrows(&text)),
            node => node,
        })
    });
    padded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn pad_arrows(text: &str) -> String {
    let tokens = lex_text(text);
    let mut out = String::with_capacity(text.len() + 4);
    let mut idx = 0usize;
    while idx < tokens.len() {
        match tokens[idx] {
            Token::Space => out.push(' '),
            Token::Word(word) => out.push_str(word),
            Token::Amp => out.push_str(" & "),
            Token::Arrow(arrow) => {
                out.push(' ');
                out.push_str(arrow);
                if let Some(Token::Label(label)) = tokens.get(idx + 1) {
                    out.push('|');
                    out.push_str(label);
                    out.push('|');
                    idx += 1;
                }
                out.push(' ');
            }
            Token::Label(label) => {
                out.push('|');
                out.push_str(label);
                out.push('|');
            }
        }
        idx += 1;
    }
    collapse_spaces(&out)
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == ' ' && out.ends_with(' ') {
            continue;
        }
        out.push(ch);
    }
    out
}

/// Rule 8: keep one canonical root declaration followed by node and edge statements only.
///
/// Fan-outs (`A --> B & C`) are expanded into one edge per pair first. Lines before the first
/// root, directives, anything from a second root on, and lines that do not form a
/// `node (--> node)*` statement are dropped. A missing root becomes `flowchart TD`. The first
/// shape declared for an id wins; later declarations with another shape become bare references.
pub fn shape_document(text: &str) -> String {
    let mut direction: Option<Direction> = None;
    let mut statements: Vec<String> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(parsed) = parse_root_declaration(trimmed) {
            if direction.is_some() {
                break;
            }
            direction = Some(parsed);
            statements.clear();
            continue;
        }
        if is_directive(trimmed) {
            continue;
        }
        statements.extend(expand_fan_out(trimmed).into_iter().filter(|line| is_statement(line)));
    }

    let mut out = format!("flowchart {}", direction.unwrap_or_default());
    let mut kinds = BTreeMap::new();
    for statement in statements {
        out.push('\n');
        out.push_str(&settle_shapes(&statement, &mut kinds));
    }
    out
}

fn settle_shapes(line: &str, kinds: &mut BTreeMap<String, ShapeKind>) -> String {
    map_segments(line, |segment| match segment {
        Segment::Node(shape) => {
            let declared = *kinds.entry(shape.id.clone()).or_insert(shape.kind);
            if declared == shape.kind {
                Segment::Node(shape)
            } else {
                Segment::Text(shape.id)
            }
        }
        text => text,
    })
}

/// `A & B --> C & D` becomes one line per source and target pair, link by link along a chain.
/// Lines without a well-formed `&` join come back unchanged.
fn expand_fan_out(line: &str) -> Vec<String> {
    let unchanged = || vec![line.to_owned()];
    let mut groups: Vec<Vec<String>> = vec![Vec::new()];
    let mut arrows: Vec<String> = Vec::new();
    let mut expect_node = true;
    let mut joined = false;

    for segment in scan_line(line) {
        let tokens = match &segment {
            Segment::Node(_) => {
                if !expect_node {
                    return unchanged();
                }
                if let Some(group) = groups.last_mut() {
                    group.push(render_segments(std::slice::from_ref(&segment)));
                }
                expect_node = false;
                continue;
            }
            Segment::Text(text) => lex_text(text),
        };

        let mut idx = 0usize;
        while idx < tokens.len() {
            match tokens[idx] {
                Token::Space => {}
                Token::Word(word) => {
                    if !expect_node {
                        return unchanged();
                    }
                    if let Some(group) = groups.last_mut() {
                        group.push(word.to_owned());
                    }
                    expect_node = false;
                }
                Token::Amp => {
                    if expect_node {
                        return unchanged();
                    }
                    joined = true;
                    expect_node = true;
                }
                Token::Arrow(arrow) => {
                    if expect_node {
                        return unchanged();
                    }
                    let mut edge = arrow.to_owned();
                    if let Some(Token::Label(label)) = tokens.get(idx + 1) {
                        edge = format!("{edge}|{label}|");
                        idx += 1;
                    }
                    arrows.push(edge);
                    groups.push(Vec::new());
                    expect_node = true;
                }
                Token::Label(_) => return unchanged(),
            }
            idx += 1;
        }
    }

    if !joined || expect_node {
        return unchanged();
    }
    if arrows.is_empty() {
        return groups.into_iter().flatten().collect();
    }

    let mut lines = Vec::new();
    for (idx, edge) in arrows.iter().enumerate() {
        for from in &groups[idx] {
            for to in &groups[idx + 1] {
                lines.push(format!("{from} {edge} {to}"));
            }
        }
    }
    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Node,
    Edge,
}

/// `node (--> node)*` with alphanumeric ids and clean labels.
fn is_statement(line: &str) -> bool {
    let mut items = Vec::new();
    let mut after_arrow = false;

    for segment in scan_line(line) {
        match segment {
            Segment::Node(shape) => {
                if validate_mermaid_ident(&shape.id).is_err()
                    || shape.label.is_empty()
                    || shape.label.contains(ILLEGAL_LABEL_CHARS)
                {
                    return false;
                }
                items.push(Item::Node);
                after_arrow = false;
            }
            Segment::Text(text) => {
                for token in lex_text(&text) {
                    match token {
                        Token::Space => after_arrow = false,
                        Token::Amp => return false,
                        Token::Word(word) => {
                            if validate_mermaid_ident(word).is_err() {
                                return false;
                            }
                            items.push(Item::Node);
                            after_arrow = false;
                        }
                        Token::Arrow(arrow) => {
                            if arrow != "-->" {
                                return false;
                            }
                            items.push(Item::Edge);
                            after_arrow = true;
                        }
                        Token::Label(label) => {
                            if !after_arrow || label.is_empty() {
                                return false;
                            }
                            after_arrow = false;
                        }
                    }
                }
            }
        }
    }

    !items.is_empty()
        && items.len() % 2 == 1
        && items.iter().enumerate().all(|(idx, item)| {
            let expected = if idx % 2 == 0 { Item::Node } else { Item::Edge };
            *item == expected
        })
}
