// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tolerant tokenization of flowchart statement lines.
//!
//! [`scan_line`] splits a line into free text and shape literals. A shape literal is an opening
//! delimiter (`[`, `(`, `{`) glued to an identifier; its extent is found by bracket matching, so
//! labels containing their own brackets (`B{Is valid(x)?}`) are still read as one node. The shape
//! kind is decided from the opening delimiters only and the label is returned raw: cleaning labels
//! is the caller's business, which keeps delimiter parsing and label rewriting apart.
//!
//! [`lex_text`] splits the free text between shapes into words, arrows, `&` joins and `|label|`
//! zones.

use crate::model::ShapeKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShapeLiteral {
    pub id: String,
    pub kind: ShapeKind,
    pub label: String,
}

impl ShapeLiteral {
    fn write_to(&self, out: &mut String) {
        out.push_str(&self.id);
        out.push_str(self.kind.open());
        out.push_str(&self.label);
        out.push_str(self.kind.close());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Text(String),
    Node(ShapeLiteral),
}

pub(crate) fn is_open_delim(ch: char) -> bool {
    matches!(ch, '[' | '(' | '{')
}

pub(crate) fn is_close_delim(ch: char) -> bool {
    matches!(ch, ']' | ')' | '}')
}

fn closer_for(open: char) -> char {
    match open {
        '[' => ']',
        '(' => ')',
        _ => '}',
    }
}

pub(crate) fn scan_line(line: &str) -> Vec<Segment> {
    let chars: Vec<char> = line.chars().collect();
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut idx = 0usize;

    while idx < chars.len() {
        let ch = chars[idx];

        if ch == '|' {
            if let Some(end) = find_char(&chars, idx + 1, '|') {
                text.extend(&chars[idx..=end]);
                idx = end + 1;
                continue;
            }
        }

        if is_open_delim(ch) {
            let id_len = trailing_id_len(&text);
            if id_len > 0 {
                let id = text.split_off(text.len() - id_len);
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }

                let (interior_end, resume) = find_shape_end(&chars, idx);
                let raw: String = chars[idx + 1..interior_end].iter().collect();
                let (kind, label) = classify_interior(ch, &raw);
                segments.push(Segment::Node(ShapeLiteral { id, kind, label: label.to_owned() }));
                idx = resume;
                continue;
            }
        }

        text.push(ch);
        idx += 1;
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    segments
}

pub(crate) fn render_segments(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Node(shape) => shape.write_to(&mut out),
        }
    }
    out
}

fn find_char(chars: &[char], from: usize, needle: char) -> Option<usize> {
    chars.get(from..)?.iter().position(|&c| c == needle).map(|pos| from + pos)
}

/// Byte length of the identifier glued to the end of `text`, stopping at whitespace, delimiters
/// and the head of any arrow (`A-->B` yields `B`).
fn trailing_id_len(text: &str) -> usize {
    let start = text
        .char_indices()
        .rev()
        .find(|&(_, c)| {
            c.is_whitespace() || is_open_delim(c) || is_close_delim(c) || c == '|' || c == '&'
        })
        .map(|(pos, c)| pos + c.len_utf8())
        .unwrap_or(0);

    let mut candidate = &text[start..];
    if let Some(pos) = candidate.rfind('>') {
        candidate = &candidate[pos + 1..];
    }
    for arrow in ["--", "=="] {
        if let Some(pos) = candidate.rfind(arrow) {
            candidate = &candidate[pos + arrow.len()..];
        }
    }
    candidate.len()
}

/// Returns `(interior_end, resume)` for the shape opened at `open_idx`.
///
/// Closers pop the innermost matching opener, so a mismatched closer (`[foo (bar]`) still ends
/// the shape. An unclosed shape ends before the first arrow inside it, or at end of line.
fn find_shape_end(chars: &[char], open_idx: usize) -> (usize, usize) {
    let mut stack = vec![closer_for(chars[open_idx])];

    for (idx, &ch) in chars.iter().enumerate().skip(open_idx + 1) {
        if is_open_delim(ch) {
            stack.push(closer_for(ch));
        } else if is_close_delim(ch) {
            if let Some(pos) = stack.iter().rposition(|&close| close == ch) {
                stack.truncate(pos);
                if stack.is_empty() {
                    return (idx, idx + 1);
                }
            }
        }
    }

    match find_arrow_start(chars, open_idx + 1) {
        Some(arrow_at) => (arrow_at, arrow_at),
        None => (chars.len(), chars.len()),
    }
}

fn find_arrow_start(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len().saturating_sub(1)).find(|&idx| {
        matches!((chars[idx], chars[idx + 1]), ('-', '-') | ('=', '=') | ('-', '>'))
    })
}

fn strip_layer(s: &str, open: char, close: char) -> Option<&str> {
    let rest = s.strip_prefix(open)?;
    Some(rest.strip_suffix(close).unwrap_or(rest))
}

/// Decides the shape from the outer delimiter and the first interior character, and peels the
/// inner delimiter layer off the label. Variant spellings collapse here: `(x)`, `((x))` and
/// `([x])` are all terminals, `[/x\]` and `[/x]` are inputs, `{{x}}` is a decision. `[(x)]` is
/// storage only when the parenthesis closes at the end; `[(x) y]` stays a process.
fn classify_interior(open: char, raw: &str) -> (ShapeKind, &str) {
    let inner = raw.trim();
    let (kind, label) = match open {
        '(' => {
            let label = strip_layer(inner, '[', ']')
                .or_else(|| strip_layer(inner, '(', ')'))
                .unwrap_or(inner);
            (ShapeKind::Terminal, label)
        }
        '{' => (ShapeKind::Decision, strip_layer(inner, '{', '}').unwrap_or(inner)),
        _ => {
            if let Some(rest) = inner.strip_prefix('/') {
                (ShapeKind::Input, rest.strip_suffix(&['/', '\\'][..]).unwrap_or(rest))
            } else if let Some(rest) = inner.strip_prefix('\\') {
                (ShapeKind::Output, rest.strip_suffix(&['\\', '/'][..]).unwrap_or(rest))
            } else if let Some(rest) = inner.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
                (ShapeKind::Storage, rest)
            } else {
                (ShapeKind::Process, strip_layer(inner, '[', ']').unwrap_or(inner))
            }
        }
    };
    (kind, label.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Space,
    Word(&'a str),
    Arrow(&'a str),
    /// `&` joining several nodes on one side of an edge.
    Amp,
    /// Interior of a `|...|` edge label.
    Label(&'a str),
}

fn is_arrow_char(ch: char) -> bool {
    matches!(ch, '-' | '=' | '.' | '<' | '>')
}

fn is_arrow(run: &str) -> bool {
    let strokes = run.chars().filter(|c| matches!(c, '-' | '=')).count();
    strokes >= 2 || (strokes >= 1 && run.contains('>'))
}

/// `--` and `==` open an inline label (`A -- yes --> B`) rather than finishing an edge.
pub(crate) fn is_open_label_arrow(arrow: &str) -> bool {
    arrow == "--" || arrow == "=="
}

fn arrow_run_len(text: &str) -> usize {
    text.char_indices().find(|&(_, c)| !is_arrow_char(c)).map(|(pos, _)| pos).unwrap_or(text.len())
}

/// Length of the arrow at the start of `text`, if one starts there. A stroke run directly followed
/// by a circle or cross head (`--o`, `==x`) takes the head along.
fn arrow_len(text: &str) -> Option<usize> {
    let len = arrow_run_len(text);
    let run = &text[..len];
    if !is_arrow(run) {
        return None;
    }
    let mut after = text[len..].chars();
    let headed = run.ends_with(['-', '='])
        && matches!(after.next(), Some('o' | 'x'))
        && !after.next().is_some_and(|c| c.is_alphanumeric() || c == '_');
    Some(if headed { len + 1 } else { len })
}

pub(crate) fn lex_text(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0usize;

    while pos < text.len() {
        let rest = &text[pos..];
        let Some(ch) = rest.chars().next() else {
            break;
        };

        if ch.is_whitespace() {
            let len = rest
                .char_indices()
                .find(|&(_, c)| !c.is_whitespace())
                .map(|(p, _)| p)
                .unwrap_or(rest.len());
            tokens.push(Token::Space);
            pos += len;
            continue;
        }

        if ch == '|' {
            if let Some(end) = rest[1..].find('|') {
                tokens.push(Token::Label(&rest[1..1 + end]));
                pos += end + 2;
                continue;
            }
        }

        if is_arrow_char(ch) {
            if let Some(len) = arrow_len(rest) {
                tokens.push(Token::Arrow(&rest[..len]));
                pos += len;
                continue;
            }
        }

        if ch == '&' {
            tokens.push(Token::Amp);
            pos += 1;
            continue;
        }

        let len = word_len(rest);
        tokens.push(Token::Word(&rest[..len]));
        pos += len;
    }

    tokens
}

/// A word runs until whitespace, a pipe, an `&` or an arrow. Arrow characters that do not form an
/// arrow (`node-1`, `x>5`) stay inside the word.
fn word_len(text: &str) -> usize {
    let mut pos = 0usize;
    while pos < text.len() {
        let rest = &text[pos..];
        let Some(ch) = rest.chars().next() else {
            break;
        };
        if ch.is_whitespace() || ch == '&' || (ch == '|' && pos > 0) {
            break;
        }
        if is_arrow_char(ch) {
            let len = arrow_run_len(rest);
            if is_arrow(&rest[..len]) {
                break;
            }
            pos += len;
            continue;
        }
        pos += ch.len_utf8();
    }
    pos.max(text.chars().next().map(char::len_utf8).unwrap_or(0))
}
