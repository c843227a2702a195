//! Directive markers: `[[ACTION:<name>]]` and `[[NAV:<target>]]` tokens embedded
//! in generated text.
//!
//! Parsing is one left-to-right scan into an output buffer. A marker whose
//! payload is empty, too long, unterminated, or contains `[`/`]`/newline is left
//! in place as literal text. Removing a marker can join the text around it into
//! a new marker; each `]]` re-checks the buffer tail, so the cleaned text never
//! contains a well-formed marker and re-parsing it is a no-op.

use serde::Serialize;

/// Text beyond this many bytes is dropped before scanning.
pub const MAX_DIRECTIVE_TEXT_LEN: usize = 32 * 1024;
/// Longest payload accepted inside a marker.
const MAX_PAYLOAD_LEN: usize = 64;

const ACTION_OPEN: &str = "[[ACTION:";
const NAV_OPEN: &str = "[[NAV:";
const MARKER_START: &str = "[[";
/// Longest possible marker in bytes: opener, payload, closing `]]`.
const MAX_MARKER_LEN: usize = ACTION_OPEN.len() + MAX_PAYLOAD_LEN + 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedDirectives {
    pub clean_text: String,
    pub actions: Vec<String>,
    pub nav_actions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Action,
    Nav,
}

/// Removes every directive marker from `text`, returning the cleaned text and
/// the payloads in order of appearance.
pub fn parse_directives(text: &str) -> ParsedDirectives {
    let mut parsed = ParsedDirectives::default();
    let input = truncate(text, MAX_DIRECTIVE_TEXT_LEN);
    let mut out = String::with_capacity(input.len());
    let mut skip_blanks = false;

    for c in input.chars() {
        // Avoid a double space where a marker sat between two words.
        if skip_blanks && (c == ' ' || c == '\t') {
            continue;
        }
        skip_blanks = false;
        out.push(c);

        if c == ']' && out.ends_with("]]") && take_trailing_marker(&mut out, &mut parsed) {
            skip_blanks = out.is_empty() || out.ends_with(char::is_whitespace);
        }
    }

    parsed.clean_text = out.trim().to_string();
    parsed
}

/// Removes a marker that ends exactly at the end of `out`, recording its payload.
///
/// Payloads never contain `[`, so the marker can only open at the last `[[`,
/// and that opener lies within `MAX_MARKER_LEN` bytes of the end.
fn take_trailing_marker(out: &mut String, parsed: &mut ParsedDirectives) -> bool {
    let mut window = out.len().saturating_sub(MAX_MARKER_LEN);
    while !out.is_char_boundary(window) {
        window += 1;
    }
    let Some(start) = out[window..].rfind(MARKER_START).map(|pos| window + pos) else {
        return false;
    };
    let Some((kind, payload, consumed)) = match_marker(&out[start..]) else {
        return false;
    };
    if start + consumed != out.len() {
        return false;
    }

    let payload = payload.to_string();
    match kind {
        MarkerKind::Action => parsed.actions.push(payload),
        MarkerKind::Nav => parsed.nav_actions.push(payload),
    }
    out.truncate(start);
    true
}

/// Matches a marker at the start of `input`, returning its kind, trimmed
/// payload, and total byte length.
fn match_marker(input: &str) -> Option<(MarkerKind, &str, usize)> {
    let (kind, open_len) = if input.starts_with(ACTION_OPEN) {
        (MarkerKind::Action, ACTION_OPEN.len())
    } else if input.starts_with(NAV_OPEN) {
        (MarkerKind::Nav, NAV_OPEN.len())
    } else {
        return None;
    };

    let body = &input[open_len..];
    for (idx, c) in body.char_indices() {
        if idx > MAX_PAYLOAD_LEN {
            return None;
        }
        match c {
            ']' => {
                if !body[idx..].starts_with("]]") {
                    return None;
                }
                let payload = body[..idx].trim();
                if payload.is_empty() {
                    return None;
                }
                return Some((kind, payload, open_len + idx + 2));
            }
            '[' | '\n' | '\r' => return None,
            _ => {}
        }
    }

    None
}

fn truncate(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
