//! Tolerant JSON recovery from model answer text
//!
//! Model answers rarely arrive as bare JSON; they come wrapped in markdown
//! fences or surrounded by prose. Parsing tries progressively looser
//! strategies and never fails outright.

use crate::types::ParsedResponse;
use serde_json::Value;

/// Recover JSON from an answer, degrading to raw text when none is found.
///
/// Strategies are tried in order: a ```json fenced block anywhere in the
/// text, the whole trimmed text (with a bare leading fence stripped), and
/// the widest `{...}` span. The first strategy that yields valid JSON wins.
pub fn parse_response(text: &str) -> ParsedResponse {
    if let Some(candidate) = fenced_json_block(text) {
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            return ParsedResponse::Json(value);
        }
    }

    let trimmed = strip_bare_fence(text.trim());
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return ParsedResponse::Json(value);
    }

    match brace_span(text) {
        Some(span) => match serde_json::from_str::<Value>(span) {
            Ok(value) => ParsedResponse::Json(value),
            Err(_) => ParsedResponse::Raw {
                text: text.to_string(),
                note: "JSON parsing failed".to_string(),
            },
        },
        None => ParsedResponse::Raw {
            text: text.to_string(),
            note: "Could not find JSON in response".to_string(),
        },
    }
}

/// Content of the first ```json fence, up to the next ``` marker.
fn fenced_json_block(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Strip a bare ``` fence wrapping the whole (already trimmed) text.
fn strip_bare_fence(trimmed: &str) -> &str {
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let inner = match trimmed.find('\n') {
        Some(pos) => &trimmed[pos + 1..],
        None => return trimmed,
    };
    match inner.rfind("```") {
        Some(pos) => inner[..pos].trim(),
        None => inner.trim(),
    }
}

/// The widest substring from the first `{` to the last `}`.
fn brace_span(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    if close < open {
        return None;
    }
    Some(&text[open..=close])
}
