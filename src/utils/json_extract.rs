//! Recovers the JSON object a model embedded in free-form output.
//!
//! Models are told to answer with bare JSON but regularly wrap it in markdown
//! fences or add a sentence before or after it. [`extract_json`] strips fences,
//! tries the whole text, then falls back to scanning balanced braces from the
//! first `{`.
//!
//! Known gap: the scan returns the *first* balanced span that parses. A small
//! valid object that appears before the intended one (for example `{}` inside a
//! leading remark) wins over the real payload. Braces inside JSON strings are
//! also counted, so a stray `}` in a string can end a span early; the span then
//! fails to parse and scanning continues. Shape validation downstream rejects
//! the wrong object and the pipeline retry gives the model a second chance.

use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```[A-Za-z0-9_+\-]*").expect("static fence pattern"))
}

pub fn strip_fences(raw: &str) -> String {
    fence_pattern().replace_all(raw, "").trim().to_string()
}

/// Returns the first JSON value recoverable from `raw`, or `None`. Never panics.
pub fn extract_json(raw: &str) -> Option<JsonValue> {
    let cleaned = strip_fences(raw);

    if let Ok(value) = serde_json::from_str::<JsonValue>(&cleaned) {
        return Some(value);
    }

    let start = cleaned.find('{')?;
    let mut depth: i64 = 0;
    for (offset, ch) in cleaned[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => continue,
        }
        if depth == 0 {
            let end = start + offset + ch.len_utf8();
            if let Ok(value) = serde_json::from_str::<JsonValue>(&cleaned[start..end]) {
                return Some(value);
            }
        }
    }

    None
}
