//! Pre-parse rewrite of non-standard numeric literals.
//!
//! Solver output may contain `NaN`, `Infinity`, `-Infinity`, `Inf` and `-Inf`,
//! none of which are valid JSON. Each standalone occurrence is rewritten to
//! `null` before the text reaches `serde_json`. Literals such as `1e999` are
//! valid JSON but overflow `f64`; they are rewritten to `null` as well. The
//! rewrite is lossy: a `NaN` and a missing value are indistinguishable
//! afterwards.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::document::RawRunDocument;
use crate::{ResultsError, ResultsResult};

// Both patterns capture the preceding character (or start of text) so that
// a token glued to a word or a hyphen, as in `"a-Inf"`, is not a match.

fn non_finite_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The leading minus belongs to the token so `-Infinity` becomes `null`, not `-null`.
    RE.get_or_init(|| {
        Regex::new(r"(?P<pre>^|[^\w-])-?(?:NaN|Infinity|Inf)\b").expect("non-finite token regex")
    })
}

fn large_literal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Only literals that can overflow: an exponent, or more integer digits than f64::MAX has.
    RE.get_or_init(|| {
        Regex::new(r"(?P<pre>^|[^\w.+-])(?P<num>-?(?:\d+(?:\.\d+)?[eE][+-]?\d+|\d{309,}(?:\.\d+)?))\b")
            .expect("large literal regex")
    })
}

/// Replace standalone non-finite tokens and overflowing literals with `null`.
///
/// Tokens embedded in longer words (`InfoValue`, `Infinite`, `NaNa`, `a-Inf`)
/// are left alone. The input is returned borrowed when nothing was rewritten.
pub fn sanitize_numeric_tokens(text: &str) -> Cow<'_, str> {
    let named = non_finite_regex().replace_all(text, "${pre}null");
    let clamped = match null_overflowing_literals(&named) {
        Cow::Owned(fixed) => Some(fixed),
        Cow::Borrowed(_) => None,
    };
    match clamped {
        Some(fixed) => Cow::Owned(fixed),
        None => named,
    }
}

fn null_overflowing_literals(text: &str) -> Cow<'_, str> {
    let re = large_literal_regex();
    if !re.is_match(text) {
        return Cow::Borrowed(text);
    }
    re.replace_all(text, |caps: &Captures<'_>| {
        let overflows = caps["num"]
            .parse::<f64>()
            .map(f64::is_infinite)
            .unwrap_or(false);
        if overflows {
            format!("{}null", &caps["pre"])
        } else {
            caps[0].to_string()
        }
    })
}

/// Sanitize then parse as standard JSON.
pub fn parse_tolerant(text: &str) -> ResultsResult<Value> {
    let fixed = sanitize_numeric_tokens(text);
    Ok(serde_json::from_str(&fixed)?)
}

/// Parse one run file into a typed document.
pub fn parse_run_document(text: &str) -> ResultsResult<RawRunDocument> {
    let value = parse_tolerant(text)?;
    match &value {
        Value::Object(map) => Ok(RawRunDocument::from_object(map)),
        other => Err(ResultsError::NotAnObject {
            found: json_kind(other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
