use std::borrow::Cow;

use serde_json::Value;

/// Longest search term accepted from a client; longer terms are truncated
pub const MAX_SEARCH_VALUE_LENGTH: usize = 10_000;

/// Text a record value is searched as. `null` has no text and never matches.
#[must_use]
pub fn search_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Array(_) | Value::Object(_) => Some(Cow::Owned(value.to_string())),
    }
}

/// Default search predicate: substring containment of `term` in the value's text.
///
/// An empty term matches everything; a missing or `null` value matches nothing else.
#[must_use]
pub fn contains_term(value: Option<&Value>, term: &str, case_insensitive: bool) -> bool {
    if term.is_empty() {
        return true;
    }

    let Some(text) = value.and_then(search_text) else {
        return false;
    };

    if case_insensitive {
        text.to_lowercase().contains(&term.to_lowercase())
    } else {
        text.contains(term)
    }
}

/// Cap a client search term at [`MAX_SEARCH_VALUE_LENGTH`] characters
#[must_use]
pub fn truncate_search_value(value: &str) -> &str {
    match value.char_indices().nth(MAX_SEARCH_VALUE_LENGTH) {
        Some((index, _)) => {
            tracing::warn!(
                length = value.chars().count(),
                max = MAX_SEARCH_VALUE_LENGTH,
                "Truncating oversized search value"
            );
            &value[..index]
        }
        None => value,
    }
}
