//! Locates the candidate edit payload inside a free-form response.
//!
//! Model responses frequently wrap the JSON object in markdown fencing or
//! surrounding prose. Extraction strips a leading fence (with its info
//! string) and a trailing fence, then takes the outermost `{...}` span.

/// Returns the outermost `{...}` object inside `response`, if any.
///
/// The returned slice is a candidate only -- it still has to survive
/// [`validate_changeset`](crate::validate_changeset).
pub fn extract_payload(response: &str) -> Option<&str> {
    let mut text = response.trim();

    if let Some(stripped) = text.strip_prefix("```") {
        // Drop the info string ("json", "jsonc", ...) up to the first newline.
        text = match stripped.find('\n') {
            Some(idx) => &stripped[idx + 1..],
            None => stripped,
        };
        text = text.strip_suffix("```").unwrap_or(text);
        text = text.trim();
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_bare_object() {
        assert_eq!(extract_payload(r#"{"changes": []}"#), Some(r#"{"changes": []}"#));
    }

    #[test]
    fn strips_markdown_fence_with_info_string() {
        let response = "```json\n{\"changes\": []}\n```";
        assert_eq!(extract_payload(response), Some(r#"{"changes": []}"#));
    }

    #[test]
    fn strips_fence_without_info_string() {
        let response = "```\n{\"changes\": []}\n```";
        assert_eq!(extract_payload(response), Some(r#"{"changes": []}"#));
    }

    #[test]
    fn takes_outermost_object_from_prose() {
        let response = "Here is the edit you asked for:\n{\"changes\": []}\nLet me know!";
        assert_eq!(extract_payload(response), Some(r#"{"changes": []}"#));
    }

    #[test]
    fn none_when_no_object_present() {
        assert_eq!(extract_payload("no json here"), None);
        assert_eq!(extract_payload(""), None);
        assert_eq!(extract_payload("}{"), None);
    }
}
