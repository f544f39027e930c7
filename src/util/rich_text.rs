use serde_json::Value;

/// Flatten a Jira rich-text value to plain text.
///
/// REST v2 usually returns wiki-markup strings, which are passed through
/// untouched. Descriptions and comment bodies may also arrive as Atlassian
/// Document Format trees: block nodes end with a newline, inline text is
/// concatenated, and the result is trimmed.
pub fn plain_text(value: &Value) -> Option<String> {
    if let Value::String(s) = value {
        return Some(s.clone());
    }
    let mut out = String::new();
    collect(value, &mut out);
    let text = out.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn collect(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            for item in items {
                collect(item, out);
            }
        }
        Value::Object(node) => match node.get("type").and_then(Value::as_str) {
            Some("text") => {
                if let Some(text) = node.get("text").and_then(Value::as_str) {
                    out.push_str(text);
                }
            }
            Some("hardBreak") => out.push('\n'),
            kind => {
                if let Some(content) = node.get("content") {
                    collect(content, out);
                }
                if kind.is_some_and(is_block) && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
        },
        _ => {}
    }
}

fn is_block(kind: &str) -> bool {
    matches!(
        kind,
        "paragraph" | "heading" | "blockquote" | "codeBlock" | "listItem" | "panel" | "tableRow"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_string_passes_through() {
        assert_eq!(
            plain_text(&json!("h1. Title\nbody")).as_deref(),
            Some("h1. Title\nbody")
        );
    }

    #[test]
    fn string_whitespace_is_preserved() {
        assert_eq!(
            plain_text(&json!("\n  indented code\n")).as_deref(),
            Some("\n  indented code\n")
        );
        assert_eq!(plain_text(&json!("   ")).as_deref(), Some("   "));
        assert_eq!(plain_text(&json!("")).as_deref(), Some(""));
    }

    #[test]
    fn document_paragraphs_become_lines() {
        let doc = json!({
            "type": "doc",
            "content": [
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "Given a user"},
                    {"type": "hardBreak"},
                    {"type": "text", "text": "when they log in"}
                ]},
                {"type": "paragraph", "content": [{"type": "text", "text": "then it works"}]}
            ]
        });
        assert_eq!(
            plain_text(&doc).as_deref(),
            Some("Given a user\nwhen they log in\nthen it works")
        );
    }

    #[test]
    fn empty_values_are_none() {
        assert_eq!(plain_text(&Value::Null), None);
        assert_eq!(plain_text(&json!(["  ", {"type": "paragraph"}])), None);
        assert_eq!(plain_text(&json!({"type": "doc", "content": []})), None);
        assert_eq!(plain_text(&json!(12)), None);
    }
}
