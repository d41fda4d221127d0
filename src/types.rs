use serde::{Serialize, Deserialize};
use serde_json::Value;
use crate::error::{Error, Result};

/// A parsed chat export. Only `messages` is required.
///
/// Messages are kept as raw JSON so that one entry of an unexpected shape is
/// reported against its index instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatExport {
    #[serde(default)]
    pub name: Option<Value>,
    pub messages: Vec<Value>,
}

impl ChatExport {
    /// The chat's display name, when it is a string.
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageText {
    Plain(String),
    Fragments(Vec<TextFragment>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextFragment {
    Plain(String),
    /// A styled span (`bold`, `link`, `mention`, ...). Only `text` is used.
    Annotated { text: String, kind: Option<String> },
}

impl TextFragment {
    pub fn text(&self) -> &str {
        match self {
            TextFragment::Plain(text) => text,
            TextFragment::Annotated { text, .. } => text,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(TextFragment::Plain(text.clone())),
            Value::Object(map) => match map.get("text") {
                Some(Value::String(text)) => Some(TextFragment::Annotated {
                    text: text.clone(),
                    kind: map.get("type").and_then(Value::as_str).map(str::to_string),
                }),
                _ => None,
            },
            _ => None,
        }
    }
}

impl MessageText {
    /// Classifies a raw `text` value, or `None` if it fits neither shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(MessageText::Plain(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(TextFragment::from_value)
                .collect::<Option<Vec<_>>>()
                .map(MessageText::Fragments),
            _ => None,
        }
    }

    pub fn fragment_count(&self) -> usize {
        match self {
            MessageText::Plain(_) => 1,
            MessageText::Fragments(fragments) => fragments.len(),
        }
    }
}

/// Resolves the text of the message at `index`.
///
/// Keys other than `text` are never inspected, so odd metadata cannot reject
/// a message. A non-object entry or a missing `text` reports the whole entry.
pub fn classify_message(index: usize, message: &Value) -> Result<MessageText> {
    let text = match message {
        Value::Object(map) => map.get("text"),
        _ => None,
    };
    match text {
        Some(value) => MessageText::from_value(value).ok_or_else(|| Error::malformed(index, value)),
        None => Err(Error::malformed(index, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(text: Value) -> Value {
        json!({ "id": 1, "type": "message", "text": text })
    }

    #[test]
    fn plain_string_is_plain() {
        let text = classify_message(0, &message(json!("hello"))).unwrap();
        assert_eq!(text, MessageText::Plain("hello".to_string()));
    }

    #[test]
    fn mixed_fragments_keep_order_and_kind() {
        let text = classify_message(0, &message(json!([{"type": "bold", "text": "foo"}, "bar"]))).unwrap();
        assert_eq!(
            text,
            MessageText::Fragments(vec![
                TextFragment::Annotated { text: "foo".to_string(), kind: Some("bold".to_string()) },
                TextFragment::Plain("bar".to_string()),
            ])
        );
        assert_eq!(text.fragment_count(), 2);
    }

    #[test]
    fn integer_text_is_malformed_with_index() {
        match classify_message(7, &message(json!(42))) {
            Err(Error::MalformedMessage { index, raw }) => {
                assert_eq!(index, 7);
                assert_eq!(raw, "42");
            }
            other => panic!("expected malformed message, got {:?}", other),
        }
    }

    #[test]
    fn fragment_without_text_is_malformed() {
        let result = classify_message(3, &message(json!(["ok", {"type": "link", "href": "x"}])));
        assert!(matches!(result, Err(Error::MalformedMessage { index: 3, .. })));
    }

    #[test]
    fn fragment_with_non_string_text_is_malformed() {
        let result = classify_message(0, &message(json!([{"text": 5}])));
        assert!(matches!(result, Err(Error::MalformedMessage { .. })));
    }

    #[test]
    fn missing_text_reports_whole_message() {
        match classify_message(2, &json!({"id": 9, "type": "service"})) {
            Err(Error::MalformedMessage { index, raw }) => {
                assert_eq!(index, 2);
                assert!(raw.contains("\"service\""));
            }
            other => panic!("expected malformed message, got {:?}", other),
        }
    }

    #[test]
    fn non_object_message_is_malformed() {
        match classify_message(1, &json!("just a string")) {
            Err(Error::MalformedMessage { index, raw }) => {
                assert_eq!(index, 1);
                assert_eq!(raw, "\"just a string\"");
            }
            other => panic!("expected malformed message, got {:?}", other),
        }
    }

    #[test]
    fn odd_metadata_does_not_reject_a_message() {
        let raw = json!({"text": "ok", "from": 123, "date": false, "type": ["x"]});
        assert_eq!(
            classify_message(0, &raw).unwrap(),
            MessageText::Plain("ok".to_string())
        );
    }

    #[test]
    fn export_accepts_any_message_shape() {
        let export: ChatExport = serde_json::from_value(json!({
            "name": "Group",
            "type": "private_group",
            "messages": [{"text": "hi", "from": 123}, "just a string", 7]
        }))
        .unwrap();
        assert_eq!(export.name(), Some("Group"));
        assert_eq!(export.messages.len(), 3);

        let unnamed: ChatExport = serde_json::from_value(json!({"name": 5, "messages": []})).unwrap();
        assert_eq!(unnamed.name(), None);
    }
}
