//! The persisted payload of a long text input

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// A long text input's persisted payload: the title shown as the entity's
/// state, and the text body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub text: String,
}

impl Record {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// Length of the text body in characters
    pub fn length(&self) -> usize {
        self.text.chars().count()
    }

    /// The attribute map the owning entity exposes to the host
    pub fn attributes(&self, friendly_name: &str) -> HashMap<String, Value> {
        let mut attributes = HashMap::new();
        attributes.insert("friendly_name".to_string(), json!(friendly_name));
        attributes.insert("long_text".to_string(), json!(self.text));
        attributes.insert("length".to_string(), json!(self.length()));
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_counts_characters() {
        assert_eq!(Record::new("t", "hello").length(), 5);
        assert_eq!(Record::new("t", "").length(), 0);
        // multi-byte characters count once each
        assert_eq!(Record::new("t", "héllo").length(), 5);
    }

    #[test]
    fn test_attributes() {
        let record = Record::new("My Notes", "hello");
        let attributes = record.attributes("Notes");

        assert_eq!(attributes.get("friendly_name"), Some(&json!("Notes")));
        assert_eq!(attributes.get("long_text"), Some(&json!("hello")));
        assert_eq!(attributes.get("length"), Some(&json!(5)));
    }

    #[test]
    fn test_serde_shape() {
        let record = Record::new("My Notes", "hello");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"title": "My Notes", "text": "hello"}));
    }
}
