//! Story node value type

use serde::{Deserialize, Serialize};

/// One page of the story: the narrative text and up to two choice labels.
///
/// Nodes are built once by the parser and only handed out by shared
/// reference afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryNode {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    left_choice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    right_choice: Option<String>,
    /// Reserved inventory payload. Collected, never shown.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    items: Vec<String>,
}

impl StoryNode {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        left_choice: Option<String>,
        right_choice: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            left_choice,
            right_choice,
            items: Vec::new(),
        }
    }

    /// A node without choice labels, i.e. an ending once placed in a tree.
    #[must_use]
    pub fn ending(text: impl Into<String>) -> Self {
        Self::new(text, None, None)
    }

    #[must_use]
    pub fn with_items(mut self, items: Vec<String>) -> Self {
        self.items = items;
        self
    }

    /// Append to the reserved item list. Only used while building a node.
    pub fn push_item(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caption of the left choice, `None` when that choice does not exist
    #[must_use]
    pub fn left_choice(&self) -> Option<&str> {
        self.left_choice.as_deref()
    }

    /// Caption of the right choice, `None` when that choice does not exist
    #[must_use]
    pub fn right_choice(&self) -> Option<&str> {
        self.right_choice.as_deref()
    }

    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    #[must_use]
    pub fn item(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    /// Whether either choice label is present
    #[must_use]
    pub fn has_choices(&self) -> bool {
        self.left_choice.is_some() || self.right_choice.is_some()
    }
}
