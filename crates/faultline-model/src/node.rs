use serde::{Deserialize, Serialize};

use crate::domain::Labels;

/// Read-only snapshot of a host machine that may carry entities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Node name, unique cluster-wide.
    pub name: String,
    /// Label set.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
}

impl Node {
    /// Create a node with an empty label set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Labels::new(),
        }
    }

    /// Attach a label.
    pub fn with_label(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.labels.insert(key, val);
        self
    }
}
