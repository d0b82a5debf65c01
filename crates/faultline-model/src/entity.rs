use serde::{Deserialize, Serialize};

use crate::domain::{Labels, Phase};

/// Read-only snapshot of a managed runtime instance eligible for targeting.
///
/// Entities are fetched fresh from the [`CandidateProvider`] per selection
/// call and never mutated by the selection core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Namespace the entity lives in.
    pub namespace: String,
    /// Entity name, unique within its namespace.
    pub name: String,
    /// Label set (unique keys).
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    /// Annotation set (unique keys).
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub annotations: Labels,
    /// Current lifecycle phase.
    #[serde(default)]
    pub phase: Phase,
    /// Name of the node the entity is assigned to, if scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
}

impl Entity {
    /// Create an entity with empty metadata and `Phase::Unknown`.
    pub fn new<N, M>(namespace: N, name: M) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            labels: Labels::new(),
            annotations: Labels::new(),
            phase: Phase::default(),
            node: None,
        }
    }

    /// `namespace/name` identity used in logs and diagnostics.
    pub fn id(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// Attach a label.
    pub fn with_label(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.labels.insert(key, val);
        self
    }

    /// Attach an annotation.
    pub fn with_annotation(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.annotations.insert(key, val);
        self
    }

    /// Set the lifecycle phase.
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    /// Set the assigned node.
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }
}
