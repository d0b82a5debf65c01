use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Labels;
use crate::mode::SelectionMode;

/// Declarative targeting specification for one selection call.
///
/// `TargetSpec` describes *which* entities an experiment acts on and *how
/// many* of them become final targets. It is immutable input: the selection
/// core never mutates a spec.
///
/// Fields cover:
/// - explicit identification (`pods`) — when non-empty, every other filter
///   is bypassed and the listed entities are resolved directly
/// - bulk-fetch constraints pushed to the provider (`label_selectors`,
///   `field_selectors`)
/// - host placement (`nodes`, `node_selectors`)
/// - existence-expression filters (`namespaces`, `annotation_selectors`,
///   `pod_phase_selectors`)
/// - sampling (`mode`, `value`)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSpec {
    /// Explicit entity map: namespace → entity names.
    ///
    /// A non-empty map short-circuits the whole pipeline; the listed
    /// entities are fetched one by one and returned as-is.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pods: BTreeMap<String, Vec<String>>,

    /// Label constraints applied by the provider's bulk query.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub label_selectors: Labels,

    /// Field constraints applied by the provider's bulk query.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub field_selectors: Labels,

    /// Explicit node names; unioned with `node_selectors` matches.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<String>,

    /// Node label constraints; unioned with `nodes`.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub node_selectors: Labels,

    /// Namespace expression fragments: a bare name means the namespace must
    /// be present, a `!`-prefixed name means it must be absent. Joined with
    /// commas and parsed as one requirement expression.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,

    /// Annotation constraints. Only key presence is evaluated; the map
    /// values are ignored.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub annotation_selectors: Labels,

    /// Phase expression fragments, same convention as `namespaces`,
    /// evaluated against the entity's phase value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pod_phase_selectors: Vec<String>,

    /// Sampling policy applied to the filtered list.
    #[serde(default)]
    pub mode: SelectionMode,

    /// Numeric argument for the sampling modes that take one, carried as a
    /// string and parsed per mode.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl TargetSpec {
    /// Spec with no constraints: bulk fetch everything, mode `One`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicit (namespace, name) pick.
    pub fn with_pod(mut self, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        self.pods
            .entry(namespace.into())
            .or_default()
            .push(name.into());
        self
    }

    /// Add a label constraint for the bulk query.
    pub fn with_label(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.label_selectors.insert(key, val);
        self
    }

    /// Add a namespace expression fragment (`"prod"` or `"!kube-system"`).
    pub fn with_namespace(mut self, fragment: impl Into<String>) -> Self {
        self.namespaces.push(fragment.into());
        self
    }

    /// Add a phase expression fragment (`"Running"` or `"!Failed"`).
    pub fn with_phase_selector(mut self, fragment: impl Into<String>) -> Self {
        self.pod_phase_selectors.push(fragment.into());
        self
    }

    /// Set the sampling mode and its value argument.
    pub fn with_mode(mut self, mode: SelectionMode, value: impl Into<String>) -> Self {
        self.mode = mode;
        self.value = value.into();
        self
    }
}
