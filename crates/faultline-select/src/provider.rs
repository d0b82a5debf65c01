use async_trait::async_trait;

use faultline_model::{Entity, Labels, Node};

use crate::error::ProviderError;

/// Read-only view of the cluster consumed by the selection pipeline.
///
/// Implementations typically wrap a cluster API client; tests plug in
/// in-memory fakes. Single-item lookups signal "not found" with `Ok(None)`,
/// which the pipeline logs and skips — only transport or backend failures
/// are returned as [`ProviderError`].
///
/// Implementations must be safe for concurrent use; the pipeline itself
/// issues calls sequentially within one selection.
#[async_trait]
pub trait CandidateProvider: Send + Sync {
    /// Fetch one entity by identity.
    async fn get_entity(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Entity>, ProviderError>;

    /// Bulk query entities matching the given label and field constraints.
    /// Empty maps mean "no constraint".
    async fn list_entities(
        &self,
        label_selectors: &Labels,
        field_selectors: &Labels,
    ) -> Result<Vec<Entity>, ProviderError>;

    /// Fetch one node by name.
    async fn get_node(&self, name: &str) -> Result<Option<Node>, ProviderError>;

    /// Bulk query nodes matching the given label constraints.
    async fn list_nodes(&self, label_selectors: &Labels) -> Result<Vec<Node>, ProviderError>;
}
