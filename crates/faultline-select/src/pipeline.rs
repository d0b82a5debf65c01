//! Selection pipeline: spec + provider → filtered entity list.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use faultline_model::{Entity, Labels, Node, TargetSpec};

use crate::error::{ProviderError, SelectError};
use crate::policy::NamespacePolicy;
use crate::provider::CandidateProvider;
use crate::requirement::Expression;
use crate::sample::Sampler;

/// Multi-stage selection pipeline over a [`CandidateProvider`].
///
/// Collaborators are injected at construction; the pipeline holds no state
/// across calls and treats entity and node data as immutable snapshots for
/// the duration of one call.
pub struct Selector {
    provider: Arc<dyn CandidateProvider>,
    policy: NamespacePolicy,
}

impl Selector {
    /// Pipeline with an allow-all namespace policy.
    pub fn new(provider: Arc<dyn CandidateProvider>) -> Self {
        Self {
            provider,
            policy: NamespacePolicy::allow_all(),
        }
    }

    /// Replace the namespace policy.
    pub fn with_policy(mut self, policy: NamespacePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the filter stages and return the matching entities.
    ///
    /// A non-empty `spec.pods` map resolves the listed entities directly and
    /// returns immediately: explicit identification always wins, even when
    /// other constraints are set on the spec. The result may legitimately be
    /// empty; only provider failures, malformed expressions and disallowed
    /// operators abort the call.
    #[instrument(level = "debug", skip_all, fields(mode = ?spec.mode))]
    pub async fn select(
        &self,
        spec: &TargetSpec,
        cancel: &CancellationToken,
    ) -> Result<Vec<Entity>, SelectError> {
        if !spec.pods.is_empty() {
            return self.select_explicit(spec, cancel).await;
        }

        let mut entities = race(
            cancel,
            self.provider
                .list_entities(&spec.label_selectors, &spec.field_selectors),
        )
        .await?;
        debug!(candidates = entities.len(), "bulk fetch complete");

        if !spec.nodes.is_empty() || !spec.node_selectors.is_empty() {
            let nodes = self.resolve_nodes(spec, cancel).await?;
            entities = filter_by_node(entities, &nodes);
        }

        entities.retain(|e| {
            let allowed = self.policy.is_allowed(&e.namespace);
            if !allowed {
                debug!(entity = %e.id(), "dropped by namespace policy");
            }
            allowed
        });

        let namespaces = Expression::from_fragments(&spec.namespaces)?;
        entities = filter_by_namespace(entities, &namespaces)?;

        let annotations = Expression::from_keys(spec.annotation_selectors.keys())?;
        entities = filter_by_annotations(entities, &annotations)?;

        let phases = Expression::from_fragments(&spec.pod_phase_selectors)?;
        entities = filter_by_phase(entities, &phases)?;

        Ok(entities)
    }

    /// Combined entry point: select, then sample with the spec's mode.
    ///
    /// Unlike [`select`](Self::select), an empty filtered pool is an error
    /// here ([`SelectError::EmptyPool`]) — there is nothing to act on.
    pub async fn select_and_sample<R: Rng>(
        &self,
        spec: &TargetSpec,
        sampler: &mut Sampler<R>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Entity>, SelectError> {
        let entities = self.select(spec, cancel).await?;
        if entities.is_empty() {
            return Err(SelectError::EmptyPool);
        }

        sampler.sample(entities, spec.mode, &spec.value)
    }

    async fn select_explicit(
        &self,
        spec: &TargetSpec,
        cancel: &CancellationToken,
    ) -> Result<Vec<Entity>, SelectError> {
        let mut entities = Vec::new();

        for (namespace, names) in &spec.pods {
            if !self.policy.is_allowed(namespace) {
                debug!(namespace = %namespace, "explicit pick in disallowed namespace");
            }
            for name in names {
                match race(cancel, self.provider.get_entity(namespace, name)).await? {
                    Some(entity) => entities.push(entity),
                    None => {
                        warn!(namespace = %namespace, name = %name, "entity not found, skipping");
                    }
                }
            }
        }

        Ok(entities)
    }

    /// Union of explicitly named nodes and nodes matching the label query.
    async fn resolve_nodes(
        &self,
        spec: &TargetSpec,
        cancel: &CancellationToken,
    ) -> Result<Vec<Node>, SelectError> {
        let mut nodes = Vec::new();

        for name in &spec.nodes {
            match race(cancel, self.provider.get_node(name)).await? {
                Some(node) => nodes.push(node),
                None => debug!(node = %name, "node not found, skipping"),
            }
        }

        if !spec.node_selectors.is_empty() {
            let matched = race(cancel, self.provider.list_nodes(&spec.node_selectors)).await?;
            nodes.extend(matched);
        }

        Ok(nodes)
    }
}

/// Race a provider call against the cancellation token; an already
/// cancelled token aborts before the call is polled.
async fn race<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ProviderError::Cancelled),
        res = fut => res,
    }
}

/// Keep entities whose assigned node is in the resolved node set.
/// An empty node set empties the result.
fn filter_by_node(entities: Vec<Entity>, nodes: &[Node]) -> Vec<Entity> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let names: HashSet<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
    entities
        .into_iter()
        .filter(|e| e.node.as_deref().is_some_and(|n| names.contains(n)))
        .collect()
}

fn filter_by_namespace(
    entities: Vec<Entity>,
    expr: &Expression,
) -> Result<Vec<Entity>, SelectError> {
    if expr.is_empty() {
        return Ok(entities);
    }

    let mut filtered = Vec::new();
    for entity in entities {
        if expr.matches(&Labels::single(entity.namespace.as_str()))? {
            filtered.push(entity);
        }
    }
    Ok(filtered)
}

fn filter_by_annotations(
    entities: Vec<Entity>,
    expr: &Expression,
) -> Result<Vec<Entity>, SelectError> {
    if expr.is_empty() {
        return Ok(entities);
    }

    let mut filtered = Vec::new();
    for entity in entities {
        if expr.matches(&entity.annotations)? {
            filtered.push(entity);
        }
    }
    Ok(filtered)
}

fn filter_by_phase(entities: Vec<Entity>, expr: &Expression) -> Result<Vec<Entity>, SelectError> {
    if expr.is_empty() {
        return Ok(entities);
    }

    let mut filtered = Vec::new();
    for entity in entities {
        if expr.matches(&Labels::single(entity.phase.to_string()))? {
            filtered.push(entity);
        }
    }
    Ok(filtered)
}
