//! Single-entity membership check against a [`TargetSpec`].

use faultline_model::{Entity, Labels, TargetSpec};

use crate::error::SelectError;
use crate::requirement::Expression;

/// Returns whether one entity meets the spec's selection criteria, without
/// listing the whole pool.
///
/// Intended for incremental checks, reacting to one entity change at a time.
/// Field-selector and node-based constraints are not evaluated by this path;
/// callers needing those must run the full pipeline.
pub fn meets(entity: &Entity, spec: &TargetSpec) -> Result<bool, SelectError> {
    if !spec.pods.is_empty() {
        let listed = spec
            .pods
            .get(&entity.namespace)
            .is_some_and(|names| names.iter().any(|n| n == &entity.name));
        if !listed {
            return Ok(false);
        }
    }

    // absent label maps on either side behave as empty
    if !spec.label_selectors.is_empty() && !entity.labels.matches_set(&spec.label_selectors) {
        return Ok(false);
    }

    let namespaces = Expression::from_fragments(&spec.namespaces)?;
    if !namespaces.matches(&Labels::single(entity.namespace.as_str()))? {
        return Ok(false);
    }

    let annotations = Expression::from_keys(spec.annotation_selectors.keys())?;
    if !annotations.matches(&entity.annotations)? {
        return Ok(false);
    }

    let phases = Expression::from_fragments(&spec.pod_phase_selectors)?;
    if !phases.matches(&Labels::single(entity.phase.to_string()))? {
        return Ok(false);
    }

    Ok(true)
}
