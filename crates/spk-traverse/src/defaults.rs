//! Stock rule sets for finding displayable and convertible objects.

use std::sync::Arc;

use spk_core::{Base, Value};

use crate::rule::TraversalRule;
use crate::traversal::GraphTraversal;

/// Member names holding display geometry.
pub const DISPLAY_VALUE_ALIASES: [&str; 2] = ["displayValue", "@displayValue"];

/// Member names holding hosted child elements.
pub const ELEMENTS_ALIASES: [&str; 2] = ["elements", "@elements"];

/// Member names holding raw geometry.
pub const GEOMETRY_ALIASES: [&str; 2] = ["geometry", "@geometry"];

/// Member names holding a block or instance definition.
pub const DEFINITION_ALIASES: [&str; 2] = ["definition", "@definition"];

/// Namespace of analysis result objects, which are never descended into.
pub const STRUCTURAL_RESULTS_NAMESPACE: &str = "Objects.Structural.Results";

/// Whether `base` carries a non-null display value.
pub fn has_display_value(base: &Base) -> bool {
    DISPLAY_VALUE_ALIASES
        .iter()
        .any(|alias| base.get(alias).is_some_and(|v| !v.is_null()))
}

/// The nodes stored under any display value alias.
pub fn display_values(base: &Base) -> Vec<Arc<Base>> {
    let mut out = Vec::new();
    for alias in DISPLAY_VALUE_ALIASES {
        match base.get(alias) {
            Some(Value::Node(node)) => out.push(Arc::clone(node)),
            Some(Value::List(items)) => {
                out.extend(items.iter().filter_map(Value::as_node).cloned())
            }
            _ => {}
        }
    }
    out
}

/// Whether `base` is an analysis result object.
pub fn is_structural_result(base: &Base) -> bool {
    base.speckle_type().contains(STRUCTURAL_RESULTS_NAMESPACE)
}

fn ignore_results_rule() -> TraversalRule {
    TraversalRule::when(is_structural_result).descend_none()
}

/// Displayable objects descend only into their hosted elements; result
/// objects are not descended; everything else descends into all members.
pub fn default_traversal() -> GraphTraversal {
    GraphTraversal::new([
        ignore_results_rule(),
        TraversalRule::when(has_display_value).descend_into(ELEMENTS_ALIASES),
    ])
}

/// Like [`default_traversal`], also stopping at objects `can_convert`
/// accepts: their conversion covers everything but hosted elements.
pub fn convertible_traversal(
    can_convert: impl Fn(&Base) -> bool + Send + Sync + 'static,
) -> GraphTraversal {
    GraphTraversal::new([
        TraversalRule::when(can_convert)
            .or_when(has_display_value)
            .descend_into(ELEMENTS_ALIASES),
        ignore_results_rule(),
    ])
}
