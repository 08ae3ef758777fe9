//! # spk-traverse: Rule-Based Graph Traversal
//!
//! Walks arbitrarily deep object graphs breadth-first. What the walk
//! descends into and what it yields is decided per node by an ordered list
//! of [`TraversalRule`]s; a built-in default rule covers every node no
//! registered rule claims.
//!
//! Each yielded item is a [`TraversalContext`]: the node plus the member
//! path back to the root. Contexts share their ancestors through `Arc`.
//!
//! ## Crate Policy
//!
//! - Depends only on `spk-core` internally; no registry is required.
//! - A traversal owns its work queue and holds no state shared across calls.

pub mod context;
pub mod defaults;
pub mod flatten;
pub mod rule;
pub mod traversal;

pub use context::{Ancestors, TraversalContext};
pub use defaults::{
    convertible_traversal, default_traversal, display_values, has_display_value,
    is_structural_result, DEFINITION_ALIASES, DISPLAY_VALUE_ALIASES, ELEMENTS_ALIASES,
    GEOMETRY_ALIASES, STRUCTURAL_RESULTS_NAMESPACE,
};
pub use flatten::{flatten, path_index};
pub use rule::{default_rule, MemberSelector, Predicate, TraversalRule};
pub use traversal::{traverse, GraphTraversal, Traverse};
