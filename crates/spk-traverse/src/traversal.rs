//! # Graph Traversal
//!
//! Breadth-first, rule-driven walk over an object graph.
//!
//! The walk keeps an explicit work queue of [`TraversalContext`]s, so depth
//! of the graph never translates into stack depth. Each dequeued context
//! picks its active rule, enqueues the nodes found under the members that
//! rule selects, and is yielded if the rule says so.
//!
//! Lists and maps never add a path segment: a node found inside
//! `elements: [[a, b], {"k": c}]` gets a context whose `prop_name` is
//! `elements` and whose parent is the node owning `elements`.
//!
//! Nodes are not de-duplicated. A node reachable along two paths is
//! visited once per path; use [`flatten`](crate::flatten) for distinct nodes.

use std::collections::VecDeque;
use std::sync::Arc;

use spk_core::{Base, Value};
use tracing::trace;

use crate::context::TraversalContext;
use crate::rule::{default_rule, TraversalRule};

/// An ordered rule set. Earlier rules take priority.
#[derive(Debug, Default)]
pub struct GraphTraversal {
    rules: Vec<TraversalRule>,
}

impl GraphTraversal {
    /// A traversal applying `rules` in the given order, then the default rule.
    pub fn new(rules: impl IntoIterator<Item = TraversalRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// The registered rules, in priority order.
    pub fn rules(&self) -> &[TraversalRule] {
        &self.rules
    }

    /// The first rule applying to `base`, else the default rule.
    pub fn active_rule(&self, base: &Base) -> &TraversalRule {
        active_rule(&self.rules, base)
    }

    /// Walk the graph under `root`.
    pub fn traverse(&self, root: Arc<Base>) -> Traverse<'_> {
        traverse(root, &self.rules)
    }
}

fn active_rule<'r>(rules: &'r [TraversalRule], base: &Base) -> &'r TraversalRule {
    rules
        .iter()
        .find(|rule| rule.applies(base))
        .unwrap_or_else(|| default_rule())
}

/// Walk the graph under `root` with `rules`, falling back to the default rule.
pub fn traverse(root: Arc<Base>, rules: &[TraversalRule]) -> Traverse<'_> {
    let mut queue = VecDeque::new();
    queue.push_back(Arc::new(TraversalContext::root(root)));
    Traverse { rules, queue }
}

/// Lazy, single-pass iterator over the contexts a traversal yields.
#[derive(Debug)]
pub struct Traverse<'r> {
    rules: &'r [TraversalRule],
    queue: VecDeque<Arc<TraversalContext>>,
}

impl Traverse<'_> {
    /// Contexts waiting to be visited.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Iterator for Traverse<'_> {
    type Item = Arc<TraversalContext>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ctx) = self.queue.pop_front() {
            let rule = active_rule(self.rules, ctx.current());
            for name in rule.members_to_descend(ctx.current()) {
                if let Some(value) = ctx.current().get(&name) {
                    enqueue(&mut self.queue, value, &name, &ctx);
                }
            }
            if rule.should_yield() {
                return Some(ctx);
            }
            trace!(speckle_type = ctx.current().speckle_type(), "node not yielded");
        }
        None
    }
}

fn enqueue(
    queue: &mut VecDeque<Arc<TraversalContext>>,
    value: &Value,
    prop_name: &str,
    parent: &Arc<TraversalContext>,
) {
    match value {
        Value::Node(node) => queue.push_back(Arc::new(TraversalContext::child(
            Arc::clone(node),
            prop_name,
            Arc::clone(parent),
        ))),
        Value::List(items) => {
            for item in items {
                enqueue(queue, item, prop_name, parent);
            }
        }
        Value::Map(map) => {
            for item in map.values() {
                enqueue(queue, item, prop_name, parent);
            }
        }
        _ => {}
    }
}
