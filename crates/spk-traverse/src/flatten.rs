//! Distinct-node and path-index helpers built on the default walk.

use std::collections::HashSet;
use std::sync::Arc;

use spk_core::Base;

use crate::traversal::{traverse, GraphTraversal};

/// Every distinct node under `root`, root first, in breadth-first order.
///
/// Nodes are compared by pointer identity: a node shared by two parents
/// appears once, two equal but separate nodes appear twice.
pub fn flatten(root: Arc<Base>) -> Vec<Arc<Base>> {
    let mut seen = HashSet::new();
    traverse(root, &[])
        .filter(|ctx| seen.insert(Arc::as_ptr(ctx.current())))
        .map(|ctx| Arc::clone(ctx.current()))
        .collect()
}

/// Each yielded node with its member path from the root, joined by `/`.
///
/// A node reachable along two paths is listed once per path.
pub fn path_index(root: Arc<Base>, traversal: &GraphTraversal) -> Vec<(String, Arc<Base>)> {
    traversal
        .traverse(root)
        .map(|ctx| {
            let mut path = ctx.property_path();
            path.reverse();
            (path.join("/"), Arc::clone(ctx.current()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use spk_core::Value;

    use super::*;

    #[test]
    fn shared_nodes_are_listed_once() {
        let shared = Arc::new(Base::new("Shared"));
        let mut root = Base::default();
        root.set("a", Arc::clone(&shared)).unwrap();
        root.set("b", vec![Value::from(Arc::clone(&shared)), Value::from(Base::new("Shared"))])
            .unwrap();
        let flat = flatten(Arc::new(root));
        assert_eq!(flat.len(), 3);
        assert!(Arc::ptr_eq(&flat[1], &shared));
    }

    #[test]
    fn path_index_lists_every_path() {
        let shared = Arc::new(Base::new("Shared"));
        let mut inner = Base::new("Inner");
        inner.set("@leaf", Arc::clone(&shared)).unwrap();
        let mut root = Base::default();
        root.set("elements", vec![Value::from(inner)]).unwrap();
        root.set("direct", shared).unwrap();

        let paths: Vec<_> = path_index(Arc::new(root), &GraphTraversal::default())
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(paths, vec!["", "elements", "direct", "elements/@leaf"]);
    }
}
