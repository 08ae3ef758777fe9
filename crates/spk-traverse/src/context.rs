//! # Traversal Context
//!
//! An immutable, backward-linked path from the traversal root to the node
//! being visited. Sibling contexts share their parent through `Arc`; a
//! context lives as long as any descendant context references it.

use std::sync::Arc;

use spk_core::Base;

/// One step of a traversal path.
#[derive(Debug)]
pub struct TraversalContext {
    current: Arc<Base>,
    prop_name: Option<String>,
    parent: Option<Arc<TraversalContext>>,
}

impl TraversalContext {
    /// The context of a traversal root.
    pub fn root(current: Arc<Base>) -> Self {
        Self {
            current,
            prop_name: None,
            parent: None,
        }
    }

    /// A context reached from `parent` through member `prop_name`.
    pub fn child(
        current: Arc<Base>,
        prop_name: impl Into<String>,
        parent: Arc<TraversalContext>,
    ) -> Self {
        Self {
            current,
            prop_name: Some(prop_name.into()),
            parent: Some(parent),
        }
    }

    /// The node visited by this context.
    pub fn current(&self) -> &Arc<Base> {
        &self.current
    }

    /// Member of the parent the node was reached through; `None` at the root.
    pub fn prop_name(&self) -> Option<&str> {
        self.prop_name.as_deref()
    }

    /// The enclosing context; `None` at the root.
    pub fn parent(&self) -> Option<&Arc<TraversalContext>> {
        self.parent.as_ref()
    }

    /// Whether this is the root context.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of steps from the root.
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// This context followed by each enclosing context up to the root.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Member names from this context up to the root.
    pub fn property_path(&self) -> Vec<&str> {
        self.ancestors().filter_map(TraversalContext::prop_name).collect()
    }

    /// Nodes from this context up to the root.
    pub fn ascendants(&self) -> impl Iterator<Item = &Arc<Base>> {
        self.ancestors().map(TraversalContext::current)
    }

    /// The nearest node (this one included) matching `predicate`.
    pub fn find_ascendant(&self, predicate: impl Fn(&Base) -> bool) -> Option<&Arc<Base>> {
        self.ascendants().find(|b| predicate(b))
    }
}

impl Drop for TraversalContext {
    // Unlink uniquely owned parents iteratively so long paths do not drop recursively.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(ctx) = next {
            match Arc::try_unwrap(ctx) {
                Ok(mut inner) => next = inner.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// Iterator over a context and its enclosing contexts.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a TraversalContext>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a TraversalContext;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}
