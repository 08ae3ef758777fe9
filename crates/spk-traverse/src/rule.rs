//! # Traversal Rules
//!
//! A rule pairs one or more conditions with a member selector and a yield
//! flag. The first rule whose condition matches a node is that node's
//! *active rule*: it decides which members the walk descends into and
//! whether the node appears in the output.
//!
//! ```
//! use spk_traverse::TraversalRule;
//!
//! let skip_results = TraversalRule::when(|b| b.speckle_type().contains("Results"))
//!     .descend_none()
//!     .yields(false);
//! assert!(!skip_results.should_yield());
//! ```

use std::fmt;
use std::sync::OnceLock;

use spk_core::{Base, MemberKind};

/// Condition deciding whether a rule applies to a node.
pub type Predicate = Box<dyn Fn(&Base) -> bool + Send + Sync>;

/// Selector returning the member names to descend into.
pub type MemberSelector = Box<dyn Fn(&Base) -> Vec<String> + Send + Sync>;

/// How the walk treats nodes matching its conditions.
pub struct TraversalRule {
    conditions: Vec<Predicate>,
    members: MemberSelector,
    should_yield: bool,
}

impl TraversalRule {
    /// A rule applying to nodes matching `condition`.
    ///
    /// It yields matching nodes and descends into nothing until a
    /// `descend*` method says otherwise.
    pub fn when(condition: impl Fn(&Base) -> bool + Send + Sync + 'static) -> Self {
        Self {
            conditions: vec![Box::new(condition)],
            members: Box::new(|_| Vec::new()),
            should_yield: true,
        }
    }

    /// Also apply to nodes matching `condition`.
    pub fn or_when(mut self, condition: impl Fn(&Base) -> bool + Send + Sync + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }

    /// Descend into the members chosen by `selector`.
    pub fn descend(
        mut self,
        selector: impl Fn(&Base) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.members = Box::new(selector);
        self
    }

    /// Descend into a fixed list of member names.
    pub fn descend_into<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.descend(move |_| names.clone())
    }

    /// Descend into every declared and dynamic member.
    pub fn descend_all(self) -> Self {
        self.descend(|b| {
            b.member_names(MemberKind::All)
                .into_iter()
                .map(str::to_string)
                .collect()
        })
    }

    /// Stop descent at matching nodes.
    pub fn descend_none(self) -> Self {
        self.descend(|_| Vec::new())
    }

    /// Whether matching nodes are produced by the walk.
    pub fn yields(mut self, should_yield: bool) -> Self {
        self.should_yield = should_yield;
        self
    }

    /// Whether any condition matches `base`.
    pub fn applies(&self, base: &Base) -> bool {
        self.conditions.iter().any(|c| c(base))
    }

    /// Member names to descend into from `base`.
    pub fn members_to_descend(&self, base: &Base) -> Vec<String> {
        (self.members)(base)
    }

    /// Whether nodes governed by this rule are yielded.
    pub fn should_yield(&self) -> bool {
        self.should_yield
    }
}

impl fmt::Debug for TraversalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalRule")
            .field("conditions", &self.conditions.len())
            .field("should_yield", &self.should_yield)
            .finish_non_exhaustive()
    }
}

/// The rule used when no registered rule applies: every node, every
/// member, always yielded.
pub fn default_rule() -> &'static TraversalRule {
    static DEFAULT: OnceLock<TraversalRule> = OnceLock::new();
    DEFAULT.get_or_init(|| TraversalRule::when(|_| true).descend_all())
}
