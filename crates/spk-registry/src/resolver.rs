//! # Discriminator Resolution
//!
//! Maps a serialized `speckle_type` string back to a [`TypeDescriptor`].
//!
//! A discriminator is a colon-separated chain of canonical names, most
//! generic first and most specific last, e.g.
//! `Objects.BuiltElements.Wall:Objects.BuiltElements.Revit.RevitWall`.
//! Segments are tried from the end of the string towards the start. Each
//! segment is looked up verbatim, then as its deprecated-namespace variant
//! (`Ns.Name` → `Ns.Deprecated.Name`). The first hit wins.
//!
//! Resolution never fails. A discriminator with no known segment resolves
//! to the `Base` descriptor so unknown data still loads as an opaque node
//! with all of its dynamic members.

use std::sync::Arc;

use spk_core::DISCRIMINATOR_SEPARATOR;
use tracing::debug;

use crate::descriptor::TypeDescriptor;
use crate::registry::TypeIndex;

/// Namespace segment inserted to form a deprecated-type variant.
pub const DEPRECATED_NAMESPACE: &str = "Deprecated";

/// The deprecated-namespace variant of a type name.
///
/// A bare name gets the namespace prepended (`Mesh` → `Deprecated.Mesh`).
/// Returns `None` for an empty name or an empty namespace (`.Mesh`).
pub fn deprecated_variant(segment: &str) -> Option<String> {
    match segment.rsplit_once('.') {
        Some(("", _)) => None,
        Some((namespace, name)) => Some(format!("{namespace}.{DEPRECATED_NAMESPACE}.{name}")),
        None if segment.is_empty() => None,
        None => Some(format!("{DEPRECATED_NAMESPACE}.{segment}")),
    }
}

/// Resolves discriminators against one built [`TypeIndex`].
///
/// Cheap to clone; clones share the index and its memo cache.
#[derive(Debug, Clone)]
pub struct DiscriminatorResolver {
    index: Arc<TypeIndex>,
}

impl DiscriminatorResolver {
    /// A resolver over `index`.
    pub fn new(index: Arc<TypeIndex>) -> Self {
        Self { index }
    }

    /// The index this resolver reads.
    pub fn index(&self) -> &TypeIndex {
        &self.index
    }

    /// The descriptor returned when nothing matches.
    pub fn fallback(&self) -> &Arc<TypeDescriptor> {
        self.index.fallback()
    }

    /// Whether `descriptor` is the fallback.
    pub fn is_fallback(&self, descriptor: &TypeDescriptor) -> bool {
        descriptor == self.index.fallback().as_ref()
    }

    /// Resolve `discriminator` to the most specific known type.
    ///
    /// Results are memoized until the cache reaches the configured
    /// capacity; concurrent first lookups may overfill it by the number of
    /// racing threads.
    pub fn resolve(&self, discriminator: &str) -> Arc<TypeDescriptor> {
        let Some(memo) = &self.index.memo else {
            return self.resolve_uncached(discriminator);
        };
        if let Some(hit) = memo.get(discriminator) {
            return Arc::clone(hit.value());
        }
        let resolved = self.resolve_uncached(discriminator);
        if memo.len() < self.index.memo_capacity {
            memo.insert(discriminator.to_string(), Arc::clone(&resolved));
        }
        resolved
    }

    fn resolve_uncached(&self, discriminator: &str) -> Arc<TypeDescriptor> {
        for segment in discriminator.rsplit(DISCRIMINATOR_SEPARATOR) {
            if let Some(found) = self.index.lookup(segment) {
                return Arc::clone(found);
            }
            if let Some(found) = deprecated_variant(segment)
                .as_deref()
                .and_then(|variant| self.index.lookup(variant))
            {
                return Arc::clone(found);
            }
        }
        debug!(discriminator, "no registered type matched; falling back to Base");
        Arc::clone(self.index.fallback())
    }
}

#[cfg(test)]
mod tests {
    use spk_core::Base;

    use super::*;
    use crate::def::{Module, ObjectModel, TypeDef};
    use crate::{RegistryConfig, TypeRegistry};

    struct A;
    struct B;
    struct OldMesh;
    struct OldPoint;

    impl ObjectModel for A {
        fn type_def() -> TypeDef {
            TypeDef::of::<Self>().speckle_type("Kit.A").derives_from::<Base>()
        }
    }

    impl ObjectModel for B {
        fn type_def() -> TypeDef {
            TypeDef::of::<Self>()
                .speckle_type("Kit.B")
                .deprecated_name("Kit.Legacy.B")
                .derives_from::<Base>()
        }
    }

    impl ObjectModel for OldMesh {
        fn type_def() -> TypeDef {
            TypeDef::of::<Self>()
                .speckle_type("Objects.Geometry.Deprecated.Mesh")
                .derives_from::<Base>()
        }
    }

    impl ObjectModel for OldPoint {
        fn type_def() -> TypeDef {
            TypeDef::of::<Self>().speckle_type("Deprecated.Point").derives_from::<Base>()
        }
    }

    fn resolver_with(config: RegistryConfig) -> DiscriminatorResolver {
        let registry = TypeRegistry::with_config(config);
        registry
            .initialize(&[Module::new("Kit").with::<A>()
                .with::<B>()
                .with::<OldMesh>()
                .with::<OldPoint>()])
            .unwrap();
        registry.resolver().unwrap()
    }

    fn resolver() -> DiscriminatorResolver {
        resolver_with(RegistryConfig::default())
    }

    #[test]
    fn deprecated_variant_inserts_namespace() {
        assert_eq!(
            deprecated_variant("Objects.Geometry.Mesh").as_deref(),
            Some("Objects.Geometry.Deprecated.Mesh")
        );
        assert_eq!(deprecated_variant("Mesh").as_deref(), Some("Deprecated.Mesh"));
        assert_eq!(deprecated_variant(".Mesh"), None);
        assert_eq!(deprecated_variant(""), None);
    }

    #[test]
    fn exact_match() {
        assert_eq!(resolver().resolve("Kit.A").canonical_name(), "Kit.A");
    }

    #[test]
    fn most_specific_known_segment_wins() {
        let r = resolver();
        assert_eq!(r.resolve("Kit.A:Kit.B").canonical_name(), "Kit.B");
        assert_eq!(r.resolve("Kit.A:Kit.B:Kit.Unknown").canonical_name(), "Kit.B");
        assert_eq!(r.resolve("Kit.B:Kit.A").canonical_name(), "Kit.A");
    }

    #[test]
    fn deprecated_alias_matches() {
        let r = resolver();
        assert_eq!(r.resolve("Kit.Other:Kit.Legacy.B").canonical_name(), "Kit.B");
    }

    #[test]
    fn deprecated_namespace_variant_matches() {
        let r = resolver();
        assert_eq!(
            r.resolve("Objects.Geometry.Mesh").canonical_name(),
            "Objects.Geometry.Deprecated.Mesh"
        );
    }

    #[test]
    fn bare_name_matches_root_deprecated_namespace() {
        let r = resolver();
        assert_eq!(r.resolve("Point").canonical_name(), "Deprecated.Point");
        assert_eq!(r.resolve("Foreign.Thing:Point").canonical_name(), "Deprecated.Point");
    }

    #[test]
    fn unknown_falls_back_to_base() {
        let r = resolver();
        let d = r.resolve("Foreign.Thing:Foreign.Other");
        assert!(d.is_root());
        assert!(r.is_fallback(&d));
        assert!(r.is_fallback(&r.resolve("")));
        assert!(r.is_fallback(&r.resolve(":::")));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(resolver().resolve("kit.a").is_root());
    }

    #[test]
    fn memoized_and_uncached_agree() {
        let cached = resolver();
        let uncached = resolver_with(RegistryConfig {
            memoize: false,
            ..RegistryConfig::default()
        });
        for d in ["Kit.A", "Kit.A:Kit.B", "x", "Objects.Geometry.Mesh", "Kit.Legacy.B"] {
            assert_eq!(cached.resolve(d).canonical_name(), uncached.resolve(d).canonical_name());
            assert_eq!(cached.resolve(d).canonical_name(), uncached.resolve(d).canonical_name());
        }
        assert!(uncached.index().memo.is_none());
        assert_eq!(cached.index().memo.as_ref().map(|m| m.len()), Some(5));
    }

    #[test]
    fn memo_stays_within_capacity() {
        let r = resolver_with(RegistryConfig {
            memo_capacity: 2,
            ..RegistryConfig::default()
        });
        for i in 0..50 {
            assert!(r.resolve(&format!("Foreign.Type{i}")).is_root());
        }
        assert_eq!(r.resolve("Kit.A").canonical_name(), "Kit.A");
        assert_eq!(r.index().memo.as_ref().map(|m| m.len()), Some(2));
    }

    #[test]
    fn reset_discards_memo_with_index() {
        let registry = TypeRegistry::new();
        registry.initialize(&[Module::new("Kit").with::<A>()]).unwrap();
        assert_eq!(registry.resolver().unwrap().resolve("Kit.A").canonical_name(), "Kit.A");
        registry.reset();
        registry.initialize(&[Module::new("Empty")]).unwrap();
        assert!(registry.resolver().unwrap().resolve("Kit.A").is_root());
    }
}
