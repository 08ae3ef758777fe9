//! # Type Registry
//!
//! Builds and publishes the immutable [`TypeIndex`] of every concrete model
//! type reachable from the supplied [`Module`]s.
//!
//! ## Lifecycle
//!
//! - [`TypeRegistry::initialize`] builds the index exactly once. Racing
//!   callers converge on one build through double-checked locking: check
//!   the published index, take the init lock, check again, build, publish.
//! - [`TypeRegistry::types`] reads the published index without locking.
//!   Reading before initialization is [`RegistryError::NotInitialized`].
//! - [`TypeRegistry::reset`] drops the published index (and with it the
//!   resolver memo cache). It exists for test isolation.
//!
//! ## Scanning Rules
//!
//! Modules are deduplicated by name and modules built with
//! [`Module::dynamic`] are skipped. A definition is indexed when it is not
//! abstract and its parent chain reaches `Base`. An indexed definition
//! without a `speckle_type` fails the whole build.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwapOption;
use dashmap::DashMap;
use indexmap::IndexMap;
use parking_lot::Mutex;
use spk_core::{Base, ROOT_TYPE_NAME};
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::def::{Module, ObjectModel, TypeDef, TypeHandle};
use crate::descriptor::TypeDescriptor;
use crate::error::RegistryError;
use crate::resolver::DiscriminatorResolver;

/// The built index: descriptors keyed by canonical name and deprecated alias.
#[derive(Debug)]
pub struct TypeIndex {
    descriptors: Vec<Arc<TypeDescriptor>>,
    names: IndexMap<String, Arc<TypeDescriptor>>,
    fallback: Arc<TypeDescriptor>,
    modules: Vec<String>,
    pub(crate) memo: Option<DashMap<String, Arc<TypeDescriptor>>>,
    pub(crate) memo_capacity: usize,
}

impl TypeIndex {
    /// Descriptors in discovery order, `Base` first.
    pub fn descriptors(&self) -> &[Arc<TypeDescriptor>] {
        &self.descriptors
    }

    /// Exact lookup by canonical name or deprecated alias.
    pub fn lookup(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.names.get(name)
    }

    /// Descriptor registered for a Rust type.
    pub fn by_handle(&self, handle: TypeHandle) -> Option<&Arc<TypeDescriptor>> {
        self.descriptors.iter().find(|d| d.runtime_type == handle)
    }

    /// The discriminator a serializer writes for instances of `T`.
    pub fn discriminator_of<T: 'static>(&self) -> Option<String> {
        self.by_handle(TypeHandle::of::<T>()).map(|d| d.discriminator())
    }

    /// The root descriptor every unresolvable discriminator degrades to.
    pub fn fallback(&self) -> &Arc<TypeDescriptor> {
        &self.fallback
    }

    /// Number of indexed types.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Always false: the root type is always indexed.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Every name the index answers to, canonical names first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Sorted, deduplicated names of the modules the index was built from.
    pub fn module_names(&self) -> &[String] {
        &self.modules
    }
}

/// Process-wide or host-owned registry of model types.
#[derive(Debug)]
pub struct TypeRegistry {
    index: ArcSwapOption<TypeIndex>,
    init_lock: Mutex<()>,
    config: RegistryConfig,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// An uninitialized registry with default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// An uninitialized registry with explicit configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            index: ArcSwapOption::empty(),
            init_lock: Mutex::new(()),
            config,
        }
    }

    /// The process-wide registry, configured from the environment.
    pub fn global() -> &'static TypeRegistry {
        static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let config = RegistryConfig::from_env().unwrap_or_else(|e| {
                warn!(error = %e, "falling back to default registry configuration");
                RegistryConfig::default()
            });
            TypeRegistry::with_config(config)
        })
    }

    /// Build the index from `modules`, or return the existing one.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a model type is misdeclared, or
    /// [`RegistryError::ConflictingInitialization`] if the registry was
    /// already built from a different module set.
    pub fn initialize(&self, modules: &[Module]) -> Result<Arc<TypeIndex>, RegistryError> {
        let requested = module_names(modules);
        if let Some(index) = self.index.load_full() {
            return ensure_same_modules(index, requested);
        }

        let _guard = self.init_lock.lock();
        if let Some(index) = self.index.load_full() {
            return ensure_same_modules(index, requested);
        }

        let index = Arc::new(build_index(modules, requested, &self.config)?);
        info!(
            types = index.len(),
            names = index.names.len(),
            modules = index.modules.len(),
            "type registry initialized"
        );
        self.index.store(Some(Arc::clone(&index)));
        Ok(index)
    }

    /// Whether an index has been published.
    pub fn is_initialized(&self) -> bool {
        self.index.load().is_some()
    }

    /// The published index.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotInitialized`] before `initialize`.
    pub fn types(&self) -> Result<Arc<TypeIndex>, RegistryError> {
        self.index.load_full().ok_or(RegistryError::NotInitialized)
    }

    /// A resolver over the published index.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotInitialized`] before `initialize`.
    pub fn resolver(&self) -> Result<DiscriminatorResolver, RegistryError> {
        self.types().map(DiscriminatorResolver::new)
    }

    /// Drop the published index so the next `initialize` rebuilds it.
    ///
    /// Resolvers created earlier keep the index they were created from.
    pub fn reset(&self) {
        let _guard = self.init_lock.lock();
        self.index.store(None);
        debug!("type registry reset");
    }
}

fn module_names(modules: &[Module]) -> Vec<String> {
    let mut names: Vec<String> = modules.iter().map(|m| m.name().to_string()).collect();
    names.sort();
    names.dedup();
    names
}

fn ensure_same_modules(
    index: Arc<TypeIndex>,
    requested: Vec<String>,
) -> Result<Arc<TypeIndex>, RegistryError> {
    if index.modules == requested {
        Ok(index)
    } else {
        Err(RegistryError::ConflictingInitialization {
            existing: index.modules.clone(),
            requested,
        })
    }
}

/// The chain of definitions from `Base` down to `def`, or `None` when the
/// chain leaves the known definitions before reaching `Base`.
fn lineage<'a>(
    defs: &'a IndexMap<TypeHandle, TypeDef>,
    def: &'a TypeDef,
) -> Result<Option<Vec<&'a TypeDef>>, RegistryError> {
    let root = TypeHandle::of::<Base>();
    let mut chain = vec![def];
    let mut seen = HashSet::from([def.handle]);
    let mut current = def;
    loop {
        if current.handle == root {
            chain.reverse();
            return Ok(Some(chain));
        }
        let Some(parent) = current.parent else {
            return Ok(None);
        };
        let Some(parent_def) = defs.get(&parent) else {
            return Ok(None);
        };
        if !seen.insert(parent) {
            return Err(RegistryError::InheritanceCycle {
                type_name: def.handle.name().to_string(),
            });
        }
        chain.push(parent_def);
        current = parent_def;
    }
}

fn build_index(
    modules: &[Module],
    module_names: Vec<String>,
    config: &RegistryConfig,
) -> Result<TypeIndex, RegistryError> {
    let root = TypeHandle::of::<Base>();
    let mut defs: IndexMap<TypeHandle, TypeDef> = IndexMap::new();
    defs.insert(root, <Base as ObjectModel>::type_def());

    let mut scanned = HashSet::new();
    for module in modules {
        if !scanned.insert(module.name()) {
            continue;
        }
        if !module.is_scannable() {
            debug!(module = module.name(), "skipping module that cannot be scanned");
            continue;
        }
        for def in module.types() {
            defs.entry(def.handle).or_insert_with(|| def.clone());
        }
    }

    let mut descriptors = Vec::new();
    for def in defs.values() {
        if def.is_abstract {
            continue;
        }
        let Some(chain) = lineage(&defs, def)? else {
            debug!(type_name = def.handle.name(), "not derived from Base; skipping");
            continue;
        };
        let canonical_name =
            def.speckle_type
                .clone()
                .ok_or_else(|| RegistryError::MissingTypeIdentity {
                    type_name: def.handle.name().to_string(),
                })?;

        let ancestry = if def.handle == root {
            vec![canonical_name.clone()]
        } else {
            chain
                .iter()
                .filter(|d| d.handle != root)
                .filter_map(|d| d.speckle_type.clone())
                .collect()
        };

        let mut property_index = IndexMap::new();
        for ancestor in &chain {
            for member in &ancestor.members {
                property_index
                    .entry(member.name().to_string())
                    .or_insert_with(|| member.clone());
            }
        }

        descriptors.push(Arc::new(TypeDescriptor {
            canonical_name,
            runtime_type: def.handle,
            ancestry,
            deprecated_names: def.deprecated_names.clone(),
            property_index,
        }));
    }

    let mut names: IndexMap<String, Arc<TypeDescriptor>> = IndexMap::new();
    for descriptor in &descriptors {
        let previous = names.insert(descriptor.canonical_name.clone(), Arc::clone(descriptor));
        if let Some(first) = previous {
            return Err(RegistryError::DuplicateTypeName {
                name: descriptor.canonical_name.clone(),
                first: first.runtime_type.name().to_string(),
                second: descriptor.runtime_type.name().to_string(),
            });
        }
    }
    // Canonical names win over aliases; the first alias claim wins over later ones.
    for descriptor in &descriptors {
        for alias in &descriptor.deprecated_names {
            names
                .entry(alias.clone())
                .or_insert_with(|| Arc::clone(descriptor));
        }
    }

    let fallback = names
        .get(ROOT_TYPE_NAME)
        .cloned()
        .ok_or_else(|| RegistryError::MissingTypeIdentity {
            type_name: root.name().to_string(),
        })?;

    Ok(TypeIndex {
        descriptors,
        names,
        fallback,
        modules: module_names,
        memo: config.memoize.then(DashMap::new),
        memo_capacity: config.memo_capacity,
    })
}
