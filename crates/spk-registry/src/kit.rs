//! # Core Kit
//!
//! Model types every host understands: the root `Base`, the `Collection`
//! container used to organise elements into a tree, and `DataChunk`, which
//! carries slices of large lists.

use spk_core::{Base, ROOT_TYPE_NAME};

use crate::def::{Module, ObjectModel, TypeDef};

/// Module name of the core kit.
pub const CORE_KIT: &str = "Speckle.Core";

impl ObjectModel for Base {
    fn type_def() -> TypeDef {
        TypeDef::of::<Self>().speckle_type(ROOT_TYPE_NAME)
    }
}

/// A named, typed container of elements.
pub struct Collection;

impl ObjectModel for Collection {
    fn type_def() -> TypeDef {
        TypeDef::of::<Self>()
            .speckle_type("Speckle.Core.Models.Collection")
            .derives_from::<Base>()
            .member("name")
            .member("collectionType")
            .detached_member("elements")
    }
}

/// A slice of a chunked list.
pub struct DataChunk;

impl ObjectModel for DataChunk {
    fn type_def() -> TypeDef {
        TypeDef::of::<Self>()
            .speckle_type("Speckle.Core.Models.DataChunk")
            .derives_from::<Base>()
            .member("data")
    }
}

/// The core kit module.
pub fn core_kit() -> Module {
    Module::new(CORE_KIT)
        .with::<Base>()
        .with::<Collection>()
        .with::<DataChunk>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeRegistry;

    #[test]
    fn core_kit_registers_three_types() {
        let registry = TypeRegistry::new();
        let index = registry.initialize(&[core_kit()]).unwrap();
        assert_eq!(index.len(), 3);
        let collection = index.lookup("Speckle.Core.Models.Collection").unwrap();
        assert!(collection.property("elements").unwrap().is_detachable());
        assert_eq!(collection.discriminator(), "Speckle.Core.Models.Collection");
    }
}
