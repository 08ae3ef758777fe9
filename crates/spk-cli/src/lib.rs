//! # spk-cli: Command-Line Interface
//!
//! Provides the `spk` binary for inspecting object files against the core
//! kit.
//!
//! ## Subcommands
//!
//! - `spk resolve`: Resolve discriminator strings to registered types.
//! - `spk walk`: Traverse an object file and print each visited path.
//! - `spk id`: Compute content-addressed object ids.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers return an exit code and
//!   delegate to the library crates.
//! - Results go to stdout, logs to stderr.

pub mod config;
pub mod id;
pub mod input;
pub mod resolve;
pub mod walk;

use anyhow::Result;
use spk_registry::{core_kit, DiscriminatorResolver, TypeRegistry};

/// The process-wide resolver over the core kit.
pub fn resolver() -> Result<DiscriminatorResolver> {
    let registry = TypeRegistry::global();
    registry.initialize(&[core_kit()])?;
    Ok(registry.resolver()?)
}
