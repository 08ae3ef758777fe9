//! # Walk Subcommand
//!
//! Traverses an object file and prints one line per yielded node:
//! `<member path>\t<speckle_type>`. The root's path is `/`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use spk_traverse::{default_traversal, flatten, path_index, GraphTraversal};

/// Which rule set drives the walk.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleSet {
    /// Displayable objects descend only into hosted elements.
    #[default]
    Displayable,
    /// Every member of every node.
    All,
}

impl RuleSet {
    pub fn traversal(self) -> GraphTraversal {
        match self {
            Self::Displayable => default_traversal(),
            Self::All => GraphTraversal::default(),
        }
    }
}

/// Arguments for the `spk walk` subcommand.
#[derive(Args, Debug)]
pub struct WalkArgs {
    /// JSON or YAML object file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Rule set to traverse with.
    #[arg(long, value_enum, default_value_t = RuleSet::Displayable)]
    pub rules: RuleSet,

    /// Print each distinct node once instead of once per path.
    #[arg(long)]
    pub distinct: bool,
}

/// Execute the walk subcommand.
pub fn run_walk(args: &WalkArgs) -> Result<u8> {
    let mut out = std::io::stdout().lock();
    walk_to(args, &mut out)
}

/// Write the walk of `args.file` to `out`.
pub fn walk_to(args: &WalkArgs, out: &mut impl Write) -> Result<u8> {
    let resolver = crate::resolver()?;
    let root = crate::input::load_root(&args.file, &resolver)?;

    if args.distinct {
        let nodes = flatten(root);
        tracing::info!(nodes = nodes.len(), "walk complete");
        for node in nodes {
            writeln!(out, "{}", node.speckle_type())?;
        }
        return Ok(0);
    }

    let entries = path_index(root, &args.rules.traversal());
    tracing::info!(nodes = entries.len(), "walk complete");
    for (path, node) in entries {
        writeln!(out, "/{path}\t{}", node.speckle_type())?;
    }
    Ok(0)
}
