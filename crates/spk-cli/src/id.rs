//! # Id Subcommand
//!
//! Computes content-addressed object ids. With `--all`, prints
//! `<id>\t<speckle_type>` for every distinct node, root first.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use spk_traverse::flatten;

/// Arguments for the `spk id` subcommand.
#[derive(Args, Debug)]
pub struct IdArgs {
    /// JSON or YAML object file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the id of every distinct node, not only the root.
    #[arg(long)]
    pub all: bool,

    /// Exit with status 2 if the root's stored `id` differs from the computed one.
    #[arg(long)]
    pub verify: bool,
}

/// Execute the id subcommand.
pub fn run_id(args: &IdArgs) -> Result<u8> {
    let mut out = std::io::stdout().lock();
    id_to(args, &mut out)
}

/// Write the ids for `args.file` to `out`.
pub fn id_to(args: &IdArgs, out: &mut impl Write) -> Result<u8> {
    let resolver = crate::resolver()?;
    let root = crate::input::load_root(&args.file, &resolver)?;
    let root_id = root.compute_id().context("failed to canonicalize root object")?;

    if args.all {
        for node in flatten(root.clone()) {
            let id = node
                .compute_id()
                .with_context(|| format!("failed to canonicalize {}", node.speckle_type()))?;
            writeln!(out, "{id}\t{}", node.speckle_type())?;
        }
    } else {
        writeln!(out, "{root_id}")?;
    }

    if args.verify {
        if let Some(stored) = root.id() {
            if stored != root_id.as_str() {
                tracing::warn!(stored, computed = %root_id, "stored id does not match content");
                return Ok(2);
            }
        }
    }
    Ok(0)
}
