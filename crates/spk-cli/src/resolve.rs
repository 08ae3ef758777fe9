//! # Resolve Subcommand
//!
//! Prints the type each discriminator resolves to, one line per input:
//! `<input>\t<canonical name>\t<exact|fallback>`.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use spk_core::DISCRIMINATOR_SEPARATOR;
use spk_registry::DiscriminatorResolver;

/// Arguments for the `spk resolve` subcommand.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Discriminator strings, e.g. `Objects.Geometry.Mesh:Custom.Mesh`.
    #[arg(value_name = "DISCRIMINATOR", required = true)]
    pub discriminators: Vec<String>,

    /// Exit with status 2 if any input falls back to Base.
    #[arg(long)]
    pub strict: bool,
}

/// Execute the resolve subcommand.
pub fn run_resolve(args: &ResolveArgs) -> Result<u8> {
    let resolver = crate::resolver()?;
    let mut out = std::io::stdout().lock();
    resolve_to(&resolver, args, &mut out)
}

/// Write one line per discriminator to `out`.
pub fn resolve_to(
    resolver: &DiscriminatorResolver,
    args: &ResolveArgs,
    out: &mut impl Write,
) -> Result<u8> {
    let mut fell_back = false;
    for input in &args.discriminators {
        let descriptor = resolver.resolve(input);
        // The root type asked for by name is an exact match.
        let fallback = resolver.is_fallback(&descriptor)
            && !input
                .rsplit(DISCRIMINATOR_SEPARATOR)
                .any(|s| s == descriptor.canonical_name());
        fell_back |= fallback;
        writeln!(
            out,
            "{input}\t{}\t{}",
            descriptor.canonical_name(),
            if fallback { "fallback" } else { "exact" }
        )?;
    }
    Ok(if args.strict && fell_back { 2 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(inputs: &[&str], strict: bool) -> (u8, String) {
        let args = ResolveArgs {
            discriminators: inputs.iter().map(|s| s.to_string()).collect(),
            strict,
        };
        let mut out = Vec::new();
        let code = resolve_to(&crate::resolver().unwrap(), &args, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn known_and_unknown_inputs() {
        let (code, out) = run(&["Base:Speckle.Core.Models.Collection", "Base", "Foo.Bar"], false);
        assert_eq!(code, 0);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Base:Speckle.Core.Models.Collection\tSpeckle.Core.Models.Collection\texact",
                "Base\tBase\texact",
                "Foo.Bar\tBase\tfallback",
            ]
        );
    }

    #[test]
    fn strict_mode_flags_fallbacks() {
        assert_eq!(run(&["Foo.Bar"], true).0, 2);
        assert_eq!(run(&["Speckle.Core.Models.DataChunk"], true).0, 0);
    }
}
