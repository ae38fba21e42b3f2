//! tricore-mcprint CLI.
//!
//! ```bash
//! tricore-mcprint listing.jsonl --mcpu tc1.6.2
//! tricore-mcprint - --mcpu tc1.3 --mattr +tc131 --show-address < listing.jsonl
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tricore_disas::InstPrinter;
use tricore_mc::{AsmInfo, SubtargetInfo, VariantSyntax, CPUS};
use tricore_mcprint::render_listing;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantStyle {
    /// hi:sym
    Prefix,
    /// sym@hi
    At,
    /// sym(hi)
    Parens,
}

impl From<VariantStyle> for VariantSyntax {
    fn from(v: VariantStyle) -> Self {
        match v {
            VariantStyle::Prefix => VariantSyntax::Prefix,
            VariantStyle::At => VariantSyntax::At,
            VariantStyle::Parens => VariantSyntax::Parens,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "tricore-mcprint",
    version,
    about = "Print TriCore MC instructions (JSON Lines) as assembly text"
)]
struct Args {
    /// Input listing, one JSON record per line ("-" for stdin)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Target CPU
    #[arg(long, default_value = "tc1.6.2")]
    mcpu: String,

    /// Feature overrides, e.g. "+tc161,-tc162"
    #[arg(long, default_value = "")]
    mattr: String,

    /// Print pc-relative branch displacements as absolute addresses
    #[arg(long)]
    print_branch_targets: bool,

    /// Prefix each line with the instruction address
    #[arg(long)]
    show_address: bool,

    /// Emit a comment line naming the CPU and its features
    #[arg(long)]
    header: bool,

    /// How relocation variants attach to symbols
    #[arg(long, value_enum, default_value = "prefix")]
    variant_syntax: VariantStyle,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .init();

    let sti = SubtargetInfo::new(&args.mcpu, &args.mattr).with_context(|| {
        let names: Vec<&str> = CPUS.iter().map(|c| c.name).collect();
        format!("invalid subtarget (known CPUs: {})", names.join(", "))
    })?;

    let mai = AsmInfo {
        variant_syntax: args.variant_syntax.into(),
        ..AsmInfo::default()
    };
    let printer = InstPrinter::new(mai).with_branch_targets(args.print_branch_targets);

    let input = read_input(&args.input)?;
    let mut text = String::with_capacity(input.len());
    if args.header {
        text.push_str(&format!(
            "{} cpu: {} features: {}\n",
            mai.comment_string,
            sti.cpu(),
            sti.feature_bits().feature_names().join(",")
        ));
    }
    let count = render_listing(&input, &printer, &sti, args.show_address, &mut text)
        .with_context(|| format!("failed to print {}", args.input))?;
    log::debug!("printed {count} instructions");

    match &args.output {
        Some(path) => fs::write(path, &text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .context("failed to write stdout")?,
    }
    Ok(())
}
