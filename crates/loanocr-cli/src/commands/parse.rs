//! Parse command - extract fields from text without OCR.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;

use loanocr_core::{ApplicationParser, RuleBasedParser};

use super::{format_fields, load_config, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file to parse ("-" or omitted reads stdin)
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print each matched value with its position in the text
    #[arg(long)]
    show_matches: bool,

    /// Fail when required fields are missing
    #[arg(long)]
    strict: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = match &args.input {
        Some(path) if path.as_os_str() != "-" => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            fs::read_to_string(path)?
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let parser = RuleBasedParser::from_config(&config.normalization);
    let result = parser.parse(&text);

    if args.show_matches {
        eprintln!("{}", style("Matches:").bold());
        for m in parser.matches(&text) {
            eprintln!(
                "  {:<16} {:?} at {}..{}",
                m.field.key(),
                m.value,
                m.position.0,
                m.position.1
            );
        }
        eprintln!();
    }

    if !result.is_valid() {
        eprintln!("{}", style("Validation issues:").yellow());
        for issue in &result.errors {
            eprintln!("  - {}", issue);
        }
    }

    println!("{}", format_fields(&result.fields, args.format)?);

    if args.strict && !result.is_valid() {
        anyhow::bail!("{} required field(s) missing", result.errors.len());
    }

    Ok(())
}
