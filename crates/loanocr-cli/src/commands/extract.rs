//! Extract command - OCR a single application image.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use loanocr_core::{ApplicationRecord, CsvRecordStore, RecordStore, Upload};

use super::{build_pipeline, format_fields, load_config, spinner, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Application image (png, jpg or jpeg)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the recognized text
    #[arg(long)]
    show_text: bool,

    /// Print each matched value with its position in the text
    #[arg(long)]
    show_matches: bool,

    /// Append the extracted application to the record store
    #[arg(long)]
    save: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let upload = Upload::from_path(&args.input)?;
    info!("Processing file: {}", args.input.display());

    let pipeline = build_pipeline(&config)?;

    let pb = spinner("Running OCR...")?;
    let result = pipeline.process_upload(&upload);
    pb.finish_and_clear();
    let result = result?;

    if args.show_text {
        eprintln!("{}", style("Recognized text:").bold());
        eprintln!("{}", result.text);
        eprintln!();
    }

    if args.show_matches {
        eprintln!("{}", style("Matches:").bold());
        for m in pipeline.parser().matches(&result.raw_text) {
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

    let output = format_fields(&result.fields, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.save {
        if !result.is_valid() {
            anyhow::bail!("Not saving: {} required field(s) missing", result.errors.len());
        }
        let store = CsvRecordStore::new(&config.store.path);
        let record = ApplicationRecord::submit_now(result.fields);
        store.append(&record)?;
        println!(
            "{} Saved to {}",
            style("✓").green(),
            store.path().display()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
