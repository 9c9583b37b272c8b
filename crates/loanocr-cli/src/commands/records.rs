//! Records command - list submitted applications.

use clap::Args;
use console::style;

use loanocr_core::{CsvRecordStore, RecordStore};

use super::{format_records, load_config, OutputFormat};

/// Arguments for the records command.
#[derive(Args)]
pub struct RecordsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: RecordsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = CsvRecordStore::new(&config.store.path);
    let records = store.load()?;

    if records.is_empty() && matches!(args.format, OutputFormat::Text) {
        println!(
            "{} No applications stored in {}",
            style("ℹ").blue(),
            store.path().display()
        );
        return Ok(());
    }

    print!("{}", format_records(&records, args.format)?);
    if matches!(args.format, OutputFormat::Json) {
        println!();
    }

    Ok(())
}
