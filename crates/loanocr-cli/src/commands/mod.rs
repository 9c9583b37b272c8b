//! CLI subcommands and the helpers they share.

pub mod config;
pub mod extract;
pub mod intake;
pub mod parse;
pub mod records;

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use loanocr_core::intake::is_required;
use loanocr_core::models::config::LoanOcrConfig;
use loanocr_core::{ApplicationRecord, Field, FieldSet, IntakePipeline, PureOcrEngine};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("loanocr")
        .join("config.json")
}

/// Resolve the config file path from `--config` or the default location.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists.
///
/// A path given with `--config` must exist.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LoanOcrConfig> {
    if let Some(path) = config_path {
        let path = Path::new(path);
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(LoanOcrConfig::from_file(path)?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(LoanOcrConfig::from_file(&path)?)
    } else {
        Ok(LoanOcrConfig::default())
    }
}

/// Build the OCR pipeline, failing with a hint when models are missing.
pub fn build_pipeline(config: &LoanOcrConfig) -> anyhow::Result<IntakePipeline<PureOcrEngine>> {
    if !config.ocr.models_present() {
        anyhow::bail!(
            "OCR models not found in {}.\n\n\
             Place {} and {} there, or run 'loanocr config set ocr.model_dir <DIR>'.",
            config.ocr.model_dir.display(),
            config.ocr.detection_model,
            config.ocr.recognition_model
        );
    }

    let engine = PureOcrEngine::from_config(&config.ocr)
        .map_err(|e| anyhow::anyhow!("Failed to load OCR models: {}", e))?;

    Ok(IntakePipeline::from_config(engine, config))
}

/// Spinner shown while a blocking stage runs.
pub fn spinner(message: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

pub fn format_fields(fields: &FieldSet, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(Field::ALL.iter().map(|f| f.key()))?;
            wtr.write_record(fields.iter().map(|(_, value)| value))?;
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => Ok(format_fields_text(fields)),
    }
}

/// One `Label: value` line per field, required fields marked with `*`.
pub fn format_fields_text(fields: &FieldSet) -> String {
    let mut output = String::new();

    for (field, value) in fields.iter() {
        let marker = if is_required(field) { "*" } else { " " };
        let label = format!("{}{}", field.label(), marker);
        output.push_str(&format!("{:<17} {}\n", label, value));
    }

    output
}

pub fn format_records(
    records: &[ApplicationRecord],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(ApplicationRecord::header())?;
            for record in records {
                wtr.write_record(record.row())?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut output = String::new();
            for (i, record) in records.iter().enumerate() {
                if i > 0 {
                    output.push('\n');
                }
                output.push_str(&format!(
                    "Application {} (submitted {})\n",
                    i + 1,
                    record.submitted_at_text()
                ));
                output.push_str(&format_fields_text(record.fields()));
            }
            Ok(output)
        }
    }
}
