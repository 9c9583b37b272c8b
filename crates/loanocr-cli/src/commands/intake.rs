//! Intake command - the guided four-screen flow.

use std::path::{Path, PathBuf};

use clap::Args;
use console::{style, Term};
use dialoguer::{Confirm, Input};
use tracing::{debug, warn};

use loanocr_core::intake::is_required;
use loanocr_core::{
    CsvRecordStore, Field, FieldSet, IntakeFlow, OcrBackend, RecordStore, Screen, Session, Upload,
};

use super::{build_pipeline, format_fields_text, load_config, spinner};

/// Arguments for the intake command.
#[derive(Args)]
pub struct IntakeArgs {
    /// Image to start with instead of prompting for one
    image: Option<PathBuf>,
}

pub async fn run(args: IntakeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let pipeline = build_pipeline(&config)?;
    let store = CsvRecordStore::new(&config.store.path);
    let flow = IntakeFlow::new(pipeline, store);

    let term = Term::stdout();
    let mut pending_image = args.image;
    let mut session = Session::new();

    loop {
        debug!("Intake screen: {}", session.screen());

        session = match session.screen() {
            Screen::Upload => {
                let path = match pending_image.take() {
                    Some(path) => path,
                    None => match prompt_image_path()? {
                        Some(path) => path,
                        None => break,
                    },
                };
                upload_screen(&flow, &session, &path)?
            }
            Screen::OcrReview => {
                term.write_line(&format!("{}", style("Extracted text").bold().underlined()))?;
                term.write_line(session.raw_text().unwrap_or_default())?;
                term.write_line("")?;

                let proceed = Confirm::new()
                    .with_prompt("Proceed to review and edit?")
                    .default(true)
                    .interact()?;
                if !proceed {
                    break;
                }
                flow.proceed(&session)?
            }
            Screen::ReviewAndEdit => review_screen(&flow, &session)?,
            Screen::Success => {
                term.write_line(&format!(
                    "{} Application submitted and saved to {}",
                    style("✓").green(),
                    flow.store().path().display()
                ))?;

                let again = Confirm::new()
                    .with_prompt("Start a new application?")
                    .default(false)
                    .interact()?;
                if !again {
                    break;
                }
                flow.reset(&session)?
            }
        };
    }

    Ok(())
}

fn prompt_image_path() -> anyhow::Result<Option<PathBuf>> {
    let input: String = Input::new()
        .with_prompt("Application image (png, jpg, jpeg; empty to quit)")
        .allow_empty(true)
        .interact_text()?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(trimmed)))
    }
}

/// Run one upload. Recoverable failures are shown and the session is kept.
fn upload_screen<O: OcrBackend, S: RecordStore>(
    flow: &IntakeFlow<O, S>,
    session: &Session,
    path: &Path,
) -> anyhow::Result<Session> {
    let upload = match Upload::from_path(path) {
        Ok(upload) => upload,
        Err(e) => {
            eprintln!("{} {}", style("✗").red(), e);
            return Ok(session.clone());
        }
    };

    let pb = spinner("Extracting text...")?;
    let result = flow.handle_upload(session, &upload);
    pb.finish_and_clear();

    let next = match result {
        Ok(next) => next,
        Err(e) if e.is_image_decode_failure() => {
            eprintln!(
                "{} Could not read the image, please upload another file: {}",
                style("✗").red(),
                e
            );
            return Ok(session.clone());
        }
        Err(e) => {
            warn!("Upload failed: {}", e);
            eprintln!("{} {}", style("✗").red(), e);
            return Ok(session.clone());
        }
    };

    if !next.errors().is_empty() {
        eprintln!("{}", style("Extracted text").bold());
        eprintln!("{}", next.raw_text().unwrap_or_default());
        eprintln!();
        for error in next.errors() {
            eprintln!("{} {}", style("✗").red(), error);
        }
        eprintln!("Please upload a clearer image.");
    }

    Ok(next)
}

/// Let the user edit every field, then submit.
fn review_screen<O: OcrBackend, S: RecordStore>(
    flow: &IntakeFlow<O, S>,
    session: &Session,
) -> anyhow::Result<Session> {
    println!("{}", style("Review and edit (* = required)").bold().underlined());

    let current = session.fields().cloned().unwrap_or_default();
    let mut edited = FieldSet::new();
    for field in Field::ALL {
        let marker = if is_required(field) { "*" } else { "" };
        let value: String = Input::new()
            .with_prompt(format!("{}{}", field.label(), marker))
            .with_initial_text(current.get(field))
            .allow_empty(true)
            .interact_text()?;
        edited.set(field, value);
    }

    println!();
    print!("{}", format_fields_text(&edited));

    let submit = Confirm::new()
        .with_prompt("Submit application?")
        .default(true)
        .interact()?;
    if !submit {
        return Ok(session.clone());
    }

    match flow.submit(session, edited) {
        Ok((next, _record)) => Ok(next),
        Err(e) => {
            eprintln!("{} Failed to save application: {}", style("✗").red(), e);
            Ok(session.clone())
        }
    }
}
