//! Four-screen intake flow.
//!
//! A [`Session`] is an immutable value. Each transition consumes it and
//! returns the next one, so a failed step never leaves a half-updated
//! session behind.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{FlowError, Result};
use crate::intake::{ExtractionResult, IntakePipeline, Upload};
use crate::models::fields::FieldSet;
use crate::models::record::ApplicationRecord;
use crate::ocr::OcrBackend;
use crate::store::RecordStore;

/// Screen the user is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Upload,
    OcrReview,
    ReviewAndEdit,
    Success,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Upload => "upload",
            Screen::OcrReview => "ocr_review",
            Screen::ReviewAndEdit => "review_and_edit",
            Screen::Success => "success",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input that moves a session between screens.
#[derive(Debug, Clone)]
pub enum FlowEvent {
    /// OCR and extraction finished for an upload.
    Extracted {
        raw_text: String,
        fields: FieldSet,
        errors: Vec<String>,
    },
    /// The user accepted the OCR text.
    Proceed,
    /// The user submitted the reviewed fields.
    Submitted(FieldSet),
    /// Start over with a new application.
    Reset,
}

impl FlowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::Extracted { .. } => "extracted",
            FlowEvent::Proceed => "proceed",
            FlowEvent::Submitted(_) => "submitted",
            FlowEvent::Reset => "reset",
        }
    }
}

impl From<ExtractionResult> for FlowEvent {
    fn from(result: ExtractionResult) -> Self {
        FlowEvent::Extracted {
            raw_text: result.text,
            fields: result.fields,
            errors: result.errors,
        }
    }
}

/// State of one user's intake session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    screen: Screen,
    raw_text: Option<String>,
    fields: Option<FieldSet>,
    errors: Vec<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session on the upload screen.
    pub fn new() -> Self {
        Self {
            screen: Screen::Upload,
            raw_text: None,
            fields: None,
            errors: Vec::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Text recognized from the last upload, after normalization.
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    pub fn fields(&self) -> Option<&FieldSet> {
        self.fields.as_ref()
    }

    /// Validation messages from the last upload.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Apply an event, returning the next session.
    pub fn apply(self, event: FlowEvent) -> std::result::Result<Session, FlowError> {
        let from = self.screen;
        let next = match (from, event) {
            (
                Screen::Upload,
                FlowEvent::Extracted {
                    raw_text,
                    fields,
                    errors,
                },
            ) => {
                let screen = if errors.is_empty() {
                    Screen::OcrReview
                } else {
                    Screen::Upload
                };
                Session {
                    screen,
                    raw_text: Some(raw_text),
                    fields: Some(fields),
                    errors,
                }
            }
            (Screen::OcrReview, FlowEvent::Proceed) => Session {
                screen: Screen::ReviewAndEdit,
                ..self
            },
            (Screen::ReviewAndEdit, FlowEvent::Submitted(fields)) => Session {
                screen: Screen::Success,
                fields: Some(fields),
                ..self
            },
            (Screen::Success, FlowEvent::Reset) => Session::new(),
            (from, event) => {
                return Err(FlowError::InvalidTransition {
                    from,
                    event: event.name(),
                });
            }
        };

        debug!("Flow transition {} -> {}", from, next.screen);
        Ok(next)
    }
}

/// Drives sessions through the pipeline and the record store.
pub struct IntakeFlow<O: OcrBackend, S: RecordStore> {
    pipeline: IntakePipeline<O>,
    store: S,
}

impl<O: OcrBackend, S: RecordStore> IntakeFlow<O, S> {
    pub fn new(pipeline: IntakePipeline<O>, store: S) -> Self {
        Self { pipeline, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run an upload through the pipeline.
    ///
    /// Decode and OCR failures are returned as errors and `session` stays
    /// as it was. Missing fields keep the session on the upload screen
    /// with the text and messages attached.
    pub fn handle_upload(&self, session: &Session, upload: &Upload) -> Result<Session> {
        if session.screen != Screen::Upload {
            return Err(FlowError::InvalidTransition {
                from: session.screen,
                event: "extracted",
            }
            .into());
        }

        let result = self.pipeline.process_upload(upload)?;
        if !result.is_valid() {
            warn!(
                "Upload {} is missing {} required field(s)",
                upload.name(),
                result.errors.len()
            );
        }

        Ok(session.clone().apply(result.into())?)
    }

    /// Accept the OCR text and move on to editing.
    pub fn proceed(&self, session: &Session) -> Result<Session> {
        Ok(session.clone().apply(FlowEvent::Proceed)?)
    }

    /// Stamp and persist the reviewed fields.
    ///
    /// The session only advances once the record is stored.
    pub fn submit(
        &self,
        session: &Session,
        fields: FieldSet,
    ) -> Result<(Session, ApplicationRecord)> {
        if session.screen != Screen::ReviewAndEdit {
            return Err(FlowError::InvalidTransition {
                from: session.screen,
                event: "submitted",
            }
            .into());
        }

        let record = ApplicationRecord::submit_now(fields.clone());
        self.store.append(&record)?;
        info!("Application submitted at {}", record.submitted_at_text());

        let next = session.clone().apply(FlowEvent::Submitted(fields))?;
        Ok((next, record))
    }

    /// Start a new application.
    pub fn reset(&self, session: &Session) -> Result<Session> {
        Ok(session.clone().apply(FlowEvent::Reset)?)
    }
}
