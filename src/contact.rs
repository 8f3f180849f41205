//! Contact form state machine.
//!
//! A form holds four text fields and a tri-state status. One call to
//! [`ContactForm::submit`] is one logical submission:
//!
//! ```text
//!            validate ──fail──▶ Error (fields kept)
//!               │
//!               ▼
//!   submitting = true ── relay.send() ──fail──▶ Error (fields kept)
//!               │
//!               ▼ ok
//!   fields cleared, Success ──(reset delay)──▶ Idle
//! ```
//!
//! There is no retry. Errors never auto-revert; only success does.
//!
//! ## Reset timer
//!
//! The revert to `Idle` runs on a tokio task owned by the form through
//! [`ResetTimer`]. Dropping the timer aborts the task, so a form that goes
//! away (or starts a new submission) never has a stale timer fire into it.
//! Each submission also bumps a generation counter; the timer only clears the
//! status if its generation is still current.

use crate::config::RelayConfig;
use crate::relay::{MailRelay, Payload, PayloadShape, RelayError};
use regex::Regex;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Delay before a successful submission reverts to idle.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(5000);

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("please enter a valid email address")]
    InvalidEmail,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Dispatch(#[from] RelayError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Success,
    Error,
}

impl SubmitStatus {
    /// The message shown under the form for this status.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SubmitStatus::Idle => None,
            SubmitStatus::Success => Some("Message sent successfully! We'll get back to you soon."),
            SubmitStatus::Error => Some("Failed to send message. Please try again later."),
        }
    }
}

/// The four user-entered fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactFields {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.email.is_empty()
            && self.subject.is_empty()
            && self.message.is_empty()
    }

    /// All fields non-empty and the email well-formed.
    ///
    /// Whitespace counts as content, the same as the page's `required`
    /// inputs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (label, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ] {
            if value.is_empty() {
                return Err(ValidationError::MissingField(label));
            }
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }

    pub fn to_payload(&self, shape: PayloadShape) -> Payload {
        Payload::new(shape, &self.name, &self.email, &self.subject, &self.message)
    }
}

/// `something@something.something` with no whitespace and a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

#[derive(Debug, Default)]
struct StatusCell {
    status: SubmitStatus,
    submitting: bool,
    generation: u64,
}

fn lock(cell: &Mutex<StatusCell>) -> MutexGuard<'_, StatusCell> {
    cell.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Read-only view of a form's status, shareable with other tasks.
#[derive(Debug, Clone)]
pub struct StatusHandle(Arc<Mutex<StatusCell>>);

impl StatusHandle {
    pub fn status(&self) -> SubmitStatus {
        lock(&self.0).status
    }

    pub fn is_submitting(&self) -> bool {
        lock(&self.0).submitting
    }
}

/// Pending revert-to-idle task. Aborted on drop.
#[derive(Debug)]
pub struct ResetTimer {
    handle: JoinHandle<()>,
}

impl ResetTimer {
    fn spawn(cell: Arc<Mutex<StatusCell>>, generation: u64, delay: Duration) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = lock(&cell);
            if state.generation == generation && state.status == SubmitStatus::Success {
                state.status = SubmitStatus::Idle;
                tracing::debug!(generation, "contact status reverted to idle");
            }
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ResetTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Contact form: fields, status, and the single-attempt submission flow.
#[derive(Debug)]
pub struct ContactForm {
    fields: ContactFields,
    cell: Arc<Mutex<StatusCell>>,
    shape: PayloadShape,
    reset_delay: Duration,
    timer: Option<ResetTimer>,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new(PayloadShape::default(), DEFAULT_RESET_DELAY)
    }
}

impl ContactForm {
    pub fn new(shape: PayloadShape, reset_delay: Duration) -> Self {
        Self {
            fields: ContactFields::default(),
            cell: Arc::new(Mutex::new(StatusCell::default())),
            shape,
            reset_delay,
            timer: None,
        }
    }

    pub fn with_fields(mut self, fields: ContactFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut ContactFields {
        &mut self.fields
    }

    pub fn status(&self) -> SubmitStatus {
        lock(&self.cell).status
    }

    pub fn is_submitting(&self) -> bool {
        lock(&self.cell).submitting
    }

    pub fn handle(&self) -> StatusHandle {
        StatusHandle(Arc::clone(&self.cell))
    }

    /// Validate, package, and hand the message to `relay` exactly once.
    ///
    /// Must be called from within a tokio runtime: a successful submission
    /// schedules the revert-to-idle task.
    pub async fn submit<R: MailRelay>(
        &mut self,
        relay: &R,
        ids: &RelayConfig,
    ) -> Result<(), SubmitError> {
        // A new submission supersedes any pending revert.
        self.timer = None;
        let generation = {
            let mut state = lock(&self.cell);
            state.generation += 1;
            state.status = SubmitStatus::Idle;
            state.generation
        };

        if let Err(e) = self.fields.validate() {
            tracing::warn!("contact form rejected: {e}");
            self.finish(SubmitStatus::Error);
            return Err(e.into());
        }

        let payload = self.fields.to_payload(self.shape);
        lock(&self.cell).submitting = true;
        tracing::info!(service = %ids.service_id, "sending contact message");
        let outcome = relay.send(ids, &payload).await;

        match outcome {
            Ok(()) => {
                tracing::info!("contact message sent");
                self.fields = ContactFields::default();
                self.finish(SubmitStatus::Success);
                self.timer = Some(ResetTimer::spawn(
                    Arc::clone(&self.cell),
                    generation,
                    self.reset_delay,
                ));
                Ok(())
            }
            Err(e) => {
                tracing::warn!("contact message failed: {e}");
                self.finish(SubmitStatus::Error);
                Err(e.into())
            }
        }
    }

    fn finish(&self, status: SubmitStatus) {
        let mut state = lock(&self.cell);
        state.submitting = false;
        state.status = status;
    }
}
