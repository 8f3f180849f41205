//! Mail-relay collaborator for the contact form.
//!
//! The contact form never talks to SMTP. It hands a small, named payload plus
//! three identifiers (service, template, public key) to a third-party relay
//! which renders the template and delivers the email. The form only cares
//! whether the hand-off succeeded.
//!
//! [`MailRelay`] is the seam. [`EmailJsRelay`] implements it against the
//! EmailJS REST endpoint; [`DryRunRelay`] logs the request it would have sent
//! and succeeds, which is what `folio contact --dry-run` uses.
//!
//! ## Wire format
//!
//! ```json
//! {
//!   "service_id": "service_pczntgr",
//!   "template_id": "template_cubxa37",
//!   "user_id": "AJH9lTR28X2cI5Lre",
//!   "template_params": { "name": "...", "email": "...", "subject": "...", "message": "..." }
//! }
//! ```
//!
//! Any 2xx is success. Everything else, including transport failures and
//! timeouts, is a [`RelayError`]. There is exactly one attempt per call.

use crate::config::RelayConfig;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("mail relay request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail relay rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Which field names the relay template expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    /// `{name, email, subject, message}`
    #[default]
    Standard,
    /// `{from_name, reply_to, subject, message}`
    ReplyTo,
}

impl PayloadShape {
    /// Config spelling, also emitted into the page for the browser-side form.
    pub fn as_str(self) -> &'static str {
        match self {
            PayloadShape::Standard => "standard",
            PayloadShape::ReplyTo => "reply_to",
        }
    }
}

/// Template parameters handed to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Standard {
        name: String,
        email: String,
        subject: String,
        message: String,
    },
    ReplyTo {
        from_name: String,
        reply_to: String,
        subject: String,
        message: String,
    },
}

impl Payload {
    pub fn new(shape: PayloadShape, name: &str, email: &str, subject: &str, message: &str) -> Self {
        match shape {
            PayloadShape::Standard => Payload::Standard {
                name: name.to_string(),
                email: email.to_string(),
                subject: subject.to_string(),
                message: message.to_string(),
            },
            PayloadShape::ReplyTo => Payload::ReplyTo {
                from_name: name.to_string(),
                reply_to: email.to_string(),
                subject: subject.to_string(),
                message: message.to_string(),
            },
        }
    }
}

/// JSON body posted to the relay endpoint.
#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub user_id: &'a str,
    pub template_params: &'a Payload,
}

impl<'a> SendRequest<'a> {
    pub fn new(ids: &'a RelayConfig, payload: &'a Payload) -> Self {
        Self {
            service_id: &ids.service_id,
            template_id: &ids.template_id,
            user_id: &ids.public_key,
            template_params: payload,
        }
    }
}

/// A service that accepts a payload and delivers it as email.
pub trait MailRelay {
    fn send(
        &self,
        ids: &RelayConfig,
        payload: &Payload,
    ) -> impl Future<Output = Result<(), RelayError>> + Send;
}

/// EmailJS REST client.
#[derive(Debug, Clone)]
pub struct EmailJsRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl EmailJsRelay {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl MailRelay for EmailJsRelay {
    async fn send(&self, ids: &RelayConfig, payload: &Payload) -> Result<(), RelayError> {
        let body = SendRequest::new(ids, payload);
        tracing::debug!(endpoint = %self.endpoint, service = %ids.service_id, "posting to mail relay");

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(RelayError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Logs the request body instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRelay;

impl MailRelay for DryRunRelay {
    async fn send(&self, ids: &RelayConfig, payload: &Payload) -> Result<(), RelayError> {
        let body = SendRequest::new(ids, payload);
        match serde_json::to_string_pretty(&body) {
            Ok(json) => tracing::info!("dry run, not sending:\n{json}"),
            Err(e) => tracing::warn!("dry run, request body not serializable: {e}"),
        }
        Ok(())
    }
}
