use std::future::Future;

use folio_models::contact::{ContactForm, ContactMessageId};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::form::FormEvent;

/// Outcome of one submission attempt, as seen by the form controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted {
        message: String,
        id: ContactMessageId,
    },
    Rejected { message: String },
    /// The request produced no usable response.
    ConnectionFailed,
}

impl From<SubmitOutcome> for FormEvent {
    fn from(value: SubmitOutcome) -> Self {
        match value {
            SubmitOutcome::Accepted { message, id } => Self::Accepted { message, id },
            SubmitOutcome::Rejected { message } => Self::Rejected { message },
            SubmitOutcome::ConnectionFailed => Self::ConnectionFailed,
        }
    }
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ContactGateway: Send + Sync + 'static {
    /// Performs one submission request. Every failure mode maps to a
    /// [`SubmitOutcome`]; the caller never has to handle a transport error
    /// separately.
    fn submit(&self, form: &ContactForm) -> impl Future<Output = SubmitOutcome> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpContactGateway {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpContactGateway {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

impl ContactGateway for HttpContactGateway {
    async fn submit(&self, form: &ContactForm) -> SubmitOutcome {
        let response = match self
            .client
            .post(self.endpoint.clone())
            .form(&WireForm::new(form))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("contact request failed: {err}");
                return SubmitOutcome::ConnectionFailed;
            }
        };

        match response.json::<SubmitResponse>().await {
            Ok(SubmitResponse {
                success: true,
                message,
                id: Some(id),
                ..
            }) => SubmitOutcome::Accepted { message, id },
            Ok(SubmitResponse { message, .. }) => SubmitOutcome::Rejected { message },
            Err(err) => {
                warn!("failed to decode contact response: {err}");
                SubmitOutcome::ConnectionFailed
            }
        }
    }
}

/// Wire mirror of the server's form body. The hidden honeypot field is
/// submitted empty, exactly like the real form element.
#[derive(Debug, Serialize)]
struct WireForm<'a> {
    fullname: &'a str,
    email: &'a str,
    subject: &'a str,
    reason: &'a str,
    message: &'a str,
    website: &'static str,
}

impl<'a> WireForm<'a> {
    fn new(form: &'a ContactForm) -> Self {
        Self {
            fullname: &form.fullname,
            email: &form.email,
            subject: &form.subject,
            reason: &form.reason,
            message: &form.message,
            website: "",
        }
    }
}

/// Wire mirror of the server's response body.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
    #[serde(default)]
    pub id: Option<ContactMessageId>,
}
