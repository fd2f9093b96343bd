use std::{future::Future, net::IpAddr};

use folio_models::contact::{ContactForm, ContactMessageId, ContactViolation};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Runs one form submission through the sanitize → validate → honeypot →
    /// persist pipeline and returns the identifier the store assigned to the
    /// new message.
    fn submit(
        &self,
        cmd: ContactSubmitCommand,
    ) -> impl Future<Output = Result<ContactMessageId, ContactSubmitError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmitCommand {
    /// The five user-entered fields, raw as received.
    pub form: ContactForm,
    /// Raw value of the hidden honeypot field (`website`). Empty for humans.
    pub honeypot: String,
    pub client_ip: IpAddr,
    pub user_agent: Option<String>,
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("The submitted form is invalid.")]
    Invalid(Vec<ContactViolation>),
    #[error("The submission was flagged as spam.")]
    Spam,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_submit(
        mut self,
        cmd: ContactSubmitCommand,
        result: Result<ContactMessageId, ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(cmd))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
