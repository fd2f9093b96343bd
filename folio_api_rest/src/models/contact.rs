use std::net::IpAddr;

use folio_core_contact_contracts::ContactSubmitCommand;
use folio_models::contact::{ContactForm, ContactMessageId, ContactViolation};
use serde::{Deserialize, Serialize};

/// The form-encoded request body. Every field defaults to the empty string,
/// so absent fields surface as required-field violations instead of a
/// deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiContactForm {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    /// Honeypot field, hidden from human visitors and expected to be empty.
    #[serde(default)]
    pub website: String,
}

impl ApiContactForm {
    pub fn into_command(self, client_ip: IpAddr, user_agent: Option<String>) -> ContactSubmitCommand {
        ContactSubmitCommand {
            form: ContactForm {
                fullname: self.fullname,
                email: self.email,
                subject: self.subject,
                reason: self.reason,
                message: self.message,
            },
            honeypot: self.website,
            client_ip,
            user_agent,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiSubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ContactMessageId>,
}

impl ApiSubmitResponse {
    pub fn accepted(message: impl Into<String>, id: ContactMessageId) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
            id: Some(id),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
            id: None,
        }
    }

    pub fn invalid(violations: &[ContactViolation]) -> Self {
        let errors = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        Self {
            success: false,
            message: errors.join(" "),
            errors: Some(errors),
            id: None,
        }
    }
}
