use std::{net::IpAddr, str::FromStr, sync::LazyLock};

use chrono::{DateTime, Utc};
use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Accepts `local@domain.tld` shaped addresses without whitespace. This is
/// intentionally looser than a full RFC 5321 parser; the address is only
/// used as a reply target and never dereferenced by this system.
pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[nutype(
    derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, From, Serialize, Deserialize)
)]
pub struct ContactMessageId(i64);

#[nutype(
    validate(len_char_min = 2, len_char_max = 100),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactName(String);

#[nutype(
    validate(len_char_max = 255, regex = CONTACT_EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactEmail(String);

#[nutype(
    validate(len_char_min = 3, len_char_max = 255),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactSubject(String);

#[nutype(
    validate(len_char_min = 10, len_char_max = 5000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactContent(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactReason {
    Job,
    Project,
    Feedback,
    Other,
}

impl ContactReason {
    pub const ALL: [Self; 4] = [Self::Job, Self::Project, Self::Feedback, Self::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Job => "job",
            Self::Project => "project",
            Self::Feedback => "feedback",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ContactReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown contact reason")]
pub struct UnknownContactReason;

impl FromStr for ContactReason {
    type Err = UnknownContactReason;

    // Matching is case sensitive: the form submits the enum values verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|reason| reason.as_str() == s)
            .ok_or(UnknownContactReason)
    }
}

/// A fully validated contact message, as entered by the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub fullname: ContactName,
    pub email: ContactEmail,
    pub subject: ContactSubject,
    pub reason: ContactReason,
    pub message: ContactContent,
}

/// A contact message together with the request metadata captured at
/// persistence time. The identifier is assigned by the store on insert and
/// is therefore not part of this record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub message: ContactMessage,
    pub client_ip: IpAddr,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The five user-entered form fields as plain strings.
///
/// Both the REST handler and the form controller funnel raw input through
/// [`ContactForm::sanitized`] followed by [`ContactForm::validate`], so the
/// client-side checks can never drift from the authoritative server-side
/// ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub fullname: String,
    pub email: String,
    pub subject: String,
    pub reason: String,
    pub message: String,
}

impl ContactForm {
    /// Returns the form with every field passed through [`sanitize`].
    pub fn sanitized(self) -> Self {
        Self {
            fullname: sanitize(&self.fullname),
            email: sanitize(&self.email),
            subject: sanitize(&self.subject),
            reason: sanitize(&self.reason),
            message: sanitize(&self.message),
        }
    }

    /// Checks all fields independently and reports every violation at once.
    ///
    /// The nutype validations on the typed fields are the authority; this
    /// function only maps their failures to per-field messages and adds the
    /// `*Required` variants for empty input.
    pub fn validate(&self) -> Result<ContactMessage, Vec<ContactViolation>> {
        let mut violations = Vec::new();

        // Each field maps its failure to `None` after recording the violation,
        // so the checks below never short-circuit each other.
        let fullname = if self.fullname.is_empty() {
            violations.push(ContactViolation::NameRequired);
            None
        } else {
            ContactName::try_new(self.fullname.clone())
                .map_err(|_| violations.push(ContactViolation::NameLength))
                .ok()
        };

        let email = if self.email.is_empty() {
            violations.push(ContactViolation::EmailRequired);
            None
        } else {
            ContactEmail::try_new(self.email.clone())
                .map_err(|err| {
                    violations.push(match err {
                        ContactEmailError::LenCharMaxViolated => ContactViolation::EmailLength,
                        ContactEmailError::RegexViolated => ContactViolation::EmailFormat,
                    })
                })
                .ok()
        };

        let subject = if self.subject.is_empty() {
            violations.push(ContactViolation::SubjectRequired);
            None
        } else {
            ContactSubject::try_new(self.subject.clone())
                .map_err(|_| violations.push(ContactViolation::SubjectLength))
                .ok()
        };

        let reason = if self.reason.is_empty() {
            violations.push(ContactViolation::ReasonRequired);
            None
        } else {
            self.reason
                .parse::<ContactReason>()
                .map_err(|_| violations.push(ContactViolation::ReasonUnknown))
                .ok()
        };

        let message = if self.message.is_empty() {
            violations.push(ContactViolation::MessageRequired);
            None
        } else {
            ContactContent::try_new(self.message.clone())
                .map_err(|_| violations.push(ContactViolation::MessageLength))
                .ok()
        };

        match (fullname, email, subject, reason, message) {
            (Some(fullname), Some(email), Some(subject), Some(reason), Some(message)) => {
                Ok(ContactMessage {
                    fullname,
                    email,
                    subject,
                    reason,
                    message,
                })
            }
            _ => Err(violations),
        }
    }
}

/// Trims surrounding whitespace and neutralizes HTML-significant characters,
/// so stored values can be embedded in markup without further escaping.
/// Missing input maps to the empty string, which the validator then reports
/// as a required-field violation.
pub fn sanitize(raw: &str) -> String {
    // `&` first, everything else afterwards, to not re-escape the entities
    // inserted here.
    raw.trim()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub fn sanitize_opt(raw: Option<&str>) -> String {
    raw.map(sanitize).unwrap_or_default()
}

/// The form field a [`ContactViolation`] refers to, for annotating invalid
/// input in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    FullName,
    Email,
    Subject,
    Reason,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ContactViolation {
    #[error("Please enter your full name.")]
    NameRequired,
    #[error("Your full name must be between 2 and 100 characters long.")]
    NameLength,
    #[error("Please enter your email address.")]
    EmailRequired,
    #[error("Please enter a valid email address.")]
    EmailFormat,
    #[error("Your email address must not be longer than 255 characters.")]
    EmailLength,
    #[error("Please enter a subject.")]
    SubjectRequired,
    #[error("The subject must be between 3 and 255 characters long.")]
    SubjectLength,
    #[error("Please select a reason for your message.")]
    ReasonRequired,
    #[error("The selected reason is not supported.")]
    ReasonUnknown,
    #[error("Please enter a message.")]
    MessageRequired,
    #[error("Your message must be between 10 and 5000 characters long.")]
    MessageLength,
}

impl ContactViolation {
    pub fn field(self) -> ContactField {
        match self {
            Self::NameRequired | Self::NameLength => ContactField::FullName,
            Self::EmailRequired | Self::EmailFormat | Self::EmailLength => ContactField::Email,
            Self::SubjectRequired | Self::SubjectLength => ContactField::Subject,
            Self::ReasonRequired | Self::ReasonUnknown => ContactField::Reason,
            Self::MessageRequired | Self::MessageLength => ContactField::Message,
        }
    }
}
