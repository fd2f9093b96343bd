use std::time::Duration;

use folio_models::contact::{ContactField, ContactForm, ContactMessageId, ContactViolation};

/// How long the confirmation replaces the form before the empty form is
/// restored.
pub const SUCCESS_DISPLAY_DURATION: Duration = Duration::from_secs(8);
/// How long the inline error banner stays visible before it is dismissed.
pub const ERROR_BANNER_DURATION: Duration = Duration::from_secs(5);

pub const CONNECTION_ERROR_MESSAGE: &str =
    "Could not reach the server. Please check your connection and try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Success {
        message: String,
    },
    Error {
        message: String,
    },
}

/// The complete render state of one form instance. The view layer owns the
/// input values themselves; this tracks the phase and which fields to
/// annotate as invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub phase: FormPhase,
    pub field_errors: Vec<ContactViolation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// The visitor pressed the submit control with the given raw input.
    Submit(ContactForm),
    /// The server accepted the submission.
    Accepted {
        message: String,
        id: ContactMessageId,
    },
    /// The server rejected the submission.
    Rejected { message: String },
    /// The request produced no usable response at all.
    ConnectionFailed,
    /// The confirmation has been displayed for [`SUCCESS_DISPLAY_DURATION`].
    SuccessDisplayElapsed,
    /// The banner has been displayed for [`ERROR_BANNER_DURATION`].
    ErrorBannerElapsed,
}

impl FormState {
    /// Pure transition function over submission attempts and view timers.
    ///
    /// Local validation mirrors the server through the shared rule set; an
    /// invalid form stays idle with its fields annotated and nothing is sent.
    pub fn apply(self, event: FormEvent) -> Self {
        match (self.phase, event) {
            // The submit control is disabled while a request is in flight, so
            // a second press changes nothing and starts no second request.
            (FormPhase::Submitting, FormEvent::Submit(_)) => Self {
                phase: FormPhase::Submitting,
                field_errors: self.field_errors,
            },
            (_, FormEvent::Submit(form)) => match form.sanitized().validate() {
                Ok(_) => Self {
                    phase: FormPhase::Submitting,
                    field_errors: Vec::new(),
                },
                Err(violations) => Self {
                    phase: FormPhase::Idle,
                    field_errors: violations,
                },
            },
            (FormPhase::Submitting, FormEvent::Accepted { message, .. }) => Self {
                phase: FormPhase::Success { message },
                field_errors: Vec::new(),
            },
            (FormPhase::Submitting, FormEvent::Rejected { message }) => Self {
                phase: FormPhase::Error { message },
                field_errors: Vec::new(),
            },
            (FormPhase::Submitting, FormEvent::ConnectionFailed) => Self {
                phase: FormPhase::Error {
                    message: CONNECTION_ERROR_MESSAGE.into(),
                },
                field_errors: Vec::new(),
            },
            (FormPhase::Success { .. }, FormEvent::SuccessDisplayElapsed) => Self::default(),
            (FormPhase::Error { .. }, FormEvent::ErrorBannerElapsed) => Self::default(),
            // Everything else is a stale event and leaves the state as is.
            (phase, _) => Self {
                phase,
                field_errors: self.field_errors,
            },
        }
    }

    /// Whether the submit control is interactive in this state.
    pub fn submit_enabled(&self) -> bool {
        !matches!(self.phase, FormPhase::Submitting)
    }
}

/// DOM selector of the input element a violation should be annotated on.
pub fn field_selector(field: ContactField) -> &'static str {
    match field {
        ContactField::FullName => "#fullname",
        ContactField::Email => "#email",
        ContactField::Subject => "#subject",
        ContactField::Reason => "#reason",
        ContactField::Message => "#message",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            fullname: "Jane Doe".into(),
            email: "jane@example.com".into(),
            subject: "Hello".into(),
            reason: "job".into(),
            message: "I would like to connect regarding an opportunity.".into(),
        }
    }

    fn submitting() -> FormState {
        FormState::default().apply(FormEvent::Submit(valid_form()))
    }

    #[test]
    fn valid_submit_starts_a_request() {
        let state = submitting();

        assert_eq!(state.phase, FormPhase::Submitting);
        assert!(state.field_errors.is_empty());
        assert!(!state.submit_enabled());
    }

    #[test]
    fn invalid_submit_annotates_fields_and_stays_idle() {
        let state = FormState::default().apply(FormEvent::Submit(ContactForm {
            fullname: "J".into(),
            ..valid_form()
        }));

        assert_eq!(state.phase, FormPhase::Idle);
        assert_eq!(state.field_errors, [ContactViolation::NameLength]);
        assert!(state.submit_enabled());
    }

    #[test]
    fn submit_while_in_flight_is_ignored() {
        let state = submitting().apply(FormEvent::Submit(valid_form()));

        assert_eq!(state.phase, FormPhase::Submitting);
    }

    #[test]
    fn accepted_shows_the_confirmation() {
        let state = submitting().apply(FormEvent::Accepted {
            message: "Thank you!".into(),
            id: ContactMessageId::from(42),
        });

        assert_eq!(
            state.phase,
            FormPhase::Success {
                message: "Thank you!".into()
            }
        );
        assert!(state.submit_enabled());
    }

    #[test]
    fn confirmation_elapses_back_to_the_empty_form() {
        let state = submitting()
            .apply(FormEvent::Accepted {
                message: "Thank you!".into(),
                id: ContactMessageId::from(42),
            })
            .apply(FormEvent::SuccessDisplayElapsed);

        assert_eq!(state, FormState::default());
    }

    #[test]
    fn rejection_shows_the_banner_until_it_elapses() {
        let state = submitting().apply(FormEvent::Rejected {
            message: "Your submission has been flagged as spam.".into(),
        });

        assert_eq!(
            state.phase,
            FormPhase::Error {
                message: "Your submission has been flagged as spam.".into()
            }
        );
        assert!(state.submit_enabled());

        assert_eq!(
            state.apply(FormEvent::ErrorBannerElapsed),
            FormState::default()
        );
    }

    #[test]
    fn connection_failure_has_its_own_message() {
        let state = submitting().apply(FormEvent::ConnectionFailed);

        assert_eq!(
            state.phase,
            FormPhase::Error {
                message: CONNECTION_ERROR_MESSAGE.into()
            }
        );
    }

    #[test]
    fn stale_events_change_nothing() {
        let idle = FormState::default();
        assert_eq!(idle.clone().apply(FormEvent::SuccessDisplayElapsed), idle);
        assert_eq!(idle.clone().apply(FormEvent::ErrorBannerElapsed), idle);
        assert_eq!(idle.clone().apply(FormEvent::ConnectionFailed), idle);
    }

    #[test]
    fn display_durations() {
        assert_eq!(SUCCESS_DISPLAY_DURATION, Duration::from_secs(8));
        assert_eq!(ERROR_BANNER_DURATION, Duration::from_secs(5));
    }

    #[test]
    fn field_selectors() {
        assert_eq!(field_selector(ContactField::FullName), "#fullname");
        assert_eq!(field_selector(ContactField::Email), "#email");
        assert_eq!(field_selector(ContactField::Subject), "#subject");
        assert_eq!(field_selector(ContactField::Reason), "#reason");
        assert_eq!(field_selector(ContactField::Message), "#message");
    }
}
