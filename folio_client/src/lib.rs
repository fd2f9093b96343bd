pub mod form;
pub mod gateway;

use folio_models::contact::ContactForm;

use crate::{
    form::{FormEvent, FormState},
    gateway::ContactGateway,
};

/// Drives the submission flow for one form instance: local validation via
/// the shared rule set, at most one request in flight, and a fresh render
/// state after every step.
#[derive(Debug)]
pub struct ContactFormController<Gateway> {
    gateway: Gateway,
    state: FormState,
}

impl<Gateway: ContactGateway> ContactFormController<Gateway> {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            state: FormState::default(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Handles a press of the submit control and resolves the whole attempt.
    ///
    /// Invalid input annotates the fields without any network traffic. A
    /// valid form disables the control, performs the request, and maps every
    /// gateway outcome back into an event, so the control is re-enabled no
    /// matter how the request ends.
    pub async fn submit(&mut self, form: ContactForm) -> &FormState {
        let was_in_flight = !self.state.submit_enabled();
        self.state = self.state.clone().apply(FormEvent::Submit(form.clone()));
        if was_in_flight || self.state.submit_enabled() {
            return &self.state;
        }

        let outcome = self.gateway.submit(&form).await;
        self.state = self.state.clone().apply(outcome.into());
        &self.state
    }

    /// Timer callback: the confirmation has been shown for
    /// [`form::SUCCESS_DISPLAY_DURATION`].
    pub fn success_display_elapsed(&mut self) -> &FormState {
        self.state = self.state.clone().apply(FormEvent::SuccessDisplayElapsed);
        &self.state
    }

    /// Timer callback: the error banner has been shown for
    /// [`form::ERROR_BANNER_DURATION`].
    pub fn error_banner_elapsed(&mut self) -> &FormState {
        self.state = self.state.clone().apply(FormEvent::ErrorBannerElapsed);
        &self.state
    }
}
