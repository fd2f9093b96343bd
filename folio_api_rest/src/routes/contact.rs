use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Extension, Form, Json, Router,
};
use folio_core_contact_contracts::{ContactFeatureService, ContactSubmitError};

use crate::{
    extractors::user_agent::UserAgent,
    middlewares::client_ip::ClientIp,
    models::contact::{ApiContactForm, ApiSubmitResponse},
};

const ACCEPTED_MESSAGE: &str =
    "Thank you for your message! I will get back to you as soon as possible.";
const SPAM_MESSAGE: &str = "Your submission has been flagged as spam.";
const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed.";
const PERSISTENCE_MESSAGE: &str = "Something went wrong on our end. Please try again later.";

pub fn router(service: Arc<impl ContactFeatureService>, debug_errors: bool) -> Router<()> {
    Router::new()
        .route(
            "/contact",
            routing::post(submit).fallback(method_not_allowed),
        )
        .with_state(ContactState {
            service,
            debug_errors,
        })
}

struct ContactState<S> {
    service: Arc<S>,
    debug_errors: bool,
}

impl<S> Clone for ContactState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            debug_errors: self.debug_errors,
        }
    }
}

async fn submit(
    State(state): State<ContactState<impl ContactFeatureService>>,
    Extension(client_ip): Extension<ClientIp>,
    UserAgent(user_agent): UserAgent,
    Form(form): Form<ApiContactForm>,
) -> Response {
    match state
        .service
        .submit(form.into_command(client_ip.0, user_agent))
        .await
    {
        Ok(id) => Json(ApiSubmitResponse::accepted(ACCEPTED_MESSAGE, id)).into_response(),
        Err(ContactSubmitError::Invalid(violations)) => (
            StatusCode::BAD_REQUEST,
            Json(ApiSubmitResponse::invalid(&violations)),
        )
            .into_response(),
        Err(ContactSubmitError::Spam) => (
            StatusCode::BAD_REQUEST,
            Json(ApiSubmitResponse::rejected(SPAM_MESSAGE)),
        )
            .into_response(),
        Err(ContactSubmitError::Other(err)) => persistence_error(err, state.debug_errors),
    }
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiSubmitResponse::rejected(METHOD_NOT_ALLOWED_MESSAGE)),
    )
        .into_response()
}

/// The full error chain always goes to the log; the response only carries it
/// when `debug_errors` is enabled.
fn persistence_error(err: anyhow::Error, debug_errors: bool) -> Response {
    tracing::error!("failed to handle contact submission: {err:#}");
    let message = if debug_errors {
        format!("{err:#}")
    } else {
        PERSISTENCE_MESSAGE.into()
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiSubmitResponse::rejected(message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{
            header::{CONTENT_TYPE, USER_AGENT},
            Method, Request,
        },
    };
    use folio_core_contact_contracts::{ContactSubmitCommand, MockContactFeatureService};
    use folio_models::contact::{ContactForm, ContactMessageId, ContactViolation};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    const CLIENT_IP: &str = "203.0.113.7";

    fn form_body() -> &'static str {
        "fullname=Jane+Doe&email=jane@example.com&subject=Hello&reason=job\
         &message=I+would+like+to+connect+regarding+an+opportunity."
    }

    fn expected_command(honeypot: &str) -> ContactSubmitCommand {
        ContactSubmitCommand {
            form: ContactForm {
                fullname: "Jane Doe".into(),
                email: "jane@example.com".into(),
                subject: "Hello".into(),
                reason: "job".into(),
                message: "I would like to connect regarding an opportunity.".into(),
            },
            honeypot: honeypot.into(),
            client_ip: CLIENT_IP.parse().unwrap(),
            user_agent: Some("test-suite".into()),
        }
    }

    fn post(body: String) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/contact")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(USER_AGENT, "test-suite")
            .extension(ClientIp(CLIENT_IP.parse().unwrap()))
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn accepted() {
        // Arrange
        let service = MockContactFeatureService::new()
            .with_submit(expected_command(""), Ok(ContactMessageId::from(42)));
        let router = router(Arc::new(service), false);

        // Act
        let response = router.oneshot(post(form_body().into())).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": true,
                "message": ACCEPTED_MESSAGE,
                "id": 42,
            })
        );
    }

    #[tokio::test]
    async fn invalid() {
        // Arrange
        let service = MockContactFeatureService::new().with_submit(
            expected_command(""),
            Err(ContactSubmitError::Invalid(vec![
                ContactViolation::NameLength,
                ContactViolation::EmailFormat,
            ])),
        );
        let router = router(Arc::new(service), false);

        // Act
        let response = router.oneshot(post(form_body().into())).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "message": "Your full name must be between 2 and 100 characters long. \
                            Please enter a valid email address.",
                "errors": [
                    "Your full name must be between 2 and 100 characters long.",
                    "Please enter a valid email address.",
                ],
            })
        );
    }

    #[tokio::test]
    async fn spam() {
        // Arrange
        let service = MockContactFeatureService::new().with_submit(
            expected_command("http://spam.example"),
            Err(ContactSubmitError::Spam),
        );
        let router = router(Arc::new(service), false);

        // Act
        let body = format!("{}&website=http%3A%2F%2Fspam.example", form_body());
        let response = router.oneshot(post(body)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "message": SPAM_MESSAGE,
            })
        );
    }

    #[tokio::test]
    async fn persistence_failure() {
        // Arrange
        let service = MockContactFeatureService::new().with_submit(
            expected_command(""),
            Err(ContactSubmitError::Other(anyhow::anyhow!("db down"))),
        );
        let router = router(Arc::new(service), false);

        // Act
        let response = router.oneshot(post(form_body().into())).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "message": PERSISTENCE_MESSAGE,
            })
        );
    }

    #[tokio::test]
    async fn persistence_failure_with_debug_errors() {
        // Arrange
        let service = MockContactFeatureService::new().with_submit(
            expected_command(""),
            Err(ContactSubmitError::Other(anyhow::anyhow!("db down"))),
        );
        let router = router(Arc::new(service), true);

        // Act
        let response = router.oneshot(post(form_body().into())).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "message": "db down",
            })
        );
    }

    #[tokio::test]
    async fn method_not_allowed() {
        // Arrange
        let service = MockContactFeatureService::new();
        let router = router(Arc::new(service), false);

        // Act
        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/contact")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "message": METHOD_NOT_ALLOWED_MESSAGE,
            })
        );
    }

    #[tokio::test]
    async fn missing_fields_become_empty_strings() {
        // Arrange
        let service = MockContactFeatureService::new().with_submit(
            ContactSubmitCommand {
                form: ContactForm {
                    fullname: "Jane Doe".into(),
                    ..ContactForm::default()
                },
                honeypot: String::new(),
                client_ip: CLIENT_IP.parse().unwrap(),
                user_agent: Some("test-suite".into()),
            },
            Err(ContactSubmitError::Invalid(vec![
                ContactViolation::EmailRequired,
            ])),
        );
        let router = router(Arc::new(service), false);

        // Act
        let response = router
            .oneshot(post("fullname=Jane+Doe".into()))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
