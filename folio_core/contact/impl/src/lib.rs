use anyhow::Context;
use folio_core_contact_contracts::{
    ContactFeatureService, ContactSubmitCommand, ContactSubmitError,
};
use folio_models::contact::{ContactMessageId, ContactRecord};
use folio_persistence_contracts::{contact::ContactRepository, Database, Transaction};
use folio_shared_contracts::time::TimeService;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Time, Db, ContactRepo> {
    time: Time,
    db: Db,
    contact_repo: ContactRepo,
}

impl<Time, Db, ContactRepo> ContactFeatureServiceImpl<Time, Db, ContactRepo> {
    pub fn new(time: Time, db: Db, contact_repo: ContactRepo) -> Self {
        Self {
            time,
            db,
            contact_repo,
        }
    }
}

impl<Time, Db, ContactRepo> ContactFeatureService
    for ContactFeatureServiceImpl<Time, Db, ContactRepo>
where
    Time: TimeService,
    Db: Database,
    ContactRepo: ContactRepository<Db::Transaction>,
{
    async fn submit(
        &self,
        cmd: ContactSubmitCommand,
    ) -> Result<ContactMessageId, ContactSubmitError> {
        let form = cmd.form.sanitized();

        let message = form.validate().map_err(|violations| {
            debug!(
                client_ip = %cmd.client_ip,
                count = violations.len(),
                "rejecting invalid contact form"
            );
            ContactSubmitError::Invalid(violations)
        })?;

        // Honeypot: humans never see this field, so any content means a bot.
        if !cmd.honeypot.trim().is_empty() {
            debug!(client_ip = %cmd.client_ip, "honeypot filled, rejecting submission as spam");
            return Err(ContactSubmitError::Spam);
        }

        let record = ContactRecord {
            message,
            client_ip: cmd.client_ip,
            user_agent: cmd.user_agent,
            created_at: self.time.now(),
        };

        let mut txn = self
            .db
            .begin_transaction()
            .await
            .context("Failed to begin transaction")?;

        let id = self
            .contact_repo
            .create(&mut txn, &record)
            .await
            .context("Failed to store contact message in database")?;

        txn.commit().await.context("Failed to commit transaction")?;

        debug!(id = *id, "stored contact message");

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use folio_models::contact::{ContactForm, ContactViolation};
    use folio_persistence_contracts::{
        contact::MockContactRepository, MockDatabase, MockTransaction,
    };
    use folio_shared_contracts::time::MockTimeService;
    use folio_utils::assert_matches;

    use super::*;

    type Sut = ContactFeatureServiceImpl<
        MockTimeService,
        MockDatabase,
        MockContactRepository<MockTransaction>,
    >;

    fn valid_form() -> ContactForm {
        ContactForm {
            fullname: "Jane Doe".into(),
            email: "jane@example.com".into(),
            subject: "Hello".into(),
            reason: "job".into(),
            message: "I would like to connect regarding an opportunity.".into(),
        }
    }

    fn command(form: ContactForm, honeypot: &str) -> ContactSubmitCommand {
        ContactSubmitCommand {
            form,
            honeypot: honeypot.into(),
            client_ip: "203.0.113.7".parse().unwrap(),
            user_agent: Some("Mozilla/5.0 (X11; Linux x86_64)".into()),
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let now = Utc.with_ymd_and_hms(2024, 11, 17, 13, 37, 0).unwrap();
        let cmd = command(valid_form(), "");

        let expected = ContactRecord {
            message: valid_form().sanitized().validate().unwrap(),
            client_ip: cmd.client_ip,
            user_agent: cmd.user_agent.clone(),
            created_at: now,
        };

        let time = MockTimeService::new().with_now(now);
        let db = MockDatabase::build(true);

        let mut contact_repo = MockContactRepository::new();
        contact_repo
            .expect_create()
            .once()
            .withf(move |_, record| *record == expected)
            .return_once(|_, _| Box::pin(std::future::ready(Ok(17.into()))));

        let sut: Sut = ContactFeatureServiceImpl::new(time, db, contact_repo);

        // Act
        let result = sut.submit(cmd).await;

        // Assert
        assert_eq!(result.unwrap(), 17.into());
    }

    #[tokio::test]
    async fn invalid() {
        // Arrange
        let cmd = command(
            ContactForm {
                fullname: "J".into(),
                email: "bad-email".into(),
                subject: "Hi".into(),
                reason: String::new(),
                message: "short".into(),
            },
            "",
        );

        let sut: Sut = ContactFeatureServiceImpl::new(
            MockTimeService::new(),
            MockDatabase::new(),
            MockContactRepository::new(),
        );

        // Act
        let result = sut.submit(cmd).await;

        // Assert
        assert_matches!(
            result,
            Err(ContactSubmitError::Invalid(violations)) if *violations == [
                ContactViolation::NameLength,
                ContactViolation::EmailFormat,
                ContactViolation::SubjectLength,
                ContactViolation::ReasonRequired,
                ContactViolation::MessageLength,
            ]
        );
    }

    #[tokio::test]
    async fn spam() {
        // Arrange
        let cmd = command(valid_form(), "http://spam.example");

        // Database and repository expect no calls: persistence is bypassed.
        let sut: Sut = ContactFeatureServiceImpl::new(
            MockTimeService::new(),
            MockDatabase::new(),
            MockContactRepository::new(),
        );

        // Act
        let result = sut.submit(cmd).await;

        // Assert
        assert_matches!(result, Err(ContactSubmitError::Spam));
    }

    #[tokio::test]
    async fn db_error() {
        // Arrange
        let now = Utc.with_ymd_and_hms(2024, 11, 17, 13, 37, 0).unwrap();
        let cmd = command(valid_form(), "");

        let time = MockTimeService::new().with_now(now);
        let db = MockDatabase::build(false);

        let mut contact_repo = MockContactRepository::new();
        contact_repo
            .expect_create()
            .once()
            .return_once(|_, _| Box::pin(std::future::ready(Err(anyhow::anyhow!("insert failed")))));

        let sut: Sut = ContactFeatureServiceImpl::new(time, db, contact_repo);

        // Act
        let result = sut.submit(cmd).await;

        // Assert
        assert_matches!(result, Err(ContactSubmitError::Other(_)));
    }

    #[tokio::test]
    async fn sanitizes_before_validating() {
        // Arrange
        let now = Utc.with_ymd_and_hms(2024, 11, 17, 13, 37, 0).unwrap();
        let form = ContactForm {
            fullname: "  Jane Doe  ".into(),
            subject: "<b>Hello</b>".into(),
            ..valid_form()
        };
        let cmd = command(form, "");

        let time = MockTimeService::new().with_now(now);
        let db = MockDatabase::build(true);

        let mut contact_repo = MockContactRepository::new();
        contact_repo
            .expect_create()
            .once()
            .withf(|_, record| {
                *record.message.fullname == "Jane Doe"
                    && *record.message.subject == "&lt;b&gt;Hello&lt;/b&gt;"
            })
            .return_once(|_, _| Box::pin(std::future::ready(Ok(1.into()))));

        let sut: Sut = ContactFeatureServiceImpl::new(time, db, contact_repo);

        // Act
        let result = sut.submit(cmd).await;

        // Assert
        result.unwrap();
    }
}
