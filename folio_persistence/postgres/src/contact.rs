use bb8_postgres::tokio_postgres::Row;
use chrono::{DateTime, Utc};
use folio_models::contact::{
    ContactContent, ContactEmail, ContactMessage, ContactMessageId, ContactName, ContactReason,
    ContactRecord, ContactSubject,
};
use folio_persistence_contracts::contact::{ContactRepository, StoredContactMessage};

use crate::{arg_indices, columns, PostgresTransaction};

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresContactRepository;

columns!(contact_message as "cm": "id", "name", "email", "subject", "reason", "message", "ip", "user_agent", "created_at");
// insert column set, without the store-generated id
columns!(new_contact_message as "cm": "name", "email", "subject", "reason", "message", "ip", "user_agent", "created_at");

impl ContactRepository<PostgresTransaction> for PostgresContactRepository {
    async fn create(
        &self,
        txn: &mut PostgresTransaction,
        record: &ContactRecord,
    ) -> anyhow::Result<ContactMessageId> {
        let ip = record.client_ip.to_string();

        txn.txn()
            .query_one(
                &format!(
                    "insert into contact_messages ({NEW_CONTACT_MESSAGE_COL_NAMES}) values ({}) \
                     returning id",
                    arg_indices(1..=NEW_CONTACT_MESSAGE_CNT)
                ),
                &[
                    &*record.message.fullname,
                    &*record.message.email,
                    &*record.message.subject,
                    &record.message.reason.as_str(),
                    &*record.message.message,
                    &ip,
                    &record.user_agent,
                    &record.created_at,
                ],
            )
            .await
            .map(|row| row.get::<_, i64>(0).into())
            .map_err(Into::into)
    }

    async fn list(
        &self,
        txn: &mut PostgresTransaction,
    ) -> anyhow::Result<Vec<StoredContactMessage>> {
        txn.txn()
            .query(
                &format!(
                    "select {CONTACT_MESSAGE_COLS} from contact_messages cm order by cm.id asc"
                ),
                &[],
            )
            .await
            .map_err(Into::into)
            .and_then(|rows| {
                rows.into_iter()
                    .map(|row| decode_contact_message(&row, &mut 0))
                    .collect()
            })
    }
}

fn decode_contact_message(row: &Row, offset: &mut usize) -> anyhow::Result<StoredContactMessage> {
    let mut idx = || {
        *offset += 1;
        *offset - 1
    };

    Ok(StoredContactMessage {
        id: row.get::<_, i64>(idx()).into(),
        record: ContactRecord {
            message: ContactMessage {
                fullname: ContactName::try_new(row.get::<_, String>(idx()))?,
                email: ContactEmail::try_new(row.get::<_, String>(idx()))?,
                subject: ContactSubject::try_new(row.get::<_, String>(idx()))?,
                reason: row.get::<_, String>(idx()).parse::<ContactReason>()?,
                message: ContactContent::try_new(row.get::<_, String>(idx()))?,
            },
            client_ip: row.get::<_, String>(idx()).parse()?,
            user_agent: row.get::<_, Option<String>>(idx()),
            created_at: row.get::<_, DateTime<Utc>>(idx()),
        },
    })
}
