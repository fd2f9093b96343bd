use std::future::Future;

use folio_models::contact::{ContactMessageId, ContactRecord};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactRepository<Txn: Send + Sync + 'static>: Send + Sync + 'static {
    /// Inserts one contact message and returns the identifier generated by
    /// the store for that row.
    fn create(
        &self,
        txn: &mut Txn,
        record: &ContactRecord,
    ) -> impl Future<Output = anyhow::Result<ContactMessageId>> + Send;

    /// Returns all stored messages in insertion order.
    fn list(
        &self,
        txn: &mut Txn,
    ) -> impl Future<Output = anyhow::Result<Vec<StoredContactMessage>>> + Send;
}

/// A persisted row, read back with the identifier the store assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContactMessage {
    pub id: ContactMessageId,
    pub record: ContactRecord,
}
