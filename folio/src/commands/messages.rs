use clap::Subcommand;
use folio_config::Config;
use folio_persistence_contracts::{
    contact::{ContactRepository, StoredContactMessage},
    Database, Transaction,
};
use folio_persistence_postgres::contact::PostgresContactRepository;

use crate::database;

#[derive(Debug, Subcommand)]
pub enum MessagesCommand {
    /// List all received contact messages
    #[command(aliases(["ls", "l"]))]
    List,
}

impl MessagesCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            Self::List => list(config).await,
        }
    }
}

async fn list(config: Config) -> anyhow::Result<()> {
    let db = database::connect(&config.database).await?;

    let mut txn = db.begin_transaction().await?;
    let messages = PostgresContactRepository.list(&mut txn).await?;
    // read only
    txn.rollback().await?;

    for StoredContactMessage { id, record } in messages {
        println!(
            "[{id}] {created_at} {name} <{email}> ({reason}) via {ip}",
            id = *id,
            created_at = record.created_at.to_rfc3339(),
            name = *record.message.fullname,
            email = *record.message.email,
            reason = record.message.reason,
            ip = record.client_ip,
        );
        println!("    {subject}", subject = *record.message.subject);
        println!("    {message}", message = *record.message.message);
    }

    Ok(())
}
