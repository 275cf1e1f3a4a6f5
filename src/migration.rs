//! Schema migrations
//!
//! SQL files under `migrations/` are embedded at compile time. refinery
//! keeps track of what ran in `refinery_schema_history`, so start-up can
//! apply them unconditionally.

use refinery::{embed_migrations, Migration};
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};
use tracing::{error, info};

use crate::error::Error;

embed_migrations!("migrations");

/// Applies every pending migration, in version order. Each one runs in its
/// own transaction.
pub async fn run_migrations(database_url: &str) -> Result<(), Error> {
    let (mut client, connection) = connect(database_url).await?;

    let report = migrations::runner()
        .run_async(&mut client)
        .await
        .map_err(|e| {
            Error::ConfigurationError(format!("Migration failed: {}", e))
        })?;

    let applied = report.applied_migrations();
    for migration in applied {
        info!(
            "Applied {} (checksum: {})",
            describe(migration),
            migration.checksum()
        );
    }
    info!("Schema up to date, {} migration(s) applied now", applied.len());

    drop(client);
    connection.await?;

    Ok(())
}

/// Lists embedded migrations next to the ones the database already has,
/// without changing anything.
pub async fn migration_status(database_url: &str) -> Result<Vec<String>, Error> {
    let (mut client, connection) = connect(database_url).await?;
    let runner = migrations::runner();

    let applied = runner
        .get_applied_migrations_async(&mut client)
        .await
        .map_err(|e| {
            Error::ConfigurationError(format!(
                "Could not read schema history: {}",
                e
            ))
        })?;

    drop(client);
    connection.await?;

    let applied: Vec<u32> = applied.iter().map(|m| m.version()).collect();

    Ok(status_lines(runner.get_migrations(), &applied))
}

fn status_lines(embedded: &[Migration], applied: &[u32]) -> Vec<String> {
    let mut embedded: Vec<&Migration> = embedded.iter().collect();
    embedded.sort_by_key(|m| m.version());

    embedded
        .into_iter()
        .map(|m| {
            let state = if applied.contains(&m.version()) {
                "applied"
            } else {
                "pending"
            };
            format!("{} {}", describe(m), state)
        })
        .collect()
}

fn describe(migration: &Migration) -> String {
    format!("V{:03}__{}", migration.version(), migration.name())
}

/// tokio-postgres hands back the socket driver separately; it has to be
/// polled for the client to make progress.
async fn connect(
    database_url: &str,
) -> Result<(Client, JoinHandle<()>), Error> {
    let config: tokio_postgres::Config = database_url.parse().map_err(|e| {
        Error::ConfigurationError(format!("Invalid database URL: {}", e))
    })?;

    let (client, connection) = config.connect(NoTls).await.map_err(|e| {
        Error::ConfigurationError(format!(
            "Failed to connect for migrations: {}",
            e
        ))
    })?;

    let connection = tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("Migration connection error: {}", e);
        }
    });

    Ok((client, connection))
}
