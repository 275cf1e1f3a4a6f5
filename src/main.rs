use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};

use surge::{
    cli::{init_config, run_migrate, Cli, Commands},
    configuration::{AppState, Config, State},
    error::Error,
    handler::update_jobs,
    migration,
    provider::{DatabasePool, HTTP},
    scheduler::Scheduler,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = app_main(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ Error::RetryLimitExceeded { .. }) => {
            error!("{}", err);
            ExitCode::from(2)
        },
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        },
    }
}

async fn app_main(cli: Cli) -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::ERROR })
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = init_config(&cli)?;

    if let Some(Commands::Migrate { status }) = cli.command {
        return run_migrate(&config, status).await;
    }

    let database = init_database(&config).await?;
    let http = HTTP::new(config.clone())?;

    let state = State::new(config.clone(), http, database);
    let app_state = AppState::new(state);

    let scheduler = Scheduler::new(
        update_jobs(&app_state),
        config.interval,
        config.max_retry,
    )
    .with_error_log(config.error_log.clone());

    let result = if cli.single {
        scheduler.run_cycle().await
    } else {
        scheduler.run().await
    };

    if let Some(database) = &app_state.database {
        database.pool.close().await;
    }

    result
}

async fn init_database(config: &Config) -> Result<Option<DatabasePool>, Error> {
    if config.offline {
        info!("Offline mode, database writes are disabled");
        return Ok(None);
    }

    migration::run_migrations(&config.database_url).await?;
    let database = DatabasePool::new(config).await?;

    Ok(Some(database))
}
