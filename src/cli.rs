//! Command line interface
//!
//! Flags override the values read from the environment. The `migrate`
//! subcommand only bootstraps the schema and exits.

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::{
    configuration::{get_configuration, set_configuration, Config},
    error::Error,
    helpers::parse_interval,
    migration,
};

/// Surge market data collector
#[derive(Parser, Debug)]
#[command(name = "surge")]
#[command(
    about = "Collects coin prices and order books into PostgreSQL",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Log every step instead of errors only
    #[arg(short, long)]
    pub verbose: bool,

    /// Run one update cycle and exit
    #[arg(short, long)]
    pub single: bool,

    /// Seconds between update cycles, fractions allowed (at least 1)
    #[arg(short, long, value_parser = parse_interval)]
    pub interval: Option<Duration>,

    /// Restarts allowed after failed cycles, negative for unlimited
    #[arg(short, long, allow_negative_numbers = true)]
    pub max_retry: Option<i64>,

    /// Only collect these tickers (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub coins: Option<Vec<String>>,

    /// Also collect the BitcoinAverage BTC price
    #[arg(long)]
    pub with_bitcoinaverage: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Create or upgrade the database schema and exit
    Migrate {
        /// List applied and pending migrations without running them
        #[arg(long)]
        status: bool,
    },
}

impl Cli {
    pub fn apply(&self, config: &mut Config) {
        if let Some(interval) = self.interval {
            config.interval = interval;
        }

        if let Some(max_retry) = self.max_retry {
            config.max_retry = max_retry;
        }

        if let Some(coins) = &self.coins {
            config.set_coin_list(coins);
        }

        if self.with_bitcoinaverage {
            config.include_bitcoinaverage = true;
        }
    }
}

/// Loads `.env`, reads the environment and applies the flags on top.
pub fn init_config(cli: &Cli) -> Result<Config, Error> {
    set_configuration()?;
    let mut config = get_configuration()?;
    cli.apply(&mut config);
    Ok(config)
}

pub async fn run_migrate(config: &Config, status_only: bool) -> Result<(), Error> {
    if status_only {
        for line in migration::migration_status(&config.database_url).await? {
            println!("{}", line);
        }
        return Ok(());
    }

    tracing::info!("Running database migrations...");
    migration::run_migrations(&config.database_url).await?;
    tracing::info!("Migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;
    use crate::configuration::tests::test_config;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["surge"]).unwrap();

        assert!(!cli.verbose);
        assert!(!cli.single);
        assert_eq!(cli.interval, None);
        assert_eq!(cli.max_retry, None);
        assert_eq!(cli.coins, None);
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "surge", "-v", "-s", "-i", "30", "-m", "-1", "-c", "ltc,doge",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(cli.single);
        assert_eq!(cli.interval, Some(Duration::from_secs(30)));
        assert_eq!(cli.max_retry, Some(-1));
        assert_eq!(
            cli.coins,
            Some(vec![String::from("ltc"), String::from("doge")])
        );
    }

    #[test]
    fn test_long_flags_and_subcommand() {
        let cli = Cli::try_parse_from([
            "surge",
            "--verbose",
            "--max-retry",
            "3",
            "--with-bitcoinaverage",
            "migrate",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.max_retry, Some(3));
        assert!(cli.with_bitcoinaverage);
        assert_eq!(cli.command, Some(Commands::Migrate { status: false }));

        let cli = Cli::try_parse_from(["surge", "migrate", "--status"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Migrate { status: true }));
    }

    #[test]
    fn test_invalid_arguments() {
        let err = Cli::try_parse_from(["surge", "-i", "0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert_eq!(err.exit_code(), 2);

        let err = Cli::try_parse_from(["surge", "-i", "soon"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = Cli::try_parse_from(["surge", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_help_exits_cleanly() {
        let err = Cli::try_parse_from(["surge", "-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_apply_overrides_config() {
        let mut config = test_config();
        let cli = Cli::try_parse_from([
            "surge", "-i", "15.5", "-m", "2", "-c", "xrp, nxt",
        ])
        .unwrap();

        cli.apply(&mut config);

        assert_eq!(config.interval, Duration::from_millis(15_500));
        assert_eq!(config.max_retry, 2);
        assert_eq!(
            config.coin_list,
            Some(vec![String::from("XRP"), String::from("NXT")])
        );
        assert!(!config.include_bitcoinaverage);
    }

    #[test]
    fn test_apply_keeps_environment_values() {
        let mut config = test_config();
        config.interval = Duration::from_secs(90);
        config.include_bitcoinaverage = true;

        Cli::try_parse_from(["surge"]).unwrap().apply(&mut config);

        assert_eq!(config.interval, Duration::from_secs(90));
        assert_eq!(config.max_retry, -1);
        assert!(config.include_bitcoinaverage);
    }
}
