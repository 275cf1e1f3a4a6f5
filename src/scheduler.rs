//! Update loop
//!
//! Runs the configured jobs one after another, then sleeps until the next
//! wall-clock tick aligned on the interval. A hard failure puts the loop
//! into a fixed cooldown, after which it restarts, until the restart
//! counter goes past `max_retry`.

use std::{future::Future, path::PathBuf, time::Duration};

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, time::sleep};
use tracing::{debug, error, info, warn};

use crate::error::Error;

pub const RESTART_COOLDOWN: Duration = Duration::from_secs(5);

/// What a failing job does to the rest of its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Any error aborts the cycle.
    Hard,
    /// Fetch failures are logged and the cycle goes on. Anything else,
    /// persistence errors included, still aborts it.
    Soft,
}

pub type JobFn =
    Box<dyn Fn() -> BoxFuture<'static, Result<(), Error>> + Send + Sync>;

pub struct Job {
    pub name: &'static str,
    pub policy: FailurePolicy,
    task_fn: JobFn,
}

impl Job {
    pub fn new<F, Fut>(name: &'static str, policy: FailurePolicy, task_fn: F) -> Job
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        Job {
            name,
            policy,
            task_fn: Box::new(move || Box::pin(task_fn())),
        }
    }
}

pub struct Scheduler {
    jobs: Vec<Job>,
    interval: Duration,
    max_retry: i64,
    error_log: Option<PathBuf>,
}

impl Scheduler {
    pub fn new(jobs: Vec<Job>, interval: Duration, max_retry: i64) -> Self {
        Scheduler {
            jobs,
            interval,
            max_retry,
            error_log: None,
        }
    }

    /// Connectivity failures of soft jobs are appended to this file.
    pub fn with_error_log(mut self, path: PathBuf) -> Self {
        self.error_log = Some(path);
        self
    }

    /// One pass over every job, in order.
    pub async fn run_cycle(&self) -> Result<(), Error> {
        for job in &self.jobs {
            debug!(job = job.name, "Running job");

            match (job.task_fn)().await {
                Ok(()) => {},
                Err(err)
                    if job.policy == FailurePolicy::Soft
                        && err.is_fetch_failure() =>
                {
                    warn!(job = job.name, "Skipping for this poll: {}", err);
                    if err.is_connectivity() {
                        self.log_connectivity(job.name, &err).await;
                    }
                },
                Err(err) => {
                    error!(job = job.name, "Job failed: {}", err);
                    return Err(err);
                },
            }
        }

        Ok(())
    }

    /// Loops until the restart counter exceeds `max_retry`. A negative
    /// `max_retry` never gives up. The counter is not reset by a
    /// successful cycle.
    pub async fn run(&self) -> Result<(), Error> {
        let mut restarts: u64 = 0;

        info!(
            "Starting update loop (interval: {} sec)",
            self.interval.as_secs_f64()
        );

        loop {
            match self.run_cycle().await {
                Ok(()) => {
                    let delay = delay_until_next_tick(Utc::now(), self.interval);
                    debug!("Cycle done, next run in {} ms", delay.as_millis());
                    sleep(delay).await;
                },
                Err(err) => {
                    error!("Exception during data update loop: {}", err);
                    sleep(RESTART_COOLDOWN).await;
                    restarts += 1;

                    if retry_limit_exceeded(restarts, self.max_retry) {
                        let err = Error::RetryLimitExceeded {
                            restarts,
                            max_retry: self.max_retry,
                        };
                        error!("{}. Exiting...", err);
                        return Err(err);
                    }

                    info!("Restarting... ({} restarts so far)", restarts);
                },
            }
        }
    }

    async fn log_connectivity(&self, job: &str, err: &Error) {
        let Some(path) = &self.error_log else {
            return;
        };

        let entry = format!(
            "{}\n{}\nError: couldn't connect to {} API\n",
            Utc::now().naive_utc(),
            err,
            job
        );

        let result = async {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            file.write_all(entry.as_bytes()).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = result {
            warn!("Could not write to {}: {}", path.display(), e);
        }
    }
}

fn retry_limit_exceeded(restarts: u64, max_retry: i64) -> bool {
    match u64::try_from(max_retry) {
        Ok(max_retry) => restarts > max_retry,
        Err(_) => false,
    }
}

/// Time left until the next multiple of `interval` since the Unix epoch.
/// An instant sitting exactly on a tick waits a full interval.
pub fn delay_until_next_tick(now: DateTime<Utc>, interval: Duration) -> Duration {
    let interval_ms = i64::try_from(interval.as_millis())
        .unwrap_or(i64::MAX)
        .max(1);
    let elapsed_ms = now.timestamp_millis().rem_euclid(interval_ms);

    Duration::from_millis((interval_ms - elapsed_ms).unsigned_abs())
}
