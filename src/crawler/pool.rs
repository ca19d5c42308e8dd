//! Bounded worker pool for one pipeline stage
//!
//! Every unit of work is dispatched at once as its own task; a semaphore
//! caps how many of them run at the same time. Each task runs fetch, parse,
//! extract and persist back to back. Failures are logged with the unit they
//! belong to and counted, never propagated, and the pool returns only after
//! every dispatched task has finished.

use crate::ScraperError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// How often (in completed tasks) progress is logged
const PROGRESS_EVERY: usize = 25;

/// Outcome counts of one stage run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageStats {
    pub dispatched: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl StageStats {
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }
}

impl fmt::Display for StageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} dispatched, {} succeeded, {} failed",
            self.dispatched, self.succeeded, self.failed
        )
    }
}

/// Runs `task` for every item with at most `workers` running concurrently
///
/// # Arguments
///
/// * `stage` - Name used in log lines
/// * `items` - Units of work; their `Display` form names them in error logs
/// * `workers` - Concurrency ceiling (values below 1 are treated as 1)
/// * `task` - Processes one unit
pub async fn run_bounded<T, F, Fut>(
    stage: &str,
    items: Vec<T>,
    workers: usize,
    task: F,
) -> StageStats
where
    T: fmt::Display + Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ScraperError>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let task = Arc::new(task);
    let mut tasks = JoinSet::new();

    let mut stats = StageStats {
        dispatched: items.len(),
        ..StageStats::default()
    };

    for item in items {
        let semaphore = Arc::clone(&semaphore);
        let task = Arc::clone(&task);
        let label = item.to_string();

        tasks.spawn(async move {
            // The semaphore is never closed, so the permit is always granted.
            let _permit = semaphore.acquire_owned().await.ok();
            let result = task(item).await;
            (label, result)
        });
    }

    let start_time = Instant::now();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(()))) => stats.succeeded += 1,
            Ok((label, Err(e))) => {
                tracing::error!("{}: failed {}: {}", stage, label, e);
                stats.failed += 1;
            }
            Err(e) => {
                tracing::error!("{}: worker task aborted: {}", stage, e);
                stats.failed += 1;
            }
        }

        if stats.completed() % PROGRESS_EVERY == 0 {
            tracing::info!("{}", progress_line(stage, &stats, start_time.elapsed()));
        }
    }

    stats
}

/// Progress report; the rate counts finished tasks of whatever the stage
/// processes, be it search pages or listings
fn progress_line(stage: &str, stats: &StageStats, elapsed: Duration) -> String {
    let completed = stats.completed();
    let rate = completed as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
    format!(
        "{}: {}/{} done ({} failed), {:.2} tasks/sec",
        stage, completed, stats.dispatched, stats.failed, rate
    )
}
