use std::time::Duration;

use tokio::time::Instant;
use unicode_truncate::UnicodeTruncateStr;

use crate::http_probe::prelude::*;
use crate::request::CheckRequest;

const URL_COLUMN_WIDTH: usize = 64;

fn to_fixed_width(input: &str, width: usize) -> String {
    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}

/// Wall-clock start of a single run.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionClock {
    start: Instant,
}

impl ExecutionClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn exceeded(&self, budget: Duration) -> bool {
        self.elapsed() >= budget
    }
}

/// Probes the targets of a request one after the other, within a global time budget.
///
/// The budget is checked before each probe, never during one: a batch can overrun
/// the budget by at most one probe timeout, and targets left when the budget runs
/// out are skipped without producing a result.
pub struct BatchRunner<P> {
    prober: P,
    budget: Duration,
}

impl<P: Prober> BatchRunner<P> {
    pub fn new(prober: P, budget: Duration) -> Self {
        Self { prober, budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub async fn run(&self, request: &CheckRequest) -> Vec<CheckResult> {
        let clock = ExecutionClock::start();
        let mut batch = Vec::with_capacity(request.urls.len());

        for url in &request.urls {
            if clock.exceeded(self.budget) {
                tracing::warn!(
                    budget_secs = self.budget.as_secs(),
                    attempted = batch.len(),
                    skipped = request.urls.len() - batch.len(),
                    "Execution time budget exceeded, stopping early"
                );
                break;
            }

            let outcome = self.prober.probe(url).await;
            let result = CheckResult::from_outcome(
                &request.event_type,
                &request.object_type,
                url,
                outcome,
            );

            let column = to_fixed_width(url, URL_COLUMN_WIDTH);
            if result.success {
                tracing::info!("✅ {column} {}s", result.duration);
            } else {
                tracing::info!("❌ {column} {}s {}", result.duration, result.error);
            }

            batch.push(result);
        }

        batch
    }
}
