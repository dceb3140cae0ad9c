// =============================================================================
// Scheduler — periodic basket scans until shutdown
// =============================================================================
//
// The loop wakes every `check_interval`, prints a countdown, and runs a full
// cycle once `scan_interval` has elapsed since the previous one completed
// (fetching, scoring and reporting included).  The first cycle therefore runs
// one full interval after start-up.
//
// Shutdown (Ctrl+C in production) is raced against both the sleep and the
// running cycle, so an interrupt mid-cycle abandons that cycle's partial
// results and only completed cycles count towards the final statistics.
// =============================================================================

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::info;

use crate::market_data::CandleSource;
use crate::report;
use crate::runtime_config::RuntimeConfig;
use crate::scanner::{CycleReport, Scanner};

/// Running totals over the lifetime of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub cycles: u64,
    pub total_signals: u64,
}

impl RunStats {
    pub fn record(&mut self, report: &CycleReport) {
        self.cycles += 1;
        self.total_signals += report.signals.len() as u64;
    }

    pub fn mean_signals_per_cycle(&self) -> f64 {
        if self.cycles == 0 {
            return 0.0;
        }
        self.total_signals as f64 / self.cycles as f64
    }
}

/// `true` once a full interval has passed.
pub fn is_due(elapsed: Duration, interval: Duration) -> bool {
    elapsed >= interval
}

pub struct Scheduler {
    scan_interval: Duration,
    check_interval: Duration,
    top_signals: usize,
}

impl Scheduler {
    pub fn new(scan_interval: Duration, check_interval: Duration, top_signals: usize) -> Self {
        Self {
            scan_interval,
            check_interval,
            top_signals,
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.scan_interval(), config.check_interval(), config.top_signals)
    }

    /// Run cycles until `shutdown` resolves, then return the totals.
    pub async fn run<S, F>(&self, scanner: &Scanner<S>, shutdown: F) -> RunStats
    where
        S: CandleSource,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut stats = RunStats::default();
        let mut last_scan = Instant::now();

        info!(
            symbols = scanner.symbols().len(),
            scan_interval_secs = self.scan_interval.as_secs(),
            "scheduler started, first scan after one full interval"
        );

        loop {
            let elapsed = last_scan.elapsed();

            if is_due(elapsed, self.scan_interval) {
                let cycle = stats.cycles + 1;

                let report = tokio::select! {
                    _ = &mut shutdown => break,
                    report = scanner.run_cycle(cycle) => report,
                };

                stats.record(&report);
                report::log_cycle(&report, self.top_signals);
                report::log_totals(&stats);
                last_scan = Instant::now();
            } else {
                let remaining = self.scan_interval - elapsed;
                info!(next_scan_in = %report::format_countdown(remaining), "waiting");
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.check_interval) => {}
            }
        }

        info!("shutdown requested, scheduler stopped");
        stats
    }
}
