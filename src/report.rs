// =============================================================================
// Console Report — human-readable cycle summaries on the tracing output
// =============================================================================

use std::time::Duration;

use tracing::info;

use crate::scanner::CycleReport;
use crate::scheduler::RunStats;
use crate::signals::Signal;

/// `MM:SS`, minutes uncapped.
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// One ranked line for the top-signals table.
pub fn format_signal(rank: usize, signal: &Signal) -> String {
    format!(
        "{rank}. {} | {} ({}%) | price {:.4} | RSI {:.1} | volume {:.1}x | change {:+.2}% | {}",
        signal.symbol,
        signal.tier,
        signal.confidence,
        signal.price,
        signal.rsi,
        signal.volume_ratio,
        signal.price_change_pct,
        signal.conditions.join(", "),
    )
}

pub fn log_cycle(report: &CycleReport, top_n: usize) {
    info!(
        cycle = report.cycle,
        started_at = %report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        scanned = report.scanned,
        signals = report.signals.len(),
        skipped = report.skipped.len(),
        "analysis cycle complete"
    );

    if report.signals.is_empty() {
        info!("no strong signals this cycle");
        return;
    }

    info!("top {} signals:", top_n.min(report.signals.len()));
    for (i, signal) in report.signals.iter().take(top_n).enumerate() {
        info!("{}", format_signal(i + 1, signal));
    }
}

pub fn log_totals(stats: &RunStats) {
    info!(
        cycles = stats.cycles,
        total_signals = stats.total_signals,
        mean_per_cycle = format!("{:.2}", stats.mean_signals_per_cycle()),
        "running totals"
    );
}
