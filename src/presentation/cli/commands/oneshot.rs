use std::time::Duration;

use crate::application::services::dispatcher::DispatchOutcome;
use crate::application::services::monitor::{status_text, MonitorService, TickReport};
use crate::presentation::cli::commands::run::startup_summary;
use crate::infrastructure::notifications::status_line::render_status;

/// Longest wait for an alert launched by the single tick to close.
pub const ALERT_WAIT: Duration = Duration::from_secs(15);

/// Sample once, evaluate, dispatch, print the status line and return.
///
/// Sampling failures are logged, not returned: a oneshot run always exits 0.
pub async fn run_oneshot(service: &MonitorService, alert_wait: Duration) -> Option<TickReport> {
    tracing::info!(
        "ramwatch oneshot ({})",
        startup_summary(&service.config().get())
    );
    let report = match service.tick().await {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!("Sampling failed: {e}");
            return None;
        }
    };

    if report.dispatch == Some(DispatchOutcome::Launched)
        && !service.dispatcher().wait_idle(alert_wait).await
    {
        tracing::warn!(
            "Alert still open after {}s, exiting anyway",
            alert_wait.as_secs()
        );
    }

    println!(
        "{}",
        render_status(
            report.evaluation.severity,
            &status_text(&report.sample, report.evaluation.severity)
        )
    );
    Some(report)
}
