use std::sync::Arc;
use std::time::Duration;

use super::config_store::ConfigStore;
use super::dispatcher::{DispatchOutcome, NotificationDispatcher};
use crate::domain::entities::alert::Alert;
use crate::domain::entities::sample::MemorySample;
use crate::domain::escalation::Evaluation;
use crate::domain::ports::presenter::StatusIndicator;
use crate::domain::ports::sampler::{MemorySampler, SamplingError};
use crate::domain::value_objects::severity::Severity;

/// Upper bound on a single OS memory query.
pub const DEFAULT_SAMPLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of a single monitoring tick.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub sample: MemorySample,
    pub evaluation: Evaluation,
    pub dispatch: Option<DispatchOutcome>,
}

/// One tick: sample → escalation state machine → (maybe) dispatch → status.
pub struct MonitorService {
    sampler: Arc<dyn MemorySampler>,
    config: Arc<ConfigStore>,
    dispatcher: Arc<NotificationDispatcher>,
    status: Arc<dyn StatusIndicator>,
    sample_timeout: Duration,
}

impl MonitorService {
    #[must_use]
    pub fn new(
        sampler: Arc<dyn MemorySampler>,
        config: Arc<ConfigStore>,
        dispatcher: Arc<NotificationDispatcher>,
        status: Arc<dyn StatusIndicator>,
    ) -> Self {
        Self {
            sampler,
            config,
            dispatcher,
            status,
            sample_timeout: DEFAULT_SAMPLE_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_sample_timeout(mut self, timeout: Duration) -> Self {
        self.sample_timeout = timeout;
        self
    }

    #[must_use]
    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Arc<NotificationDispatcher> {
        &self.dispatcher
    }

    /// Current poll interval, read fresh from the config store.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.config.get().poll_interval()
    }

    /// Run a single monitoring tick.
    ///
    /// # Errors
    ///
    /// Returns `SamplingError` if the memory reading fails or times out; the
    /// state machine is not advanced in that case.
    pub async fn tick(&self) -> Result<TickReport, SamplingError> {
        if self.config.reload_if_changed() {
            tracing::info!("Settings file changed, new values apply from this tick");
        }

        let sample = self.sample().await?;
        tracing::info!(
            "RAM: {:.1}% | used {:.2} GiB / {:.2} GiB",
            sample.used_percent,
            sample.used_gib(),
            sample.total_gib()
        );

        let evaluation = self.config.evaluate(&sample);
        if evaluation.thresholds_changed {
            tracing::info!(
                "Thresholds now {}, alert history re-armed",
                evaluation.thresholds
            );
        }

        let dispatch = evaluation.fire.map(|severity| {
            tracing::warn!(
                "{} memory usage: {:.1}% (thresholds {})",
                severity,
                sample.used_percent,
                evaluation.thresholds
            );
            let outcome = self
                .dispatcher
                .dispatch(Alert::for_sample(severity, &sample, evaluation.thresholds));
            tracing::debug!("Dispatch outcome: {outcome:?}");
            outcome
        });

        self.status
            .update(evaluation.severity, &status_text(&sample, evaluation.severity));

        Ok(TickReport {
            sample,
            evaluation,
            dispatch,
        })
    }

    async fn sample(&self) -> Result<MemorySample, SamplingError> {
        let sampler = Arc::clone(&self.sampler);
        match tokio::time::timeout(
            self.sample_timeout,
            tokio::task::spawn_blocking(move || sampler.sample()),
        )
        .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(SamplingError::Unavailable(format!("sampler task failed: {e}"))),
            Err(_) => Err(SamplingError::Timeout),
        }
    }
}

/// Tooltip text for the status indicator.
#[must_use]
pub fn status_text(sample: &MemorySample, severity: Severity) -> String {
    format!(
        "RAM {:.1}% ({:.1}/{:.1} GiB) {}",
        sample.used_percent,
        sample.used_gib(),
        sample.total_gib(),
        severity
    )
}
