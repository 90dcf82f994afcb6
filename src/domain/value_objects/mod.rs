pub mod settings;
pub mod severity;
pub mod thresholds;

pub use settings::MonitorSettings;
pub use severity::Severity;
pub use thresholds::Thresholds;
