pub mod presenter;
pub mod process_manager;
pub mod sampler;

pub use presenter::{AlertPresenter, PresentationError, SettingsForm, StatusIndicator};
pub use process_manager::{ProcessError, ProcessManager, Signal};
pub use sampler::{MemorySampler, SamplingError};
