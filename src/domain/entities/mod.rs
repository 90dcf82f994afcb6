pub mod alert;
pub mod sample;

pub use alert::Alert;
pub use sample::MemorySample;
