pub mod config_store;
pub mod dispatcher;
pub mod housekeeping;
pub mod monitor;
pub mod scheduler;
pub mod windows;
