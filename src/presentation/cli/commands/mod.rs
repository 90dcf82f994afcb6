pub mod about;
pub mod config;
pub mod oneshot;
pub mod run;
pub mod status;
