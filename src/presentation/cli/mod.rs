pub mod app;
pub mod commands;
pub mod formatters;
pub mod runtime;
