//! `ramwatch`: background RAM monitor.
//!
//! Samples system memory on an interval, classifies usage into
//! Normal / Medium / Critical tiers and raises at most one alert per tier
//! per excursion, while a named lock keeps a single monitor per machine.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
