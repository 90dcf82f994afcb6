use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::config::{ConfigChanges, Toggle};
use crate::application::config::ConfigOverrides;

/// ramwatch: background RAM monitor
///
/// Samples memory usage on an interval and raises one desktop alert per
/// threshold crossing. Runs the monitor loop when no command is given.
#[derive(Parser, Debug)]
#[command(name = "ramwatch")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Critical threshold in percent for this session
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Poll interval in seconds for this session
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Sample once, alert if needed, print the status and exit
    #[arg(long)]
    pub oneshot: bool,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Also append log records to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Terminate other running instances before taking the lock
    #[arg(long)]
    pub replace: bool,

    /// Print alerts in the terminal instead of desktop notifications
    #[arg(long, global = true)]
    pub no_desktop: bool,
}

impl Cli {
    #[must_use]
    pub const fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            threshold: self.threshold,
            interval_secs: self.interval,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the monitor loop (default)
    #[command(alias = "r")]
    Run,

    /// Sample once and show current memory usage
    #[command(alias = "s")]
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    #[command(alias = "c")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show program information
    About,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective settings
    Show,

    /// Change one or more settings
    Set {
        /// Medium threshold in percent (10-95)
        #[arg(long)]
        medium: Option<i64>,

        /// Critical threshold in percent (medium+1 to 100)
        #[arg(long)]
        critical: Option<i64>,

        /// Poll interval in seconds (1-30)
        #[arg(long)]
        interval: Option<i64>,

        /// Turn alerts on or off
        #[arg(long, value_enum)]
        notifications: Option<Toggle>,
    },

    /// Edit settings interactively
    Edit,

    /// Print the settings file location
    Path,
}

impl ConfigAction {
    /// Changes requested by `config set`, empty for other actions.
    #[must_use]
    pub const fn changes(&self) -> ConfigChanges {
        match *self {
            Self::Set {
                medium,
                critical,
                interval,
                notifications,
            } => ConfigChanges {
                medium,
                critical,
                interval,
                notifications,
            },
            Self::Show | Self::Edit | Self::Path => ConfigChanges {
                medium: None,
                critical: None,
                interval: None,
                notifications: None,
            },
        }
    }
}
