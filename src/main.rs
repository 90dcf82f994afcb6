use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use ramwatch::application::config::default_config_path;
use ramwatch::application::services::config_store::ConfigStore;
use ramwatch::application::services::dispatcher::NotificationDispatcher;
use ramwatch::application::services::monitor::MonitorService;
use ramwatch::application::services::windows::WindowRegistry;
use ramwatch::domain::ports::presenter::AlertPresenter;
use ramwatch::infrastructure::collectors::sysinfo_sampler::SysinfoSampler;
use ramwatch::infrastructure::notifications::desktop::DesktopPresenter;
use ramwatch::infrastructure::notifications::fallback::FallbackPresenter;
use ramwatch::infrastructure::notifications::status_line::TerminalStatusIndicator;
use ramwatch::infrastructure::notifications::terminal::TerminalPresenter;
use ramwatch::infrastructure::os::instance_lock::InstanceLock;
use ramwatch::infrastructure::os::process_manager::OsProcessManager;
use ramwatch::presentation::cli::app::{Cli, Commands, ConfigAction};
use ramwatch::presentation::cli::commands::about::run_about;
use ramwatch::presentation::cli::commands::config::{
    run_config_edit, run_config_path, run_config_set, run_config_show,
};
use ramwatch::presentation::cli::commands::oneshot::{run_oneshot, ALERT_WAIT};
use ramwatch::presentation::cli::commands::run::{run_monitor, STOP_TIMEOUT};
use ramwatch::presentation::cli::commands::status::run_status;
use ramwatch::presentation::cli::runtime::block_on_bounded;

fn print_banner() {
    println!("{}", "━".repeat(40).cyan());
    println!("{}", "  ramwatch: RAM monitor".bold().cyan());
    println!("{}", "━".repeat(40).cyan());
}

fn setup_tracing(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

fn build_monitor(config: &Arc<ConfigStore>, no_desktop: bool) -> Arc<MonitorService> {
    let presenter: Arc<dyn AlertPresenter> = if no_desktop {
        Arc::new(TerminalPresenter::new())
    } else {
        Arc::new(FallbackPresenter::new(
            Box::new(DesktopPresenter::new()),
            Box::new(TerminalPresenter::new()),
        ))
    };
    let dispatcher = Arc::new(NotificationDispatcher::new(presenter, Arc::clone(config)));
    Arc::new(MonitorService::new(
        Arc::new(SysinfoSampler::new()),
        Arc::clone(config),
        dispatcher,
        Arc::new(TerminalStatusIndicator::new()),
    ))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose, cli.log_file.as_deref())?;

    let result = block_on_bounded(run(cli), STOP_TIMEOUT).and_then(|result| result);
    if let Err(e) = &result {
        tracing::error!("ramwatch failed: {e:#}");
    }
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load configuration
    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => default_config_path().context("Cannot locate the settings file")?,
    };
    let config = Arc::new(ConfigStore::load(config_path));

    match cli.command {
        Some(Commands::Config { ref action }) => match action {
            ConfigAction::Show => run_config_show(&config)?,
            ConfigAction::Path => run_config_path(&config),
            ConfigAction::Set { .. } => run_config_set(&config, action.changes())?,
            ConfigAction::Edit => run_config_edit(Arc::clone(&config)).await?,
        },
        Some(Commands::About) => run_about(&WindowRegistry::new()),
        Some(Commands::Status { json }) => {
            config.apply_overrides(cli.overrides());
            run_status(&SysinfoSampler::new(), config.get(), json)?;
        }
        Some(Commands::Run) | None if cli.oneshot => {
            config.apply_overrides(cli.overrides());
            let service = build_monitor(&config, cli.no_desktop);
            run_oneshot(&service, ALERT_WAIT).await;
        }
        Some(Commands::Run) | None => {
            config.apply_overrides(cli.overrides());
            print_banner();
            let service = build_monitor(&config, cli.no_desktop);
            let lock = InstanceLock::new(InstanceLock::default_path());
            run_monitor(service, &lock, cli.replace, &OsProcessManager::new()).await?;
        }
    }

    Ok(())
}
