// moodlens entry point.
//
// Startup sequence:
// 1. Parse command-line flags
// 2. Initialize tracing (log to file, not terminal)
// 3. Load config, apply flag overrides
// 4. Build the HTTP classifier
// 5. Subcommand given: run it once and exit
// 6. Otherwise: create channels, spawn the controller, run the TUI
// 7. Cleanup on exit

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use moodlens::app;
use moodlens::cli::{self, Cli};
use moodlens::tui;
use moodlens_core::client::{Classifier, HttpClassifier};
use moodlens_core::config::{self, Config, ConfigError};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse flags
    let cli = Cli::parse();

    // 2. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("moodlens starting up");

    // 3. Load config
    let config = match config::load_config() {
        Ok(config) => config,
        Err(ConfigError::DefaultsCopyError { message }) => {
            warn!("{}; using built-in defaults", message);
            Config::default()
        }
        Err(e) => return Err(e).context("failed to load configuration"),
    };
    let config = config
        .with_overrides(cli.base_url.clone(), cli.threshold)
        .context("invalid command-line override")?;
    info!(
        "Config loaded: base_url={}, threshold={}, {} presets",
        config.service.base_url,
        config.analysis.default_threshold,
        config.examples.presets.len()
    );

    // 4. Classifier
    let classifier: Arc<dyn Classifier> = Arc::new(HttpClassifier::from_config(&config));

    // 5. One-shot subcommand
    if let Some(command) = &cli.command {
        let mut stdout = std::io::stdout().lock();
        let result = cli::run_command(
            command,
            config.analysis.default_threshold,
            classifier.as_ref(),
            &mut stdout,
        )
        .await;
        if let Err(e) = &result {
            error!("{:?} failed: {:#}", command, e);
        }
        return result;
    }

    // 6. Channels, controller task, TUI
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);
    let (task_tx, task_rx) = mpsc::channel(64);

    let controller = app::Controller::new(classifier, ui_tx, task_tx);
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, task_rx, controller).await {
            error!("Controller loop error: {}", e);
        }
    });

    // Blocks until the user presses Ctrl+C or Ctrl+Q.
    let view_state = tui::ViewState::from_config(&config);
    if let Err(e) = tui::run(ui_rx, cmd_tx, view_state).await {
        error!("TUI error: {}", e);
    }

    // 7. Cleanup: wait for the controller to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("moodlens shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("moodlens.log"))
        .context("failed to open log file")?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("moodlens=info,moodlens_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
