use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use hard75_domain::shared::SystemClock;

use crate::application::services::{ConfigService, DayRolloverWatcher, LogLevel};
use crate::application::{AppEvent, TrackerController, TrackerDeps};
use crate::presentation::bootstrap::{
    build_runtime, init_logging, resolve_config_dir, resolve_data_dir,
};
use crate::presentation::cli::{parse_watch_line, Cli, Command};
use crate::presentation::error::CommandError;
use crate::presentation::terminal::{OutputFormat, OutputView, TerminalPresenter};

const EVENT_QUEUE: usize = 64;

#[derive(Serialize)]
struct LogLevelOutput {
    log_level: &'static str,
}

/// Run one CLI invocation to completion
pub async fn run(cli: Cli) -> Result<(), CommandError> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    let config = ConfigService::new(&resolve_config_dir(&cli, &data_dir))?;
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let command = cli.command.clone().unwrap_or(Command::Status);
    if let Command::LogLevel { level } = command {
        return log_level(&config, level, format);
    }

    init_logging(&data_dir, &config);
    let runtime = build_runtime(&cli, &data_dir).await?;
    let watch = command == Command::Watch;
    let presenter = Arc::new(TerminalPresenter::stdout(format, watch));

    let (tx, mut rx) = mpsc::channel(EVENT_QUEUE);
    let mut controller = TrackerController::new(
        TrackerDeps {
            store: runtime.store.clone(),
            sessions: runtime.sessions.clone(),
            sync: runtime.sync,
            presenter: presenter.clone(),
            clock: Arc::new(SystemClock),
        },
        tx.clone(),
    );

    let identity = runtime.sessions.current_user().await;
    controller.start(identity).await;

    if watch {
        let rollover = DayRolloverWatcher::new(runtime.timeouts.rollover_check);
        rollover.start(tx.clone()).await;
        tokio::spawn(read_stdin(tx.clone()));
        tokio::spawn(forward_ctrl_c(tx));

        controller.run(rx).await;
        rollover.stop().await;
        return Ok(());
    }

    let wait = runtime.timeouts.http_request;
    controller.await_remote(&mut rx, wait).await;
    if let Some(event) = command.to_event() {
        controller.handle(event).await;
        // Sign-in opens a new subscription
        controller.await_remote(&mut rx, wait).await;
    }
    controller.shutdown().await;

    let view = if command == Command::Log {
        OutputView::LogOnly
    } else {
        OutputView::Full
    };
    presenter.flush(view);
    Ok(())
}

fn log_level(
    config: &ConfigService,
    level: Option<LogLevel>,
    format: OutputFormat,
) -> Result<(), CommandError> {
    let current = match level {
        Some(level) => {
            config.set_log_level(level)?;
            level
        }
        None => config.get_log_level(),
    };

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&LogLevelOutput {
                log_level: current.as_str()
            })
            .unwrap_or_default()
        ),
        OutputFormat::Text if level.is_some() => println!(
            "Log level set to {} (applies from the next start)",
            current.as_str()
        ),
        OutputFormat::Text => println!("Log level: {}", current.as_str()),
    }
    Ok(())
}

/// Feed `watch` commands from stdin until EOF or `quit`
async fn read_stdin(events: mpsc::Sender<AppEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("[watch] stdin read failed: {}", e);
                break;
            }
        };

        match parse_watch_line(&line) {
            Ok(event) => {
                let stop = event == AppEvent::Shutdown;
                if events.send(event).await.is_err() || stop {
                    return;
                }
            }
            Err(message) => eprintln!("{}", message.trim_end()),
        }
    }

    debug!("[watch] stdin closed");
    let _ = events.send(AppEvent::Shutdown).await;
}

async fn forward_ctrl_c(events: mpsc::Sender<AppEvent>) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("[watch] interrupted");
        let _ = events.send(AppEvent::Shutdown).await;
    }
}
