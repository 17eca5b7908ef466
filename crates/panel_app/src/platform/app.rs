use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use panel_core::{Msg, PanelState, ServerStatus};
use panel_engine::{
    Backend, OperationRequest, OperationResult, OperationRunner, Panel, ReqwestBackend,
    StatusMonitor,
};
use panel_logging::{panel_info, panel_warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::cli::{Cli, Command};
use super::commands::{self, ParseError, ReplCommand};
use super::config::{load_config, PanelConfig};
use super::logging;
use super::ui::render::{format_buttons, format_progress, format_summary, TerminalSink};

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log_destination, cli.verbose);

    let mut config = load_config(&cli.config);
    config.apply_overrides(&cli);
    panel_info!("Backend at {}", config.base_url);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(run(cli.command(), config))
}

async fn run(command: Command, config: PanelConfig) -> anyhow::Result<()> {
    let backend: Arc<dyn Backend> = Arc::new(ReqwestBackend::new(config.backend_settings())?);
    let panel = Panel::new(PanelState::new(), Arc::new(TerminalSink::new()));
    let runner = OperationRunner::new(Arc::clone(&backend), panel, config.runner_settings());
    if !config.archive_url.trim().is_empty() {
        runner.send(Msg::UrlEdited(config.archive_url.clone()));
    }

    match command {
        Command::Interactive => interactive(runner, backend, &config).await,
        Command::Status => {
            let status = backend.status().await;
            println!("backend: {}", status.label());
            if status == ServerStatus::Offline {
                bail!("backend at {} is offline", config.base_url);
            }
            Ok(())
        }
        Command::Verify { url } => {
            let url = url.unwrap_or_else(|| runner.panel().view().url_input);
            one_shot(&runner, OperationRequest::verify(url)).await
        }
        Command::Process { search, url } => {
            let url = url.unwrap_or_else(|| runner.panel().view().url_input);
            one_shot(&runner, OperationRequest::process(url, search)).await
        }
        Command::Download => one_shot(&runner, OperationRequest::download()).await,
        Command::Read => one_shot(&runner, OperationRequest::read()).await,
    }
}

/// Runs a single operation and waits for the panel to settle before
/// returning, so trailing logs and the occurrence breakdown are printed.
async fn one_shot(runner: &OperationRunner, request: OperationRequest) -> anyhow::Result<()> {
    let kind = request.kind;
    let result = runner.invoke(request).await;
    tokio::time::sleep(kind.settle_delay() + Duration::from_millis(50)).await;
    runner.polling().stop();

    match result {
        OperationResult::Succeeded { .. } => Ok(()),
        OperationResult::Failed { kind, error } => bail!("{kind} failed: {error}"),
    }
}

async fn interactive(
    runner: OperationRunner,
    backend: Arc<dyn Backend>,
    config: &PanelConfig,
) -> anyhow::Result<()> {
    let monitor = StatusMonitor::spawn(backend, runner.panel().clone(), config.status_interval());
    runner.send(Msg::Started);
    println!("{}", commands::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        if let Some(button) = command.button() {
            if !runner.panel().view().buttons.contains(button) {
                println!("{button} is not available right now");
                continue;
            }
        }

        match command {
            ReplCommand::Verify => {
                let url = runner.panel().view().url_input;
                spawn_operation(&runner, OperationRequest::verify(url));
            }
            ReplCommand::Process(search) => {
                let url = runner.panel().view().url_input;
                spawn_operation(&runner, OperationRequest::process(url, search));
            }
            ReplCommand::Download => spawn_operation(&runner, OperationRequest::download()),
            ReplCommand::Read => spawn_operation(&runner, OperationRequest::read()),
            ReplCommand::Clear => runner.send(Msg::ClearLogsClicked),
            ReplCommand::Pause => {
                runner.send(Msg::LogsPaused);
                println!("log updates paused");
            }
            ReplCommand::Resume => {
                runner.send(Msg::LogsResumed);
                println!("log updates resumed");
            }
            ReplCommand::SetUrl(url) => {
                runner.send(Msg::UrlEdited(url));
                println!("url: {}", runner.panel().view().url_input);
            }
            ReplCommand::ResetUrl => {
                runner.send(Msg::UrlResetClicked);
                println!("url: {}", runner.panel().view().url_input);
            }
            ReplCommand::Status => print_status(&runner),
            ReplCommand::Help => println!("{}", commands::HELP),
            ReplCommand::Quit => break,
        }
    }

    monitor.stop();
    runner.polling().stop();
    panel_info!("Interactive session ended");
    Ok(())
}

fn spawn_operation(runner: &OperationRunner, request: OperationRequest) {
    let runner = runner.clone();
    tokio::spawn(async move {
        if let OperationResult::Failed { kind, error } = runner.invoke(request).await {
            panel_warn!("{} failed: {}", kind, error);
        }
    });
}

fn print_status(runner: &OperationRunner) {
    let view = runner.panel().view();
    println!("backend: {}", view.status.label());
    println!("url: {}", view.url_input);
    println!("{}", format_progress(&view.progress));
    println!("{}", format_buttons(view.buttons));
    for line in format_summary(&view.summary) {
        println!("{line}");
    }
    if view.logs_paused {
        println!("log updates paused");
    }
}
