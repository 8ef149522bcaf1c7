//! cloudctl binary entrypoint.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cloud_api::{CloudApi, HttpCloudApi};
use cloud_cli::cli::{Cli, Commands};
use cloud_cli::commands::{ClusterCommand, DashboardCommand, StatusCommand, VolumeCommand};
use cloud_cli::output::OutputFormat;
use cloud_cli::CliError;

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    Off,
}

/// The dashboard owns the terminal, so it only logs to a file.
fn log_target(cli: &Cli) -> LogTarget<'_> {
    match (&cli.log_file, &cli.command) {
        (Some(path), _) => LogTarget::File(path),
        (None, Commands::Dashboard(_)) => LogTarget::Off,
        (None, _) => LogTarget::Stderr,
    }
}

fn init_tracing(target: LogTarget<'_>) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        LogTarget::Off => {}
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(log_target(&cli)) {
        eprintln!("Failed to open log file: {e}");
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let api: Arc<dyn CloudApi> = Arc::new(HttpCloudApi::new(&cli.api_url, cli.api_token.clone())?);
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Dashboard(args) => {
            drop(stdout);
            DashboardCommand::new(api).execute(args).await?;
        }
        Commands::Cluster { command } => {
            let cmd = ClusterCommand::new(api.as_ref(), cli.timeout);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Volume { command } => {
            let cmd = VolumeCommand::new(api.as_ref(), cli.timeout);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Health => {
            let cmd = StatusCommand::new(api.as_ref(), cli.timeout);
            cmd.health(&mut stdout, &format).await?;
        }
        Commands::Version => {
            let cmd = StatusCommand::new(api.as_ref(), cli.timeout);
            cmd.version(&mut stdout, &format).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloud_api::ApiError;
    use test_case::test_case;

    #[test_case(&["cloudctl", "health"], LogTarget::Stderr ; "plain command logs to stderr")]
    #[test_case(&["cloudctl", "dashboard"], LogTarget::Off ; "dashboard without file is silent")]
    #[test_case(&["cloudctl", "--log-file", "cloudctl.log", "dashboard"], LogTarget::File(Path::new("cloudctl.log")) ; "dashboard with file")]
    #[test_case(&["cloudctl", "--log-file", "cloudctl.log", "version"], LogTarget::File(Path::new("cloudctl.log")) ; "command with file")]
    fn log_target_by_command(argv: &[&str], expected: LogTarget<'static>) {
        let cli = Cli::parse_from(argv);
        assert_eq!(log_target(&cli), expected);
    }

    #[tokio::test]
    async fn invalid_api_url_fails() {
        let cli = Cli::parse_from(["cloudctl", "--api-url", "not a url", "health"]);
        let result = run(cli).await;
        assert!(matches!(result, Err(CliError::Api(ApiError::InvalidUrl(_)))));
    }

    #[tokio::test]
    async fn unreachable_api_fails_health() {
        let cli = Cli::parse_from([
            "cloudctl",
            "--api-url",
            "http://127.0.0.1:1",
            "--timeout",
            "5s",
            "health",
        ]);
        let result = run(cli).await;
        assert!(matches!(result, Err(CliError::Api(_))));
    }

    #[tokio::test]
    async fn unreachable_api_fails_cluster_list() {
        let cli = Cli::parse_from([
            "cloudctl",
            "--api-url",
            "http://127.0.0.1:1",
            "cluster",
            "list",
        ]);
        assert!(run(cli).await.is_err());
    }
}
