use std::path::Path;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use mentions::cli::commands::Cli;
use mentions::cli::handlers;
use mentions::io::config_io;

fn main() {
    let cli = Cli::parse();

    let config = match config_io::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let level = cli
        .log_level
        .clone()
        .or_else(|| config.log.level.clone())
        .unwrap_or_else(|| "info".to_string());
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.log.file.as_ref().map(Into::into));
    let guard = init_logging(&level, log_file.as_deref());

    let result = handlers::dispatch(cli, config);
    if let Err(ref e) = result {
        tracing::error!(error = %e, "command failed");
    }
    // flush the log before a possible exit
    drop(guard);

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Log to a file, never stdout: the composer owns the terminal and the
/// other commands print their results there.
///
/// The returned guard flushes buffered entries when dropped.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("mentions.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = match log_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}
