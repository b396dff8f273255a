pub mod models;
pub mod services;
pub mod api;
pub mod cli;

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{info, Subscriber};
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use cli::{Cli, Command};

static PROCESS_START: OnceLock<Instant> = OnceLock::new();
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_PREFIX: &str = "ai-text-detector_";
const LOG_FILES_KEPT: usize = 30;

fn startup_elapsed_ms() -> u128 {
    PROCESS_START
        .get()
        .map(|t| t.elapsed().as_millis())
        .unwrap_or(0)
}

fn env_truthy(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

// stdout carries results, so console logs go to stderr
fn console_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
}

fn file_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
}

/// Initialize logging: console on stderr, plus a per-session log file unless disabled
fn init_logging(verbosity: u8) {
    let disable_file_log = env_truthy("AI_DETECTOR_DISABLE_FILE_LOG");
    let disable_cleanup = env_truthy("AI_DETECTOR_DISABLE_LOG_CLEANUP");

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    if disable_file_log {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer())
            .init();
        info!("File logging disabled via AI_DETECTOR_DISABLE_FILE_LOG");
        return;
    }

    let logs_dir = match std::env::var("AI_DETECTOR_LOG_DIR") {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => get_logs_dir(),
    };

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer())
            .init();
        info!("Falling back to console-only logging (log dir not writable: {})", e);
        return;
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("{}{}.log", LOG_FILE_PREFIX, timestamp);

    let file_appender = rolling::never(&logs_dir, &log_filename);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(file_guard);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer(file_writer))
        .with(console_layer())
        .init();

    info!("Log file: {}/{}", logs_dir.display(), log_filename);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if !disable_cleanup {
        std::thread::spawn(move || {
            cleanup_old_logs(&logs_dir, LOG_FILES_KEPT);
        });
    }
}

/// Get the logs directory path
fn get_logs_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("ai-text-detector").join("logs");
    }
    PathBuf::from("logs")
}

fn cleanup_old_logs(logs_dir: &Path, keep: usize) {
    let mut entries: Vec<_> = match fs::read_dir(logs_dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(_) => return,
    };

    entries.retain(|e| {
        let name = e.file_name().to_string_lossy().to_string();
        name.starts_with(LOG_FILE_PREFIX) && name.ends_with(".log")
    });

    if entries.len() <= keep {
        return;
    }

    entries.sort_by_key(|e| {
        e.metadata()
            .and_then(|m| m.modified())
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
    });

    let remove_count = entries.len().saturating_sub(keep);
    for entry in entries.into_iter().take(remove_count) {
        let _ = fs::remove_file(entry.path());
    }
}

/// Parse arguments, set up logging and dispatch the command
pub async fn run() -> anyhow::Result<ExitCode> {
    PROCESS_START.get_or_init(Instant::now);
    let cli = Cli::parse();

    init_logging(cli.verbose);
    info!(startup_ms = startup_elapsed_ms(), "logging.initialized");

    let store = cli::config_store(&cli)?;
    let code = match cli.command {
        Command::Analyze(args) => {
            if cli::run_analyze(&store, args).await? {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Config { action } => {
            cli::run_config(&store, action)?;
            ExitCode::SUCCESS
        }
    };

    info!(elapsed_ms = startup_elapsed_ms(), "run.finished");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_by_verbosity() {
        assert_eq!(default_filter(0), "warn");
        assert_eq!(default_filter(1), "info");
        assert_eq!(default_filter(5), "debug");
    }

    #[test]
    fn test_file_and_console_layers_stack() {
        let dir = tempfile::tempdir().unwrap();
        let (writer, guard) = tracing_appender::non_blocking(rolling::never(dir.path(), "session.log"));
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(file_layer(writer))
            .with(console_layer());

        tracing::subscriber::with_default(subscriber, || {
            info!(word_count = 12, "layers.stacked");
        });
        drop(guard);

        let written = fs::read_to_string(dir.path().join("session.log")).unwrap();
        assert!(written.contains("layers.stacked"));
        assert!(written.contains("word_count=12"));
    }

    #[test]
    fn test_cleanup_keeps_newest_logs() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            fs::write(dir.path().join(format!("{}{}.log", LOG_FILE_PREFIX, i)), "x").unwrap();
        }
        fs::write(dir.path().join("unrelated.txt"), "x").unwrap();

        cleanup_old_logs(dir.path(), 2);

        let logs = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX))
            .count();
        assert_eq!(logs, 2);
        assert!(dir.path().join("unrelated.txt").exists());
    }
}
