//! Logging setup for the `lookout` binary.
//!
//! Events go to a daily rolling file so the terminal stays free for the
//! interactive prompts; `log.stderr` mirrors them to stderr as well. The
//! `log` section of the configuration deserializes straight into
//! [`LogSettings`], which is what [`init_logging`] takes.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

const APP_NAME: &str = "lookout";
const LOG_FILE_NAME: &str = "lookout.log";

/// Environment variable consulted when `log.dir` is unset.
pub const LOG_DIR_ENV: &str = "LOOKOUT_LOG_DIR";

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// The `log` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log directory; falls back to `LOOKOUT_LOG_DIR`, then
    /// `~/.local/share/lookout`.
    pub dir: Option<PathBuf>,
    /// Filter used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
    /// Mirror events to stderr.
    pub stderr: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            dir: None,
            filter: "info".to_string(),
            format: LogFormat::Text,
            stderr: false,
        }
    }
}

/// Install the global subscriber and return today's log file path.
///
/// Only the first call installs anything; later calls return the same path.
pub fn init_logging(settings: &LogSettings) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = resolve_log_dir(settings.dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;
    let path = log_file_path(&dir, Utc::now());

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, LOG_FILE_NAME));
    let _ = LOG_GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(sink(settings.format, writer, false))
        .with(
            settings
                .stderr
                .then(|| sink(settings.format, std::io::stderr, true)),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_PATH.set(path.clone());
    Ok(path)
}

/// One formatted output in the chosen encoding.
fn sink<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(ansi).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    }
}

/// File the daily appender writes to at `now`; it rolls on UTC dates.
fn log_file_path(dir: &Path, now: DateTime<Utc>) -> PathBuf {
    dir.join(format!("{LOG_FILE_NAME}.{}", now.format("%Y-%m-%d")))
}

fn resolve_log_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return expand_home(dir);
    }
    match std::env::var(LOG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => expand_home(Path::new(&dir)),
        _ => default_data_dir(),
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

fn default_data_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".local/share").join(APP_NAME),
        Err(_) => PathBuf::from(".").join(APP_NAME),
    }
}
