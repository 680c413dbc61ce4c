//! Tracing subscriber setup for the server binary.
//!
//! `RUST_LOG` selects levels (default `memo_api=debug,tower_http=debug`).
//! Output format, optional log file and ANSI colors come from [`LogConfig`].

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogConfig, LogFormat};

const DEFAULT_FILTER: &str = "memo_api=debug,memo_core=info,memo_db=info,memo_inference=debug,tower_http=debug";
const DEFAULT_LOG_FILE_NAME: &str = "memo-api.log";

/// Install the global subscriber.
///
/// When logging to a file the returned guard must be held for the life of
/// the process, otherwise buffered lines are lost.
pub fn init_tracing(config: &LogConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(path) = &config.file {
        let path = Path::new(path);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_FILE_NAME);
        let appender = tracing_appender::rolling::daily(dir, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        match config.format {
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
                .init(),
            LogFormat::Text => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        // no ANSI in files unless asked for
                        .with_ansi(config.ansi.unwrap_or(false)),
                )
                .init(),
        }
        Some(guard)
    } else {
        match config.format {
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json())
                .init(),
            LogFormat::Text => {
                let mut layer = tracing_subscriber::fmt::layer();
                if let Some(ansi) = config.ansi {
                    layer = layer.with_ansi(ansi);
                }
                registry.with(layer).init();
            }
        }
        None
    }
}
