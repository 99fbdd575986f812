//! Logger initialization for the terminal front end.
//!
//! The terminal runs in raw mode on the alternate screen, so log output
//! normally goes to a file instead of stderr.

use anyhow::Context;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "sr3d_core=debug"). When unset, `RUST_LOG` is used, then `info`.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            env_filter: None,
            log_file: Some(path.into()),
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let file = match &config.log_file {
        Some(path) => Some(
            File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?,
        ),
        None => None,
    };

    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = &config.env_filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        match file {
            Some(file) => {
                builder
                    .target(env_logger::Target::Pipe(Box::new(file)))
                    .write_style(env_logger::WriteStyle::Never);
            }
            None => {
                builder.write_style(env_logger::WriteStyle::Auto);
            }
        }

        builder.init();
        log::debug!("logging initialized");
    });

    Ok(())
}
