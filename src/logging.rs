use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;

use crate::config::LoggingConfig;

/// Routes `log` output to the configured file, appending across runs.
/// `RUST_LOG` overrides the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .wrap_err_with(|| format!("failed to open log file {}", config.file.display()))?;

    Builder::from_env(Env::default().default_filter_or(config.level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .wrap_err("failed to install logger")?;

    Ok(())
}
