// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub const LOG_ENV: &str = "CUBBY_LOG";

/// Send tracing output to the configured log file. The terminal belongs to
/// the TUI, so nothing is written to stdout or stderr.
pub fn init(config: &Config) -> Result<PathBuf> {
    let path = config.log_file()?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let directive = filter_directive(env::var(LOG_ENV).ok(), config.log_level());
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("parse log filter {directive:?}; check {LOG_ENV} or [log].level"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;

    tracing::info!(log_file = %path.display(), "logging initialized");
    Ok(path)
}

fn filter_directive(env_value: Option<String>, config_level: &str) -> String {
    match env_value {
        Some(value) if !value.trim().is_empty() => value,
        _ => config_level.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::filter_directive;

    #[test]
    fn env_value_overrides_config_level() {
        assert_eq!(
            filter_directive(Some("cubby_db=debug".to_owned()), "warn"),
            "cubby_db=debug"
        );
    }

    #[test]
    fn blank_or_missing_env_falls_back_to_config() {
        assert_eq!(filter_directive(None, "info"), "info");
        assert_eq!(filter_directive(Some("  ".to_owned()), "warn"), "warn");
    }
}
