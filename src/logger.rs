//! Logger bootstrap.
//!
//! The subscriber is installed once at startup. The only thing that stays
//! mutable afterwards is the level filter, and it is reachable exclusively
//! through the [`LogLevelHandle`] returned by [`init`] (passed to the debug
//! server explicitly).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt as tfmt, layer::SubscriberExt, reload};

use crate::config::LogConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(LoggerError::UnknownLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log level: {0:?} (expected debug, info, warn or error)")]
    UnknownLevel(String),
    #[error("failed to update log level: {0}")]
    Reload(#[from] reload::Error),
    #[error("failed to install logger: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Runtime control over the active log level.
#[derive(Clone)]
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl fmt::Debug for LogLevelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogLevelHandle").finish_non_exhaustive()
    }
}

impl LogLevelHandle {
    /// Reloadable filter layer plus its handle, starting at `level`.
    pub fn layer(level: LogLevel) -> (reload::Layer<EnvFilter, Registry>, Self) {
        let (layer, handle) = reload::Layer::new(EnvFilter::new(level.as_str()));
        (layer, Self { handle })
    }

    pub fn level(&self) -> Result<LogLevel, LoggerError> {
        let directive = self.handle.with_current(|filter| filter.to_string())?;
        directive.parse()
    }

    pub fn set_level(&self, level: LogLevel) -> Result<(), LoggerError> {
        self.handle.reload(EnvFilter::new(level.as_str()))?;
        Ok(())
    }
}

/// Install the global subscriber: console output, or JSON in production mode.
pub fn init(config: &LogConfig) -> Result<LogLevelHandle, LoggerError> {
    let (filter, handle) = LogLevelHandle::layer(config.level);

    let json = config
        .production_mode
        .then(|| tfmt::layer().json());
    let console = (!config.production_mode).then(tfmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(console)
        .try_init()?;

    Ok(handle)
}
