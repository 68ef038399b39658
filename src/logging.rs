// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Logging setup for the CLI using `tracing` and `tracing-subscriber`.
//!
//! Output always goes to stderr; stdout carries the MCP stdio transport and `--summary`.
//!
//! # Levels
//!
//! - `error`: a settlement coordinator died
//! - `warn`: worker spawn failures, rounds that settled with failed workers
//! - `info`: diagram construction
//! - `debug`: every event, ignored events, settled rounds, invalidated selections
//! - `trace`: individual worker arrivals
//!
//! `BRUSHLINK_LOG` takes precedence over `RUST_LOG`; both take `EnvFilter` directives.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

pub const LOG_ENV: &str = "BRUSHLINK_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub with_ansi: bool,
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            with_ansi: true,
            with_target: false,
        }
    }
}

impl LogConfig {
    /// `-v` lifts the level to debug, `-vv` and beyond to trace.
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            with_target: verbosity > 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

/// Installs the global subscriber writing to stderr.
///
/// # Errors
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    init_logging_with_writer(config, std::io::stderr)
}

pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W) -> Result<(), TryInitError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .compact()
        .with_writer(writer)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target)
        .without_time();
    tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .try_init()
}

fn build_env_filter(level: Level) -> EnvFilter {
    let from_env = |var: &str| {
        std::env::var(var)
            .ok()
            .filter(|directives| !directives.trim().is_empty())
            .and_then(|directives| EnvFilter::try_new(directives).ok())
    };
    from_env(LOG_ENV)
        .or_else(|| from_env(EnvFilter::DEFAULT_ENV))
        .unwrap_or_else(|| EnvFilter::new(default_directives(level)))
}

/// Our crate at `level`, dependencies at warn.
fn default_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("warn,brushlink={level}")
}
