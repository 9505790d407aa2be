//! Subscriber setup for the `storypages` binary.
//!
//! Logs go to stderr so that `render` and `meta` output on stdout stays
//! clean enough to pipe. The level comes from `-v` flags unless
//! `STORYPAGES_LOG_LEVEL` holds a valid filter directive such as
//! `storypages::lock=debug`.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable overriding the verbosity flags.
pub const LOG_LEVEL_ENV: &str = "STORYPAGES_LOG_LEVEL";

/// How log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// One readable line per event.
    #[default]
    Human,
    /// One JSON object per event.
    Json,
}

/// Level for a count of `-v` flags: none is `warn`, three or more `trace`.
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Builds the filter, preferring a parseable override over the verbosity.
fn build_filter(verbosity: u8, override_directive: Option<&str>) -> EnvFilter {
    override_directive
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity_to_directive(verbosity)))
}

const fn use_ansi(color: ColorChoice, stderr_is_terminal: bool, no_color: bool) -> bool {
    match color {
        ColorChoice::Auto => stderr_is_terminal && !no_color,
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    }
}

/// Installs the global subscriber. Later calls leave the first one in place.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let override_directive = std::env::var(LOG_LEVEL_ENV).ok();
    let filter = build_filter(verbosity, override_directive.as_deref());
    let show_target = verbosity >= 2;

    let result = match format {
        LogFormat::Human => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(use_ansi(
                color,
                std::io::stderr().is_terminal(),
                std::env::var_os("NO_COLOR").is_some(),
            ))
            .with_target(show_target)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(show_target)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("log subscriber already installed");
    }
}
