//! CLI argument definitions
//!
//! All Clap derive structs for `storypages` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Render narrative game pages from front matter and templated markdown.
#[derive(Parser, Debug)]
#[command(name = "storypages", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a YAML settings file.
    #[arg(long, global = true, env = "STORYPAGES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "STORYPAGES_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "STORYPAGES_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a page for a player.
    Render(RenderArgs),

    /// Print the decoded metadata of a page.
    Meta(MetaArgs),

    /// Check that pages parse, decode and render.
    Validate(ValidateArgs),
}

/// Arguments for `render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Page name (resolved in the pages directory) or path to a document.
    pub page: String,

    /// Player name bound to `.Name`.
    #[arg(short, long, default_value = "", env = "STORYPAGES_PLAYER_NAME")]
    pub name: String,

    /// Objects in use, as `key=value; key2=value2`. Order matters.
    #[arg(short = 'u', long = "use", default_value = "")]
    pub use_objects: String,

    /// Output format.
    #[arg(long, default_value = "html")]
    pub format: RenderFormat,
}

/// Arguments for `meta`.
#[derive(Args, Debug)]
pub struct MetaArgs {
    /// Page name (resolved in the pages directory) or path to a document.
    pub page: String,

    /// Output format.
    #[arg(long, default_value = "yaml")]
    pub format: MetaFormat,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Page names or document paths to check.
    #[arg(required = true, num_args = 1..)]
    pub pages: Vec<String>,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for `render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RenderFormat {
    /// The rendered HTML body only.
    #[default]
    Html,
    /// The full page view as JSON.
    Json,
}

/// Output format for `meta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MetaFormat {
    /// YAML, as written in front matter.
    #[default]
    Yaml,
    /// JSON.
    Json,
}
