//! Error types for `storypages`
//!
//! The page pipeline reports [`PageError`]; the binary wraps it together
//! with configuration and I/O failures in [`StoryPagesError`], which also
//! owns the exit-code mapping.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `storypages` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid settings file, bad page name)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Page pipeline error (malformed document, template or metadata failure)
    pub const PAGE_ERROR: i32 = 4;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `storypages` operations.
#[derive(Debug, Error)]
pub enum StoryPagesError {
    /// Page pipeline error
    #[error(transparent)]
    Page(#[from] PageError),

    /// Settings loading or page lookup error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// One or more documents failed validation
    #[error("{count} page(s) failed validation")]
    ValidationFailed {
        /// Number of pages that failed.
        count: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl StoryPagesError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Page(PageError::Io(_)) | Self::Io(_) => ExitCode::IO_ERROR,
            Self::Page(_) | Self::ValidationFailed { .. } => ExitCode::PAGE_ERROR,
            Self::Json(_) | Self::Yaml(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Page Pipeline Errors
// ============================================================================

/// Failures of the page content pipeline.
///
/// Every variant is deterministic for a given input: retrying with the
/// same document cannot succeed.
#[derive(Debug, Error)]
pub enum PageError {
    /// The document does not start with the front matter delimiter.
    #[error("no opening front matter delimiter found: {} instead", String::from_utf8_lossy(.found))]
    MalformedDocument {
        /// The bytes actually read where the delimiter was expected.
        found: Vec<u8>,
    },

    /// The stream ended before the closing delimiter.
    #[error("did not find closing front matter delimiter")]
    UnterminatedFrontMatter,

    /// The front matter is not valid page metadata.
    #[error("invalid page metadata: {0}")]
    MetadataDecode(#[source] serde_yaml::Error),

    /// The body template failed to parse or execute.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The markdown transform failed.
    #[error("failed to render markdown: {0}")]
    Render(String),

    /// A page method was called before a successful `parse`.
    #[error("page used before a successful parse")]
    NotParsed,

    /// Reading the source stream failed.
    #[error("failed to read page source: {0}")]
    Io(#[from] std::io::Error),
}

impl PageError {
    /// Returns `true` when the error stems from the document content.
    ///
    /// Callers serving pages over HTTP answer these with a 400-class status.
    /// `NotParsed` is a caller bug and `Io` a source failure, so both are
    /// excluded.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::NotParsed | Self::Io(_))
    }
}

/// A body template syntax or execution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("template: content:{line}: {message}")]
pub struct TemplateError {
    /// 1-based line in the body where the failing action starts.
    pub line: usize,
    /// Description of the failure.
    pub message: String,
}

impl TemplateError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Settings loading and page lookup errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    Parse {
        /// Path to the settings file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Settings file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path to the settings file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Page name contains characters outside the allowed set
    #[error("invalid page name '{name}': expected ASCII letters, digits, '-' or '_'")]
    InvalidPageName {
        /// The rejected page name
        name: String,
    },

    /// Page document exceeds the configured size limit
    #[error("page {path} is {size} bytes, exceeding the {limit} byte limit")]
    PageTooLarge {
        /// Path to the page document
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },
}
