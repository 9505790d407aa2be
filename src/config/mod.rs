//! Settings for serving pages
//!
//! Settings come from an optional YAML file. Every field has a default, so
//! an absent file or an empty one yields a working configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::lock::LockRule;
use crate::render::MarkdownOptions;

/// Default maximum page document size (1 MiB).
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 1024 * 1024;

/// Extension of page documents inside the pages directory.
pub const PAGE_EXTENSION: &str = "md";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding `<name>.md` page documents.
    pub pages_dir: PathBuf,

    /// Rule deciding the lock state of pages with requirements.
    pub lock_rule: LockRule,

    /// Markdown extensions.
    pub markdown: MarkdownOptions,

    /// Resource limits.
    pub limits: PageLimits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pages_dir: PathBuf::from("pages"),
            lock_rule: LockRule::default(),
            markdown: MarkdownOptions::default(),
            limits: PageLimits::default(),
        }
    }
}

/// Limits applied before a document is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageLimits {
    /// Maximum document size in bytes.
    pub max_page_size: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            max_page_size: env_or("STORYPAGES_MAX_PAGE_SIZE", DEFAULT_MAX_PAGE_SIZE),
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or returns defaults when `path` is `None`.
    ///
    /// Defaults are validated like file content, since environment overrides
    /// feed into them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] or [`ConfigError::InvalidValue`] if its content
    /// (or an environment override) is not valid settings.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            let settings = Self::default();
            settings.validate()?;
            return Ok(settings);
        };

        tracing::debug!(path = %path.display(), "loading settings");
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content, path)
    }

    /// Parses settings from YAML text. `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid YAML or unknown keys and
    /// [`ConfigError::InvalidValue`] for out-of-range values.
    pub fn from_yaml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let settings: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.max_page_size".to_string(),
                value: "0".to_string(),
                expected: "a positive number of bytes".to_string(),
            });
        }
        Ok(())
    }

    /// Resolves a page argument to a document path.
    ///
    /// An argument naming an existing file is used as-is. Anything else is
    /// treated as a page name and mapped to `<pages_dir>/<name>.md`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPageName`] if a page name contains
    /// anything other than ASCII letters, digits, `-` or `_`.
    pub fn resolve_page(&self, page: &str) -> Result<PathBuf, ConfigError> {
        let as_path = Path::new(page);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }

        validate_page_name(page)?;
        Ok(self.pages_dir.join(format!("{page}.{PAGE_EXTENSION}")))
    }
}

/// Checks that a page name cannot escape the pages directory.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPageName`] for empty names and names with
/// characters outside `[A-Za-z0-9_-]`.
pub fn validate_page_name(name: &str) -> Result<(), ConfigError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidPageName {
            name: name.to_string(),
        })
    }
}

/// Reads an environment variable and parses it, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
