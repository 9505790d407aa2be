//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod meta;
pub mod render;
pub mod validate;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::{ConfigError, StoryPagesError};
use crate::page::Page;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded or the command fails.
pub fn dispatch(cli: Cli) -> Result<(), StoryPagesError> {
    let settings = Settings::load(cli.config.as_deref())?;
    tracing::debug!(
        pages_dir = %settings.pages_dir.display(),
        lock_rule = ?settings.lock_rule,
        "settings loaded"
    );

    match cli.command {
        Commands::Render(args) => render::run(&args, &settings),
        Commands::Meta(args) => meta::run(&args, &settings),
        Commands::Validate(args) => validate::run(&args, &settings),
    }
}

/// Resolves a page argument, enforces the size limit and parses the document.
///
/// # Errors
///
/// Returns a config error for bad page names or oversized documents, an I/O
/// error if the document cannot be opened, and a page error if it does not
/// parse.
pub(crate) fn open_page(page: &str, settings: &Settings) -> Result<Page, StoryPagesError> {
    let path = settings.resolve_page(page)?;
    let file = open_file(&path)?;
    let limit = settings.limits.max_page_size;

    // Metadata is only a hint: pipes and device files report 0.
    let size = file.metadata()?.len();
    if size > limit {
        return Err(ConfigError::PageTooLarge { path, size, limit }.into());
    }

    let source = read_limited(file, &path, limit)?;
    tracing::info!(page = %path.display(), size = source.len(), "parsing page");

    let mut parsed = Page::with_markdown(settings.markdown);
    parsed.parse(source.as_slice())?;
    Ok(parsed)
}

/// Reads at most `limit` bytes, failing if the source holds more.
fn read_limited<R: Read>(reader: R, path: &Path, limit: u64) -> Result<Vec<u8>, StoryPagesError> {
    let mut source = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut source)?;

    let size = source.len() as u64;
    if size > limit {
        return Err(ConfigError::PageTooLarge {
            path: path.to_path_buf(),
            size,
            limit,
        }
        .into());
    }
    Ok(source)
}

fn open_file(path: &Path) -> Result<File, StoryPagesError> {
    File::open(path).map_err(|e| {
        StoryPagesError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {e}", path.display()),
        ))
    })
}
