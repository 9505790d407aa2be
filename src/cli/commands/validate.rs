//! `validate` command: dry-run pages through the whole pipeline.

use crate::cli::args::ValidateArgs;
use crate::config::Settings;
use crate::error::StoryPagesError;

/// Checks every page, reporting each failure and continuing.
///
/// A page passes when it parses, its metadata decodes, and its body renders
/// both locked and unlocked.
///
/// # Errors
///
/// Returns [`StoryPagesError::ValidationFailed`] if any page fails.
pub fn run(args: &ValidateArgs, settings: &Settings) -> Result<(), StoryPagesError> {
    let mut failed = 0;

    for page in &args.pages {
        tracing::info!(page = %page, "validating page");
        match check(page, settings) {
            Ok(()) => {
                tracing::info!(page = %page, "page valid");
                println!("ok: {page}");
            }
            Err(e) => {
                tracing::warn!(page = %page, error = %e, "page invalid");
                eprintln!("fail: {page}: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(StoryPagesError::ValidationFailed { count: failed });
    }
    Ok(())
}

fn check(page: &str, settings: &Settings) -> Result<(), StoryPagesError> {
    let parsed = super::open_page(page, settings)?;
    parsed.meta()?;
    for locked in [false, true] {
        parsed.content("", locked)?;
    }
    Ok(())
}
