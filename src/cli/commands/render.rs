//! `render` command: run the page request flow for one player.

use crate::cli::args::{RenderArgs, RenderFormat};
use crate::config::Settings;
use crate::error::StoryPagesError;
use crate::page::{PageRequest, build_view};

/// Renders a page and prints the HTML body or the full view as JSON.
///
/// # Errors
///
/// Returns an error if the page cannot be opened, its metadata does not
/// decode, or its body fails to render.
pub fn run(args: &RenderArgs, settings: &Settings) -> Result<(), StoryPagesError> {
    let page = super::open_page(&args.page, settings)?;
    let request = PageRequest::from_header(args.name.as_str(), &args.use_objects);
    tracing::debug!(
        name = %request.name,
        used = request.used.len(),
        "rendering page"
    );

    let view = build_view(&page, &request, settings.lock_rule)?;

    match args.format {
        RenderFormat::Html => print!("{}", view.text),
        RenderFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }
    Ok(())
}
