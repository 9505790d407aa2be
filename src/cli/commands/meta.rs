//! `meta` command: print decoded page metadata.

use crate::cli::args::{MetaArgs, MetaFormat};
use crate::config::Settings;
use crate::error::StoryPagesError;
use crate::page::meta;

/// Prints the metadata of a page in the requested format.
///
/// # Errors
///
/// Returns an error if the page cannot be opened or its front matter does
/// not decode.
pub fn run(args: &MetaArgs, settings: &Settings) -> Result<(), StoryPagesError> {
    let page = super::open_page(&args.page, settings)?;
    let metadata = page.meta()?;

    match args.format {
        MetaFormat::Yaml => print!("{}", meta::encode(&metadata)?),
        MetaFormat::Json => println!("{}", serde_json::to_string_pretty(&metadata)?),
    }
    Ok(())
}
