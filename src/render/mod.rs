//! Content rendering: template substitution, then markdown to HTML.
//!
//! Template actions are resolved against the raw markdown before it is
//! parsed, so a `{{if .Locked}}` block can hide or reveal whole markdown
//! blocks.

pub mod markdown;
pub mod template;

pub use markdown::MarkdownOptions;

use crate::error::{PageError, TemplateError};

/// Per-request values bound into a page body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Player name, exposed as `.Name`.
    pub name: String,
    /// Lock state, exposed as `.Locked`.
    pub locked: bool,
}

impl RenderContext {
    /// Creates a render context.
    pub fn new(name: impl Into<String>, locked: bool) -> Self {
        Self {
            name: name.into(),
            locked,
        }
    }
}

/// Renders a page body to HTML.
///
/// # Errors
///
/// - [`PageError::Template`] if the body is not UTF-8 or its template fails
///   to parse or execute.
/// - [`PageError::Render`] if the markdown transform fails.
pub fn render(
    body: &[u8],
    ctx: &RenderContext,
    options: MarkdownOptions,
) -> Result<String, PageError> {
    let source = std::str::from_utf8(body).map_err(|e| {
        let line = 1 + body[..e.valid_up_to()].iter().filter(|&&b| b == b'\n').count();
        TemplateError::new(line, format!("body is not valid UTF-8: {e}"))
    })?;

    let markdown = template::execute(source, ctx)?;
    tracing::trace!(
        source_bytes = source.len(),
        markdown_bytes = markdown.len(),
        "executed body template"
    );

    let html = markdown::to_html(&markdown, options)?;
    tracing::trace!(html_bytes = html.len(), "rendered markdown");

    Ok(html)
}
