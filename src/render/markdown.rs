//! Markdown to HTML conversion.

use pulldown_cmark::{Options, Parser, html};
use serde::Deserialize;

use crate::error::PageError;

/// Markdown extensions enabled on top of `CommonMark`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct MarkdownOptions {
    /// Pipe tables.
    pub tables: bool,
    /// `~~strikethrough~~`.
    pub strikethrough: bool,
    /// `[^1]` footnotes.
    pub footnotes: bool,
    /// `# Heading {#id .class}` attributes.
    pub heading_attributes: bool,
    /// Curly quotes, en and em dashes, ellipses.
    pub smart_punctuation: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            footnotes: true,
            heading_attributes: true,
            smart_punctuation: false,
        }
    }
}

impl MarkdownOptions {
    fn to_parser_options(self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options.set(Options::ENABLE_HEADING_ATTRIBUTES, self.heading_attributes);
        options.set(Options::ENABLE_SMART_PUNCTUATION, self.smart_punctuation);
        options
    }
}

/// Converts markdown source to HTML. Raw HTML passes through unchanged.
///
/// # Errors
///
/// Returns [`PageError::Render`] if the HTML writer fails.
pub fn to_html(source: &str, options: MarkdownOptions) -> Result<String, PageError> {
    let parser = Parser::new_ext(source, options.to_parser_options());
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::write_html_fmt(&mut out, parser).map_err(|e| PageError::Render(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> String {
        to_html(source, MarkdownOptions::default()).unwrap()
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(render("You see a vault."), "<p>You see a vault.</p>\n");
    }

    #[test]
    fn test_heading_and_emphasis() {
        let html = render("# Vault\n\nIt is *very* **old**.");
        assert!(html.contains("<h1>Vault</h1>"));
        assert!(html.contains("<em>very</em>"));
        assert!(html.contains("<strong>old</strong>"));
    }

    #[test]
    fn test_lists_links_and_quotes() {
        let html = render("- one\n- two\n\n[door](/freedom/)\n\n> locked");
        assert!(html.contains("<ul>\n<li>one</li>\n<li>two</li>\n</ul>"));
        assert!(html.contains("<a href=\"/freedom/\">door</a>"));
        assert!(html.contains("<blockquote>"));
    }

    #[test]
    fn test_code() {
        let html = render("Use `key`.\n\n```\nopen()\n```\n");
        assert!(html.contains("<code>key</code>"));
        assert!(html.contains("<pre><code>open()\n</code></pre>"));
    }

    #[test]
    fn test_raw_html_passthrough() {
        let html = render("<div class=\"note\">hi</div>\n");
        assert!(html.contains("<div class=\"note\">hi</div>"));
    }

    #[test]
    fn test_extensions_toggle() {
        let source = "~~gone~~";
        assert!(render(source).contains("<del>gone</del>"));

        let plain = MarkdownOptions {
            strikethrough: false,
            ..MarkdownOptions::default()
        };
        assert!(!to_html(source, plain).unwrap().contains("<del>"));
    }

    #[test]
    fn test_tables() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }
}
