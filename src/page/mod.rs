//! Page documents: parse once, then query metadata and render content.
//!
//! ```
//! use storypages::page::Page;
//!
//! let source = "```\ntitle: Vault\n```\nHello {{.Name}}.\n";
//! let page = Page::from_reader(source.as_bytes()).unwrap();
//!
//! assert_eq!(page.meta().unwrap().title, "Vault");
//! assert_eq!(page.content("Alex", false).unwrap(), "<p>Hello Alex.</p>\n");
//! ```

pub mod frontmatter;
pub mod meta;
pub mod view;

pub use frontmatter::RawDocument;
pub use meta::PageMetadata;
pub use view::{PageRequest, PageView, build_view};

use std::io::{BufReader, Read};

use crate::error::PageError;
use crate::render::{self, MarkdownOptions, RenderContext};

/// A parsed page document.
///
/// `parse` mutates the page; everything else only reads it. A page belongs
/// to one request at a time.
#[derive(Debug, Clone, Default)]
pub struct Page {
    document: Option<RawDocument>,
    markdown: MarkdownOptions,
}

impl Page {
    /// Creates an unparsed page with default markdown options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unparsed page rendering with the given markdown options.
    #[must_use]
    pub fn with_markdown(markdown: MarkdownOptions) -> Self {
        Self {
            document: None,
            markdown,
        }
    }

    /// Creates a page and parses `reader` into it.
    ///
    /// # Errors
    ///
    /// See [`Page::parse`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PageError> {
        let mut page = Self::new();
        page.parse(reader)?;
        Ok(page)
    }

    /// Splits a document into front matter and body, replacing any earlier
    /// parse. A failed parse leaves the page unparsed.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::MalformedDocument`],
    /// [`PageError::UnterminatedFrontMatter`] or [`PageError::Io`].
    pub fn parse<R: Read>(&mut self, reader: R) -> Result<(), PageError> {
        self.document = None;
        self.document = Some(frontmatter::split(BufReader::new(reader))?);
        Ok(())
    }

    /// Returns `true` once a parse has succeeded.
    #[must_use]
    pub const fn is_parsed(&self) -> bool {
        self.document.is_some()
    }

    /// Decodes the page metadata. Repeated calls return equal results.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotParsed`] before a successful parse and
    /// [`PageError::MetadataDecode`] for invalid front matter.
    pub fn meta(&self) -> Result<PageMetadata, PageError> {
        meta::decode(&self.document()?.front_matter)
    }

    /// Renders the page body for a player.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotParsed`] before a successful parse, otherwise
    /// the template or render error of the body.
    pub fn content(&self, name: &str, locked: bool) -> Result<String, PageError> {
        let ctx = RenderContext::new(name, locked);
        render::render(&self.document()?.body, &ctx, self.markdown)
    }

    fn document(&self) -> Result<&RawDocument, PageError> {
        self.document.as_ref().ok_or(PageError::NotParsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "```\nicon: fa-question\ntitle: Example\n```\n# Hi {{.Name}}\n";

    #[test]
    fn test_unparsed_page_fails_fast() {
        let page = Page::new();
        assert!(!page.is_parsed());
        assert!(matches!(page.meta(), Err(PageError::NotParsed)));
        assert!(matches!(page.content("Alex", false), Err(PageError::NotParsed)));
    }

    #[test]
    fn test_parse_meta_content() {
        let page = Page::from_reader(EXAMPLE.as_bytes()).unwrap();
        assert!(page.is_parsed());
        let meta = page.meta().unwrap();
        assert_eq!(meta.icon, "fa-question");
        assert_eq!(meta.title, "Example");
        assert_eq!(page.content("Alex", false).unwrap(), "<h1>Hi Alex</h1>\n");
    }

    #[test]
    fn test_content_is_deterministic() {
        let page = Page::from_reader(EXAMPLE.as_bytes()).unwrap();
        assert_eq!(
            page.content("Alex", true).unwrap(),
            page.content("Alex", true).unwrap()
        );
        assert_eq!(page.meta().unwrap(), page.meta().unwrap());
    }

    #[test]
    fn test_reparse_replaces_state() {
        let mut page = Page::from_reader(EXAMPLE.as_bytes()).unwrap();
        page.parse("```\ntitle: Other\n```\nbody".as_bytes()).unwrap();
        assert_eq!(page.meta().unwrap().title, "Other");
        assert_eq!(page.content("", false).unwrap(), "<p>body</p>\n");
    }

    #[test]
    fn test_failed_reparse_leaves_page_unparsed() {
        let mut page = Page::from_reader(EXAMPLE.as_bytes()).unwrap();
        let err = page.parse("no delimiter".as_bytes()).unwrap_err();
        assert!(matches!(err, PageError::MalformedDocument { .. }));
        assert!(!page.is_parsed());
        assert!(matches!(page.meta(), Err(PageError::NotParsed)));
    }

    #[test]
    fn test_metadata_error_does_not_poison_content() {
        let page = Page::from_reader("```\ntitle: [\n```\nstill renders".as_bytes()).unwrap();
        assert!(matches!(page.meta(), Err(PageError::MetadataDecode(_))));
        assert_eq!(page.content("", false).unwrap(), "<p>still renders</p>\n");
    }

    #[test]
    fn test_markdown_options_apply() {
        let plain = MarkdownOptions {
            strikethrough: false,
            ..MarkdownOptions::default()
        };
        let mut page = Page::with_markdown(plain);
        page.parse("```\n```\n~~x~~".as_bytes()).unwrap();
        assert!(!page.content("", false).unwrap().contains("<del>"));
    }
}
