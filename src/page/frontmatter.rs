//! Splits a raw page document into its front matter and body.
//!
//! A document opens with a line starting with three backticks. The front
//! matter runs until the next three-backtick sequence; everything after it
//! is the body, kept verbatim. The split is a single forward pass over a
//! [`BufRead`] and never seeks.

use std::io::{BufRead, Read};

use crate::error::PageError;

/// The opening and closing front matter delimiter.
pub const DELIMITER: &[u8] = b"```";

/// A document split into its two segments. Never mutated after the split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocument {
    /// Bytes between the opening line and the closing delimiter.
    pub front_matter: Vec<u8>,
    /// Bytes after the closing delimiter, up to end of stream.
    pub body: Vec<u8>,
}

/// Splits `reader` into front matter and body.
///
/// # Errors
///
/// - [`PageError::MalformedDocument`] if the stream does not start with
///   [`DELIMITER`] (including streams shorter than it).
/// - [`PageError::UnterminatedFrontMatter`] if the stream ends before the
///   closing delimiter.
/// - [`PageError::Io`] if reading fails.
pub fn split<R: BufRead>(mut reader: R) -> Result<RawDocument, PageError> {
    let mut found = Vec::with_capacity(DELIMITER.len());
    reader
        .by_ref()
        .take(DELIMITER.len() as u64)
        .read_to_end(&mut found)?;

    if found != DELIMITER {
        return Err(PageError::MalformedDocument { found });
    }

    // The opening delimiter owns its whole line.
    let mut opening_line = Vec::new();
    reader.read_until(b'\n', &mut opening_line)?;

    let front_matter = read_until_delimiter(&mut reader, DELIMITER)?;

    let mut body = Vec::new();
    reader.read_to_end(&mut body)?;

    tracing::debug!(
        front_matter_bytes = front_matter.len(),
        body_bytes = body.len(),
        "split page document"
    );

    Ok(RawDocument { front_matter, body })
}

/// Accumulates bytes until `delim` appears as a suffix, returning them
/// without the delimiter.
fn read_until_delimiter<R: BufRead>(reader: &mut R, delim: &[u8]) -> Result<Vec<u8>, PageError> {
    let Some(&last) = delim.last() else {
        return Ok(Vec::new());
    };

    let mut accumulated = Vec::new();
    loop {
        let read = reader.read_until(last, &mut accumulated)?;
        if read == 0 {
            return Err(PageError::UnterminatedFrontMatter);
        }
        if accumulated.ends_with(delim) {
            accumulated.truncate(accumulated.len() - delim.len());
            return Ok(accumulated);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    fn split_str(input: &str) -> Result<RawDocument, PageError> {
        split(Cursor::new(input.as_bytes()))
    }

    #[test]
    fn test_basic_split() {
        let doc = split_str("```\ntitle: Vault\n```\nYou see a vault.\n").unwrap();
        assert_eq!(doc.front_matter, b"title: Vault\n");
        assert_eq!(doc.body, b"\nYou see a vault.\n");
    }

    #[test]
    fn test_opening_line_discarded_in_full() {
        let doc = split_str("```yaml ignored\nicon: fa-key\n```body").unwrap();
        assert_eq!(doc.front_matter, b"icon: fa-key\n");
        assert_eq!(doc.body, b"body");
    }

    #[test]
    fn test_closing_delimiter_without_newline_before_content() {
        let doc = split_str("```\ntitle: x```rest of line\nmore").unwrap();
        assert_eq!(doc.front_matter, b"title: x");
        assert_eq!(doc.body, b"rest of line\nmore");
    }

    #[test]
    fn test_single_backticks_kept_in_front_matter() {
        let doc = split_str("```\ntitle: `a` and ``b``\n```\n").unwrap();
        assert_eq!(doc.front_matter, b"title: `a` and ``b``\n");
    }

    #[test]
    fn test_empty_front_matter_and_body() {
        let doc = split_str("```\n```").unwrap();
        assert!(doc.front_matter.is_empty());
        assert!(doc.body.is_empty());
    }

    #[test]
    fn test_body_kept_verbatim() {
        let body = "\n# Title\n\n```rust\nfn main() {}\n```\n{{.Name}}\r\n";
        let doc = split_str(&format!("```\ntitle: t\n```{body}")).unwrap();
        assert_eq!(doc.body, body.as_bytes());
    }

    #[test]
    fn test_missing_opening_delimiter() {
        let err = split_str("---\ntitle: x\n---\n").unwrap_err();
        match err {
            PageError::MalformedDocument { found } => assert_eq!(found, b"---"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_document_is_malformed() {
        let err = split_str("``").unwrap_err();
        assert!(matches!(err, PageError::MalformedDocument { ref found } if found == b"``"));

        let err = split_str("").unwrap_err();
        assert!(matches!(err, PageError::MalformedDocument { ref found } if found.is_empty()));
    }

    #[test]
    fn test_unterminated_front_matter() {
        let err = split_str("```\ntitle: x\nicon: y\n").unwrap_err();
        assert!(matches!(err, PageError::UnterminatedFrontMatter));

        let err = split_str("```\ntitle: x``").unwrap_err();
        assert!(matches!(err, PageError::UnterminatedFrontMatter));

        let err = split_str("```").unwrap_err();
        assert!(matches!(err, PageError::UnterminatedFrontMatter));
    }

    #[test]
    fn test_small_buffer_reader() {
        let input = "```\nicon: fa-key\ntitle: Vault\n```\nbody text";
        let reader = BufReader::with_capacity(2, Cursor::new(input.as_bytes()));
        let doc = split(reader).unwrap();
        assert_eq!(doc.front_matter, b"icon: fa-key\ntitle: Vault\n");
        assert_eq!(doc.body, b"\nbody text");
    }
}
