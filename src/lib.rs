//! `storypages`: page rendering for a narrative web game
//!
//! A page document is a fenced YAML front matter block followed by a
//! templated markdown body. The body is rendered per player: `.Name` is the
//! player's name and `.Locked` tells whether they hold the objects the page
//! requires.
//!
//! ```
//! use storypages::lock::LockRule;
//! use storypages::page::{Page, PageRequest, build_view};
//!
//! let source = "```\ntitle: Vault\nrequired:\n  - name: key\n    value: gold\n```\n\
//!               {{if .Locked}}Locked.{{else}}Open, {{.Name}}.{{end}}\n";
//! let page = Page::from_reader(source.as_bytes()).unwrap();
//!
//! let request = PageRequest::from_header("Alex", "key=gold");
//! let view = build_view(&page, &request, LockRule::default()).unwrap();
//! assert_eq!(view.text, "<p>Open, Alex.</p>\n");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod object;
pub mod observability;
pub mod page;
pub mod render;
