//! Source location for rendered Markdown selections.
//!
//! A reader selects prose in a rendered view of a Markdown document. The
//! rendering has stripped headings, list markers, emphasis, links, inline
//! HTML, front matter and import directives, so the selected text rarely
//! appears verbatim in the source. This crate finds the source lines that
//! produced it.
//!
//! Everything here is pure and stateless: callers pass a fresh
//! [`SourceDocument`] snapshot on every call, and concurrent calls are
//! always safe.
//!
//! # Usage
//!
//! ```rust
//! use quarto_redline_matcher::{SourceDocument, locate, locate_section};
//!
//! let doc = SourceDocument::new("post.md", "## Intro\n\nHello **world**.\n");
//!
//! let selection = locate(&doc, "Hello world.").unwrap();
//! assert_eq!(selection.start_line, 3);
//!
//! let section = locate_section(&doc, "Intro", 2).unwrap();
//! assert_eq!(section.end_line, 3);
//! ```

pub mod document;
pub mod locate;
pub mod normalize;
pub mod section;
pub mod types;

mod scan;

pub use document::SourceDocument;
pub use locate::{Projection, locate, locate_in_file};
pub use normalize::{normalize_whitespace, strip_markup};
pub use section::{headings, locate_section};
pub use types::{HeadingBoundary, MatchResult, ProjectionEntry};
