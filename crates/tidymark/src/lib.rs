//! # tidymark
//!
//! Convert between HTML, Markdown and plain text, stripping tracking
//! parameters from link URLs along the way.
//!
//! ## Design
//!
//! HTML is parsed into a small owned [`Node`] tree, converted into the
//! shared Markdown AST from `tidymark-core` and serialized in one of several
//! Markdown styles. Markdown is parsed into the same AST and rendered as HTML.
//! Markdown-to-Markdown normalization goes through HTML so both directions
//! agree on what a document means.
//!
//! ## Example
//!
//! ```rust
//! use tidymark::{ConversionDirection, TidyService};
//!
//! let service = TidyService::new();
//! let result = service
//!     .convert(
//!         "<h1>News</h1><p><a href=\"https://x.com/a?utm_source=feed&id=7\">read</a></p>",
//!         ConversionDirection::HtmlToMarkdown,
//!     )
//!     .unwrap();
//! assert_eq!(result.output, "# News\n\n[read](https://x.com/a?id=7)");
//! assert_eq!(result.links_cleaned, 1);
//! ```
//!
//! ## Example (URL cleanup only)
//!
//! ```rust
//! use tidymark::clean_url;
//!
//! assert_eq!(
//!     clean_url("https://shop.example/item?gclid=abc&color=red#top"),
//!     "https://shop.example/item?color=red#top"
//! );
//! ```

mod convert;
mod html;
mod links;
pub mod markdown;
mod node;
mod service;
mod tag;
mod text;
mod url_clean;

pub use convert::{emit_markdown, Converter, Emitted};
pub use html::{parse_html, MAX_DEPTH};
pub use links::rewrite_markdown_links;
pub use node::{Node, NodeType};
pub use service::{convert, ConversionDirection, ConversionResult, TidyService};
pub use tag::Tag;
pub use text::extract_text;
pub use url_clean::{clean_url, is_tracking_param, TRACKING_PREFIXES};

pub use tidymark_core::{
    serialize, Alignment, Block, BulletMarker, CodeBlockStyle, ConfigError, EmDelimiter,
    HeadingStyle, Inline, LinkStyle, ListItem, Preset, Settings, StrongDelimiter, StyleConfig,
};

/// Error type for tidymark operations
#[derive(Debug, thiserror::Error)]
pub enum TidyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Unknown conversion direction: {0}")]
    UnknownDirection(String),

    #[error("Conversion failed: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, TidyError>;
