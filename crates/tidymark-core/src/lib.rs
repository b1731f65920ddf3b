//! tidymark-core - Markdown AST, style presets and serialization
//!
//! This crate provides the data structures shared by every tidymark
//! pipeline. HTML trees are converted into the AST and serialized to
//! Markdown here; Markdown is parsed into the same AST before it is
//! rendered as HTML.
//!
//! # Architecture
//!
//! ```text
//! HTML tree ──convert──▶ ┌──────────────┐ ──serialize──▶ Markdown String
//!                        │ Markdown AST │
//! Markdown ───parse────▶ └──────────────┘ ──render─────▶ HTML String
//! ```
//!
//! # Example
//!
//! ```rust
//! use tidymark_core::{Block, Inline, Preset, serialize};
//!
//! let ast = Block::Document(vec![
//!     Block::Heading {
//!         level: 1,
//!         content: vec![Inline::Text("Hello World".to_string())],
//!     },
//!     Block::Paragraph(vec![
//!         Inline::Text("This is ".to_string()),
//!         Inline::Strong(vec![Inline::Text("bold".to_string())]),
//!         Inline::Text(" text.".to_string()),
//!     ]),
//! ]);
//!
//! let markdown = serialize(&ast, &Preset::Slack.style());
//! assert_eq!(markdown, "*Hello World*\n\nThis is *bold* text.");
//! ```

mod ast;
mod options;
mod serialize;

pub use ast::{inlines_are_blank, inlines_plain_text, Alignment, Block, Inline, ListItem};
pub use options::{
    BulletMarker, CodeBlockStyle, EmDelimiter, HeadingStyle, LinkStyle, Preset, Settings,
    StrongDelimiter, StyleConfig,
};
pub use serialize::{escape_line_starts, escape_text, serialize};

/// Error type for style configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported value {value:?} for option {option}")]
    UnsupportedOption { option: &'static str, value: String },

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

impl ConfigError {
    pub(crate) fn unsupported(option: &'static str, value: &str) -> Self {
        ConfigError::UnsupportedOption {
            option,
            value: value.to_string(),
        }
    }
}
