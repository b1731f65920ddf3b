//! Markdown to HTML.
//!
//! A CommonMark-flavoured parser with GFM tables, producing the same AST the
//! HTML converter emits from, plus an HTML renderer for that AST. Entity
//! references in Markdown text are not decoded; they render literally.

mod block;
mod inline;
mod render;

pub use block::{parse_markdown, MAX_NESTING};
pub use render::render_html;

/// Parse Markdown and render it as an HTML fragment.
///
/// # Example
///
/// ```rust
/// use tidymark::markdown::markdown_to_html;
///
/// assert_eq!(
///     markdown_to_html("Some **bold** text"),
///     "<p>Some <strong>bold</strong> text</p>\n"
/// );
/// ```
pub fn markdown_to_html(markdown: &str) -> String {
    render_html(&parse_markdown(markdown))
}
