//! Conversion entry points: direction dispatch and the configured service.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

use log::{debug, error};
use tidymark_core::{Preset, Settings, StyleConfig};

use crate::convert::emit_markdown;
use crate::html::parse_html;
use crate::links::rewrite_markdown_links;
use crate::markdown::markdown_to_html;
use crate::text::extract_text;
use crate::{Result, TidyError};

/// Which conversion to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionDirection {
    HtmlToMarkdown,
    MarkdownToHtml,
    HtmlToText,
    /// Normalize Markdown into the selected style
    MarkdownToMarkdown,
}

impl ConversionDirection {
    pub const ALL: [ConversionDirection; 4] = [
        ConversionDirection::HtmlToMarkdown,
        ConversionDirection::MarkdownToHtml,
        ConversionDirection::HtmlToText,
        ConversionDirection::MarkdownToMarkdown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConversionDirection::HtmlToMarkdown => "html-to-markdown",
            ConversionDirection::MarkdownToHtml => "markdown-to-html",
            ConversionDirection::HtmlToText => "html-to-text",
            ConversionDirection::MarkdownToMarkdown => "markdown-to-markdown",
        }
    }
}

impl fmt::Display for ConversionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConversionDirection {
    type Err = TidyError;

    /// Accepts the kebab-case names plus `md` and `_` spellings
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let normalized = normalized
            .replace("markdown", "md")
            .replace("text", "txt");
        match normalized.as_str() {
            "html-to-md" => Ok(ConversionDirection::HtmlToMarkdown),
            "md-to-html" => Ok(ConversionDirection::MarkdownToHtml),
            "html-to-txt" => Ok(ConversionDirection::HtmlToText),
            "md-to-md" => Ok(ConversionDirection::MarkdownToMarkdown),
            _ => Err(TidyError::UnknownDirection(s.to_string())),
        }
    }
}

/// Output of a conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionResult {
    pub output: String,
    /// How many link or image URLs tracking-parameter cleanup changed
    pub links_cleaned: usize,
}

/// Run one conversion.
///
/// Empty or whitespace-only input yields an empty result. Link cleanup only
/// applies to directions that produce or consume Markdown links; text
/// extraction never reports cleaned links.
///
/// # Example
///
/// ```rust
/// use tidymark::{convert, ConversionDirection, StyleConfig};
///
/// let result = convert(
///     "<p>See <a href=\"https://x.com/?utm_source=feed\">this</a></p>",
///     ConversionDirection::HtmlToMarkdown,
///     true,
///     &StyleConfig::default(),
/// )
/// .unwrap();
/// assert_eq!(result.output, "See [this](https://x.com/)");
/// assert_eq!(result.links_cleaned, 1);
/// ```
pub fn convert(
    input: &str,
    direction: ConversionDirection,
    clean_links: bool,
    style: &StyleConfig,
) -> Result<ConversionResult> {
    if input.trim().is_empty() {
        return Ok(ConversionResult::default());
    }

    debug!(
        "converting {} bytes {} (clean_links={})",
        input.len(),
        direction,
        clean_links
    );

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        dispatch(input, direction, clean_links, style)
    }))
    .map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown failure".to_string());
        error!("{} conversion failed: {}", direction, message);
        TidyError::Internal(message)
    })?;

    debug!(
        "{} produced {} bytes, {} links cleaned",
        direction,
        result.output.len(),
        result.links_cleaned
    );
    Ok(result)
}

fn dispatch(
    input: &str,
    direction: ConversionDirection,
    clean_links: bool,
    style: &StyleConfig,
) -> ConversionResult {
    match direction {
        ConversionDirection::HtmlToMarkdown => {
            let emitted = emit_markdown(&parse_html(input), style, clean_links);
            ConversionResult {
                output: emitted.markdown,
                links_cleaned: emitted.links_cleaned,
            }
        }

        ConversionDirection::MarkdownToHtml => {
            let (markdown, links_cleaned) = if clean_links {
                rewrite_markdown_links(input)
            } else {
                (input.to_string(), 0)
            };
            ConversionResult {
                output: markdown_to_html(&markdown),
                links_cleaned,
            }
        }

        ConversionDirection::HtmlToText => ConversionResult {
            output: extract_text(&parse_html(input)),
            links_cleaned: 0,
        },

        ConversionDirection::MarkdownToMarkdown => {
            let html = markdown_to_html(input);
            let emitted = emit_markdown(&parse_html(&html), style, clean_links);
            ConversionResult {
                output: emitted.markdown,
                links_cleaned: emitted.links_cleaned,
            }
        }
    }
}

/// A reusable converter holding style settings and the link-cleanup switch.
#[derive(Debug, Clone)]
pub struct TidyService {
    settings: Settings,
    clean_links: bool,
}

impl TidyService {
    /// Create a service with the default preset and link cleanup enabled
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            clean_links: true,
        }
    }

    pub fn with_preset(preset: Preset) -> Self {
        Self::with_settings(Settings::new(preset))
    }

    /// Enable or disable tracking-parameter cleanup
    pub fn clean_links(mut self, enabled: bool) -> Self {
        self.clean_links = enabled;
        self
    }

    /// Get the current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable access to settings
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Set one style option by name, e.g. `("bullet", "*")`
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        self.settings.set(key, value)?;
        Ok(())
    }

    pub fn convert(&self, input: &str, direction: ConversionDirection) -> Result<ConversionResult> {
        convert(input, direction, self.clean_links, self.settings.style())
    }

    /// Convert an HTML string to Markdown
    pub fn html_to_markdown(&self, html: &str) -> Result<String> {
        Ok(self.convert(html, ConversionDirection::HtmlToMarkdown)?.output)
    }

    pub fn markdown_to_html(&self, markdown: &str) -> Result<String> {
        Ok(self.convert(markdown, ConversionDirection::MarkdownToHtml)?.output)
    }

    pub fn html_to_text(&self, html: &str) -> Result<String> {
        Ok(self.convert(html, ConversionDirection::HtmlToText)?.output)
    }

    /// Reformat Markdown into the configured style
    pub fn reformat(&self, markdown: &str) -> Result<String> {
        Ok(self.convert(markdown, ConversionDirection::MarkdownToMarkdown)?.output)
    }
}

impl Default for TidyService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidymark_core::{ConfigError, HeadingStyle};

    #[test]
    fn test_direction_from_str() {
        assert_eq!(
            "html-to-markdown".parse::<ConversionDirection>().unwrap(),
            ConversionDirection::HtmlToMarkdown
        );
        assert_eq!(
            "MD_TO_HTML".parse::<ConversionDirection>().unwrap(),
            ConversionDirection::MarkdownToHtml
        );
        assert_eq!(
            "html-to-text".parse::<ConversionDirection>().unwrap(),
            ConversionDirection::HtmlToText
        );
        for direction in ConversionDirection::ALL {
            assert_eq!(direction.to_string().parse::<ConversionDirection>().unwrap(), direction);
        }
        assert!(matches!(
            "pdf-to-html".parse::<ConversionDirection>(),
            Err(TidyError::UnknownDirection(_))
        ));
    }

    #[test]
    fn test_empty_input() {
        for direction in ConversionDirection::ALL {
            let result = convert("  \n\t ", direction, true, &StyleConfig::default()).unwrap();
            assert_eq!(result, ConversionResult::default());
        }
    }

    #[test]
    fn test_html_to_markdown() {
        let service = TidyService::new();
        let result = service
            .html_to_markdown("<h1>Title</h1><p>Hello <em>World</em></p>")
            .unwrap();
        assert_eq!(result, "# Title\n\nHello _World_");
    }

    #[test]
    fn test_markdown_to_html_cleans_links() {
        let result = convert(
            "[a](https://x.com/?fbclid=1)",
            ConversionDirection::MarkdownToHtml,
            true,
            &StyleConfig::default(),
        )
        .unwrap();
        assert_eq!(result.output, "<p><a href=\"https://x.com/\">a</a></p>\n");
        assert_eq!(result.links_cleaned, 1);
    }

    #[test]
    fn test_html_to_text_reports_no_links() {
        let result = convert(
            "<p><a href=\"https://x.com/?utm_source=a\">a</a></p><p>b</p>",
            ConversionDirection::HtmlToText,
            true,
            &StyleConfig::default(),
        )
        .unwrap();
        assert_eq!(result.output, "a\nb");
        assert_eq!(result.links_cleaned, 0);
    }

    #[test]
    fn test_reformat_with_preset() {
        let service = TidyService::with_preset(Preset::Reddit);
        let result = service.reformat("# Title\n\n+ one\n+ two").unwrap();
        assert_eq!(result, "# Title\n\n* one\n* two");
    }

    #[test]
    fn test_set_option() {
        let mut service = TidyService::new().clean_links(false);
        service.set_option("heading", "setext").unwrap();
        assert_eq!(service.settings().style().heading_style, HeadingStyle::Setext);
        assert_eq!(
            service.html_to_markdown("<h2>Sub</h2>").unwrap(),
            "Sub\n---"
        );

        let err = service.set_option("heading", "fancy").unwrap_err();
        assert!(matches!(
            err,
            TidyError::Config(ConfigError::UnsupportedOption { .. })
        ));
    }

    #[test]
    fn test_clean_links_switch() {
        let html = "<a href=\"https://x.com/?utm_source=a\">x</a>";
        let kept = TidyService::new().clean_links(false).convert(html, ConversionDirection::HtmlToMarkdown).unwrap();
        assert_eq!(kept.output, "[x](https://x.com/?utm_source=a)");
        assert_eq!(kept.links_cleaned, 0);
    }
}
