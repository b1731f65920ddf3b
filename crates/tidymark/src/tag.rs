//! Closed set of tag names the converters dispatch on.

/// An HTML tag name, classified by how the converters treat it.
/// Anything unlisted is [`Tag::Other`] and passes its children through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Paragraph,
    Heading(u8),
    Blockquote,
    UnorderedList,
    OrderedList,
    ListItem,
    Pre,
    Code,
    HorizontalRule,
    LineBreak,
    Table,
    TableSection,
    TableRow,
    HeaderCell,
    DataCell,
    Caption,
    Anchor,
    Image,
    Strong,
    Emphasis,
    /// Generic block containers (div, section, article, ...)
    Container,
    /// Elements whose subtree carries no convertible content
    Pruned,
    Other,
}

/// Block-level containers with no Markdown construct of their own
const CONTAINERS: &[&str] = &[
    "address", "article", "aside", "body", "center", "dd", "details", "dialog", "dir", "div",
    "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "header", "hgroup", "html",
    "main", "menu", "nav", "section", "summary",
];

/// Subtrees dropped before any conversion
pub const PRUNED: &[&str] = &["script", "style", "iframe", "noscript"];

impl Tag {
    pub fn from_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "p" => Tag::Paragraph,
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "blockquote" => Tag::Blockquote,
            "ul" => Tag::UnorderedList,
            "ol" => Tag::OrderedList,
            "li" => Tag::ListItem,
            "pre" => Tag::Pre,
            "code" | "kbd" | "samp" | "tt" => Tag::Code,
            "hr" => Tag::HorizontalRule,
            "br" => Tag::LineBreak,
            "table" => Tag::Table,
            "thead" | "tbody" | "tfoot" => Tag::TableSection,
            "tr" => Tag::TableRow,
            "th" => Tag::HeaderCell,
            "td" => Tag::DataCell,
            "caption" => Tag::Caption,
            "a" => Tag::Anchor,
            "img" => Tag::Image,
            "strong" | "b" => Tag::Strong,
            "em" | "i" => Tag::Emphasis,
            other if PRUNED.contains(&other) => Tag::Pruned,
            other if CONTAINERS.contains(&other) => Tag::Container,
            _ => Tag::Other,
        }
    }

    /// Whether the element forces a paragraph break around itself
    pub fn is_block(self) -> bool {
        !matches!(
            self,
            Tag::Code
                | Tag::LineBreak
                | Tag::Anchor
                | Tag::Image
                | Tag::Strong
                | Tag::Emphasis
                | Tag::Other
        )
    }

    /// Whether plain-text extraction ends a line after this element
    pub fn ends_line(self) -> bool {
        self.is_block() && !matches!(self, Tag::HeaderCell | Tag::DataCell | Tag::Pruned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Tag::from_name("H3"), Tag::Heading(3));
        assert_eq!(Tag::from_name("b"), Tag::Strong);
        assert_eq!(Tag::from_name("section"), Tag::Container);
        assert_eq!(Tag::from_name("noscript"), Tag::Pruned);
        assert_eq!(Tag::from_name("span"), Tag::Other);
    }

    #[test]
    fn test_is_block() {
        assert!(Tag::from_name("div").is_block());
        assert!(Tag::from_name("p").is_block());
        assert!(Tag::from_name("tr").is_block());
        assert!(!Tag::from_name("span").is_block());
        assert!(!Tag::from_name("a").is_block());
    }

    #[test]
    fn test_ends_line() {
        assert!(Tag::from_name("li").ends_line());
        assert!(!Tag::from_name("td").ends_line());
        assert!(!Tag::from_name("em").ends_line());
    }
}
