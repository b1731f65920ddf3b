//! Markdown AST serialization
//!
//! Converts Markdown AST nodes into Markdown text.

use indexmap::IndexMap;

use crate::ast::{Alignment, Block, Inline, ListItem};
use crate::options::{
    CodeBlockStyle, EmDelimiter, HeadingStyle, LinkStyle, StrongDelimiter, StyleConfig,
};

/// Continuation indent for list item content
const LIST_INDENT: usize = 4;

/// Serialize a block to Markdown string
pub fn serialize(block: &Block, style: &StyleConfig) -> String {
    let mut serializer = Serializer {
        style,
        references: IndexMap::new(),
    };
    let mut output = serializer.serialize_block(block);

    if !serializer.references.is_empty() {
        if !output.is_empty() {
            output.push_str("\n\n");
        }
        let definitions: Vec<String> = serializer
            .references
            .iter()
            .map(|((url, title), number)| {
                format!("[{}]: {}{}", number, link_destination(url), title_part(title))
            })
            .collect();
        output.push_str(&definitions.join("\n"));
    }

    output
}

/// Inline rendering context
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    /// Delimiter character of the innermost enclosing emphasis or strong span
    enclosing: Option<char>,
    in_table: bool,
    in_heading: bool,
}

struct Serializer<'a> {
    style: &'a StyleConfig,
    /// Reference-style link targets in first-use order, numbered from 1
    references: IndexMap<(String, Option<String>), usize>,
}

impl Serializer<'_> {
    fn serialize_block(&mut self, block: &Block) -> String {
        match block {
            Block::Document(blocks) => self.serialize_blocks(blocks),

            Block::Heading { level, content } => self.serialize_heading(*level, content),

            Block::Paragraph(inlines) => {
                let text = self.serialize_inlines(inlines, Context::default());
                escape_line_starts(text.trim())
            }

            Block::BlockQuote(blocks) => {
                let content = self.serialize_blocks(blocks);
                content
                    .lines()
                    .map(|line| {
                        if line.is_empty() {
                            ">".to_string()
                        } else {
                            format!("> {}", line)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }

            Block::List {
                ordered,
                start,
                tight,
                items,
            } => self.serialize_list(*ordered, *start, *tight, items),

            Block::CodeBlock { language, code } => serialize_code_block(
                language.as_deref(),
                code,
                self.style.code_block_style,
            ),

            Block::ThematicBreak => "---".to_string(),

            Block::Table {
                header,
                alignments,
                rows,
            } => self.serialize_table(header.as_deref(), alignments, rows),
        }
    }

    fn serialize_blocks(&mut self, blocks: &[Block]) -> String {
        let mut parts = Vec::with_capacity(blocks.len());
        for block in blocks {
            if block.is_blank() {
                continue;
            }
            let text = self.serialize_block(block);
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join("\n\n")
    }

    fn serialize_heading(&mut self, level: u8, content: &[Inline]) -> String {
        if self.style.flatten_headings {
            let delimiter = self.style.strong_delimiter.as_str();
            let ctx = Context {
                enclosing: delimiter.chars().next(),
                in_heading: true,
                ..Context::default()
            };
            let text = self.serialize_inlines(content, ctx);
            return format!("{delimiter}{}{delimiter}", text.trim());
        }

        let ctx = Context {
            in_heading: true,
            ..Context::default()
        };
        let text = escape_line_starts(self.serialize_inlines(content, ctx).trim());
        if text.is_empty() {
            return text;
        }

        match self.style.heading_style {
            HeadingStyle::Setext if level <= 2 => {
                let underline = if level == 1 { "=" } else { "-" };
                let width = text.chars().count().max(3);
                format!("{}\n{}", text, underline.repeat(width))
            }
            _ => format!("{} {}", "#".repeat(usize::from(level.clamp(1, 6))), text),
        }
    }

    fn serialize_list(&mut self, ordered: bool, start: u32, tight: bool, items: &[ListItem]) -> String {
        let mut rendered = Vec::with_capacity(items.len());

        for (i, item) in items.iter().enumerate() {
            let marker = if ordered {
                format!("{}. ", start.saturating_add(i as u32))
            } else {
                format!("{} ", self.style.bullet_marker.as_char())
            };
            let indent = " ".repeat(marker.len().max(LIST_INDENT));
            let content = self.serialize_list_item(item, tight);

            let mut out = String::new();
            for (n, line) in content.lines().enumerate() {
                if n == 0 {
                    out.push_str(&marker);
                    out.push_str(line);
                } else {
                    out.push('\n');
                    if !line.is_empty() {
                        out.push_str(&indent);
                        out.push_str(line);
                    }
                }
            }
            if content.is_empty() {
                out.push_str(marker.trim_end());
            }
            rendered.push(out);
        }

        rendered.join(if tight { "\n" } else { "\n\n" })
    }

    fn serialize_list_item(&mut self, item: &ListItem, tight: bool) -> String {
        let mut out = String::new();

        for block in &item.content {
            if block.is_blank() {
                continue;
            }
            let text = self.serialize_block(block);
            if text.is_empty() {
                continue;
            }
            if !out.is_empty() {
                // A paragraph or an indented code block directly under a
                // line of text would be folded into it; keep them apart.
                let needs_blank = !tight
                    || matches!(block, Block::Paragraph(_))
                    || (matches!(block, Block::CodeBlock { .. })
                        && self.style.code_block_style == CodeBlockStyle::Indented);
                out.push_str(if needs_blank { "\n\n" } else { "\n" });
            }
            out.push_str(&text);
        }

        out
    }

    fn serialize_table(
        &mut self,
        header: Option<&[Vec<Inline>]>,
        alignments: &[Alignment],
        rows: &[Vec<Vec<Inline>>],
    ) -> String {
        let mut lines = Vec::with_capacity(rows.len() + 2);

        if let Some(header) = header {
            lines.push(self.serialize_table_row(header));

            let mut separator = String::new();
            for i in 0..header.len() {
                let cell = match alignments.get(i).copied().unwrap_or_default() {
                    Alignment::None => "---",
                    Alignment::Left => ":---",
                    Alignment::Center => ":---:",
                    Alignment::Right => "---:",
                };
                separator.push_str("| ");
                separator.push_str(cell);
                separator.push(' ');
            }
            separator.push('|');
            lines.push(separator);
        }

        for row in rows {
            lines.push(self.serialize_table_row(row));
        }

        lines.join("\n")
    }

    fn serialize_table_row(&mut self, cells: &[Vec<Inline>]) -> String {
        let ctx = Context {
            in_table: true,
            ..Context::default()
        };
        let mut out = String::new();
        for cell in cells {
            out.push_str("| ");
            out.push_str(self.serialize_inlines(cell, ctx).trim());
            out.push(' ');
        }
        out.push('|');
        out
    }

    fn serialize_inlines(&mut self, inlines: &[Inline], ctx: Context) -> String {
        let mut out = String::new();
        for inline in inlines {
            self.serialize_inline(inline, ctx, &mut out);
        }
        out
    }

    fn serialize_inline(&mut self, inline: &Inline, ctx: Context, out: &mut String) {
        match inline {
            Inline::Text(text) => out.push_str(&escape_text(text, ctx.in_table)),

            Inline::Strong(content) => {
                let delimiter = strong_delimiter(self.style.strong_delimiter, ctx.enclosing);
                let delimiter = separate_from_previous(delimiter, out, ctx.enclosing);
                self.serialize_delimited(content, delimiter, ctx, out);
            }

            Inline::Emphasis(content) => {
                let delimiter = em_delimiter(self.style.em_delimiter, ctx.enclosing);
                let delimiter = separate_from_previous(delimiter, out, ctx.enclosing);
                self.serialize_delimited(content, delimiter, ctx, out);
            }

            Inline::Code(code) => out.push_str(&code_span(code, ctx.in_table)),

            Inline::Link {
                content,
                url,
                title,
            } => {
                let text = self.serialize_inlines(content, ctx);
                match self.style.link_style {
                    LinkStyle::Inlined => {
                        out.push('[');
                        out.push_str(&text);
                        out.push_str("](");
                        out.push_str(&link_destination(url));
                        out.push_str(&title_part(title));
                        out.push(')');
                    }
                    LinkStyle::Referenced => {
                        let next = self.references.len() + 1;
                        let number = *self
                            .references
                            .entry((url.clone(), title.clone()))
                            .or_insert(next);
                        out.push('[');
                        out.push_str(&text);
                        out.push_str("][");
                        out.push_str(&number.to_string());
                        out.push(']');
                    }
                }
            }

            Inline::Image { alt, url, title } => {
                out.push_str("![");
                out.push_str(&escape_text(alt, ctx.in_table));
                out.push_str("](");
                out.push_str(&link_destination(url));
                out.push_str(&title_part(title));
                out.push(')');
            }

            Inline::LineBreak => {
                if ctx.in_table || ctx.in_heading {
                    out.push(' ');
                } else {
                    out.push_str("  \n");
                }
            }
        }
    }

    /// Wrap content in a delimiter pair, keeping flanking whitespace outside
    fn serialize_delimited(&mut self, content: &[Inline], delimiter: &str, ctx: Context, out: &mut String) {
        let inner_ctx = Context {
            enclosing: delimiter.chars().next(),
            ..ctx
        };
        let inner = self.serialize_inlines(content, inner_ctx);
        let trimmed = inner.trim();
        if trimmed.is_empty() {
            out.push_str(&inner);
            return;
        }

        let leading = &inner[..inner.len() - inner.trim_start().len()];
        let trailing = &inner[inner.trim_end().len()..];
        out.push_str(leading);
        out.push_str(delimiter);
        out.push_str(trimmed);
        out.push_str(delimiter);
        out.push_str(trailing);
    }
}

/// Pick the strong delimiter, switching characters when the enclosing span
/// already uses the configured one
fn strong_delimiter(configured: StrongDelimiter, enclosing: Option<char>) -> &'static str {
    let preferred = configured.as_str();
    match enclosing {
        Some(c) if preferred.starts_with(c) => {
            if c == '_' {
                "**"
            } else {
                "__"
            }
        }
        _ => preferred,
    }
}

fn em_delimiter(configured: EmDelimiter, enclosing: Option<char>) -> &'static str {
    let preferred = configured.as_str();
    match enclosing {
        Some(c) if preferred.starts_with(c) => {
            if c == '_' {
                "*"
            } else {
                "_"
            }
        }
        _ => preferred,
    }
}

/// Swap `*` and `_` when the opening delimiter would extend a run of the
/// same character already written, such as the closer of a sibling span
fn separate_from_previous(
    delimiter: &'static str,
    out: &str,
    enclosing: Option<char>,
) -> &'static str {
    let Some(c) = delimiter.chars().next() else {
        return delimiter;
    };
    if !out.ends_with(c) {
        return delimiter;
    }
    let alternative = match delimiter {
        "**" => "__",
        "__" => "**",
        "*" => "_",
        "_" => "*",
        other => other,
    };
    if alternative.chars().next() == enclosing {
        delimiter
    } else {
        alternative
    }
}

fn serialize_code_block(language: Option<&str>, code: &str, style: CodeBlockStyle) -> String {
    match style {
        CodeBlockStyle::Fenced => {
            let fence = "`".repeat((longest_run(code, '`') + 1).max(3));
            format!("{fence}{}\n{code}\n{fence}", language.unwrap_or(""))
        }
        CodeBlockStyle::Indented => code
            .lines()
            .map(|line| format!("    {}", line))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn code_span(code: &str, in_table: bool) -> String {
    if code.is_empty() {
        return String::new();
    }
    let code = if in_table {
        code.replace('|', "\\|")
    } else {
        code.to_string()
    };
    let ticks = "`".repeat(longest_run(&code, '`') + 1);
    let pad = code.starts_with('`')
        || code.ends_with('`')
        || (code.starts_with(' ') && code.ends_with(' ') && !code.trim().is_empty());
    if pad {
        format!("{ticks} {code} {ticks}")
    } else {
        format!("{ticks}{code}{ticks}")
    }
}

fn longest_run(s: &str, target: char) -> usize {
    s.chars()
        .fold((0, 0), |(max, current), c| {
            if c == target {
                (max.max(current + 1), current + 1)
            } else {
                (max, 0)
            }
        })
        .0
}

fn link_destination(url: &str) -> String {
    let needs_brackets = url.is_empty()
        || url
            .chars()
            .any(|c| c.is_whitespace() || c == '(' || c == ')' || c == '<' || c == '>');
    if needs_brackets {
        format!("<{}>", url.replace('<', "%3C").replace('>', "%3E"))
    } else {
        url.to_string()
    }
}

fn title_part(title: &Option<String>) -> String {
    match title {
        Some(t) if !t.is_empty() => format!(" \"{}\"", t.replace('\\', "\\\\").replace('"', "\\\"")),
        _ => String::new(),
    }
}

/// Escape characters that would otherwise be read as inline Markdown
pub fn escape_text(text: &str, in_table: bool) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' | '*' | '_' | '`' | '[' | ']' | '<' => {
                result.push('\\');
                result.push(c);
            }
            '|' if in_table => result.push_str("\\|"),
            _ => result.push(c),
        }
    }

    result
}

/// Escape block syntax that a line of text would otherwise start
pub fn escape_line_starts(text: &str) -> String {
    text.split('\n')
        .map(escape_line_start)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_line_start(line: &str) -> String {
    let indent_len = line.len() - line.trim_start_matches(' ').len();
    let (indent, rest) = line.split_at(indent_len.min(3));

    let escaped = if let Some(tail) = rest.strip_prefix('-') {
        Some(format!("\\-{}", tail))
    } else if let Some(tail) = rest.strip_prefix('=') {
        Some(format!("\\={}", tail))
    } else if let Some(tail) = rest.strip_prefix('>') {
        Some(format!("\\>{}", tail))
    } else if let Some(tail) = rest.strip_prefix("~~~") {
        Some(format!("\\~~~{}", tail))
    } else if rest.starts_with("+ ") || rest == "+" {
        Some(format!("\\{}", rest))
    } else if is_heading_marker(rest) {
        Some(format!("\\{}", rest))
    } else {
        escape_ordered_marker(rest)
    };

    match escaped {
        Some(escaped) => format!("{}{}", indent, escaped),
        None => line.to_string(),
    }
}

fn is_heading_marker(s: &str) -> bool {
    let hashes = s.len() - s.trim_start_matches('#').len();
    (1..=6).contains(&hashes) && matches!(s[hashes..].chars().next(), None | Some(' '))
}

fn escape_ordered_marker(s: &str) -> Option<String> {
    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 || digits > 9 {
        return None;
    }
    let rest = &s[digits..];
    let delimiter = rest.chars().next().filter(|c| *c == '.' || *c == ')')?;
    let tail = &rest[1..];
    if tail.is_empty() || tail.starts_with(' ') {
        Some(format!("{}\\{}{}", &s[..digits], delimiter, tail))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{BulletMarker, Preset};

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn default_style() -> StyleConfig {
        StyleConfig::default()
    }

    #[test]
    fn test_paragraph() {
        let block = Block::Paragraph(vec![text("Hello World")]);
        assert_eq!(serialize(&block, &default_style()), "Hello World");
    }

    #[test]
    fn test_heading_atx() {
        let block = Block::Heading {
            level: 3,
            content: vec![text("Section")],
        };
        assert_eq!(serialize(&block, &default_style()), "### Section");
    }

    #[test]
    fn test_heading_setext() {
        let style = StyleConfig {
            heading_style: HeadingStyle::Setext,
            ..default_style()
        };
        let h1 = Block::Heading {
            level: 1,
            content: vec![text("Title")],
        };
        let h2 = Block::Heading {
            level: 2,
            content: vec![text("Subtitle")],
        };
        let h4 = Block::Heading {
            level: 4,
            content: vec![text("Deep")],
        };
        assert_eq!(serialize(&h1, &style), "Title\n=====");
        assert_eq!(serialize(&h2, &style), "Subtitle\n--------");
        assert_eq!(serialize(&h4, &style), "#### Deep");
    }

    #[test]
    fn test_flattened_heading() {
        let style = StyleConfig {
            flatten_headings: true,
            ..default_style()
        };
        let block = Block::Heading {
            level: 2,
            content: vec![text("Title")],
        };
        assert_eq!(serialize(&block, &style), "**Title**");

        let slack = Preset::Slack.style();
        assert_eq!(serialize(&block, &slack), "*Title*");
    }

    #[test]
    fn test_strong_and_emphasis() {
        let block = Block::Paragraph(vec![
            Inline::Strong(vec![text("bold")]),
            text(" and "),
            Inline::Emphasis(vec![text("italic")]),
        ]);
        assert_eq!(serialize(&block, &default_style()), "**bold** and _italic_");
    }

    #[test]
    fn test_adjacent_spans_switch_characters() {
        let style = default_style();
        let em = Block::Paragraph(vec![
            Inline::Emphasis(vec![text("a")]),
            Inline::Emphasis(vec![text("b")]),
        ]);
        assert_eq!(serialize(&em, &style), "_a_*b*");

        let strong = Block::Paragraph(vec![
            Inline::Strong(vec![text("a")]),
            Inline::Strong(vec![text("b")]),
        ]);
        assert_eq!(serialize(&strong, &style), "**a**__b__");

        let spaced = Block::Paragraph(vec![
            Inline::Strong(vec![text("a")]),
            text(" "),
            Inline::Strong(vec![text("b")]),
        ]);
        assert_eq!(serialize(&spaced, &style), "**a** **b**");
    }

    #[test]
    fn test_escape_angle_bracket() {
        assert_eq!(escape_text("<https://x.com>", false), "\\<https://x.com>");
    }

    #[test]
    fn test_nested_delimiters_switch_characters() {
        let style = StyleConfig {
            em_delimiter: EmDelimiter::Asterisk,
            ..default_style()
        };
        let block = Block::Paragraph(vec![Inline::Strong(vec![Inline::Emphasis(vec![text("x")])])]);
        assert_eq!(serialize(&block, &style), "**_x_**");

        let block = Block::Paragraph(vec![Inline::Emphasis(vec![Inline::Strong(vec![text("x")])])]);
        assert_eq!(serialize(&block, &style), "*__x__*");
    }

    #[test]
    fn test_flanking_whitespace_moves_outside() {
        let block = Block::Paragraph(vec![
            text("a"),
            Inline::Strong(vec![text(" b ")]),
            text("c"),
        ]);
        assert_eq!(serialize(&block, &default_style()), "a **b** c");
    }

    #[test]
    fn test_text_escaping() {
        let block = Block::Paragraph(vec![text("2 * 3 = [six] and snake_case")]);
        assert_eq!(
            serialize(&block, &default_style()),
            "2 \\* 3 = \\[six\\] and snake\\_case"
        );
    }

    #[test]
    fn test_line_start_escaping() {
        assert_eq!(escape_line_starts("- not a list"), "\\- not a list");
        assert_eq!(escape_line_starts("# not a heading"), "\\# not a heading");
        assert_eq!(escape_line_starts("1. not a list"), "1\\. not a list");
        assert_eq!(escape_line_starts("> no quote"), "\\> no quote");
        assert_eq!(escape_line_starts("#hashtag"), "#hashtag");
        assert_eq!(escape_line_starts("2024 was"), "2024 was");
    }

    #[test]
    fn test_inline_code() {
        let block = Block::Paragraph(vec![Inline::Code("a `b` c".to_string())]);
        assert_eq!(serialize(&block, &default_style()), "``a `b` c``");
        let block = Block::Paragraph(vec![Inline::Code("`tick".to_string())]);
        assert_eq!(serialize(&block, &default_style()), "`` `tick ``");
    }

    #[test]
    fn test_link_with_title() {
        let block = Block::Paragraph(vec![Inline::Link {
            content: vec![text("Example")],
            url: "https://example.com".to_string(),
            title: Some("Home".to_string()),
        }]);
        assert_eq!(
            serialize(&block, &default_style()),
            "[Example](https://example.com \"Home\")"
        );
    }

    #[test]
    fn test_referenced_links() {
        let style = StyleConfig {
            link_style: LinkStyle::Referenced,
            ..default_style()
        };
        let link = |label: &str, url: &str| Inline::Link {
            content: vec![text(label)],
            url: url.to_string(),
            title: None,
        };
        let block = Block::Paragraph(vec![
            link("a", "https://a.com"),
            text(" "),
            link("b", "https://b.com"),
            text(" "),
            link("again", "https://a.com"),
        ]);
        assert_eq!(
            serialize(&block, &style),
            "[a][1] [b][2] [again][1]\n\n[1]: https://a.com\n[2]: https://b.com"
        );
    }

    #[test]
    fn test_image() {
        let block = Block::Paragraph(vec![Inline::Image {
            alt: "Alt text".to_string(),
            url: "image.png".to_string(),
            title: None,
        }]);
        assert_eq!(serialize(&block, &default_style()), "![Alt text](image.png)");
    }

    #[test]
    fn test_code_block_fenced() {
        let block = Block::CodeBlock {
            language: Some("rust".to_string()),
            code: "let x = 1;\n\n\nlet y = *x;".to_string(),
        };
        assert_eq!(
            serialize(&block, &default_style()),
            "```rust\nlet x = 1;\n\n\nlet y = *x;\n```"
        );
    }

    #[test]
    fn test_code_block_fence_grows() {
        let block = Block::CodeBlock {
            language: None,
            code: "```\nnested\n```".to_string(),
        };
        assert!(serialize(&block, &default_style()).starts_with("````\n"));
    }

    #[test]
    fn test_code_block_indented() {
        let style = StyleConfig {
            code_block_style: CodeBlockStyle::Indented,
            ..default_style()
        };
        let block = Block::CodeBlock {
            language: None,
            code: "let x = 1;\nlet y = 2;".to_string(),
        };
        assert_eq!(serialize(&block, &style), "    let x = 1;\n    let y = 2;");
    }

    #[test]
    fn test_blockquote() {
        let block = Block::BlockQuote(vec![
            Block::Paragraph(vec![text("One")]),
            Block::Paragraph(vec![text("Two")]),
        ]);
        assert_eq!(serialize(&block, &default_style()), "> One\n>\n> Two");
    }

    #[test]
    fn test_unordered_list() {
        let block = Block::List {
            ordered: false,
            start: 1,
            tight: true,
            items: vec![
                ListItem::from_inlines(vec![text("One")]),
                ListItem::from_inlines(vec![text("Two")]),
            ],
        };
        assert_eq!(serialize(&block, &default_style()), "- One\n- Two");

        let style = StyleConfig {
            bullet_marker: BulletMarker::Plus,
            ..default_style()
        };
        assert_eq!(serialize(&block, &style), "+ One\n+ Two");
    }

    #[test]
    fn test_ordered_list_with_start() {
        let block = Block::List {
            ordered: true,
            start: 9,
            tight: true,
            items: vec![
                ListItem::from_inlines(vec![text("Nine")]),
                ListItem::from_inlines(vec![text("Ten")]),
            ],
        };
        assert_eq!(serialize(&block, &default_style()), "9. Nine\n10. Ten");
    }

    #[test]
    fn test_nested_list_indent() {
        let inner = Block::List {
            ordered: false,
            start: 1,
            tight: true,
            items: vec![ListItem::from_inlines(vec![text("Inner")])],
        };
        let block = Block::List {
            ordered: false,
            start: 1,
            tight: true,
            items: vec![ListItem::new(vec![
                Block::Paragraph(vec![text("Outer")]),
                inner,
            ])],
        };
        assert_eq!(serialize(&block, &default_style()), "- Outer\n    - Inner");
    }

    #[test]
    fn test_loose_list() {
        let block = Block::List {
            ordered: false,
            start: 1,
            tight: false,
            items: vec![
                ListItem::new(vec![
                    Block::Paragraph(vec![text("First")]),
                    Block::Paragraph(vec![text("More")]),
                ]),
                ListItem::from_inlines(vec![text("Second")]),
            ],
        };
        assert_eq!(
            serialize(&block, &default_style()),
            "- First\n\n    More\n\n- Second"
        );
    }

    #[test]
    fn test_thematic_break() {
        assert_eq!(serialize(&Block::ThematicBreak, &default_style()), "---");
    }

    #[test]
    fn test_table() {
        let block = Block::Table {
            header: Some(vec![vec![text("A")], vec![text("B")]]),
            alignments: vec![Alignment::Left, Alignment::Center],
            rows: vec![
                vec![vec![text("1")], vec![text("2")]],
                vec![vec![text("x|y")]],
            ],
        };
        assert_eq!(
            serialize(&block, &default_style()),
            "| A | B |\n| :--- | :---: |\n| 1 | 2 |\n| x\\|y |"
        );
    }

    #[test]
    fn test_table_without_header() {
        let block = Block::Table {
            header: None,
            alignments: Vec::new(),
            rows: vec![vec![vec![text("1")], vec![text("2")]]],
        };
        assert_eq!(serialize(&block, &default_style()), "| 1 | 2 |");
    }

    #[test]
    fn test_document_spacing() {
        let block = Block::Document(vec![
            Block::Heading {
                level: 1,
                content: vec![text("Title")],
            },
            Block::Paragraph(vec![text("   ")]),
            Block::Paragraph(vec![text("Body")]),
        ]);
        assert_eq!(serialize(&block, &default_style()), "# Title\n\nBody");
    }
}
