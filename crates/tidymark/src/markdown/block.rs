//! Block structure of a Markdown document.
//!
//! Lines are classified in order of precedence: indented code, fenced code,
//! ATX headings, thematic breaks, block quotes, list items, tables and
//! finally paragraphs (which may turn into setext headings). Containers are
//! parsed by stripping their markers and recursing on the inner lines.

use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use tidymark_core::{Alignment, Block, Inline, ListItem};

use super::inline::parse_inlines;

/// Containers nested deeper than this are read as paragraph text
pub const MAX_NESTING: usize = 64;

static REFERENCE_DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^ {0,3}\[((?:[^\]\\]|\\.)+)\]:[ \t]*(<[^>\n]*>|\S+)(?:[ \t]+("(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|\((?:[^)\\]|\\.)*\)))?[ \t]*$"#,
    )
    .expect("REFERENCE_DEFINITION should compile")
});

static TABLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\|?[ \t]*:?-+:?[ \t]*(\|[ \t]*:?-+:?[ \t]*)*\|?$")
        .expect("TABLE_SEPARATOR should compile")
});

/// Target of a reference-style link
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LinkTarget {
    pub url: String,
    pub title: Option<String>,
}

/// Link reference definitions keyed by normalized label
pub(crate) type References = HashMap<String, LinkTarget>;

/// Case-fold a reference label and collapse its inner whitespace
pub(crate) fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parse Markdown into the shared AST.
///
/// # Example
///
/// ```rust
/// use tidymark::markdown::parse_markdown;
/// use tidymark::{Block, Inline};
///
/// let doc = parse_markdown("# Title\n\nSome *text*");
/// let Block::Document(blocks) = doc else { unreachable!() };
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(
///     blocks[1],
///     Block::Paragraph(vec![
///         Inline::Text("Some ".to_string()),
///         Inline::Emphasis(vec![Inline::Text("text".to_string())]),
///     ])
/// );
/// ```
pub fn parse_markdown(markdown: &str) -> Block {
    let normalized = markdown.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = normalized.split('\n').map(str::to_string).collect();
    let references = collect_references(&lines);
    let parser = BlockParser {
        references: &references,
    };
    Block::Document(parser.parse_blocks(&lines, 0))
}

/// Gather reference definitions outside fenced code; the first definition
/// of a label wins
fn collect_references(lines: &[String]) -> References {
    let mut references = References::new();
    let mut fence: Option<Fence> = None;

    for line in lines {
        if let Some(open) = &fence {
            if open.closes(line) {
                fence = None;
            }
            continue;
        }
        if indent_width(line) < 4 {
            if let Some(open) = Fence::open(line.trim_start()) {
                fence = Some(open);
                continue;
            }
        }

        let Some(caps) = REFERENCE_DEFINITION.captures(line) else {
            continue;
        };
        let label = normalize_label(&caps[1]);
        let url = caps[2]
            .strip_prefix('<')
            .and_then(|u| u.strip_suffix('>'))
            .unwrap_or(&caps[2]);
        let title = caps.get(3).map(|m| {
            let quoted = m.as_str();
            unescape(&quoted[1..quoted.len() - 1])
        });
        references.entry(label).or_insert_with(|| LinkTarget {
            url: unescape(url),
            title,
        });
    }

    references
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(next)) if next.is_ascii_punctuation() => {
                out.push(*next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// A parsed block with the range of non-blank lines it came from
struct Spanned {
    block: Block,
    start: usize,
    end: usize,
}

struct BlockParser<'r> {
    references: &'r References,
}

impl BlockParser<'_> {
    fn parse_blocks(&self, lines: &[String], depth: usize) -> Vec<Block> {
        self.parse_spanned(lines, depth)
            .into_iter()
            .map(|spanned| spanned.block)
            .collect()
    }

    fn parse_spanned(&self, lines: &[String], depth: usize) -> Vec<Spanned> {
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            if is_blank(&lines[i]) {
                i += 1;
                continue;
            }

            let start = i;
            let (block, next) = self.parse_block(lines, i, depth);
            let mut end = next;
            while end > start && is_blank(&lines[end - 1]) {
                end -= 1;
            }
            if let Some(block) = block {
                blocks.push(Spanned { block, start, end });
            }
            i = next.max(i + 1);
        }

        blocks
    }

    /// Parse the block starting at `lines[i]`; returns it with the index of
    /// the first line it did not consume
    fn parse_block(&self, lines: &[String], i: usize, depth: usize) -> (Option<Block>, usize) {
        let line = &lines[i];
        let indent = indent_width(line);
        if indent >= 4 {
            return indented_code(lines, i);
        }

        let content = line.trim_start();
        if let Some(fence) = Fence::open(content) {
            return fenced_code(lines, i, indent, &fence);
        }
        if let Some((level, text)) = atx_heading(content) {
            let heading = Block::Heading {
                level,
                content: parse_inlines(text, self.references),
            };
            return (Some(heading), i + 1);
        }
        if is_thematic_break(content) {
            return (Some(Block::ThematicBreak), i + 1);
        }

        let nested_ok = depth < MAX_NESTING;
        if !nested_ok && (content.starts_with('>') || ListMarker::parse(line).is_some()) {
            debug!("nesting limit reached at line {:?}, reading as text", content);
        }
        if nested_ok && content.starts_with('>') {
            return self.blockquote(lines, i, depth);
        }
        if nested_ok {
            if let Some(marker) = ListMarker::parse(line) {
                return self.list(lines, i, depth, marker);
            }
        }

        if let Some(table) = self.table(lines, i) {
            return table;
        }
        if REFERENCE_DEFINITION.is_match(line) {
            return (None, i + 1);
        }

        self.paragraph(lines, i)
    }

    fn blockquote(&self, lines: &[String], i: usize, depth: usize) -> (Option<Block>, usize) {
        let mut inner: Vec<String> = Vec::new();
        let mut j = i;

        while j < lines.len() {
            let line = &lines[j];
            if indent_width(line) < 4 {
                if let Some(rest) = line.trim_start().strip_prefix('>') {
                    inner.push(strip_indent(rest, 1));
                    j += 1;
                    continue;
                }
            }
            // Lazy continuation of a quoted paragraph
            let continues = !is_blank(line)
                && inner.last().is_some_and(|last| !is_blank(last))
                && !interrupts_paragraph(line);
            if !continues {
                break;
            }
            inner.push(line.trim_start().to_string());
            j += 1;
        }

        let blocks = self.parse_blocks(&inner, depth + 1);
        (Some(Block::BlockQuote(blocks)), j)
    }

    fn list(
        &self,
        lines: &[String],
        i: usize,
        depth: usize,
        first: ListMarker,
    ) -> (Option<Block>, usize) {
        let mut items = Vec::new();
        let mut tight = true;
        let mut marker = first;
        let mut j = i;

        loop {
            let mut item_lines = vec![marker.first_line(&lines[j])];
            j += 1;

            while j < lines.len() {
                let line = &lines[j];
                if is_blank(line) {
                    item_lines.push(String::new());
                    j += 1;
                    continue;
                }

                let indent = indent_width(line);
                if indent >= marker.width {
                    item_lines.push(strip_indent(line, indent.min(marker.width.max(4))));
                    j += 1;
                    continue;
                }

                let after_blank = item_lines.last().is_some_and(|l| l.is_empty());
                let lazy = !after_blank
                    && ListMarker::parse(line).is_none()
                    && !interrupts_paragraph(line);
                if !lazy {
                    break;
                }
                item_lines.push(line.trim_start().to_string());
                j += 1;
            }

            let mut trailing_blanks = 0;
            while item_lines.len() > 1 && item_lines.last().is_some_and(|l| is_blank(l)) {
                item_lines.pop();
                trailing_blanks += 1;
            }

            let spans = self.parse_spanned(&item_lines, depth + 1);
            if spans.windows(2).any(|pair| pair[1].start > pair[0].end) {
                tight = false;
            }
            items.push(ListItem::new(
                spans.into_iter().map(|spanned| spanned.block).collect(),
            ));

            let next = lines.get(j).and_then(|line| {
                ListMarker::parse(line)
                    .filter(|next| next.same_kind(&marker))
                    .filter(|_| !is_thematic_break(line.trim_start()))
            });
            match next {
                Some(next) => {
                    if trailing_blanks > 0 {
                        tight = false;
                    }
                    marker = next;
                }
                None => break,
            }
        }

        let list = Block::List {
            ordered: first.ordered,
            start: first.number,
            tight,
            items,
        };
        (Some(list), j)
    }

    fn table(&self, lines: &[String], i: usize) -> Option<(Option<Block>, usize)> {
        let header_line = &lines[i];
        let separator = lines.get(i + 1)?;
        if !header_line.contains('|')
            || !separator.contains('|')
            || !TABLE_SEPARATOR.is_match(separator.trim())
        {
            return None;
        }

        let header = split_row(header_line);
        let alignments: Vec<Alignment> = split_row(separator)
            .iter()
            .map(|cell| column_alignment(cell))
            .collect();
        if header.len() != alignments.len() {
            return None;
        }

        let mut rows = Vec::new();
        let mut j = i + 2;
        while j < lines.len() {
            let line = &lines[j];
            if is_blank(line) || !line.contains('|') || interrupts_paragraph(line) {
                break;
            }
            rows.push(self.cells(split_row(line)));
            j += 1;
        }

        let table = Block::Table {
            header: Some(self.cells(header)),
            alignments,
            rows,
        };
        Some((Some(table), j))
    }

    fn cells(&self, raw: Vec<String>) -> Vec<Vec<Inline>> {
        raw.iter()
            .map(|cell| parse_inlines(cell, self.references))
            .collect()
    }

    fn paragraph(&self, lines: &[String], i: usize) -> (Option<Block>, usize) {
        let mut text_lines = vec![lines[i].trim_start()];
        let mut j = i + 1;

        while j < lines.len() {
            let line = &lines[j];
            if is_blank(line) {
                break;
            }
            if indent_width(line) < 4 {
                if let Some(level) = setext_level(line.trim()) {
                    let text = text_lines.join("\n");
                    let heading = Block::Heading {
                        level,
                        content: parse_inlines(text.trim_end(), self.references),
                    };
                    return (Some(heading), j + 1);
                }
                if interrupts_paragraph(line) {
                    break;
                }
            }
            text_lines.push(line.trim_start());
            j += 1;
        }

        let text = text_lines.join("\n");
        let paragraph = Block::Paragraph(parse_inlines(text.trim_end(), self.references));
        (Some(paragraph), j)
    }
}

fn indented_code(lines: &[String], i: usize) -> (Option<Block>, usize) {
    let mut code_lines = Vec::new();
    let mut j = i;

    while j < lines.len() {
        let line = &lines[j];
        if !is_blank(line) && indent_width(line) < 4 {
            break;
        }
        code_lines.push(strip_indent(line, 4));
        j += 1;
    }
    while code_lines.last().is_some_and(|l| is_blank(l)) {
        code_lines.pop();
    }

    let block = Block::CodeBlock {
        language: None,
        code: code_lines.join("\n"),
    };
    (Some(block), j)
}

fn fenced_code(lines: &[String], i: usize, indent: usize, fence: &Fence) -> (Option<Block>, usize) {
    let mut code_lines = Vec::new();
    let mut j = i + 1;

    while j < lines.len() {
        let line = &lines[j];
        j += 1;
        if fence.closes(line) {
            break;
        }
        code_lines.push(strip_indent(line, indent));
    }

    let language = fence
        .info
        .split_whitespace()
        .next()
        .map(unescape);
    let block = Block::CodeBlock {
        language,
        code: code_lines.join("\n"),
    };
    (Some(block), j)
}

/// An opening code fence
#[derive(Debug, Clone)]
struct Fence {
    marker: char,
    len: usize,
    info: String,
}

impl Fence {
    fn open(content: &str) -> Option<Self> {
        let marker = content.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = content.chars().take_while(|c| *c == marker).count();
        if len < 3 {
            return None;
        }
        let info = content[len..].trim();
        if marker == '`' && info.contains('`') {
            return None;
        }
        Some(Self {
            marker,
            len,
            info: info.to_string(),
        })
    }

    fn closes(&self, line: &str) -> bool {
        if indent_width(line) >= 4 {
            return false;
        }
        let content = line.trim_start();
        let run = content.chars().take_while(|c| *c == self.marker).count();
        run >= self.len && content[run..].trim().is_empty()
    }
}

/// A list item marker at the start of a line
#[derive(Debug, Clone, Copy)]
struct ListMarker {
    ordered: bool,
    /// Bullet character, or the `.`/`)` after an ordinal
    symbol: char,
    number: u32,
    /// Bytes taken by the marker itself
    marker_len: usize,
    /// Column where item content starts
    width: usize,
    empty: bool,
}

impl ListMarker {
    fn parse(line: &str) -> Option<Self> {
        let indent = indent_width(line);
        if indent >= 4 {
            return None;
        }
        let content = line.trim_start();

        let (ordered, symbol, number, marker_len) = match content.chars().next()? {
            c @ ('-' | '*' | '+') => (false, c, 1, 1),
            c if c.is_ascii_digit() => {
                let digits = content.chars().take_while(char::is_ascii_digit).count();
                if digits > 9 {
                    return None;
                }
                let delimiter = content[digits..]
                    .chars()
                    .next()
                    .filter(|d| *d == '.' || *d == ')')?;
                let number = content[..digits].parse().ok()?;
                (true, delimiter, number, digits + 1)
            }
            _ => return None,
        };

        let rest = &content[marker_len..];
        if is_blank(rest) {
            return Some(Self {
                ordered,
                symbol,
                number,
                marker_len,
                width: indent + marker_len + 1,
                empty: true,
            });
        }
        if !rest.starts_with([' ', '\t']) {
            return None;
        }

        let spaces = indent_width(rest);
        let padding = if spaces > 4 { 1 } else { spaces };
        Some(Self {
            ordered,
            symbol,
            number,
            marker_len,
            width: indent + marker_len + padding,
            empty: false,
        })
    }

    fn same_kind(&self, other: &Self) -> bool {
        self.ordered == other.ordered && self.symbol == other.symbol
    }

    /// Item content on the marker's own line
    fn first_line(&self, line: &str) -> String {
        if self.empty {
            return String::new();
        }
        let indent = indent_width(line);
        let after_marker = &line.trim_start()[self.marker_len..];
        strip_indent(after_marker, self.width - indent - self.marker_len)
    }

    /// Only non-empty bullets and lists starting at 1 may break a paragraph
    fn interrupts_paragraph(&self) -> bool {
        !self.empty && (!self.ordered || self.number == 1)
    }
}

fn interrupts_paragraph(line: &str) -> bool {
    if indent_width(line) >= 4 {
        return false;
    }
    let content = line.trim_start();
    Fence::open(content).is_some()
        || atx_heading(content).is_some()
        || is_thematic_break(content)
        || content.starts_with('>')
        || ListMarker::parse(line).is_some_and(|marker| marker.interrupts_paragraph())
}

fn atx_heading(content: &str) -> Option<(u8, &str)> {
    let level = content.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &content[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }

    let text = rest.trim();
    let without_closing = text.trim_end_matches('#');
    let text = if without_closing.is_empty() {
        ""
    } else if without_closing.ends_with([' ', '\t']) {
        without_closing.trim_end()
    } else {
        text
    };
    Some((level as u8, text))
}

fn is_thematic_break(content: &str) -> bool {
    let mut chars = content.chars().filter(|c| *c != ' ' && *c != '\t');
    let Some(first) = chars.next() else {
        return false;
    };
    if !matches!(first, '*' | '-' | '_') {
        return false;
    }
    let mut count = 1;
    for c in chars {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}

fn setext_level(trimmed: &str) -> Option<u8> {
    if trimmed.is_empty() {
        None
    } else if trimmed.chars().all(|c| c == '=') {
        Some(1)
    } else if trimmed.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

/// Split a table row on unescaped pipes; `\|` becomes a literal pipe
fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = trimmed.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('|') => cell.push('|'),
                Some(next) => {
                    cell.push('\\');
                    cell.push(next);
                }
                None => cell.push('\\'),
            },
            '|' => cells.push(std::mem::take(&mut cell)),
            _ => cell.push(c),
        }
    }
    if !cell.trim().is_empty() {
        cells.push(cell);
    }

    cells.into_iter().map(|c| c.trim().to_string()).collect()
}

fn column_alignment(cell: &str) -> Alignment {
    match (cell.starts_with(':'), cell.ends_with(':')) {
        (true, true) => Alignment::Center,
        (true, false) => Alignment::Left,
        (false, true) => Alignment::Right,
        (false, false) => Alignment::None,
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Leading whitespace in columns, with tab stops every four columns
fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - width % 4,
            _ => break,
        }
    }
    width
}

/// Remove up to `columns` columns of leading whitespace
fn strip_indent(line: &str, columns: usize) -> String {
    let mut width = 0;
    for (i, c) in line.char_indices() {
        if width >= columns {
            return line[i..].to_string();
        }
        match c {
            ' ' => width += 1,
            '\t' => {
                let next = width + 4 - width % 4;
                if next > columns {
                    return format!("{}{}", " ".repeat(next - columns), &line[i + 1..]);
                }
                width = next;
            }
            _ => return line[i..].to_string(),
        }
    }
    String::new()
}
