//! Convert a markup tree to the Markdown AST
//!
//! Block-level elements become AST blocks; runs of inline content between
//! them are gathered into paragraphs. Whitespace is collapsed across text
//! nodes in document order, so the AST never holds runs of spaces that HTML
//! would not render.

use tidymark_core::{
    inlines_are_blank, serialize, Alignment, Block, Inline, ListItem, StyleConfig,
};

use crate::node::{Node, NodeType};
use crate::tag::Tag;
use crate::url_clean::clean_url;

/// Markdown produced from a markup tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub markdown: String,
    /// Links and images whose URL was changed by tracking-parameter cleanup
    pub links_cleaned: usize,
}

/// Convert a markup tree to Markdown in the given style.
///
/// # Example
///
/// ```rust
/// use tidymark::{emit_markdown, parse_html, StyleConfig};
///
/// let tree = parse_html("<h1>Hi</h1><p><a href=\"https://x.com/?utm_source=n\">x</a></p>");
/// let emitted = emit_markdown(&tree, &StyleConfig::default(), true);
/// assert_eq!(emitted.markdown, "# Hi\n\n[x](https://x.com/)");
/// assert_eq!(emitted.links_cleaned, 1);
/// ```
pub fn emit_markdown(tree: &Node, style: &StyleConfig, clean_links: bool) -> Emitted {
    let mut converter = Converter::new(clean_links);
    let ast = converter.convert(tree);
    Emitted {
        markdown: serialize(&ast, style),
        links_cleaned: converter.links_cleaned(),
    }
}

/// Tree-to-AST converter. Holds the per-conversion state: the cleaned-link
/// counter and whether the last emitted text ended in whitespace.
#[derive(Debug)]
pub struct Converter {
    clean_links: bool,
    links_cleaned: usize,
    after_space: bool,
}

impl Converter {
    pub fn new(clean_links: bool) -> Self {
        Self {
            clean_links,
            links_cleaned: 0,
            after_space: true,
        }
    }

    pub fn links_cleaned(&self) -> usize {
        self.links_cleaned
    }

    /// Convert a tree (or a single element) to a document block
    pub fn convert(&mut self, node: &Node) -> Block {
        let blocks = if node.is_element() {
            self.convert_flow(std::slice::from_ref(node))
        } else {
            self.convert_flow(&node.children)
        };
        Block::Document(blocks)
    }

    /// Convert a sequence of sibling nodes in block context
    fn convert_flow(&mut self, nodes: &[Node]) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut pending = Vec::new();
        self.after_space = true;

        for node in nodes {
            match node.node_type {
                NodeType::Text => {
                    self.push_text(node.value.as_deref().unwrap_or_default(), &mut pending);
                }
                NodeType::Element => {
                    let tag = node.tag();
                    if tag.is_block() {
                        self.flush_paragraph(&mut pending, &mut blocks);
                        if let Some(block) = self.convert_block(node, tag) {
                            blocks.push(block);
                        }
                        self.after_space = true;
                    } else {
                        self.convert_inline(node, tag, &mut pending);
                    }
                }
                NodeType::Comment | NodeType::Document => {}
            }
        }

        self.flush_paragraph(&mut pending, &mut blocks);
        blocks
    }

    fn flush_paragraph(&mut self, pending: &mut Vec<Inline>, blocks: &mut Vec<Block>) {
        if inlines_are_blank(pending) {
            pending.clear();
        } else {
            blocks.push(Block::Paragraph(std::mem::take(pending)));
        }
        self.after_space = true;
    }

    fn convert_block(&mut self, node: &Node, tag: Tag) -> Option<Block> {
        match tag {
            Tag::Heading(level) => {
                self.after_space = true;
                let content = self.collect_inlines(node);
                if inlines_are_blank(&content) {
                    None
                } else {
                    Some(Block::Heading { level, content })
                }
            }

            Tag::Blockquote => {
                let blocks = self.convert_flow(&node.children);
                if blocks.is_empty() {
                    None
                } else {
                    Some(Block::BlockQuote(blocks))
                }
            }

            Tag::UnorderedList => self.convert_list(node, false),
            Tag::OrderedList => self.convert_list(node, true),

            Tag::Pre => Some(convert_pre(node)),

            Tag::HorizontalRule => Some(Block::ThematicBreak),

            Tag::Table => self.convert_table(node),

            Tag::Pruned => None,

            // Paragraphs, containers and stray table or list parts
            _ => wrap_blocks(self.convert_flow(&node.children)),
        }
    }

    fn convert_list(&mut self, node: &Node, ordered: bool) -> Option<Block> {
        let start = if ordered {
            node.attr("start")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(1)
        } else {
            1
        };

        let mut tight = true;
        let mut items: Vec<ListItem> = Vec::new();

        for child in node.element_children() {
            let tag = child.tag();
            match tag {
                // A list nested directly in a list belongs to the previous item
                Tag::UnorderedList | Tag::OrderedList if !items.is_empty() => {
                    if let (Some(block), Some(last)) =
                        (self.convert_block(child, tag), items.last_mut())
                    {
                        last.content.push(block);
                    }
                }
                Tag::Pruned => {}
                _ => {
                    if child.element_children().any(|c| c.tag() == Tag::Paragraph) {
                        tight = false;
                    }
                    items.push(ListItem::new(self.convert_flow(&child.children)));
                }
            }
        }

        if items.is_empty() {
            return None;
        }

        Some(Block::List {
            ordered,
            start,
            tight,
            items,
        })
    }

    fn convert_table(&mut self, node: &Node) -> Option<Block> {
        let mut caption = Vec::new();
        let mut rows = Vec::new();

        for child in node.element_children() {
            match child.tag() {
                Tag::Caption => {
                    self.after_space = true;
                    let content = self.collect_inlines(child);
                    if !inlines_are_blank(&content) {
                        caption.push(Block::Paragraph(content));
                    }
                }
                Tag::TableSection => {
                    let in_head = child.tag_name() == "thead";
                    for tr in child.element_children() {
                        if tr.tag() == Tag::TableRow {
                            rows.push(self.table_row(tr, in_head));
                        }
                    }
                }
                Tag::TableRow => rows.push(self.table_row(child, false)),
                _ => {}
            }
        }

        rows.retain(|row| !row.cells.is_empty());

        // The header is the first row of a thead, or a leading row of th cells
        let header_index = rows.iter().position(|row| row.in_head).or_else(|| {
            rows.first()
                .filter(|row| row.has_header_cell)
                .map(|_| 0)
        });

        let (header, alignments) = match header_index {
            Some(index) => {
                let row = rows.remove(index);
                (Some(row.cells), row.alignments)
            }
            None => (None, Vec::new()),
        };

        if header.is_some() || !rows.is_empty() {
            let table = Block::Table {
                header,
                alignments,
                rows: rows.into_iter().map(|row| row.cells).collect(),
            };
            caption.push(table);
        }

        wrap_blocks(caption)
    }

    fn table_row(&mut self, tr: &Node, in_head: bool) -> TableRow {
        let mut row = TableRow {
            cells: Vec::new(),
            alignments: Vec::new(),
            in_head,
            has_header_cell: false,
        };

        for cell in tr.element_children() {
            let tag = cell.tag();
            if !matches!(tag, Tag::HeaderCell | Tag::DataCell) {
                continue;
            }
            row.has_header_cell |= tag == Tag::HeaderCell;
            row.alignments
                .push(Alignment::from_attr(cell.attr("align").unwrap_or_default()));
            self.after_space = true;
            row.cells.push(self.collect_inlines(cell));
        }

        row
    }

    fn collect_inlines(&mut self, node: &Node) -> Vec<Inline> {
        let mut out = Vec::new();
        self.append_inlines(node, &mut out);
        out
    }

    fn append_inlines(&mut self, node: &Node, out: &mut Vec<Inline>) {
        for child in node.children() {
            match child.node_type {
                NodeType::Text => {
                    self.push_text(child.value.as_deref().unwrap_or_default(), out);
                }
                NodeType::Element => self.convert_inline(child, child.tag(), out),
                NodeType::Comment | NodeType::Document => {}
            }
        }
    }

    fn convert_inline(&mut self, node: &Node, tag: Tag, out: &mut Vec<Inline>) {
        match tag {
            Tag::Strong | Tag::Emphasis => {
                let inner = self.collect_inlines(node);
                if inlines_are_blank(&inner) {
                    out.extend(inner);
                } else if tag == Tag::Strong {
                    out.push(Inline::Strong(inner));
                } else {
                    out.push(Inline::Emphasis(inner));
                }
            }

            Tag::Code => {
                let code = node.text_content().replace(['\n', '\r'], " ");
                if !code.is_empty() {
                    out.push(Inline::Code(code));
                    self.after_space = false;
                }
            }

            Tag::Anchor => self.convert_link(node, out),

            Tag::Image => self.convert_image(node, out),

            Tag::LineBreak => {
                out.push(Inline::LineBreak);
                self.after_space = true;
            }

            Tag::Pruned => {}

            // Block content inside inline context is flattened between spaces
            tag if tag.is_block() => {
                self.push_text(" ", out);
                self.append_inlines(node, out);
                self.push_text(" ", out);
            }

            _ => self.append_inlines(node, out),
        }
    }

    fn convert_link(&mut self, node: &Node, out: &mut Vec<Inline>) {
        let href = node.attr("href").map(str::trim).unwrap_or_default();
        if href.is_empty() {
            self.append_inlines(node, out);
            return;
        }

        let content = self.collect_inlines(node);
        out.push(Inline::Link {
            content,
            url: self.clean(href),
            title: title_of(node),
        });
    }

    fn convert_image(&mut self, node: &Node, out: &mut Vec<Inline>) {
        let src = node.attr("src").map(str::trim).unwrap_or_default();
        if src.is_empty() {
            return;
        }

        out.push(Inline::Image {
            alt: collapse_whitespace(node.attr("alt").unwrap_or_default()),
            url: self.clean(src),
            title: title_of(node),
        });
        self.after_space = false;
    }

    fn clean(&mut self, url: &str) -> String {
        if !self.clean_links {
            return url.to_string();
        }
        let cleaned = clean_url(url);
        if cleaned != url {
            self.links_cleaned += 1;
        }
        cleaned
    }

    /// Append text with HTML whitespace collapsed against what came before
    fn push_text(&mut self, raw: &str, out: &mut Vec<Inline>) {
        let mut text = String::with_capacity(raw.len());
        for c in raw.chars() {
            if c.is_ascii_whitespace() {
                if !self.after_space {
                    text.push(' ');
                    self.after_space = true;
                }
            } else {
                text.push(c);
                self.after_space = false;
            }
        }

        if text.is_empty() {
            return;
        }
        match out.last_mut() {
            Some(Inline::Text(previous)) => previous.push_str(&text),
            _ => out.push(Inline::Text(text)),
        }
    }
}

struct TableRow {
    cells: Vec<Vec<Inline>>,
    alignments: Vec<Alignment>,
    in_head: bool,
    has_header_cell: bool,
}

fn convert_pre(node: &Node) -> Block {
    let code_element = node.element_children().find(|c| c.tag() == Tag::Code);
    let language = code_element
        .and_then(language_of)
        .or_else(|| language_of(node));

    let mut code = node.text_content();
    if code.ends_with('\n') {
        code.pop();
    }

    Block::CodeBlock { language, code }
}

/// Language named by a `language-*` or `lang-*` class
fn language_of(node: &Node) -> Option<String> {
    node.attr("class")?.split_whitespace().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .filter(|lang| !lang.is_empty())
            .map(str::to_string)
    })
}

fn title_of(node: &Node) -> Option<String> {
    node.attr("title")
        .map(collapse_whitespace)
        .filter(|title| !title.is_empty())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

fn wrap_blocks(mut blocks: Vec<Block>) -> Option<Block> {
    match blocks.len() {
        0 => None,
        1 => blocks.pop(),
        _ => Some(Block::Document(blocks)),
    }
}
