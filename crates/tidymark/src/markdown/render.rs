//! HTML rendering of the Markdown AST

use html_escape::{encode_double_quoted_attribute, encode_text};
use tidymark_core::{Alignment, Block, Inline, ListItem};

/// Render a Markdown AST as an HTML fragment.
///
/// Paragraphs directly inside tight list items are written without `<p>`.
pub fn render_html(block: &Block) -> String {
    let mut out = String::new();
    render_block(block, false, &mut out);
    out
}

fn render_block(block: &Block, tight: bool, out: &mut String) {
    match block {
        Block::Document(blocks) => {
            for block in blocks {
                render_block(block, tight, out);
            }
        }

        Block::Heading { level, content } => {
            let level = (*level).clamp(1, 6);
            out.push_str(&format!("<h{level}>"));
            render_inlines(content, out);
            out.push_str(&format!("</h{level}>\n"));
        }

        Block::Paragraph(content) => {
            if tight {
                render_inlines(content, out);
                out.push('\n');
            } else {
                out.push_str("<p>");
                render_inlines(content, out);
                out.push_str("</p>\n");
            }
        }

        Block::BlockQuote(blocks) => {
            out.push_str("<blockquote>\n");
            for block in blocks {
                render_block(block, false, out);
            }
            out.push_str("</blockquote>\n");
        }

        Block::List {
            ordered,
            start,
            tight,
            items,
        } => {
            let tag = if *ordered { "ol" } else { "ul" };
            if *ordered && *start != 1 {
                out.push_str(&format!("<ol start=\"{start}\">\n"));
            } else {
                out.push_str(&format!("<{tag}>\n"));
            }
            for item in items {
                render_item(item, *tight, out);
            }
            out.push_str(&format!("</{tag}>\n"));
        }

        Block::CodeBlock { language, code } => {
            out.push_str("<pre><code");
            if let Some(language) = language {
                out.push_str(" class=\"language-");
                out.push_str(&encode_double_quoted_attribute(language));
                out.push('"');
            }
            out.push('>');
            out.push_str(&encode_text(code));
            if !code.is_empty() {
                out.push('\n');
            }
            out.push_str("</code></pre>\n");
        }

        Block::ThematicBreak => out.push_str("<hr>\n"),

        Block::Table {
            header,
            alignments,
            rows,
        } => {
            out.push_str("<table>\n");
            if let Some(header) = header {
                out.push_str("<thead>\n");
                render_row(header, "th", alignments, out);
                out.push_str("</thead>\n");
            }
            if !rows.is_empty() {
                out.push_str("<tbody>\n");
                for row in rows {
                    render_row(row, "td", alignments, out);
                }
                out.push_str("</tbody>\n");
            }
            out.push_str("</table>\n");
        }
    }
}

fn render_item(item: &ListItem, tight: bool, out: &mut String) {
    let mut inner = String::new();
    for block in &item.content {
        render_block(block, tight, &mut inner);
    }

    out.push_str("<li>");
    let starts_with_text = tight && matches!(item.content.first(), Some(Block::Paragraph(_)));
    if starts_with_text && item.content.len() == 1 {
        out.push_str(inner.trim_end_matches('\n'));
    } else {
        if !starts_with_text && !inner.is_empty() {
            out.push('\n');
        }
        out.push_str(&inner);
    }
    out.push_str("</li>\n");
}

fn render_row(cells: &[Vec<Inline>], tag: &str, alignments: &[Alignment], out: &mut String) {
    out.push_str("<tr>\n");
    for (i, cell) in cells.iter().enumerate() {
        match alignments.get(i).and_then(|a| a.as_attr()) {
            Some(align) => out.push_str(&format!("<{tag} align=\"{align}\">")),
            None => out.push_str(&format!("<{tag}>")),
        }
        render_inlines(cell, out);
        out.push_str(&format!("</{tag}>\n"));
    }
    out.push_str("</tr>\n");
}

fn render_inlines(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        render_inline(inline, out);
    }
}

fn render_inline(inline: &Inline, out: &mut String) {
    match inline {
        Inline::Text(text) => out.push_str(&encode_text(text)),

        Inline::Strong(content) => {
            out.push_str("<strong>");
            render_inlines(content, out);
            out.push_str("</strong>");
        }

        Inline::Emphasis(content) => {
            out.push_str("<em>");
            render_inlines(content, out);
            out.push_str("</em>");
        }

        Inline::Code(code) => {
            out.push_str("<code>");
            out.push_str(&encode_text(code));
            out.push_str("</code>");
        }

        Inline::Link {
            content,
            url,
            title,
        } => {
            out.push_str("<a href=\"");
            out.push_str(&encode_double_quoted_attribute(url));
            out.push('"');
            push_title(title.as_deref(), out);
            out.push('>');
            render_inlines(content, out);
            out.push_str("</a>");
        }

        Inline::Image { alt, url, title } => {
            out.push_str("<img src=\"");
            out.push_str(&encode_double_quoted_attribute(url));
            out.push_str("\" alt=\"");
            out.push_str(&encode_double_quoted_attribute(alt));
            out.push('"');
            push_title(title.as_deref(), out);
            out.push('>');
        }

        Inline::LineBreak => out.push_str("<br>\n"),
    }
}

fn push_title(title: Option<&str>, out: &mut String) {
    if let Some(title) = title {
        out.push_str(" title=\"");
        out.push_str(&encode_double_quoted_attribute(title));
        out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::markdown_to_html;

    #[test]
    fn test_headings_and_paragraphs() {
        assert_eq!(
            markdown_to_html("# Title\n\nHello **world** & <you>"),
            "<h1>Title</h1>\n<p>Hello <strong>world</strong> &amp; &lt;you&gt;</p>\n"
        );
    }

    #[test]
    fn test_tight_and_loose_lists() {
        assert_eq!(
            markdown_to_html("- a\n- b\n    - c"),
            "<ul>\n<li>a</li>\n<li>b\n<ul>\n<li>c</li>\n</ul>\n</li>\n</ul>\n"
        );
        assert_eq!(
            markdown_to_html("3. a\n\n4. b"),
            "<ol start=\"3\">\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_code_block() {
        assert_eq!(
            markdown_to_html("```js\nif (a < b) {}\n```"),
            "<pre><code class=\"language-js\">if (a &lt; b) {}\n</code></pre>\n"
        );
    }

    #[test]
    fn test_blockquote_and_rule() {
        assert_eq!(
            markdown_to_html("> quoted\n\n---"),
            "<blockquote>\n<p>quoted</p>\n</blockquote>\n<hr>\n"
        );
    }

    #[test]
    fn test_links_images_breaks() {
        assert_eq!(
            markdown_to_html("[a](https://x.com?a=1&b=2 \"T\")  \n![i](/i.png)"),
            "<p><a href=\"https://x.com?a=1&amp;b=2\" title=\"T\">a</a><br>\n<img src=\"/i.png\" alt=\"i\"></p>\n"
        );
    }

    #[test]
    fn test_table() {
        assert_eq!(
            markdown_to_html("| A | B |\n| --- | :---: |\n| 1 | 2 |"),
            "<table>\n<thead>\n<tr>\n<th>A</th>\n<th align=\"center\">B</th>\n</tr>\n</thead>\n\
             <tbody>\n<tr>\n<td>1</td>\n<td align=\"center\">2</td>\n</tr>\n</tbody>\n</table>\n"
        );
    }

    #[test]
    fn test_render_ast_directly() {
        let ast = Block::Document(vec![Block::Paragraph(vec![Inline::Code("<b>".to_string())])]);
        assert_eq!(render_html(&ast), "<p><code>&lt;b&gt;</code></p>\n");
    }
}
