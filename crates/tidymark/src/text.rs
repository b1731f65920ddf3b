//! Plain-text extraction from a markup tree

use crate::node::{Node, NodeType};
use crate::tag::Tag;

/// Visible text of a markup tree.
///
/// Text nodes are concatenated without collapsing whitespace. Block-level
/// elements end a line, `<br>` becomes a newline and adjacent table cells are
/// separated by a tab. Trailing newlines are removed.
///
/// # Example
///
/// ```rust
/// use tidymark::{extract_text, parse_html};
///
/// assert_eq!(extract_text(&parse_html("<p>A</p><p>B</p>")), "A\nB");
/// ```
pub fn extract_text(tree: &Node) -> String {
    let mut out = String::new();
    walk(tree, &mut out);
    let kept = out.trim_end_matches('\n').len();
    out.truncate(kept);
    out
}

fn walk(node: &Node, out: &mut String) {
    match node.node_type {
        NodeType::Text => out.push_str(node.value.as_deref().unwrap_or_default()),
        NodeType::Comment => {}
        NodeType::Document => walk_children(node, out),
        NodeType::Element => {
            let tag = node.tag();
            match tag {
                Tag::LineBreak => out.push('\n'),
                Tag::Pruned => {}
                Tag::TableRow => walk_row(node, out),
                _ => walk_children(node, out),
            }
            if tag.ends_line() && !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
        }
    }
}

fn walk_children(node: &Node, out: &mut String) {
    for child in node.children() {
        walk(child, out);
    }
}

fn walk_row(row: &Node, out: &mut String) {
    let mut first_cell = true;
    for child in row.children() {
        if matches!(child.tag(), Tag::HeaderCell | Tag::DataCell) {
            if !first_cell {
                out.push('\t');
            }
            first_cell = false;
        }
        walk(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;

    fn text_of(html: &str) -> String {
        extract_text(&parse_html(html))
    }

    #[test]
    fn test_block_boundaries() {
        assert_eq!(text_of("<p>A</p><p>B</p>"), "A\nB");
        assert_eq!(text_of("<h1>Title</h1><div>body</div>"), "Title\nbody");
        assert_eq!(text_of("<ul><li>one</li><li>two</li></ul>"), "one\ntwo");
    }

    #[test]
    fn test_inline_content_stays_on_line() {
        assert_eq!(
            text_of("<p>Hello <b>bold</b> and <a href=\"x\">link</a></p>"),
            "Hello bold and link"
        );
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(text_of("<p>a<br>b</p>"), "a\nb");
    }

    #[test]
    fn test_table_cells() {
        assert_eq!(
            text_of("<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>"),
            "A\tB\n1\t2"
        );
    }

    #[test]
    fn test_whitespace_is_preserved() {
        assert_eq!(text_of("<pre>  x\n    y</pre>"), "  x\n    y");
        assert_eq!(text_of("<span>a  b</span>"), "a  b");
    }

    #[test]
    fn test_scripts_and_comments_are_skipped() {
        assert_eq!(text_of("<p>a<!-- c --></p><script>b()</script>"), "a");
    }

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(text_of("<p>&lt;tag&gt; &amp; &copy;</p>"), "<tag> & ©");
    }
}
