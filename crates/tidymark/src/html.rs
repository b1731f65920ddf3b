//! HTML parsing support.
//!
//! Parses HTML strings with the html5ever-backed `scraper` crate, which
//! repairs malformed markup the way a browser does, and converts the result
//! to the [`Node`] tree used by every converter.

use log::debug;
use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;
use crate::tag::PRUNED;

/// Element depth beyond which descendants are folded into one text node
pub const MAX_DEPTH: usize = 256;

/// Parse an HTML string into a Node tree.
///
/// `script`, `style`, `iframe` and `noscript` subtrees are dropped. The root
/// is a [`crate::NodeType::Document`] node holding the parsed fragment.
///
/// # Example
///
/// ```rust
/// use tidymark::parse_html;
///
/// let tree = parse_html("<h1>Hello <em>World</em></h1><script>x()</script>");
/// assert_eq!(tree.children.len(), 1);
/// assert_eq!(tree.text_content(), "Hello World");
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    let mut root = Node::document();
    append_children(&mut root, document.root_element(), 0);
    root
}

fn append_children(parent: &mut Node, element: ElementRef, depth: usize) {
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                parent.add_child(Node::text(&text.text));
            }
            ScraperNode::Comment(comment) => {
                parent.add_child(Node::comment(&comment.comment));
            }
            ScraperNode::Element(el) => {
                if PRUNED.contains(&el.name()) {
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    parent.add_child(scraper_to_node(child_element, depth + 1));
                }
            }
            _ => {}
        }
    }
}

/// Convert a scraper ElementRef to our Node structure
fn scraper_to_node(element: ElementRef, depth: usize) -> Node {
    let mut node = Node::element_with_attrs(element.value().name(), element.value().attrs());

    if depth >= MAX_DEPTH {
        debug!(
            "nesting limit reached at <{}>, folding subtree into text",
            node.tag_name()
        );
        let text: String = element.text().collect();
        if !text.is_empty() {
            node.add_child(Node::text(&text));
        }
        return node;
    }

    append_children(&mut node, element, depth);
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;

    #[test]
    fn test_parse_simple_html() {
        let tree = parse_html("<p>Hello World</p>");
        assert_eq!(tree.node_type, NodeType::Document);
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].tag_name(), "p");
    }

    #[test]
    fn test_entities_are_decoded() {
        let tree = parse_html("<p>Fish &amp; Chips &lt;3</p>");
        assert_eq!(tree.text_content(), "Fish & Chips <3");
    }

    #[test]
    fn test_prunes_non_content_elements() {
        let tree = parse_html(
            "<div>keep<script>drop()</script><style>p{}</style>\
             <noscript>drop</noscript><iframe src=\"x\"></iframe></div>",
        );
        assert_eq!(tree.text_content(), "keep");
        assert_eq!(tree.children[0].children.len(), 1);
    }

    #[test]
    fn test_malformed_html_is_repaired() {
        let tree = parse_html("<p>one<p>two <b>bold</i> < stray");
        let paragraphs: Vec<_> = tree.element_children().collect();
        assert_eq!(paragraphs.len(), 2);
        assert!(tree.text_content().contains("< stray"));
    }

    #[test]
    fn test_attributes_and_void_elements() {
        let tree = parse_html(r#"<img src="a.png" alt="A"><br><a href="/x" title="T">x</a>"#);
        let img = &tree.children[0];
        assert_eq!(img.tag_name(), "img");
        assert_eq!(img.attr("src"), Some("a.png"));
        assert!(img.children.is_empty());
        assert_eq!(tree.children[2].attr("title"), Some("T"));
    }

    #[test]
    fn test_comments_are_kept_as_nodes() {
        let tree = parse_html("<p>a<!-- note -->b</p>");
        let p = &tree.children[0];
        assert_eq!(p.children[1].node_type, NodeType::Comment);
        assert_eq!(p.text_content(), "ab");
    }

    #[test]
    fn test_deep_nesting_is_bounded() {
        let depth = MAX_DEPTH + 50;
        let html = format!("{}deep{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let tree = parse_html(&html);

        let mut levels = 0;
        let mut node = &tree;
        while let Some(child) = node.element_children().next() {
            node = child;
            levels += 1;
        }
        assert!(levels <= MAX_DEPTH);
        assert_eq!(tree.text_content(), "deep");
    }
}
