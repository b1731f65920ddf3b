//! Markup tree produced by HTML parsing.
//!
//! Children are owned by their parent, so a tree has no back-references and
//! traversal order is document order. Any parser can build this structure;
//! [`crate::parse_html`] builds it from an HTML string.

use indexmap::IndexMap;

use crate::tag::Tag;

/// Kind of a markup node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
    Comment,
    /// Root of a parsed document or fragment
    Document,
}

/// A node of the markup tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub node_type: NodeType,

    /// Lowercase tag name for elements, `#text`, `#comment` or `#document` otherwise
    pub name: String,

    /// Character data for text and comment nodes
    pub value: Option<String>,

    /// Attributes in source order; setting an existing key replaces its value
    pub attributes: IndexMap<String, String>,

    pub children: Vec<Node>,
}

impl Node {
    fn new(node_type: NodeType, name: &str, value: Option<&str>) -> Self {
        Self {
            node_type,
            name: name.to_string(),
            value: value.map(str::to_string),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self::new(NodeType::Element, &tag_name.to_ascii_lowercase(), None)
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs<'a>(
        tag_name: &str,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut node = Self::element(tag_name);
        for (name, value) in attrs {
            node.set_attr(name, value);
        }
        node
    }

    pub fn text(content: &str) -> Self {
        Self::new(NodeType::Text, "#text", Some(content))
    }

    pub fn comment(content: &str) -> Self {
        Self::new(NodeType::Comment, "#comment", Some(content))
    }

    pub fn document() -> Self {
        Self::new(NodeType::Document, "#document", None)
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn tag_name(&self) -> &str {
        &self.name
    }

    /// Classified tag of an element; non-elements map to [`Tag::Other`]
    pub fn tag(&self) -> Tag {
        if self.is_element() {
            Tag::from_name(&self.name)
        } else {
            Tag::Other
        }
    }

    /// Get an attribute value by name (case-insensitive)
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Set an attribute, replacing any previous value for the same key
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(self.value.as_deref().unwrap_or_default()),
            NodeType::Comment => {}
            NodeType::Element | NodeType::Document => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_element() {
        let node = Node::element("DIV");
        assert!(node.is_element());
        assert_eq!(node.tag_name(), "div");
        assert_eq!(node.tag(), Tag::Container);
    }

    #[test]
    fn test_create_text() {
        let node = Node::text("Hello World");
        assert_eq!(node.node_type, NodeType::Text);
        assert_eq!(node.text_content(), "Hello World");
        assert_eq!(node.tag(), Tag::Other);
    }

    #[test]
    fn test_attributes_last_write_wins() {
        let mut node = Node::element_with_attrs(
            "a",
            [("href", "https://example.com"), ("title", "Example")],
        );
        node.set_attr("HREF", "https://other.com");
        assert_eq!(node.attr("href"), Some("https://other.com"));
        assert_eq!(node.attr("Title"), Some("Example"));
        assert_eq!(node.attr("class"), None);
        assert_eq!(node.attributes.len(), 2);
        assert_eq!(node.attributes.keys().next().map(String::as_str), Some("href"));
    }

    #[test]
    fn test_children() {
        let mut parent = Node::element("div");
        parent.add_child(Node::text("Hello"));
        parent.add_child(Node::element("span"));
        parent.add_child(Node::comment("note"));

        assert_eq!(parent.children().count(), 3);
        assert_eq!(parent.element_children().count(), 1);
    }

    #[test]
    fn test_text_content_skips_comments() {
        let mut div = Node::element("div");
        div.add_child(Node::text("Hello "));
        div.add_child(Node::comment("hidden"));
        let mut span = Node::element("span");
        span.add_child(Node::text("World"));
        div.add_child(span);

        assert_eq!(div.text_content(), "Hello World");
    }
}
