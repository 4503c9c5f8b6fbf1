//! Owned markdown syntax tree.
//!
//! [`Node`] is the generic block/inline tree produced by the markdown
//! tokenizer. Fenced blocks that name a registered component are replaced by
//! [`Node::Component`] during rewriting, and the finished tree of a step body
//! or rich-content block is wrapped in a [`ContentTree`].

use serde::{Deserialize, Serialize};

use crate::value::Metadata;

/// Column alignment of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

/// A single node of the markdown tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    // === Block-level ===
    Root {
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    Heading {
        level: u8,
        children: Vec<Node>,
    },
    BlockQuote {
        children: Vec<Node>,
    },
    List {
        ordered: bool,
        start: Option<u64>,
        children: Vec<Node>,
    },
    ListItem {
        checked: Option<bool>,
        children: Vec<Node>,
    },
    /// Fenced or indented code. `lang` is the first word of the info string,
    /// `meta` the rest of it.
    Code {
        lang: Option<String>,
        meta: Option<String>,
        value: String,
    },
    Math {
        value: String,
    },
    Html {
        value: String,
    },
    ThematicBreak,
    Table {
        align: Vec<Alignment>,
        children: Vec<Node>,
    },
    TableRow {
        header: bool,
        children: Vec<Node>,
    },
    TableCell {
        children: Vec<Node>,
    },
    FootnoteDefinition {
        label: String,
        children: Vec<Node>,
    },

    // === Inline ===
    Text {
        value: String,
    },
    Emphasis {
        children: Vec<Node>,
    },
    Strong {
        children: Vec<Node>,
    },
    Delete {
        children: Vec<Node>,
    },
    InlineCode {
        value: String,
    },
    InlineMath {
        value: String,
    },
    InlineHtml {
        value: String,
    },
    Break,
    Link {
        url: String,
        title: String,
        children: Vec<Node>,
    },
    Image {
        url: String,
        title: String,
        alt: String,
    },
    FootnoteReference {
        label: String,
    },

    // === Extension ===
    Component(ComponentNode),
}

/// A fenced block lifted out of the content flow because its header names a
/// registered component.
///
/// Exactly one of `data` (data-syntax blocks) or `children` (markdown-syntax
/// blocks) carries the block's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    /// Registered component name (first segment of the header)
    pub name: String,
    /// Header segments after the component name
    pub payload: Vec<String>,
    /// The untouched block body
    pub raw: String,
    /// Decoded body of a data-syntax block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Metadata>,
    /// Tokenized body of a markdown-syntax block
    #[serde(default)]
    pub children: Vec<Node>,
}

impl ComponentNode {
    /// Whether this component came from a data-syntax block.
    pub fn is_data(&self) -> bool {
        self.data.is_some()
    }
}

impl Node {
    /// Create an empty root node.
    pub fn root() -> Self {
        Node::Root {
            children: Vec::new(),
        }
    }

    /// Create a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    /// Short lowercase name of the node kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Root { .. } => "root",
            Node::Paragraph { .. } => "paragraph",
            Node::Heading { .. } => "heading",
            Node::BlockQuote { .. } => "blockquote",
            Node::List { .. } => "list",
            Node::ListItem { .. } => "listItem",
            Node::Code { .. } => "code",
            Node::Math { .. } => "math",
            Node::Html { .. } => "html",
            Node::ThematicBreak => "thematicBreak",
            Node::Table { .. } => "table",
            Node::TableRow { .. } => "tableRow",
            Node::TableCell { .. } => "tableCell",
            Node::FootnoteDefinition { .. } => "footnoteDefinition",
            Node::Text { .. } => "text",
            Node::Emphasis { .. } => "emphasis",
            Node::Strong { .. } => "strong",
            Node::Delete { .. } => "delete",
            Node::InlineCode { .. } => "inlineCode",
            Node::InlineMath { .. } => "inlineMath",
            Node::InlineHtml { .. } => "inlineHtml",
            Node::Break => "break",
            Node::Link { .. } => "link",
            Node::Image { .. } => "image",
            Node::FootnoteReference { .. } => "footnoteReference",
            Node::Component(_) => "component",
        }
    }

    /// Child nodes, or an empty slice for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Root { children }
            | Node::Paragraph { children }
            | Node::Heading { children, .. }
            | Node::BlockQuote { children }
            | Node::List { children, .. }
            | Node::ListItem { children, .. }
            | Node::Table { children, .. }
            | Node::TableRow { children, .. }
            | Node::TableCell { children }
            | Node::FootnoteDefinition { children, .. }
            | Node::Emphasis { children }
            | Node::Strong { children }
            | Node::Delete { children }
            | Node::Link { children, .. } => children,
            Node::Component(component) => &component.children,
            _ => &[],
        }
    }

    /// Mutable child list for container nodes, `None` for leaves.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Root { children }
            | Node::Paragraph { children }
            | Node::Heading { children, .. }
            | Node::BlockQuote { children }
            | Node::List { children, .. }
            | Node::ListItem { children, .. }
            | Node::Table { children, .. }
            | Node::TableRow { children, .. }
            | Node::TableCell { children }
            | Node::FootnoteDefinition { children, .. }
            | Node::Emphasis { children }
            | Node::Strong { children }
            | Node::Delete { children }
            | Node::Link { children, .. } => Some(children),
            Node::Component(component) => Some(&mut component.children),
            _ => None,
        }
    }

    /// Concatenated literal text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { value }
            | Node::InlineCode { value }
            | Node::InlineMath { value }
            | Node::Code { value, .. }
            | Node::Math { value } => out.push_str(value),
            Node::Image { alt, .. } => out.push_str(alt),
            Node::Break => out.push('\n'),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Visit this node and all descendants, depth first, parents before
    /// children.
    pub fn walk<'a>(&'a self, visitor: &mut impl FnMut(&'a Node)) {
        visitor(self);
        for child in self.children() {
            child.walk(visitor);
        }
    }

    /// All component nodes in this subtree, in document order.
    pub fn components(&self) -> Vec<&ComponentNode> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if let Node::Component(component) = node {
                found.push(component);
            }
        });
        found
    }
}

/// Finalized, renderable markdown content.
///
/// Wraps the root [`Node`] of a step body or a rich-content metadata block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "content")]
pub struct ContentTree {
    node: Node,
}

impl ContentTree {
    /// Wrap a finalized root node.
    pub fn new(node: Node) -> Self {
        Self { node }
    }

    /// The root node.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Top-level children of the root.
    pub fn children(&self) -> &[Node] {
        self.node.children()
    }

    /// Whether the tree has no content at all.
    pub fn is_empty(&self) -> bool {
        self.node.children().is_empty()
    }

    /// All component nodes in the tree, in document order.
    pub fn components(&self) -> Vec<&ComponentNode> {
        self.node.components()
    }

    /// Find the first top-level component with the given name.
    pub fn component(&self, name: &str) -> Option<&ComponentNode> {
        self.children().iter().find_map(|child| match child {
            Node::Component(component) if component.name == name => Some(component),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::Root {
            children: vec![
                Node::Heading {
                    level: 1,
                    children: vec![Node::text("Title")],
                },
                Node::Paragraph {
                    children: vec![
                        Node::text("Some "),
                        Node::Strong {
                            children: vec![Node::text("bold")],
                        },
                        Node::text(" text."),
                    ],
                },
                Node::Component(ComponentNode {
                    name: "card".to_string(),
                    payload: vec![],
                    raw: "Inside".to_string(),
                    data: None,
                    children: vec![Node::Paragraph {
                        children: vec![Node::text("Inside")],
                    }],
                }),
            ],
        }
    }

    #[test]
    fn test_text_content() {
        let node = sample();
        assert_eq!(node.text_content(), "TitleSome bold text.Inside");
    }

    #[test]
    fn test_walk_visits_parents_first() {
        let node = sample();
        let mut kinds = Vec::new();
        node.walk(&mut |n| kinds.push(n.kind()));
        assert_eq!(
            kinds,
            vec![
                "root",
                "heading",
                "text",
                "paragraph",
                "text",
                "strong",
                "text",
                "text",
                "component",
                "paragraph",
                "text"
            ]
        );
    }

    #[test]
    fn test_children_of_leaf_is_empty() {
        assert!(Node::ThematicBreak.children().is_empty());
        assert!(Node::text("x").children().is_empty());
        assert!(Node::text("x").children_mut().is_none());
    }

    #[test]
    fn test_content_tree_component_lookup() {
        let tree = ContentTree::new(sample());
        assert_eq!(tree.children().len(), 3);
        assert!(tree.component("card").is_some());
        assert!(tree.component("quiz").is_none());
        assert_eq!(tree.components().len(), 1);
        assert!(!tree.components()[0].is_data());
    }

    #[test]
    fn test_node_serializes_with_type_tag() {
        let json = serde_json::to_value(Node::Heading {
            level: 2,
            children: vec![Node::text("Hi")],
        })
        .unwrap();
        assert_eq!(json["type"], "heading");
        assert_eq!(json["level"], 2);
        assert_eq!(json["children"][0]["type"], "text");
        assert_eq!(json["children"][0]["value"], "Hi");
    }

    #[test]
    fn test_content_tree_serializes_wrapped() {
        let json = serde_json::to_value(ContentTree::new(Node::root())).unwrap();
        assert_eq!(json["type"], "content");
        assert_eq!(json["node"]["type"], "root");
    }
}
