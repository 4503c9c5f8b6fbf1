//! Markdown pipeline.
//!
//! Text is tokenized with pulldown-cmark into an owned [`Node`] tree, run
//! through the component rewriter, and finalized into a [`ContentTree`].
//!
//! # Example
//!
//! ```
//! use mds_parser::{ComponentRegistry, Markdown};
//!
//! let markdown = Markdown::new();
//! let tree = markdown.render("# Hello", &ComponentRegistry::new()).unwrap();
//! assert_eq!(tree.children()[0].kind(), "heading");
//! ```

use mds_config::MarkdownConfig;
use mds_core::{Alignment, ContentTree, Node, Result};
use pulldown_cmark::{
    Alignment as CmarkAlignment, CodeBlockKind, Event, HeadingLevel, Options,
    Parser as CmarkParser, Tag,
};

use crate::header::split_info;
use crate::registry::ComponentRegistry;
use crate::rewrite::Rewriter;

/// Markdown tokenizer configured with a set of extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markdown {
    options: Options,
}

impl Default for Markdown {
    fn default() -> Self {
        Self::from_config(&MarkdownConfig::default())
    }
}

impl Markdown {
    /// Tokenizer with the default extensions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenizer with the extensions selected in `config`.
    pub fn from_config(config: &MarkdownConfig) -> Self {
        let mut options = Options::empty();
        if config.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if config.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if config.task_lists {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        if config.footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        if config.math {
            options.insert(Options::ENABLE_MATH);
        }
        if config.smart_punctuation {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        if config.heading_attributes {
            options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        Self { options }
    }

    /// The pulldown-cmark options in effect.
    pub fn options(&self) -> Options {
        self.options
    }

    /// Tokenize `text` into a [`Node::Root`].
    pub fn tokenize(&self, text: &str) -> Node {
        let mut builder = TreeBuilder::new();
        for event in CmarkParser::new_ext(text, self.options) {
            builder.event(event);
        }
        builder.finish()
    }

    /// Tokenize `text` and return the root's children.
    pub fn tokenize_children(&self, text: &str) -> Vec<Node> {
        match self.tokenize(text) {
            Node::Root { children } => children,
            other => vec![other],
        }
    }

    /// Normalize a rewritten tree into renderable content.
    pub fn finalize(&self, mut node: Node) -> ContentTree {
        merge_text(&mut node);
        ContentTree::new(node)
    }

    /// Full pipeline: tokenize, rewrite components, finalize.
    pub fn render(&self, text: &str, registry: &ComponentRegistry) -> Result<ContentTree> {
        let tree = self.tokenize(text);
        let tree = Rewriter::new(self, registry).rewrite(tree)?;
        Ok(self.finalize(tree))
    }
}

// =============================================================================
// Tree building
// =============================================================================

/// A container being filled while its start/end events are open.
#[derive(Debug)]
enum Frame {
    Root,
    Paragraph,
    Heading(u8),
    BlockQuote,
    List(Option<u64>),
    Item { checked: Option<bool> },
    Code { info: Option<String>, value: String },
    Html(String),
    Table(Vec<Alignment>),
    TableHead,
    TableRow,
    TableCell,
    FootnoteDefinition(String),
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String, title: String },
    Image { url: String, title: String },
    /// Containers without a node of their own; children go to the parent
    Transparent,
}

impl Frame {
    fn from_tag(tag: Tag<'_>) -> Self {
        match tag {
            Tag::Paragraph => Frame::Paragraph,
            Tag::Heading { level, .. } => Frame::Heading(heading_level_to_u8(level)),
            Tag::BlockQuote(_) => Frame::BlockQuote,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => Frame::Code {
                info: Some(info.to_string()),
                value: String::new(),
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => Frame::Code {
                info: None,
                value: String::new(),
            },
            Tag::HtmlBlock => Frame::Html(String::new()),
            Tag::List(start) => Frame::List(start),
            Tag::Item => Frame::Item { checked: None },
            Tag::FootnoteDefinition(label) => Frame::FootnoteDefinition(label.to_string()),
            Tag::Table(aligns) => Frame::Table(aligns.into_iter().map(alignment).collect()),
            Tag::TableHead => Frame::TableHead,
            Tag::TableRow => Frame::TableRow,
            Tag::TableCell => Frame::TableCell,
            Tag::Emphasis => Frame::Emphasis,
            Tag::Strong => Frame::Strong,
            Tag::Strikethrough => Frame::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => Frame::Link {
                url: dest_url.to_string(),
                title: title.to_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => Frame::Image {
                url: dest_url.to_string(),
                title: title.to_string(),
            },
            _ => Frame::Transparent,
        }
    }

    /// Close the frame. `Err` hands the children back for splicing into the
    /// parent.
    fn into_node(self, children: Vec<Node>) -> std::result::Result<Node, Vec<Node>> {
        let node = match self {
            Frame::Root => Node::Root { children },
            Frame::Paragraph => Node::Paragraph { children },
            Frame::Heading(level) => Node::Heading { level, children },
            Frame::BlockQuote => Node::BlockQuote { children },
            Frame::List(start) => Node::List {
                ordered: start.is_some(),
                start,
                children,
            },
            Frame::Item { checked } => Node::ListItem { checked, children },
            Frame::Code { info, mut value } => {
                if value.ends_with('\n') {
                    value.pop();
                }
                let (lang, meta) = match info.as_deref().map(split_info) {
                    Some((lang, meta)) if !lang.is_empty() => {
                        (Some(lang.to_string()), meta.map(str::to_string))
                    }
                    _ => (None, None),
                };
                Node::Code { lang, meta, value }
            }
            Frame::Html(value) => Node::Html {
                value: value.trim_end_matches('\n').to_string(),
            },
            Frame::Table(align) => Node::Table { align, children },
            Frame::TableHead => Node::TableRow {
                header: true,
                children,
            },
            Frame::TableRow => Node::TableRow {
                header: false,
                children,
            },
            Frame::TableCell => Node::TableCell { children },
            Frame::FootnoteDefinition(label) => Node::FootnoteDefinition { label, children },
            Frame::Emphasis => Node::Emphasis { children },
            Frame::Strong => Node::Strong { children },
            Frame::Strikethrough => Node::Delete { children },
            Frame::Link { url, title } => Node::Link {
                url,
                title,
                children,
            },
            Frame::Image { url, title } => Node::Image {
                url,
                title,
                alt: children.iter().map(Node::text_content).collect(),
            },
            Frame::Transparent => return Err(children),
        };
        Ok(node)
    }
}

#[derive(Debug)]
struct Open {
    frame: Frame,
    children: Vec<Node>,
}

/// Folds a pulldown-cmark event stream into a [`Node`] tree.
struct TreeBuilder {
    stack: Vec<Open>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Open {
                frame: Frame::Root,
                children: Vec::new(),
            }],
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.stack.push(Open {
                frame: Frame::from_tag(tag),
                children: Vec::new(),
            }),
            Event::End(_) => self.close(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push(Node::InlineCode {
                value: code.to_string(),
            }),
            Event::InlineMath(math) => self.push(Node::InlineMath {
                value: math.to_string(),
            }),
            Event::DisplayMath(math) => self.push(Node::Math {
                value: math.trim().to_string(),
            }),
            Event::Html(html) => self.text(&html),
            Event::InlineHtml(html) => self.push(Node::InlineHtml {
                value: html.to_string(),
            }),
            Event::FootnoteReference(label) => self.push(Node::FootnoteReference {
                label: label.to_string(),
            }),
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.push(Node::Break),
            Event::Rule => self.push(Node::ThematicBreak),
            Event::TaskListMarker(done) => {
                let item = self.stack.iter_mut().rev().find_map(|open| match &mut open.frame {
                    Frame::Item { checked } => Some(checked),
                    _ => None,
                });
                if let Some(checked) = item {
                    *checked = Some(done);
                }
            }
        }
    }

    fn push(&mut self, node: Node) {
        if let Some(top) = self.stack.last_mut() {
            top.children.push(node);
        }
    }

    /// Literal text goes into the open code or html block, otherwise it
    /// becomes a text node.
    fn text(&mut self, text: &str) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        match &mut top.frame {
            Frame::Code { value, .. } | Frame::Html(value) => value.push_str(text),
            _ => top.children.push(Node::text(text)),
        }
    }

    fn close(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(open) = self.stack.pop() else {
            return;
        };
        match open.frame.into_node(open.children) {
            Ok(node) => self.push(node),
            Err(children) => {
                if let Some(top) = self.stack.last_mut() {
                    top.children.extend(children);
                }
            }
        }
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.close();
        }
        let children = self
            .stack
            .pop()
            .map(|open| open.children)
            .unwrap_or_default();
        Node::Root { children }
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn alignment(align: CmarkAlignment) -> Alignment {
    match align {
        CmarkAlignment::None => Alignment::None,
        CmarkAlignment::Left => Alignment::Left,
        CmarkAlignment::Center => Alignment::Center,
        CmarkAlignment::Right => Alignment::Right,
    }
}

/// Merge runs of adjacent text nodes, recursively.
fn merge_text(node: &mut Node) {
    let Some(children) = node.children_mut() else {
        return;
    };
    let mut merged: Vec<Node> = Vec::with_capacity(children.len());
    for mut child in std::mem::take(children) {
        merge_text(&mut child);
        if let Node::Text { value } = &child {
            if let Some(Node::Text { value: previous }) = merged.last_mut() {
                previous.push_str(value);
                continue;
            }
        }
        merged.push(child);
    }
    *children = merged;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> ContentTree {
        Markdown::new()
            .render(text, &ComponentRegistry::new())
            .unwrap()
    }

    #[test]
    fn test_heading_and_paragraph() {
        let tree = render("# Title\n\nSome *emphasis* here.");
        let children = tree.children();
        assert_eq!(children.len(), 2);
        assert_eq!(
            children[0],
            Node::Heading {
                level: 1,
                children: vec![Node::text("Title")]
            }
        );
        assert_eq!(children[1].kind(), "paragraph");
        assert_eq!(children[1].text_content(), "Some emphasis here.");
    }

    #[test]
    fn test_code_block_lang_and_meta() {
        let tree = render("```js title=\"a.js\"\nlet a = 1;\n```");
        assert_eq!(
            tree.children()[0],
            Node::Code {
                lang: Some("js".to_string()),
                meta: Some("title=\"a.js\"".to_string()),
                value: "let a = 1;".to_string(),
            }
        );
    }

    #[test]
    fn test_code_block_without_info() {
        let tree = render("```\nplain\n```");
        assert_eq!(
            tree.children()[0],
            Node::Code {
                lang: None,
                meta: None,
                value: "plain".to_string(),
            }
        );
    }

    #[test]
    fn test_soft_breaks_merge_into_text() {
        let tree = render("one\ntwo");
        assert_eq!(
            tree.children()[0],
            Node::Paragraph {
                children: vec![Node::text("one\ntwo")]
            }
        );
    }

    #[test]
    fn test_task_list() {
        let tree = render("- [x] done\n- [ ] todo");
        let Node::List { ordered, children, .. } = &tree.children()[0] else {
            panic!("expected a list");
        };
        assert!(!ordered);
        let checked: Vec<_> = children
            .iter()
            .map(|item| match item {
                Node::ListItem { checked, .. } => *checked,
                _ => None,
            })
            .collect();
        assert_eq!(checked, vec![Some(true), Some(false)]);
    }

    #[test]
    fn test_ordered_list_start() {
        let tree = render("3. three\n4. four");
        assert!(matches!(
            tree.children()[0],
            Node::List {
                ordered: true,
                start: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn test_table() {
        let tree = render("| a | b |\n|:--|--:|\n| 1 | 2 |");
        let Node::Table { align, children } = &tree.children()[0] else {
            panic!("expected a table");
        };
        assert_eq!(align, &vec![Alignment::Left, Alignment::Right]);
        assert_eq!(children.len(), 2);
        assert!(matches!(children[0], Node::TableRow { header: true, .. }));
        assert_eq!(children[1].text_content(), "12");
    }

    #[test]
    fn test_inline_math() {
        let tree = render("Euler: $e^{i\\pi}$");
        let inline: Vec<_> = tree.children()[0]
            .children()
            .iter()
            .map(Node::kind)
            .collect();
        assert_eq!(inline, vec!["text", "inlineMath"]);
    }

    #[test]
    fn test_link_and_image() {
        let tree = render("[site](https://example.com \"Home\") ![logo](logo.png)");
        let paragraph = tree.children()[0].children();
        assert_eq!(
            paragraph[0],
            Node::Link {
                url: "https://example.com".to_string(),
                title: "Home".to_string(),
                children: vec![Node::text("site")],
            }
        );
        assert_eq!(
            paragraph[2],
            Node::Image {
                url: "logo.png".to_string(),
                title: String::new(),
                alt: "logo".to_string(),
            }
        );
    }

    #[test]
    fn test_config_disables_extensions() {
        let config = MarkdownConfig {
            strikethrough: false,
            ..MarkdownConfig::default()
        };
        let markdown = Markdown::from_config(&config);
        let root = markdown.tokenize("~~gone~~");
        assert!(!root.children()[0]
            .children()
            .iter()
            .any(|node| node.kind() == "delete"));
        let root = Markdown::new().tokenize("~~gone~~");
        assert_eq!(root.children()[0].children()[0].kind(), "delete");
    }

    #[test]
    fn test_from_config_options() {
        let options = Markdown::new().options();
        assert!(options.contains(Options::ENABLE_TABLES | Options::ENABLE_MATH));
        assert!(!options.contains(Options::ENABLE_SMART_PUNCTUATION));

        let config = MarkdownConfig {
            tables: false,
            smart_punctuation: true,
            ..MarkdownConfig::default()
        };
        let options = Markdown::from_config(&config).options();
        assert!(!options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_SMART_PUNCTUATION));
        assert!(options.contains(Options::ENABLE_FOOTNOTES));
    }

    #[test]
    fn test_empty_text() {
        assert!(render("").is_empty());
        assert!(render("   \n\n").is_empty());
    }
}
