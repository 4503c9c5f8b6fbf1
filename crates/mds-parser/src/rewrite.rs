//! Component rewriting.
//!
//! Walks a tokenized tree and replaces every code node whose header names a
//! registered component with a [`Node::Component`]. Child vectors are rebuilt
//! as the walk returns, so replacement never mutates a list while it is being
//! iterated.

use log::trace;
use mds_core::{BlockLang, ComponentNode, Node, Result};

use crate::decode::decode_mapping;
use crate::header::component_header;
use crate::markdown::Markdown;
use crate::registry::ComponentRegistry;

/// Replaces registered component blocks in a tree.
pub struct Rewriter<'a> {
    markdown: &'a Markdown,
    registry: &'a ComponentRegistry,
}

impl<'a> Rewriter<'a> {
    pub fn new(markdown: &'a Markdown, registry: &'a ComponentRegistry) -> Self {
        Self { markdown, registry }
    }

    /// Rewrite `node` and everything below it.
    pub fn rewrite(&self, node: Node) -> Result<Node> {
        match node {
            Node::Code { lang, meta, value } => self.rewrite_code(lang, meta, value),
            mut node => {
                if let Some(children) = node.children_mut() {
                    let taken = std::mem::take(children);
                    *children = taken
                        .into_iter()
                        .map(|child| self.rewrite(child))
                        .collect::<Result<Vec<_>>>()?;
                }
                Ok(node)
            }
        }
    }

    fn rewrite_code(
        &self,
        lang: Option<String>,
        meta: Option<String>,
        value: String,
    ) -> Result<Node> {
        let header = lang
            .as_deref()
            .and_then(|lang| component_header(lang, meta.as_deref()))
            .filter(|header| self.registry.contains(header.name))
            .map(|header| {
                (
                    header.lang,
                    header.name.to_string(),
                    header
                        .payload
                        .iter()
                        .map(|segment| segment.to_string())
                        .collect::<Vec<_>>(),
                )
            });

        let Some((block_lang, name, payload)) = header else {
            return Ok(Node::Code { lang, meta, value });
        };

        trace!("component `{}` ({}) payload {:?}", name, block_lang, payload);

        let component = match block_lang {
            BlockLang::Data => {
                let label = format!(
                    "{} {}",
                    lang.as_deref().unwrap_or_default(),
                    meta.as_deref().unwrap_or_default()
                );
                let data = decode_mapping(&value, &label)?.unwrap_or_default();
                ComponentNode {
                    name,
                    payload,
                    raw: value,
                    data: Some(data),
                    children: Vec::new(),
                }
            }
            BlockLang::Markdown => ComponentNode {
                name,
                payload,
                children: self.markdown.tokenize_children(&value),
                raw: value,
                data: None,
            },
        };

        Ok(Node::Component(component))
    }
}
