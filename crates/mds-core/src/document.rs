//! The parse result: an ordered, linked sequence of steps.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::node::ContentTree;
use crate::value::Metadata;

/// Identifier of the implicit step used when a document has no separators.
pub const DEFAULT_STEP_ID: &str = "default";

/// One addressable segment of an MDS document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Step identifier (`[a-z0-9-]+`, or `default`)
    pub id: String,
    /// Step-local metadata
    pub local: Metadata,
    /// Rendered step content
    pub body: ContentTree,
    /// Identifier of the previous step, `None` for the first
    pub prev: Option<String>,
    /// Identifier of the next step, `None` for the last
    pub next: Option<String>,
    /// 1-based position in the document
    pub position: usize,
}

impl Step {
    pub fn is_first(&self) -> bool {
        self.prev.is_none()
    }

    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// A parsed MDS document.
///
/// Built once by the parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier of the first step
    pub first_step_id: Option<String>,
    /// Steps keyed by identifier, in document order
    pub steps: IndexMap<String, Step>,
    /// Number of steps
    pub step_count: usize,
    /// Document-wide metadata, `None` when the document declares none
    pub global: Option<Metadata>,
}

impl Document {
    /// Assemble a document from steps in document order.
    pub fn from_steps(steps: Vec<Step>, global: Option<Metadata>) -> Self {
        let first_step_id = steps.first().map(|step| step.id.clone());
        let steps: IndexMap<String, Step> = steps
            .into_iter()
            .map(|step| (step.id.clone(), step))
            .collect();
        Self {
            first_step_id,
            step_count: steps.len(),
            steps,
            global,
        }
    }

    /// Look up a step by identifier.
    pub fn get(&self, id: &str) -> Option<&Step> {
        self.steps.get(id)
    }

    /// The first step.
    pub fn first(&self) -> Option<&Step> {
        self.first_step_id.as_deref().and_then(|id| self.get(id))
    }

    /// Walk the steps by following `next` links from the first step.
    pub fn iter(&self) -> StepIter<'_> {
        StepIter {
            document: self,
            current: self.first(),
            remaining: self.steps.len(),
        }
    }

    /// Look up a global metadata value.
    pub fn global_value(&self, key: &str) -> Option<&crate::value::MetaValue> {
        self.global.as_ref().and_then(|global| global.get(key))
    }

    pub fn len(&self) -> usize {
        self.step_count
    }

    pub fn is_empty(&self) -> bool {
        self.step_count == 0
    }
}

/// Iterator over the `next` chain of a [`Document`].
///
/// Bounded by the number of steps, so a malformed chain cannot loop forever.
pub struct StepIter<'a> {
    document: &'a Document,
    current: Option<&'a Step>,
    remaining: usize,
}

impl<'a> Iterator for StepIter<'a> {
    type Item = &'a Step;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let step = self.current?;
        self.remaining -= 1;
        self.current = step.next.as_deref().and_then(|id| self.document.get(id));
        Some(step)
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Step;
    type IntoIter = StepIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn keys(map: &Metadata) -> String {
    if map.is_empty() {
        "-".to_string()
    } else {
        map.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// One-line-per-step outline, used by the CLI.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "steps: {} (first: {})",
            self.step_count,
            self.first_step_id.as_deref().unwrap_or("-")
        )?;
        match &self.global {
            Some(global) => writeln!(f, "global: {}", keys(global))?,
            None => writeln!(f, "global: -")?,
        }
        for step in self.steps.values() {
            writeln!(
                f,
                "{}. {} [prev: {}, next: {}] local: {} | blocks: {}",
                step.position,
                step.id,
                step.prev.as_deref().unwrap_or("-"),
                step.next.as_deref().unwrap_or("-"),
                keys(&step.local),
                step.body.children().len()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn step(id: &str, position: usize, prev: Option<&str>, next: Option<&str>) -> Step {
        Step {
            id: id.to_string(),
            local: Metadata::new(),
            body: ContentTree::new(Node::root()),
            prev: prev.map(String::from),
            next: next.map(String::from),
            position,
        }
    }

    #[test]
    fn test_from_steps_counts_and_orders() {
        let doc = Document::from_steps(
            vec![
                step("b", 1, None, Some("a")),
                step("a", 2, Some("b"), None),
            ],
            None,
        );
        assert_eq!(doc.step_count, 2);
        assert_eq!(doc.first_step_id.as_deref(), Some("b"));
        let keys: Vec<_> = doc.steps.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_iter_follows_links() {
        let doc = Document::from_steps(
            vec![
                step("one", 1, None, Some("two")),
                step("two", 2, Some("one"), Some("three")),
                step("three", 3, Some("two"), None),
            ],
            None,
        );
        let ids: Vec<_> = doc.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["one", "two", "three"]);
        assert!(doc.first().unwrap().is_first());
        assert!(doc.get("three").unwrap().is_last());
    }

    #[test]
    fn test_iter_stops_on_cycle() {
        let doc = Document::from_steps(
            vec![
                step("one", 1, None, Some("two")),
                step("two", 2, Some("one"), Some("one")),
            ],
            None,
        );
        assert_eq!(doc.iter().count(), 2);
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::from_steps(Vec::new(), None);
        assert!(doc.is_empty());
        assert!(doc.first_step_id.is_none());
        assert!(doc.first().is_none());
        assert_eq!(doc.iter().count(), 0);
    }

    #[test]
    fn test_display_outline() {
        let mut global = Metadata::new();
        global.insert("theme".to_string(), "dark".into());
        let doc = Document::from_steps(vec![step(DEFAULT_STEP_ID, 1, None, None)], Some(global));
        assert_eq!(
            doc.to_string(),
            "steps: 1 (first: default)\nglobal: theme\n1. default [prev: -, next: -] local: - | blocks: 0\n"
        );
    }
}
