//! MDS Parser
//!
//! Parses MDS step documents: markdown split into linked steps by `+++id`
//! separator lines, with step-local (`@`) and document-wide (`@@`) metadata
//! carried in fenced data and rich-content blocks, and registered components
//! lifted out of the content flow.
//!
//! # Overview
//!
//! Parsing runs in a fixed order:
//!
//! 1. global metadata blocks are extracted from the whole input
//! 2. the remaining text is split into steps at separator lines
//! 3. each step's local metadata blocks are extracted
//! 4. what is left of each step goes through the markdown pipeline
//!
//! # Example
//!
//! ```
//! use mds_parser::{parse, ComponentRegistry};
//!
//! let source = "```yaml @@\ntheme: dark\n```\n\n+++intro\n# Welcome\n\n+++next\nMore text\n";
//!
//! let doc = parse(source, &ComponentRegistry::new()).unwrap();
//! assert_eq!(doc.first_step_id.as_deref(), Some("intro"));
//! assert_eq!(doc.step_count, 2);
//! assert_eq!(doc.global_value("theme").unwrap(), &"dark");
//! assert_eq!(doc.get("intro").unwrap().next.as_deref(), Some("next"));
//! ```

pub mod decode;
pub mod extract;
pub mod fence;
pub mod header;
pub mod markdown;
pub mod registry;
pub mod rewrite;
pub mod segment;

pub use extract::{extract, Extraction};
pub use fence::{is_inside_fence, FenceTracker};
pub use markdown::Markdown;
pub use registry::ComponentRegistry;
pub use rewrite::Rewriter;
pub use segment::{segment, StepSlice, STEP_MARKER};

use log::debug;
use mds_config::Config;
use mds_core::{Document, Result, Scope, Step};

/// Step document parser.
///
/// Holds the markdown extensions and the component registry; both are fixed
/// for the parser's lifetime, so a `Parser` can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    markdown: Markdown,
    components: ComponentRegistry,
}

impl Parser {
    /// Parser with default markdown extensions and no components.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser with default markdown extensions and the given components.
    pub fn with_components(components: ComponentRegistry) -> Self {
        Self {
            markdown: Markdown::new(),
            components,
        }
    }

    /// Parser configured from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self {
            markdown: Markdown::from_config(&config.markdown),
            components: ComponentRegistry::from_config(&config.components),
        }
    }

    pub fn markdown(&self) -> &Markdown {
        &self.markdown
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Parse a complete document.
    ///
    /// Fails on the first invalid or duplicate step id or undecodable data
    /// block; there is no partial result.
    pub fn parse(&self, source: &str) -> Result<Document> {
        let global = extract(source, Scope::Global, &self.markdown, &self.components)?;
        let global_metadata = (!global.metadata.is_empty()).then_some(global.metadata);

        let steps = segment(&global.remaining)?
            .into_iter()
            .map(|slice| self.build_step(slice))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "parsed {} steps, {} global keys",
            steps.len(),
            global_metadata.as_ref().map_or(0, |map| map.len())
        );

        Ok(Document::from_steps(steps, global_metadata))
    }

    fn build_step(&self, slice: StepSlice<'_>) -> Result<Step> {
        let Extraction {
            metadata,
            remaining,
        } = extract(slice.content, Scope::Local, &self.markdown, &self.components)?;
        let body = self.markdown.render(&remaining, &self.components)?;

        Ok(Step {
            id: slice.id,
            local: metadata,
            body,
            prev: slice.prev,
            next: slice.next,
            position: slice.position,
        })
    }
}

/// Parse `source` with default markdown extensions and the given components.
pub fn parse(source: &str, components: &ComponentRegistry) -> Result<Document> {
    Parser::with_components(components.clone()).parse(source)
}
