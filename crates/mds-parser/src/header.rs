//! Fenced block header grammar.
//!
//! A header is the info string of an opening fence. Two families matter:
//!
//! - metadata headers (`yaml @`, `yaml @@`, `md @/name`, `md @@/name`), which
//!   the extractor removes from the text and turns into metadata
//! - component headers (`yaml card`, `md card/featured/large`), which the
//!   rewriter turns into component nodes when `card` is registered
//!
//! Everything else is ordinary code.

use mds_core::{BlockLang, Scope};
use regex::Regex;
use std::sync::LazyLock;

// =============================================================================
// Regex patterns
// =============================================================================

/// Metadata header: language, scope marker, optional `/name` for rich content
static METADATA_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(yaml|data|md|markdown)[ \t]+(@@?)(?:/([A-Za-z0-9_]+))?[ \t]*$").unwrap()
});

// =============================================================================
// Metadata headers
// =============================================================================

/// A header that contributes to local or global metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataHeader<'a> {
    /// `yaml @` / `yaml @@`: body is decoded and merged into the map
    Data { scope: Scope },
    /// `md @/name` / `md @@/name`: body is rendered and stored under `name`
    Content { scope: Scope, name: &'a str },
}

impl MetadataHeader<'_> {
    pub fn scope(&self) -> Scope {
        match self {
            MetadataHeader::Data { scope } | MetadataHeader::Content { scope, .. } => *scope,
        }
    }
}

/// Classify a trimmed info string as a metadata header.
///
/// Data headers never carry a name and rich-content headers always do; the
/// mixed forms (`yaml @/x`, `md @`) are not metadata.
pub fn metadata_header(info: &str) -> Option<MetadataHeader<'_>> {
    let caps = METADATA_HEADER_RE.captures(info)?;
    let lang = BlockLang::from_tag(caps.get(1)?.as_str())?;
    let scope = Scope::from_marker(caps.get(2)?.as_str())?;

    match (lang, caps.get(3)) {
        (BlockLang::Data, None) => Some(MetadataHeader::Data { scope }),
        (BlockLang::Markdown, Some(name)) => Some(MetadataHeader::Content {
            scope,
            name: name.as_str(),
        }),
        _ => None,
    }
}

// =============================================================================
// Component headers
// =============================================================================

/// A header that may name a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentHeader<'a> {
    pub lang: BlockLang,
    /// First `/` segment of the annotation
    pub name: &'a str,
    /// Remaining `/` segments
    pub payload: Vec<&'a str>,
}

/// Split an info string at its first whitespace run into language and
/// annotation. The annotation is `None` when nothing follows the language.
pub fn split_info(info: &str) -> (&str, Option<&str>) {
    let info = info.trim();
    match info.split_once(char::is_whitespace) {
        Some((lang, rest)) => {
            let rest = rest.trim();
            (lang, (!rest.is_empty()).then_some(rest))
        }
        None => (info, None),
    }
}

/// Classify a code block's language and annotation as a component header.
///
/// Registration is not checked here.
pub fn component_header<'a>(lang: &str, meta: Option<&'a str>) -> Option<ComponentHeader<'a>> {
    let lang = BlockLang::from_tag(lang)?;
    let meta = meta.map(str::trim).filter(|meta| !meta.is_empty())?;
    let mut segments = meta.split('/');
    let name = segments.next()?;

    Some(ComponentHeader {
        lang,
        name,
        payload: segments.collect(),
    })
}
