//! Enums shared by the block-header grammar.
//!
//! A fenced block header is classified by its language (data or markdown)
//! and, for metadata blocks, by the scope it targets.

use serde::{Deserialize, Serialize};

/// Which metadata map a block contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Step-local metadata (`@`)
    Local,
    /// Document-wide metadata (`@@`)
    Global,
}

impl Scope {
    /// The annotation marker for this scope.
    pub fn marker(&self) -> &'static str {
        match self {
            Scope::Local => "@",
            Scope::Global => "@@",
        }
    }

    /// Resolve a marker back to its scope.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "@" => Some(Scope::Local),
            "@@" => Some(Scope::Global),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Local => write!(f, "local"),
            Scope::Global => write!(f, "global"),
        }
    }
}

/// Language of a fenced block that the MDS grammar cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockLang {
    /// Structured data, decoded as YAML (`yaml` or `data`)
    Data,
    /// Markdown content (`md` or `markdown`)
    Markdown,
}

impl BlockLang {
    /// Classify a fence language tag. Anything else is ordinary code.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "yaml" | "data" => Some(BlockLang::Data),
            "md" | "markdown" => Some(BlockLang::Markdown),
            _ => None,
        }
    }
}

impl std::fmt::Display for BlockLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockLang::Data => write!(f, "data"),
            BlockLang::Markdown => write!(f, "markdown"),
        }
    }
}
