//! Markdown extension configuration.
//!
//! This module contains the `MarkdownConfig` struct which selects the
//! markdown extensions the tokenizer enables.

use serde::{Deserialize, Serialize};

/// Markdown extension flags.
///
/// The defaults match a GitHub-flavoured markdown dialect with math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MarkdownConfig {
    /// Enable pipe tables.
    /// Default: true
    #[serde(default = "default_true")]
    pub tables: bool,

    /// Enable `~~strikethrough~~`.
    /// Default: true
    #[serde(default = "default_true")]
    pub strikethrough: bool,

    /// Enable `- [ ]` task list items.
    /// Default: true
    #[serde(default = "default_true")]
    pub task_lists: bool,

    /// Enable footnote references and definitions.
    /// Default: true
    #[serde(default = "default_true")]
    pub footnotes: bool,

    /// Enable `$inline$` and `$$display$$` math.
    /// Default: true
    #[serde(default = "default_true")]
    pub math: bool,

    /// Enable smart quotes and dashes.
    /// Default: false
    #[serde(default)]
    pub smart_punctuation: bool,

    /// Enable `{#id .class}` heading attributes.
    /// Default: false
    #[serde(default)]
    pub heading_attributes: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            task_lists: true,
            footnotes: true,
            math: true,
            smart_punctuation: false,
            heading_attributes: false,
        }
    }
}

impl MarkdownConfig {
    /// Apply the flags an override sets, leaving the others untouched.
    pub fn merge(&mut self, other: &MarkdownOverride) {
        let flags = [
            (&mut self.tables, other.tables),
            (&mut self.strikethrough, other.strikethrough),
            (&mut self.task_lists, other.task_lists),
            (&mut self.footnotes, other.footnotes),
            (&mut self.math, other.math),
            (&mut self.smart_punctuation, other.smart_punctuation),
            (&mut self.heading_attributes, other.heading_attributes),
        ];
        for (flag, value) in flags {
            if let Some(value) = value {
                *flag = value;
            }
        }
    }
}

/// Markdown flags named by an override; `None` means "keep the current value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MarkdownOverride {
    pub tables: Option<bool>,
    pub strikethrough: Option<bool>,
    pub task_lists: Option<bool>,
    pub footnotes: Option<bool>,
    pub math: Option<bool>,
    pub smart_punctuation: Option<bool>,
    pub heading_attributes: Option<bool>,
}

fn default_true() -> bool {
    true
}
