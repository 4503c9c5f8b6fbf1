//! Metadata block extraction.
//!
//! Finds the metadata blocks of one scope in a text, turns them into a
//! metadata map and returns the text with those blocks removed.

use indexmap::IndexMap;
use log::trace;
use mds_core::{MetaValue, Metadata, Result, Scope};
use std::ops::Range;

use crate::decode::decode_mapping;
use crate::fence;
use crate::header::{metadata_header, MetadataHeader};
use crate::markdown::Markdown;
use crate::registry::ComponentRegistry;

/// Result of extracting one scope's metadata from a text.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Merged metadata, empty when no block matched
    pub metadata: Metadata,
    /// Input with the matched blocks removed, trimmed
    pub remaining: String,
}

/// Extract the `scope` metadata blocks of `text`.
///
/// Data blocks merge in document order, later keys winning. Rich-content
/// blocks with the same name are joined with a blank line, rendered, and then
/// stored over any data key of that name.
pub fn extract(
    text: &str,
    scope: Scope,
    markdown: &Markdown,
    registry: &ComponentRegistry,
) -> Result<Extraction> {
    let mut metadata = Metadata::new();
    let mut contents: IndexMap<&str, String> = IndexMap::new();
    let mut removed: Vec<Range<usize>> = Vec::new();

    for block in fence::blocks(text) {
        let Some(header) = metadata_header(block.info) else {
            continue;
        };
        if header.scope() != scope {
            continue;
        }

        trace!(
            "{} metadata block `{}` at lines {}-{}",
            scope,
            block.info,
            block.start_line,
            block.end_line
        );

        match header {
            MetadataHeader::Data { .. } => {
                if let Some(map) = decode_mapping(block.body, block.info)? {
                    metadata.extend(map);
                }
            }
            MetadataHeader::Content { name, .. } => {
                let body = block.body.trim();
                contents
                    .entry(name)
                    .and_modify(|joined| {
                        joined.push_str("\n\n");
                        joined.push_str(body);
                    })
                    .or_insert_with(|| body.to_string());
            }
        }
        removed.push(block.span);
    }

    for (name, body) in contents {
        let tree = markdown.render(&body, registry)?;
        metadata.insert(name.to_string(), MetaValue::Content(tree));
    }

    Ok(Extraction {
        metadata,
        remaining: remove_spans(text, &removed),
    })
}

/// Cut `spans` (sorted, disjoint) out of `text`, along with the whitespace
/// directly after each one, and trim the result.
fn remove_spans(text: &str, spans: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for span in spans {
        out.push_str(&text[cursor..span.start]);
        let rest = &text[span.end..];
        cursor = span.end + (rest.len() - rest.trim_start().len());
    }
    out.push_str(&text[cursor..]);

    out.trim().to_string()
}
