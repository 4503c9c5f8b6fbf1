//! Step segmentation.
//!
//! A line starting with `+++` at column 0, outside any fence, opens a step;
//! the rest of the line is the step id. Everything up to the next separator
//! (or the end of the text) is that step's content.

use log::{debug, trace, warn};
use mds_core::{MdsError, Position, Result, DEFAULT_STEP_ID};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::fence;

/// Step separator prefix
pub const STEP_MARKER: &str = "+++";

/// Valid step id: lowercase ASCII letters, digits and hyphens
static STEP_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// A separator line found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separator {
    pub id: String,
    /// Line number and byte offset of the separator line
    pub position: Position,
    /// Byte offset just past the separator line
    pub content_start: usize,
}

/// One step's slice of the text, with its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSlice<'a> {
    pub id: String,
    /// 1-based position in document order
    pub position: usize,
    pub prev: Option<String>,
    pub next: Option<String>,
    /// Trimmed step content
    pub content: &'a str,
}

/// Check a step id.
pub fn validate_step_id(id: &str, line: usize) -> Result<()> {
    if STEP_ID_RE.is_match(id) {
        Ok(())
    } else {
        Err(MdsError::InvalidStepId {
            id: id.to_string(),
            line,
        })
    }
}

/// Find every separator of `text`, validating ids as they are found.
pub fn find_separators(text: &str) -> Result<Vec<Separator>> {
    let mut separators = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for line in fence::lines(text) {
        if line.in_fence() {
            continue;
        }
        let Some(rest) = line.text.trim_end_matches('\r').strip_prefix(STEP_MARKER) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }

        let id = rest.trim();
        validate_step_id(id, line.number)?;
        if let Some(&first_line) = seen.get(id) {
            return Err(MdsError::DuplicateStepId {
                id: id.to_string(),
                line: line.number,
                first_line,
            });
        }
        seen.insert(id.to_string(), line.number);

        trace!("separator `{}` at line {}", id, line.number);
        separators.push(Separator {
            id: id.to_string(),
            position: Position::new(line.number, line.offset),
            content_start: (line.end() + 1).min(text.len()),
        });
    }

    Ok(separators)
}

/// Split `text` into linked step slices.
///
/// Without separators the whole text is one step named
/// [`DEFAULT_STEP_ID`]. Text before the first separator belongs to no step
/// and is dropped.
pub fn segment(text: &str) -> Result<Vec<StepSlice<'_>>> {
    let separators = find_separators(text)?;
    debug!("found {} step separators", separators.len());

    let Some(first) = separators.first() else {
        return Ok(vec![StepSlice {
            id: DEFAULT_STEP_ID.to_string(),
            position: 1,
            prev: None,
            next: None,
            content: text.trim(),
        }]);
    };

    let preamble = text[..first.position.offset].trim();
    if !preamble.is_empty() {
        warn!(
            "discarding {} bytes before the first step separator `{}`",
            preamble.len(),
            first.id
        );
    }

    let slices = separators
        .iter()
        .enumerate()
        .map(|(idx, separator)| {
            let end = separators
                .get(idx + 1)
                .map_or(text.len(), |next| next.position.offset);
            StepSlice {
                id: separator.id.clone(),
                position: idx + 1,
                prev: idx
                    .checked_sub(1)
                    .map(|prev| separators[prev].id.clone()),
                next: separators.get(idx + 1).map(|next| next.id.clone()),
                content: text[separator.content_start..end].trim(),
            }
        })
        .collect();

    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_step_id() {
        for id in ["intro", "step-1", "42", "a-b-c"] {
            assert!(validate_step_id(id, 1).is_ok(), "{id}");
        }
        for id in ["Foo", "foo bar", "foo_bar", "", "é", "+x"] {
            assert!(validate_step_id(id, 1).is_err(), "{id}");
        }
    }

    #[test]
    fn test_no_separators_is_default_step() {
        let slices = segment("# Probe\n").unwrap();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].id, "default");
        assert_eq!(slices[0].position, 1);
        assert_eq!(slices[0].prev, None);
        assert_eq!(slices[0].next, None);
        assert_eq!(slices[0].content, "# Probe");
    }

    #[test]
    fn test_linked_slices() {
        let slices = segment("+++one\nA\n\n+++two\nB\n+++three\nC").unwrap();
        let ids: Vec<_> = slices.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["one", "two", "three"]);
        assert_eq!(slices[0].content, "A");
        assert_eq!(slices[1].prev.as_deref(), Some("one"));
        assert_eq!(slices[1].next.as_deref(), Some("three"));
        assert_eq!(slices[2].next, None);
        assert_eq!(slices[2].position, 3);
    }

    #[test]
    fn test_id_is_trimmed() {
        let slices = segment("+++ spaced  \nBody").unwrap();
        assert_eq!(slices[0].id, "spaced");
    }

    #[test]
    fn test_preamble_is_dropped() {
        let slices = segment("intro text\n+++first\nBody").unwrap();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].content, "Body");
    }

    #[test]
    fn test_separator_inside_fence_is_ignored() {
        let slices = segment("+++real\n```\n+++fake\n```").unwrap();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].content, "```\n+++fake\n```");
    }

    #[test]
    fn test_bare_marker_and_indented_marker_are_text() {
        let slices = segment("+++\n +++x\ntext").unwrap();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].id, "default");
    }

    #[test]
    fn test_invalid_id_reports_line() {
        let err = segment("text\n\n+++Foo").unwrap_err();
        assert!(matches!(err, MdsError::InvalidStepId { ref id, line: 3 } if id == "Foo"));
    }

    #[test]
    fn test_duplicate_id() {
        let err = segment("+++a\nx\n+++a\ny").unwrap_err();
        assert!(matches!(
            err,
            MdsError::DuplicateStepId {
                line: 3,
                first_line: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_separator_positions() {
        let separators = find_separators("+++a\nA\n\n+++b\nB").unwrap();
        assert_eq!(separators[0].position, Position::new(1, 0));
        assert_eq!(separators[0].content_start, 5);
        assert_eq!(separators[1].position, Position::new(4, 8));
    }

    #[test]
    fn test_separator_on_last_line() {
        let slices = segment("+++a\nA\n+++b").unwrap();
        assert_eq!(slices[1].content, "");
    }

    #[test]
    fn test_crlf() {
        let slices = segment("+++a\r\nA\r\n+++b\r\nB").unwrap();
        let ids: Vec<_> = slices.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(slices[0].content, "A");
    }
}
