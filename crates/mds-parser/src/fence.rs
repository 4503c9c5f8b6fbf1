//! Fence-aware line scanning.
//!
//! Separator lines and block headers only count when they sit outside fenced
//! code. [`FenceTracker`] follows fence state line by line so callers can make
//! that decision in a single forward pass instead of re-counting fences from
//! the start of the document for every candidate.
//!
//! Every line that starts (at column 0) with [`FENCE_MARKER`] toggles the
//! fence state, so an odd number of such lines before an offset means the
//! offset sits inside a fence. Anything after the marker is the info string of
//! an opening line and is ignored on a closing one.

use std::ops::Range;

/// Fence line prefix
pub const FENCE_MARKER: &str = "```";

/// What a line did to the fence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceEvent<'a> {
    /// Ordinary line outside any fence
    Outside,
    /// Opening fence line, with its trimmed info string
    Opened { info: &'a str },
    /// Line inside an open fence
    Inside,
    /// Closing fence line
    Closed,
}

/// Forward state machine over fence lines.
#[derive(Debug, Clone, Default)]
pub struct FenceTracker {
    open: bool,
}

impl FenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a fence is currently open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Consume one line (without its newline) and report the transition.
    pub fn advance<'a>(&mut self, line: &'a str) -> FenceEvent<'a> {
        let line = line.trim_end_matches('\r');
        let fence_line = line.starts_with(FENCE_MARKER);
        match (self.open, fence_line) {
            (true, true) => {
                self.open = false;
                FenceEvent::Closed
            }
            (true, false) => FenceEvent::Inside,
            (false, true) => {
                self.open = true;
                FenceEvent::Opened {
                    info: line.trim_start_matches('`').trim(),
                }
            }
            (false, false) => FenceEvent::Outside,
        }
    }
}

/// A source line annotated with its fence transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number
    pub number: usize,
    /// Byte offset of the first character
    pub offset: usize,
    /// Line text without the trailing newline
    pub text: &'a str,
    /// Fence transition caused by this line
    pub event: FenceEvent<'a>,
}

impl Line<'_> {
    /// Whether the line starts inside a fence opened by an earlier line.
    pub fn in_fence(&self) -> bool {
        matches!(self.event, FenceEvent::Inside | FenceEvent::Closed)
    }

    /// Whether a fence is open after this line.
    pub fn leaves_fence_open(&self) -> bool {
        matches!(self.event, FenceEvent::Opened { .. } | FenceEvent::Inside)
    }

    /// Byte offset just past the line text (excluding the newline).
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Iterator over the lines of a text with fence state tracked.
pub struct Lines<'a> {
    rest: Option<&'a str>,
    offset: usize,
    number: usize,
    tracker: FenceTracker,
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        let (text, remainder) = match rest.find('\n') {
            Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
            None => (rest, None),
        };
        self.number += 1;
        let line = Line {
            number: self.number,
            offset: self.offset,
            text,
            event: self.tracker.advance(text),
        };
        self.offset += text.len() + 1;
        self.rest = remainder;
        Some(line)
    }
}

/// Scan `text` line by line, tracking fence state in one pass.
pub fn lines(text: &str) -> Lines<'_> {
    Lines {
        rest: Some(text),
        offset: 0,
        number: 0,
        tracker: FenceTracker::new(),
    }
}

/// Whether `offset` lies inside a fence left open by the lines before it.
pub fn is_inside_fence(text: &str, offset: usize) -> bool {
    lines(text)
        .take_while(|line| line.offset < offset)
        .last()
        .is_some_and(|line| line.leaves_fence_open())
}

/// A closed, top-level fenced block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// Trimmed info string of the opening line
    pub info: &'a str,
    /// Text between the fence lines, without the final newline
    pub body: &'a str,
    /// Line number of the opening fence
    pub start_line: usize,
    /// Line number of the closing fence
    pub end_line: usize,
    /// Bytes from the opening fence to the end of the closing fence line
    pub span: Range<usize>,
}

/// Collect every closed fenced block of `text`. A fence still open at the end
/// of the text is not a block.
pub fn blocks(text: &str) -> Vec<FencedBlock<'_>> {
    let mut found = Vec::new();
    let mut opened: Option<(Line<'_>, &str)> = None;

    for line in lines(text) {
        match line.event {
            FenceEvent::Opened { info } => opened = Some((line, info)),
            FenceEvent::Closed => {
                if let Some((start, info)) = opened.take() {
                    let body_start = (start.end() + 1).min(line.offset);
                    let body_end = line.offset.saturating_sub(1).max(body_start);
                    found.push(FencedBlock {
                        info,
                        body: &text[body_start..body_end],
                        start_line: start.number,
                        end_line: line.number,
                        span: start.offset..line.end(),
                    });
                }
            }
            FenceEvent::Outside | FenceEvent::Inside => {}
        }
    }

    found
}
