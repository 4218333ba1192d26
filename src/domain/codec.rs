//! Plain-text tree format.
//!
//! One node per line in pre-order: the node, then its yes subtree, then its
//! no subtree. `Q:` prefixes a question, `A:` an answer; the rest of the line
//! is the text verbatim. There is no header, count, or escaping, so text
//! containing a newline does not round-trip.
//!
//! ```text
//! Q:Is it electronic?
//! A:toaster
//! A:computer
//! ```

use std::io::{BufRead, Write};

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, warn};

use crate::domain::arena::QuestionTree;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{Node, NodeKind};

pub const QUESTION_PREFIX: &str = "Q:";
pub const ANSWER_PREFIX: &str = "A:";

/// Write `tree` to `output` in pre-order, one line per node.
///
/// Takes the sink by value: it is flushed and dropped before returning, on
/// success as well as on error.
#[instrument(level = "debug", skip_all)]
pub fn save<W: Write>(tree: &QuestionTree, mut output: W) -> std::io::Result<()> {
    for (_, node) in tree.iter() {
        match node {
            Node::Question { text, .. } => writeln!(output, "{QUESTION_PREFIX}{text}")?,
            Node::Answer { text } => writeln!(output, "{ANSWER_PREFIX}{text}")?,
        }
    }
    output.flush()
}

/// Serialize `tree` into a string.
pub fn to_string(tree: &QuestionTree) -> String {
    let mut buf = Vec::new();
    save(tree, &mut buf).expect("writing to a Vec never fails");
    String::from_utf8(buf).expect("node texts are valid UTF-8")
}

/// Rebuild a tree from lines written by [`save`].
///
/// Fails on a line without a `Q:` or `A:` prefix and on input that ends
/// before every question has both branches. Lines after a complete tree are
/// ignored.
///
/// Parsing keeps its own stack of open questions, so a long chain of
/// questions does not grow the call stack.
#[instrument(level = "debug", skip_all)]
pub fn load<R: BufRead>(input: R) -> DomainResult<QuestionTree> {
    let mut reader = LineReader {
        lines: input.lines(),
        line_no: 0,
    };
    let mut arena = Arena::new();
    let mut open: Vec<OpenQuestion> = Vec::new();

    let root = loop {
        let line = reader
            .next_line()?
            .ok_or(DomainError::UnexpectedEnd {
                line_no: reader.line_no,
            })?;
        let line = line.trim();

        let mut done = if let Some(text) = line.strip_prefix(QUESTION_PREFIX) {
            if NodeKind::of(text).is_answer() {
                warn!("line {}: question {:?} does not end with '?'", reader.line_no, text);
            }
            open.push(OpenQuestion {
                text: text.to_string(),
                yes: None,
            });
            continue;
        } else if let Some(text) = line.strip_prefix(ANSWER_PREFIX) {
            arena.insert(Node::answer(text))
        } else {
            return Err(DomainError::InvalidFormat {
                line_no: reader.line_no,
                line: line.to_string(),
            });
        };

        // A finished subtree fills the yes slot of the innermost open
        // question, or completes it when the yes slot is already taken.
        let finished = loop {
            match open.pop() {
                None => break Some(done),
                Some(OpenQuestion { text, yes: None }) => {
                    open.push(OpenQuestion {
                        text,
                        yes: Some(done),
                    });
                    break None;
                }
                Some(OpenQuestion {
                    text,
                    yes: Some(yes),
                }) => done = arena.insert(Node::question(text, yes, done)),
            }
        };
        if let Some(root) = finished {
            break root;
        }
    };

    let mut trailing = 0;
    while reader.next_line()?.is_some() {
        trailing += 1;
    }
    if trailing > 0 {
        warn!("ignoring {} line(s) after complete tree", trailing);
    }
    debug!("loaded {} nodes", arena.len());
    Ok(QuestionTree::from_parts(arena, root))
}

/// Parse a tree from a string.
pub fn from_str(s: &str) -> DomainResult<QuestionTree> {
    load(s.as_bytes())
}

/// Question read but not yet closed: its yes branch, once parsed.
struct OpenQuestion {
    text: String,
    yes: Option<Index>,
}

struct LineReader<L> {
    lines: L,
    line_no: usize,
}

impl<L: Iterator<Item = std::io::Result<String>>> LineReader<L> {
    fn next_line(&mut self) -> DomainResult<Option<String>> {
        match self.lines.next() {
            Some(line) => {
                self.line_no += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }
}
