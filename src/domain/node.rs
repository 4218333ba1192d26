//! Tree nodes: questions with two branches, answers without.

use std::fmt;

use generational_arena::Index;

/// Kind of a node as derived from its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Question,
    Answer,
}

impl NodeKind {
    /// Classify text: anything ending in `?` is a question, everything else an answer.
    ///
    /// ```
    /// use qtree::domain::NodeKind;
    ///
    /// assert_eq!(NodeKind::of("Is it red?"), NodeKind::Question);
    /// assert_eq!(NodeKind::of("computer"), NodeKind::Answer);
    /// ```
    pub fn of(text: &str) -> Self {
        if text.ends_with('?') {
            NodeKind::Question
        } else {
            NodeKind::Answer
        }
    }

    pub fn is_answer(self) -> bool {
        self == NodeKind::Answer
    }
}

/// A node in the question tree.
///
/// Questions always own both branches; `yes` is the left child, `no` the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Question { text: String, yes: Index, no: Index },
    Answer { text: String },
}

impl Node {
    pub fn answer(text: impl Into<String>) -> Self {
        Node::Answer { text: text.into() }
    }

    pub fn question(text: impl Into<String>, yes: Index, no: Index) -> Self {
        Node::Question {
            text: text.into(),
            yes,
            no,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Node::Question { text, .. } | Node::Answer { text } => text,
        }
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        match self {
            Node::Question { text, .. } | Node::Answer { text } => *text = value.into(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Question { .. } => NodeKind::Question,
            Node::Answer { .. } => NodeKind::Answer,
        }
    }

    pub fn is_answer(&self) -> bool {
        self.kind().is_answer()
    }

    /// Whether the text reads as what the node is: questions end in `?`,
    /// answers don't. The tag decides behaviour either way.
    pub fn is_regular(&self) -> bool {
        NodeKind::of(self.text()) == self.kind()
    }

    /// Branch taken on "yes".
    pub fn left(&self) -> Option<Index> {
        match self {
            Node::Question { yes, .. } => Some(*yes),
            Node::Answer { .. } => None,
        }
    }

    /// Branch taken on "no".
    pub fn right(&self) -> Option<Index> {
        match self {
            Node::Question { no, .. } => Some(*no),
            Node::Answer { .. } => None,
        }
    }

    /// Replace whichever child slot holds `old` with `new`.
    /// Returns false if `old` is not a child of this node.
    pub(crate) fn replace_child(&mut self, old: Index, new: Index) -> bool {
        match self {
            Node::Question { yes, .. } if *yes == old => {
                *yes = new;
                true
            }
            Node::Question { no, .. } if *no == old => {
                *no = new;
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}
