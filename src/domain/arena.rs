use generational_arena::{Arena, Index};
use tracing::{debug, instrument, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{Node, NodeKind};

/// Answer the tree starts with before anything has been learned.
pub const DEFAULT_ANSWER: &str = "computer";

/// Arena-based binary decision tree.
///
/// Nodes live in a generational arena and refer to their children by `Index`,
/// so node identity is the handle, not the text: two answers may read the
/// same and still be distinct nodes. There are no parent links; a parent is
/// always found by searching down from the root.
#[derive(Debug, Clone)]
pub struct QuestionTree {
    /// Arena storage for all tree nodes
    arena: Arena<Node>,
    /// Index of the current root; replaced when the root itself is grafted over
    root: Index,
}

impl Default for QuestionTree {
    fn default() -> Self {
        Self::new(DEFAULT_ANSWER)
    }
}

impl QuestionTree {
    /// Create a single-node tree holding one answer.
    pub fn new(answer: impl Into<String>) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Node::answer(answer));
        Self { arena, root }
    }

    /// Assemble a tree from an arena whose nodes are all reachable from `root`.
    pub(crate) fn from_parts(arena: Arena<Node>, root: Index) -> Self {
        Self { arena, root }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&Node> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut Node> {
        self.arena.get_mut(idx)
    }

    /// Insert a detached answer leaf. It becomes part of the tree once grafted.
    pub fn insert_answer(&mut self, text: impl Into<String>) -> Index {
        self.arena.insert(Node::answer(text))
    }

    /// Insert a detached question over two existing nodes.
    pub fn insert_question(&mut self, text: impl Into<String>, yes: Index, no: Index) -> Index {
        self.arena.insert(Node::question(text, yes, no))
    }

    /// Find the node whose left or right child is `target`.
    ///
    /// Depth-first: immediate children first, then the left subtree, then the
    /// right. Returns `None` when `target` is unreachable from `current` or is
    /// `current` itself.
    #[instrument(level = "trace", skip(self))]
    pub fn find_parent(&self, current: Index, target: Index) -> Option<Index> {
        let mut stack = vec![current];
        while let Some(idx) = stack.pop() {
            if let Some(Node::Question { yes, no, .. }) = self.get_node(idx) {
                if *yes == target || *no == target {
                    return Some(idx);
                }
                stack.push(*no);
                stack.push(*yes);
            }
        }
        None
    }

    /// Put `replacement` into the position `target` occupies.
    ///
    /// Replacing the root swaps the root handle; otherwise the parent's child
    /// slot that held `target` is rewritten.
    #[instrument(level = "debug", skip(self))]
    pub fn graft(&mut self, target: Index, replacement: Index) -> DomainResult<()> {
        if target == self.root {
            debug!("graft: replacing root");
            self.root = replacement;
            return Ok(());
        }
        let parent = self
            .find_parent(self.root, target)
            .ok_or_else(|| DomainError::Detached(self.describe(target)))?;
        let replaced = self
            .get_node_mut(parent)
            .map(|p| p.replace_child(target, replacement))
            .unwrap_or(false);
        if replaced {
            Ok(())
        } else {
            Err(DomainError::Detached(self.describe(target)))
        }
    }

    /// Learn from a wrong guess at answer `wrong`.
    ///
    /// Adds the user's object as a new answer and a question telling it apart
    /// from `wrong`, then splices the question in where `wrong` was. With
    /// `answer_is_yes` the new object sits on the yes branch and `wrong` on
    /// the no branch; otherwise the other way round.
    ///
    /// Returns the index of the new question.
    #[instrument(level = "debug", skip(self))]
    pub fn learn(
        &mut self,
        wrong: Index,
        user_object: &str,
        question: &str,
        answer_is_yes: bool,
    ) -> DomainResult<Index> {
        if self.get_node(wrong).is_none() {
            return Err(DomainError::Detached(format!("{wrong:?}")));
        }
        if NodeKind::of(question).is_answer() {
            warn!("question {:?} does not end with '?'", question);
        }
        let new_answer = self.insert_answer(user_object);
        let (yes, no) = if answer_is_yes {
            (new_answer, wrong)
        } else {
            (wrong, new_answer)
        };
        let new_question = self.insert_question(question, yes, no);
        if let Err(e) = self.graft(wrong, new_question) {
            self.arena.remove(new_question);
            self.arena.remove(new_answer);
            return Err(e);
        }
        debug!(
            "learned {:?} vs {:?} via {:?}",
            user_object,
            self.describe(wrong),
            question
        );
        Ok(new_question)
    }

    /// Pre-order iterator over reachable nodes: node, yes subtree, no subtree.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of reachable nodes.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn answer_count(&self) -> usize {
        self.iter().filter(|(_, n)| n.is_answer()).count()
    }

    pub fn question_count(&self) -> usize {
        self.iter().filter(|(_, n)| !n.is_answer()).count()
    }

    /// Collects all answer texts, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn answers(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, n)| n.is_answer())
            .map(|(_, n)| n.text().to_string())
            .collect()
    }

    /// Nodes whose text disagrees with their kind, e.g. a question without `?`.
    pub fn irregular_count(&self) -> usize {
        self.iter().filter(|(_, n)| !n.is_regular()).count()
    }

    /// Number of nodes on the longest root-to-answer path.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 1)];
        while let Some((idx, level)) = stack.pop() {
            match self.get_node(idx) {
                Some(Node::Question { yes, no, .. }) => {
                    stack.push((*no, level + 1));
                    stack.push((*yes, level + 1));
                }
                Some(Node::Answer { .. }) => deepest = deepest.max(level),
                None => {}
            }
        }
        deepest
    }

    fn describe(&self, idx: Index) -> String {
        self.get_node(idx)
            .map(|n| n.text().to_string())
            .unwrap_or_else(|| format!("{idx:?}"))
    }
}

/// Structural equality: same shape and same text at every position.
impl PartialEq for QuestionTree {
    fn eq(&self, other: &Self) -> bool {
        self.iter()
            .map(|(_, n)| (n.kind(), n.text()))
            .eq(other.iter().map(|(_, n)| (n.kind(), n.text())))
    }
}

impl Eq for QuestionTree {}

pub struct TreeIterator<'a> {
    tree: &'a QuestionTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a QuestionTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.tree.get_node(current_idx)?;
        // Push no before yes so yes is visited first
        if let Node::Question { yes, no, .. } = node {
            self.stack.push(*no);
            self.stack.push(*yes);
        }
        Some((current_idx, node))
    }
}
