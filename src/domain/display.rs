/*
Rendering for `qtree show`.

Each question becomes a termtree node whose two leaves are its branches,
labelled with the answer that leads there. Questions deeper than
`RENDER_DEPTH_LIMIT` are cut off and shown with a trailing "...".
 */
use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::QuestionTree;
use crate::domain::node::Node;

/// Deepest level rendered in full; termtree nests one value per level.
pub const RENDER_DEPTH_LIMIT: usize = 256;

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for QuestionTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        // Pre-order walk; `true` marks a question that gets two children.
        let mut order: Vec<(String, bool)> = Vec::new();
        let mut stack: Vec<(Index, Option<&str>, usize)> = vec![(self.root(), None, 1)];
        while let Some((idx, label, level)) = stack.pop() {
            let Some(node) = self.get_node(idx) else {
                order.push(("<missing>".to_string(), false));
                continue;
            };
            let mut text = match label {
                Some(l) => format!("[{l}] {}", node.text()),
                None => node.text().to_string(),
            };
            match node {
                Node::Question { yes, no, .. } if level < RENDER_DEPTH_LIMIT => {
                    stack.push((*no, Some("no"), level + 1));
                    stack.push((*yes, Some("yes"), level + 1));
                    order.push((text, true));
                }
                Node::Question { .. } => {
                    text.push_str(" ...");
                    order.push((text, false));
                }
                Node::Answer { .. } => order.push((text, false)),
            }
        }

        // Assemble bottom-up: in reverse pre-order both subtrees of a
        // question are finished before the question itself.
        let mut built: Vec<Tree<String>> = Vec::new();
        for (text, has_children) in order.into_iter().rev() {
            let tree = if has_children {
                match (built.pop(), built.pop()) {
                    (Some(yes), Some(no)) => Tree::new(text).with_leaves([yes, no]),
                    _ => Tree::new(text),
                }
            } else {
                Tree::new(text)
            };
            built.push(tree);
        }
        built
            .pop()
            .unwrap_or_else(|| Tree::new("<missing>".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codec;

    #[test]
    fn given_learned_tree_when_rendered_then_branches_are_labelled() {
        let mut tree = QuestionTree::default();
        let root = tree.root();
        tree.learn(root, "toaster", "Is it electronic?", true).unwrap();

        let rendered = tree.to_tree_string().to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "Is it electronic?");
        assert!(lines[1].ends_with("[yes] toaster"));
        assert!(lines[2].ends_with("[no] computer"));
    }

    #[test]
    fn given_nested_question_when_rendered_then_yes_subtree_comes_first() {
        let tree =
            codec::from_str("Q:Is it alive?\nQ:Does it bark?\nA:dog\nA:cat\nA:rock\n").unwrap();

        let rendered = tree.to_tree_string().to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].ends_with("[yes] Does it bark?"));
        assert!(lines[2].ends_with("[yes] dog"));
        assert!(lines[3].ends_with("[no] cat"));
        assert!(lines[4].ends_with("[no] rock"));
    }

    #[test]
    fn given_tree_deeper_than_limit_when_rendered_then_cut_off() {
        let levels = 10_000;
        let input: String = (0..levels)
            .map(|i| format!("Q:q{i}?\nA:a{i}\n"))
            .chain(std::iter::once("A:bottom\n".to_string()))
            .collect();
        let tree = codec::from_str(&input).unwrap();

        let rendered = tree.to_tree_string().to_string();

        assert_eq!(rendered.lines().count(), 2 * RENDER_DEPTH_LIMIT - 1);
        assert!(rendered.contains(&format!("q{}? ...", RENDER_DEPTH_LIMIT - 1)));
        assert!(!rendered.contains("bottom"));
    }
}
