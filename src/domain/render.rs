//! Text rendering of a tree.

use std::fmt::Display;

use termtree::Tree;

use crate::domain::arena::TreeArena;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;

    /// Diagram text of the whole tree.
    fn render(&self) -> String {
        let tree = self.to_tree_string();
        let text = tree.to_string();
        dismantle(tree);
        text
    }
}

impl TreeNodeConvert for TreeArena {
    /// Assembles subtrees bottom-up from a post-order walk: when a node is
    /// visited, its children are the topmost entries of `built`, in order.
    fn to_tree_string(&self) -> Tree<String> {
        let mut built: Vec<Tree<String>> = Vec::new();
        for (_, node) in self.iter_postorder() {
            let first_child = built.len().saturating_sub(node.children.len());
            let leaves = built.split_off(first_child);
            built.push(Tree::new(node.data.value.clone()).with_leaves(leaves));
        }
        built
            .pop()
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

/// Drops a `termtree::Tree` level by level; its derived drop recurses per level.
pub fn dismantle<D: Display>(tree: Tree<D>) {
    let mut pending = vec![tree];
    while let Some(mut node) = pending.pop() {
        pending.append(&mut node.leaves);
    }
}
