//! Arena-backed ordered tree with O(1) relative navigation.

use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, TreeResult};

/// Data payload for tree nodes: an opaque label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub value: String,
}

impl NodeData {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Payload, immutable once created
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root (or a detached node)
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
    /// Slot of this node within its parent's `children`
    pub position: usize,
}

/// Arena-based ordered tree.
///
/// The arena owns every node. Parent and child links are plain indices, so the
/// back-reference to a parent never keeps anything alive and dropping the arena
/// releases the whole tree.
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Creates a detached node. The first node created becomes the root.
    #[instrument(level = "trace", skip(self))]
    pub fn create_node(&mut self, data: NodeData) -> Index {
        let node_idx = self.arena.insert(TreeNode {
            data,
            parent: None,
            children: Vec::new(),
            position: 0,
        });
        if self.root.is_none() {
            self.root = Some(node_idx);
        }
        node_idx
    }

    /// Appends `child` to `parent`'s children and records its position.
    ///
    /// `child` must not already be attached anywhere.
    #[instrument(level = "trace", skip(self))]
    pub fn attach_child(&mut self, parent: Index, child: Index) -> TreeResult<()> {
        if !self.arena.contains(child) {
            return Err(DomainError::NodeNotFound(child));
        }
        let parent_node = self
            .arena
            .get_mut(parent)
            .ok_or(DomainError::NodeNotFound(parent))?;
        let position = parent_node.children.len();
        parent_node.children.push(child);

        let child_node = &mut self.arena[child];
        debug_assert!(child_node.parent.is_none(), "node attached twice");
        child_node.parent = Some(parent);
        child_node.position = position;
        Ok(())
    }

    /// Creates a node and attaches it under `parent`, or makes it the root.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> TreeResult<Index> {
        let node_idx = self.create_node(data);
        match parent {
            Some(parent_idx) => {
                if let Err(e) = self.attach_child(parent_idx, node_idx) {
                    self.arena.remove(node_idx);
                    if self.root == Some(node_idx) {
                        self.root = None;
                    }
                    return Err(e);
                }
            }
            None => self.root = Some(node_idx),
        }
        Ok(node_idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn value(&self, idx: Index) -> Option<&str> {
        self.get_node(idx).map(|node| node.data.value.as_str())
    }

    pub fn children_of(&self, idx: Index) -> &[Index] {
        self.get_node(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent_of(&self, idx: Index) -> Option<Index> {
        self.get_node(idx)?.parent
    }

    pub fn first_child(&self, idx: Index) -> Option<Index> {
        self.get_node(idx)?.children.first().copied()
    }

    pub fn next_sibling(&self, idx: Index) -> Option<Index> {
        let node = self.get_node(idx)?;
        let parent = self.get_node(node.parent?)?;
        parent.children.get(node.position + 1).copied()
    }

    pub fn previous_sibling(&self, idx: Index) -> Option<Index> {
        let node = self.get_node(idx)?;
        let parent = self.get_node(node.parent?)?;
        let position = node.position.checked_sub(1)?;
        parent.children.get(position).copied()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels from the root down to the deepest leaf.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut max_depth = 0;
        let mut stack = vec![(root, 1)];
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for &child in self.children_of(idx) {
                stack.push((child, depth + 1));
            }
        }
        max_depth
    }

    /// Values of all childless nodes, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.value.clone())
            .collect()
    }
}

/// Pre-order iterator, children visited left to right.
pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        Self {
            arena,
            stack: arena.root().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        Self {
            arena,
            stack: arena.root().map(|root| (root, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
