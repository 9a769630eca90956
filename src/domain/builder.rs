//! Tree builder: replays construction events into a [`TreeArena`].

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::error::{DomainError, TreeResult};

/// One step of a single forward pass over serialized tree lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// Create a node as child of the current node and descend into it
    Create(String),
    /// Close the current node and return to its parent
    Pop,
}

impl BuildEvent {
    pub fn create(value: impl Into<String>) -> Self {
        BuildEvent::Create(value.into())
    }
}

/// Constructs a tree from [`BuildEvent`]s.
///
/// The first `Create` makes the root. Building is complete once every created
/// node, the root included, has been popped.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: TreeArena,
    open: Vec<Index>,
    closed: bool,
    events: usize,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a whole tree in one go.
    #[instrument(level = "debug", skip(events))]
    pub fn from_events<I>(events: I) -> TreeResult<TreeArena>
    where
        I: IntoIterator<Item = BuildEvent>,
    {
        let mut builder = Self::new();
        for event in events {
            builder.apply(event)?;
        }
        builder.finish()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn apply(&mut self, event: BuildEvent) -> TreeResult<()> {
        self.events += 1;
        match event {
            BuildEvent::Create(value) => {
                if self.closed {
                    return Err(DomainError::MultipleRoots {
                        event: self.events,
                        value,
                    });
                }
                let parent = self.open.last().copied();
                let idx = self.tree.insert_node(NodeData::new(value), parent)?;
                self.open.push(idx);
            }
            BuildEvent::Pop => {
                if self.open.pop().is_none() {
                    return Err(DomainError::PopAboveRoot { event: self.events });
                }
                if self.open.is_empty() {
                    self.closed = true;
                }
            }
        }
        Ok(())
    }

    /// Number of nodes created and not yet popped.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Returns the tree once the root has been closed.
    pub fn finish(self) -> TreeResult<TreeArena> {
        if !self.open.is_empty() {
            return Err(DomainError::StructuralMismatch {
                open: self.open.len(),
            });
        }
        if self.tree.root().is_none() {
            return Err(DomainError::EmptyTree);
        }
        debug!(nodes = self.tree.len(), "tree built");
        Ok(self.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BuildEvent::Pop;

    #[test]
    fn given_nested_events_when_building_then_shape_matches() {
        let events = vec![
            BuildEvent::create("A"),
            BuildEvent::create("B"),
            BuildEvent::create("D"),
            Pop,
            Pop,
            BuildEvent::create("C"),
            Pop,
            Pop,
        ];

        let tree = TreeBuilder::from_events(events).unwrap();
        let root = tree.root().unwrap();

        assert_eq!(tree.value(root), Some("A"));
        assert_eq!(tree.children_of(root).len(), 2);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn given_unclosed_nodes_when_finishing_then_structural_mismatch() {
        let events = vec![BuildEvent::create("A"), BuildEvent::create("B"), Pop];
        assert_eq!(
            TreeBuilder::from_events(events).unwrap_err(),
            DomainError::StructuralMismatch { open: 1 }
        );
    }

    #[test]
    fn given_extra_pop_when_applying_then_pop_above_root() {
        let events = vec![BuildEvent::create("A"), Pop, Pop];
        assert_eq!(
            TreeBuilder::from_events(events).unwrap_err(),
            DomainError::PopAboveRoot { event: 3 }
        );
    }

    #[test]
    fn given_create_after_root_closed_then_multiple_roots() {
        let events = vec![BuildEvent::create("A"), Pop, BuildEvent::create("Z")];
        assert_eq!(
            TreeBuilder::from_events(events).unwrap_err(),
            DomainError::MultipleRoots {
                event: 3,
                value: "Z".to_string()
            }
        );
    }

    #[test]
    fn given_no_events_when_finishing_then_empty_tree() {
        assert_eq!(
            TreeBuilder::from_events(Vec::new()).unwrap_err(),
            DomainError::EmptyTree
        );
    }
}
