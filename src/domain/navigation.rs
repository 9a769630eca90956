//! Cursor-driven traversal over a [`TreeArena`].
//!
//! A move without a target leaves the cursor where it is, so a traversal
//! always yields exactly one node per instruction.

use std::fmt;
use std::str::FromStr;

use generational_arena::Index;
use thiserror::Error;
use tracing::{instrument, trace};

use crate::domain::arena::TreeArena;

/// Relative move applied to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Parent,
    FirstChild,
    NextSibling,
    PreviousSibling,
}

impl Instruction {
    pub const ALL: [Instruction; 4] = [
        Instruction::Parent,
        Instruction::FirstChild,
        Instruction::NextSibling,
        Instruction::PreviousSibling,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Instruction::Parent => "parent",
            Instruction::FirstChild => "first_child",
            Instruction::NextSibling => "next_sibling",
            Instruction::PreviousSibling => "previous_sibling",
        }
    }

    /// Target of this move from `from`, if there is one.
    pub fn target(&self, tree: &TreeArena, from: Index) -> Option<Index> {
        match self {
            Instruction::Parent => tree.parent_of(from),
            Instruction::FirstChild => tree.first_child(from),
            Instruction::NextSibling => tree.next_sibling(from),
            Instruction::PreviousSibling => tree.previous_sibling(from),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized instruction name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown instruction: '{0}'")]
pub struct UnknownInstruction(pub String);

impl FromStr for Instruction {
    type Err = UnknownInstruction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Instruction::ALL
            .into_iter()
            .find(|instruction| instruction.name() == s)
            .ok_or_else(|| UnknownInstruction(s.to_string()))
    }
}

/// The single movable position during a traversal.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    tree: &'a TreeArena,
    current: Index,
}

impl<'a> Cursor<'a> {
    pub fn new(tree: &'a TreeArena, start: Index) -> Self {
        Self {
            tree,
            current: start,
        }
    }

    pub fn current(&self) -> Index {
        self.current
    }

    /// Applies one move, clamped: without a target the cursor stays put.
    pub fn step(&mut self, instruction: Instruction) -> Index {
        match instruction.target(self.tree, self.current) {
            Some(next) => self.current = next,
            None => trace!(%instruction, "clamped move"),
        }
        self.current
    }
}

/// Runs `instructions` from `start`, returning the node reached after each one.
#[instrument(level = "debug", skip(tree, instructions), fields(count = instructions.len()))]
pub fn traverse(tree: &TreeArena, start: Index, instructions: &[Instruction]) -> Vec<Index> {
    let mut cursor = Cursor::new(tree, start);
    instructions
        .iter()
        .map(|&instruction| cursor.step(instruction))
        .collect()
}

/// Same as [`traverse`] but yields the visited nodes' values.
pub fn traverse_values<'t>(
    tree: &'t TreeArena,
    start: Index,
    instructions: &[Instruction],
) -> Vec<&'t str> {
    traverse(tree, start, instructions)
        .into_iter()
        .filter_map(|idx| tree.value(idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::NodeData;
    use Instruction::*;

    fn sample() -> (TreeArena, Index, Index, Index) {
        let mut tree = TreeArena::new();
        let a = tree.insert_node(NodeData::new("A"), None).unwrap();
        let b = tree.insert_node(NodeData::new("B"), Some(a)).unwrap();
        let d = tree.insert_node(NodeData::new("D"), Some(b)).unwrap();
        let c = tree.insert_node(NodeData::new("C"), Some(a)).unwrap();
        (tree, a, c, d)
    }

    #[test]
    fn given_names_when_parsing_then_round_trips_display() {
        for instruction in Instruction::ALL {
            assert_eq!(instruction.to_string().parse::<Instruction>(), Ok(instruction));
        }
        assert_eq!(
            "last_child".parse::<Instruction>(),
            Err(UnknownInstruction("last_child".to_string()))
        );
    }

    #[test]
    fn given_unknown_name_when_displayed_then_error_quotes_it() {
        let err = "up".parse::<Instruction>().unwrap_err();
        let source: &dyn std::error::Error = &err;
        assert_eq!(source.to_string(), "unknown instruction: 'up'");
    }

    #[test]
    fn given_root_when_walking_down_and_across_then_reports_each_stop() {
        let (tree, a, _, _) = sample();
        let values = traverse_values(&tree, a, &[FirstChild, FirstChild, Parent, NextSibling]);
        assert_eq!(values, ["B", "D", "B", "C"]);
    }

    #[test]
    fn given_leaf_when_every_move_is_clamped_then_cursor_stays() {
        let (tree, _, _, d) = sample();
        let mut cursor = Cursor::new(&tree, d);

        assert_eq!(cursor.step(FirstChild), d);
        assert_eq!(cursor.step(NextSibling), d);
        assert_eq!(cursor.step(PreviousSibling), d);
        assert_eq!(cursor.current(), d);
    }

    #[test]
    fn given_empty_instruction_list_when_traversing_then_no_results() {
        let (tree, a, _, _) = sample();
        assert!(traverse(&tree, a, &[]).is_empty());
    }
}
