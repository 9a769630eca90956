//! Domain layer: the ordered tree and its navigation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod navigation;
pub mod render;

pub use arena::{NodeData, TreeArena, TreeNode};
pub use builder::{BuildEvent, TreeBuilder};
pub use error::{DomainError, TreeResult};
pub use navigation::{traverse, traverse_values, Cursor, Instruction, UnknownInstruction};
pub use render::TreeNodeConvert;
