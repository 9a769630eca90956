//! domnav: ordered document trees with clamped relative navigation.
//!
//! Layers, innermost first:
//! - [`domain`]: arena tree, construction events, cursor traversal
//! - [`application`]: case reader/writer, session and transcript services
//! - [`infrastructure`]: filesystem boundary and service container
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{BuildEvent, Cursor, Instruction, NodeData, TreeArena, TreeBuilder};
