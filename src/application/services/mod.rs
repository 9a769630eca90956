//! Application services

pub mod session;
pub mod transcript;

pub use session::{RenderedTree, SessionService, SessionSummary};
pub use transcript::{compare, TranscriptDiff};
