//! Application layer: case framing and use cases
//!
//! This layer reads the textual case format, drives the domain and renders results.

pub mod error;
pub mod error_ext;
pub mod reader;
pub mod services;
pub mod writer;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use reader::{CaseInput, CaseReader};
pub use writer::CaseWriter;
