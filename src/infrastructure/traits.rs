//! I/O boundary traits for testability
//!
//! Commands reach files and standard streams only through [`FileSystem`].

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Open a file, or stdin when `path` is `None`, for line reading.
    fn open_input(&self, path: Option<&Path>) -> io::Result<Box<dyn BufRead>>;

    /// Create (truncate) a file, or stdout when `path` is `None`.
    fn open_output(&self, path: Option<&Path>) -> io::Result<Box<dyn Write>>;
}

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn open_input(&self, path: Option<&Path>) -> io::Result<Box<dyn BufRead>> {
        match path {
            Some(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
            None => Ok(Box::new(BufReader::new(io::stdin()))),
        }
    }

    fn open_output(&self, path: Option<&Path>) -> io::Result<Box<dyn Write>> {
        match path {
            Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
            None => Ok(Box::new(io::stdout())),
        }
    }
}
