use core::fmt;

use crate::path::Path;

#[derive(Debug)]
pub enum GenError {
    /// A source or test root could not be listed.
    Traversal { path: Path, source: anyhow::Error },
    NotADirectory { path: Path },
    DuplicateObject {
        object: Path,
        first: Path,
        second: Path,
    },
    /// Two targets of different kinds would share one name.
    DuplicateTarget { name: Path },
    UnsupportedPath { path: Path },
    /// `path` cannot be spelled relative to the build directory `base`.
    InvalidLayout { path: Path, base: Path },
    Output { path: Path, source: anyhow::Error },
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenError::Traversal { path, source } => {
                write!(f, "Failed to read directory {path}: {source}")
            }
            GenError::NotADirectory { path } => {
                write!(f, "Test case {path} is not a directory")
            }
            GenError::DuplicateObject {
                object,
                first,
                second,
            } => write!(
                f,
                "Units {first} and {second} both compile to object {object}"
            ),
            GenError::DuplicateTarget { name } => {
                write!(f, "Target {name} would be defined twice")
            }
            GenError::UnsupportedPath { path } => {
                write!(f, "Path '{path}' cannot be used as a make target")
            }
            GenError::InvalidLayout { path, base } => {
                write!(f, "Cannot reach {path} from build directory {base}")
            }
            GenError::Output { path, source } => {
                write!(f, "Failed to write {path}: {source}")
            }
        }
    }
}

impl core::error::Error for GenError {}

pub type Result<T> = core::result::Result<T, GenError>;
