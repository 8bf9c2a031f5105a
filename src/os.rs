use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

pub use crate::path::Path;

pub type Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Anything else: sockets, fifos, dangling or directory symlinks.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Filesystem access used by a generation run.
///
/// Every path handed to the trait is the caller's configured path joined
/// with relative components, never resolved against ambient process state
/// by the library itself.
pub trait Os: 'static {
    // fs
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// Replaces `path` with `data`.
    ///
    /// Implementations must not leave a partially written file at `path`
    /// when they fail.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

impl<T: Os + ?Sized> Os for Rc<T> {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        (**self).read_dir(path)
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        (**self).write_file(path, data)
    }
}
