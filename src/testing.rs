use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use anyhow::bail;

use crate::os::{self, DirEntry, EntryKind, Path};

/// In-memory filesystem for driving a run without touching the disk.
#[derive(Default)]
pub struct MemoryOs {
    dirs: BTreeSet<Path>,
    files: BTreeSet<Path>,
    written: RefCell<BTreeMap<Path, Vec<u8>>>,
    fail_writes: bool,
}

impl MemoryOs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I>(files: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        files.into_iter().fold(Self::new(), |os, f| os.file(f))
    }

    pub fn dir(mut self, path: impl AsRef<str>) -> Self {
        let mut dir = Path::from(path);
        while !dir.is_empty() {
            self.dirs.insert(dir.clone());
            dir = dir.parent();
        }
        self
    }

    pub fn file(self, path: impl AsRef<str>) -> Self {
        let path = Path::from(path);
        let mut os = self.dir(path.parent());
        os.files.insert(path);
        os
    }

    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Contents of a file produced through `write_file`.
    pub fn read(&self, path: &str) -> Option<String> {
        let written = self.written.borrow();
        let data = written.get(&Path::from(path))?;
        Some(String::from_utf8_lossy(data).into_owned())
    }
}

impl os::Os for MemoryOs {
    fn read_dir(&self, path: &Path) -> os::Result<Vec<DirEntry>> {
        let path = path.normalize();
        if !self.dirs.contains(&path) {
            bail!("No such directory: {path}");
        }

        let dirs = self
            .dirs
            .iter()
            .filter(|d| d.parent() == path)
            .map(|d| DirEntry::new(d.file_name(), EntryKind::Dir));
        let files = self
            .files
            .iter()
            .filter(|f| f.parent() == path)
            .map(|f| DirEntry::new(f.file_name(), EntryKind::File));

        // Reverse name order, so callers cannot rely on the listing order.
        let mut entries = dirs.chain(files).collect::<Vec<_>>();
        entries.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(entries)
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> os::Result<()> {
        if self.fail_writes {
            bail!("Read-only file system");
        }
        let path = path.normalize();
        if !self.dirs.contains(&path.parent()) {
            bail!("No such directory: {}", path.parent());
        }
        self.written.borrow_mut().insert(path, data.to_vec());
        Ok(())
    }
}
