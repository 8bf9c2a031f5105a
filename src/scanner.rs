use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use tracing::debug;

use crate::error::{GenError, Result};
use crate::os::{DirEntry, EntryKind, Os};
use crate::path::Path;

/// One source file compiled into one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    /// Relative to the source root.
    pub path: Path,
}

impl CompilationUnit {
    pub fn dir(&self) -> Path {
        self.path.parent()
    }

    /// The file name without `suffix`.
    pub fn stem(&self, suffix: &str) -> &str {
        let name = self.path.file_name();
        name.strip_suffix(suffix).unwrap_or(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    /// Non-root directories directly holding at least one unit.
    pub directories: BTreeSet<Path>,
    /// Units in traversal order.
    pub units: Vec<CompilationUnit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
}

fn read_sorted(os: &dyn Os, path: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = os.read_dir(path).map_err(|source| GenError::Traversal {
        path: path.clone(),
        source,
    })?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Walks `root` and collects every file whose name ends with `suffix`.
///
/// Entries are visited in name order, files of a directory before its
/// subdirectories, so an unchanged tree always yields the same manifest.
pub fn scan(os: &dyn Os, root: &Path, suffix: &str) -> Result<Manifest> {
    let mut manifest = Manifest::default();
    let mut pending = Vec::from([Path::new()]);

    while let Some(rel) = pending.pop() {
        let entries = read_sorted(os, &root.join(&rel))?;

        let mut subdirs = Vec::new();
        for entry in entries {
            let path = rel.join(&entry.name);
            match entry.kind {
                EntryKind::Dir => subdirs.push(path),
                EntryKind::File if path.strip_suffix(suffix).is_some() => {
                    debug!(unit = %path, "found compilation unit");
                    if !rel.is_empty() {
                        manifest.directories.insert(rel.clone());
                    }
                    manifest.units.push(CompilationUnit { path });
                }
                _ => {}
            }
        }

        // Reversed so the first subdirectory is popped first.
        pending.extend(subdirs.into_iter().rev());
    }

    Ok(manifest)
}

/// Lists the test cases under `root`, one per immediate entry.
///
/// Every entry has to be a directory; anything else is reported rather
/// than silently turned into a case.
pub fn discover_tests(os: &dyn Os, root: &Path) -> Result<Vec<TestCase>> {
    read_sorted(os, root)?
        .into_iter()
        .map(|entry| {
            if entry.kind != EntryKind::Dir {
                return Err(GenError::NotADirectory {
                    path: root.join(&entry.name),
                });
            }
            debug!(case = %entry.name, "found test case");
            Ok(TestCase { name: entry.name })
        })
        .collect()
}
