use std::fs;
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, anyhow};
use mkgen::os::{self, DirEntry, EntryKind};
use mkgen::path::Path as GenPath;
use tempfile::NamedTempFile;

pub struct StdOs;

impl os::Os for StdOs {
    fn read_dir(&self, path: &GenPath) -> os::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path.as_ref())? {
            let entry = entry?;
            let name = entry
                .file_name()
                .into_string()
                .map_err(|name| anyhow!("Non UTF-8 file name {name:?}"))?;

            let file_type = entry.file_type()?;
            // Symlinks count as files when they resolve to one; linked
            // directories are never descended into.
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_file() || entry.path().is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            entries.push(DirEntry::new(name, kind));
        }
        Ok(entries)
    }

    fn write_file(&self, path: &GenPath, data: &[u8]) -> os::Result<()> {
        let path = Path::new(path.as_ref());
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        // The temporary file lives next to the destination so the final
        // rename never crosses filesystems.
        let mut file = NamedTempFile::new_in(dir)
            .with_context(|| format!("Cannot create a temporary file in {}", dir.display()))?;
        file.write_all(data)?;
        file.as_file().sync_all()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt as _;
            file.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))?;
        }
        file.persist(path)?;
        Ok(())
    }
}
