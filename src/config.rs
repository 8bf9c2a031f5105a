use alloc::string::{String, ToString as _};
use alloc::vec::Vec;
use alloc::vec;

use crate::error::{GenError, Result};
use crate::path::Path;

pub const COMPILE_FLAGS: &[&str] = &[
    "-Werror",
    "-g",
    "-fPIC",
    "-fno-strict-aliasing",
    "-fwrapv",
    "-pthread",
];

pub const LINK_FLAGS: &[&str] = &["-lstdc++", "-lpthread"];

/// Paths and names used by one generation run.
///
/// `source_dir`, `build_dir` and `test_dir` are relative to the directory
/// the generator runs in. Every other path is relative to `build_dir`,
/// which is where the generated script is executed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub source_dir: Path,
    pub build_dir: Path,
    pub test_dir: Option<Path>,
    pub script_name: String,
    pub suffix: String,
    pub object_ext: String,
    pub objects_dir: Path,
    pub archive: Path,
    pub defs: Option<Path>,
    pub var_prefix: String,
    pub include_dirs: Vec<Path>,
    pub compile_flags: Vec<String>,
    pub link_flags: Vec<String>,
    pub tests_out: Path,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: Path::from("src"),
            build_dir: Path::from("build"),
            test_dir: None,
            script_name: "Makefile".into(),
            suffix: ".cpp".into(),
            object_ext: "o".into(),
            objects_dir: Path::from("tmpobjs"),
            archive: Path::from("lom/lib/liblom.a"),
            defs: Some(Path::from("lom/Make.def")),
            var_prefix: "LOM".into(),
            include_dirs: vec![Path::from("lom/include")],
            compile_flags: COMPILE_FLAGS.iter().map(|f| f.to_string()).collect(),
            link_flags: LINK_FLAGS.iter().map(|f| f.to_string()).collect(),
            tests_out: Path::from("tests"),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_dir(&mut self, dir: impl AsRef<str>) -> &mut Self {
        self.source_dir = Path::from(dir);
        self
    }

    pub fn build_dir(&mut self, dir: impl AsRef<str>) -> &mut Self {
        self.build_dir = Path::from(dir);
        self
    }

    pub fn test_dir(&mut self, dir: impl AsRef<str>) -> &mut Self {
        self.test_dir = Some(Path::from(dir));
        self
    }

    pub fn suffix(&mut self, suffix: impl Into<String>) -> &mut Self {
        self.suffix = suffix.into();
        self
    }

    pub fn objects_dir(&mut self, dir: impl AsRef<str>) -> &mut Self {
        self.objects_dir = Path::from(dir);
        self
    }

    pub fn archive(&mut self, archive: impl AsRef<str>) -> &mut Self {
        self.archive = Path::from(archive);
        self
    }

    pub fn defs(&mut self, defs: Option<&str>) -> &mut Self {
        self.defs = defs.map(Path::from);
        self
    }

    pub fn var_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.var_prefix = prefix.into();
        self
    }

    pub fn include_dirs<I>(&mut self, dirs: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.include_dirs = dirs.into_iter().map(Path::from).collect();
        self
    }

    pub fn tests_out(&mut self, dir: impl AsRef<str>) -> &mut Self {
        self.tests_out = Path::from(dir);
        self
    }

    pub fn script_path(&self) -> Path {
        self.build_dir.join(&self.script_name)
    }

    /// Name of an externally defined make variable, e.g. `$(LOM_CXX)`.
    pub fn var(&self, name: &str) -> String {
        if self.var_prefix.is_empty() {
            alloc::format!("$({name})")
        } else {
            alloc::format!("$({}_{name})", self.var_prefix)
        }
    }

    /// `dir` as seen from inside the build directory.
    pub fn from_build_dir(&self, dir: &Path) -> Result<Path> {
        dir.relative_from(&self.build_dir)
            .ok_or_else(|| GenError::InvalidLayout {
                path: dir.clone(),
                base: self.build_dir.clone(),
            })
    }
}
