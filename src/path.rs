use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A `/`-separated path as it appears in the generated build script.
///
/// Paths are plain strings rather than `std::path::PathBuf` so the library
/// stays `no_std` and so the text written into the script does not depend
/// on the host's separator.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Path(String);

const SEP: &str = "/";

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({})", self.0)
    }
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(path: impl AsRef<str>) -> Self {
        Self(path.as_ref().replace("\\", "/"))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_absolute(&self) -> bool {
        self.0.starts_with(SEP)
    }

    /// Non-empty components, with `.` dropped.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEP).filter(|c| !c.is_empty() && *c != ".")
    }

    /// The path with redundant separators and `.` components removed.
    pub fn normalize(&self) -> Self {
        let joined = self.components().collect::<Vec<_>>().join(SEP);
        if self.is_absolute() {
            let mut path = String::from(SEP);
            path.push_str(&joined);
            Self(path)
        } else {
            Self(joined)
        }
    }

    pub fn file_name(&self) -> &str {
        match self.0.rfind(SEP) {
            Some(i) => &self.0[i + 1..],
            None => &self.0,
        }
    }

    /// Everything before the last separator, or the empty path.
    pub fn parent(&self) -> Self {
        match self.0.rfind(SEP) {
            Some(i) => Self(String::from(&self.0[..i])),
            None => Self::new(),
        }
    }

    /// Removes a literal file-name suffix such as `.cpp`.
    ///
    /// Returns `None` when the file name does not end with `suffix` or
    /// consists of nothing but the suffix.
    pub fn strip_suffix(&self, suffix: &str) -> Option<Self> {
        if self.file_name().len() <= suffix.len() {
            return None;
        }
        self.0.strip_suffix(suffix).map(|p| Self(String::from(p)))
    }

    pub fn join(&self, path: impl AsRef<str>) -> Self {
        if path.as_ref().starts_with(SEP) || self.0.is_empty() {
            return Self(path.as_ref().into());
        }
        if path.as_ref().is_empty() {
            return self.clone();
        }

        let mut new_path = String::from(self.0.trim_end_matches(SEP));
        new_path.push_str(SEP);
        new_path.push_str(path.as_ref());
        Self(new_path)
    }

    /// How to reach `self` from the directory `base`, using `..` components.
    ///
    /// Both paths are interpreted relative to the same working directory.
    /// Returns `None` when `base` climbs out of that directory with `..`,
    /// since the name of the directory being climbed into is unknown.
    /// Absolute targets are returned unchanged.
    pub fn relative_from(&self, base: &Path) -> Option<Self> {
        if self.is_absolute() {
            return Some(self.normalize());
        }
        if base.is_absolute() || base.components().any(|c| c == "..") {
            return None;
        }

        let target = self.components().collect::<Vec<_>>();
        let base = base.components().collect::<Vec<_>>();
        let common = target
            .iter()
            .zip(base.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts = Vec::new();
        parts.extend(core::iter::repeat_n("..", base.len() - common));
        parts.extend(target[common..].iter().copied());
        if parts.is_empty() {
            return Some(Self::from("."));
        }
        Some(Self(parts.join(SEP)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_suffix() {
        assert_eq!(
            Path::from("sub/y.cpp").strip_suffix(".cpp"),
            Some(Path::from("sub/y"))
        );
        assert_eq!(Path::from("sub/y.cc").strip_suffix(".cpp"), None);
        assert_eq!(Path::from("sub/.cpp").strip_suffix(".cpp"), None);
    }

    #[test]
    fn test_parent_and_file_name() {
        let path = Path::from("a/b/c.cpp");
        assert_eq!(path.parent(), Path::from("a/b"));
        assert_eq!(path.file_name(), "c.cpp");
        assert_eq!(Path::from("c.cpp").parent(), Path::new());
    }

    #[test]
    fn test_join() {
        assert_eq!(Path::from("tmpobjs").join("sub/y.o"), Path::from("tmpobjs/sub/y.o"));
        assert_eq!(Path::from("tmpobjs/").join("x.o"), Path::from("tmpobjs/x.o"));
        assert_eq!(Path::new().join("x.cpp"), Path::from("x.cpp"));
        assert_eq!(Path::from("tmpobjs").join(""), Path::from("tmpobjs"));
        assert_eq!(Path::from("tmpobjs").join("/abs"), Path::from("/abs"));
    }

    #[test]
    fn test_backslashes_are_separators() {
        assert_eq!(Path::from("a\\b.cpp"), Path::from("a/b.cpp"));
    }

    #[test]
    fn test_relative_from() {
        let src = Path::from("src");
        assert_eq!(src.relative_from(&Path::from("build")), Some(Path::from("../src")));
        assert_eq!(
            src.relative_from(&Path::from("./out/make/")),
            Some(Path::from("../../src"))
        );
        assert_eq!(
            Path::from("proj/src").relative_from(&Path::from("proj/build")),
            Some(Path::from("../src"))
        );
        assert_eq!(src.relative_from(&Path::from(".")), Some(Path::from("src")));
        assert_eq!(src.relative_from(&Path::from("src")), Some(Path::from(".")));
        assert_eq!(src.relative_from(&Path::from("../build")), None);
        assert_eq!(
            Path::from("/opt/src").relative_from(&Path::from("../build")),
            Some(Path::from("/opt/src"))
        );
    }
}
