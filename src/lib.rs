#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod graph;
mod makefile;
pub mod os;
pub mod path;
pub mod scanner;
pub mod steps;
#[cfg(test)]
mod testing;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use tracing::info;

pub use crate::config::Config;
pub use crate::error::GenError;
use crate::graph::BuildGraph;
pub use crate::makefile::Makefile;
use crate::path::Path;
use crate::scanner::{Manifest, TestCase};

pub struct Generator {
    os: Rc<dyn os::Os>,
    config: Config,
}

impl Generator {
    pub fn new(os: impl os::Os, config: Config) -> Self {
        let os = Rc::new(os);
        Self { os, config }
    }

    pub fn scan(&self) -> error::Result<Manifest> {
        scanner::scan(&*self.os, &self.config.source_dir, &self.config.suffix)
    }

    /// Test cases under the test root, or none when tests are disabled.
    pub fn tests(&self) -> error::Result<Vec<TestCase>> {
        match &self.config.test_dir {
            Some(dir) => scanner::discover_tests(&*self.os, dir),
            None => Ok(Vec::new()),
        }
    }

    pub fn graph(&self) -> error::Result<BuildGraph> {
        let manifest = self.scan()?;
        let tests = self.tests()?;
        BuildGraph::new(&self.config, &manifest, &tests)
    }

    /// The complete build script, rendered in memory.
    pub fn render(&self) -> error::Result<String> {
        let graph = self.graph()?;
        let mut makefile = Makefile::new(&self.config)?;
        graph.emit(&mut makefile);

        info!(
            units = graph.compile_targets().count(),
            directories = graph.directory_targets().count(),
            tests = graph.link_targets().count(),
            "rendered build graph"
        );
        Ok(makefile.finish())
    }

    /// Renders the script and writes it to `config.script_path()`.
    ///
    /// Nothing is written unless the whole script rendered successfully.
    pub fn generate(&self) -> anyhow::Result<Path> {
        let script = self.render()?;
        let path = self.config.script_path();
        self.os
            .write_file(&path, script.as_bytes())
            .map_err(|source| GenError::Output {
                path: path.clone(),
                source,
            })?;
        info!(script = %path, bytes = script.len(), "wrote build script");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryOs;

    fn project() -> MemoryOs {
        MemoryOs::with_files([
            "src/str.cpp",
            "src/internal.h",
            "src/fiber/sched.cpp",
            "src/fiber/conn.cpp",
            "src/math/prime.cpp",
            "test/dhrystone/dhrystone.cpp",
            "test/echo/main.cpp",
        ])
        .dir("build")
    }

    #[test]
    fn test_generate_writes_script() {
        let os = Rc::new(project());
        let path = Generator::new(os.clone(), Config::default())
            .generate()
            .unwrap();

        assert_eq!(path, Path::from("build/Makefile"));
        let script = os.read("build/Makefile").unwrap();
        assert!(script.contains("\ntmpobjs/fiber/conn.o: ../src/fiber/conn.cpp | tmpobjs/fiber\n"));
        assert!(script.contains(
            "\nlom/lib/liblom.a: tmpobjs/str.o tmpobjs/fiber/conn.o tmpobjs/fiber/sched.o \
             tmpobjs/math/prime.o | lom/lib\n"
        ));
        assert!(!script.contains("internal"));
        assert!(!script.contains("check"));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let mut config = Config::default();
        config.test_dir("test");

        let first = Generator::new(project(), config.clone()).render().unwrap();
        let second = Generator::new(project(), config).render().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_with_tests() {
        let mut config = Config::default();
        config.test_dir("test");
        let graph = Generator::new(project(), config.clone()).graph().unwrap();

        let links = graph
            .link_targets()
            .map(|t| t.name.as_ref())
            .collect::<Vec<_>>();
        assert_eq!(links, ["tests/dhrystone", "tests/echo"]);
        for link in graph.link_targets() {
            assert!(link.depends_on(&config.archive));
        }
    }

    #[test]
    fn test_missing_source_root_writes_nothing() {
        let os = Rc::new(MemoryOs::new().dir("build"));

        let err = Generator::new(os.clone(), Config::default())
            .generate()
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<GenError>(),
            Some(GenError::Traversal { .. })
        ));
        assert!(os.read("build/Makefile").is_none());
    }

    #[test]
    fn test_bad_test_entry_writes_nothing() {
        let os = Rc::new(project().file("test/README"));
        let mut config = Config::default();
        config.test_dir("test");

        let err = Generator::new(os.clone(), config).generate().unwrap_err();

        assert!(matches!(
            err.downcast_ref::<GenError>(),
            Some(GenError::NotADirectory { .. })
        ));
        assert!(os.read("build/Makefile").is_none());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let err = Generator::new(project().fail_writes(), Config::default())
            .generate()
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<GenError>(),
            Some(GenError::Output { .. })
        ));
    }

    #[test]
    fn test_missing_build_dir_is_reported() {
        let os = MemoryOs::with_files(["src/x.cpp"]);

        let err = Generator::new(os, Config::default()).generate().unwrap_err();

        assert!(err.to_string().starts_with("Failed to write build/Makefile"));
    }

    #[test]
    fn test_empty_source_root() {
        let os = Rc::new(MemoryOs::new().dir("src").dir("build"));

        Generator::new(os.clone(), Config::default())
            .generate()
            .unwrap();

        let script = os.read("build/Makefile").unwrap();
        assert!(script.contains("\nall: lom/lib/liblom.a\n"));
        assert!(script.contains("\nlom/lib/liblom.a: | lom/lib\n"));
    }
}
