use alloc::format;
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use crate::config::Config;
use crate::error::Result;
use crate::graph::Prerequisite;
use crate::path::Path;
use crate::steps::{BuildSteps, Target};

/// Renders a build graph as a Makefile meant to be run from the build
/// directory.
pub struct Makefile<'a> {
    config: &'a Config,
    /// The source root, as seen from the build directory.
    source_ref: Path,
    /// The test root, as seen from the build directory.
    test_ref: Option<Path>,
    rules: String,
    links: Vec<Path>,
}

impl<'a> Makefile<'a> {
    pub fn new(config: &'a Config) -> Result<Self> {
        let source_ref = config.from_build_dir(&config.source_dir)?;
        let test_ref = config
            .test_dir
            .as_ref()
            .map(|dir| config.from_build_dir(dir))
            .transpose()?;
        Ok(Self {
            config,
            source_ref,
            test_ref,
            rules: String::new(),
            links: Vec::new(),
        })
    }

    fn write_line(&mut self, line: &str) {
        self.rules.push_str(line);
        self.rules.push('\n');
    }

    /// Sources directly inside the case directory; subdirectories are not
    /// searched.
    fn test_sources(&self, case: &str) -> String {
        let dir = match &self.test_ref {
            Some(test_ref) => test_ref.join(case),
            None => Path::from(case),
        };
        format!("$(wildcard {dir}/*{})", self.config.suffix)
    }

    fn prerequisite(&self, prerequisite: &Prerequisite) -> String {
        match prerequisite {
            Prerequisite::Target(name) => name.to_string(),
            Prerequisite::Source(path) => self.source_ref.join(path).to_string(),
            Prerequisite::TestSources(case) => self.test_sources(case),
        }
    }

    fn rule(&mut self, target: &Target, recipe: &[String]) {
        let mut header = format!("{}:", target.name);
        for prerequisite in &target.prerequisites {
            header.push(' ');
            header.push_str(&self.prerequisite(prerequisite));
        }
        if !target.order_only.is_empty() {
            header.push_str(" |");
            for name in &target.order_only {
                header.push(' ');
                header.push_str(name.as_ref());
            }
        }

        self.write_line("");
        self.write_line(&header);
        for command in recipe {
            self.write_line(&format!("\t{command}"));
        }
    }

    fn compiler_flags(&self) -> impl Iterator<Item = String> + '_ {
        let includes = self.config.include_dirs.iter().map(|dir| format!("-I{dir}"));
        self.config.compile_flags.iter().cloned().chain(includes)
    }

    /// The complete script: header, aggregate targets, then every rule.
    pub fn finish(self) -> String {
        let config = self.config;
        let test_mode = config.test_dir.is_some();

        let mut out = String::new();
        out.push_str(&format!(
            "# Generated by mkgen from {}. Do not edit.\n\n",
            config.source_dir
        ));

        out.push_str(if test_mode {
            ".PHONY: all check clean\n"
        } else {
            ".PHONY: all clean\n"
        });

        if let Some(defs) = &config.defs {
            out.push_str(&format!("\ninclude {defs}\n"));
        }

        out.push_str(&format!("\nall: {}", config.archive));
        if test_mode {
            out.push_str(" check\n\ncheck:");
            for link in &self.links {
                out.push(' ');
                out.push_str(link.as_ref());
            }
        }
        out.push('\n');

        let mut removed = Vec::from([config.objects_dir.to_string(), config.archive.to_string()]);
        if test_mode {
            removed.push(config.tests_out.to_string());
        }
        out.push_str(&format!("\nclean:\n\trm -rf {}\n", removed.join(" ")));

        out.push_str(&self.rules);
        out
    }
}

impl BuildSteps for Makefile<'_> {
    fn create_directory(&mut self, target: &Target) {
        self.rule(target, &[format!("@mkdir -p {}", target.name)]);
    }

    fn compile(&mut self, target: &Target, source: &Path) {
        let mut command = Vec::from([self.config.var("CXX"), self.config.var("CXX_FLAGS")]);
        command.extend(self.compiler_flags());
        command.extend([
            "-c".to_string(),
            "-o".to_string(),
            target.name.to_string(),
            self.source_ref.join(source).to_string(),
        ]);
        self.rule(target, &[command.join(" ")]);
    }

    fn archive(&mut self, target: &Target, objects: &[Path]) {
        let mut command = Vec::from([
            self.config.var("AR"),
            self.config.var("AR_FLAGS"),
            target.name.to_string(),
        ]);
        command.extend(objects.iter().map(|object| object.to_string()));
        self.rule(
            target,
            &[format!("@rm -f {}", target.name), command.join(" ")],
        );
    }

    fn link_executable(&mut self, target: &Target, case: &str) {
        let mut command = Vec::from([self.config.var("LD"), self.config.var("LD_FLAGS")]);
        command.extend(self.compiler_flags());
        command.extend([
            "-o".to_string(),
            target.name.to_string(),
            self.test_sources(case),
            self.config.archive.to_string(),
        ]);
        command.extend(self.config.link_flags.iter().cloned());
        self.rule(target, &[command.join(" ")]);
        self.links.push(target.name.clone());
    }
}
