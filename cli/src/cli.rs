use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use mkgen::Config;

#[derive(Parser, Debug)]
#[command(name = "mkgen")]
#[command(about = "Generates a Makefile building a static library from a source tree")]
#[command(version)]
pub struct Args {
    /// Source root to scan [default: src]
    #[arg(long, value_name = "dir")]
    pub source_dir: Option<PathBuf>,

    /// Directory the Makefile is written to and run from [default: build]
    #[arg(long, value_name = "dir")]
    pub build_dir: Option<PathBuf>,

    /// Test root; every subdirectory becomes one test executable
    #[arg(long, value_name = "dir")]
    pub test_dir: Option<PathBuf>,

    /// File name suffix of compilation units [default: .cpp]
    #[arg(long, value_name = "suffix")]
    pub suffix: Option<String>,

    /// Object directory, relative to the build directory [default: tmpobjs]
    #[arg(long, value_name = "dir")]
    pub objects_dir: Option<String>,

    /// Static library, relative to the build directory [default: lom/lib/liblom.a]
    #[arg(long, value_name = "file")]
    pub archive: Option<String>,

    /// Toolchain definitions included by the Makefile [default: lom/Make.def]
    #[arg(long, value_name = "file", conflicts_with = "no_defs")]
    pub defs: Option<String>,

    /// Do not include a toolchain definitions file
    #[arg(long)]
    pub no_defs: bool,

    /// Prefix of the toolchain variables, e.g. LOM for $(LOM_CXX) [default: LOM]
    #[arg(long, value_name = "prefix")]
    pub var_prefix: Option<String>,

    /// Include directory, relative to the build directory (can be used multiple times)
    /// [default: lom/include]
    #[arg(short = 'I', long = "include", value_name = "dir")]
    pub include: Vec<String>,

    /// Test executable directory, relative to the build directory [default: tests]
    #[arg(long, value_name = "dir")]
    pub tests_out: Option<String>,

    /// Print the Makefile instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Log every discovered unit and test case
    #[arg(short, long)]
    pub verbose: bool,
}

fn utf8(path: &Path) -> anyhow::Result<&str> {
    path.to_str()
        .with_context(|| format!("Path {} is not valid UTF-8", path.display()))
}

impl Args {
    pub fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::default();
        if let Some(dir) = &self.source_dir {
            config.source_dir(utf8(dir)?);
        }
        if let Some(dir) = &self.build_dir {
            config.build_dir(utf8(dir)?);
        }
        if let Some(dir) = &self.test_dir {
            config.test_dir(utf8(dir)?);
        }
        if let Some(suffix) = &self.suffix {
            config.suffix(suffix);
        }
        if let Some(dir) = &self.objects_dir {
            config.objects_dir(dir);
        }
        if let Some(archive) = &self.archive {
            config.archive(archive);
        }
        if self.no_defs {
            config.defs(None);
        } else if let Some(defs) = &self.defs {
            config.defs(Some(defs.as_str()));
        }
        if let Some(prefix) = &self.var_prefix {
            config.var_prefix(prefix);
        }
        if !self.include.is_empty() {
            config.include_dirs(&self.include);
        }
        if let Some(dir) = &self.tests_out {
            config.tests_out(dir);
        }
        Ok(config)
    }
}

pub fn parse() -> Args {
    Args::parse()
}
