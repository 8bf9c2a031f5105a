use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use crate::config::Config;
use crate::error::{GenError, Result};
use crate::path::Path;
use crate::scanner::{CompilationUnit, Manifest, TestCase};
use crate::steps::BuildSteps;

/// Something a target needs before its action can run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Prerequisite {
    /// Another target of the graph.
    Target(Path),
    /// A source file, relative to the source root.
    Source(Path),
    /// Every source file of a test case, expanded by the executor.
    TestSources(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Creates the object directory mirroring `dir` of the source root.
    /// `dir` is empty for the object root itself.
    MirrorDirectory { dir: Path },
    /// Creates an output directory that has no source counterpart.
    CreateDirectory,
    Compile { source: Path },
    Archive { objects: Vec<Path> },
    Link { case: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: Path,
    pub prerequisites: Vec<Prerequisite>,
    /// Targets that must exist but whose timestamps do not matter.
    pub order_only: Vec<Path>,
    pub action: Action,
}

impl Target {
    fn directory(name: Path, action: Action) -> Self {
        Self {
            name,
            prerequisites: Vec::new(),
            order_only: Vec::new(),
            action,
        }
    }

    pub fn depends_on(&self, name: &Path) -> bool {
        self.order_only.contains(name)
            || self
                .prerequisites
                .iter()
                .any(|p| matches!(p, Prerequisite::Target(t) if t == name))
    }
}

/// Targets and their dependency edges for one library and its tests.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildGraph {
    pub targets: Vec<Target>,
    archive: usize,
}

/// Where `unit` is compiled to: same directory and stem under
/// `objects_dir`, with the object extension.
pub fn object_path(config: &Config, unit: &CompilationUnit) -> Path {
    let file = format!("{}.{}", unit.stem(&config.suffix), config.object_ext);
    config.objects_dir.join(unit.dir()).join(file)
}

// Characters make splits on or expands inside a target name.
const UNSAFE_CHARS: &[char] = &[
    ':', '#', '$', '%', ';', '=', '*', '?', '[', ']', '|', '\\', '"', '\'',
];

fn check_path(path: &Path) -> Result<()> {
    let unsafe_char = path
        .as_ref()
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || UNSAFE_CHARS.contains(&c));
    if path.is_empty() || unsafe_char {
        return Err(GenError::UnsupportedPath { path: path.clone() });
    }
    Ok(())
}

fn check_unique(targets: &[Target]) -> Result<()> {
    let mut defined = HashSet::with_capacity(targets.len());
    for target in targets {
        if !defined.insert(&target.name) {
            return Err(GenError::DuplicateTarget {
                name: target.name.clone(),
            });
        }
    }
    Ok(())
}

impl BuildGraph {
    /// Builds the graph for `manifest`, plus one link target per case in
    /// `tests` when `config.test_dir` is set.
    pub fn new(config: &Config, manifest: &Manifest, tests: &[TestCase]) -> Result<Self> {
        for path in [&config.objects_dir, &config.archive] {
            check_path(path)?;
        }

        let mut objects = Vec::with_capacity(manifest.units.len());
        let mut owners: HashMap<Path, &Path> = HashMap::new();
        for unit in &manifest.units {
            check_path(&unit.path)?;
            let object = object_path(config, unit);
            if let Some(first) = owners.insert(object.clone(), &unit.path) {
                return Err(GenError::DuplicateObject {
                    object,
                    first: first.clone(),
                    second: unit.path.clone(),
                });
            }
            objects.push(object);
        }

        let mut targets = Vec::new();

        // Object mirrors, the archive's directory and the test output
        // directory may name the same path; each gets one target.
        let mut directories = HashSet::new();
        let mut push_directory = |targets: &mut Vec<Target>, name: Path, action: Action| {
            if directories.insert(name.clone()) {
                targets.push(Target::directory(name, action));
            }
        };

        if manifest.units.iter().any(|u| u.dir().is_empty()) {
            push_directory(
                &mut targets,
                config.objects_dir.clone(),
                Action::MirrorDirectory { dir: Path::new() },
            );
        }
        for dir in &manifest.directories {
            push_directory(
                &mut targets,
                config.objects_dir.join(dir),
                Action::MirrorDirectory { dir: dir.clone() },
            );
        }

        let archive_dir = config.archive.parent();
        if !archive_dir.is_empty() {
            push_directory(&mut targets, archive_dir.clone(), Action::CreateDirectory);
        }

        let test_mode = config.test_dir.is_some();
        if test_mode {
            check_path(&config.tests_out)?;
            push_directory(&mut targets, config.tests_out.clone(), Action::CreateDirectory);
        }

        for (unit, object) in manifest.units.iter().zip(&objects) {
            targets.push(Target {
                name: object.clone(),
                prerequisites: Vec::from([Prerequisite::Source(unit.path.clone())]),
                order_only: Vec::from([object.parent()]),
                action: Action::Compile {
                    source: unit.path.clone(),
                },
            });
        }

        let archive = targets.len();
        targets.push(Target {
            name: config.archive.clone(),
            prerequisites: objects.iter().cloned().map(Prerequisite::Target).collect(),
            order_only: if archive_dir.is_empty() {
                Vec::new()
            } else {
                Vec::from([archive_dir])
            },
            action: Action::Archive { objects },
        });

        if test_mode {
            for case in tests {
                check_path(&Path::from(&case.name))?;
                targets.push(Target {
                    name: config.tests_out.join(&case.name),
                    prerequisites: Vec::from([
                        Prerequisite::Target(config.archive.clone()),
                        Prerequisite::TestSources(case.name.clone()),
                    ]),
                    order_only: Vec::from([config.tests_out.clone()]),
                    action: Action::Link {
                        case: case.name.clone(),
                    },
                });
            }
        }

        check_unique(&targets)?;
        Ok(Self { targets, archive })
    }

    pub fn target(&self, name: &Path) -> Option<&Target> {
        self.targets.iter().find(|t| &t.name == name)
    }

    pub fn archive(&self) -> &Target {
        &self.targets[self.archive]
    }

    pub fn directory_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets
            .iter()
            .filter(|t| matches!(t.action, Action::MirrorDirectory { .. }))
    }

    pub fn compile_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets
            .iter()
            .filter(|t| matches!(t.action, Action::Compile { .. }))
    }

    pub fn link_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets
            .iter()
            .filter(|t| matches!(t.action, Action::Link { .. }))
    }

    /// Target names referenced as prerequisites but never defined.
    pub fn dangling(&self) -> Vec<&Path> {
        let defined = self.targets.iter().map(|t| &t.name).collect::<HashSet<_>>();
        self.targets
            .iter()
            .flat_map(|t| {
                t.prerequisites
                    .iter()
                    .filter_map(|p| match p {
                        Prerequisite::Target(name) => Some(name),
                        _ => None,
                    })
                    .chain(&t.order_only)
            })
            .filter(|name| !defined.contains(name))
            .collect()
    }

    /// Feeds every target to `steps` in graph order.
    pub fn emit(&self, steps: &mut dyn BuildSteps) {
        for target in &self.targets {
            match &target.action {
                Action::MirrorDirectory { .. } | Action::CreateDirectory => {
                    steps.create_directory(target)
                }
                Action::Compile { source } => steps.compile(target, source),
                Action::Archive { objects } => steps.archive(target, objects),
                Action::Link { case } => steps.link_executable(target, case),
            }
        }
    }
}
