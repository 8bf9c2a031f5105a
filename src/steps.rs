pub use crate::graph::Target;
use crate::path::Path;

/// Build steps abstraction for generating build system output
///
/// This trait defines the interface for a build system backend to render
/// the targets of a [`BuildGraph`](crate::graph::BuildGraph) in its own
/// syntax. The graph calls one method per target, in graph order; the
/// target carries the name and the dependency edges, the method decides
/// which command produces it.
pub trait BuildSteps {
    /// Generates the step creating the directory `target.name`
    ///
    /// The step must succeed when the directory already exists and must
    /// create missing ancestors, since several of these steps may run
    /// concurrently.
    fn create_directory(&mut self, target: &Target);

    /// Generates the step compiling one unit into the object `target.name`
    ///
    /// # Arguments
    /// * `target` - The object target, with its source and directory edges
    /// * `source` - The unit, relative to the source root
    fn compile(&mut self, target: &Target, source: &Path);

    /// Generates the step archiving `objects` into the static library
    /// `target.name`
    fn archive(&mut self, target: &Target, objects: &[Path]);

    /// Generates the step linking the sources of test case `case` against
    /// the library into the executable `target.name`
    fn link_executable(&mut self, target: &Target, case: &str);
}
