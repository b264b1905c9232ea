//! Compiler passes over template trees.
//!
//! Passes report user errors to the shared `ErrorReporter` and keep going;
//! a `PassManager` runs per-file passes over every file and then the passes
//! that need the whole file set.

pub mod ban_duplicate_namespaces;
pub mod key_command;
pub mod resolve_types;

pub use ban_duplicate_namespaces::BanDuplicateNamespacesPass;
pub use key_command::KeyCommandPass;
pub use resolve_types::ResolveTypesPass;

use soyc_common::ErrorReporter;
use soyc_soytree::SoyTree;
use soyc_tree::NodeId;

/// A pass that looks at one file at a time.
pub trait CompilerFilePass {
    fn name(&self) -> &'static str;

    fn run(&mut self, tree: &mut SoyTree, file: NodeId, reporter: &mut ErrorReporter);
}

/// A pass that needs every file of the compilation at once.
pub trait CompilerFileSetPass {
    fn name(&self) -> &'static str;

    fn run(&mut self, tree: &mut SoyTree, files: &[NodeId], reporter: &mut ErrorReporter);
}

/// Ordered pass pipeline.
#[derive(Default)]
pub struct PassManager<'a> {
    file_passes: Vec<Box<dyn CompilerFilePass + 'a>>,
    file_set_passes: Vec<Box<dyn CompilerFileSetPass + 'a>>,
}

impl<'a> PassManager<'a> {
    pub fn new() -> Self {
        PassManager::default()
    }

    pub fn add_file_pass(mut self, pass: impl CompilerFilePass + 'a) -> Self {
        self.file_passes.push(Box::new(pass));
        self
    }

    pub fn add_file_set_pass(mut self, pass: impl CompilerFileSetPass + 'a) -> Self {
        self.file_set_passes.push(Box::new(pass));
        self
    }

    /// Run every file pass over each file in order, then the file set passes.
    pub fn run(&mut self, tree: &mut SoyTree, files: &[NodeId], reporter: &mut ErrorReporter) {
        for pass in &mut self.file_passes {
            let _span = tracing::debug_span!("pass", name = pass.name()).entered();
            for &file in files {
                pass.run(tree, file, reporter);
            }
        }
        for pass in &mut self.file_set_passes {
            let _span = tracing::debug_span!("pass", name = pass.name()).entered();
            pass.run(tree, files, reporter);
        }
        tracing::debug!(
            files = files.len(),
            errors = reporter.error_count(),
            "passes finished"
        );
    }
}

#[cfg(test)]
#[path = "../tests/test_utils.rs"]
mod test_utils;
#[cfg(test)]
#[path = "../tests/key_command_tests.rs"]
mod key_command_tests;
#[cfg(test)]
#[path = "../tests/ban_duplicate_namespaces_tests.rs"]
mod ban_duplicate_namespaces_tests;
#[cfg(test)]
#[path = "../tests/resolve_types_tests.rs"]
mod resolve_types_tests;
#[cfg(test)]
#[path = "../tests/pass_manager_tests.rs"]
mod pass_manager_tests;
