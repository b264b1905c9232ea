//! soyc: the core of a template compiler.
//!
//! Re-exports the workspace crates and wires the standard pass pipeline:
//!
//! - [`common`]: interning, source locations, diagnostics
//! - [`tree`]: the generic node arena with two-phase copy
//! - [`types`]: type syntax, the type lattice and assignability
//! - [`soytree`]: template node kinds
//! - [`passes`]: compiler passes over template trees

pub use soyc_common as common;
pub use soyc_passes as passes;
pub use soyc_soytree as soytree;
pub use soyc_tree as tree;
pub use soyc_types as types;

pub mod tracing_config;

use soyc_common::{Diagnostic, ErrorReporter};
use soyc_passes::{BanDuplicateNamespacesPass, KeyCommandPass, PassManager, ResolveTypesPass};
use soyc_soytree::SoyTree;
use soyc_tree::NodeId;
use soyc_types::{TypeInterner, TypeRegistry};

/// Run the standard passes over a file set and return every diagnostic.
///
/// Type resolution runs first so the checks after it see declared types.
pub fn check_file_set(
    tree: &mut SoyTree,
    files: &[NodeId],
    types: &TypeInterner,
    registry: &TypeRegistry,
) -> Vec<Diagnostic> {
    let mut reporter = ErrorReporter::new();
    PassManager::new()
        .add_file_pass(ResolveTypesPass::new(types, registry))
        .add_file_pass(KeyCommandPass::new(types))
        .add_file_set_pass(BanDuplicateNamespacesPass::new())
        .run(tree, files, &mut reporter);
    reporter.into_diagnostics()
}
