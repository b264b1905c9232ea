//! Centralized limits and thresholds for the soyc compiler.
//!
//! Recursion limits guard the recursive algorithms over type expressions
//! and type graphs against stack overflow on pathological input.

/// Maximum nesting depth of a type expression during parsing and resolution.
///
/// `list<list<list<...>>>` nested past this depth is reported as a user
/// error and resolved to the error sentinel instead of recursing further.
pub const MAX_TYPE_NESTING_DEPTH: u32 = 200;

/// Maximum depth for the assignability relation.
///
/// Interned type graphs are acyclic, so the relation always terminates;
/// this only bounds stack usage. Exceeding it answers `false`.
pub const MAX_ASSIGNABILITY_DEPTH: u32 = 500;

/// Number of parameters at which function and template types switch to
/// one-parameter-per-line formatting.
pub const MULTILINE_PARAMETER_THRESHOLD: usize = 3;
