//! Template node kinds for the soyc template compiler.
//!
//! A compilation unit is a `SoyTree`: the generic arena tree from
//! `soyc-tree` with `SoyNode` payloads. `builders` creates nodes, `utils`
//! answers the structural questions passes ask.

pub mod attribute;
pub mod builders;
pub mod expr;
pub mod nodes;
pub mod utils;

pub use attribute::CommandTagAttribute;
pub use expr::Expr;
pub use nodes::{SoyNode, SoyNodeKind};

/// Arena of template nodes for one compilation unit.
pub type SoyTree = soyc_tree::Tree<SoyNode>;

#[cfg(test)]
#[path = "../tests/source_tests.rs"]
mod source_tests;
#[cfg(test)]
#[path = "../tests/copy_tests.rs"]
mod copy_tests;
#[cfg(test)]
#[path = "../tests/velog_tests.rs"]
mod velog_tests;
