//! Type syntax and the type lattice for the soyc template compiler.
//!
//! - `ast`: type expressions as written (`TypeNode`), their parser and printer
//! - `TypeInterner`: resolved types as interned `TypeId` handles, with
//!   union and intersection normalization
//! - `lower`: resolution of type expressions against builtins, aliases and
//!   a proto `DescriptorPool`
//! - `assignability`: the `is_assignable_from` relation
//! - `persist` and `runtime`: structural export/import and render-time
//!   instance checks
pub mod assignability;
pub mod ast;
mod format;
mod intern;
pub mod lower;
pub mod persist;
pub mod proto;
pub mod runtime;
pub mod sanitized;
pub mod types;
pub mod visitor;

pub use assignability::{AssignabilityChecker, AssignabilityMode};
pub use ast::{TypeNode, TypeNodeKind, parse_type, parse_type_in_file};
pub use format::TypeFormatter;
pub use intern::TypeInterner;
pub use lower::{TypeLowering, TypeRegistry};
pub use proto::{DescriptorPool, DescriptorRef, EnumDescriptor, MessageDescriptor};
pub use sanitized::{SanitizedContentKind, type_for_content_kind};
pub use types::{IntrinsicKind, Kind, TypeData, TypeId};
pub use visitor::{
    ChildTypesVisitor, TypeVisitor, collect_proto_names, collect_referenced_types,
    contains_error, contains_type_where,
};

#[cfg(test)]
#[path = "../tests/parse_print_tests.rs"]
mod parse_print_tests;
#[cfg(test)]
#[path = "../tests/type_node_tests.rs"]
mod type_node_tests;
#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod intern_tests;
#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod format_tests;
#[cfg(test)]
#[path = "../tests/lower_tests.rs"]
mod lower_tests;
#[cfg(test)]
#[path = "../tests/assignability_tests.rs"]
mod assignability_tests;
#[cfg(test)]
#[path = "../tests/visitor_tests.rs"]
mod visitor_tests;
#[cfg(test)]
#[path = "../tests/persist_tests.rs"]
mod persist_tests;
#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod runtime_tests;
#[cfg(test)]
#[path = "../tests/concurrency_tests.rs"]
mod concurrency_tests;
