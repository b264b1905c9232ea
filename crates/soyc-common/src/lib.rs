//! Common types and utilities for the soyc template compiler.
//!
//! This crate provides foundational types used across all soyc crates:
//! - String interning (`Atom`, `ShardedInterner`)
//! - Source locations (`SourceLocation`)
//! - Diagnostics and the error sink (`Diagnostic`, `ErrorReporter`)
//! - Compiler limits and thresholds

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Source location tracking (byte offsets within a file)
pub mod span;
pub use span::SourceLocation;

// User-facing diagnostics and the accumulating error sink
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticMessage, ErrorReporter, format_message,
};

// Centralized limits and thresholds
pub mod limits;

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
