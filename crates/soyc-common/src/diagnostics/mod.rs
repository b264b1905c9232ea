//! Diagnostic types, message lookup and the accumulating error sink.
//!
//! Message data lives in `data.rs`. Passes and the type resolver report
//! through an `ErrorReporter`, which collects diagnostics for the whole run
//! instead of stopping at the first failure.

use crate::span::SourceLocation;
use serde::Serialize;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
}

/// A user-facing compiler diagnostic.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
        }
    }

    /// Create a new warning diagnostic.
    #[must_use]
    pub const fn warning(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Warning,
            code,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
///
/// The template is scanned once, so placeholders inside an argument are
/// copied verbatim. Placeholders without a matching argument are kept.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let argument = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            Some((args.get(index)?, close))
        });
        match argument {
            Some((arg, close)) => {
                result.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

/// A diagnostic message definition with code and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

// =============================================================================
// Error sink
// =============================================================================

/// Accumulates diagnostics across a pass or a whole compilation.
///
/// Reporting never aborts: callers substitute a recovery value and keep
/// going so that one run surfaces as many independent problems as possible.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
}

/// Opaque marker returned by [`ErrorReporter::checkpoint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl ErrorReporter {
    pub fn new() -> Self {
        ErrorReporter::default()
    }

    /// Report an error.
    pub fn report(&mut self, location: &SourceLocation, message: &DiagnosticMessage, args: &[&str]) {
        let text = format_message(message.message, args);
        tracing::debug!(code = message.code, %location, "error: {text}");
        self.diagnostics.push(Diagnostic::error(
            location.file_path().to_string(),
            location.start,
            location.len(),
            text,
            message.code,
        ));
    }

    /// Report a warning.
    pub fn warn(&mut self, location: &SourceLocation, message: &DiagnosticMessage, args: &[&str]) {
        let text = format_message(message.message, args);
        tracing::debug!(code = message.code, %location, "warning: {text}");
        self.diagnostics.push(Diagnostic::warning(
            location.file_path().to_string(),
            location.start,
            location.len(),
            text,
            message.code,
        ));
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Mark the current position so a caller can later ask whether anything
    /// was reported by the work in between.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.diagnostics.len())
    }

    pub fn errors_reported_since(&self, checkpoint: Checkpoint) -> bool {
        self.diagnostics[checkpoint.0..].iter().any(Diagnostic::is_error)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
