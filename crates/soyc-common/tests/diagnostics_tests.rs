use crate::diagnostics::{diagnostic_codes, diagnostic_messages, get_diagnostic_message};
use crate::{DiagnosticCategory, ErrorReporter, SourceLocation, format_message};
use std::sync::Arc;

#[test]
fn format_message_replaces_positional_arguments() {
    assert_eq!(
        format_message("Expected {1} type parameter(s) for '{0}', found {2}.", &["map", "2", "1"]),
        "Expected 2 type parameter(s) for 'map', found 1."
    );
    assert_eq!(format_message("no args", &[]), "no args");
}

#[test]
fn format_message_does_not_expand_placeholders_in_arguments() {
    assert_eq!(
        format_message("Unknown type '{0}' in {1}.", &["{1}", "list<{0}>"]),
        "Unknown type '{1}' in list<{0}>."
    );
    assert_eq!(format_message("{0} and {3}", &["a"]), "a and {3}");
    assert_eq!(format_message("{x} {", &["a"]), "{x} {");
}

#[test]
fn every_message_code_is_unique_and_findable() {
    let mut codes: Vec<u32> = crate::diagnostics::DIAGNOSTIC_MESSAGES
        .iter()
        .map(|m| m.code)
        .collect();
    let total = codes.len();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), total);

    let unknown = get_diagnostic_message(diagnostic_codes::UNKNOWN_TYPE)
        .expect("unknown type message should be registered");
    assert_eq!(unknown.message, "Unknown type '{0}'.");
}

#[test]
fn reporter_accumulates_errors_and_warnings() {
    let mut reporter = ErrorReporter::new();
    let location = SourceLocation::new(Arc::from("a.soy"), 4, 9);

    reporter.report(&location, &diagnostic_messages::UNKNOWN_TYPE, &["foo"]);
    reporter.warn(&location, &diagnostic_messages::DUPLICATE_NAMESPACE_WARNING, &["b.soy"]);
    reporter.report(&location, &diagnostic_messages::UNKNOWN_TYPE, &["bar"]);

    assert_eq!(reporter.diagnostics().len(), 3);
    assert_eq!(reporter.error_count(), 2);
    assert_eq!(reporter.warnings().count(), 1);

    let first = &reporter.diagnostics()[0];
    assert_eq!(first.file, "a.soy");
    assert_eq!(first.start, 4);
    assert_eq!(first.length, 5);
    assert_eq!(first.category, DiagnosticCategory::Error);
    assert_eq!(first.message_text, "Unknown type 'foo'.");
}

#[test]
fn checkpoint_only_sees_later_errors() {
    let mut reporter = ErrorReporter::new();
    reporter.report(&SourceLocation::UNKNOWN, &diagnostic_messages::UNKNOWN_TYPE, &["a"]);

    let checkpoint = reporter.checkpoint();
    assert!(!reporter.errors_reported_since(checkpoint));

    reporter.warn(&SourceLocation::UNKNOWN, &diagnostic_messages::DUPLICATE_NAMESPACE_WARNING, &["x"]);
    assert!(!reporter.errors_reported_since(checkpoint));

    reporter.report(&SourceLocation::UNKNOWN, &diagnostic_messages::UNKNOWN_TYPE, &["b"]);
    assert!(reporter.errors_reported_since(checkpoint));
}

#[test]
fn diagnostics_serialize_to_json() {
    let mut reporter = ErrorReporter::new();
    reporter.report(&SourceLocation::UNKNOWN, &diagnostic_messages::DUPLICATE_RECORD_FIELD, &["x"]);
    let json = serde_json::to_string(reporter.diagnostics()).expect("diagnostics serialize");
    assert!(json.contains("\"code\":1006"));
    assert!(json.contains("Duplicate field 'x' in record type."));
}
