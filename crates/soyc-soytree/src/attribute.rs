//! Attributes written inside command tags, e.g. `{velog $ve logonly="$x"}`.

use crate::expr::Expr;
use soyc_common::diagnostics::diagnostic_messages;
use soyc_common::{ErrorReporter, SourceLocation};
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct CommandTagAttribute {
    pub name: String,
    pub name_location: SourceLocation,
    pub value: Expr,
}

impl CommandTagAttribute {
    pub fn new(name: &str, name_location: SourceLocation, value: Expr) -> Self {
        CommandTagAttribute {
            name: name.to_string(),
            name_location,
            value,
        }
    }
}

impl fmt::Display for CommandTagAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}

/// Attributes `{velog}` accepts.
pub const VELOG_ATTRIBUTES: &[&str] = &["logonly"];

/// Pick the `logonly` expression out of a `{velog}` attribute list,
/// reporting every other attribute as unsupported.
///
/// The first `logonly` wins; attributes after it are still checked.
pub fn velog_logonly(
    attributes: &[CommandTagAttribute],
    reporter: &mut ErrorReporter,
) -> Option<Expr> {
    let mut logonly = None;
    for attribute in attributes {
        match attribute.name.as_str() {
            "logonly" => {
                if logonly.is_none() {
                    logonly = Some(attribute.value.clone());
                }
            }
            other => reporter.report(
                &attribute.name_location,
                &diagnostic_messages::UNSUPPORTED_ATTRIBUTE_KEY,
                &[other, "velog", &VELOG_ATTRIBUTES.join(", ")],
            ),
        }
    }
    logonly
}
