//! Template expressions as far as the node kinds need them.
//!
//! The expression grammar belongs to the template parser. Nodes keep the
//! literal and variable forms that passes inspect and carry everything
//! else as source text.

use soyc_types::TypeId;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// `$name`; `type_id` is filled in once the variable has been resolved.
    VarRef {
        name: String,
        type_id: Option<TypeId>,
    },
    /// Any other expression, as written.
    Other(String),
}

impl Expr {
    pub fn var(name: &str) -> Self {
        Expr::VarRef {
            name: name.to_string(),
            type_id: None,
        }
    }

    pub fn typed_var(name: &str, type_id: TypeId) -> Self {
        Expr::VarRef {
            name: name.to_string(),
            type_id: Some(type_id),
        }
    }

    pub fn string(value: &str) -> Self {
        Expr::String(value.to_string())
    }

    /// Equality that ignores resolution results.
    pub fn equivalent(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::VarRef { name: a, .. }, Expr::VarRef { name: b, .. }) => a == b,
            (Expr::Float(a), Expr::Float(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Null => f.write_str("null"),
            Expr::Bool(value) => write!(f, "{value}"),
            Expr::Int(value) => write!(f, "{value}"),
            Expr::Float(value) => write!(f, "{value:?}"),
            Expr::String(value) => {
                f.write_str("'")?;
                for ch in value.chars() {
                    match ch {
                        '\'' => f.write_str("\\'")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        _ => write!(f, "{ch}")?,
                    }
                }
                f.write_str("'")
            }
            Expr::VarRef { name, .. } => write!(f, "${name}"),
            Expr::Other(text) => f.write_str(text),
        }
    }
}
