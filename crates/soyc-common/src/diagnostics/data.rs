// Diagnostic message table.
//
// Codes 1xxx come from type-syntax parsing and type resolution, 2xxx from
// compiler passes over the template tree.

use super::DiagnosticMessage;

pub mod diagnostic_codes {
    pub const TYPE_SYNTAX_ERROR: u32 = 1001;
    pub const UNKNOWN_TYPE: u32 = 1002;
    pub const NOT_A_GENERIC_TYPE: u32 = 1003;
    pub const UNEXPECTED_TYPE_PARAMETERS: u32 = 1004;
    pub const GENERIC_ARITY_MISMATCH: u32 = 1005;
    pub const DUPLICATE_RECORD_FIELD: u32 = 1006;
    pub const DUPLICATE_TEMPLATE_PARAMETER: u32 = 1007;
    pub const DUPLICATE_FUNCTION_PARAMETER: u32 = 1008;
    pub const UNSUPPORTED_LITERAL_TYPE: u32 = 1009;
    pub const NO_SUCH_PROPERTY: u32 = 1010;
    pub const NOT_INDEXABLE: u32 = 1011;
    pub const TYPE_TOO_DEEP: u32 = 1012;
    pub const BAD_TEMPLATE_RETURN_TYPE: u32 = 1013;
    pub const ELEMENT_TAG_EXPECTED: u32 = 1014;

    pub const KEY_ATTR_DIRECT_CHILD_OF_OPEN_TAG: u32 = 2001;
    pub const DUPLICATE_KEY_ATTR: u32 = 2002;
    pub const UNSUPPORTED_KEY_TYPE: u32 = 2003;
    pub const KEY_ELEMENT_AMBIGUOUS: u32 = 2004;
    pub const UNSUPPORTED_ATTRIBUTE_KEY: u32 = 2005;
    pub const DUPLICATE_NAMESPACE: u32 = 2006;
    pub const DUPLICATE_NAMESPACE_WARNING: u32 = 2007;
    pub const NAMESPACE_COLLISION: u32 = 2008;
}

pub mod diagnostic_messages {
    use super::DiagnosticMessage;
    use super::diagnostic_codes as codes;

    pub const TYPE_SYNTAX_ERROR: DiagnosticMessage = DiagnosticMessage {
        code: codes::TYPE_SYNTAX_ERROR,
        message: "Expected {0}, found '{1}'.",
    };
    pub const UNKNOWN_TYPE: DiagnosticMessage = DiagnosticMessage {
        code: codes::UNKNOWN_TYPE,
        message: "Unknown type '{0}'.",
    };
    pub const NOT_A_GENERIC_TYPE: DiagnosticMessage = DiagnosticMessage {
        code: codes::NOT_A_GENERIC_TYPE,
        message: "'{0}' is not a generic type. Expected one of: list, set, map, iterable, legacy_object_map, html.",
    };
    pub const UNEXPECTED_TYPE_PARAMETERS: DiagnosticMessage = DiagnosticMessage {
        code: codes::UNEXPECTED_TYPE_PARAMETERS,
        message: "Type '{0}' does not take type parameters.",
    };
    pub const GENERIC_ARITY_MISMATCH: DiagnosticMessage = DiagnosticMessage {
        code: codes::GENERIC_ARITY_MISMATCH,
        message: "Expected {1} type parameter(s) for '{0}', found {2}.",
    };
    pub const DUPLICATE_RECORD_FIELD: DiagnosticMessage = DiagnosticMessage {
        code: codes::DUPLICATE_RECORD_FIELD,
        message: "Duplicate field '{0}' in record type.",
    };
    pub const DUPLICATE_TEMPLATE_PARAMETER: DiagnosticMessage = DiagnosticMessage {
        code: codes::DUPLICATE_TEMPLATE_PARAMETER,
        message: "Duplicate parameter '{0}' in template type.",
    };
    pub const DUPLICATE_FUNCTION_PARAMETER: DiagnosticMessage = DiagnosticMessage {
        code: codes::DUPLICATE_FUNCTION_PARAMETER,
        message: "Duplicate parameter '{0}' in function type.",
    };
    pub const UNSUPPORTED_LITERAL_TYPE: DiagnosticMessage = DiagnosticMessage {
        code: codes::UNSUPPORTED_LITERAL_TYPE,
        message: "Literal '{0}' is not a valid type. Only string literals, 'null' and 'undefined' are supported.",
    };
    pub const NO_SUCH_PROPERTY: DiagnosticMessage = DiagnosticMessage {
        code: codes::NO_SUCH_PROPERTY,
        message: "Type '{0}' has no property '{1}'.",
    };
    pub const NOT_INDEXABLE: DiagnosticMessage = DiagnosticMessage {
        code: codes::NOT_INDEXABLE,
        message: "Indexed access is not supported on type '{0}'.",
    };
    pub const TYPE_TOO_DEEP: DiagnosticMessage = DiagnosticMessage {
        code: codes::TYPE_TOO_DEEP,
        message: "Type expression is nested more than {0} levels deep.",
    };
    pub const BAD_TEMPLATE_RETURN_TYPE: DiagnosticMessage = DiagnosticMessage {
        code: codes::BAD_TEMPLATE_RETURN_TYPE,
        message: "Template types must return a sanitized content kind or string, found '{0}'.",
    };
    pub const ELEMENT_TAG_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: codes::ELEMENT_TAG_EXPECTED,
        message: "Expected an HTML tag name, '?' or 'any' in 'html<...>', found '{0}'.",
    };

    pub const KEY_ATTR_DIRECT_CHILD_OF_OPEN_TAG: DiagnosticMessage = DiagnosticMessage {
        code: codes::KEY_ATTR_DIRECT_CHILD_OF_OPEN_TAG,
        message: "The `key` command must be directly nested within an HTML open tag (e.g. `<div {key 'foo'}></div>`).",
    };
    pub const DUPLICATE_KEY_ATTR: DiagnosticMessage = DiagnosticMessage {
        code: codes::DUPLICATE_KEY_ATTR,
        message: "The key attribute is deprecated. Instead, use the {key} command.",
    };
    pub const UNSUPPORTED_KEY_TYPE: DiagnosticMessage = DiagnosticMessage {
        code: codes::UNSUPPORTED_KEY_TYPE,
        message: "Unsupported type: keys must be of type string or integer.",
    };
    pub const KEY_ELEMENT_AMBIGUOUS: DiagnosticMessage = DiagnosticMessage {
        code: codes::KEY_ELEMENT_AMBIGUOUS,
        message: "Key elements must have open tags that map to a single HTML close tag and vice versa.",
    };
    pub const UNSUPPORTED_ATTRIBUTE_KEY: DiagnosticMessage = DiagnosticMessage {
        code: codes::UNSUPPORTED_ATTRIBUTE_KEY,
        message: "Unsupported attribute '{0}' for '{1}' tag, expected one of [{2}].",
    };
    pub const DUPLICATE_NAMESPACE: DiagnosticMessage = DiagnosticMessage {
        code: codes::DUPLICATE_NAMESPACE,
        message: "Found another file '{0}' with the same namespace. All files must have unique namespaces.",
    };
    pub const DUPLICATE_NAMESPACE_WARNING: DiagnosticMessage = DiagnosticMessage {
        code: codes::DUPLICATE_NAMESPACE_WARNING,
        message: "Found another file '{0}' with the same namespace. All files should have unique namespaces. This will soon become an error.",
    };
    pub const NAMESPACE_COLLISION: DiagnosticMessage = DiagnosticMessage {
        code: codes::NAMESPACE_COLLISION,
        message: "Template '{0}' collides with namespace '{1}' declared in '{2}'.",
    };
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    diagnostic_messages::TYPE_SYNTAX_ERROR,
    diagnostic_messages::UNKNOWN_TYPE,
    diagnostic_messages::NOT_A_GENERIC_TYPE,
    diagnostic_messages::UNEXPECTED_TYPE_PARAMETERS,
    diagnostic_messages::GENERIC_ARITY_MISMATCH,
    diagnostic_messages::DUPLICATE_RECORD_FIELD,
    diagnostic_messages::DUPLICATE_TEMPLATE_PARAMETER,
    diagnostic_messages::DUPLICATE_FUNCTION_PARAMETER,
    diagnostic_messages::UNSUPPORTED_LITERAL_TYPE,
    diagnostic_messages::NO_SUCH_PROPERTY,
    diagnostic_messages::NOT_INDEXABLE,
    diagnostic_messages::TYPE_TOO_DEEP,
    diagnostic_messages::BAD_TEMPLATE_RETURN_TYPE,
    diagnostic_messages::ELEMENT_TAG_EXPECTED,
    diagnostic_messages::KEY_ATTR_DIRECT_CHILD_OF_OPEN_TAG,
    diagnostic_messages::DUPLICATE_KEY_ATTR,
    diagnostic_messages::UNSUPPORTED_KEY_TYPE,
    diagnostic_messages::KEY_ELEMENT_AMBIGUOUS,
    diagnostic_messages::UNSUPPORTED_ATTRIBUTE_KEY,
    diagnostic_messages::DUPLICATE_NAMESPACE,
    diagnostic_messages::DUPLICATE_NAMESPACE_WARNING,
    diagnostic_messages::NAMESPACE_COLLISION,
];
