//! Tree-sitter Python node kinds used when walking documents

pub(crate) const CLASS_DEFINITION: &str = "class_definition";
pub(crate) const FUNCTION_DEFINITION: &str = "function_definition";
pub(crate) const DECORATED_DEFINITION: &str = "decorated_definition";
pub(crate) const PASS_STATEMENT: &str = "pass_statement";
pub(crate) const EXPRESSION_STATEMENT: &str = "expression_statement";
pub(crate) const STRING: &str = "string";
pub(crate) const CONCATENATED_STRING: &str = "concatenated_string";
pub(crate) const ELLIPSIS: &str = "ellipsis";
pub(crate) const COMMENT: &str = "comment";
