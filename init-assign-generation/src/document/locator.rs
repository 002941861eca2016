//! Locating classes and their initializers with ast-grep

use ast_grep_config::{from_yaml_string, GlobalRules};
use ast_grep_core::tree_sitter::{LanguageExt, StrDoc};
use ast_grep_core::Node;
use ast_grep_language::Python;
use regex::Regex;

use crate::document::node_kinds;
use crate::errors::{GenerationError, Result};
use crate::signature::scanner::find_top_level;

type PyNode<'r> = Node<'r, StrDoc<Python>>;

/// Name of the initializer method.
pub const INITIALIZER_NAME: &str = "__init__";

/// Whether an initializer body only holds placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// Only `pass`, `...`, docstrings and comments
    Trivial,
    NonTrivial,
}

/// Where generated statements go inside an initializer body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyLayout {
    /// The body shares the header line (`def __init__(self): pass`)
    Inline,
    Block {
        /// Start of the line receiving the statements
        insert_at: usize,
        indent: String,
        shape: BodyShape,
    },
}

/// An initializer found inside a class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializerSite {
    /// 1-based line of the `def`
    pub line: usize,
    /// Byte offset of the `(` opening the parameter list
    pub open_paren: usize,
    pub body: BodyLayout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitializerLookup {
    Missing,
    Multiple(usize),
    Found(InitializerSite),
    /// The parser recovered around a `def __init__(` it could not read; only
    /// the header position is known.
    Unparsed { line: usize, open_paren: usize },
}

/// A class definition and what was found for its initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    pub class_name: String,
    /// 1-based line of the `class` keyword
    pub line: usize,
    pub initializer: InitializerLookup,
}

/// Find every class in the document, nested ones included, in source order.
pub fn locate_classes(source: &str) -> Result<Vec<ClassEntry>> {
    let rule = format!(
        "id: class_definition\nlanguage: Python\nrule:\n  kind: {}\n",
        node_kinds::CLASS_DEFINITION
    );
    let globals = GlobalRules::default();
    let configs = from_yaml_string::<Python>(&rule, &globals)
        .map_err(|e| GenerationError::Rule(e.to_string()))?;
    let config = configs
        .first()
        .ok_or_else(|| GenerationError::Rule("class rule produced no matcher".to_string()))?;

    let ast = Python.ast_grep(source);
    let root = ast.root();

    let entries: Vec<ClassEntry> = root
        .find_all(&config.matcher)
        .filter_map(|node_match| class_entry(node_match.get_node(), source))
        .collect();
    log::debug!("Located {} class definition(s)", entries.len());

    Ok(entries)
}

fn class_entry(class: &PyNode<'_>, source: &str) -> Option<ClassEntry> {
    let class_name = class.field("name")?.text().to_string();
    let line = class.start_pos().line() + 1;
    let body = class.field("body")?;

    let initializers: Vec<PyNode<'_>> = body
        .children()
        .filter_map(|child| as_function(&child))
        .filter(|function| {
            function
                .field("name")
                .is_some_and(|name| name.text() == INITIALIZER_NAME)
        })
        .collect();

    let initializer = match initializers.as_slice() {
        [] => recover_initializer(class, source),
        [single] => match initializer_site(single, source) {
            Some(site) => InitializerLookup::Found(site),
            None => {
                log::debug!("Initializer of {} has no usable body", class_name);
                InitializerLookup::Missing
            }
        },
        many => InitializerLookup::Multiple(many.len()),
    };
    log::debug!("Class {} at line {}: {:?}", class_name, line, initializer);

    Some(ClassEntry {
        class_name,
        line,
        initializer,
    })
}

/// The function definition behind a class-body statement, decorators unwrapped.
fn as_function<'r>(node: &PyNode<'r>) -> Option<PyNode<'r>> {
    if node.kind() == node_kinds::FUNCTION_DEFINITION {
        return Some(node.clone());
    }
    if node.kind() == node_kinds::DECORATED_DEFINITION {
        return node
            .field("definition")
            .filter(|definition| definition.kind() == node_kinds::FUNCTION_DEFINITION);
    }
    None
}

/// Look for an initializer header in the class block text when the syntax
/// tree has none, so a broken signature is reported instead of ignored.
fn recover_initializer(class: &PyNode<'_>, source: &str) -> InitializerLookup {
    let Some(name) = class.field("name") else {
        return InitializerLookup::Missing;
    };
    let name_end = name.range().end;
    let Some(colon) = find_top_level(&source[name_end..], |scanned| scanned.ch == ':') else {
        return InitializerLookup::Missing;
    };
    let header_end = name_end + colon;
    let Ok(init_def) = Regex::new(r"^def\s+__init__\s*\(") else {
        return InitializerLookup::Missing;
    };

    let class_start = class.range().start;
    let class_indent = class_start - line_start_of(source, class_start);
    let block_start = source[header_end..]
        .find('\n')
        .map_or(source.len(), |newline| header_end + newline + 1);

    let mut offset = block_start;
    let mut body_indent = None;
    let mut headers = Vec::new();
    for text in source[block_start..].split_inclusive('\n') {
        let line_offset = offset;
        offset += text.len();

        let code = text.trim_start_matches([' ', '\t']);
        if code.trim().is_empty() || code.starts_with('#') {
            continue;
        }
        let indent = text.len() - code.len();
        let body_indent = *body_indent.get_or_insert(indent);
        if indent <= class_indent || indent < body_indent {
            break;
        }
        if indent == body_indent {
            if let Some(matched) = init_def.find(code) {
                headers.push(line_offset + indent + matched.end() - 1);
            }
        }
    }

    match headers.as_slice() {
        [] => InitializerLookup::Missing,
        [open_paren] => {
            let line = source[..*open_paren].matches('\n').count() + 1;
            log::debug!("Recovered unparsed __init__ header at line {}", line);
            InitializerLookup::Unparsed {
                line,
                open_paren: *open_paren,
            }
        }
        many => InitializerLookup::Multiple(many.len()),
    }
}

fn initializer_site(function: &PyNode<'_>, source: &str) -> Option<InitializerSite> {
    let line = function.start_pos().line() + 1;
    let open_paren = match function.field("parameters") {
        Some(parameters) => parameters.range().start,
        None => {
            let name_end = function.field("name")?.range().end;
            name_end + source[name_end..].find('(')?
        }
    };

    let body = function.field("body")?;
    let statements: Vec<PyNode<'_>> = body
        .children()
        .filter(|child| child.kind() != node_kinds::COMMENT)
        .collect();
    let first = statements.first()?;

    let first_start = first.range().start;
    let line_start = line_start_of(source, first_start);
    let indent = &source[line_start..first_start];
    if !indent.chars().all(char::is_whitespace) {
        return Some(InitializerSite {
            line,
            open_paren,
            body: BodyLayout::Inline,
        });
    }

    let shape = if statements.iter().all(is_placeholder) {
        BodyShape::Trivial
    } else {
        BodyShape::NonTrivial
    };

    // Statements go after a leading docstring so it stays the docstring.
    let insert_at = if is_docstring(first) {
        let end = first.range().end;
        source[end..]
            .find('\n')
            .map_or(source.len(), |newline| end + newline + 1)
    } else {
        line_start
    };

    Some(InitializerSite {
        line,
        open_paren,
        body: BodyLayout::Block {
            insert_at,
            indent: indent.to_string(),
            shape,
        },
    })
}

fn is_docstring(statement: &PyNode<'_>) -> bool {
    statement.kind() == node_kinds::EXPRESSION_STATEMENT
        && statement.children().all(|child| {
            child.kind() == node_kinds::STRING || child.kind() == node_kinds::CONCATENATED_STRING
        })
}

fn is_placeholder(statement: &PyNode<'_>) -> bool {
    if statement.kind() == node_kinds::PASS_STATEMENT {
        return true;
    }
    statement.kind() == node_kinds::EXPRESSION_STATEMENT
        && statement.children().all(|child| {
            child.kind() == node_kinds::STRING
                || child.kind() == node_kinds::CONCATENATED_STRING
                || child.kind() == node_kinds::ELLIPSIS
        })
}

pub(crate) fn line_start_of(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |newline| newline + 1)
}
