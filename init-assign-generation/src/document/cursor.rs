//! Cursor mode: generate for the initializer enclosing a given line
//!
//! This walks the document text upward from the cursor line instead of
//! parsing it, so it also works on documents that do not parse yet. The
//! parameter list is cut out with the same scanner the signature pipeline uses.

use regex::Regex;

use crate::config::GenerationConfig;
use crate::document::locator::INITIALIZER_NAME;
use crate::document::{DocumentPlan, InitializerReport, Insertion, Outcome};
use crate::errors::{GenerationError, Result};
use crate::signature::{find_closing_delimiter, generate_assignments, Region, Scanner};

const MODULE_SCOPE: &str = "<module>";

/// Plan the assignments for the `__init__` enclosing 1-based `line`.
///
/// Statements go right after the header, below a leading docstring. Unlike
/// [`plan_document`](crate::document::plan_document) the body is not otherwise
/// inspected: pointing at an initializer is an explicit request to fill it.
pub fn plan_at_line(source: &str, line: usize, config: &GenerationConfig) -> Result<DocumentPlan> {
    let lines: Vec<&str> = source.split_inclusive('\n').collect();
    if line == 0 || line > lines.len() {
        return Err(GenerationError::LineOutOfRange {
            line,
            total: lines.len(),
        });
    }

    let init_def = compile(r"def\s+__init__\s*\(")?;
    let other_def = compile(r"^\s*(async\s+)?def\s+\w+\s*\(")?;
    let class_def = compile(r"^\s*class\s+(\w+)")?;

    let mut found = None;
    for index in (0..line).rev() {
        let text = lines[index];
        if let Some(matched) = init_def.find(text) {
            found = Some((index, matched.end() - 1));
            break;
        }
        if other_def.is_match(text) || class_def.is_match(text) {
            return Err(GenerationError::NotInsideInitializer {
                line,
                found: text.trim().to_string(),
            });
        }
    }
    let (def_index, paren_column) = found.ok_or(GenerationError::NoInitializerAbove { line })?;

    let def_line = lines[def_index];
    let def_indent: String = def_line
        .chars()
        .take_while(|ch| *ch == ' ' || *ch == '\t')
        .collect();
    let class_name = enclosing_class(&lines[..def_index], &def_indent, &class_def);
    log::debug!(
        "Cursor line {} belongs to {}.{} at line {}",
        line,
        class_name,
        INITIALIZER_NAME,
        def_index + 1
    );

    let def_start: usize = lines[..def_index].iter().map(|text| text.len()).sum();
    let open = def_start + paren_column;
    let close = find_closing_delimiter(source, open)
        .map_err(|e| GenerationError::signature(&class_name, INITIALIZER_NAME, e))?;

    let header_end = source[close..]
        .find('\n')
        .map_or(source.len(), |newline| close + newline + 1);
    if has_inline_body(&source[close + 1..header_end]) {
        return Err(GenerationError::InlineBody {
            class_name,
            line: def_index + 1,
        });
    }

    let statements = generate_assignments(&source[open + 1..close], config)
        .map_err(|e| GenerationError::signature(&class_name, INITIALIZER_NAME, e))?;

    let mut plan = DocumentPlan::default();
    if statements.is_empty() {
        plan.reports.push(InitializerReport::new(
            class_name,
            def_index + 1,
            Outcome::NothingToGenerate,
        ));
        return Ok(plan);
    }

    let rendered: Vec<String> = statements.iter().map(ToString::to_string).collect();
    plan.insertions.push(Insertion::new(
        after_docstring(source, header_end),
        format!("{}{}", def_indent, config.indent_unit),
        rendered.clone(),
    ));
    plan.reports.push(InitializerReport::new(
        class_name,
        def_index + 1,
        Outcome::Generated {
            statements: rendered,
        },
    ));
    Ok(plan)
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| GenerationError::Rule(e.to_string()))
}

/// Name of the closest class above the `def` that is indented less than it.
fn enclosing_class(lines_above: &[&str], def_indent: &str, class_def: &Regex) -> String {
    lines_above
        .iter()
        .rev()
        .filter_map(|text| {
            let indent = text.len() - text.trim_start().len();
            (indent < def_indent.len())
                .then(|| class_def.captures(text))
                .flatten()
                .and_then(|captures| captures.get(1))
                .map(|name| name.as_str().to_string())
        })
        .next()
        .unwrap_or_else(|| MODULE_SCOPE.to_string())
}

/// Start of the line after a docstring opening the body at `body_start`, or
/// `body_start` itself when the body does not open with one.
fn after_docstring(source: &str, body_start: usize) -> usize {
    let body = &source[body_start..];
    let Some(first) = body.find(|ch: char| !ch.is_whitespace()) else {
        return body_start;
    };
    let literal = &body[first..];
    let Some(quote) = literal.find(['\'', '"']) else {
        return body_start;
    };
    let prefix = &literal[..quote];
    if prefix.len() > 2 || !prefix.chars().all(|ch| matches!(ch, 'r' | 'R' | 'u' | 'U')) {
        return body_start;
    }

    let string_start = body_start + first + quote;
    let Some(end) = Scanner::new(&source[string_start..])
        .find(|scanned| scanned.region != Region::StringLiteral)
        .map(|scanned| string_start + scanned.offset)
    else {
        return body_start;
    };

    let line_end = source[end..].find('\n').map_or(source.len(), |newline| end + newline + 1);
    let rest = source[end..line_end].trim();
    if rest.is_empty() || rest.starts_with('#') {
        line_end
    } else {
        body_start
    }
}

/// Whether code (not just `:`, a return annotation or a comment) follows the
/// closing parenthesis on the header line.
fn has_inline_body(rest_of_header: &str) -> bool {
    let code = rest_of_header
        .split('#')
        .next()
        .unwrap_or_default()
        .trim();
    match code.rfind(':') {
        Some(colon) => !code[colon + 1..].trim().is_empty(),
        None => false,
    }
}
