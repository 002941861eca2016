//! Classification of parameter-list segments

use serde::Serialize;

use crate::signature::scanner::{find_top_level, Segment};

/// Role of a parameter in an initializer signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// The implicit instance/class parameter (`self`, `cls`)
    Receiver,
    /// A named parameter that gets stored as an attribute
    Ordinary,
    /// `*args`
    VariadicPositional,
    /// `**kwargs`
    VariadicKeyword,
}

/// A classified parameter.
///
/// `has_annotation` and `has_default` are informational only; they never
/// influence which parameters are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    pub has_annotation: bool,
    pub has_default: bool,
}

impl ParameterSpec {
    pub fn is_ordinary(&self) -> bool {
        self.kind == ParameterKind::Ordinary
    }
}

/// Classify a single segment.
///
/// Returns `None` for segments that carry no parameter: the empty segment left
/// by a trailing comma, the bare keyword-only marker `*` and the positional-only
/// marker `/`.
pub fn classify(segment: &Segment<'_>, receiver_names: &[String]) -> Option<ParameterSpec> {
    let code = segment.code();
    if code.is_empty() {
        return None;
    }

    let (variadic, rest) = if let Some(rest) = code.strip_prefix("**") {
        (Some(ParameterKind::VariadicKeyword), rest)
    } else if let Some(rest) = code.strip_prefix('*') {
        (Some(ParameterKind::VariadicPositional), rest)
    } else {
        (None, code)
    };
    let rest = rest.trim_start();

    let Some(name) = leading_identifier(rest) else {
        log::debug!("Segment {:?} has no parameter name, skipping", code);
        return None;
    };
    let after_name = &rest[name.len()..];

    let kind = variadic.unwrap_or_else(|| {
        if receiver_names.iter().any(|receiver| receiver == name) {
            ParameterKind::Receiver
        } else {
            ParameterKind::Ordinary
        }
    });

    let spec = ParameterSpec {
        name: name.to_string(),
        kind,
        has_annotation: after_name.trim_start().starts_with(':'),
        has_default: has_default_marker(after_name),
    };
    log::debug!("Classified {:?} as {:?}", code, spec);
    Some(spec)
}

/// The maximal leading run of identifier characters, if the text starts with one.
fn leading_identifier(text: &str) -> Option<&str> {
    let mut end = 0;
    for (index, ch) in text.char_indices() {
        let accepted = if index == 0 {
            ch == '_' || ch.is_alphabetic()
        } else {
            ch == '_' || ch.is_alphanumeric()
        };
        if !accepted {
            break;
        }
        end = index + ch.len_utf8();
    }
    (end > 0).then(|| &text[..end])
}

/// Whether a top-level `=` (not part of a comparison) follows the name.
fn has_default_marker(after_name: &str) -> bool {
    find_top_level(after_name, |scanned| {
        if scanned.ch != '=' {
            return false;
        }
        let before = after_name[..scanned.offset].chars().next_back();
        let after = after_name[scanned.offset + 1..].chars().next();
        !matches!(before, Some('=' | '!' | '<' | '>')) && after != Some('=')
    })
    .is_some()
}
