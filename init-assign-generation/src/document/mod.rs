//! Document collaborator
//!
//! Finds initializers in a Python document, hands their parameter lists to the
//! [`signature`](crate::signature) pipeline and turns the result into text
//! insertions. Two entry points exist:
//!
//! - [`plan_document`] walks every class of a parsed document
//! - [`plan_at_line`] handles the single initializer around a cursor line
//!
//! Planning never touches the source; [`DocumentPlan::apply`] produces the
//! rewritten text.

mod cursor;
pub mod locator;
mod node_kinds;

pub use cursor::plan_at_line;
pub use locator::{
    locate_classes, BodyLayout, BodyShape, ClassEntry, InitializerLookup, InitializerSite,
};

use derive_new::new;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::{BodyPolicy, GenerationConfig};
use crate::errors::{GenerationError, Result};
use crate::signature::{find_closing_delimiter, generate_assignments};

/// Why an initializer was left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The body already does more than `pass`/docstring/comments
    NonTrivialBody,
    /// The body shares the header line
    InlineBody,
    /// The class defines `__init__` more than once
    MultipleInitializers { count: usize },
}

/// What happened to one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Generated { statements: Vec<String> },
    /// The initializer only takes the receiver and variadics
    NothingToGenerate,
    NoInitializer,
    Skipped { skip: SkipReason },
    /// The parameter list could not be parsed; the initializer is untouched
    Failed { diagnostic: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
pub struct InitializerReport {
    pub class_name: String,
    /// 1-based line of the initializer, or of the class when it has none
    pub line: usize,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Statements to insert at a line start, each on its own line.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Insertion {
    pub offset: usize,
    pub indent: String,
    pub lines: Vec<String>,
}

impl Insertion {
    fn render(&self, line_ending: &str) -> String {
        self.lines
            .iter()
            .map(|line| format!("{}{}{}", self.indent, line, line_ending))
            .collect()
    }
}

/// Line ending used by the line before `offset`, or by the first line of the
/// document when there is none.
fn line_ending_at(source: &str, offset: usize) -> &'static str {
    let before = &source[..offset];
    let line_end = if before.ends_with('\n') {
        Some(offset - 1)
    } else {
        before.rfind('\n').or_else(|| source.find('\n'))
    };
    match line_end {
        Some(newline) if newline > 0 && source.as_bytes()[newline - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}

/// Reports for every class plus the insertions to perform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPlan {
    pub reports: Vec<InitializerReport>,
    pub insertions: Vec<Insertion>,
}

impl DocumentPlan {
    /// Apply the insertions, highest offset first so earlier offsets stay valid.
    ///
    /// Inserted lines use the line ending of the surrounding document.
    pub fn apply(&self, source: &str) -> String {
        let mut insertions: Vec<&Insertion> = self.insertions.iter().collect();
        insertions.sort_by(|a, b| b.offset.cmp(&a.offset));

        let mut output = source.to_string();
        for insertion in insertions {
            let line_ending = line_ending_at(&output, insertion.offset);
            let mut text = insertion.render(line_ending);
            if insertion.offset > 0 && !output[..insertion.offset].ends_with('\n') {
                text.insert_str(0, line_ending);
            }
            output.insert_str(insertion.offset, &text);
        }
        output
    }

    pub fn is_unchanged(&self) -> bool {
        self.insertions.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        self.reports
            .iter()
            .any(|report| matches!(report.outcome, Outcome::Failed { .. }))
    }
}

/// Plan assignments for every class in the document.
///
/// Classes are planned in parallel; reports keep document order. A failure in
/// one initializer is recorded in its report and does not affect the others.
pub fn plan_document(source: &str, config: &GenerationConfig) -> Result<DocumentPlan> {
    let classes = locate_classes(source)?;

    let planned: Vec<(InitializerReport, Option<Insertion>)> = classes
        .into_par_iter()
        .map(|entry| plan_class(source, entry, config))
        .collect();

    let mut plan = DocumentPlan::default();
    for (report, insertion) in planned {
        plan.reports.push(report);
        plan.insertions.extend(insertion);
    }
    Ok(plan)
}

fn plan_class(
    source: &str,
    entry: ClassEntry,
    config: &GenerationConfig,
) -> (InitializerReport, Option<Insertion>) {
    let ClassEntry {
        class_name,
        line,
        initializer,
    } = entry;

    let site = match initializer {
        InitializerLookup::Found(site) => site,
        InitializerLookup::Missing => {
            return (
                InitializerReport::new(class_name, line, Outcome::NoInitializer),
                None,
            );
        }
        InitializerLookup::Unparsed {
            line: header_line,
            open_paren,
        } => {
            let diagnostic = match find_closing_delimiter(source, open_paren) {
                Err(e) => {
                    GenerationError::signature(&class_name, locator::INITIALIZER_NAME, e)
                        .to_string()
                }
                Ok(_) => format!(
                    "{}.{} at line {} is not valid Python, leaving it unchanged",
                    class_name,
                    locator::INITIALIZER_NAME,
                    header_line
                ),
            };
            log::warn!("{}", diagnostic);
            return (
                InitializerReport::new(class_name, header_line, Outcome::Failed { diagnostic }),
                None,
            );
        }
        InitializerLookup::Multiple(count) => {
            log::warn!(
                "{} defines __init__ {} times, leaving it unchanged",
                class_name,
                count
            );
            let outcome = Outcome::Skipped {
                skip: SkipReason::MultipleInitializers { count },
            };
            return (InitializerReport::new(class_name, line, outcome), None);
        }
    };

    let statements = find_closing_delimiter(source, site.open_paren)
        .and_then(|close| generate_assignments(&source[site.open_paren + 1..close], config));
    let statements = match statements {
        Ok(statements) => statements,
        Err(e) => {
            let diagnostic =
                GenerationError::signature(&class_name, locator::INITIALIZER_NAME, e).to_string();
            log::warn!("{}", diagnostic);
            return (
                InitializerReport::new(class_name, site.line, Outcome::Failed { diagnostic }),
                None,
            );
        }
    };

    if statements.is_empty() {
        return (
            InitializerReport::new(class_name, site.line, Outcome::NothingToGenerate),
            None,
        );
    }

    let (insert_at, indent) = match site.body {
        BodyLayout::Inline => {
            log::warn!("{}.__init__ has an inline body, leaving it unchanged", class_name);
            let outcome = Outcome::Skipped {
                skip: SkipReason::InlineBody,
            };
            return (InitializerReport::new(class_name, site.line, outcome), None);
        }
        BodyLayout::Block {
            shape: BodyShape::NonTrivial,
            ..
        } if config.body_policy == BodyPolicy::TrivialOnly => {
            log::info!("{}.__init__ already has logic, leaving it unchanged", class_name);
            let outcome = Outcome::Skipped {
                skip: SkipReason::NonTrivialBody,
            };
            return (InitializerReport::new(class_name, site.line, outcome), None);
        }
        BodyLayout::Block {
            insert_at, indent, ..
        } => (insert_at, indent),
    };

    let rendered: Vec<String> = statements.iter().map(ToString::to_string).collect();
    log::debug!("{}.__init__: {:?}", class_name, rendered);
    let insertion = Insertion::new(insert_at, indent, rendered.clone());
    let outcome = Outcome::Generated {
        statements: rendered,
    };
    (
        InitializerReport::new(class_name, site.line, outcome),
        Some(insertion),
    )
}
