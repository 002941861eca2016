//! Integration test for whole-document generation
//!
//! Runs a Python module covering the supported signature shapes through
//! `plan_document` and checks both the per-class reports and the rewritten text.

use init_assign_generation::{plan_document, GenerationConfig, Outcome, SkipReason};
use rstest::rstest;

const PYTHON_MODULE: &str = r#"from typing import Callable, Tuple


class Empty:
    def __init__(self):
        # nothing to store
        pass


class Flat:
    def __init__(self, a, b:int, c=1, d:int=1, *args, **kwargs):
        pass

    def a(self, a=1, b=2):
        pass


class Commented:
    def __init__(
            self,
            a, b:int,
            c=1, #d:int=1,
            *args, **kwargs
    ):
        pass


class Nested:

    def __init__( # header comment
            self,
            aa, ba:int,
            ca:Callable[[Tuple[int,int]], int],
            da="1=(2,3=){#[:}]", # default comment
            ea=(2,3), # default comment
            *args, **kwargs
    ): # trailing comment

        pass


class NoInit:
    value = 1
"#;

const EXPECTED: &str = r#"from typing import Callable, Tuple


class Empty:
    def __init__(self):
        # nothing to store
        pass


class Flat:
    def __init__(self, a, b:int, c=1, d:int=1, *args, **kwargs):
        self.a = a
        self.b = b
        self.c = c
        self.d = d
        pass

    def a(self, a=1, b=2):
        pass


class Commented:
    def __init__(
            self,
            a, b:int,
            c=1, #d:int=1,
            *args, **kwargs
    ):
        self.a = a
        self.b = b
        self.c = c
        pass


class Nested:

    def __init__( # header comment
            self,
            aa, ba:int,
            ca:Callable[[Tuple[int,int]], int],
            da="1=(2,3=){#[:}]", # default comment
            ea=(2,3), # default comment
            *args, **kwargs
    ): # trailing comment

        self.aa = aa
        self.ba = ba
        self.ca = ca
        self.da = da
        self.ea = ea
        pass


class NoInit:
    value = 1
"#;

fn statements(outcome: &Outcome) -> Vec<&str> {
    match outcome {
        Outcome::Generated { statements } => statements.iter().map(String::as_str).collect(),
        other => panic!("expected generated statements, got {:?}", other),
    }
}

#[test]
fn test_reports_follow_document_order() {
    let plan = plan_document(PYTHON_MODULE, &GenerationConfig::default()).unwrap();

    let classes: Vec<&str> = plan
        .reports
        .iter()
        .map(|report| report.class_name.as_str())
        .collect();
    assert_eq!(classes, vec!["Empty", "Flat", "Commented", "Nested", "NoInit"]);

    assert_eq!(plan.reports[0].outcome, Outcome::NothingToGenerate);
    assert_eq!(plan.reports[0].line, 5);
    assert_eq!(
        statements(&plan.reports[1].outcome),
        vec!["self.a = a", "self.b = b", "self.c = c", "self.d = d"]
    );
    assert_eq!(
        statements(&plan.reports[2].outcome),
        vec!["self.a = a", "self.b = b", "self.c = c"]
    );
    assert_eq!(
        statements(&plan.reports[3].outcome),
        vec![
            "self.aa = aa",
            "self.ba = ba",
            "self.ca = ca",
            "self.da = da",
            "self.ea = ea"
        ]
    );
    assert_eq!(plan.reports[4].outcome, Outcome::NoInitializer);
    assert!(!plan.has_failures());
}

#[test]
fn test_rewritten_document() {
    let plan = plan_document(PYTHON_MODULE, &GenerationConfig::default()).unwrap();
    assert_eq!(plan.insertions.len(), 3);
    assert_eq!(plan.apply(PYTHON_MODULE), EXPECTED);
}

#[test]
fn test_second_run_changes_nothing() {
    let config = GenerationConfig::default();
    let first = plan_document(PYTHON_MODULE, &config).unwrap().apply(PYTHON_MODULE);

    let second = plan_document(&first, &config).unwrap();
    assert!(second.is_unchanged());
    assert_eq!(second.apply(&first), first);

    let skipped = second
        .reports
        .iter()
        .filter(|report| {
            report.outcome
                == Outcome::Skipped {
                    skip: SkipReason::NonTrivialBody,
                }
        })
        .count();
    assert_eq!(skipped, 3);
}

#[test]
fn test_planning_is_deterministic() {
    let config = GenerationConfig::default();
    let first = plan_document(PYTHON_MODULE, &config).unwrap();
    let second = plan_document(PYTHON_MODULE, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_module_without_classes() {
    let plan = plan_document("import os\n\nprint(os.getcwd())\n", &GenerationConfig::default())
        .unwrap();
    assert!(plan.reports.is_empty());
    assert!(plan.is_unchanged());
}

#[test_log::test]
fn test_tab_indented_body_keeps_its_indentation() {
    let source = "class T:\n\tdef __init__(self, a):\n\t\tpass\n";
    let plan = plan_document(source, &GenerationConfig::default()).unwrap();
    assert_eq!(
        plan.apply(source),
        "class T:\n\tdef __init__(self, a):\n\t\tself.a = a\n\t\tpass\n"
    );
}

#[rstest]
#[case::unclosed_bracket("def __init__(self, a=(1:", "unterminated nesting")]
#[case::unclosed_string("def __init__(self, a='x):", "unterminated string literal")]
fn test_broken_initializer_does_not_stop_the_next_class(
    #[case] broken_header: &str,
    #[case] expected: &str,
) {
    let source = format!(
        "class Broken:\n    {}\n        pass\n\n\nclass Fine:\n    def __init__(self, b):\n        pass\n",
        broken_header
    );
    let plan = plan_document(&source, &GenerationConfig::default()).unwrap();

    let report = |name: &str| {
        plan.reports
            .iter()
            .find(|report| report.class_name == name)
            .unwrap_or_else(|| panic!("no report for {}: {:?}", name, plan.reports))
    };

    let broken = report("Broken");
    assert_eq!(broken.line, 2);
    match &broken.outcome {
        Outcome::Failed { diagnostic } => {
            assert!(diagnostic.contains("Broken.__init__"), "{}", diagnostic);
            assert!(diagnostic.contains(expected), "{}", diagnostic);
        }
        other => panic!("expected a failure, got {:?}", other),
    }
    assert_eq!(
        statements(&report("Fine").outcome),
        vec!["self.b = b"]
    );
    assert!(plan.has_failures());

    let rewritten = plan.apply(&source);
    assert!(rewritten.contains(broken_header));
    assert!(rewritten.ends_with("def __init__(self, b):\n        self.b = b\n        pass\n"));
}

#[test]
fn test_crlf_module_keeps_its_line_endings() {
    let source = PYTHON_MODULE.replace('\n', "\r\n");
    let plan = plan_document(&source, &GenerationConfig::default()).unwrap();
    assert_eq!(plan.apply(&source), EXPECTED.replace('\n', "\r\n"));
}
