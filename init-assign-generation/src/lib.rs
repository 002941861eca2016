//! Generate attribute assignments for Python initializers.
//!
//! Given `def __init__(self, a, b: int, c=1, *args, **kwargs)`, this crate
//! produces
//!
//! ```text
//! self.a = a
//! self.b = b
//! self.c = c
//! ```
//!
//! The crate is split into a pure core and the code that works on documents:
//!
//! - [`signature`]: scanning, classifying and emitting for one raw parameter list
//! - [`document`]: finding initializers in a Python document and planning insertions
//! - [`api`]: file-level entry points used by the command-line tool
//!
//! ```
//! use init_assign_generation::{generate_assignments, GenerationConfig};
//!
//! let statements = generate_assignments(
//!     "self, a, b: int, c=1, *args, **kwargs",
//!     &GenerationConfig::default(),
//! )
//! .unwrap();
//! let rendered: Vec<String> = statements.iter().map(ToString::to_string).collect();
//! assert_eq!(rendered, ["self.a = a", "self.b = b", "self.c = c"]);
//! ```

pub mod api;
mod config;
pub mod document;
mod errors;
mod providers;
pub mod signature;

pub use config::{BodyPolicy, GenerationConfig};
pub use document::{
    plan_at_line, plan_document, DocumentPlan, InitializerReport, Insertion, Outcome, SkipReason,
};
pub use errors::{GenerationError, Result, SignatureError};
pub use providers::FileSystemProvider;
pub use signature::{
    generate_assignments, parse_parameters, GeneratedStatement, ParameterKind, ParameterSpec,
};
