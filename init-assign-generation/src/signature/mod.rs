//! Parameter-list parsing and assignment generation
//!
//! The pipeline is pure: raw parameter-list text goes through the
//! [`scanner`], each segment through the [`classifier`], and the ordinary
//! parameters through the [`emitter`].

pub mod classifier;
pub mod emitter;
pub mod scanner;

pub use classifier::{classify, ParameterKind, ParameterSpec};
pub use emitter::{emit, GeneratedStatement};
pub use scanner::{find_closing_delimiter, split_segments, Region, ScannedChar, Scanner, Segment};

use crate::config::GenerationConfig;
use crate::errors::SignatureError;

/// Parse the text between an initializer's parentheses into classified parameters.
pub fn parse_parameters(
    raw: &str,
    receiver_names: &[String],
) -> Result<Vec<ParameterSpec>, SignatureError> {
    Ok(split_segments(raw)?
        .iter()
        .filter_map(|segment| classify(segment, receiver_names))
        .collect())
}

/// Parse a raw parameter list and produce its attribute assignments.
///
/// The left-hand receiver is the signature's own receiver parameter when it
/// has one, otherwise `config.default_receiver`.
pub fn generate_assignments(
    raw: &str,
    config: &GenerationConfig,
) -> Result<Vec<GeneratedStatement>, SignatureError> {
    let specs = parse_parameters(raw, &config.receiver_names)?;
    Ok(emit(&specs, receiver_for(&specs, config)))
}

/// The signature's own receiver parameter, or `config.default_receiver`.
pub fn receiver_for<'a>(specs: &'a [ParameterSpec], config: &'a GenerationConfig) -> &'a str {
    specs
        .iter()
        .find(|spec| spec.kind == ParameterKind::Receiver)
        .map_or(config.default_receiver.as_str(), |spec| spec.name.as_str())
}
