//! Attribute assignment generation

use std::fmt;

use serde::Serialize;

use crate::signature::classifier::ParameterSpec;

/// A `receiver.attribute = value` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedStatement {
    pub receiver: String,
    pub attribute: String,
    pub value: String,
}

impl fmt::Display for GeneratedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} = {}", self.receiver, self.attribute, self.value)
    }
}

/// One statement per ordinary parameter, in declaration order.
pub fn emit(specs: &[ParameterSpec], receiver: &str) -> Vec<GeneratedStatement> {
    specs
        .iter()
        .filter(|spec| spec.is_ordinary())
        .map(|spec| GeneratedStatement {
            receiver: receiver.to_string(),
            attribute: spec.name.clone(),
            value: spec.name.clone(),
        })
        .collect()
}
