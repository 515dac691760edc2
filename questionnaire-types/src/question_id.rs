use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a question, e.g. `"42"`.
///
/// Used as the key in `Responses` and in the submitted JSON object. Ids are
/// assigned once per page load from the card markup; a card that carries no id
/// is keyed by its position instead (see [`QuestionId::positional`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId {
    id: String,
}

impl QuestionId {
    /// Create an id from any token.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Create the fallback id for a card without an identifier.
    pub fn positional(index: usize) -> Self {
        Self::new(index.to_string())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<u64> for QuestionId {
    fn from(id: u64) -> Self {
        Self::new(id.to_string())
    }
}

impl AsRef<str> for QuestionId {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_ids_are_decimal_indices() {
        assert_eq!(QuestionId::positional(3).as_str(), "3");
    }

    #[test]
    fn numeric_and_string_ids_agree() {
        assert_eq!(QuestionId::from(17u64), QuestionId::from("17"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&QuestionId::new("q1")).unwrap();
        assert_eq!(json, "\"q1\"");
    }
}
