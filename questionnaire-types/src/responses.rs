use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Question, QuestionId};

/// Answers captured during one questionnaire session.
///
/// Serializes as a flat JSON object `{ "<question id>": "<answer>" }`, the
/// shape `/submit_responses` expects.
///
/// Required and optional questions have different "answered" semantics:
/// - a required question is only present when it has a non-empty answer
/// - an optional question is present (possibly as `""`) once it was captured
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Responses {
    values: BTreeMap<QuestionId, String>,
}

impl Responses {
    /// Create a new empty responses collection.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Store a captured answer following the write policy.
    ///
    /// `value` is what the widget resolved to (`None` when nothing usable
    /// was selected or typed).
    pub fn record(&mut self, question: &Question, value: Option<String>) {
        match (question.is_required(), value) {
            (true, Some(answer)) if !answer.is_empty() => {
                self.values.insert(question.id().clone(), answer);
            }
            (true, _) => {
                self.values.remove(question.id());
            }
            (false, value) => {
                self.values
                    .insert(question.id().clone(), value.unwrap_or_default());
            }
        }
    }

    /// Insert an answer directly, bypassing the write policy.
    pub fn insert(&mut self, id: impl Into<QuestionId>, answer: impl Into<String>) {
        self.values.insert(id.into(), answer.into());
    }

    /// Get the answer for a question.
    pub fn get(&self, id: &QuestionId) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }

    /// Check if an answer exists for a question.
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.values.contains_key(id)
    }

    /// Remove the answer for a question.
    pub fn remove(&mut self, id: &QuestionId) -> Option<String> {
        self.values.remove(id)
    }

    /// Get an iterator over all id-answer pairs, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &str)> {
        self.values.iter().map(|(id, answer)| (id, answer.as_str()))
    }

    /// Get the number of answers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no answers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
