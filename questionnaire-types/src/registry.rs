use std::collections::HashSet;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::{InputKind, Question, QuestionId};

/// The raw attributes of one rendered question card.
///
/// This is what the page exposes before any interpretation: every attribute is
/// optional and stringly typed, exactly as it appears in markup. Page files
/// may write `question_id`/`required` as integers or booleans as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CardMarkup {
    #[serde(default, deserialize_with = "attribute")]
    pub question_id: Option<String>,

    #[serde(default, deserialize_with = "attribute")]
    pub required: Option<String>,

    #[serde(default, rename = "type")]
    pub input_type: Option<String>,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub descripcion: Option<String>,

    /// Comma-joined option tokens, as stored by the server.
    #[serde(default)]
    pub options: Option<String>,
}

impl CardMarkup {
    /// Create markup for a card with the given id attribute.
    pub fn new(question_id: impl Into<String>) -> Self {
        Self {
            question_id: Some(question_id.into()),
            ..Self::default()
        }
    }

    pub fn with_required(mut self, required: impl Into<String>) -> Self {
        self.required = Some(required.into());
        self
    }

    pub fn with_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAttribute {
    Text(String),
    Int(i64),
    Bool(bool),
}

fn attribute<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(
        Option::<RawAttribute>::deserialize(deserializer)?.map(|raw| match raw {
            RawAttribute::Text(s) => s,
            RawAttribute::Int(i) => i.to_string(),
            RawAttribute::Bool(b) => if b { "1" } else { "0" }.to_string(),
        }),
    )
}

/// Interpret a `required` attribute. Missing or unrecognised values mean optional.
pub fn parse_required(attr: Option<&str>) -> bool {
    attr.map(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        )
    })
    .unwrap_or(false)
}

/// Split a comma-joined option list, dropping blank tokens.
pub fn split_options(options: &str) -> Vec<String> {
    options
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the ordered question list from the rendered cards.
///
/// Document order is navigation order. Missing attributes are configuration
/// defects: they are logged and degraded, never fatal.
pub fn build_registry(cards: &[CardMarkup]) -> Vec<Question> {
    let questions: Vec<Question> = cards
        .iter()
        .enumerate()
        .map(|(index, card)| build_question(index, card))
        .collect();
    for id in duplicate_ids(&questions) {
        warn!(%id, "several question cards share an id; their answers will overwrite each other");
    }
    questions
}

// Ids used by more than one question, each reported once, in registry order.
fn duplicate_ids(questions: &[Question]) -> Vec<QuestionId> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for question in questions {
        if !seen.insert(question.id()) && !duplicates.contains(question.id()) {
            duplicates.push(question.id().clone());
        }
    }
    duplicates
}

fn build_question(index: usize, card: &CardMarkup) -> Question {
    let id = match card.question_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => QuestionId::new(id),
        _ => {
            warn!(index, "question card has no id; keying it by position");
            QuestionId::positional(index)
        }
    };

    let options = card
        .options
        .as_deref()
        .map(split_options)
        .unwrap_or_default();

    let kind = match card.input_type.as_deref() {
        Some(attr) => InputKind::from_markup(attr).unwrap_or_else(|| {
            warn!(%id, input_type = attr, "unknown question type; using free text");
            InputKind::FreeText
        }),
        None => {
            warn!(%id, "question card has no type; using free text");
            InputKind::FreeText
        }
    };

    // Choice widgets without options cannot be answered.
    let kind = if kind.is_choice() && options.is_empty() {
        warn!(%id, input_type = kind.markup_name(), "choice question has no options; using free text");
        InputKind::FreeText
    } else {
        kind
    };

    let mut question = Question::new(id, card.text.trim(), kind)
        .with_required(parse_required(card.required.as_deref()))
        .with_options(options);
    if let Some(description) = card.descripcion.as_deref().map(str::trim)
        && !description.is_empty()
    {
        question = question.with_description(description);
    }
    question
}
