use serde::{Deserialize, Serialize};

use crate::QuestionId;

/// A single question card on the questionnaire page.
///
/// Built once per page load by [`build_registry`](crate::build_registry) and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Key of this question's answer in the `Responses` map.
    id: QuestionId,

    /// The prompt text shown on the card.
    prompt: String,

    /// Optional longer explanation shown under the prompt.
    description: Option<String>,

    /// Whether leaving this question unanswered blocks submission.
    required: bool,

    /// The widget used to answer this question.
    kind: InputKind,

    /// Option tokens for choice widgets, in document order.
    options: Vec<String>,
}

impl Question {
    /// Create a new optional question without options.
    pub fn new(id: impl Into<QuestionId>, prompt: impl Into<String>, kind: InputKind) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            description: None,
            required: false,
            kind,
            options: Vec::new(),
        }
    }

    /// Mark the question as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the required flag.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the option tokens (document order).
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Position of an option token in document order.
    pub fn option_position(&self, token: &str) -> Option<usize> {
        self.options.iter().position(|o| o == token)
    }

    /// Check whether `token` is one of this question's options.
    pub fn has_option(&self, token: &str) -> bool {
        self.option_position(token).is_some()
    }
}

/// The widget a question is answered with.
///
/// Serialized with the type names the server stores (`select`, `checkbox`,
/// `radio`, `text`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    /// A group of custom buttons; exactly one can be highlighted.
    #[serde(rename = "select")]
    SingleChoice,

    /// A group of checkboxes; any number can be ticked.
    #[serde(rename = "checkbox")]
    CheckboxGroup,

    /// A group of radio inputs.
    #[serde(rename = "radio")]
    RadioGroup,

    /// A free-text field.
    #[serde(rename = "text")]
    FreeText,
}

impl InputKind {
    /// Parse the `type` attribute of a card. Case-insensitive, surrounding
    /// whitespace ignored.
    pub fn from_markup(type_attr: &str) -> Option<Self> {
        match type_attr.trim().to_ascii_lowercase().as_str() {
            "select" => Some(Self::SingleChoice),
            "checkbox" => Some(Self::CheckboxGroup),
            "radio" => Some(Self::RadioGroup),
            "text" => Some(Self::FreeText),
            _ => None,
        }
    }

    /// The type name used in markup and on the wire.
    pub fn markup_name(&self) -> &'static str {
        match self {
            Self::SingleChoice => "select",
            Self::CheckboxGroup => "checkbox",
            Self::RadioGroup => "radio",
            Self::FreeText => "text",
        }
    }

    /// Check if the widget picks from a fixed set of options.
    pub fn is_choice(&self) -> bool {
        !matches!(self, Self::FreeText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_names_round_trip() {
        for kind in [
            InputKind::SingleChoice,
            InputKind::CheckboxGroup,
            InputKind::RadioGroup,
            InputKind::FreeText,
        ] {
            assert_eq!(InputKind::from_markup(kind.markup_name()), Some(kind));
        }
    }

    #[test]
    fn markup_parsing_is_lenient_about_case() {
        assert_eq!(
            InputKind::from_markup(" Checkbox "),
            Some(InputKind::CheckboxGroup)
        );
        assert_eq!(InputKind::from_markup("multiple_choice"), None);
    }

    #[test]
    fn builder_sets_fields() {
        let q = Question::new("7", "Slept well?", InputKind::SingleChoice)
            .required()
            .with_options(["Yes", "No"])
            .with_description("Last night");

        assert_eq!(q.id().as_str(), "7");
        assert!(q.is_required());
        assert_eq!(q.option_position("No"), Some(1));
        assert!(!q.has_option("Maybe"));
        assert_eq!(q.description(), Some("Last night"));
    }
}
