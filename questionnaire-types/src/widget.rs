use crate::{InputKind, Question};

/// The live state of a question's input widget.
///
/// Pages report this when asked to read a card, and receive it back when a
/// previously captured answer is restored onto a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetState {
    /// The highlighted button of a single-choice group, if any.
    SingleChoice { selected: Option<String> },

    /// The ticked boxes of a checkbox group.
    Checkboxes { checked: Vec<String> },

    /// The checked radio input, if any.
    Radio { checked: Option<String> },

    /// The content of a free-text field, untrimmed.
    FreeText { text: String },
}

impl WidgetState {
    /// An untouched widget of the given kind.
    pub fn blank(kind: InputKind) -> Self {
        match kind {
            InputKind::SingleChoice => Self::SingleChoice { selected: None },
            InputKind::CheckboxGroup => Self::Checkboxes {
                checked: Vec::new(),
            },
            InputKind::RadioGroup => Self::Radio { checked: None },
            InputKind::FreeText => Self::FreeText {
                text: String::new(),
            },
        }
    }

    /// The kind of widget this state belongs to.
    pub fn kind(&self) -> InputKind {
        match self {
            Self::SingleChoice { .. } => InputKind::SingleChoice,
            Self::Checkboxes { .. } => InputKind::CheckboxGroup,
            Self::Radio { .. } => InputKind::RadioGroup,
            Self::FreeText { .. } => InputKind::FreeText,
        }
    }

    /// Resolve the answer this widget currently shows.
    ///
    /// - single choice / radio: the selected token
    /// - checkboxes: ticked tokens joined with `,` in the question's option
    ///   order (tokens the question does not list keep their order, last)
    /// - free text: the trimmed text
    ///
    /// Returns `None` when nothing usable is selected or typed.
    pub fn resolve(&self, question: &Question) -> Option<String> {
        match self {
            Self::SingleChoice { selected } | Self::Radio { checked: selected } => selected
                .as_deref()
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string),
            Self::Checkboxes { checked } => {
                let mut tokens: Vec<&str> = Vec::new();
                for token in checked.iter().map(|t| t.trim()) {
                    if !token.is_empty() && !tokens.contains(&token) {
                        tokens.push(token);
                    }
                }
                if tokens.is_empty() {
                    return None;
                }
                // Stable sort keeps unknown tokens in their reported order.
                tokens.sort_by_key(|token| question.option_position(token).unwrap_or(usize::MAX));
                Some(tokens.join(","))
            }
            Self::FreeText { text } => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }

    /// Check if the widget shows no usable answer.
    pub fn is_blank(&self, question: &Question) -> bool {
        self.resolve(question).is_none()
    }

    /// Rebuild the widget state that displays a previously captured answer.
    ///
    /// Choice tokens the question does not offer are dropped.
    pub fn from_answer(question: &Question, answer: &str) -> Self {
        match question.kind() {
            InputKind::SingleChoice => Self::SingleChoice {
                selected: known_option(question, answer),
            },
            InputKind::RadioGroup => Self::Radio {
                checked: known_option(question, answer),
            },
            InputKind::CheckboxGroup => {
                let ticked: Vec<&str> = answer.split(',').map(str::trim).collect();
                Self::Checkboxes {
                    checked: question
                        .options()
                        .iter()
                        .filter(|option| ticked.contains(&option.as_str()))
                        .cloned()
                        .collect(),
                }
            }
            InputKind::FreeText => Self::FreeText {
                text: answer.to_string(),
            },
        }
    }
}

fn known_option(question: &Question, answer: &str) -> Option<String> {
    let token = answer.trim();
    question.has_option(token).then(|| token.to_string())
}
