//! Request and reply bodies exchanged with the questionnaire server.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use url::Url;

use crate::{InputKind, QuestionnaireError, Responses, ValidationError};

/// The `status` value of a successful reply.
pub const STATUS_SUCCESS: &str = "success";

/// Shown when a request fails and the server gave no message.
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Body of `POST /submit_responses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// The questionnaire day, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub responses: Responses,
}

impl Submission {
    pub fn new(date: NaiveDate, responses: Responses) -> Self {
        Self { date, responses }
    }
}

/// The JSON envelope every endpoint answers with.
///
/// `{ "status": "success" }` or `{ "status": "error", "message": "..." }`.
/// Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerReply {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServerReply {
    pub fn success() -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Turn a failure-shaped reply into an error carrying the server's message.
    pub fn into_result(self) -> Result<(), QuestionnaireError> {
        if self.is_success() {
            return Ok(());
        }
        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
        Err(QuestionnaireError::Server { message })
    }
}

/// Body of `POST /add_question` (admin form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewQuestion {
    pub text: String,

    #[serde(rename = "type")]
    pub question_type: InputKind,

    /// One option per line; the server normalizes them.
    pub options: String,

    pub descripcion: String,

    #[serde(serialize_with = "as_flag")]
    pub is_required: bool,

    /// An existing category to file the question under.
    pub categoria_existente: String,

    /// A new category to create. Mutually exclusive with `categoria_existente`.
    pub nueva_categoria: String,
}

fn as_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

impl NewQuestion {
    pub fn new(text: impl Into<String>, question_type: InputKind) -> Self {
        Self {
            text: text.into(),
            question_type,
            options: String::new(),
            descripcion: String::new(),
            is_required: false,
            categoria_existente: String::new(),
            nueva_categoria: String::new(),
        }
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = options.into();
        self
    }

    pub fn with_description(mut self, descripcion: impl Into<String>) -> Self {
        self.descripcion = descripcion.into();
        self
    }

    pub fn required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }

    pub fn in_category(mut self, categoria: impl Into<String>) -> Self {
        self.categoria_existente = categoria.into();
        self
    }

    pub fn in_new_category(mut self, categoria: impl Into<String>) -> Self {
        self.nueva_categoria = categoria.into();
        self
    }

    /// Option lines that carry a value.
    pub fn option_lines(&self) -> impl Iterator<Item = &str> {
        self.options
            .lines()
            .map(|line| line.trim().trim_start_matches('-').trim())
            .filter(|line| !line.is_empty())
    }

    /// Client-side checks, run before anything is sent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.categoria_existente.trim().is_empty() && !self.nueva_categoria.trim().is_empty() {
            return Err(ValidationError::CategoryConflict);
        }
        if self.text.trim().is_empty() {
            return Err(ValidationError::MissingText);
        }
        let needs_options = matches!(
            self.question_type,
            InputKind::CheckboxGroup | InputKind::RadioGroup
        );
        if needs_options && self.option_lines().next().is_none() {
            return Err(ValidationError::MissingOptions);
        }
        Ok(())
    }
}

/// The location to reload after a change: same page, no query or fragment.
pub fn strip_query(location: &Url) -> Url {
    let mut stripped = location.clone();
    stripped.set_query(None);
    stripped.set_fragment(None);
    stripped
}
