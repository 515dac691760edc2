use crate::{FALLBACK_ERROR_MESSAGE, QuestionId};

/// Error type for questionnaire operations.
///
/// None of these end the session: the state is left intact and the user can
/// retry the action.
#[derive(Debug, thiserror::Error)]
pub enum QuestionnaireError {
    /// Rejected locally, nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server answered with a failure-shaped reply.
    #[error("{message}")]
    Server { message: String },

    /// The request did not produce a usable reply.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A submission is already pending.
    #[error("Your responses are already being submitted")]
    SubmissionInFlight,
}

impl QuestionnaireError {
    /// The text to show the user for this error.
    ///
    /// Server messages are shown verbatim; transport failures get the generic
    /// fallback.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => FALLBACK_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Check if this error was raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Problems detected on the client before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please answer all required questions (missing: {})", join_ids(.0))]
    MissingRequired(Vec<QuestionId>),

    #[error("Choose an existing category or enter a new one, not both")]
    CategoryConflict,

    #[error("The question text is required")]
    MissingText,

    #[error("Provide at least one option for this type of question")]
    MissingOptions,
}

fn join_ids(ids: &[QuestionId]) -> String {
    ids.iter()
        .map(QuestionId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failures below the reply envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection, timeout or body read failure.
    #[error("Request failed: {0}")]
    Request(String),

    /// The body was not a `{status, message}` envelope.
    #[error("Unexpected reply from server (HTTP {status})")]
    UnexpectedReply { status: u16 },
}
