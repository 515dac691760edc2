//! Core types for the questionnaire crate.
//!
//! This crate provides the foundational types for a paged daily questionnaire:
//! - `Question` and `InputKind` - Individual questions and the widget they use
//! - `CardMarkup` and `build_registry` - Turning rendered cards into questions
//! - `WidgetState` and `Responses` - Live widget state and the captured answers
//! - `PagerState` and `PagerView` - The linear paging cursor and what it renders
//! - `Submission`, `ServerReply` and `NewQuestion` - Wire payloads
//! - `Page`, `AdminPage`, `Notifier` and `QuestionServer` - Seams to the outside world

mod question_id;
pub use question_id::QuestionId;

mod question;
pub use question::{InputKind, Question};

mod registry;
pub use registry::{CardMarkup, build_registry, parse_required, split_options};

mod widget;
pub use widget::WidgetState;

mod responses;
pub use responses::Responses;

mod pager;
pub use pager::{NavControls, PagerState, PagerView, Progress};

mod payload;
pub use payload::{
    FALLBACK_ERROR_MESSAGE, NewQuestion, STATUS_SUCCESS, ServerReply, Submission, strip_query,
};

mod notice;
pub use notice::{Notice, NoticeLevel};

mod error;
pub use error::{QuestionnaireError, TransportError, ValidationError};

mod traits;
pub use traits::{AdminPage, Notifier, Page, QuestionServer};
