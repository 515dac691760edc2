use async_trait::async_trait;
use url::Url;

use crate::{
    NewQuestion, Notice, PagerView, Question, QuestionId, ServerReply, Submission, TransportError,
    WidgetState,
};

/// The questionnaire page: the cards, their widgets and the navigation bar.
///
/// The controller never asks which card is visible; it tells the page.
pub trait Page {
    /// Show card `view.index` and hide every other card, update the progress
    /// indicator and navigation buttons. Must be idempotent.
    fn render(&mut self, view: &PagerView);

    /// Read the current state of a question's widget.
    fn read_widget(&self, question: &Question) -> WidgetState;

    /// Put a previously captured answer back onto a question's widget.
    fn restore_widget(&mut self, question: &Question, state: &WidgetState);

    /// Leave the questionnaire for another view (e.g. the results page).
    fn navigate(&mut self, location: &str);
}

/// The admin question list.
pub trait AdminPage {
    /// Where the page currently is, including any query string.
    fn location(&self) -> Url;

    /// Reload the page at `location`.
    fn reload(&mut self, location: &Url);

    /// Remove a question's entry from the list.
    fn remove_item(&mut self, id: &QuestionId);
}

/// Toasts and yes/no confirmations.
///
/// A pure presentation adapter; any UI toolkit can implement it.
#[async_trait(?Send)]
pub trait Notifier {
    /// Show a transient notice.
    fn notify(&self, notice: Notice);

    /// Ask a yes/no question and wait for the answer.
    async fn confirm(&self, message: &str) -> bool;

    fn notify_success(&self, message: &str) {
        self.notify(Notice::success(message));
    }

    fn notify_error(&self, message: &str) {
        self.notify(Notice::error(message));
    }

    fn notify_info(&self, message: &str) {
        self.notify(Notice::info(message));
    }
}

/// The three server endpoints the client talks to.
///
/// Implementations return the reply envelope whatever its status; turning a
/// failure-shaped reply into an error is the caller's decision.
#[async_trait(?Send)]
pub trait QuestionServer {
    /// `POST /submit_responses`
    async fn submit_responses(&self, submission: &Submission)
    -> Result<ServerReply, TransportError>;

    /// `POST /add_question`
    async fn add_question(&self, question: &NewQuestion) -> Result<ServerReply, TransportError>;

    /// `DELETE /question/{id}`
    async fn delete_question(&self, id: &QuestionId) -> Result<ServerReply, TransportError>;
}
