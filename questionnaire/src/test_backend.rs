//! In-memory page, notifier and server for driving a session in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use questionnaire::{Controller, ServerReply, TestNotifier, TestPage, TestServer};
//!
//! let server = TestServer::new().with_reply(ServerReply::error("db down"));
//! let mut controller = Controller::new(questions, TestPage::new(), TestNotifier::new(), server);
//!
//! controller.page_mut().select("1", "A");
//! let result = controller.validate_and_submit().await;
//!
//! assert!(result.is_err());
//! assert_eq!(controller.notifier().last_message().as_deref(), Some("db down"));
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use url::Url;

use crate::{
    AdminPage, NewQuestion, Notice, NoticeLevel, Notifier, Page, PagerView, Question, QuestionId,
    QuestionServer, ServerReply, Submission, TransportError, WidgetState,
};

/// A page that keeps widget states in a map and records what it was told.
#[derive(Debug, Clone, Default)]
pub struct TestPage {
    widgets: HashMap<QuestionId, WidgetState>,
    views: Vec<PagerView>,
    navigated_to: Option<String>,
}

impl TestPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight a button of a single-choice group.
    pub fn select(&mut self, id: impl Into<QuestionId>, token: &str) {
        self.widgets.insert(
            id.into(),
            WidgetState::SingleChoice {
                selected: Some(token.to_string()),
            },
        );
    }

    /// Toggle one box of a checkbox group.
    pub fn tick(&mut self, id: impl Into<QuestionId>, token: &str) {
        let entry = self
            .widgets
            .entry(id.into())
            .or_insert_with(|| WidgetState::Checkboxes {
                checked: Vec::new(),
            });
        if let WidgetState::Checkboxes { checked } = entry {
            if let Some(pos) = checked.iter().position(|t| t == token) {
                checked.remove(pos);
            } else {
                checked.push(token.to_string());
            }
        } else {
            *entry = WidgetState::Checkboxes {
                checked: vec![token.to_string()],
            };
        }
    }

    /// Check one input of a radio group.
    pub fn choose(&mut self, id: impl Into<QuestionId>, token: &str) {
        self.widgets.insert(
            id.into(),
            WidgetState::Radio {
                checked: Some(token.to_string()),
            },
        );
    }

    /// Replace the content of a free-text field.
    pub fn type_text(&mut self, id: impl Into<QuestionId>, text: &str) {
        self.widgets.insert(
            id.into(),
            WidgetState::FreeText {
                text: text.to_string(),
            },
        );
    }

    /// Put a widget back to its untouched state.
    pub fn clear(&mut self, id: impl Into<QuestionId>) {
        self.widgets.remove(&id.into());
    }

    pub fn widget(&self, id: impl Into<QuestionId>) -> Option<&WidgetState> {
        self.widgets.get(&id.into())
    }

    /// Every render instruction received, oldest first.
    pub fn views(&self) -> &[PagerView] {
        &self.views
    }

    pub fn last_view(&self) -> Option<&PagerView> {
        self.views.last()
    }

    /// The index of the only visible card.
    pub fn visible_card(&self) -> Option<usize> {
        self.last_view().map(|view| view.index)
    }

    pub fn navigated_to(&self) -> Option<&str> {
        self.navigated_to.as_deref()
    }
}

impl Page for TestPage {
    fn render(&mut self, view: &PagerView) {
        self.views.push(*view);
    }

    fn read_widget(&self, question: &Question) -> WidgetState {
        self.widgets
            .get(question.id())
            .filter(|state| state.kind() == question.kind())
            .cloned()
            .unwrap_or_else(|| WidgetState::blank(question.kind()))
    }

    fn restore_widget(&mut self, question: &Question, state: &WidgetState) {
        self.widgets.insert(question.id().clone(), state.clone());
    }

    fn navigate(&mut self, location: &str) {
        self.navigated_to = Some(location.to_string());
    }
}

/// Records notices and answers confirmations from a script.
///
/// Confirmations answer "yes" once the script runs out.
#[derive(Debug, Default)]
pub struct TestNotifier {
    notices: RefCell<Vec<Notice>>,
    answers: RefCell<VecDeque<bool>>,
    prompts: RefCell<Vec<String>>,
}

impl TestNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer to the next confirmation.
    pub fn with_confirm(self, answer: bool) -> Self {
        self.answers.borrow_mut().push_back(answer);
        self
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    /// Messages shown at the given level, oldest first.
    pub fn messages(&self, level: NoticeLevel) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn last_message(&self) -> Option<String> {
        self.notices.borrow().last().map(|n| n.message.clone())
    }

    /// Every confirmation prompt shown, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Notifier for TestNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }

    async fn confirm(&self, message: &str) -> bool {
        self.prompts.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop_front().unwrap_or(true)
    }
}

/// A request the [`TestServer`] received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exchange {
    Submit(Submission),
    Add(NewQuestion),
    Delete(QuestionId),
}

/// Answers requests from a script and records them.
///
/// Replies with `{"status": "success"}` once the script runs out.
#[derive(Debug, Default)]
pub struct TestServer {
    replies: RefCell<VecDeque<Scripted>>,
    exchanges: RefCell<Vec<Exchange>>,
}

#[derive(Debug)]
enum Scripted {
    Reply(Result<ServerReply, TransportError>),
    Stall,
}

impl TestServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the envelope for the next request.
    pub fn with_reply(self, reply: ServerReply) -> Self {
        self.replies.borrow_mut().push_back(Scripted::Reply(Ok(reply)));
        self
    }

    /// Make the next request fail below the envelope.
    pub fn with_failure(self, error: TransportError) -> Self {
        self.replies.borrow_mut().push_back(Scripted::Reply(Err(error)));
        self
    }

    /// Leave the next request unanswered forever (a hung connection).
    pub fn with_stall(self) -> Self {
        self.replies.borrow_mut().push_back(Scripted::Stall);
        self
    }

    pub fn exchanges(&self) -> Vec<Exchange> {
        self.exchanges.borrow().clone()
    }

    /// Submissions received, oldest first.
    pub fn submissions(&self) -> Vec<Submission> {
        self.exchanges
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Exchange::Submit(submission) => Some(submission.clone()),
                _ => None,
            })
            .collect()
    }

    async fn answer(&self, exchange: Exchange) -> Result<ServerReply, TransportError> {
        self.exchanges.borrow_mut().push(exchange);
        let next = self.replies.borrow_mut().pop_front();
        match next {
            Some(Scripted::Reply(reply)) => reply,
            Some(Scripted::Stall) => std::future::pending().await,
            None => Ok(ServerReply::success()),
        }
    }
}

#[async_trait(?Send)]
impl QuestionServer for TestServer {
    async fn submit_responses(
        &self,
        submission: &Submission,
    ) -> Result<ServerReply, TransportError> {
        self.answer(Exchange::Submit(submission.clone())).await
    }

    async fn add_question(&self, question: &NewQuestion) -> Result<ServerReply, TransportError> {
        self.answer(Exchange::Add(question.clone())).await
    }

    async fn delete_question(&self, id: &QuestionId) -> Result<ServerReply, TransportError> {
        self.answer(Exchange::Delete(id.clone())).await
    }
}

/// An admin list that records reloads and removals.
#[derive(Debug, Clone)]
pub struct TestAdminPage {
    location: Url,
    items: Vec<QuestionId>,
    reloaded_to: Option<Url>,
}

impl TestAdminPage {
    pub fn new(location: Url) -> Self {
        Self {
            location,
            items: Vec::new(),
            reloaded_to: None,
        }
    }

    pub fn with_items<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<QuestionId>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn items(&self) -> &[QuestionId] {
        &self.items
    }

    pub fn reloaded_to(&self) -> Option<&Url> {
        self.reloaded_to.as_ref()
    }
}

impl AdminPage for TestAdminPage {
    fn location(&self) -> Url {
        self.location.clone()
    }

    fn reload(&mut self, location: &Url) {
        self.location = location.clone();
        self.reloaded_to = Some(location.clone());
    }

    fn remove_item(&mut self, id: &QuestionId) {
        self.items.retain(|item| item != id);
    }
}
