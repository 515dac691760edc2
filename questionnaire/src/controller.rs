use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};

use crate::messages::{CONFIRM_SUBMIT, SUBMIT_FAILED, SUBMIT_SUCCESS};
use crate::{
    CardMarkup, Notifier, Page, PagerState, Question, QuestionId, QuestionServer,
    QuestionnaireError, Responses, Submission, ValidationError, WidgetState, build_registry,
};

/// Settings for the submission step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Where to go after a successful submission.
    pub results_path: String,

    /// How long the success toast stays up before navigating.
    pub redirect_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            results_path: "/stats".to_string(),
            redirect_delay: Duration::from_millis(1500),
        }
    }
}

/// How a user-confirmed flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request was sent and the server accepted it.
    Completed,

    /// The user answered "no" to the confirmation; nothing changed.
    Declined,
}

/// One questionnaire session.
///
/// Created once per page load, with the question list fixed at construction.
/// Owns the page, notifier and server it drives.
pub struct Controller<P, N, S> {
    questions: Vec<Question>,
    pager: PagerState,
    responses: Responses,
    page: P,
    notifier: N,
    server: S,
    config: ControllerConfig,
    today: Box<dyn Fn() -> NaiveDate>,
    submission_pending: bool,
}

impl<P, N, S> Controller<P, N, S>
where
    P: Page,
    N: Notifier,
    S: QuestionServer,
{
    /// Build the registry from the rendered cards and show the first question.
    pub fn from_markup(cards: &[CardMarkup], page: P, notifier: N, server: S) -> Self {
        Self::new(build_registry(cards), page, notifier, server)
    }

    /// Start a session over an already built question list and show the
    /// first question (if any).
    pub fn new(questions: Vec<Question>, page: P, notifier: N, server: S) -> Self {
        let mut controller = Self {
            pager: PagerState::new(questions.len()),
            questions,
            responses: Responses::new(),
            page,
            notifier,
            server,
            config: ControllerConfig::default(),
            today: Box::new(|| Utc::now().date_naive()),
            submission_pending: false,
        };
        debug!(total = controller.questions.len(), "questionnaire loaded");
        controller.render();
        controller
    }

    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the clock used for the submission date.
    pub fn with_date_source(mut self, today: impl Fn() -> NaiveDate + 'static) -> Self {
        self.today = Box::new(today);
        self
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    pub fn pager(&self) -> &PagerState {
        &self.pager
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The question on the visible card.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.pager.current_index())
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn is_submission_pending(&self) -> bool {
        self.submission_pending
    }

    /// Show the current card and put its captured answer back on its widget.
    ///
    /// Calling this twice in a row leaves the page in the same state.
    pub fn render(&mut self) {
        let Some(view) = self.pager.view(self.submission_pending) else {
            return;
        };
        self.page.render(&view);

        let Some(question) = self.questions.get(view.index) else {
            return;
        };
        if let Some(answer) = self.responses.get(question.id()) {
            let restored = WidgetState::from_answer(question, answer);
            self.page.restore_widget(question, &restored);
        }
    }

    /// Capture the visible answer and move to the next card.
    ///
    /// Returns whether the cursor moved (it never moves past the last card).
    pub fn next(&mut self) -> bool {
        self.capture_current();
        let moved = self.pager.next();
        if moved {
            debug!(index = self.pager.current_index(), "next question");
            self.render();
        }
        moved
    }

    /// Capture the visible answer and move to the previous card.
    ///
    /// Returns whether the cursor moved (it never moves before the first card).
    pub fn previous(&mut self) -> bool {
        self.capture_current();
        let moved = self.pager.previous();
        if moved {
            debug!(index = self.pager.current_index(), "previous question");
            self.render();
        }
        moved
    }

    /// Read the visible question's widget into the response map.
    ///
    /// Required questions without a usable answer are removed from the map;
    /// optional questions are always stored, possibly as `""`.
    pub fn capture_current(&mut self) {
        let Some(question) = self.questions.get(self.pager.current_index()) else {
            return;
        };
        let value = self.page.read_widget(question).resolve(question);
        debug!(id = %question.id(), answered = value.is_some(), "captured answer");
        self.responses.record(question, value);
    }

    /// Required questions with no usable answer, in registry order.
    ///
    /// A question only counts as missing when it is absent from the response
    /// map *and* its widget currently shows nothing.
    pub fn missing_required(&self) -> Vec<QuestionId> {
        self.questions
            .iter()
            .filter(|q| q.is_required())
            .filter(|q| !self.responses.contains(q.id()))
            .filter(|q| self.page.read_widget(q).is_blank(q))
            .map(|q| q.id().clone())
            .collect()
    }

    /// Capture, validate, confirm and submit the collected answers.
    ///
    /// Failures are reported through the notifier before being returned;
    /// the collected answers are never discarded.
    #[instrument(level = "info", skip(self), fields(total = self.questions.len()))]
    pub async fn validate_and_submit(&mut self) -> Result<Outcome, QuestionnaireError> {
        if self.submission_pending {
            warn!("submission already in flight");
            return Err(QuestionnaireError::SubmissionInFlight);
        }

        self.capture_current();

        let missing = self.missing_required();
        if !missing.is_empty() {
            let err = QuestionnaireError::from(ValidationError::MissingRequired(missing));
            warn!(error = %err, "submission blocked");
            self.notifier.notify_error(&err.user_message());
            return Err(err);
        }

        if !self.notifier.confirm(CONFIRM_SUBMIT).await {
            info!("submission declined");
            return Ok(Outcome::Declined);
        }

        self.submission_pending = true;
        self.render_controls();

        let submission = Submission::new((self.today)(), self.responses.clone());
        let result = {
            // Cleared even if this future is dropped mid-request.
            let _pending = PendingGuard(&mut self.submission_pending);
            self.server.submit_responses(&submission).await
        };

        match result
            .map_err(QuestionnaireError::from)
            .and_then(|reply| reply.into_result())
        {
            Ok(()) => {
                info!(date = %submission.date, answers = submission.responses.len(), "responses submitted");
                self.notifier.notify_success(SUBMIT_SUCCESS);
                if !self.config.redirect_delay.is_zero() {
                    tokio::time::sleep(self.config.redirect_delay).await;
                }
                self.page.navigate(&self.config.results_path);
                Ok(Outcome::Completed)
            }
            Err(err) => {
                warn!(error = %err, "submission failed");
                let message = match &err {
                    QuestionnaireError::Transport(_) => SUBMIT_FAILED.to_string(),
                    other => other.user_message(),
                };
                self.notifier.notify_error(&message);
                self.render_controls();
                Err(err)
            }
        }
    }

    // Re-render the current card without touching its widget.
    fn render_controls(&mut self) {
        if let Some(view) = self.pager.view(self.submission_pending) {
            self.page.render(&view);
        }
    }
}

struct PendingGuard<'a>(&'a mut bool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
