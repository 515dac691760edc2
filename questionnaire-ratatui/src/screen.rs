use std::time::{Duration, Instant};

use questionnaire::{InputKind, Notice, PagerView, Question, QuestionId, WidgetState};

use crate::Theme;

/// How long a toast stays up by default.
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(5);

/// A notice and when it was shown.
#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    pub shown_at: Instant,
}

/// Everything the terminal draws: the cards with their widget states, the
/// current render instruction, toasts and the confirmation modal.
///
/// All cards exist for the whole session; only the one named by the last
/// [`PagerView`] is drawn.
#[derive(Debug, Clone)]
pub struct Screen {
    title: String,
    theme: Theme,
    questions: Vec<Question>,
    widgets: Vec<WidgetState>,
    view: Option<PagerView>,
    /// Focused option on the visible card.
    cursor: usize,
    toasts: Vec<Toast>,
    toast_ttl: Duration,
    prompt: Option<String>,
    navigated_to: Option<String>,
}

impl Screen {
    pub fn new(questions: Vec<Question>) -> Self {
        let widgets = questions
            .iter()
            .map(|q| WidgetState::blank(q.kind()))
            .collect();
        Self {
            title: "Daily questions".to_string(),
            theme: Theme::default(),
            questions,
            widgets,
            view: None,
            cursor: 0,
            toasts: Vec::new(),
            toast_ttl: DEFAULT_TOAST_TTL,
            prompt: None,
            navigated_to: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_toast_ttl(mut self, ttl: Duration) -> Self {
        self.toast_ttl = ttl;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn view(&self) -> Option<&PagerView> {
        self.view.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn navigated_to(&self) -> Option<&str> {
        self.navigated_to.as_deref()
    }

    /// Apply a render instruction. Focus goes back to the first option when
    /// the visible card changes.
    pub fn show(&mut self, view: &PagerView) {
        if self.view.map(|v| v.index) != Some(view.index) {
            self.cursor = 0;
        }
        self.view = Some(*view);
    }

    /// The question on the visible card.
    pub fn visible(&self) -> Option<(&Question, &WidgetState)> {
        let index = self.view?.index;
        Some((self.questions.get(index)?, self.widgets.get(index)?))
    }

    fn slot(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| q.id() == id)
    }

    /// The widget state of any card, visible or not.
    pub fn widget(&self, question: &Question) -> WidgetState {
        self.slot(question.id())
            .and_then(|slot| self.widgets.get(slot))
            .filter(|state| state.kind() == question.kind())
            .cloned()
            .unwrap_or_else(|| WidgetState::blank(question.kind()))
    }

    pub fn set_widget(&mut self, question: &Question, state: &WidgetState) {
        if let Some(slot) = self.slot(question.id()) {
            self.widgets[slot] = state.clone();
        }
    }

    pub fn navigate(&mut self, location: &str) {
        self.navigated_to = Some(location.to_string());
    }

    /// Move focus up one option.
    pub fn focus_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move focus down one option.
    pub fn focus_next(&mut self) {
        let options = self.visible().map_or(0, |(q, _)| q.options().len());
        if self.cursor + 1 < options {
            self.cursor += 1;
        }
    }

    /// Space on the visible card: pick the focused option, toggle the focused
    /// box, or type a space into a text field.
    pub fn activate(&mut self) {
        let Some(index) = self.view.map(|v| v.index) else {
            return;
        };
        let Some(question) = self.questions.get(index) else {
            return;
        };
        let focused = question.options().get(self.cursor).cloned();
        let Some(widget) = self.widgets.get_mut(index) else {
            return;
        };

        match widget {
            WidgetState::SingleChoice { selected } => {
                if focused.is_some() {
                    *selected = focused;
                }
            }
            WidgetState::Radio { checked } => {
                if focused.is_some() {
                    *checked = focused;
                }
            }
            WidgetState::Checkboxes { checked } => {
                if let Some(token) = focused {
                    if let Some(pos) = checked.iter().position(|t| *t == token) {
                        checked.remove(pos);
                    } else {
                        checked.push(token);
                    }
                }
            }
            WidgetState::FreeText { text } => text.push(' '),
        }
    }

    /// Type into the visible card if it is a text field.
    pub fn type_char(&mut self, c: char) {
        if let Some(WidgetState::FreeText { text }) = self.visible_widget_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(WidgetState::FreeText { text }) = self.visible_widget_mut() {
            text.pop();
        }
    }

    fn visible_widget_mut(&mut self) -> Option<&mut WidgetState> {
        let index = self.view?.index;
        self.widgets.get_mut(index)
    }

    /// Check if the visible card takes typed text.
    pub fn accepts_text(&self) -> bool {
        self.visible()
            .is_some_and(|(q, _)| q.kind() == InputKind::FreeText)
    }

    pub fn push_toast(&mut self, notice: Notice) {
        self.toasts.push(Toast {
            notice,
            shown_at: Instant::now(),
        });
    }

    /// Drop toasts older than the TTL. Returns whether any were dropped.
    pub fn expire_toasts(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        let ttl = self.toast_ttl;
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < ttl);
        self.toasts.len() != before
    }

    pub fn set_prompt(&mut self, prompt: Option<String>) {
        self.prompt = prompt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Screen {
        Screen::new(vec![
            Question::new("1", "Sleep", InputKind::SingleChoice).with_options(["A", "B"]),
            Question::new("2", "Chores", InputKind::CheckboxGroup).with_options(["x", "y", "z"]),
            Question::new("3", "Notes", InputKind::FreeText),
        ])
    }

    fn view(index: usize) -> PagerView {
        let mut pager = questionnaire::PagerState::new(3);
        for _ in 0..index {
            pager.next();
        }
        pager.view(false).unwrap()
    }

    #[test]
    fn focus_is_bounded_by_options() {
        let mut screen = screen();
        screen.show(&view(0));

        screen.focus_next();
        screen.focus_next();
        assert_eq!(screen.cursor(), 1);

        screen.focus_previous();
        screen.focus_previous();
        assert_eq!(screen.cursor(), 0);
    }

    #[test]
    fn focus_resets_on_new_card() {
        let mut screen = screen();
        screen.show(&view(1));
        screen.focus_next();

        screen.show(&view(1));
        assert_eq!(screen.cursor(), 1);

        screen.show(&view(2));
        assert_eq!(screen.cursor(), 0);
    }

    #[test]
    fn space_toggles_boxes() {
        let mut screen = screen();
        screen.show(&view(1));
        screen.focus_next();
        screen.activate();
        screen.focus_previous();
        screen.activate();

        let (question, state) = screen.visible().unwrap();
        assert_eq!(state.resolve(question).as_deref(), Some("x,y"));

        screen.activate();
        let (question, state) = screen.visible().unwrap();
        assert_eq!(state.resolve(question).as_deref(), Some("y"));
    }

    #[test]
    fn typing_only_reaches_text_fields() {
        let mut screen = screen();
        screen.show(&view(0));
        screen.type_char('q');
        assert!(!screen.accepts_text());
        assert_eq!(screen.visible().unwrap().1, &WidgetState::SingleChoice { selected: None });

        screen.show(&view(2));
        for c in "ok!".chars() {
            screen.type_char(c);
        }
        screen.backspace();
        assert_eq!(
            screen.visible().unwrap().1,
            &WidgetState::FreeText { text: "ok".into() }
        );
    }

    #[test]
    fn toasts_expire() {
        let mut screen = screen().with_toast_ttl(Duration::from_secs(5));
        screen.push_toast(Notice::info("hello"));
        let shown = screen.toasts()[0].shown_at;

        assert!(!screen.expire_toasts(shown + Duration::from_secs(4)));
        assert!(screen.expire_toasts(shown + Duration::from_secs(5)));
        assert!(screen.toasts().is_empty());
    }
}
