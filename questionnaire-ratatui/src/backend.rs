//! The page and notifier halves of one terminal session, and its key loop.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use questionnaire::{
    Controller, Notice, Notifier, Page, PagerView, Question, QuestionServer, WidgetState,
};
use tracing::{debug, warn};

use crate::{Console, Screen, TerminalError};

/// How long to wait for a key before redrawing (toasts expire meanwhile).
const POLL_INTERVAL: Duration = Duration::from_millis(250);

struct Session {
    screen: RefCell<Screen>,
    console: RefCell<Box<dyn Console>>,
}

impl Session {
    fn redraw(&self) -> Result<(), TerminalError> {
        self.screen.borrow_mut().expire_toasts(Instant::now());
        let screen = self.screen.borrow();
        self.console.borrow_mut().draw(&screen)
    }

    // Page and notifier calls cannot fail; a lost frame is redrawn on the next key.
    fn redraw_or_log(&self) {
        if let Err(err) = self.redraw() {
            warn!(error = %err, "could not draw frame");
        }
    }

    fn next_key(&self) -> Result<Option<KeyEvent>, TerminalError> {
        self.console.borrow_mut().next_key(POLL_INTERVAL)
    }
}

/// Split a screen and console into the page and notifier of one session.
///
/// Both halves draw to the same console.
pub fn terminal_session(
    screen: Screen,
    console: impl Console + 'static,
) -> (TerminalPage, TerminalNotifier) {
    let session = Rc::new(Session {
        screen: RefCell::new(screen),
        console: RefCell::new(Box::new(console)),
    });
    (
        TerminalPage {
            session: session.clone(),
        },
        TerminalNotifier { session },
    )
}

/// Shows one question card at a time.
pub struct TerminalPage {
    session: Rc<Session>,
}

impl TerminalPage {
    /// A copy of the current screen state.
    pub fn screen(&self) -> Screen {
        self.session.screen.borrow().clone()
    }

    pub fn navigated_to(&self) -> Option<String> {
        self.session.screen.borrow().navigated_to().map(str::to_string)
    }

    /// Apply a key that edits the visible card; other keys are ignored.
    fn edit(&self, key: &KeyEvent) {
        let mut screen = self.session.screen.borrow_mut();
        match key.code {
            KeyCode::Up => screen.focus_previous(),
            KeyCode::Down => screen.focus_next(),
            KeyCode::Char(' ') => screen.activate(),
            KeyCode::Backspace => screen.backspace(),
            KeyCode::Char(c) if screen.accepts_text() => screen.type_char(c),
            _ => {}
        }
    }
}

impl Page for TerminalPage {
    fn render(&mut self, view: &PagerView) {
        self.session.screen.borrow_mut().show(view);
        self.session.redraw_or_log();
    }

    fn read_widget(&self, question: &Question) -> WidgetState {
        self.session.screen.borrow().widget(question)
    }

    fn restore_widget(&mut self, question: &Question, state: &WidgetState) {
        self.session.screen.borrow_mut().set_widget(question, state);
        self.session.redraw_or_log();
    }

    fn navigate(&mut self, location: &str) {
        debug!(location, "leaving questionnaire");
        self.session.screen.borrow_mut().navigate(location);
        self.session.redraw_or_log();
    }
}

/// Toasts under the card and a modal yes/no prompt.
pub struct TerminalNotifier {
    session: Rc<Session>,
}

#[async_trait(?Send)]
impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        self.session.screen.borrow_mut().push_toast(notice);
        self.session.redraw_or_log();
    }

    /// `y`/Enter confirms, `n`/Esc declines. A broken terminal declines.
    async fn confirm(&self, message: &str) -> bool {
        self.session
            .screen
            .borrow_mut()
            .set_prompt(Some(message.to_string()));

        let answer = loop {
            if let Err(err) = self.session.redraw() {
                warn!(error = %err, "could not draw confirmation");
                break false;
            }
            match self.session.next_key() {
                Ok(Some(key)) => match key.code {
                    KeyCode::Char('y' | 'Y') | KeyCode::Enter => break true,
                    KeyCode::Char('n' | 'N') | KeyCode::Esc => break false,
                    _ => {}
                },
                Ok(None) => {}
                Err(err) => {
                    warn!(error = %err, "could not read confirmation");
                    break false;
                }
            }
        };

        self.session.screen.borrow_mut().set_prompt(None);
        self.session.redraw_or_log();
        answer
    }
}

/// How a terminal session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The responses were submitted and the page moved on.
    Navigated(String),

    /// The user left with Esc or Ctrl+C; nothing more was sent.
    Quit,
}

/// Drive a session from the keyboard until it navigates away or the user quits.
///
/// | Key        | Action                                   |
/// |------------|------------------------------------------|
/// | Enter      | next card, or submit on the last card    |
/// | → / ←      | next / previous card                     |
/// | ↑ / ↓      | move focus between options               |
/// | Space      | choose the focused option / toggle a box |
/// | Esc        | quit                                     |
pub async fn run<S>(
    controller: &mut Controller<TerminalPage, TerminalNotifier, S>,
) -> Result<SessionEnd, TerminalError>
where
    S: QuestionServer,
{
    loop {
        if let Some(location) = controller.page().navigated_to() {
            return Ok(SessionEnd::Navigated(location));
        }

        controller.page().session.redraw()?;
        let Some(key) = controller.page().session.next_key()? else {
            continue;
        };

        let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c'));
        match key.code {
            _ if ctrl_c => return Ok(SessionEnd::Quit),
            KeyCode::Esc => return Ok(SessionEnd::Quit),
            KeyCode::Enter if controller.pager().is_last() => {
                if let Err(err) = controller.validate_and_submit().await {
                    debug!(error = %err, "submission not completed");
                }
            }
            KeyCode::Enter | KeyCode::Right => {
                controller.next();
            }
            KeyCode::Left => {
                controller.previous();
            }
            _ => {
                controller.page().edit(&key);
            }
        }
    }
}
