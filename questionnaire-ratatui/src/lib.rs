//! # questionnaire-ratatui
//!
//! Terminal backend for the daily questionnaire.
//!
//! One card is shown at a time with a thin progress bar, the card's prompt
//! and its widget (option list, checkbox list or text field), toasts below
//! the card and a modal for confirmations.
//!
//! ## Example
//!
//! ```rust,ignore
//! use questionnaire::Controller;
//! use questionnaire_ratatui::{CrosstermConsole, Screen, run, terminal_session};
//!
//! let questions = questionnaire::build_registry(&cards);
//! let screen = Screen::new(questions.clone()).with_title("Daily questions");
//! let (page, notifier) = terminal_session(screen, CrosstermConsole::open()?);
//!
//! let mut controller = Controller::new(questions, page, notifier, server);
//! let end = run(&mut controller).await?;
//! ```

mod backend;
mod console;
mod screen;
mod theme;
mod ui;

pub use backend::{SessionEnd, TerminalNotifier, TerminalPage, run, terminal_session};
pub use console::{Console, CrosstermConsole, TerminalError, TestConsole};
pub use screen::{DEFAULT_TOAST_TTL, Screen, Toast};
pub use theme::Theme;
pub use ui::draw;
