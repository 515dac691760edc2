//! # questionnaire
//!
//! A paged daily questionnaire. Backend-agnostic.
//!
//! The [`Controller`] owns one session: the question list built from the page,
//! the paging cursor and the captured answers. It drives a [`Page`] (whatever
//! renders the cards), a [`Notifier`] (toasts and confirmations) and a
//! [`QuestionServer`] (the HTTP endpoints).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use questionnaire::{CardMarkup, Controller};
//!
//! let cards: Vec<CardMarkup> = load_cards()?;
//! let mut controller = Controller::from_markup(&cards, page, notifier, server);
//!
//! controller.next();
//! controller.previous();
//! controller.validate_and_submit().await?;
//! ```
//!
//! ## Flow
//!
//! 1. The registry turns card markup into questions once, at load time.
//! 2. The pager shows question 0.
//! 3. Every navigation step first captures the visible answer.
//! 4. Submitting captures, checks required questions, asks for confirmation,
//!    posts `{date, responses}` and reports the outcome.
//!
//! ## Backends
//!
//! - `questionnaire-ratatui` - terminal page and notifier
//! - `questionnaire-http` - reqwest client for the server endpoints
//! - [`TestPage`], [`TestNotifier`], [`TestServer`] - in-memory, for tests

// Re-export all types from questionnaire-types
pub use questionnaire_types::*;

mod controller;
pub use controller::{Controller, ControllerConfig, Outcome};

mod admin;
pub use admin::AdminController;

mod messages;
pub use messages::*;

// Test backend for driving the controller without a UI or network
mod test_backend;
pub use test_backend::{Exchange, TestAdminPage, TestNotifier, TestPage, TestServer};
