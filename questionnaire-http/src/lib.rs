//! # questionnaire-http
//!
//! reqwest client for the questionnaire server.
//!
//! [`HttpServer`] implements [`questionnaire::QuestionServer`] over the three
//! JSON endpoints:
//!
//! | Operation          | Request                   |
//! |--------------------|---------------------------|
//! | `submit_responses` | `POST /submit_responses`  |
//! | `add_question`     | `POST /add_question`      |
//! | `delete_question`  | `DELETE /question/{id}`   |
//!
//! Every request is sent as an AJAX call (`X-Requested-With: XMLHttpRequest`)
//! so the server answers with its `{status, message}` envelope instead of an
//! HTML redirect.
//!
//! ## Example
//!
//! ```rust,ignore
//! use questionnaire_http::HttpServer;
//!
//! let server = HttpServer::builder("http://127.0.0.1:5002".parse()?)
//!     .session_cookie("session=abc123")
//!     .build()?;
//! let controller = Controller::from_markup(&cards, page, notifier, server);
//! ```

mod client;

pub use client::{DEFAULT_TIMEOUT, HttpError, HttpServer, HttpServerBuilder};
