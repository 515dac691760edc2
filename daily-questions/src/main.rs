//! daily-questions
//!
//! Answer today's questionnaire in the terminal, or add and delete questions.
//!
//! Environment:
//!   DAILY_QUESTIONS_CONFIG : path to the TOML settings (default `daily-questions.toml`)
//!   LOG_LEVEL              : tracing filter, e.g. "debug"
//!   LOG_FORMAT             : "pretty" (default) or "json"

mod config;
mod console;
mod page_file;
mod telemetry;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use questionnaire::{AdminController, Controller, InputKind, NewQuestion, Outcome, build_registry};
use questionnaire_http::HttpServer;
use questionnaire_ratatui::{CrosstermConsole, Screen, SessionEnd, run, terminal_session};
use tracing::{info, instrument};
use url::Url;

use crate::config::Settings;
use crate::console::{ConsoleAdminPage, ConsoleNotifier};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Settings file.
    #[arg(
        long,
        env = "DAILY_QUESTIONS_CONFIG",
        default_value = "daily-questions.toml"
    )]
    config: PathBuf,

    /// Server base URL, overriding the settings file.
    #[arg(long)]
    server: Option<Url>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer today's questions.
    Answer {
        /// Page file with the question cards (default from settings).
        #[arg(long)]
        page: Option<PathBuf>,
    },

    /// Create a question.
    AddQuestion {
        text: String,

        /// select, radio, checkbox or text.
        #[arg(long = "type", value_parser = parse_kind, default_value = "text")]
        kind: InputKind,

        /// An answer option; repeat for each option.
        #[arg(long = "option")]
        options: Vec<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        required: bool,

        /// File under an existing category.
        #[arg(long)]
        category: Option<String>,

        /// Create a new category for the question.
        #[arg(long)]
        new_category: Option<String>,
    },

    /// Delete a question.
    DeleteQuestion {
        id: String,

        /// Do not ask for confirmation.
        #[arg(long, short)]
        yes: bool,
    },
}

fn parse_kind(value: &str) -> Result<InputKind, String> {
    InputKind::from_markup(value)
        .ok_or_else(|| format!("unknown question type {value:?} (select, radio, checkbox, text)"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = Settings::load(&cli.config)?;
    if let Some(server) = &cli.server {
        settings.server.base_url = server.to_string();
    }
    telemetry::init_tracing(&settings.logging.file)?;
    info!(config = %cli.config.display(), server = %settings.server.base_url, "starting");

    let base_url = settings.server_url()?;
    let mut builder = HttpServer::builder(base_url.clone()).timeout(settings.timeout());
    if let Some(cookie) = &settings.server.session_cookie {
        builder = builder.session_cookie(cookie);
    }
    let server = builder.build().context("setting up the HTTP client")?;

    match cli.command {
        Command::Answer { page } => {
            let page = page.unwrap_or_else(|| settings.questionnaire.page_file.clone());
            answer(&settings, &base_url, &page, server).await
        }
        Command::AddQuestion {
            text,
            kind,
            options,
            description,
            required,
            category,
            new_category,
        } => {
            let mut form = NewQuestion::new(text, kind)
                .with_options(option_lines(&options))
                .required(required);
            if let Some(description) = description {
                form = form.with_description(description);
            }
            if let Some(category) = category {
                form = form.in_category(category);
            }
            if let Some(category) = new_category {
                form = form.in_new_category(category);
            }
            let page = ConsoleAdminPage::new(admin_location(&base_url)?);
            let mut admin = AdminController::new(page, ConsoleNotifier::new(false), server);
            Ok(match admin.add_question(&form).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            })
        }
        Command::DeleteQuestion { id, yes } => {
            let page = ConsoleAdminPage::new(admin_location(&base_url)?);
            let mut admin = AdminController::new(page, ConsoleNotifier::new(yes), server);
            Ok(match admin.delete_question(&id.into()).await {
                Ok(Outcome::Completed) => ExitCode::SUCCESS,
                Ok(Outcome::Declined) => {
                    eprintln!("Nothing deleted.");
                    ExitCode::SUCCESS
                }
                Err(_) => ExitCode::FAILURE,
            })
        }
    }
}

#[instrument(level = "info", skip(settings, base_url, server))]
async fn answer(
    settings: &Settings,
    base_url: &Url,
    page: &std::path::Path,
    server: HttpServer,
) -> Result<ExitCode> {
    let cards = page_file::load_cards(page)?;
    let questions = build_registry(&cards);
    info!(total = questions.len(), "questions loaded");

    let screen = Screen::new(questions.clone())
        .with_title(settings.ui.title.clone())
        .with_toast_ttl(settings.toast_ttl());
    let console = CrosstermConsole::open().context("opening the terminal")?;
    let (page, notifier) = terminal_session(screen, console);
    let mut controller = Controller::new(questions, page, notifier, server)
        .with_config(settings.controller_config());

    let end = run(&mut controller).await;
    // Restores the terminal.
    drop(controller);

    match end? {
        SessionEnd::Navigated(location) => {
            let results = base_url
                .join(&location)
                .with_context(|| format!("resolving {location}"))?;
            println!("Responses saved. Results: {results}");
        }
        SessionEnd::Quit => println!("Nothing submitted."),
    }
    Ok(ExitCode::SUCCESS)
}

/// One `- option` line per option, the way the admin form takes them.
fn option_lines(options: &[String]) -> String {
    options
        .iter()
        .map(|option| format!("- {}", option.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn admin_location(base_url: &Url) -> Result<Url> {
    base_url
        .join("admin")
        .with_context(|| format!("resolving admin page under {base_url}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_question() {
        let cli = Cli::try_parse_from([
            "daily-questions",
            "--server",
            "http://localhost:5002",
            "add-question",
            "Mood?",
            "--type",
            "radio",
            "--option",
            "good",
            "--option",
            "bad",
            "--required",
            "--new-category",
            "Feelings",
        ])
        .unwrap();

        let Command::AddQuestion {
            kind,
            options,
            required,
            new_category,
            ..
        } = cli.command
        else {
            panic!("expected add-question");
        };
        assert_eq!(kind, InputKind::RadioGroup);
        assert_eq!(option_lines(&options), "- good\n- bad");
        assert!(required);
        assert_eq!(new_category.as_deref(), Some("Feelings"));
    }

    #[test]
    fn rejects_unknown_type() {
        let result = Cli::try_parse_from(["daily-questions", "add-question", "Q", "--type", "slider"]);
        assert!(result.is_err());
    }

    #[test]
    fn admin_location_under_base_path() {
        let base = Url::parse("https://example.org/daily/").unwrap();
        assert_eq!(
            admin_location(&base).unwrap().as_str(),
            "https://example.org/daily/admin"
        );
    }
}
