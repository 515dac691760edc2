//! Plain console notifier and admin page for the non-interactive subcommands.

use async_trait::async_trait;
use dialoguer::{Confirm, theme::ColorfulTheme};
use questionnaire::{AdminPage, Notice, NoticeLevel, Notifier, QuestionId};
use tracing::{info, warn};
use url::Url;

/// Notices go to stderr; confirmations are asked with dialoguer.
#[derive(Debug, Default, Clone)]
pub struct ConsoleNotifier {
    /// Answer every confirmation with "yes" (`--yes`).
    assume_yes: bool,
}

impl ConsoleNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait(?Send)]
impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let mark = match notice.level {
            NoticeLevel::Success => "✔",
            NoticeLevel::Error => "✘",
            NoticeLevel::Info => "ℹ",
        };
        eprintln!("{mark} {}", notice.message);
    }

    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "confirmation prompt failed");
                false
            }
        }
    }
}

/// The admin list, seen from a terminal: reloads and removals are reported.
#[derive(Debug, Clone)]
pub struct ConsoleAdminPage {
    location: Url,
}

impl ConsoleAdminPage {
    pub fn new(location: Url) -> Self {
        Self { location }
    }
}

impl AdminPage for ConsoleAdminPage {
    fn location(&self) -> Url {
        self.location.clone()
    }

    fn reload(&mut self, location: &Url) {
        info!(%location, "admin list changed");
        self.location = location.clone();
        eprintln!("  question list: {location}");
    }

    fn remove_item(&mut self, id: &QuestionId) {
        info!(%id, "question removed from list");
        eprintln!("  removed question {id}");
    }
}
