//! Settings loaded from a TOML file.
//!
//! Every section and key is optional; see `daily-questions.toml` for the
//! full schema with defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use questionnaire::ControllerConfig;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub questionnaire: QuestionnaireSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Sent as the `Cookie` header; the server only accepts logged-in users.
    pub session_cookie: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5002".to_string(),
            timeout_secs: 20,
            session_cookie: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuestionnaireSettings {
    pub page_file: PathBuf,
    pub results_path: String,
    pub redirect_delay_ms: u64,
}

impl Default for QuestionnaireSettings {
    fn default() -> Self {
        Self {
            page_file: PathBuf::from("pages/daily.toml"),
            results_path: "/stats".to_string(),
            redirect_delay_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub title: String,
    pub toast_ttl_secs: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            title: "Daily questions".to_string(),
            toast_ttl_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("daily-questions.log"),
        }
    }
}

impl Settings {
    /// Read settings from `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn server_url(&self) -> Result<Url> {
        Url::parse(&self.server.base_url)
            .with_context(|| format!("invalid server URL {:?}", self.server.base_url))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_secs(self.ui.toast_ttl_secs)
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            results_path: self.questionnaire.results_path.clone(),
            redirect_delay: Duration::from_millis(self.questionnaire.redirect_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.controller_config(), ControllerConfig::default());
        assert_eq!(settings.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = Settings::parse(
            r#"
            [server]
            base_url = "https://daily.example.org/app/"
            session_cookie = "session=abc"

            [questionnaire]
            redirect_delay_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(
            settings.server_url().unwrap().as_str(),
            "https://daily.example.org/app/"
        );
        assert_eq!(settings.server.timeout_secs, 20);
        assert_eq!(settings.server.session_cookie.as_deref(), Some("session=abc"));
        assert_eq!(settings.controller_config().redirect_delay, Duration::ZERO);
        assert_eq!(settings.questionnaire.results_path, "/stats");
        assert_eq!(settings.ui.title, "Daily questions");
    }

    #[test]
    fn bad_server_url_is_reported() {
        let settings = Settings::parse("[server]\nbase_url = \"not a url\"").unwrap();
        let err = settings.server_url().unwrap_err();
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let settings = Settings::load(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn example_config_parses() {
        let text = include_str!("../daily-questions.toml");
        let settings = Settings::parse(text).unwrap();
        assert_eq!(settings.questionnaire.page_file, PathBuf::from("pages/daily.toml"));
    }
}
