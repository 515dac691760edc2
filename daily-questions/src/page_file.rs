//! The question cards of a questionnaire page, stored as TOML.
//!
//! ```toml
//! [[question]]
//! question_id = 1
//! type = "select"
//! required = true
//! text = "How did you sleep?"
//! options = "Badly,Well"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use questionnaire::CardMarkup;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct PageFile {
    #[serde(default, rename = "question")]
    questions: Vec<CardMarkup>,
}

/// Read the cards in document order.
pub fn load_cards(path: &Path) -> Result<Vec<CardMarkup>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading page file {}", path.display()))?;
    parse_cards(&text).with_context(|| format!("parsing page file {}", path.display()))
}

pub fn parse_cards(text: &str) -> Result<Vec<CardMarkup>> {
    let page: PageFile = toml::from_str(text)?;
    Ok(page.questions)
}
