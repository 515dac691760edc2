use questionnaire::NoticeLevel;
use ratatui::style::Color;

/// Colors used by the terminal page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub text: Color,
    pub muted: Color,
    pub highlight: Color,
    pub success: Color,
    pub error: Color,
    pub info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Blue,
            text: Color::White,
            muted: Color::Gray,
            highlight: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            info: Color::LightBlue,
        }
    }
}

impl Theme {
    /// The toast color for a notice level.
    pub fn notice(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Success => self.success,
            NoticeLevel::Error => self.error,
            NoticeLevel::Info => self.info,
        }
    }
}
