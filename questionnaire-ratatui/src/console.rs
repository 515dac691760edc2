use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::rc::Rc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::TestBackend, prelude::CrosstermBackend};
use thiserror::Error;

use crate::{Screen, ui};

/// Error type for the terminal backend.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Drawing a frame failed.
    #[error("Terminal error: {0}")]
    Draw(String),
}

/// Where frames are drawn and keys come from.
pub trait Console {
    fn draw(&mut self, screen: &Screen) -> Result<(), TerminalError>;

    /// Wait up to `timeout` for a key press.
    fn next_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>, TerminalError>;
}

/// The real terminal: raw mode on the alternate screen.
///
/// The terminal is restored when the console is dropped.
pub struct CrosstermConsole {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl CrosstermConsole {
    pub fn open() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub fn restore(&mut self) -> Result<(), TerminalError> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for CrosstermConsole {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(error = %err, "could not restore terminal");
        }
    }
}

impl Console for CrosstermConsole {
    fn draw(&mut self, screen: &Screen) -> Result<(), TerminalError> {
        self.terminal.draw(|frame| ui::draw(frame, screen))?;
        Ok(())
    }

    fn next_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>, TerminalError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}

struct Script {
    terminal: Terminal<TestBackend>,
    keys: VecDeque<KeyEvent>,
    frames: usize,
}

/// An in-memory console fed from a key script.
///
/// Clones share the same buffer and script, so a test can keep a handle
/// after handing one to the page. Once the script runs out every key is Esc.
#[derive(Clone)]
pub struct TestConsole {
    script: Rc<RefCell<Script>>,
}

impl TestConsole {
    pub fn new(width: u16, height: u16) -> Result<Self, TerminalError> {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .map_err(|err| TerminalError::Draw(err.to_string()))?;
        Ok(Self {
            script: Rc::new(RefCell::new(Script {
                terminal,
                keys: VecDeque::new(),
                frames: 0,
            })),
        })
    }

    pub fn press(&self, code: KeyCode) -> &Self {
        self.script
            .borrow_mut()
            .keys
            .push_back(KeyEvent::new(code, KeyModifiers::NONE));
        self
    }

    pub fn type_str(&self, text: &str) -> &Self {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
        self
    }

    /// Keys not consumed yet.
    pub fn pending_keys(&self) -> usize {
        self.script.borrow().keys.len()
    }

    pub fn frames(&self) -> usize {
        self.script.borrow().frames
    }

    /// The last drawn frame, one line per row.
    pub fn contents(&self) -> String {
        let script = self.script.borrow();
        let buffer = script.terminal.backend().buffer();
        let width = buffer.area.width.max(1) as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Console for TestConsole {
    fn draw(&mut self, screen: &Screen) -> Result<(), TerminalError> {
        let mut script = self.script.borrow_mut();
        script
            .terminal
            .draw(|frame| ui::draw(frame, screen))
            .map_err(|err| TerminalError::Draw(err.to_string()))?;
        script.frames += 1;
        Ok(())
    }

    fn next_key(&mut self, _timeout: Duration) -> Result<Option<KeyEvent>, TerminalError> {
        let key = self.script.borrow_mut().keys.pop_front();
        Ok(Some(
            key.unwrap_or_else(|| KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
        ))
    }
}
