//! Keyboard-driven sessions on an in-memory terminal.

use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::KeyCode;
use questionnaire::{
    Controller, ControllerConfig, InputKind, Page, Question, ServerReply, TestServer, WidgetState,
};
use questionnaire_ratatui::{
    Screen, SessionEnd, TerminalNotifier, TerminalPage, TestConsole, run, terminal_session,
};

type Session = Controller<TerminalPage, TerminalNotifier, TestServer>;

fn daily_questions() -> Vec<Question> {
    vec![
        Question::new("1", "How did you sleep?", InputKind::SingleChoice)
            .with_options(["A", "B"])
            .required(),
        Question::new("2", "Anything else?", InputKind::FreeText),
        Question::new("3", "What did you do?", InputKind::CheckboxGroup)
            .with_options(["x", "y", "z"])
            .required(),
    ]
}

fn session(console: &TestConsole, server: TestServer) -> Session {
    let questions = daily_questions();
    let screen = Screen::new(questions.clone()).with_title("Daily questions");
    let (page, notifier) = terminal_session(screen, console.clone());
    Controller::new(questions, page, notifier, server)
        .with_config(ControllerConfig {
            redirect_delay: Duration::ZERO,
            ..ControllerConfig::default()
        })
        .with_date_source(|| NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
}

#[test]
fn test_first_card_is_drawn() -> Result<()> {
    let console = TestConsole::new(80, 24)?;
    let _controller = session(&console, TestServer::new());

    let contents = console.contents();
    assert!(contents.contains("Daily questions"));
    assert!(contents.contains("1 of 3"));
    assert!(contents.contains("How did you sleep?"));
    assert!(!contents.contains("Anything else?"));
    assert!(contents.contains("Esc: Quit"));
    Ok(())
}

#[tokio::test]
async fn test_answer_and_submit_from_keyboard() -> Result<()> {
    let console = TestConsole::new(80, 24)?;
    let mut controller = session(&console, TestServer::new());

    console.press(KeyCode::Char(' ')).press(KeyCode::Enter);
    console.type_str("slept well").press(KeyCode::Enter);
    console
        .press(KeyCode::Char(' '))
        .press(KeyCode::Down)
        .press(KeyCode::Char(' '))
        .press(KeyCode::Enter)
        .press(KeyCode::Char('y'));

    let end = run(&mut controller).await?;

    assert_eq!(end, SessionEnd::Navigated("/stats".to_string()));
    assert_eq!(console.pending_keys(), 0);

    let submissions = controller.server().submissions();
    assert_eq!(submissions.len(), 1);
    let responses = &submissions[0].responses;
    assert_eq!(responses.get(&"1".into()), Some("A"));
    assert_eq!(responses.get(&"2".into()), Some("slept well"));
    assert_eq!(responses.get(&"3".into()), Some("x,y"));

    let contents = console.contents();
    assert!(contents.contains("Your responses have been saved successfully!"));
    assert!(contents.contains("/stats"));
    Ok(())
}

#[tokio::test]
async fn test_left_returns_with_answer_restored() -> Result<()> {
    let console = TestConsole::new(80, 24)?;
    let mut controller = session(&console, TestServer::new());

    console
        .press(KeyCode::Down)
        .press(KeyCode::Char(' '))
        .press(KeyCode::Right)
        .press(KeyCode::Left);

    let end = run(&mut controller).await?;

    assert_eq!(end, SessionEnd::Quit);
    assert_eq!(controller.pager().current_index(), 0);
    assert_eq!(controller.responses().get(&"1".into()), Some("B"));
    assert!(console.contents().contains("▣ B"));
    Ok(())
}

#[tokio::test]
async fn test_missing_answers_shown_as_toast() -> Result<()> {
    let console = TestConsole::new(80, 24)?;
    let mut controller = session(&console, TestServer::new());

    console
        .press(KeyCode::Enter)
        .press(KeyCode::Enter)
        .press(KeyCode::Enter);

    let end = run(&mut controller).await?;

    assert_eq!(end, SessionEnd::Quit);
    assert!(controller.server().exchanges().is_empty());
    assert!(
        console
            .contents()
            .contains("Please answer all required questions (missing: 1, 3)")
    );
    Ok(())
}

#[tokio::test]
async fn test_declined_confirmation_keeps_session_open() -> Result<()> {
    let console = TestConsole::new(80, 24)?;
    let server = TestServer::new().with_reply(ServerReply::error("db down"));
    let mut controller = session(&console, server);

    console
        .press(KeyCode::Char(' '))
        .press(KeyCode::Right)
        .press(KeyCode::Right)
        .press(KeyCode::Char(' '))
        .press(KeyCode::Enter)
        .press(KeyCode::Char('n'))
        .press(KeyCode::Enter)
        .press(KeyCode::Char('y'));

    let end = run(&mut controller).await?;

    assert_eq!(end, SessionEnd::Quit);
    assert_eq!(controller.server().submissions().len(), 1);
    assert!(console.contents().contains("db down"));
    assert!(controller.page().navigated_to().is_none());
    Ok(())
}

#[test]
fn test_very_long_answer_keeps_cursor_inside_the_box() -> Result<()> {
    let console = TestConsole::new(80, 24)?;
    let question = Question::new("2", "Anything else?", InputKind::FreeText);
    let screen = Screen::new(vec![question.clone()]);
    let (page, notifier) = terminal_session(screen, console.clone());
    let mut controller = Controller::new(vec![question.clone()], page, notifier, TestServer::new());
    let frames = console.frames();

    let text = "z".repeat(usize::from(u16::MAX) + 10);
    controller
        .page_mut()
        .restore_widget(&question, &WidgetState::FreeText { text });

    assert_eq!(console.frames(), frames + 1);
    assert!(console.contents().contains("zzzz"));
    Ok(())
}
