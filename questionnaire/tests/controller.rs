//! Session tests: paging, answer capture and the submission gate.

use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use questionnaire::{
    CardMarkup, Controller, ControllerConfig, InputKind, NoticeLevel, Outcome, Question,
    QuestionId, QuestionnaireError, SUBMIT_FAILED, SUBMIT_SUCCESS, ServerReply, TestNotifier,
    TestPage, TestServer, TransportError, ValidationError, WidgetState,
};

type Session = Controller<TestPage, TestNotifier, TestServer>;

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

fn march_9() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

fn session_with(notifier: TestNotifier, server: TestServer) -> Session {
    Controller::new(daily_questions(), TestPage::new(), notifier, server)
        .with_config(ControllerConfig {
            redirect_delay: Duration::ZERO,
            ..ControllerConfig::default()
        })
        .with_date_source(march_9)
}

fn session() -> Session {
    session_with(TestNotifier::new(), TestServer::new())
}

#[test]
fn test_first_card_shown_on_load() {
    let controller = session();

    let view = controller.page().last_view().unwrap();
    assert_eq!(view.index, 0);
    assert_eq!(view.progress.to_string(), "1 of 3");
    assert_eq!(view.progress.percent(), 33);
    assert!(!view.controls.previous_enabled);
    assert!(view.controls.show_next);
    assert!(!view.controls.show_submit);
}

#[test]
fn test_last_card_swaps_next_for_submit() {
    let mut controller = session();

    assert!(controller.next());
    assert!(controller.next());
    assert!(!controller.next());

    let view = controller.page().last_view().unwrap();
    assert_eq!(view.index, 2);
    assert_eq!(view.progress.percent(), 100);
    assert!(view.controls.previous_enabled);
    assert!(!view.controls.show_next);
    assert!(view.controls.show_submit);
    assert!(view.controls.submit_enabled);
}

#[test]
fn test_previous_on_first_card_stays_put() {
    let mut controller = session();
    let renders = controller.page().views().len();

    assert!(!controller.previous());
    assert_eq!(controller.pager().current_index(), 0);
    assert_eq!(controller.page().views().len(), renders);
}

#[test]
fn test_render_is_idempotent() {
    let mut controller = session();
    controller.page_mut().select("1", "B");
    controller.next();

    controller.render();
    let first = controller.page().clone();
    controller.render();
    let second = controller.page().clone();

    assert_eq!(first.last_view(), second.last_view());
    assert_eq!(first.widget("1"), second.widget("1"));
}

#[test]
fn test_navigation_captures_answer() {
    let mut controller = session();
    controller.page_mut().select("1", "A");

    controller.next();

    assert_eq!(controller.responses().get(&"1".into()), Some("A"));
    assert_eq!(controller.pager().current_index(), 1);
}

#[test]
fn test_previous_also_captures() {
    let mut controller = session();
    controller.next();
    controller.page_mut().type_text("2", "  walked the dog ");

    controller.previous();

    assert_eq!(
        controller.responses().get(&"2".into()),
        Some("walked the dog")
    );
}

#[test]
fn test_captured_answer_is_restored_on_return() {
    let mut controller = session();
    controller.next();
    controller.next();
    controller.page_mut().tick("3", "z");
    controller.page_mut().tick("3", "x");
    controller.previous();

    // Something else clobbers the widget while the card is hidden
    controller.page_mut().clear("3");
    controller.next();

    assert_eq!(
        controller.page().widget("3"),
        Some(&WidgetState::Checkboxes {
            checked: vec!["x".into(), "z".into()]
        })
    );
}

#[test]
fn test_clearing_required_answer_removes_it() {
    let mut controller = session();
    controller.page_mut().select("1", "A");
    controller.next();
    controller.previous();

    controller.page_mut().clear("1");
    controller.next();

    assert!(!controller.responses().contains(&"1".into()));
}

#[test]
fn test_optional_question_stored_empty() {
    let mut controller = session();
    controller.next();
    controller.next();

    assert_eq!(controller.responses().get(&"2".into()), Some(""));
}

#[test]
fn test_missing_required_in_registry_order() {
    let mut controller = session();
    controller.next();

    let missing: Vec<String> = controller
        .missing_required()
        .iter()
        .map(|id| id.to_string())
        .collect();
    assert_eq!(missing, ["1", "3"]);
}

#[test]
fn test_capture_twice_is_stable() {
    let mut controller = session();

    // Unanswered required card
    controller.capture_current();
    let once = controller.responses().clone();
    controller.capture_current();
    assert_eq!(controller.responses(), &once);
    assert!(!once.contains(&"1".into()));

    // Answered required card
    controller.page_mut().select("1", "B");
    controller.capture_current();
    let once = controller.responses().clone();
    controller.capture_current();
    assert_eq!(controller.responses(), &once);
    assert_eq!(once.get(&"1".into()), Some("B"));

    // Blank optional card
    controller.next();
    controller.capture_current();
    let once = controller.responses().clone();
    controller.capture_current();
    assert_eq!(controller.responses(), &once);
    assert_eq!(once.get(&"2".into()), Some(""));
}

#[tokio::test]
async fn test_full_submission() -> Result<()> {
    let mut controller = session();
    controller.page_mut().select("1", "A");
    controller.next();
    controller.next();
    controller.page_mut().tick("3", "y");
    controller.page_mut().tick("3", "x");

    let outcome = controller.validate_and_submit().await?;
    assert_eq!(outcome, Outcome::Completed);

    let submissions = controller.server().submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(
        serde_json::to_value(&submissions[0])?,
        serde_json::json!({
            "date": "2024-03-09",
            "responses": { "1": "A", "2": "", "3": "x,y" },
        })
    );

    assert_eq!(
        controller.notifier().messages(NoticeLevel::Success),
        [SUBMIT_SUCCESS]
    );
    assert_eq!(controller.page().navigated_to(), Some("/stats"));
    Ok(())
}

#[tokio::test]
async fn test_missing_required_blocks_submission() {
    let mut controller = session();
    controller.next();
    controller.next();
    controller.page_mut().tick("3", "x");

    let err = controller.validate_and_submit().await.unwrap_err();

    assert!(err.is_validation());
    let QuestionnaireError::Validation(ValidationError::MissingRequired(ids)) = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(*ids, vec![QuestionId::from("1")]);
    assert!(controller.server().exchanges().is_empty());
    assert!(controller.notifier().prompts().is_empty());
    assert_eq!(
        controller.notifier().messages(NoticeLevel::Error),
        ["Please answer all required questions (missing: 1)"]
    );
    assert_eq!(controller.page().navigated_to(), None);
}

#[tokio::test]
async fn test_visible_required_answer_counts_without_navigation() {
    let mut controller = session();
    controller.page_mut().select("1", "B");
    controller.page_mut().tick("3", "z");
    controller.next();
    controller.next();

    // Submitting from the last card captures it first
    let outcome = controller.validate_and_submit().await.unwrap();

    assert_eq!(outcome, Outcome::Completed);
    let sent = &controller.server().submissions()[0];
    assert_eq!(sent.responses.get(&"3".into()), Some("z"));
}

#[tokio::test]
async fn test_declined_confirmation_sends_nothing() {
    let mut controller = session_with(TestNotifier::new().with_confirm(false), TestServer::new());
    controller.page_mut().select("1", "A");
    controller.page_mut().tick("3", "x");

    let outcome = controller.validate_and_submit().await.unwrap();

    assert_eq!(outcome, Outcome::Declined);
    assert_eq!(controller.notifier().prompts().len(), 1);
    assert!(controller.server().exchanges().is_empty());
    assert!(controller.notifier().notices().is_empty());
}

#[tokio::test]
async fn test_server_error_is_shown_and_state_kept() {
    let server = TestServer::new().with_reply(ServerReply::error("db down"));
    let mut controller = session_with(TestNotifier::new(), server);
    controller.page_mut().select("1", "A");
    controller.page_mut().tick("3", "y");
    controller.next();
    controller.next();
    controller.capture_current();
    let before = controller.responses().clone();

    let err = controller.validate_and_submit().await.unwrap_err();

    assert!(matches!(err, QuestionnaireError::Server { ref message } if message == "db down"));
    assert_eq!(
        controller.notifier().messages(NoticeLevel::Error),
        ["db down"]
    );
    assert_eq!(controller.responses(), &before);
    assert_eq!(controller.page().navigated_to(), None);

    // Submit is usable again
    let view = controller.page().last_view().unwrap();
    assert!(view.controls.submit_enabled);
    assert!(!controller.is_submission_pending());

    let retry = controller.validate_and_submit().await.unwrap();
    assert_eq!(retry, Outcome::Completed);
    assert_eq!(controller.server().submissions().len(), 2);
}

#[tokio::test]
async fn test_transport_failure_uses_fallback_text() {
    let server = TestServer::new().with_failure(TransportError::UnexpectedReply { status: 502 });
    let mut controller = session_with(TestNotifier::new(), server);
    controller.page_mut().select("1", "A");
    controller.page_mut().tick("3", "x");

    let err = controller.validate_and_submit().await.unwrap_err();

    assert!(matches!(err, QuestionnaireError::Transport(_)));
    assert_eq!(controller.notifier().last_message().as_deref(), Some(SUBMIT_FAILED));
}

#[tokio::test]
async fn test_submit_disabled_while_in_flight() {
    let mut controller = session();
    controller.page_mut().select("1", "A");
    controller.page_mut().tick("3", "x");
    controller.next();
    controller.next();

    controller.validate_and_submit().await.unwrap();

    let disabled = controller
        .page()
        .views()
        .iter()
        .filter(|view| view.controls.show_submit && !view.controls.submit_enabled)
        .count();
    assert_eq!(disabled, 1);
}

#[tokio::test]
async fn test_results_path_is_configurable() {
    let mut controller = session().with_config(ControllerConfig {
        results_path: "/history".into(),
        redirect_delay: Duration::ZERO,
    });
    controller.page_mut().select("1", "A");
    controller.page_mut().tick("3", "x");

    controller.validate_and_submit().await.unwrap();

    assert_eq!(controller.page().navigated_to(), Some("/history"));
}

#[tokio::test]
async fn test_empty_questionnaire() {
    let mut controller = Controller::new(
        Vec::new(),
        TestPage::new(),
        TestNotifier::new(),
        TestServer::new(),
    )
    .with_config(ControllerConfig {
        redirect_delay: Duration::ZERO,
        ..ControllerConfig::default()
    });

    assert!(controller.page().views().is_empty());
    assert!(!controller.next());
    assert!(!controller.previous());
    assert!(controller.current_question().is_none());

    controller.validate_and_submit().await.unwrap();
    assert!(controller.server().submissions()[0].responses.is_empty());
}

#[test]
fn test_session_from_markup() {
    let cards = vec![
        CardMarkup::new("7")
            .with_type("radio")
            .with_required("1")
            .with_text("Mood?")
            .with_options("good, bad"),
        CardMarkup::new("8").with_type("slider").with_text("Energy"),
        CardMarkup::default().with_type("checkbox").with_text("Chores"),
    ];

    let controller = Controller::from_markup(
        &cards,
        TestPage::new(),
        TestNotifier::new(),
        TestServer::new(),
    );

    let questions = controller.questions();
    assert_eq!(questions.len(), 3);
    assert_eq!(questions[0].kind(), InputKind::RadioGroup);
    assert!(questions[0].is_required());
    assert_eq!(questions[0].options(), ["good", "bad"]);
    assert_eq!(questions[1].kind(), InputKind::FreeText);
    assert_eq!(questions[2].kind(), InputKind::FreeText);
    assert_eq!(controller.current_question().unwrap().id().as_str(), "7");
}

#[tokio::test]
async fn test_cancelled_submission_can_be_retried() -> Result<()> {
    let server = TestServer::new().with_stall();
    let mut controller = session_with(TestNotifier::new(), server);
    controller.page_mut().select("1", "A");
    controller.page_mut().tick("3", "x");

    let first =
        tokio::time::timeout(Duration::from_millis(20), controller.validate_and_submit()).await;
    assert!(first.is_err());
    assert!(!controller.is_submission_pending());

    let retry = controller.validate_and_submit().await?;
    assert_eq!(retry, Outcome::Completed);
    assert_eq!(controller.server().submissions().len(), 2);
    assert_eq!(controller.page().navigated_to(), Some("/stats"));
    Ok(())
}
