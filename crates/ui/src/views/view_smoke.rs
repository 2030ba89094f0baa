use quiz_core::Difficulty;
use services::{Phase, SessionController, SessionIntent};

use super::test_harness::{
    TWO_QUESTION_QUIZ, playing_controller, render_snapshot, setup_quiz_intent_harness,
    setup_quiz_view_harness,
};

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_starts_on_menu() {
    let mut harness = setup_quiz_view_harness();
    harness.rebuild();
    let html = harness.render();

    for expected in ["QUIZZ_ME", "SUBJECT", "DIFFICULTY", "START GAME", "Hardcore"] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert_eq!(html.matches("difficulty-option--active").count(), 1, "{html}");
    assert!(harness.archive.saved().unwrap().is_empty());
}

#[test]
fn menu_shows_validation_error() {
    let mut controller = SessionController::new();
    controller.set_difficulty(Difficulty::Easy);
    assert!(controller.start().is_none());

    let html = render_snapshot(controller.snapshot());
    assert!(html.contains("Please enter a subject!"), "{html}");
}

#[test]
fn loading_screen_names_subject() {
    let mut controller = SessionController::new();
    controller.set_subject("Volcanoes");
    controller.start().expect("ticket");
    assert_eq!(controller.phase(), Phase::Loading);

    let html = render_snapshot(controller.snapshot());
    assert!(html.contains("GENERATING..."), "{html}");
    assert!(html.contains("Volcanoes"), "{html}");
}

#[test]
fn playing_screen_shows_hud_question_and_choices() {
    let mut controller = playing_controller();
    controller.submit_answer(0);

    let html = render_snapshot(controller.snapshot());
    assert!(html.contains("Question: 2 / 2"), "{html}");
    assert!(html.contains("Score: 1"), "{html}");
    assert!(html.contains("Largest planet?"), "{html}");
    assert!(html.contains("Saturn") && html.contains("Jupiter"), "{html}");
}

#[test]
fn result_screen_reports_outcome_and_offers_restart() {
    let mut controller = playing_controller();
    controller.submit_answer(0);
    controller.submit_answer(0);
    assert_eq!(controller.phase(), Phase::Result);

    let html = render_snapshot(controller.snapshot());
    assert!(html.contains("DEFEAT"), "{html}");
    assert!(html.contains("You scored 1 / 2"), "{html}");
    assert!(html.contains("Play Again"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn start_intent_generates_plays_and_archives() {
    let mut harness = setup_quiz_intent_harness();
    harness.rebuild();
    let dispatch = harness.handles.dispatch();

    dispatch.call(SessionIntent::SetSubject("Space".into()));
    dispatch.call(SessionIntent::Start);

    let mut html = String::new();
    for _ in 0..10 {
        harness.drive_async().await;
        html = harness.render();
        if html.contains("Question: 1 / 2") {
            break;
        }
    }
    assert!(html.contains("Question: 1 / 2"), "{html}");
    assert!(html.contains("Score: 0"), "{html}");
    assert!(html.contains("Closest planet to the sun?"), "{html}");

    let mut saved = harness.archive.saved().unwrap();
    for _ in 0..10 {
        if !saved.is_empty() {
            break;
        }
        tokio::task::yield_now().await;
        saved = harness.archive.saved().unwrap();
    }
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].subject, "Space");
    assert_eq!(saved[0].document, TWO_QUESTION_QUIZ);

    dispatch.call(SessionIntent::SubmitAnswer(0));
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Question: 2 / 2"), "{html}");
    assert!(html.contains("Score: 1"), "{html}");
}
