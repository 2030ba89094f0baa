use dioxus::prelude::*;
use services::{Effect, Phase, SessionController, SessionIntent, SessionSnapshot};

use crate::context::AppContext;
use crate::vm::{map_difficulty_options, map_hud, map_result};

/// Session state for one quiz screen plus the callback that drives it.
///
/// Intents go through the controller synchronously; a `Generate` effect
/// spawns the request and feeds the result back with its epoch so a stale
/// completion is dropped by the controller.
pub fn use_quiz_session() -> (Signal<SessionController>, Callback<SessionIntent>) {
    let ctx = use_context::<AppContext>();
    let service = ctx.quiz_sessions();
    let controller = use_signal(SessionController::new);

    let dispatch = use_callback(move |intent: SessionIntent| {
        let mut controller = controller;
        let effect = controller.write().dispatch(intent);
        if let Some(Effect::Generate(ticket)) = effect {
            let service = service.clone();
            spawn(async move {
                let result = service.generate(&ticket).await;
                // The archive task is detached; its outcome only reaches the log.
                let _ = service.complete(&mut controller.write(), ticket.epoch(), result);
            });
        }
    });

    (controller, dispatch)
}

#[component]
pub fn QuizView() -> Element {
    let (controller, dispatch) = use_quiz_session();
    let snapshot = controller.read().snapshot();
    rsx! {
        QuizScreen { snapshot, dispatch }
    }
}

/// Pure rendering of a snapshot; every user action becomes an intent.
#[component]
pub fn QuizScreen(snapshot: SessionSnapshot, dispatch: Callback<SessionIntent>) -> Element {
    match snapshot.phase {
        Phase::Menu => menu_screen(&snapshot, dispatch),
        Phase::Loading => rsx! {
            section { class: "screen loading-screen",
                div { class: "spinner" }
                p { class: "loading-label", "GENERATING..." }
                p { class: "loading-subject", "{snapshot.subject}" }
            }
        },
        Phase::Playing => playing_screen(&snapshot, dispatch),
        Phase::Result => result_screen(&snapshot, dispatch),
    }
}

fn menu_screen(snapshot: &SessionSnapshot, dispatch: Callback<SessionIntent>) -> Element {
    let options = map_difficulty_options(snapshot.difficulty);
    rsx! {
        section { class: "screen menu-screen",
            h1 { class: "title", "QUIZZ_ME" }
            label { class: "field-label", r#for: "subject", "SUBJECT" }
            input {
                id: "subject",
                class: "subject-input",
                r#type: "text",
                placeholder: "e.g. Space, Rust, Roman history",
                value: "{snapshot.subject}",
                oninput: move |evt| dispatch.call(SessionIntent::SetSubject(evt.value())),
                onkeydown: move |evt: KeyboardEvent| {
                    if evt.key() == Key::Enter {
                        dispatch.call(SessionIntent::Start);
                    }
                },
            }
            p { class: "field-label", "DIFFICULTY" }
            div { class: "difficulty-row",
                for option in options {
                    button {
                        key: "{option.difficulty}",
                        class: option.class,
                        r#type: "button",
                        onclick: move |_| {
                            dispatch.call(SessionIntent::SetDifficulty(option.difficulty));
                        },
                        "{option.difficulty}"
                    }
                }
            }
            if let Some(message) = snapshot.error_message.as_deref() {
                p { class: "error-message", role: "alert", "{message}" }
            }
            button {
                class: "btn btn-primary start-button",
                r#type: "button",
                onclick: move |_| dispatch.call(SessionIntent::Start),
                "START GAME"
            }
        }
    }
}

fn playing_screen(snapshot: &SessionSnapshot, dispatch: Callback<SessionIntent>) -> Element {
    let Some(question) = snapshot.current_question.as_ref() else {
        return rsx! {};
    };
    let hud = map_hud(snapshot);
    rsx! {
        section { class: "screen playing-screen",
            if let Some(hud) = hud {
                div { class: "hud",
                    span { class: "hud-progress", "{hud.progress_label}" }
                    span { class: "hud-score", "{hud.score_label}" }
                }
            }
            h2 { class: "question-text", "{question.text}" }
            div { class: "choices",
                for (index, choice) in question.choices.iter().enumerate() {
                    button {
                        key: "{index}",
                        class: "choice",
                        r#type: "button",
                        onclick: move |_| dispatch.call(SessionIntent::SubmitAnswer(index)),
                        "{choice.text}"
                    }
                }
            }
        }
    }
}

fn result_screen(snapshot: &SessionSnapshot, dispatch: Callback<SessionIntent>) -> Element {
    let Some(result) = map_result(snapshot) else {
        return rsx! {};
    };
    rsx! {
        section { class: "screen result-screen",
            h1 { class: result.title_class, "{result.title}" }
            p { class: "result-score", "{result.score_line}" }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| dispatch.call(SessionIntent::Restart),
                "Play Again"
            }
        }
    }
}
