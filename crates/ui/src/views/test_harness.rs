use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use quiz_core::Difficulty;
use services::{
    GenerationError, QuizGenerator, QuizSessionService, SessionController, SessionIntent,
    SessionSnapshot,
};
use storage::repository::InMemoryQuizArchive;

use crate::context::{UiApp, build_app_context};
use crate::views::{QuizScreen, QuizView, use_quiz_session};

pub const TWO_QUESTION_QUIZ: &str = r#"{
  "subject": "Space",
  "difficulty": "Good",
  "questions": [
    { "text": "Closest planet to the sun?", "choices": [
      { "text": "Mercury", "is_correct": true },
      { "text": "Venus", "is_correct": false } ] },
    { "text": "Largest planet?", "choices": [
      { "text": "Saturn", "is_correct": false },
      { "text": "Jupiter", "is_correct": true } ] }
  ]
}"#;

struct CannedGenerator;

#[async_trait]
impl QuizGenerator for CannedGenerator {
    async fn generate(
        &self,
        _subject: &str,
        _difficulty: Difficulty,
    ) -> Result<String, GenerationError> {
        Ok(TWO_QUESTION_QUIZ.to_string())
    }
}

struct TestApp {
    quiz_sessions: Arc<QuizSessionService>,
}

impl UiApp for TestApp {
    fn quiz_sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz_sessions)
    }
}

/// Hands the live dispatch callback out of the dom so tests can send intents.
#[derive(Clone, Default)]
pub struct SessionHandles {
    dispatch: Rc<RefCell<Option<Callback<SessionIntent>>>>,
}

impl SessionHandles {
    pub fn dispatch(&self) -> Callback<SessionIntent> {
        self.dispatch.borrow().clone().expect("dispatch registered")
    }
}

impl PartialEq for SessionHandles {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.dispatch, &other.dispatch)
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    handles: Option<SessionHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn QuizViewHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    match props.handles.clone() {
        Some(handles) => rsx! { CapturedQuizView { handles } },
        None => rsx! { QuizView {} },
    }
}

#[component]
fn CapturedQuizView(handles: SessionHandles) -> Element {
    let (controller, dispatch) = use_quiz_session();
    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        *handles.dispatch.borrow_mut() = Some(dispatch);
    }
    let snapshot = controller.read().snapshot();
    rsx! { QuizScreen { snapshot, dispatch } }
}

#[component]
fn SnapshotHarness(snapshot: SessionSnapshot) -> Element {
    let dispatch = use_callback(|_: SessionIntent| {});
    rsx! { QuizScreen { snapshot, dispatch } }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub archive: InMemoryQuizArchive,
    pub handles: SessionHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    /// Let spawned tasks run, then flush renders and events.
    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_quiz_view_harness() -> ViewHarness {
    build_harness(None)
}

/// Like [`setup_quiz_view_harness`], with the dispatch callback exposed.
pub fn setup_quiz_intent_harness() -> ViewHarness {
    build_harness(Some(SessionHandles::default()))
}

fn build_harness(handles: Option<SessionHandles>) -> ViewHarness {
    let archive = InMemoryQuizArchive::new();
    let quiz_sessions = Arc::new(QuizSessionService::new(
        Arc::new(CannedGenerator),
        Arc::new(archive.clone()),
    ));
    let dom = VirtualDom::new_with_props(
        QuizViewHarness,
        ViewHarnessProps {
            app: Arc::new(TestApp { quiz_sessions }),
            handles: handles.clone(),
        },
    );
    ViewHarness {
        dom,
        archive,
        handles: handles.unwrap_or_default(),
    }
}

/// Render `QuizScreen` for a fixed snapshot.
pub fn render_snapshot(snapshot: SessionSnapshot) -> String {
    let mut dom = VirtualDom::new_with_props(SnapshotHarness, SnapshotHarnessProps { snapshot });
    dom.rebuild_in_place();
    drive_dom(&mut dom);
    dioxus_ssr::render(&dom)
}

/// A controller that has loaded `TWO_QUESTION_QUIZ`.
pub fn playing_controller() -> SessionController {
    let mut controller = SessionController::new();
    controller.set_subject("Space");
    let ticket = controller.start().expect("ticket");
    controller
        .finish_generation(ticket.epoch(), Ok(TWO_QUESTION_QUIZ.to_string()))
        .expect("persist request");
    controller
}
