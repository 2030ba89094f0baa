use std::sync::Arc;

use services::QuizSessionService;

pub trait UiApp: Send + Sync {
    fn quiz_sessions(&self) -> Arc<QuizSessionService>;
}

#[derive(Clone)]
pub struct AppContext {
    quiz_sessions: Arc<QuizSessionService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz_sessions: app.quiz_sessions(),
        }
    }

    #[must_use]
    pub fn quiz_sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz_sessions)
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
