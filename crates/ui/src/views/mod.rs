mod quiz;

pub use quiz::{QuizScreen, QuizView, use_quiz_session};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
