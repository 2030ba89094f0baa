//! Property tests for answering a loaded quiz.

use proptest::prelude::*;
use quiz_core::{Choice, Question, QuizData};

use super::{Phase, SessionController};

const CHOICES_PER_QUESTION: usize = 3;

fn quiz_json(correct: &[usize]) -> String {
    let questions = correct
        .iter()
        .enumerate()
        .map(|(i, answer)| {
            Question::new(
                format!("Q{i}"),
                (0..CHOICES_PER_QUESTION)
                    .map(|c| Choice::new(format!("C{c}"), c == *answer))
                    .collect(),
            )
        })
        .collect();
    serde_json::to_string(&QuizData {
        subject: "Space".into(),
        difficulty: "Good".into(),
        questions,
    })
    .unwrap()
}

fn playing(correct: &[usize]) -> SessionController {
    let mut controller = SessionController::new();
    controller.set_subject("Space");
    let ticket = controller.start().unwrap();
    controller
        .finish_generation(ticket.epoch(), Ok(quiz_json(correct)))
        .unwrap();
    controller
}

proptest! {
    // Picks past the last choice are ignored, so they never score or advance.
    #[test]
    fn score_counts_only_in_range_correct_picks(
        correct in prop::collection::vec(0..CHOICES_PER_QUESTION, 1..8),
        picks in prop::collection::vec(0usize..CHOICES_PER_QUESTION + 2, 0..16),
    ) {
        let mut controller = playing(&correct);
        let mut expected_score = 0;
        let mut answered = 0;

        for pick in picks {
            if controller.phase() != Phase::Playing {
                break;
            }
            let question = answered;
            match controller.submit_answer(pick) {
                Some(result) => {
                    prop_assert!(pick < CHOICES_PER_QUESTION);
                    prop_assert_eq!(result.correct, pick == correct[question]);
                    if result.correct {
                        expected_score += 1;
                    }
                    answered += 1;
                    prop_assert_eq!(result.is_complete, answered == correct.len());
                }
                None => {
                    prop_assert!(pick >= CHOICES_PER_QUESTION);
                    prop_assert_eq!(controller.current_index(), question);
                }
            }
        }

        prop_assert_eq!(controller.score(), expected_score);
        prop_assert!(controller.score() <= answered);
        prop_assert!(answered <= correct.len());
        prop_assert_eq!(
            controller.phase() == Phase::Result,
            answered == correct.len()
        );
    }
}
