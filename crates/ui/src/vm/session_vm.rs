use quiz_core::{Difficulty, Outcome};
use services::{Phase, SessionSnapshot};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudVm {
    pub progress_label: String,
    pub score_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub title: &'static str,
    pub title_class: &'static str,
    pub score_line: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DifficultyOptionVm {
    pub difficulty: Difficulty,
    pub class: &'static str,
}

/// HUD labels while playing. Questions are shown 1-based.
#[must_use]
pub fn map_hud(snapshot: &SessionSnapshot) -> Option<HudVm> {
    if snapshot.phase != Phase::Playing {
        return None;
    }
    Some(HudVm {
        progress_label: format!(
            "Question: {} / {}",
            snapshot.current_question_index + 1,
            snapshot.total_questions
        ),
        score_label: format!("Score: {}", snapshot.score),
    })
}

#[must_use]
pub fn map_result(snapshot: &SessionSnapshot) -> Option<ResultVm> {
    let outcome = snapshot.outcome?;
    let (title, title_class) = match outcome {
        Outcome::Victory => ("VICTORY", "result-title result-title--victory"),
        Outcome::Defeat => ("DEFEAT", "result-title result-title--defeat"),
    };
    Some(ResultVm {
        title,
        title_class,
        score_line: format!(
            "You scored {} / {}",
            snapshot.score, snapshot.total_questions
        ),
    })
}

#[must_use]
pub fn map_difficulty_options(selected: Difficulty) -> Vec<DifficultyOptionVm> {
    Difficulty::ALL
        .into_iter()
        .map(|difficulty| DifficultyOptionVm {
            difficulty,
            class: if difficulty == selected {
                "difficulty-option difficulty-option--active"
            } else {
                "difficulty-option"
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::SessionController;

    fn finished(score_correct: usize, total: usize) -> SessionSnapshot {
        let questions = (0..total)
            .map(|i| {
                format!(
                    concat!(
                        r#"{{"text":"Q{}","choices":["#,
                        r#"{{"text":"a","is_correct":true}},"#,
                        r#"{{"text":"b","is_correct":false}}]}}"#,
                    ),
                    i
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        let raw = format!(r#"{{"subject":"Space","difficulty":"Good","questions":[{questions}]}}"#);

        let mut controller = SessionController::new();
        controller.set_subject("Space");
        let ticket = controller.start().unwrap();
        controller.finish_generation(ticket.epoch(), Ok(raw));
        for i in 0..total {
            controller.submit_answer(usize::from(i >= score_correct));
        }
        controller.snapshot()
    }

    #[test]
    fn hud_is_one_based_and_hidden_outside_play() {
        let menu = SessionController::new().snapshot();
        assert!(map_hud(&menu).is_none());

        let mut snapshot = menu;
        snapshot.phase = Phase::Playing;
        snapshot.current_question_index = 2;
        snapshot.total_questions = 10;
        snapshot.score = 1;
        let hud = map_hud(&snapshot).unwrap();
        assert_eq!(hud.progress_label, "Question: 3 / 10");
        assert_eq!(hud.score_label, "Score: 1");
    }

    #[test]
    fn result_labels_follow_outcome() {
        let win = map_result(&finished(7, 10)).unwrap();
        assert_eq!(win.title, "VICTORY");
        assert_eq!(win.score_line, "You scored 7 / 10");

        let loss = map_result(&finished(6, 10)).unwrap();
        assert_eq!(loss.title, "DEFEAT");
        assert!(loss.title_class.ends_with("--defeat"));
    }

    #[test]
    fn result_is_absent_before_finishing() {
        assert!(map_result(&SessionController::new().snapshot()).is_none());
    }

    #[test]
    fn only_selected_difficulty_is_active() {
        let options = map_difficulty_options(Difficulty::Hardcore);
        assert_eq!(options.len(), 3);
        let active: Vec<_> = options
            .iter()
            .filter(|o| o.class.contains("--active"))
            .map(|o| o.difficulty)
            .collect();
        assert_eq!(active, vec![Difficulty::Hardcore]);
    }
}
