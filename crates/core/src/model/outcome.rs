/// Share of correct answers, in percent, needed for a victory.
pub const PASS_PERCENT: usize = 70;

/// Final verdict shown on the result screen.
///
/// Always derived from a score and question count, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
}

impl Outcome {
    #[must_use]
    pub fn classify(score: usize, total: usize) -> Self {
        if total > 0 && score * 100 >= total * PASS_PERCENT {
            Outcome::Victory
        } else {
            Outcome::Defeat
        }
    }

    #[must_use]
    pub fn is_victory(self) -> bool {
        matches!(self, Outcome::Victory)
    }
}
