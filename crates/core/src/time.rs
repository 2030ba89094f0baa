use chrono::{DateTime, Utc};

/// Source of "now" for archive timestamps. Tests pin it with `Clock::Fixed`.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Seconds since the Unix epoch, used to name archived quiz files.
    #[must_use]
    pub fn unix_timestamp(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_pinned_time() {
        let clock = fixed_clock();
        assert_eq!(clock.now(), fixed_now());
        assert_eq!(clock.unix_timestamp(), FIXED_TEST_TIMESTAMP);
    }

    #[test]
    fn default_clock_follows_system_time() {
        let clock = Clock::default();
        assert!(matches!(clock, Clock::Default));
        assert!(matches!(Clock::default_clock(), Clock::Default));

        let before = Utc::now();
        let now = clock.now();
        assert!(now >= before);
        assert!(now <= Utc::now());
    }
}
