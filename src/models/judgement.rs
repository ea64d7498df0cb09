//! Judgement categories, timing windows and the hit classifier.

/// Hit judgement types from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgement {
    /// Tightest timing.
    Perfect,
    /// Slightly off.
    Great,
    /// Barely inside the widest window.
    Good,
    /// Expired note, stray press, or press outside every window.
    Miss,
}

/// Timing window for a PERFECT hit (seconds, inclusive).
pub const PERFECT_WINDOW: f64 = 0.05;
/// Timing window for a GREAT hit (seconds, inclusive).
pub const GREAT_WINDOW: f64 = 0.10;
/// Timing window for a GOOD hit (seconds, inclusive).
/// Also the expiry threshold: a pending note older than this is a miss.
pub const GOOD_WINDOW: f64 = 0.16;

impl Judgement {
    /// Scoring weight in [0, 1].
    pub fn weight(self) -> f64 {
        match self {
            Judgement::Perfect => 1.0,
            Judgement::Great => 0.75,
            Judgement::Good => 0.5,
            Judgement::Miss => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Judgement::Perfect => "PERFECT",
            Judgement::Great => "GREAT",
            Judgement::Good => "GOOD",
            Judgement::Miss => "MISS",
        }
    }
}

/// Classifies a timing delta (note time minus press time, seconds).
///
/// Windows are inclusive at their upper bound and a tie resolves to the
/// tighter band. Returns `None` when the press is outside even the GOOD
/// window; the caller decides what that means for the note.
pub fn classify(delta_seconds: f64) -> Option<Judgement> {
    let distance = delta_seconds.abs();
    if distance <= PERFECT_WINDOW {
        Some(Judgement::Perfect)
    } else if distance <= GREAT_WINDOW {
        Some(Judgement::Great)
    } else if distance <= GOOD_WINDOW {
        Some(Judgement::Good)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_boundaries() {
        assert_eq!(classify(0.049), Some(Judgement::Perfect));
        assert_eq!(classify(0.05), Some(Judgement::Perfect));
        assert_eq!(classify(0.0501), Some(Judgement::Great));
        assert_eq!(classify(0.10), Some(Judgement::Great));
        assert_eq!(classify(0.16), Some(Judgement::Good));
        assert_eq!(classify(0.1601), None);
    }

    #[test]
    fn test_sign_is_ignored() {
        assert_eq!(classify(-0.03), Some(Judgement::Perfect));
        assert_eq!(classify(-0.16), Some(Judgement::Good));
        assert_eq!(classify(-0.2), None);
    }

    #[test]
    fn test_weights() {
        assert_eq!(Judgement::Perfect.weight(), 1.0);
        assert_eq!(Judgement::Great.weight(), 0.75);
        assert_eq!(Judgement::Good.weight(), 0.5);
        assert_eq!(Judgement::Miss.weight(), 0.0);
    }
}
