//! Aggregate judgement statistics for a play session.

use crate::models::judgement::Judgement;

/// Running totals derived from the stream of judgement events.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStats {
    /// Consecutive non-miss judgements since the last miss.
    pub combo: u32,
    pub max_combo: u32,
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub miss: u32,
    /// Sum of judgement weights.
    pub score: f64,
    pub total_judged: u32,
    /// score / total_judged * 100; 100 before the first judgement.
    pub accuracy: f64,
    pub last_judgement: Option<Judgement>,
}

impl GameStats {
    pub fn new() -> Self {
        Self {
            combo: 0,
            max_combo: 0,
            perfect: 0,
            great: 0,
            good: 0,
            miss: 0,
            score: 0.0,
            total_judged: 0,
            accuracy: 100.0,
            last_judgement: None,
        }
    }

    /// Folds one judgement into the aggregates.
    ///
    /// Pure reducer: accumulation stays testable without a live session and
    /// a result screen can replay it from an event log.
    #[must_use]
    pub fn apply(&self, judgement: Judgement) -> Self {
        let mut next = self.clone();
        match judgement {
            Judgement::Perfect => next.perfect += 1,
            Judgement::Great => next.great += 1,
            Judgement::Good => next.good += 1,
            Judgement::Miss => next.miss += 1,
        }
        next.combo = if judgement == Judgement::Miss {
            0
        } else {
            self.combo + 1
        };
        next.max_combo = next.max_combo.max(next.combo);
        next.score += judgement.weight();
        next.total_judged += 1;
        next.accuracy = (next.score / f64::from(next.total_judged)) * 100.0;
        next.last_judgement = Some(judgement);
        next
    }
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_is_full_before_any_judgement() {
        let stats = GameStats::new();
        assert_eq!(stats.accuracy, 100.0);
        assert_eq!(stats.total_judged, 0);
        assert_eq!(stats.last_judgement, None);
    }

    #[test]
    fn test_sequence_arithmetic() {
        let stats = [
            Judgement::Perfect,
            Judgement::Perfect,
            Judgement::Miss,
            Judgement::Great,
        ]
        .into_iter()
        .fold(GameStats::new(), |acc, j| acc.apply(j));

        assert_eq!(stats.score, 2.75);
        assert_eq!(stats.total_judged, 4);
        assert!((stats.accuracy - 68.75).abs() < 1e-10);
        assert_eq!(stats.combo, 1);
        assert_eq!(stats.max_combo, 2);
        assert_eq!(stats.perfect, 2);
        assert_eq!(stats.great, 1);
        assert_eq!(stats.miss, 1);
        assert_eq!(stats.last_judgement, Some(Judgement::Great));
    }

    #[test]
    fn test_miss_resets_combo_only() {
        let stats = GameStats::new()
            .apply(Judgement::Good)
            .apply(Judgement::Good)
            .apply(Judgement::Miss);
        assert_eq!(stats.combo, 0);
        assert_eq!(stats.max_combo, 2);
        assert_eq!(stats.good, 2);
    }
}
