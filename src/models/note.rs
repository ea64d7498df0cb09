//! Runtime note lifecycle, owned exclusively by the session.

use crate::models::chart::ChartData;
use crate::models::judgement::Judgement;

/// Status of a single note. A note leaves `Pending` exactly once and the
/// terminal states are the only ones that carry a hit offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteStatus {
    Pending,
    /// Hit inside a window. Never carries [`Judgement::Miss`].
    Judged { judgement: Judgement, offset: f64 },
    /// Expired unhit. `offset` is how far past the note the clock was.
    Missed { offset: f64 },
}

/// A chart note plus its judgement state for the running session.
#[derive(Debug, Clone)]
pub struct NoteState {
    pub id: String,
    pub lane: usize,
    pub time: f64,
    pub status: NoteStatus,
}

impl NoteState {
    pub fn is_pending(&self) -> bool {
        matches!(self.status, NoteStatus::Pending)
    }
}

/// Builds the initial per-note state for a freshly loaded chart.
/// Order follows the chart, so it is already (time, lane) sorted.
pub fn from_chart(chart: &ChartData) -> Vec<NoteState> {
    chart
        .notes
        .iter()
        .map(|note| NoteState {
            id: note.id.clone(),
            lane: note.lane,
            time: note.time,
            status: NoteStatus::Pending,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chart::{self, ChartConfig};

    #[test]
    fn test_fresh_states_are_all_pending() {
        let chart = chart::generate(&ChartConfig::default());
        let states = from_chart(&chart);
        assert_eq!(states.len(), chart.notes.len());
        assert!(states.iter().all(NoteState::is_pending));
    }
}
