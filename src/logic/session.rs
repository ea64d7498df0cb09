//! Session state machine: note lifecycle, input reconciliation, stats.
//!
//! The session owns every `NoteState` and is the only writer. Ticks and
//! key presses both funnel through it on the logic thread, each carrying
//! the absolute clock value sampled at the moment of handling.

use crate::models::chart::{ChartData, LANE_COUNT};
use crate::models::judgement::{self, GOOD_WINDOW, Judgement};
use crate::models::note::{self, NoteState, NoteStatus};
use crate::models::stats::GameStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Running,
}

pub struct Session {
    /// (time, lane) ordered, mirroring the chart.
    notes: Vec<NoteState>,
    stats: GameStats,
    phase: SessionPhase,
}

impl Session {
    pub fn new(chart: &ChartData) -> Self {
        Self {
            notes: note::from_chart(chart),
            stats: GameStats::new(),
            phase: SessionPhase::Idle,
        }
    }

    /// Enters `Running` with every note back to pending and stats zeroed.
    pub fn start(&mut self) {
        for note in &mut self.notes {
            note.status = NoteStatus::Pending;
        }
        self.stats = GameStats::new();
        self.phase = SessionPhase::Running;
    }

    pub fn stop(&mut self) {
        self.phase = SessionPhase::Idle;
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn notes(&self) -> &[NoteState] {
        &self.notes
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn pending_count(&self) -> usize {
        self.notes.iter().filter(|n| n.is_pending()).count()
    }

    /// True once every note has reached a terminal status.
    pub fn finished(&self) -> bool {
        self.pending_count() == 0
    }

    /// Expires every pending note whose widest window has passed.
    ///
    /// `now` is absolute session time: a delayed tick expires everything
    /// that became overdue in the meantime, in (time, lane) order, so stat
    /// accumulation is deterministic however ticks are scheduled.
    pub fn tick(&mut self, now: f64) {
        if self.phase != SessionPhase::Running {
            return;
        }
        for note in &mut self.notes {
            if note.is_pending() && note.time + GOOD_WINDOW < now {
                note.status = NoteStatus::Missed {
                    offset: now - note.time,
                };
                self.stats = self.stats.apply(Judgement::Miss);
            }
        }
    }

    /// Judges one key press against the nearest pending note in the lane.
    ///
    /// Consumes at most one note. A press with no candidate, or one outside
    /// every window, emits a miss against the player; in the latter case
    /// the note itself stays pending and may still be hit later.
    /// Malformed lanes and presses while idle are ignored.
    pub fn hit(&mut self, lane: usize, now: f64) -> Option<Judgement> {
        if self.phase != SessionPhase::Running || lane >= LANE_COUNT {
            return None;
        }

        let target = self
            .notes
            .iter()
            .enumerate()
            .filter(|(_, note)| note.lane == lane && note.is_pending())
            .min_by(|(_, a), (_, b)| {
                (a.time - now).abs().total_cmp(&(b.time - now).abs())
            })
            .map(|(index, _)| index);

        let Some(index) = target else {
            self.stats = self.stats.apply(Judgement::Miss);
            return Some(Judgement::Miss);
        };

        let delta = self.notes[index].time - now;
        match judgement::classify(delta) {
            Some(judged) => {
                self.notes[index].status = NoteStatus::Judged {
                    judgement: judged,
                    offset: delta,
                };
                self.stats = self.stats.apply(judged);
                Some(judged)
            }
            None => {
                self.stats = self.stats.apply(Judgement::Miss);
                Some(Judgement::Miss)
            }
        }
    }
}
