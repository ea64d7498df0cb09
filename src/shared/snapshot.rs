//! Gameplay snapshots for the presentation boundary.
//!
//! Snapshots are immutable captures of session state sent from the logic
//! thread. A renderer consumes note positions and stats from here and
//! never mutates core state.

use crate::logic::session::SessionPhase;
use crate::models::note::NoteState;
use crate::models::stats::GameStats;

#[derive(Debug, Clone)]
pub struct GameplaySnapshot {
    /// Current note states in (time, lane) order.
    pub notes: Vec<NoteState>,
    /// Playback clock, seconds since scheduled start.
    pub current_time: f64,
    /// Player judgement offset in seconds.
    pub offset_seconds: f64,
    /// Scroll speed multiplier, presentation only.
    pub scroll_speed: f32,
    pub stats: GameStats,
    pub phase: SessionPhase,
    /// False when the session runs against a frozen clock.
    pub audio_available: bool,
}
