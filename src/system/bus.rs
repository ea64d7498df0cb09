//! Shared channel infrastructure between system threads.
//!
//! The `SystemBus` is the central hub for inter-thread communication,
//! using lock-free channels plus a handful of atomics for the audio clock.

use crate::input::events::{GameAction, RawInputEvent};
use crate::models::chart::ChartData;
use crate::shared::snapshot::GameplaySnapshot;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64};

/// Commands sent to the dedicated audio thread.
#[derive(Debug, Clone)]
pub enum AudioCommand {
    /// Synthesize the metronome track for a chart, replacing any prior one.
    Prepare { chart: Arc<ChartData> },
    /// Start playback from the beginning.
    Play,
    /// Stop playback and reset the position counter.
    Stop,
    /// Change master volume.
    SetVolume { volume: f32 },
}

/// Aggregates the cross-thread communication channels.
///
/// - Raw keyboard events from the window (main -> input)
/// - Processed gameplay actions (input -> logic)
/// - Gameplay snapshots for presentation (logic -> main)
/// - Audio commands (logic -> audio)
/// - Atomic playback position written by the audio thread
#[derive(Clone)]
pub struct SystemBus {
    pub raw_input_tx: Sender<RawInputEvent>,
    pub raw_input_rx: Receiver<RawInputEvent>,

    pub action_tx: Sender<GameAction>,
    pub action_rx: Receiver<GameAction>,

    pub snapshot_tx: Sender<GameplaySnapshot>,
    pub snapshot_rx: Receiver<GameplaySnapshot>,

    pub audio_cmd_tx: Sender<AudioCommand>,
    pub audio_cmd_rx: Receiver<AudioCommand>,

    /// Playback position in samples, counted past the output.
    /// Written by the audio thread, read by the logic thread.
    pub audio_position: Arc<AtomicU64>,

    /// Sample rate of the synthesized track.
    pub audio_sample_rate: Arc<AtomicU64>,

    /// Channel count of the synthesized track.
    pub audio_channels: Arc<AtomicU64>,

    /// False when no output device exists; the clock then stays frozen at 0.
    pub audio_available: Arc<AtomicBool>,
}

impl SystemBus {
    pub fn new() -> Self {
        let (raw_input_tx, raw_input_rx) = unbounded();
        let (action_tx, action_rx) = unbounded();

        // Bounded snapshot channel: max 2 frames queued to limit latency.
        let (snapshot_tx, snapshot_rx) = bounded(2);

        let (audio_cmd_tx, audio_cmd_rx) = unbounded();

        Self {
            raw_input_tx,
            raw_input_rx,
            action_tx,
            action_rx,
            snapshot_tx,
            snapshot_rx,
            audio_cmd_tx,
            audio_cmd_rx,
            audio_position: Arc::new(AtomicU64::new(0)),
            audio_sample_rate: Arc::new(AtomicU64::new(44_100)),
            audio_channels: Arc::new(AtomicU64::new(1)),
            audio_available: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}
