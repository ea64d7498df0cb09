//! Audio manager that sends commands to the dedicated audio thread.
//!
//! This is also the playback clock: session time derives from the sample
//! counter the audio thread publishes, not from wall-clock polling, so
//! judgement always runs against audio-true time.

use crate::models::chart::ChartData;
use crate::system::bus::{AudioCommand, SystemBus};
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Playback begins this long after `play()` to absorb scheduling latency.
/// The synthesized track carries this much leading silence, and reported
/// time is relative to the scheduled start.
pub const PLAYBACK_LEAD_IN: f64 = 0.1;

/// Control handle for the audio thread, owned by the logic thread.
pub struct AudioManager {
    cmd_tx: Sender<AudioCommand>,
    position: Arc<AtomicU64>,
    sample_rate: Arc<AtomicU64>,
    channels: Arc<AtomicU64>,
    available: Arc<AtomicBool>,
}

impl AudioManager {
    pub fn new(bus: &SystemBus) -> Self {
        Self {
            cmd_tx: bus.audio_cmd_tx.clone(),
            position: bus.audio_position.clone(),
            sample_rate: bus.audio_sample_rate.clone(),
            channels: bus.audio_channels.clone(),
            available: bus.audio_available.clone(),
        }
    }

    /// Synthesizes and stages the metronome track for a chart.
    /// Idempotent per chart: any prior track and playback are replaced.
    pub fn prepare(&self, chart: Arc<ChartData>) {
        let _ = self.cmd_tx.send(AudioCommand::Prepare { chart });
    }

    /// Schedules playback to begin after [`PLAYBACK_LEAD_IN`].
    pub fn play(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Play);
    }

    /// Halts playback and resets the clock to 0. Safe to call at any time,
    /// including when nothing is playing.
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Stop);
    }

    pub fn set_volume(&self, volume: f32) {
        let _ = self.cmd_tx.send(AudioCommand::SetVolume { volume });
    }

    /// Seconds elapsed since the scheduled playback start.
    ///
    /// Derived from the atomic sample counter, so it is monotonic
    /// non-decreasing while playing and 0 when stopped or when no audio
    /// device exists (frozen clock).
    pub fn current_time(&self) -> f64 {
        let samples = self.position.load(Ordering::Relaxed) as f64;
        let sample_rate = self.sample_rate.load(Ordering::Relaxed).max(1) as f64;
        let channels = self.channels.load(Ordering::Relaxed).max(1) as f64;

        (samples / (sample_rate * channels) - PLAYBACK_LEAD_IN).max(0.0)
    }

    /// False when the environment has no audio output. Observable so the
    /// presentation layer can surface the degraded state.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_reports_relative_to_scheduled_start() {
        let bus = SystemBus::new();
        let manager = AudioManager::new(&bus);
        bus.audio_sample_rate.store(44_100, Ordering::Relaxed);
        bus.audio_channels.store(1, Ordering::Relaxed);

        // 1.1s of mono samples played, minus the 0.1s lead-in.
        bus.audio_position.store(48_510, Ordering::Relaxed);
        assert!((manager.current_time() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clock_is_zero_during_lead_in_and_when_stopped() {
        let bus = SystemBus::new();
        let manager = AudioManager::new(&bus);

        assert_eq!(manager.current_time(), 0.0);

        // Halfway through the lead-in silence, still clamped to 0.
        bus.audio_position.store(2_205, Ordering::Relaxed);
        assert_eq!(manager.current_time(), 0.0);
    }
}
