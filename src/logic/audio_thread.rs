//! Dedicated audio thread: metronome synthesis and rodio playback.
//!
//! The worker owns the output device. When no device exists it keeps
//! accepting commands in silent mode with the position counter frozen at
//! 0, so the rest of the session degrades instead of crashing.

use crate::logic::audio::PLAYBACK_LEAD_IN;
use crate::models::chart::ChartData;
use crate::system::bus::{AudioCommand, SystemBus};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

const SAMPLE_RATE: u32 = 44_100;
const PULSE_LENGTH: f64 = 0.12;
const PULSE_FREQUENCY: f64 = 880.0;

/// Synthesizes the mono metronome track for a chart, including the
/// leading silence that realizes the playback lookahead.
///
/// Each note contributes a decaying 880 Hz pulse at its sample offset;
/// notes on measure starts get a 1.2x accent.
pub fn build_metronome(chart: &ChartData, sample_rate: u32) -> Vec<f32> {
    let rate = f64::from(sample_rate);
    let last_note_time = chart.notes.last().map_or(0.0, |note| note.time);
    let duration = (chart.duration + 1.0).max(last_note_time + 1.0).max(3.0);

    let lead_in_samples = (PLAYBACK_LEAD_IN * rate) as usize;
    let total_samples = lead_in_samples + (duration * rate).ceil() as usize;
    let mut data = vec![0.0f32; total_samples];

    let accent_interval =
        (chart.config.beats_per_measure * chart.config.resolution).max(1) as usize;
    let pulse_samples = (PULSE_LENGTH * rate) as usize;

    for (index, note) in chart.notes.iter().enumerate() {
        let start = lead_in_samples + (note.time * rate) as usize;
        let accent = if index % accent_interval == 0 { 1.2 } else { 1.0 };

        for i in 0..pulse_samples {
            let Some(sample) = data.get_mut(start + i) else {
                break;
            };
            let t = i as f64 / rate;
            let envelope = (-8.0 * t).exp();
            *sample +=
                ((2.0 * std::f64::consts::PI * PULSE_FREQUENCY * t).sin() * envelope * 0.4 * accent)
                    as f32;
        }
    }

    data
}

/// Counts samples as they pass to the output so the logic thread can read
/// an audio-true playback position.
struct PositionMonitor<I> {
    inner: I,
    position_counter: Arc<AtomicU64>,
}

impl<I> Iterator for PositionMonitor<I>
where
    I: Iterator,
{
    type Item = I::Item;
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next();
        if item.is_some() {
            self.position_counter.fetch_add(1, Ordering::Relaxed);
        }
        item
    }
}

impl<I> Source for PositionMonitor<I>
where
    I: Source,
    I::Item: rodio::Sample,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.inner.current_frame_len()
    }
    fn channels(&self) -> u16 {
        self.inner.channels()
    }
    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }
    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}

struct AudioWorker {
    _stream: Option<OutputStream>,
    stream_handle: Option<OutputStreamHandle>,
    sink: Option<Sink>,
    /// Prepared metronome samples for the current chart.
    track: Option<Arc<Vec<f32>>>,
    volume: f32,
    position_counter: Arc<AtomicU64>,
    has_audio: bool,
}

impl AudioWorker {
    fn new(bus: &SystemBus) -> Self {
        let (stream, stream_handle, has_audio) = match OutputStream::try_default() {
            Ok((stream, handle)) => {
                log::info!("AUDIO: Device found, audio enabled");
                (Some(stream), Some(handle), true)
            }
            Err(e) => {
                log::warn!("AUDIO: No audio device found ({e}), clock will stay frozen");
                (None, None, false)
            }
        };
        bus.audio_available.store(has_audio, Ordering::Relaxed);

        Self {
            _stream: stream,
            stream_handle,
            sink: None,
            track: None,
            volume: 0.5,
            position_counter: bus.audio_position.clone(),
            has_audio,
        }
    }

    fn handle_command(&mut self, cmd: AudioCommand, bus: &SystemBus) {
        match cmd {
            AudioCommand::Prepare { chart } => self.prepare(&chart, bus),
            AudioCommand::Play => self.play(),
            AudioCommand::Stop => self.stop(),
            AudioCommand::SetVolume { volume } => {
                self.volume = volume;
                if let Some(sink) = &self.sink {
                    sink.set_volume(volume);
                }
            }
        }
    }

    fn prepare(&mut self, chart: &ChartData, bus: &SystemBus) {
        // Replace any scheduled playback before building the new track.
        self.stop();

        bus.audio_sample_rate
            .store(u64::from(SAMPLE_RATE), Ordering::Relaxed);
        bus.audio_channels.store(1, Ordering::Relaxed);

        let track = build_metronome(chart, SAMPLE_RATE);
        log::info!(
            "AUDIO: Prepared metronome track, {} notes over {:.1}s",
            chart.notes.len(),
            chart.duration
        );
        self.track = Some(Arc::new(track));
    }

    fn play(&mut self) {
        if !self.has_audio {
            return;
        }
        let Some(track) = &self.track else {
            log::warn!("AUDIO: Play requested with no prepared track");
            return;
        };
        let Some(stream_handle) = &self.stream_handle else {
            return;
        };

        // Restarting playback replaces the old sink entirely.
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.position_counter.store(0, Ordering::Relaxed);

        let Ok(sink) = Sink::try_new(stream_handle) else {
            log::error!("AUDIO: Failed to create sink");
            return;
        };

        let source = SamplesBuffer::new(1, SAMPLE_RATE, track.as_slice().to_vec());
        let monitor = PositionMonitor {
            inner: source,
            position_counter: self.position_counter.clone(),
        };

        sink.set_volume(self.volume);
        sink.append(monitor);
        self.sink = Some(sink);
    }

    /// Idempotent: stopping an already-finished or never-started playback
    /// is an expected race and does nothing.
    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.position_counter.store(0, Ordering::Relaxed);
    }
}

/// Starts the dedicated audio thread.
pub fn start_audio_thread(bus: SystemBus) {
    thread::Builder::new()
        .name("Audio Thread".to_string())
        .spawn(move || {
            log::info!("AUDIO: Thread started");

            let mut worker = AudioWorker::new(&bus);

            while let Ok(cmd) = bus.audio_cmd_rx.recv() {
                worker.handle_command(cmd, &bus);
            }

            log::info!("AUDIO: Thread stopped");
        })
        .expect("Failed to spawn Audio thread");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chart::{self, ChartConfig};

    fn test_chart() -> ChartData {
        chart::generate(&ChartConfig::default())
    }

    #[test]
    fn test_lead_in_is_silent() {
        let chart = test_chart();
        let data = build_metronome(&chart, SAMPLE_RATE);
        let lead_in = (PLAYBACK_LEAD_IN * f64::from(SAMPLE_RATE)) as usize;
        assert!(data[..lead_in].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_pulse_lands_on_first_note() {
        let chart = test_chart();
        let data = build_metronome(&chart, SAMPLE_RATE);
        let lead_in = (PLAYBACK_LEAD_IN * f64::from(SAMPLE_RATE)) as usize;
        let start = lead_in + (chart.notes[0].time * f64::from(SAMPLE_RATE)) as usize;
        let pulse = &data[start..start + (PULSE_LENGTH * f64::from(SAMPLE_RATE)) as usize];
        assert!(pulse.iter().any(|&s| s.abs() > 0.05));
    }

    #[test]
    fn test_track_covers_chart_duration() {
        let chart = test_chart();
        let data = build_metronome(&chart, SAMPLE_RATE);
        let min_len = ((chart.duration + 1.0) * f64::from(SAMPLE_RATE)) as usize;
        assert!(data.len() >= min_len);
    }
}
