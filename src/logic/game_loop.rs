//! Logic thread driver: reconciles input against the playback clock.

use crate::input::events::GameAction;
use crate::logic::audio::AudioManager;
use crate::logic::session::Session;
use crate::models::chart::{self, ChartData};
use crate::models::settings::{OFFSET_RANGE_MS, SCROLL_RANGE, Settings};
use crate::shared::snapshot::GameplaySnapshot;
use crate::system::bus::SystemBus;
use crossbeam_channel::TryRecvError;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Target ticks per second for the logic thread.
const TICK_RATE: u64 = 200;
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE);

pub struct LogicLoop {
    bus: SystemBus,
    audio: AudioManager,
    chart: Arc<ChartData>,
    session: Session,
    settings: Settings,
}

impl LogicLoop {
    pub fn new(bus: SystemBus, settings: Settings) -> Self {
        let audio = AudioManager::new(&bus);
        let chart = Arc::new(chart::generate(&settings.chart));
        log::info!(
            "LOGIC: Generated chart: {} notes, {:.1}s at {} BPM ({:.3}s/beat, seed {})",
            chart.notes.len(),
            chart.duration,
            chart.config.bpm,
            chart.seconds_per_beat,
            chart.config.seed
        );

        let session = Session::new(&chart);
        audio.prepare(chart.clone());
        audio.set_volume(settings.master_volume);

        Self {
            bus,
            audio,
            chart,
            session,
            settings,
        }
    }

    pub fn run(&mut self) {
        let mut next_tick = Instant::now();

        loop {
            loop {
                match self.bus.action_rx.try_recv() {
                    Ok(action) => self.handle_action(action),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            self.update();
            self.broadcast();

            next_tick += TICK_DURATION;
            let now = Instant::now();
            if now < next_tick {
                thread::sleep(next_tick - now);
            } else {
                next_tick = now + TICK_DURATION;
            }
        }
    }

    /// Clock value used for judging: audio time plus the player offset.
    /// Sampled fresh at every use, never cached across handlers.
    fn now(&self) -> f64 {
        self.audio.current_time() + self.settings.offset_seconds()
    }

    fn handle_action(&mut self, action: GameAction) {
        match action {
            GameAction::Hit { lane } => {
                if let Some(judgement) = self.session.hit(lane, self.now()) {
                    log::debug!("LOGIC: lane {lane} -> {}", judgement.label());
                }
            }
            // Taps only: a release just re-arms the mapper.
            GameAction::Release { .. } => {}
            GameAction::Start => self.start(),
            GameAction::Stop => self.stop(),
            GameAction::Restart => {
                self.stop();
                self.start();
            }
            // Tuning is persisted immediately: the process can die with the
            // window, so there is no reliable flush-on-exit point.
            GameAction::AdjustOffset(step_ms) => {
                self.settings.offset_ms = (self.settings.offset_ms + step_ms)
                    .clamp(OFFSET_RANGE_MS.0, OFFSET_RANGE_MS.1);
                log::info!("LOGIC: Judgement offset {}ms", self.settings.offset_ms);
                self.settings.save();
            }
            GameAction::AdjustScroll(step) => {
                self.settings.scroll_speed =
                    (self.settings.scroll_speed + step).clamp(SCROLL_RANGE.0, SCROLL_RANGE.1);
                log::info!("LOGIC: Scroll speed x{:.1}", self.settings.scroll_speed);
                self.settings.save();
            }
        }
    }

    fn start(&mut self) {
        if self.session.is_running() {
            return;
        }
        if !self.audio.is_available() {
            log::warn!("LOGIC: No audio device, session runs against a frozen clock");
        }
        self.audio.play();
        self.session.start();
        log::info!("LOGIC: Session started");
    }

    fn stop(&mut self) {
        self.audio.stop();
        self.session.stop();
    }

    fn update(&mut self) {
        if !self.session.is_running() {
            return;
        }
        self.session.tick(self.now());

        // Natural end: past the chart with nothing left to judge.
        if self.now() >= self.chart.duration && self.session.finished() {
            let stats = self.session.stats();
            log::info!(
                "LOGIC: Session complete: accuracy {:.2}%, max combo {}, {}/{} judged",
                stats.accuracy,
                stats.max_combo,
                stats.total_judged,
                self.chart.notes.len()
            );
            self.stop();
        }
    }

    fn broadcast(&self) {
        let snapshot = GameplaySnapshot {
            notes: self.session.notes().to_vec(),
            current_time: self.audio.current_time(),
            offset_seconds: self.settings.offset_seconds(),
            scroll_speed: self.settings.scroll_speed,
            stats: self.session.stats().clone(),
            phase: self.session.phase(),
            audio_available: self.audio.is_available(),
        };
        // Bounded channel: drop the frame when presentation lags.
        let _ = self.bus.snapshot_tx.try_send(snapshot);
    }
}
