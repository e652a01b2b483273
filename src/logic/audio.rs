//! Audio collaborator contract and the logging implementation.
//!
//! The engine never plays sound itself; it hands [`AudioCue`]s to an
//! [`AudioSink`], usually on a dedicated audio thread fed by the bus.

use std::io;
use std::thread::{self, JoinHandle};

use crate::models::engine::ChartEntry;
use crate::models::engine::constants::TAIL_PULSE_SEC;
use crate::state::game::AudioCue;
use crate::system::bus::SystemBus;

pub trait AudioSink {
    /// Plays a chart entry for its full length.
    fn play_note(&mut self, entry: &ChartEntry);
    /// 20 ms pulse of a held sustain.
    fn play_tail_pulse(&mut self, entry: &ChartEntry);
    fn play_distorted(&mut self, entry: &ChartEntry, duration_sec: f64);
    fn play_random_fallback(&mut self, entry: &ChartEntry);

    fn handle(&mut self, cue: &AudioCue) {
        match cue {
            AudioCue::Note(entry) => self.play_note(entry),
            AudioCue::TailPulse(entry) => self.play_tail_pulse(entry),
            AudioCue::Distorted {
                entry,
                duration_sec,
            } => self.play_distorted(entry, *duration_sec),
            AudioCue::RandomFallback(entry) => self.play_random_fallback(entry),
        }
    }
}

/// Writes every cue to the log and counts them.
#[derive(Debug, Default)]
pub struct LogAudio {
    pub notes: u64,
    pub tail_pulses: u64,
    pub distorted: u64,
    pub fallbacks: u64,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.notes + self.tail_pulses + self.distorted + self.fallbacks
    }
}

impl AudioSink for LogAudio {
    fn play_note(&mut self, entry: &ChartEntry) {
        self.notes += 1;
        log::debug!(
            "AUDIO: {} pitch {} vel {:.2} for {:.3}s",
            entry.instrument,
            entry.pitch,
            entry.velocity,
            entry.duration_sec()
        );
    }

    fn play_tail_pulse(&mut self, entry: &ChartEntry) {
        self.tail_pulses += 1;
        log::trace!(
            "AUDIO: pulse {} pitch {} for {:.3}s",
            entry.instrument,
            entry.pitch,
            TAIL_PULSE_SEC
        );
    }

    fn play_distorted(&mut self, entry: &ChartEntry, duration_sec: f64) {
        self.distorted += 1;
        log::debug!(
            "AUDIO: distorted {} pitch {} for {:.3}s",
            entry.instrument,
            entry.pitch,
            duration_sec
        );
    }

    fn play_random_fallback(&mut self, entry: &ChartEntry) {
        self.fallbacks += 1;
        log::debug!(
            "AUDIO: fallback {} pitch {} for {:.3}s",
            entry.instrument,
            entry.pitch,
            entry.duration_sec()
        );
    }
}

/// Spawns the audio thread. It exits when the cue channel disconnects.
pub fn start_thread<S>(bus: &SystemBus, mut sink: S) -> io::Result<JoinHandle<()>>
where
    S: AudioSink + Send + 'static,
{
    let audio_rx = bus.audio_rx.clone();
    thread::Builder::new()
        .name("Audio Thread".to_string())
        .spawn(move || {
            log::info!("AUDIO: Thread started");
            for cue in audio_rx.iter() {
                sink.handle(&cue);
            }
            log::info!("AUDIO: Thread stopped");
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> ChartEntry {
        ChartEntry {
            playable: true,
            instrument: "violin".into(),
            velocity: 0.9,
            pitch: 72,
            start_sec: 1.0,
            end_sec: 1.5,
        }
    }

    #[test]
    fn test_handle_dispatches_every_cue() {
        let mut audio = LogAudio::new();
        audio.handle(&AudioCue::Note(entry()));
        audio.handle(&AudioCue::TailPulse(entry()));
        audio.handle(&AudioCue::TailPulse(entry()));
        audio.handle(&AudioCue::Distorted {
            entry: entry(),
            duration_sec: 0.3,
        });
        audio.handle(&AudioCue::RandomFallback(entry()));
        assert_eq!(audio.notes, 1);
        assert_eq!(audio.tail_pulses, 2);
        assert_eq!(audio.distorted, 1);
        assert_eq!(audio.fallbacks, 1);
        assert_eq!(audio.total(), 5);
    }
}
