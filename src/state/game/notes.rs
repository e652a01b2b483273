//! Clock ticks: playback scheduling, spawning, movement and expiry.

use super::{AudioCue, GameState, Transition};
use crate::models::engine::constants::{
    NUM_LANES, SPAWN_LOOKAHEAD_MS, SPAWN_TOLERANCE_MS, SUSTAIN_THRESHOLD_SEC, TICK_MS,
};
use crate::models::engine::{Chart, Lane, NoteInstance, rng};
use crate::models::stats::Judgement;

impl GameState {
    pub(super) fn tick(&self, chart: &Chart, elapsed: u64) -> Transition {
        let now = elapsed as f64 * TICK_MS;
        let due_to_play = self.due_to_play_at(chart, now);
        let spawned = due_to_spawn_at(chart, now);

        // Every note spawned on this tick shares the pre-advance seed, and the
        // clock of the previous snapshot.
        let lane = Lane::from_index(rng::pick_index(self.seed, NUM_LANES));
        let new_notes = spawned.iter().enumerate().filter_map(|(i, &index)| {
            chart.get(index).map(|entry| {
                NoteInstance::spawn(self.object_count + i as u64, self.time_ms, lane, index, entry)
            })
        });

        let (exit, mut active): (Vec<_>, Vec<_>) = self
            .active
            .iter()
            .map(NoteInstance::advanced)
            .partition(NoteInstance::is_expired);
        active.extend(new_notes);

        let missed = exit.iter().filter(|n| n.counts_as_miss()).count() as u32;

        let mut next = self.clone();
        next.active = active;
        next.exit = exit;
        next.time_ms = now;
        next.play_index = self.play_index + due_to_play.len();
        next.object_count = self.object_count + spawned.len() as u64;
        next.game_end = next.play_index >= chart.len();
        next.hold_duration = if self.hold { self.hold_duration + TICK_MS } else { 0.0 };
        next.tap = false;
        next.play_random_note = false;
        next.missed = self.missed + missed;
        next.seed = rng::hash(self.seed);
        next.stats.record_misses(missed);

        let mut cues: Vec<AudioCue> = due_to_play
            .iter()
            .filter_map(|&i| chart.get(i))
            .filter(|e| e.duration_sec() < SUSTAIN_THRESHOLD_SEC)
            .map(|e| AudioCue::Note(e.clone()))
            .collect();
        if next.hold {
            cues.extend(
                next.active
                    .iter()
                    .filter(|n| n.has_tail())
                    .map(|n| AudioCue::TailPulse(n.entry.clone())),
            );
        }

        next.due_to_play = due_to_play;
        next.spawned = spawned;

        Transition {
            state: next,
            cues,
            judgement: (missed > 0).then_some(Judgement::Miss),
        }
    }

    /// Entries at or past the play index that are sounding at `now` (ms).
    fn due_to_play_at(&self, chart: &Chart, now: f64) -> Vec<usize> {
        let now_sec = now / 1000.0;
        chart
            .entries()
            .iter()
            .enumerate()
            .skip(self.play_index)
            .filter(|(_, e)| e.covers(now_sec))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Playable entries whose start is one lookahead away from `now`, with runs
/// of identical start times collapsed to their first entry.
fn due_to_spawn_at(chart: &Chart, now: f64) -> Vec<usize> {
    let band = (SPAWN_LOOKAHEAD_MS - SPAWN_TOLERANCE_MS)..=(SPAWN_LOOKAHEAD_MS + SPAWN_TOLERANCE_MS);
    let mut selected: Vec<usize> = Vec::new();
    for (i, entry) in chart.entries().iter().enumerate() {
        if !entry.playable || !band.contains(&(entry.start_sec * 1000.0 - now)) {
            continue;
        }
        let duplicate = selected
            .last()
            .and_then(|&last| chart.get(last))
            .is_some_and(|prev| prev.start_sec == entry.start_sec);
        if !duplicate {
            selected.push(i);
        }
    }
    selected
}
