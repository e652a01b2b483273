//! Chart entries and CSV chart loading.

use std::fs;
use std::path::Path;

use md5::Context;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::constants::SUSTAIN_THRESHOLD_SEC;
use crate::error::{Error, Result};

/// One row of a chart: a sample to play and, if playable, a note to hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEntry {
    /// Only playable entries spawn falling notes. Every entry is still played back.
    pub playable: bool,
    pub instrument: String,
    /// Normalized to `[0, 1]`.
    pub velocity: f64,
    /// MIDI pitch, 0-127.
    pub pitch: u8,
    pub start_sec: f64,
    pub end_sec: f64,
}

impl ChartEntry {
    pub fn duration_sec(&self) -> f64 {
        self.end_sec - self.start_sec
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_sec() * 1000.0
    }

    /// Entries longer than one second get a sustain tail.
    pub fn is_sustain(&self) -> bool {
        self.duration_sec() > SUSTAIN_THRESHOLD_SEC
    }

    /// Whether the entry is sounding at `now_sec` (inclusive on both ends).
    pub fn covers(&self, now_sec: f64) -> bool {
        self.start_sec <= now_sec && now_sec <= self.end_sec
    }

    fn parse_row(line: usize, row: &str) -> Result<Self> {
        let fields: Vec<&str> = row.split(',').map(str::trim).collect();
        if fields.len() != 6 {
            return Err(invalid(line, format!("expected 6 fields, found {}", fields.len())));
        }

        let velocity = parse_finite(line, "velocity", fields[2])?;
        if !(0.0..=1.0).contains(&velocity) {
            return Err(invalid(line, format!("velocity {velocity} outside [0, 1]")));
        }

        let pitch = parse_finite(line, "pitch", fields[3])?;
        if !(0.0..=127.0).contains(&pitch) || pitch.fract() != 0.0 {
            return Err(invalid(line, format!("pitch {pitch} is not a MIDI note number")));
        }

        let start_sec = parse_finite(line, "start", fields[4])?;
        let end_sec = parse_finite(line, "end", fields[5])?;
        if end_sec < start_sec {
            return Err(invalid(line, format!("end {end_sec} before start {start_sec}")));
        }

        Ok(Self {
            playable: fields[0] == "True",
            instrument: fields[1].to_string(),
            velocity,
            pitch: pitch as u8,
            start_sec,
            end_sec,
        })
    }
}

fn invalid(line: usize, reason: String) -> Error {
    Error::InvalidChartRow { line, reason }
}

fn parse_finite(line: usize, name: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .parse()
        .map_err(|_| invalid(line, format!("{name} '{raw}' is not a number")))?;
    if !value.is_finite() {
        return Err(invalid(line, format!("{name} is not finite")));
    }
    Ok(value)
}

/// An immutable, ordered chart plus the md5 of its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    entries: Vec<ChartEntry>,
    hash: String,
}

impl Chart {
    /// Parses CSV text. The first line is a header and is skipped, as are blank lines.
    pub fn parse(source: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (i, row) in source.lines().enumerate().skip(1) {
            if row.trim().is_empty() {
                continue;
            }
            entries.push(ChartEntry::parse_row(i + 1, row)?);
        }
        if entries.is_empty() {
            return Err(Error::EmptyChart);
        }

        let mut context = Context::new();
        context.consume(source.as_bytes());
        Ok(Self {
            entries,
            hash: format!("{:x}", context.finalize()),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let chart = Self::parse(&source)?;
        log::info!(
            "ENGINE: Loaded chart {:?} ({} entries, hash {})",
            path,
            chart.len(),
            chart.hash
        );
        Ok(chart)
    }

    /// Builds a chart from already validated entries. The hash covers their debug form.
    pub fn from_entries(entries: Vec<ChartEntry>) -> Self {
        let mut context = Context::new();
        for entry in &entries {
            context.consume(format!("{entry:?}\n").as_bytes());
        }
        Self {
            entries,
            hash: format!("{:x}", context.finalize()),
        }
    }

    /// Random practice chart used when no chart file is configured.
    pub fn generate_demo(note_count: usize) -> Self {
        const INSTRUMENTS: [&str; 4] = ["piano", "bass", "synth", "organ"];

        let mut rng = rand::rng();
        let mut entries = Vec::with_capacity(note_count);
        let mut current = 1.0;
        for _ in 0..note_count {
            let length = if rng.random_bool(0.15) {
                rng.random_range(1.2..2.5)
            } else {
                rng.random_range(0.1..0.6)
            };
            entries.push(ChartEntry {
                playable: rng.random_bool(0.9),
                instrument: INSTRUMENTS[rng.random_range(0..INSTRUMENTS.len())].to_string(),
                velocity: rng.random_range(0.4..=1.0),
                pitch: rng.random_range(48..=84),
                start_sec: current,
                end_sec: current + length,
            });
            current += rng.random_range(0.25..1.0);
        }
        Self::from_entries(entries)
    }

    pub fn entries(&self) -> &[ChartEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ChartEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// End of the last sounding entry, in seconds.
    pub fn duration_sec(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.end_sec)
            .fold(0.0, f64::max)
    }
}
