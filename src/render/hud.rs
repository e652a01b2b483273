use std::collections::BTreeMap;
use std::io::{self, Write};

use super::Renderer;
use crate::models::engine::{Lane, NoteInstance};
use crate::state::game::GameState;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drawn {
    lane: Lane,
    y: f64,
    tail: Option<(f64, f64)>,
}

/// Text renderer: keeps a display list keyed by note id and prints the
/// score line whenever score, multiplier or missed count change.
pub struct TextHud<W: Write> {
    out: W,
    drawn: BTreeMap<u64, Drawn>,
    last_line: Option<(f64, f64, u32)>,
}

impl<W: Write> TextHud<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            drawn: BTreeMap::new(),
            last_line: None,
        }
    }

    pub fn drawn_ids(&self) -> Vec<u64> {
        self.drawn.keys().copied().collect()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, note: &NoteInstance) {
        self.drawn.insert(
            note.id,
            Drawn {
                lane: note.lane,
                y: note.y,
                tail: note.tail.as_ref().map(|t| (t.y1, t.y2)),
            },
        );
    }

    /// One character per lane showing the lowest note in it.
    fn lane_strip(&self) -> String {
        Lane::ALL
            .iter()
            .map(|&lane| {
                let lowest = self
                    .drawn
                    .values()
                    .filter(|d| d.lane == lane)
                    .map(|d| d.y)
                    .fold(None, |acc: Option<f64>, y| Some(acc.map_or(y, |a| a.max(y))));
                match lowest {
                    Some(y) if y >= 320.0 => '#',
                    Some(_) => 'o',
                    None => '.',
                }
            })
            .collect()
    }
}

impl<W: Write> Renderer for TextHud<W> {
    fn render(&mut self, state: &GameState) -> io::Result<()> {
        for note in &state.exit {
            self.drawn.remove(&note.id);
        }
        for note in &state.active {
            self.draw(note);
        }

        let line = (state.score, state.multiplier, state.missed);
        if self.last_line != Some(line) {
            writeln!(
                self.out,
                "[{}] {:>8.1}ms  score {:>7.1}  x{:.1}  missed {}",
                self.lane_strip(),
                state.time_ms,
                state.score,
                state.multiplier,
                state.missed
            )?;
            self.last_line = Some(line);
        }
        Ok(())
    }

    fn finish(&mut self, state: &GameState) -> io::Result<()> {
        self.render(state)?;
        writeln!(
            self.out,
            "GAME OVER  score {:.1}  max combo {}  missed {}  accuracy {:.2}%",
            state.score,
            state.stats.max_combo,
            state.missed,
            state.stats.calculate_accuracy()
        )
    }
}
