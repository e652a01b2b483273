//! Shared channel infrastructure between system threads.
//!
//! The `SystemBus` is the hub for inter-thread communication:
//! - raw key events from the platform (or stdin) to the input thread
//! - resolved actions from the input thread to the logic thread
//! - snapshots from the logic thread to the renderer
//! - audio cues from the logic thread to the audio thread
//! - system events (quit)

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

use crate::input::events::{InputCommand, RawInputEvent, TimedAction};
use crate::state::game::{AudioCue, GameState};

/// System-level events delivered to the logic thread.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Input source is exhausted; finish the session once the engine stops.
    InputClosed,
    Quit,
}

/// Snapshot handed to the renderer after every transition.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub state: GameState,
    /// Number of the engine instance (restarts increment it).
    pub run: u32,
}

#[derive(Clone)]
pub struct SystemBus {
    /// Source → Input: raw keyboard events.
    pub raw_input_tx: Sender<RawInputEvent>,
    pub raw_input_rx: Receiver<RawInputEvent>,

    /// Commands sent to the input thread.
    pub input_cmd_tx: Sender<InputCommand>,
    pub input_cmd_rx: Receiver<InputCommand>,

    /// Input → Logic: resolved gameplay actions.
    pub action_tx: Sender<TimedAction>,
    pub action_rx: Receiver<TimedAction>,

    /// Logic → Render: game state snapshots.
    pub render_tx: Sender<RenderState>,
    pub render_rx: Receiver<RenderState>,

    /// Main → Logic: system events.
    pub sys_tx: Sender<SystemEvent>,
    pub sys_rx: Receiver<SystemEvent>,

    /// Logic → Audio: cues to play.
    pub audio_tx: Sender<AudioCue>,
    pub audio_rx: Receiver<AudioCue>,
}

impl SystemBus {
    pub fn new() -> Self {
        let (raw_input_tx, raw_input_rx) = unbounded();
        let (input_cmd_tx, input_cmd_rx) = unbounded();
        let (action_tx, action_rx) = unbounded();

        // Bounded render channel: max 2 snapshots queued to limit latency
        let (render_tx, render_rx) = bounded(2);

        let (sys_tx, sys_rx) = unbounded();
        let (audio_tx, audio_rx) = unbounded();

        Self {
            raw_input_tx,
            raw_input_rx,
            input_cmd_tx,
            input_cmd_rx,
            action_tx,
            action_rx,
            render_tx,
            render_rx,
            sys_tx,
            sys_rx,
            audio_tx,
            audio_rx,
        }
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}
