//! Platform abstraction layer
//!
//! Handles the backend-facing side of the game:
//! - Input events, polled once per frame
//! - Key bindings for the game's characters
//! - Frame pacing

pub mod input;

pub use input::GameControls;

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keys the game and editor react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    A,
    D,
    W,
    S,
    G,
    I,
    J,
    K,
    L,
    M,
    O,
    T,
    X,
    Space,
    Left,
    Right,
    Up,
    Down,
    LeftShift,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    WheelUp,
    WheelDown,
}

/// One input event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Quit,
    KeyDown(Key),
    KeyUp(Key),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    /// Pointer moved to a window position (pixels)
    MouseMotion(Vec2),
}

/// Source of input events
pub trait EventSource {
    /// Events that arrived since the last poll, oldest first
    fn poll(&mut self) -> Vec<Event>;
}

/// Failure to read an input script
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read input script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("input script {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Replays a fixed list of events, one frame's worth per poll
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    frames: VecDeque<Vec<Event>>,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a script: a JSON array of frames, each an array of events, e.g.
    /// `[[{"KeyDown": "D"}], [], [{"MouseMotion": [64.0, 32.0]}]]`
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let frames: Vec<Vec<Event>> = serde_json::from_str(&text).map_err(|source| ScriptError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded {} scripted frames from {}", frames.len(), path.display());
        Ok(Self {
            frames: frames.into(),
        })
    }

    /// Queue the events for the next unscripted frame
    pub fn push_frame(&mut self, events: Vec<Event>) -> &mut Self {
        self.frames.push_back(events);
        self
    }

    /// Queue `count` frames without input
    pub fn idle(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            self.frames.push_back(Vec::new());
        }
        self
    }

    /// Frames still queued
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl EventSource for ScriptedEvents {
    /// Once the script runs out every poll reports `Quit`
    fn poll(&mut self) -> Vec<Event> {
        self.frames.pop_front().unwrap_or_else(|| vec![Event::Quit])
    }
}

/// Sleeps so frames start at a fixed rate
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    frame: Duration,
    next: Instant,
}

impl FrameThrottle {
    pub fn new(rate: u32) -> Self {
        Self {
            frame: Duration::from_secs(1) / rate.max(1),
            next: Instant::now(),
        }
    }

    /// Target frame length
    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Block until the next frame is due. A frame that ran late does not make
    /// the following ones run fast.
    pub fn wait(&mut self) {
        self.next += self.frame;
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
        } else {
            self.next = now;
        }
    }
}
