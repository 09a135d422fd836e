//! Player input sampling.
//!
//! The core polls one [`InputFrame`] per actor per tick from an
//! [`InputSource`]. Axes are raw values in `[-1, 1]`; buttons distinguish
//! "held" from "pressed this tick" so the dash trigger fires on the edge only.

use std::collections::VecDeque;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Discrete input buttons.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Buttons: u8 {
        /// Dash toward the locked target.
        const DASH = 0b0000_0001;
    }
}

/// Input sampled for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Horizontal axis: negative is left, positive is right.
    pub horizontal: f32,
    /// Vertical axis: negative is back, positive is forward.
    pub vertical: f32,
    /// Buttons held during this tick.
    pub held: Buttons,
    /// Buttons that went down during this tick.
    pub pressed: Buttons,
}

impl InputFrame {
    /// A frame with only axis input.
    #[must_use]
    pub const fn axes(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
            held: Buttons::empty(),
            pressed: Buttons::empty(),
        }
    }

    /// A frame where `buttons` went down this tick (and are therefore held).
    #[must_use]
    pub fn press(buttons: Buttons) -> Self {
        Self {
            held: buttons,
            pressed: buttons,
            ..Self::default()
        }
    }

    /// Returns a copy with `buttons` marked as pressed this tick.
    #[must_use]
    pub fn with_pressed(mut self, buttons: Buttons) -> Self {
        self.held |= buttons;
        self.pressed |= buttons;
        self
    }

    /// Returns `true` if any of `buttons` went down this tick.
    #[must_use]
    pub fn was_pressed(&self, buttons: Buttons) -> bool {
        self.pressed.intersects(buttons)
    }
}

/// Per-tick polling interface for one actor's input.
pub trait InputSource: Send {
    /// Samples input for the current tick.
    fn poll(&mut self) -> InputFrame;
}

/// Input source that never moves or presses anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleInput;

impl InputSource for IdleInput {
    fn poll(&mut self) -> InputFrame {
        InputFrame::default()
    }
}

/// Input source that replays a queue of frames, then a fallback frame.
///
/// Used for scripted scenarios and tests. Once the queue is exhausted the
/// `hold` frame is returned on every poll with its `pressed` set cleared, so
/// a scripted press never repeats.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
    hold: InputFrame,
}

impl ScriptedInput {
    /// Creates a script from a sequence of frames.
    #[must_use]
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            hold: InputFrame::default(),
        }
    }

    /// Sets the frame returned after the script runs out.
    #[must_use]
    pub fn then_hold(mut self, frame: InputFrame) -> Self {
        self.hold = InputFrame {
            pressed: Buttons::empty(),
            ..frame
        };
        self
    }

    /// Appends a frame to the end of the script.
    pub fn push(&mut self, frame: InputFrame) {
        self.frames.push_back(frame);
    }

    /// Number of scripted frames still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputFrame {
        self.frames.pop_front().unwrap_or(self.hold)
    }
}
