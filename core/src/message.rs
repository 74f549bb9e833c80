//! Transient status messages.
//!
//! Each component owns one `MessageSlot`. Showing a message stamps it with an
//! expiry derived from its tone; `tick` drops it once that instant passes.
//! Time is always passed in by the caller so expiry is deterministic.

use std::time::{Duration, Instant};

/// How long success, info and validation messages stay visible.
pub const SHORT_WINDOW: Duration = Duration::from_secs(3);
/// How long error messages stay visible.
pub const ERROR_WINDOW: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    /// Input rejected locally.
    Warning,
    Error,
}

impl Tone {
    pub fn window(self) -> Duration {
        match self {
            Tone::Error => ERROR_WINDOW,
            Tone::Info | Tone::Success | Tone::Warning => SHORT_WINDOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    pub text: String,
    pub tone: Tone,
    expires_at: Instant,
}

impl TransientMessage {
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct MessageSlot {
    current: Option<TransientMessage>,
}

impl MessageSlot {
    pub fn show(&mut self, tone: Tone, text: impl Into<String>, now: Instant) {
        self.current = Some(TransientMessage {
            text: text.into(),
            tone,
            expires_at: now + tone.window(),
        });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Drop the message if its window has elapsed. Returns whether it was dropped.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(msg) if now >= msg.expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&TransientMessage> {
        self.current.as_ref()
    }

    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|m| m.text.as_str())
    }
}
