//! Keyboard macro recording
//!
//! The buffer holds raw events rather than tokens, so playback goes back
//! through the whole dispatcher (prefix arguments and sequences included).

use super::types::KeyEvent;

#[derive(Debug, Clone, Default)]
pub struct MacroRecorder {
    events: Vec<KeyEvent>,
    recording: bool,
}

impl MacroRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Append `event` while recording; ignored otherwise
    pub fn record(&mut self, event: KeyEvent) {
        if self.recording {
            self.events.push(event);
        }
    }

    /// Remove the most recently recorded event (the key that ended recording)
    pub fn drop_last(&mut self) -> Option<KeyEvent> {
        self.events.pop()
    }

    /// Clear the buffer and begin recording
    pub fn start(&mut self) {
        self.events.clear();
        self.recording = true;
    }

    /// Stop recording, keeping the buffer for playback
    pub fn finish(&mut self) {
        self.recording = false;
    }

    /// The recorded macro
    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
