//! Confirmation step in front of the water action.
//!
//! `Closed -> Open -> (Confirmed | Cancelled) -> Closed`. Every open episode
//! ends in exactly one of the two outcomes.

use crate::sanitize::NOTE_MAX_CHARS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateSignal {
    Open,
    /// A key press; `in_text_input` is set when it came from the note field.
    Key { key: Key, in_text_input: bool },
    ClickOutside,
    ClickConfirm,
    ClickCancel,
    EditNote(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Closed,
    Open { note: String, focus: Focus },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Ignored,
    Opened,
    NoteEdited,
    Confirmed { note: String },
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ConfirmGate {
    state: GateState,
}

impl Default for ConfirmGate {
    fn default() -> Self {
        Self {
            state: GateState::Closed,
        }
    }
}

impl ConfirmGate {
    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, GateState::Open { .. })
    }

    pub fn focus(&self) -> Option<Focus> {
        match &self.state {
            GateState::Open { focus, .. } => Some(*focus),
            GateState::Closed => None,
        }
    }

    pub fn note(&self) -> Option<&str> {
        match &self.state {
            GateState::Open { note, .. } => Some(note),
            GateState::Closed => None,
        }
    }

    pub fn handle(&mut self, signal: GateSignal) -> GateOutcome {
        if !self.is_open() {
            if signal != GateSignal::Open {
                return GateOutcome::Ignored;
            }
            self.state = GateState::Open {
                note: String::new(),
                focus: Focus::Cancel,
            };
            return GateOutcome::Opened;
        }
        match signal {
            GateSignal::EditNote(text) => {
                if let GateState::Open { note, .. } = &mut self.state {
                    *note = text.chars().take(NOTE_MAX_CHARS).collect();
                }
                GateOutcome::NoteEdited
            }
            GateSignal::Key {
                in_text_input: true,
                ..
            }
            | GateSignal::Key { key: Key::Other, .. }
            | GateSignal::Open => GateOutcome::Ignored,
            GateSignal::Key { key: Key::Enter, .. } | GateSignal::ClickConfirm => {
                match std::mem::replace(&mut self.state, GateState::Closed) {
                    GateState::Open { note, .. } => GateOutcome::Confirmed { note },
                    GateState::Closed => GateOutcome::Ignored,
                }
            }
            GateSignal::Key {
                key: Key::Escape, ..
            }
            | GateSignal::ClickOutside
            | GateSignal::ClickCancel => {
                self.state = GateState::Closed;
                GateOutcome::Cancelled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_gate() -> ConfirmGate {
        let mut gate = ConfirmGate::default();
        assert_eq!(gate.handle(GateSignal::Open), GateOutcome::Opened);
        gate
    }

    #[test]
    fn opening_focuses_cancel() {
        let gate = open_gate();
        assert_eq!(gate.focus(), Some(Focus::Cancel));
        assert_eq!(gate.note(), Some(""));
    }

    #[test]
    fn enter_confirms_with_note_and_closes() {
        let mut gate = open_gate();
        gate.handle(GateSignal::EditNote("looks dry".into()));
        let outcome = gate.handle(GateSignal::Key {
            key: Key::Enter,
            in_text_input: false,
        });
        assert_eq!(
            outcome,
            GateOutcome::Confirmed {
                note: "looks dry".into()
            }
        );
        assert_eq!(gate.state(), &GateState::Closed);
        gate.handle(GateSignal::Open);
        assert_eq!(gate.note(), Some(""));
    }

    #[test]
    fn keys_from_the_note_field_are_ignored() {
        let mut gate = open_gate();
        for key in [Key::Enter, Key::Escape] {
            assert_eq!(
                gate.handle(GateSignal::Key {
                    key,
                    in_text_input: true
                }),
                GateOutcome::Ignored
            );
        }
        assert!(gate.is_open());
    }

    #[test]
    fn escape_and_outside_click_cancel() {
        let mut gate = open_gate();
        gate.handle(GateSignal::EditNote("discard me".into()));
        assert_eq!(
            gate.handle(GateSignal::Key {
                key: Key::Escape,
                in_text_input: false
            }),
            GateOutcome::Cancelled
        );
        assert!(!gate.is_open());

        let mut gate = open_gate();
        assert_eq!(gate.handle(GateSignal::ClickOutside), GateOutcome::Cancelled);
        assert_eq!(gate.handle(GateSignal::ClickConfirm), GateOutcome::Ignored);
    }

    #[test]
    fn buttons_drive_the_outcome() {
        let mut gate = open_gate();
        assert_eq!(gate.handle(GateSignal::ClickCancel), GateOutcome::Cancelled);
        let mut gate = open_gate();
        assert_eq!(
            gate.handle(GateSignal::ClickConfirm),
            GateOutcome::Confirmed { note: String::new() }
        );
    }

    #[test]
    fn note_is_bounded() {
        let mut gate = open_gate();
        gate.handle(GateSignal::EditNote("x".repeat(NOTE_MAX_CHARS * 2)));
        assert_eq!(gate.note().map(str::len), Some(NOTE_MAX_CHARS));
    }
}
