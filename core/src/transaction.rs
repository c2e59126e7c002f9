//! Input transactions and the keyboard state they are computed against.

use crate::event::Event;

/// When the keyboard's shift state must be re-evaluated after an event.
///
/// Ordered so that combining two requirements keeps the more urgent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ShiftUpdate {
    #[default]
    None,
    /// Post a coalesced refresh
    Later,
    /// Refresh synchronously before the event returns
    Now,
}

/// Style tag attached to a suggestion refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputStyle {
    #[default]
    None,
    Typing,
    UpdateBatch,
    TailBatch,
    ApplicationSpecified,
}

/// Result of feeding one event to the input-logic engine.
///
/// Produced once per event and consumed by value when its follow-up work is
/// dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTransaction {
    event: Event,
    required_shift_update: ShiftUpdate,
    requires_update_suggestions: bool,
    did_affect_contents: bool,
}

impl InputTransaction {
    pub fn new(event: Event) -> Self {
        Self {
            event,
            required_shift_update: ShiftUpdate::None,
            requires_update_suggestions: false,
            did_affect_contents: false,
        }
    }

    /// Raise the shift update requirement; a lower request never downgrades it.
    pub fn require_shift_update(&mut self, update: ShiftUpdate) {
        self.required_shift_update = self.required_shift_update.max(update);
    }

    pub fn set_requires_update_suggestions(&mut self) {
        self.requires_update_suggestions = true;
    }

    pub fn set_did_affect_contents(&mut self) {
        self.did_affect_contents = true;
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn required_shift_update(&self) -> ShiftUpdate {
        self.required_shift_update
    }

    pub fn requires_update_suggestions(&self) -> bool {
        self.requires_update_suggestions
    }

    pub fn did_affect_contents(&self) -> bool {
        self.did_affect_contents
    }

    /// Style of the suggestion refresh this transaction asks for.
    pub fn input_style(&self) -> InputStyle {
        if self.event.is_suggestion_strip_press() {
            InputStyle::None
        } else if self.event.is_gesture() {
            InputStyle::TailBatch
        } else {
            InputStyle::Typing
        }
    }

    pub fn into_event(self) -> Event {
        self.event
    }
}

/// Shift state reported by the keyboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShiftMode {
    #[default]
    Unshifted,
    ManualShifted,
    AutoShifted,
    ManualShiftLocked,
    AutoShiftLocked,
}

impl ShiftMode {
    pub fn is_shifted(self) -> bool {
        self != ShiftMode::Unshifted
    }
}

/// Unicode script of the active layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptId(pub i32);

impl ScriptId {
    pub const UNKNOWN: ScriptId = ScriptId(-1);
    pub const CYRILLIC: ScriptId = ScriptId(3);
    pub const GREEK: ScriptId = ScriptId(6);
    pub const LATIN: ScriptId = ScriptId(11);
}

impl Default for ScriptId {
    fn default() -> Self {
        ScriptId::UNKNOWN
    }
}

/// Capitalization hints computed by input logic for a shift refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapsState {
    pub auto_caps_flags: u32,
    pub recapitalize_mode: i32,
}
