//! Normalized input events.
//!
//! Every keystroke, text insertion, gesture completion or strip tap that
//! reaches the input-logic engine is first turned into an [`Event`]. Events
//! are immutable once built; the constructors enforce that a press carries
//! either a code point or a key code, never both.

use crate::constants::{CODE_OUTPUT_TEXT, NOT_A_COORDINATE};

/// Where an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// On-screen keyboard or gesture trail
    Software,
    /// Physical keyboard
    Hardware,
}

/// Screen position of the touch that produced an event, in keyboard
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

impl Coordinates {
    /// Build coordinates from raw host values. The host's "not a coordinate"
    /// sentinel on either axis means the event has no position.
    pub fn from_raw(x: i32, y: i32) -> Option<Self> {
        if x == NOT_A_COORDINATE || y == NOT_A_COORDINATE {
            None
        } else {
            Some(Self { x, y })
        }
    }
}

/// What kind of input an event represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Press of a key that produces a Unicode code point.
    CodePoint {
        code_point: u32,
        /// Dead key (combining accent) awaiting the next character
        dead: bool,
    },
    /// Press of a named functional key (shift, delete, ...).
    KeyCode(i32),
    /// Insertion of a whole string (e.g. a key that outputs ".com").
    Text(String),
    /// Word resolved from a completed gesture trail.
    GestureBatch(String),
    /// Manual tap on a suggestion strip candidate.
    SuggestionPicked(String),
    /// Hardware key the decoder does not understand; the host keeps it.
    NotHandled,
}

/// A single normalized input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: EventKind,
    coordinates: Option<Coordinates>,
    is_key_repeat: bool,
    source: EventSource,
}

impl Event {
    /// Press of a code point key.
    pub fn code_point_press(
        code_point: u32,
        coordinates: Option<Coordinates>,
        is_key_repeat: bool,
        source: EventSource,
    ) -> Self {
        Self {
            kind: EventKind::CodePoint {
                code_point,
                dead: false,
            },
            coordinates,
            is_key_repeat,
            source,
        }
    }

    /// Press of a dead key (combining accent) on a hardware keyboard.
    pub fn dead_key_press(code_point: u32, is_key_repeat: bool) -> Self {
        Self {
            kind: EventKind::CodePoint {
                code_point,
                dead: true,
            },
            coordinates: None,
            is_key_repeat,
            source: EventSource::Hardware,
        }
    }

    /// Press of a named functional key.
    pub fn key_code_press(
        key_code: i32,
        coordinates: Option<Coordinates>,
        is_key_repeat: bool,
        source: EventSource,
    ) -> Self {
        Self {
            kind: EventKind::KeyCode(key_code),
            coordinates,
            is_key_repeat,
            source,
        }
    }

    /// Insertion of a string from the software keyboard.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Text(text.into()),
            coordinates: None,
            is_key_repeat: false,
            source: EventSource::Software,
        }
    }

    /// Word resolved from a gesture trail.
    pub fn gesture_batch(word: impl Into<String>) -> Self {
        Self {
            kind: EventKind::GestureBatch(word.into()),
            coordinates: None,
            is_key_repeat: false,
            source: EventSource::Software,
        }
    }

    /// Manual pick of a suggestion strip candidate.
    pub fn suggestion_picked(word: impl Into<String>) -> Self {
        Self {
            kind: EventKind::SuggestionPicked(word.into()),
            coordinates: None,
            is_key_repeat: false,
            source: EventSource::Software,
        }
    }

    /// Event for a key the decoder left to the host.
    pub fn not_handled(source: EventSource) -> Self {
        Self {
            kind: EventKind::NotHandled,
            coordinates: None,
            is_key_repeat: false,
            source,
        }
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// The code point of a code point press.
    pub fn code_point(&self) -> Option<u32> {
        match self.kind {
            EventKind::CodePoint { code_point, .. } => Some(code_point),
            _ => None,
        }
    }

    /// The key code of a functional key press. Text insertions report
    /// [`CODE_OUTPUT_TEXT`].
    pub fn key_code(&self) -> Option<i32> {
        match self.kind {
            EventKind::KeyCode(code) => Some(code),
            EventKind::Text(_) => Some(CODE_OUTPUT_TEXT),
            _ => None,
        }
    }

    /// Text carried by text, gesture and suggestion events.
    pub fn text_payload(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Text(text)
            | EventKind::GestureBatch(text)
            | EventKind::SuggestionPicked(text) => Some(text),
            _ => None,
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn is_key_repeat(&self) -> bool {
        self.is_key_repeat
    }

    pub fn source(&self) -> EventSource {
        self.source
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.kind, EventKind::CodePoint { dead: true, .. })
    }

    pub fn is_gesture(&self) -> bool {
        matches!(self.kind, EventKind::GestureBatch(_))
    }

    pub fn is_suggestion_strip_press(&self) -> bool {
        matches!(self.kind, EventKind::SuggestionPicked(_))
    }

    pub fn is_handled(&self) -> bool {
        !matches!(self.kind, EventKind::NotHandled)
    }
}

/// One sampled point of a gesture trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPoint {
    pub x: i32,
    pub y: i32,
    pub pointer_id: i32,
    pub time_ms: i64,
}

/// Gesture trail accumulated so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputPointers {
    pub points: Vec<BatchPoint>,
}

impl InputPointers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: BatchPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
