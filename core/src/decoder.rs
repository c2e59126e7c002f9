//! Event decoding.
//!
//! Turns raw software key codes, text insertions and hardware key events into
//! normalized [`Event`]s. Software decoding is a set of pure functions;
//! hardware decoding goes through a per-device [`HardwareEventDecoder`] so a
//! device with its own quirks can carry state (see
//! [`crate::decoder_cache::DeviceDecoderTable`]).

use crate::constants::host_keys::{KEYCODE_DEL, KEYCODE_ENTER, KEYCODE_NUMPAD_ENTER};
use crate::constants::{
    CODE_DELETE, CODE_ENTER, CODE_SHIFT, CODE_SHIFT_ENTER, CODE_SPACE, CODE_SYMBOL_SHIFT,
    NOT_A_UNICODE_CHAR,
};
use crate::event::{Coordinates, Event, EventSource};

/// Identifier the host assigns to an input device.
pub type DeviceId = i32;

/// Kind of layout currently shown by the keyboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    Alphabet,
    Symbols,
    SymbolsShifted,
    Phone,
    Number,
    Emoji,
    Clipboard,
}

impl LayoutKind {
    pub fn is_alphabet(self) -> bool {
        self == LayoutKind::Alphabet
    }
}

// ========== Software path ==========

/// Remap a key code for the layout it was pressed on.
///
/// The shift key on anything but an alphabetic layout means "more symbols".
/// When the keyboard has no layout loaded the press is treated as coming from
/// a symbol layout.
pub fn code_for_layout(code: i32, layout: Option<LayoutKind>) -> i32 {
    if code != CODE_SHIFT {
        return code;
    }
    match layout {
        Some(kind) if kind.is_alphabet() => CODE_SHIFT,
        _ => CODE_SYMBOL_SHIFT,
    }
}

/// Build the event for a software key press. Positive codes are Unicode code
/// points; zero and negative codes are named key codes.
pub fn software_event(code: i32, x: i32, y: i32, is_key_repeat: bool) -> Event {
    let coordinates = Coordinates::from_raw(x, y);
    if code <= 0 {
        Event::key_code_press(code, coordinates, is_key_repeat, EventSource::Software)
    } else {
        Event::code_point_press(code as u32, coordinates, is_key_repeat, EventSource::Software)
    }
}

/// Full software decode: layout remapping followed by event construction.
pub fn decode_code_input(
    code: i32,
    x: i32,
    y: i32,
    is_key_repeat: bool,
    layout: Option<LayoutKind>,
) -> Event {
    software_event(code_for_layout(code, layout), x, y, is_key_repeat)
}

/// Build the event for a text insertion.
pub fn text_event(text: &str) -> Event {
    Event::text(text)
}

// ========== Hardware path ==========

/// A key event as delivered by the host for a physical keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub device_id: DeviceId,
    /// Host key code (see [`crate::constants::host_keys`])
    pub key_code: i32,
    /// Unicode character produced by the key, or [`NOT_A_UNICODE_CHAR`]
    pub unicode_char: u32,
    pub repeat_count: u32,
    pub shift: bool,
    /// The host marks this character as a combining accent
    pub dead_key: bool,
}

impl RawKeyEvent {
    /// Plain key press with no modifier and no repeat.
    pub fn press(device_id: DeviceId, key_code: i32, unicode_char: u32) -> Self {
        Self {
            device_id,
            key_code,
            unicode_char,
            repeat_count: 0,
            shift: false,
            dead_key: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn is_repeat(&self) -> bool {
        self.repeat_count > 0
    }
}

/// Decoder for one physical input device.
pub trait HardwareEventDecoder: std::fmt::Debug {
    fn device_id(&self) -> DeviceId;

    /// Decode a key-down event. Keys the decoder does not understand come
    /// back as a not-handled event so the host can process them.
    fn decode_hardware_key(&mut self, raw: &RawKeyEvent) -> Event;
}

/// Default decoder for ordinary hardware keyboards.
#[derive(Debug, Clone)]
pub struct HardwareKeyboardEventDecoder {
    device_id: DeviceId,
}

impl HardwareKeyboardEventDecoder {
    pub fn new(device_id: DeviceId) -> Self {
        Self { device_id }
    }
}

impl HardwareEventDecoder for HardwareKeyboardEventDecoder {
    fn device_id(&self) -> DeviceId {
        self.device_id
    }

    fn decode_hardware_key(&mut self, raw: &RawKeyEvent) -> Event {
        let repeat = raw.is_repeat();

        if raw.key_code == KEYCODE_DEL {
            return Event::key_code_press(CODE_DELETE, None, repeat, EventSource::Hardware);
        }

        if raw.key_code == KEYCODE_ENTER || raw.key_code == KEYCODE_NUMPAD_ENTER {
            return if raw.shift {
                Event::key_code_press(CODE_SHIFT_ENTER, None, repeat, EventSource::Hardware)
            } else {
                Event::code_point_press(CODE_ENTER, None, repeat, EventSource::Hardware)
            };
        }

        if is_printable(raw.unicode_char) {
            return if raw.dead_key {
                Event::dead_key_press(raw.unicode_char, repeat)
            } else {
                Event::code_point_press(raw.unicode_char, None, repeat, EventSource::Hardware)
            };
        }

        Event::not_handled(EventSource::Hardware)
    }
}

fn is_printable(code_point: u32) -> bool {
    if code_point == NOT_A_UNICODE_CHAR {
        return false;
    }
    if code_point == CODE_SPACE {
        return true;
    }
    match char::from_u32(code_point) {
        Some(ch) => !ch.is_control() && !ch.is_whitespace(),
        None => false,
    }
}
