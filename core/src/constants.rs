//! Key codes and sentinels shared between the decoder, the pipeline and hosts.
//!
//! Software keyboards report either a Unicode code point (positive) or a
//! named functional key code (zero or negative). The named codes below are the
//! ones the dispatch core itself reacts to; any other non-positive value is
//! forwarded untouched to the input-logic engine.

// ========== Named key codes (non-positive) ==========

/// Shift key on an alphabetic layout.
pub const CODE_SHIFT: i32 = -1;
/// Caps lock.
pub const CODE_CAPSLOCK: i32 = -2;
/// Switch between alphabetic and symbol layouts.
pub const CODE_SWITCH_ALPHA_SYMBOL: i32 = -3;
/// Marker key code carried by text-insertion events.
pub const CODE_OUTPUT_TEXT: i32 = -4;
/// Delete (backspace).
pub const CODE_DELETE: i32 = -5;
/// Open settings.
pub const CODE_SETTINGS: i32 = -6;
/// Switch to the shortcut input method (typically voice input).
pub const CODE_SHORTCUT: i32 = -7;
pub const CODE_ACTION_NEXT: i32 = -8;
pub const CODE_ACTION_PREVIOUS: i32 = -9;
/// Cycle to the next subtype.
pub const CODE_LANGUAGE_SWITCH: i32 = -10;
pub const CODE_EMOJI: i32 = -11;
/// Enter pressed while shift is held on a hardware keyboard.
pub const CODE_SHIFT_ENTER: i32 = -12;
/// Shift key on a symbol layout ("more symbols").
pub const CODE_SYMBOL_SHIFT: i32 = -13;
pub const CODE_ALPHA_FROM_EMOJI: i32 = -14;
pub const CODE_CLIPBOARD: i32 = -15;

// ========== Code points with special meaning ==========

pub const CODE_ENTER: u32 = '\n' as u32;
pub const CODE_TAB: u32 = '\t' as u32;
pub const CODE_SPACE: u32 = ' ' as u32;

// ========== Sentinels ==========

/// Host value meaning "this touch has no screen coordinate".
pub const NOT_A_COORDINATE: i32 = -1;

/// Host value for a hardware key event that carries no Unicode character.
pub const NOT_A_UNICODE_CHAR: u32 = 0;

// ========== Host hardware key codes ==========

/// Hardware key codes as reported by the host platform.
pub mod host_keys {
    pub const KEYCODE_SPACE: i32 = 62;
    pub const KEYCODE_ENTER: i32 = 66;
    pub const KEYCODE_DEL: i32 = 67;
    pub const KEYCODE_FORWARD_DEL: i32 = 112;
    pub const KEYCODE_NUMPAD_ENTER: i32 = 160;
}
