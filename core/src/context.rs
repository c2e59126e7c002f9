//! Editor descriptor for the text field currently receiving input.
//!
//! `EditorInfo` is a plain data carrier the host fills in when a text field
//! gains focus. The dispatch core only reads it: to detect whether a
//! start-input-view call repeats the field that is already applied, to pick a
//! subtype from the field's hint locale, and to hand it to the keyboard view
//! and input logic.

use serde::{Deserialize, Serialize};

/// Input type class and variation bits, as reported by the host.
pub mod input_type {
    pub const TYPE_MASK_CLASS: u32 = 0x0000_000f;
    pub const TYPE_MASK_VARIATION: u32 = 0x0000_0ff0;

    pub const TYPE_CLASS_TEXT: u32 = 0x0000_0001;
    pub const TYPE_CLASS_NUMBER: u32 = 0x0000_0002;
    pub const TYPE_CLASS_PHONE: u32 = 0x0000_0003;
    pub const TYPE_CLASS_DATETIME: u32 = 0x0000_0004;

    pub const TYPE_TEXT_VARIATION_URI: u32 = 0x0000_0010;
    pub const TYPE_TEXT_VARIATION_EMAIL_ADDRESS: u32 = 0x0000_0020;
    pub const TYPE_TEXT_VARIATION_PASSWORD: u32 = 0x0000_0080;
    pub const TYPE_TEXT_VARIATION_VISIBLE_PASSWORD: u32 = 0x0000_0090;
    pub const TYPE_TEXT_VARIATION_WEB_EMAIL_ADDRESS: u32 = 0x0000_00d0;
    pub const TYPE_TEXT_VARIATION_WEB_PASSWORD: u32 = 0x0000_00e0;
    pub const TYPE_NUMBER_VARIATION_PASSWORD: u32 = 0x0000_0010;
}

/// Input purpose derived from the editor's input type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPurpose {
    /// Free-form text input
    #[default]
    FreeForm,
    /// Email address
    Email,
    /// URL
    Url,
    /// Password (suggestions must stay off)
    Password,
    /// Number input
    Number,
    /// Phone number
    Phone,
    /// Date or time
    DateTime,
}

/// Metadata describing the focused text field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorInfo {
    /// Input type class and variation flags
    pub input_type: u32,
    /// IME action and flag bits
    pub ime_options: u32,
    /// Application-private IME options string
    pub private_ime_options: Option<String>,
    /// Host-assigned identifier of the field
    pub field_id: i32,
    /// Selection start when the field gained focus
    pub initial_sel_start: i32,
    /// Selection end when the field gained focus
    pub initial_sel_end: i32,
    /// Locale hints in priority order (BCP-47 tags)
    pub hint_locales: Vec<String>,
}

impl EditorInfo {
    /// Create a descriptor for a field with the given input type.
    pub fn with_input_type(input_type: u32) -> Self {
        Self {
            input_type,
            ..Self::default()
        }
    }

    /// The first locale hint, if the field provides any.
    pub fn primary_hint_locale(&self) -> Option<&str> {
        self.hint_locales.first().map(String::as_str)
    }

    /// Classify the field from its input type.
    pub fn purpose(&self) -> InputPurpose {
        use input_type::*;

        let class = self.input_type & TYPE_MASK_CLASS;
        let variation = self.input_type & TYPE_MASK_VARIATION;
        match class {
            TYPE_CLASS_NUMBER if variation == TYPE_NUMBER_VARIATION_PASSWORD => {
                InputPurpose::Password
            }
            TYPE_CLASS_NUMBER => InputPurpose::Number,
            TYPE_CLASS_PHONE => InputPurpose::Phone,
            TYPE_CLASS_DATETIME => InputPurpose::DateTime,
            TYPE_CLASS_TEXT => match variation {
                TYPE_TEXT_VARIATION_PASSWORD
                | TYPE_TEXT_VARIATION_VISIBLE_PASSWORD
                | TYPE_TEXT_VARIATION_WEB_PASSWORD => InputPurpose::Password,
                TYPE_TEXT_VARIATION_EMAIL_ADDRESS | TYPE_TEXT_VARIATION_WEB_EMAIL_ADDRESS => {
                    InputPurpose::Email
                }
                TYPE_TEXT_VARIATION_URI => InputPurpose::Url,
                _ => InputPurpose::FreeForm,
            },
            _ => InputPurpose::FreeForm,
        }
    }

    /// Check whether the field is any kind of password field.
    pub fn is_password_field(&self) -> bool {
        self.purpose() == InputPurpose::Password
    }

    /// Two descriptors are equivalent for keyboard purposes when they would
    /// produce the same keyboard: same input type, IME options and private
    /// options. Two missing descriptors are equivalent; one missing is not.
    pub fn equivalent_for_keyboard(a: Option<&EditorInfo>, b: Option<&EditorInfo>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                a.input_type == b.input_type
                    && a.ime_options == b.ime_options
                    && a.private_ime_options == b.private_ime_options
            }
            _ => false,
        }
    }
}
