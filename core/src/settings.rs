//! Settings snapshot handed to input logic with every event.
//!
//! The host owns persistence; the core only reads an immutable snapshot that
//! is reloaded when a new field starts or the configuration changes.

use serde::{Deserialize, Serialize};

use crate::context::EditorInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
    #[default]
    Undefined,
}

/// Device configuration as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub orientation: Orientation,
    pub has_hardware_keyboard: bool,
}

/// Per-field attributes derived from the editor descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputAttributes {
    pub input_type: u32,
    pub should_show_suggestions: bool,
    pub is_password_field: bool,
    pub application_specified_completions_on: bool,
}

impl InputAttributes {
    pub fn from_editor(editor: Option<&EditorInfo>, application_completions: bool) -> Self {
        match editor {
            Some(editor) => {
                let is_password_field = editor.is_password_field();
                Self {
                    input_type: editor.input_type,
                    should_show_suggestions: !is_password_field,
                    is_password_field,
                    application_specified_completions_on: application_completions,
                }
            }
            None => Self::default(),
        }
    }
}

/// Immutable settings snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsValues {
    pub display_orientation: Orientation,
    pub has_hardware_keyboard: bool,
    pub input_attributes: InputAttributes,
    pub suggestions_enabled: bool,
    pub bigram_prediction_enabled: bool,
    pub gesture_input_enabled: bool,
    pub includes_other_imes_in_language_switch_list: bool,
    pub suggest_punctuation: Vec<String>,
}

impl Default for SettingsValues {
    fn default() -> Self {
        Self {
            display_orientation: Orientation::Undefined,
            has_hardware_keyboard: false,
            input_attributes: InputAttributes::default(),
            suggestions_enabled: true,
            bigram_prediction_enabled: true,
            gesture_input_enabled: true,
            includes_other_imes_in_language_switch_list: false,
            suggest_punctuation: vec![
                ",".to_string(),
                ".".to_string(),
                "?".to_string(),
                "!".to_string(),
            ],
        }
    }
}

impl SettingsValues {
    /// True when the field's input type matches the one this snapshot was
    /// built for.
    pub fn is_same_input_type(&self, editor: &EditorInfo) -> bool {
        self.input_attributes.input_type == editor.input_type
    }

    /// Whether suggestions should be computed at all for the current field.
    pub fn needs_to_lookup_suggestions(&self) -> bool {
        self.suggestions_enabled
            && (self.input_attributes.should_show_suggestions || self.bigram_prediction_enabled)
            && !self.input_attributes.is_password_field
    }

    /// Whether the strip should be visible for the current field.
    pub fn is_suggestion_strip_visible(&self) -> bool {
        if self.input_attributes.application_specified_completions_on {
            return true;
        }
        self.suggestions_enabled && self.input_attributes.should_show_suggestions
    }
}
