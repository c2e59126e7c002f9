//! Interfaces to the components the dispatch core drives but does not own.
//!
//! The host platform, the input-logic engine, the keyboard view, the
//! suggestion strip and the dictionary facilitator are all external. The
//! service talks to them only through these traits, so tests and the replay
//! tool can substitute recording implementations.

use crate::context::EditorInfo;
use crate::decoder::LayoutKind;
use crate::event::{Event, InputPointers};
use crate::settings::{Configuration, SettingsValues};
use crate::subtype::Subtype;
use crate::suggestions::SuggestedWords;
use crate::task::ClipboardEntry;
use crate::transaction::{CapsState, InputStyle, InputTransaction, ScriptId, ShiftMode};

/// The host platform's input-method manager and window.
pub trait Host {
    /// Build a settings snapshot for the given field.
    fn load_settings(
        &mut self,
        editor: Option<&EditorInfo>,
        configuration: &Configuration,
    ) -> SettingsValues;

    fn current_subtype(&self) -> Option<Subtype>;
    fn is_enabled_subtype_of_this_ime(&self, subtype: &Subtype) -> bool;
    fn find_subtype_by_locale(&self, locale: &str) -> Option<Subtype>;
    fn set_input_method_and_subtype(&mut self, subtype: &Subtype);
    /// Cycle to the next input method or subtype. Returns false when there
    /// was nothing to switch to.
    fn switch_to_next_input_method(&mut self, only_current_ime: bool) -> bool;
    fn switch_to_shortcut_ime(&mut self);
    fn should_offer_switching_to_next_input_method(&self, fallback: bool) -> bool;

    fn is_input_view_shown(&self) -> bool;
    fn request_hide_self(&mut self);
    /// Ask the host to restart the input method process.
    fn request_restart(&mut self);
    fn on_ringer_mode_changed(&mut self);
}

/// The input-logic engine that turns events into edits of the document.
pub trait InputLogic {
    fn start_session(&mut self, editor: Option<&EditorInfo>, settings: &SettingsValues);
    fn finish_session(&mut self);

    fn process_event(
        &mut self,
        settings: &SettingsValues,
        event: &Event,
        shift_mode: ShiftMode,
        script_id: ScriptId,
    ) -> InputTransaction;

    /// Insert a whole string. Engines without a dedicated text path treat it
    /// as any other event.
    fn on_text_input(
        &mut self,
        settings: &SettingsValues,
        event: &Event,
        shift_mode: ShiftMode,
    ) -> InputTransaction {
        self.process_event(settings, event, shift_mode, ScriptId::UNKNOWN)
    }

    fn on_start_batch_input(&mut self, settings: &SettingsValues);
    fn on_update_batch_input(&mut self, pointers: &InputPointers);
    /// Returns the words resolved from the completed trail.
    fn on_end_batch_input(&mut self, pointers: &InputPointers) -> Option<SuggestedWords>;
    fn on_cancel_batch_input(&mut self);

    /// Returns true when the selection change requires a shift refresh.
    fn on_update_selection(
        &mut self,
        old_sel_start: i32,
        old_sel_end: i32,
        new_sel_start: i32,
        new_sel_end: i32,
        settings: &SettingsValues,
    ) -> bool;

    /// Resync caches with the cursor. Returns false when the text view was
    /// not ready.
    fn reset_caches_upon_cursor_move(&mut self, sel_start: i32, sel_end: i32) -> bool;
    /// Retry a failed cursor resync.
    fn retry_reset_caches(&mut self) -> bool;

    /// Compute suggestions synchronously, or return `None` when they will be
    /// delivered later through the scheduler handle.
    fn suggested_words(
        &mut self,
        settings: &SettingsValues,
        input_style: InputStyle,
        sequence_number: u64,
    ) -> Option<SuggestedWords>;

    fn restart_suggestions_on_word_touched_by_cursor(
        &mut self,
        settings: &SettingsValues,
        include_resumed_word: bool,
    );

    fn on_orientation_change(&mut self, settings: &SettingsValues);
    fn on_subtype_changed(&mut self, locale: &str, settings: &SettingsValues);
    fn caps_state(&self, settings: &SettingsValues) -> CapsState;
}

/// The on-screen keyboard.
pub trait KeyboardView {
    /// Kind of the layout currently shown, if one is loaded.
    fn layout_kind(&self) -> Option<LayoutKind>;
    fn script_id(&self) -> ScriptId;
    fn shift_mode(&self) -> ShiftMode;

    fn request_update_shift_state(&mut self, caps: CapsState);
    /// Let the keyboard's own state machine follow a processed event.
    fn on_event(&mut self, event: &Event, caps: CapsState);

    fn save_keyboard_state(&mut self);
    fn load_keyboard(&mut self, editor: Option<&EditorInfo>, settings: &SettingsValues, caps: CapsState);
    fn reset_keyboard_state_to_alphabet(&mut self, caps: CapsState);
    fn closing(&mut self);
    fn deallocate_memory(&mut self);

    fn set_main_dictionary_availability(&mut self, available: bool);
    fn show_gesture_floating_preview(&mut self, words: &SuggestedWords, dismiss: bool);

    fn update_pinned_clips(&mut self, _clips: &[ClipboardEntry]) {}
}

/// The candidate strip above the keyboard.
pub trait SuggestionStrip {
    fn set_suggestions(&mut self, words: &SuggestedWords);
    fn set_visible(&mut self, visible: bool);
}

/// Dictionary loading and per-session dictionary state.
pub trait DictionaryFacilitator {
    fn on_start_input(&mut self);
    fn on_finish_input(&mut self);
    fn has_initialized_main_dictionary(&self) -> bool;
    /// Reload dictionaries if `locale` differs from the loaded one.
    fn reset_dictionaries_if_necessary(&mut self, locale: &str);
    fn close_dictionaries(&mut self);
}

/// Everything the service needs from outside, bundled for construction.
pub struct Collaborators {
    pub host: Box<dyn Host>,
    pub input_logic: Box<dyn InputLogic>,
    pub dictionary: Box<dyn DictionaryFacilitator>,
    /// Absent until the host creates the input view
    pub keyboard: Option<Box<dyn KeyboardView>>,
    pub suggestion_strip: Option<Box<dyn SuggestionStrip>>,
}
