//! Recording collaborators for the replay tool.
//!
//! They stand in for a real host, engine and keyboard: every call is written
//! to a shared transcript stamped with the replay clock. The input logic is a
//! toy composer (letters accumulate, anything else commits) so that typing
//! produces realistic shift and suggestion traffic.

use std::cell::RefCell;
use std::rc::Rc;

use libsoftkey_core::constants::{CODE_DELETE, CODE_SHIFT, CODE_SYMBOL_SHIFT};
use libsoftkey_core::{
    CapsState, ClipboardEntry, Collaborators, Configuration, DictionaryFacilitator, EditorInfo,
    Event, EventKind, Host, InputAttributes, InputLogic, InputPointers, InputStyle,
    InputTransaction, KeyboardView, LayoutKind, ScriptId, SettingsValues, ShiftMode,
    ShiftUpdate, Subtype, SuggestedWordInfo, SuggestedWords, SuggestionStrip,
};

#[derive(Debug, Default)]
pub struct Transcript {
    pub now_ms: u64,
    pub lines: Vec<(u64, String)>,
}

pub type SharedTranscript = Rc<RefCell<Transcript>>;

fn record(transcript: &SharedTranscript, line: String) {
    let mut transcript = transcript.borrow_mut();
    let at = transcript.now_ms;
    tracing::debug!(at_ms = at, "{line}");
    transcript.lines.push((at, line));
}

/// Host-side state the replay loop also needs to see.
#[derive(Debug)]
pub struct HostState {
    pub subtypes: Vec<Subtype>,
    pub current: usize,
    pub input_view_shown: bool,
    pub dictionary_ready: bool,
}

impl HostState {
    pub fn current_subtype(&self) -> Option<&Subtype> {
        self.subtypes.get(self.current)
    }
}

pub type SharedHost = Rc<RefCell<HostState>>;

// ========== Host ==========

struct RecordingHost {
    transcript: SharedTranscript,
    state: SharedHost,
}

impl Host for RecordingHost {
    fn load_settings(
        &mut self,
        editor: Option<&EditorInfo>,
        configuration: &Configuration,
    ) -> SettingsValues {
        record(&self.transcript, format!("host.load_settings {:?}", configuration.orientation));
        SettingsValues {
            display_orientation: configuration.orientation,
            has_hardware_keyboard: configuration.has_hardware_keyboard,
            input_attributes: InputAttributes::from_editor(editor, false),
            ..SettingsValues::default()
        }
    }

    fn current_subtype(&self) -> Option<Subtype> {
        self.state.borrow().current_subtype().cloned()
    }

    fn is_enabled_subtype_of_this_ime(&self, subtype: &Subtype) -> bool {
        self.state.borrow().subtypes.contains(subtype)
    }

    fn find_subtype_by_locale(&self, locale: &str) -> Option<Subtype> {
        self.state
            .borrow()
            .subtypes
            .iter()
            .find(|subtype| subtype.locale == locale)
            .cloned()
    }

    fn set_input_method_and_subtype(&mut self, subtype: &Subtype) {
        record(&self.transcript, format!("host.set_subtype {}", subtype.locale));
        let mut state = self.state.borrow_mut();
        if let Some(index) = state.subtypes.iter().position(|s| s == subtype) {
            state.current = index;
        }
    }

    fn switch_to_next_input_method(&mut self, only_current_ime: bool) -> bool {
        let mut state = self.state.borrow_mut();
        if state.subtypes.len() < 2 {
            record(&self.transcript, "host.next_input_method none".to_string());
            return false;
        }
        state.current = (state.current + 1) % state.subtypes.len();
        let locale = state.subtypes[state.current].locale.clone();
        drop(state);
        record(
            &self.transcript,
            format!("host.next_input_method only_current={only_current_ime} -> {locale}"),
        );
        true
    }

    fn switch_to_shortcut_ime(&mut self) {
        record(&self.transcript, "host.shortcut_ime".to_string());
    }

    fn should_offer_switching_to_next_input_method(&self, fallback: bool) -> bool {
        fallback
    }

    fn is_input_view_shown(&self) -> bool {
        self.state.borrow().input_view_shown
    }

    fn request_hide_self(&mut self) {
        record(&self.transcript, "host.hide_self".to_string());
    }

    fn request_restart(&mut self) {
        record(&self.transcript, "host.restart".to_string());
    }

    fn on_ringer_mode_changed(&mut self) {
        record(&self.transcript, "host.ringer_mode_changed".to_string());
    }
}

// ========== Input logic ==========

struct ComposingLogic {
    transcript: SharedTranscript,
    composing: String,
}

impl ComposingLogic {
    fn commit(&mut self, text: &str) {
        let committed = std::mem::take(&mut self.composing);
        record(&self.transcript, format!("logic.commit {committed:?} + {text:?}"));
    }
}

impl InputLogic for ComposingLogic {
    fn start_session(&mut self, editor: Option<&EditorInfo>, _settings: &SettingsValues) {
        self.composing.clear();
        let input_type = editor.map(|e| e.input_type).unwrap_or_default();
        record(&self.transcript, format!("logic.start_session input_type={input_type}"));
    }

    fn finish_session(&mut self) {
        self.composing.clear();
        record(&self.transcript, "logic.finish_session".to_string());
    }

    fn process_event(
        &mut self,
        _settings: &SettingsValues,
        event: &Event,
        _shift_mode: ShiftMode,
        _script_id: ScriptId,
    ) -> InputTransaction {
        let mut tx = InputTransaction::new(event.clone());
        match event.kind() {
            EventKind::CodePoint { code_point, .. } => {
                match char::from_u32(*code_point) {
                    Some(ch) if ch.is_alphanumeric() => self.composing.push(ch),
                    Some(ch) => self.commit(&ch.to_string()),
                    None => return tx,
                }
                tx.set_did_affect_contents();
                tx.set_requires_update_suggestions();
                tx.require_shift_update(ShiftUpdate::Later);
            }
            EventKind::KeyCode(code) if *code == CODE_DELETE => {
                self.composing.pop();
                tx.set_did_affect_contents();
                tx.set_requires_update_suggestions();
                tx.require_shift_update(ShiftUpdate::Later);
            }
            EventKind::KeyCode(code) if *code == CODE_SHIFT || *code == CODE_SYMBOL_SHIFT => {}
            EventKind::KeyCode(code) => {
                record(&self.transcript, format!("logic.key_code {code}"));
            }
            EventKind::Text(text)
            | EventKind::GestureBatch(text)
            | EventKind::SuggestionPicked(text) => {
                let text = text.clone();
                self.commit(&text);
                tx.set_did_affect_contents();
                tx.set_requires_update_suggestions();
                tx.require_shift_update(ShiftUpdate::Now);
            }
            EventKind::NotHandled => {}
        }
        tx
    }

    fn on_start_batch_input(&mut self, _settings: &SettingsValues) {}

    fn on_update_batch_input(&mut self, _pointers: &InputPointers) {}

    fn on_end_batch_input(&mut self, _pointers: &InputPointers) -> Option<SuggestedWords> {
        None
    }

    fn on_cancel_batch_input(&mut self) {}

    fn on_update_selection(
        &mut self,
        _old_sel_start: i32,
        _old_sel_end: i32,
        new_sel_start: i32,
        new_sel_end: i32,
        _settings: &SettingsValues,
    ) -> bool {
        record(
            &self.transcript,
            format!("logic.update_selection {new_sel_start}..{new_sel_end}"),
        );
        self.composing.clear();
        true
    }

    fn reset_caches_upon_cursor_move(&mut self, _sel_start: i32, _sel_end: i32) -> bool {
        true
    }

    fn retry_reset_caches(&mut self) -> bool {
        true
    }

    fn suggested_words(
        &mut self,
        _settings: &SettingsValues,
        input_style: InputStyle,
        sequence_number: u64,
    ) -> Option<SuggestedWords> {
        let words = if self.composing.is_empty() {
            Vec::new()
        } else {
            vec![SuggestedWordInfo::new(self.composing.clone(), 0)]
        };
        Some(SuggestedWords {
            words,
            typed_word: Some(self.composing.clone()),
            input_style,
            sequence_number: Some(sequence_number),
            is_punctuation: false,
        })
    }

    fn restart_suggestions_on_word_touched_by_cursor(
        &mut self,
        _settings: &SettingsValues,
        include_resumed_word: bool,
    ) {
        record(
            &self.transcript,
            format!("logic.restart_suggestions include_resumed_word={include_resumed_word}"),
        );
    }

    fn on_orientation_change(&mut self, _settings: &SettingsValues) {
        record(&self.transcript, "logic.orientation_change".to_string());
    }

    fn on_subtype_changed(&mut self, locale: &str, _settings: &SettingsValues) {
        self.composing.clear();
        record(&self.transcript, format!("logic.subtype_changed {locale}"));
    }

    fn caps_state(&self, _settings: &SettingsValues) -> CapsState {
        CapsState::default()
    }
}

// ========== Keyboard and strip ==========

struct RecordingKeyboard {
    transcript: SharedTranscript,
}

impl KeyboardView for RecordingKeyboard {
    fn layout_kind(&self) -> Option<LayoutKind> {
        Some(LayoutKind::Alphabet)
    }

    fn script_id(&self) -> ScriptId {
        ScriptId::LATIN
    }

    fn shift_mode(&self) -> ShiftMode {
        ShiftMode::Unshifted
    }

    fn request_update_shift_state(&mut self, _caps: CapsState) {
        record(&self.transcript, "keyboard.update_shift_state".to_string());
    }

    fn on_event(&mut self, _event: &Event, _caps: CapsState) {}

    fn save_keyboard_state(&mut self) {
        record(&self.transcript, "keyboard.save_state".to_string());
    }

    fn load_keyboard(
        &mut self,
        editor: Option<&EditorInfo>,
        _settings: &SettingsValues,
        _caps: CapsState,
    ) {
        let input_type = editor.map(|e| e.input_type).unwrap_or_default();
        record(&self.transcript, format!("keyboard.load input_type={input_type}"));
    }

    fn reset_keyboard_state_to_alphabet(&mut self, _caps: CapsState) {
        record(&self.transcript, "keyboard.reset_to_alphabet".to_string());
    }

    fn closing(&mut self) {
        record(&self.transcript, "keyboard.closing".to_string());
    }

    fn deallocate_memory(&mut self) {
        record(&self.transcript, "keyboard.deallocate_memory".to_string());
    }

    fn set_main_dictionary_availability(&mut self, available: bool) {
        record(&self.transcript, format!("keyboard.dictionary_available {available}"));
    }

    fn show_gesture_floating_preview(&mut self, words: &SuggestedWords, dismiss: bool) {
        record(
            &self.transcript,
            format!(
                "keyboard.gesture_preview {:?} dismiss={dismiss}",
                words.first_word().unwrap_or_default()
            ),
        );
    }

    fn update_pinned_clips(&mut self, clips: &[ClipboardEntry]) {
        record(&self.transcript, format!("keyboard.pinned_clips {}", clips.len()));
    }
}

struct RecordingStrip {
    transcript: SharedTranscript,
}

impl SuggestionStrip for RecordingStrip {
    fn set_suggestions(&mut self, words: &SuggestedWords) {
        let list: Vec<&str> = words.words.iter().map(|w| w.word.as_str()).collect();
        record(&self.transcript, format!("strip.set {list:?}"));
    }

    fn set_visible(&mut self, _visible: bool) {}
}

// ========== Dictionary ==========

struct RecordingDictionary {
    transcript: SharedTranscript,
    state: SharedHost,
}

impl DictionaryFacilitator for RecordingDictionary {
    fn on_start_input(&mut self) {}

    fn on_finish_input(&mut self) {
        record(&self.transcript, "dict.finish_input".to_string());
    }

    fn has_initialized_main_dictionary(&self) -> bool {
        self.state.borrow().dictionary_ready
    }

    fn reset_dictionaries_if_necessary(&mut self, locale: &str) {
        record(&self.transcript, format!("dict.reset {locale}"));
    }

    fn close_dictionaries(&mut self) {
        record(&self.transcript, "dict.close".to_string());
    }
}

// ========== Assembly ==========

/// Build the collaborators plus the input view, all sharing one transcript.
pub fn build(
    transcript: &SharedTranscript,
    host_state: &SharedHost,
) -> (Collaborators, Box<dyn KeyboardView>, Box<dyn SuggestionStrip>) {
    let collaborators = Collaborators {
        host: Box::new(RecordingHost {
            transcript: Rc::clone(transcript),
            state: Rc::clone(host_state),
        }),
        input_logic: Box::new(ComposingLogic {
            transcript: Rc::clone(transcript),
            composing: String::new(),
        }),
        dictionary: Box::new(RecordingDictionary {
            transcript: Rc::clone(transcript),
            state: Rc::clone(host_state),
        }),
        keyboard: None,
        suggestion_strip: None,
    };
    let keyboard = Box::new(RecordingKeyboard {
        transcript: Rc::clone(transcript),
    });
    let strip = Box::new(RecordingStrip {
        transcript: Rc::clone(transcript),
    });
    (collaborators, keyboard, strip)
}
