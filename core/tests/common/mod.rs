// core/tests/common/mod.rs
//! Recording collaborators shared by the integration tests.
//!
//! Every mock appends a short line to one shared call log, so a test can
//! assert on the exact order in which the service talked to its
//! collaborators. Behaviour the tests need to steer (cursor readiness,
//! dictionary readiness, what a transaction asks for) lives in `MockState`.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use libsoftkey_core::{
    CapsState, ClipboardEntry, Collaborators, Config, Configuration, DictionaryFacilitator,
    EditorInfo, Event, Host, InputAttributes, InputLogic, InputMethodService, InputPointers,
    InputStyle, InputTransaction, KeyboardView, LayoutKind, ManualClock, Orientation, ScriptId,
    SettingsValues, ShiftMode, ShiftUpdate, Subtype, SuggestedWords, SuggestionStrip,
};

pub type Log = Rc<RefCell<Vec<String>>>;
pub type Shared = Rc<RefCell<MockState>>;

pub struct MockState {
    pub input_view_shown: bool,
    pub current_subtype: Option<Subtype>,
    pub enabled_subtypes: Vec<Subtype>,
    /// `None` means the host answers with the fallback it was given
    pub offer_next_input_method: Option<bool>,

    pub layout: Option<LayoutKind>,
    pub cursor_ready: bool,
    pub dictionary_ready: bool,
    pub bigram_prediction_enabled: bool,
    pub application_completions: bool,

    pub tx_shift: ShiftUpdate,
    pub tx_suggestions: bool,
    pub tx_contents: bool,
    pub sync_suggestions: Option<SuggestedWords>,
    pub end_batch_words: Option<SuggestedWords>,
    pub selection_needs_shift: bool,
    pub retry_attempts: u32,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            input_view_shown: true,
            current_subtype: Some(en_us()),
            enabled_subtypes: vec![en_us(), fr_fr()],
            offer_next_input_method: Some(false),
            layout: Some(LayoutKind::Alphabet),
            cursor_ready: true,
            dictionary_ready: true,
            bigram_prediction_enabled: true,
            application_completions: false,
            tx_shift: ShiftUpdate::None,
            tx_suggestions: false,
            tx_contents: false,
            sync_suggestions: None,
            end_batch_words: None,
            selection_needs_shift: false,
            retry_attempts: 0,
        }
    }
}

pub fn en_us() -> Subtype {
    Subtype::new(1, "en-US", "qwerty")
}

pub fn fr_fr() -> Subtype {
    Subtype::new(2, "fr-FR", "azerty")
}

pub fn de_de() -> Subtype {
    Subtype::new(3, "de-DE", "qwertz")
}

fn push(log: &Log, line: impl Into<String>) {
    log.borrow_mut().push(line.into());
}

// ========== Host ==========

pub struct MockHost {
    log: Log,
    state: Shared,
}

impl Host for MockHost {
    fn load_settings(
        &mut self,
        editor: Option<&EditorInfo>,
        configuration: &Configuration,
    ) -> SettingsValues {
        push(&self.log, "host.load_settings");
        let state = self.state.borrow();
        SettingsValues {
            display_orientation: configuration.orientation,
            has_hardware_keyboard: configuration.has_hardware_keyboard,
            input_attributes: InputAttributes::from_editor(editor, state.application_completions),
            bigram_prediction_enabled: state.bigram_prediction_enabled,
            ..SettingsValues::default()
        }
    }

    fn current_subtype(&self) -> Option<Subtype> {
        self.state.borrow().current_subtype.clone()
    }

    fn is_enabled_subtype_of_this_ime(&self, subtype: &Subtype) -> bool {
        self.state.borrow().enabled_subtypes.contains(subtype)
    }

    fn find_subtype_by_locale(&self, locale: &str) -> Option<Subtype> {
        self.state
            .borrow()
            .enabled_subtypes
            .iter()
            .find(|subtype| subtype.locale == locale)
            .cloned()
    }

    fn set_input_method_and_subtype(&mut self, subtype: &Subtype) {
        push(&self.log, format!("host.set_subtype {}", subtype.locale));
        self.state.borrow_mut().current_subtype = Some(subtype.clone());
    }

    fn switch_to_next_input_method(&mut self, only_current_ime: bool) -> bool {
        push(&self.log, format!("host.next_input_method {only_current_ime}"));
        true
    }

    fn switch_to_shortcut_ime(&mut self) {
        push(&self.log, "host.shortcut_ime");
    }

    fn should_offer_switching_to_next_input_method(&self, fallback: bool) -> bool {
        self.state.borrow().offer_next_input_method.unwrap_or(fallback)
    }

    fn is_input_view_shown(&self) -> bool {
        self.state.borrow().input_view_shown
    }

    fn request_hide_self(&mut self) {
        push(&self.log, "host.hide_self");
    }

    fn request_restart(&mut self) {
        push(&self.log, "host.restart");
    }

    fn on_ringer_mode_changed(&mut self) {
        push(&self.log, "host.ringer_mode_changed");
    }
}

// ========== Input logic ==========

pub struct MockInputLogic {
    log: Log,
    state: Shared,
}

impl InputLogic for MockInputLogic {
    fn start_session(&mut self, editor: Option<&EditorInfo>, _settings: &SettingsValues) {
        let input_type = editor.map(|e| e.input_type).unwrap_or_default();
        push(&self.log, format!("logic.start_session {input_type}"));
    }

    fn finish_session(&mut self) {
        push(&self.log, "logic.finish_session");
    }

    fn process_event(
        &mut self,
        _settings: &SettingsValues,
        event: &Event,
        _shift_mode: ShiftMode,
        _script_id: ScriptId,
    ) -> InputTransaction {
        let line = match (event.text_payload(), event.code_point(), event.key_code()) {
            (Some(text), _, _) => format!("logic.process_event text={text}"),
            (_, Some(cp), _) => format!("logic.process_event cp={cp:#x}"),
            (_, _, Some(code)) => format!("logic.process_event code={code}"),
            _ => "logic.process_event".to_string(),
        };
        push(&self.log, line);

        let state = self.state.borrow();
        let mut tx = InputTransaction::new(event.clone());
        tx.require_shift_update(state.tx_shift);
        if state.tx_suggestions {
            tx.set_requires_update_suggestions();
        }
        if state.tx_contents {
            tx.set_did_affect_contents();
        }
        tx
    }

    fn on_start_batch_input(&mut self, _settings: &SettingsValues) {
        push(&self.log, "logic.start_batch");
    }

    fn on_update_batch_input(&mut self, pointers: &InputPointers) {
        push(&self.log, format!("logic.update_batch {}", pointers.len()));
    }

    fn on_end_batch_input(&mut self, _pointers: &InputPointers) -> Option<SuggestedWords> {
        push(&self.log, "logic.end_batch");
        self.state.borrow().end_batch_words.clone()
    }

    fn on_cancel_batch_input(&mut self) {
        push(&self.log, "logic.cancel_batch");
    }

    fn on_update_selection(
        &mut self,
        _old_sel_start: i32,
        _old_sel_end: i32,
        new_sel_start: i32,
        new_sel_end: i32,
        _settings: &SettingsValues,
    ) -> bool {
        push(&self.log, format!("logic.update_selection {new_sel_start}..{new_sel_end}"));
        self.state.borrow().selection_needs_shift
    }

    fn reset_caches_upon_cursor_move(&mut self, sel_start: i32, sel_end: i32) -> bool {
        push(&self.log, format!("logic.reset_caches {sel_start}..{sel_end}"));
        self.state.borrow().cursor_ready
    }

    fn retry_reset_caches(&mut self) -> bool {
        push(&self.log, "logic.retry_reset_caches");
        let mut state = self.state.borrow_mut();
        state.retry_attempts += 1;
        state.cursor_ready
    }

    fn suggested_words(
        &mut self,
        _settings: &SettingsValues,
        input_style: InputStyle,
        sequence_number: u64,
    ) -> Option<SuggestedWords> {
        push(
            &self.log,
            format!("logic.suggested_words {input_style:?} #{sequence_number}"),
        );
        self.state.borrow().sync_suggestions.clone()
    }

    fn restart_suggestions_on_word_touched_by_cursor(
        &mut self,
        _settings: &SettingsValues,
        include_resumed_word: bool,
    ) {
        push(&self.log, format!("logic.restart_suggestions {include_resumed_word}"));
    }

    fn on_orientation_change(&mut self, _settings: &SettingsValues) {
        push(&self.log, "logic.orientation_change");
    }

    fn on_subtype_changed(&mut self, locale: &str, _settings: &SettingsValues) {
        push(&self.log, format!("logic.subtype_changed {locale}"));
    }

    fn caps_state(&self, _settings: &SettingsValues) -> CapsState {
        CapsState::default()
    }
}

// ========== Keyboard view ==========

pub struct MockKeyboard {
    log: Log,
    state: Shared,
}

impl KeyboardView for MockKeyboard {
    fn layout_kind(&self) -> Option<LayoutKind> {
        self.state.borrow().layout
    }

    fn script_id(&self) -> ScriptId {
        ScriptId::LATIN
    }

    fn shift_mode(&self) -> ShiftMode {
        ShiftMode::Unshifted
    }

    fn request_update_shift_state(&mut self, _caps: CapsState) {
        push(&self.log, "keyboard.update_shift_state");
    }

    fn on_event(&mut self, _event: &Event, _caps: CapsState) {
        push(&self.log, "keyboard.on_event");
    }

    fn save_keyboard_state(&mut self) {
        push(&self.log, "keyboard.save_state");
    }

    fn load_keyboard(
        &mut self,
        editor: Option<&EditorInfo>,
        _settings: &SettingsValues,
        _caps: CapsState,
    ) {
        let input_type = editor.map(|e| e.input_type).unwrap_or_default();
        push(&self.log, format!("keyboard.load {input_type}"));
    }

    fn reset_keyboard_state_to_alphabet(&mut self, _caps: CapsState) {
        push(&self.log, "keyboard.reset_to_alphabet");
    }

    fn closing(&mut self) {
        push(&self.log, "keyboard.closing");
    }

    fn deallocate_memory(&mut self) {
        push(&self.log, "keyboard.deallocate_memory");
    }

    fn set_main_dictionary_availability(&mut self, available: bool) {
        push(&self.log, format!("keyboard.dictionary_available {available}"));
    }

    fn show_gesture_floating_preview(&mut self, words: &SuggestedWords, dismiss: bool) {
        push(
            &self.log,
            format!(
                "keyboard.gesture_preview {} dismiss={dismiss}",
                words.first_word().unwrap_or("")
            ),
        );
    }

    fn update_pinned_clips(&mut self, clips: &[ClipboardEntry]) {
        push(&self.log, format!("keyboard.pinned_clips {}", clips.len()));
    }
}

// ========== Suggestion strip ==========

pub struct MockStrip {
    log: Log,
}

impl SuggestionStrip for MockStrip {
    fn set_suggestions(&mut self, words: &SuggestedWords) {
        let joined: Vec<&str> = words.words.iter().map(|w| w.word.as_str()).collect();
        push(&self.log, format!("strip.set [{}]", joined.join(",")));
    }

    fn set_visible(&mut self, visible: bool) {
        push(&self.log, format!("strip.visible {visible}"));
    }
}

// ========== Dictionary facilitator ==========

pub struct MockDictionary {
    log: Log,
    state: Shared,
}

impl DictionaryFacilitator for MockDictionary {
    fn on_start_input(&mut self) {
        push(&self.log, "dict.start_input");
    }

    fn on_finish_input(&mut self) {
        push(&self.log, "dict.finish_input");
    }

    fn has_initialized_main_dictionary(&self) -> bool {
        self.state.borrow().dictionary_ready
    }

    fn reset_dictionaries_if_necessary(&mut self, locale: &str) {
        push(&self.log, format!("dict.reset {locale}"));
    }

    fn close_dictionaries(&mut self) {
        push(&self.log, "dict.close");
    }
}

// ========== Harness ==========

pub struct Harness {
    pub service: InputMethodService,
    pub log: Log,
    pub state: Shared,
    pub clock: ManualClock,
    pub start: Instant,
}

pub fn portrait() -> Configuration {
    Configuration {
        orientation: Orientation::Portrait,
        has_hardware_keyboard: false,
    }
}

pub fn landscape() -> Configuration {
    Configuration {
        orientation: Orientation::Landscape,
        has_hardware_keyboard: false,
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::build(config, MockState::default(), true)
    }

    pub fn with_state(state: MockState) -> Self {
        Self::build(Config::default(), state, true)
    }

    /// A service whose input view has not been created yet.
    pub fn without_input_view() -> Self {
        Self::build(Config::default(), MockState::default(), false)
    }

    fn build(config: Config, state: MockState, with_view: bool) -> Self {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let state: Shared = Rc::new(RefCell::new(state));
        let start = Instant::now();
        let clock = ManualClock::new(start);

        let collaborators = Collaborators {
            host: Box::new(MockHost {
                log: Rc::clone(&log),
                state: Rc::clone(&state),
            }),
            input_logic: Box::new(MockInputLogic {
                log: Rc::clone(&log),
                state: Rc::clone(&state),
            }),
            dictionary: Box::new(MockDictionary {
                log: Rc::clone(&log),
                state: Rc::clone(&state),
            }),
            keyboard: None,
            suggestion_strip: None,
        };

        let mut service = InputMethodService::new(config, collaborators, clock.clone());
        if with_view {
            service.attach_input_view(
                Box::new(MockKeyboard {
                    log: Rc::clone(&log),
                    state: Rc::clone(&state),
                }),
                Some(Box::new(MockStrip {
                    log: Rc::clone(&log),
                })),
            );
        }
        service.on_create(portrait());
        log.borrow_mut().clear();

        Self {
            service,
            log,
            state,
            clock,
            start,
        }
    }

    /// Move the clock to `ms` milliseconds after start without pumping, as
    /// when a host callback arrives while the event loop is idle.
    pub fn at(&mut self, ms: u64) {
        self.clock.set(self.start + Duration::from_millis(ms));
    }

    /// Pump the service with the clock at `ms` milliseconds after start.
    pub fn pump_at(&mut self, ms: u64) -> usize {
        self.at(ms);
        self.service.pump(self.start + Duration::from_millis(ms))
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// Number of logged calls starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|line| line.starts_with(prefix))
            .count()
    }

    /// Index of the first logged call starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.log
            .borrow()
            .iter()
            .position(|line| line.starts_with(prefix))
    }
}

pub fn text_field() -> EditorInfo {
    EditorInfo {
        input_type: libsoftkey_core::context::input_type::TYPE_CLASS_TEXT,
        initial_sel_start: 0,
        initial_sel_end: 0,
        ..EditorInfo::default()
    }
}

pub fn number_field() -> EditorInfo {
    EditorInfo::with_input_type(libsoftkey_core::context::input_type::TYPE_CLASS_NUMBER)
}
