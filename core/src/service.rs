//! The input method service.
//!
//! `InputMethodService` is the session context the host talks to. It owns the
//! scheduler, the orientation-change coalescer, the subtype tracker, the
//! hardware decoder table and handles to every external collaborator, and it
//! is the only place where deferred tasks are executed.
//!
//! Host lifecycle callbacks go through the coalescer first; whatever it says
//! to run is executed by the `*_internal` methods below. Input events go
//! through the decoder and the [`Pipeline`]. Everything else happens in
//! [`InputMethodService::pump`], which advances the scheduler clock and runs
//! every task that has come due.
//!
//! Host callbacks carry no timestamp. Timers they start are measured from the
//! service's [`Clock`], so a host that idles without pumping still gets full
//! delays.

use std::time::Instant;

use ahash::AHashSet;

use crate::callbacks::{CallbackCoalescer, CallbackWindow, LifecycleCall};
use crate::clock::Clock;
use crate::collaborators::{
    Collaborators, DictionaryFacilitator, Host, InputLogic, KeyboardView, SuggestionStrip,
};
use crate::config::Config;
use crate::constants::{CODE_LANGUAGE_SWITCH, CODE_SHORTCUT};
use crate::context::EditorInfo;
use crate::decoder::{self, RawKeyEvent};
use crate::decoder_cache::DeviceDecoderTable;
use crate::event::{Event, InputPointers};
use crate::pipeline::Pipeline;
use crate::scheduler::{Scheduler, SchedulerHandle};
use crate::settings::{Configuration, SettingsValues};
use crate::subtype::{Subtype, SubtypeState, SwitchTarget};
use crate::suggestions::{SuggestedWordInfo, SuggestedWords, SuggestionGate};
use crate::task::{Broadcast, ClipboardEntry, GesturePreview, Task};
use crate::transaction::InputStyle;

/// Lifecycle of the service itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Built but `on_create` not called yet
    Constructed,
    Created,
    Destroyed,
}

pub struct InputMethodService {
    config: Config,
    state: ServiceState,

    scheduler: Scheduler,
    coalescer: CallbackCoalescer,
    subtype_state: SubtypeState,
    decoders: DeviceDecoderTable,
    suggestion_gate: SuggestionGate,
    /// Hardware keys whose key-down was consumed, keyed by (device, key code)
    pressed_hardware_keys: AHashSet<u64>,

    settings: SettingsValues,
    configuration: Configuration,
    /// Descriptor of the field the current input connection belongs to
    current_editor: Option<EditorInfo>,

    host: Box<dyn Host>,
    input_logic: Box<dyn InputLogic>,
    dictionary: Box<dyn DictionaryFacilitator>,
    keyboard: Option<Box<dyn KeyboardView>>,
    suggestion_strip: Option<Box<dyn SuggestionStrip>>,
}

impl std::fmt::Debug for InputMethodService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputMethodService")
            .field("state", &self.state)
            .field("window", self.coalescer.window())
            .field("queued", &self.scheduler.queue().len())
            .field("has_keyboard", &self.keyboard.is_some())
            .finish_non_exhaustive()
    }
}

fn keyboard_mut(slot: &mut Option<Box<dyn KeyboardView>>) -> Option<&mut dyn KeyboardView> {
    match slot {
        Some(keyboard) => Some(keyboard.as_mut()),
        None => None,
    }
}

fn hardware_key_id(raw: &RawKeyEvent) -> u64 {
    ((raw.device_id as u32 as u64) << 32) | (raw.key_code as u32 as u64)
}

impl InputMethodService {
    pub fn new(config: Config, collaborators: Collaborators, clock: impl Clock + 'static) -> Self {
        let Collaborators {
            host,
            input_logic,
            dictionary,
            keyboard,
            suggestion_strip,
        } = collaborators;

        Self {
            scheduler: Scheduler::with_clock(config.clone(), clock),
            config,
            state: ServiceState::Constructed,
            coalescer: CallbackCoalescer::new(),
            subtype_state: SubtypeState::new(),
            decoders: DeviceDecoderTable::default(),
            suggestion_gate: SuggestionGate::new(),
            pressed_hardware_keys: AHashSet::new(),
            settings: SettingsValues::default(),
            configuration: Configuration::default(),
            current_editor: None,
            host,
            input_logic,
            dictionary,
            keyboard,
            suggestion_strip,
        }
    }

    // ========== Accessors ==========

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == ServiceState::Created
    }

    /// Posting handle for background workers.
    pub fn handle(&self) -> SchedulerHandle {
        self.scheduler.handle()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn callback_window(&self) -> &CallbackWindow {
        self.coalescer.window()
    }

    pub fn applied_editor(&self) -> Option<&EditorInfo> {
        self.coalescer.applied_editor()
    }

    pub fn subtype_state(&self) -> &SubtypeState {
        &self.subtype_state
    }

    pub fn settings(&self) -> &SettingsValues {
        &self.settings
    }

    pub fn decoders(&self) -> &DeviceDecoderTable {
        &self.decoders
    }

    /// Replace the decoder table, e.g. to install device-specific decoders.
    pub fn set_decoder_table(&mut self, decoders: DeviceDecoderTable) {
        self.decoders = decoders;
    }

    /// Due time of the next queued task; a host event loop sleeps until then.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    // ========== Service lifecycle ==========

    pub fn on_create(&mut self, configuration: Configuration) {
        tracing::info!("input method service created");
        self.state = ServiceState::Created;
        self.configuration = configuration;
        self.load_settings();
        self.reset_dictionaries_if_necessary();
    }

    pub fn on_destroy(&mut self) {
        tracing::info!(queued = self.scheduler.queue().len(), "input method service destroyed");
        self.dictionary.close_dictionaries();
        self.scheduler.clear();
        self.coalescer.reset();
        self.pressed_hardware_keys.clear();
        self.state = ServiceState::Destroyed;
    }

    /// The host created the input view.
    pub fn attach_input_view(
        &mut self,
        keyboard: Box<dyn KeyboardView>,
        suggestion_strip: Option<Box<dyn SuggestionStrip>>,
    ) {
        self.keyboard = Some(keyboard);
        self.suggestion_strip = suggestion_strip;
    }

    pub fn on_configuration_changed(&mut self, configuration: Configuration) {
        if self.settings.display_orientation != configuration.orientation {
            tracing::debug!(from = ?self.settings.display_orientation, to = ?configuration.orientation, "orientation changing");
            self.coalescer.start_orientation_changing(&mut self.scheduler);
            if self.host.is_input_view_shown() {
                if let Some(keyboard) = self.keyboard.as_mut() {
                    keyboard.save_keyboard_state();
                }
            }
            self.input_logic.on_orientation_change(&self.settings);
        }

        let hardware_keyboard_changed =
            self.settings.has_hardware_keyboard != configuration.has_hardware_keyboard;
        self.configuration = configuration;
        if hardware_keyboard_changed {
            self.load_settings();
            if self.is_ime_suppressed_by_hardware_keyboard() {
                self.cleanup_internal_state_for_finish_input();
            }
        }
    }

    // ========== Host lifecycle callbacks ==========

    pub fn on_start_input(&mut self, editor: Option<EditorInfo>, restarting: bool) {
        let calls = self
            .coalescer
            .on_start_input(&mut self.scheduler, editor, restarting);
        self.execute(calls);
    }

    pub fn on_start_input_view(&mut self, editor: Option<EditorInfo>, restarting: bool) {
        let calls = self
            .coalescer
            .on_start_input_view(&mut self.scheduler, editor, restarting);
        self.execute(calls);
    }

    pub fn on_finish_input_view(&mut self, finishing_input: bool) {
        let calls = self
            .coalescer
            .on_finish_input_view(&mut self.scheduler, finishing_input);
        self.execute(calls);
    }

    pub fn on_finish_input(&mut self) {
        let calls = self.coalescer.on_finish_input(&mut self.scheduler);
        self.execute(calls);
    }

    pub fn on_window_hidden(&mut self) {
        if let Some(keyboard) = self.keyboard.as_mut() {
            keyboard.closing();
        }
    }

    pub fn on_update_selection(
        &mut self,
        old_sel_start: i32,
        old_sel_end: i32,
        new_sel_start: i32,
        new_sel_end: i32,
    ) {
        if self.host.is_input_view_shown()
            && self.input_logic.on_update_selection(
                old_sel_start,
                old_sel_end,
                new_sel_start,
                new_sel_end,
                &self.settings,
            )
        {
            self.request_update_shift_state();
        }
    }

    fn execute(&mut self, calls: Vec<LifecycleCall>) {
        for call in calls {
            tracing::debug!(?call, "running lifecycle call");
            match call {
                LifecycleCall::FinishInputView { finishing_input } => {
                    self.finish_input_view_internal(finishing_input)
                }
                LifecycleCall::FinishInput => self.finish_input_internal(),
                LifecycleCall::StartInput { editor, restarting } => {
                    self.start_input_internal(editor, restarting)
                }
                LifecycleCall::StartInputView { editor, restarting } => {
                    self.start_input_view_internal(editor, restarting)
                }
            }
        }
    }

    fn start_input_internal(&mut self, editor: Option<EditorInfo>, _restarting: bool) {
        self.current_editor = editor;

        let Some(locale) = self
            .current_editor
            .as_ref()
            .and_then(EditorInfo::primary_hint_locale)
        else {
            return;
        };
        let Some(subtype) = self.host.find_subtype_by_locale(locale) else {
            return;
        };
        if self.host.current_subtype().as_ref() != Some(&subtype) {
            tracing::debug!(locale = %subtype.locale, "field hints a different language");
            self.scheduler.post_switch_language(subtype);
        }
    }

    fn start_input_view_internal(&mut self, editor: Option<EditorInfo>, restarting: bool) {
        self.dictionary.on_start_input();

        let Some(editor) = editor else {
            tracing::error!("start-input-view without an editor descriptor");
            if self.config.debug {
                panic!("start-input-view without an editor descriptor");
            }
            return;
        };
        if self.keyboard.is_none() {
            tracing::debug!("start-input-view before the input view exists");
            return;
        }

        self.scheduler.cancel_session_timers();

        let input_type_changed = !self.settings.is_same_input_type(&editor);
        let is_different_field = !restarting || input_type_changed;
        self.current_editor = Some(editor.clone());
        if is_different_field || self.settings.display_orientation != self.configuration.orientation {
            self.load_settings();
        }

        let mut reload_keyboard_later = false;
        if !self.is_ime_suppressed_by_hardware_keyboard() {
            self.input_logic.start_session(Some(&editor), &self.settings);
            self.reset_dictionaries_if_necessary();

            if self
                .input_logic
                .reset_caches_upon_cursor_move(editor.initial_sel_start, editor.initial_sel_end)
            {
                self.scheduler.post_resume_suggestions_for_start_input(true);
            } else if self.config.cursor_reset_attempts > 0 {
                tracing::debug!("cursor not ready; scheduling cache reset");
                self.scheduler
                    .post_reset_caches(is_different_field, self.config.cursor_reset_attempts);
                reload_keyboard_later = true;
            } else {
                tracing::warn!("cursor not ready and retries disabled; continuing without cursor sync");
            }
        }

        let caps = self.input_logic.caps_state(&self.settings);
        if let Some(keyboard) = self.keyboard.as_mut() {
            if is_different_field {
                keyboard.closing();
                keyboard.load_keyboard(Some(&editor), &self.settings, caps);
                if reload_keyboard_later {
                    keyboard.save_keyboard_state();
                }
            } else if restarting {
                keyboard.reset_keyboard_state_to_alphabet(caps);
                keyboard.request_update_shift_state(caps);
            }
        }

        self.set_neutral_suggestion_strip();
        self.scheduler.cancel_update_suggestion_strip();

        let available = self.dictionary.has_initialized_main_dictionary();
        if let Some(keyboard) = self.keyboard.as_mut() {
            keyboard.set_main_dictionary_availability(available);
        }
        if !available {
            self.scheduler.post_wait_for_dictionary_load();
        }
    }

    fn finish_input_view_internal(&mut self, _finishing_input: bool) {
        self.cleanup_internal_state_for_finish_input();
    }

    fn finish_input_internal(&mut self) {
        self.dictionary.on_finish_input();
        if let Some(keyboard) = self.keyboard.as_mut() {
            keyboard.closing();
        }
    }

    fn cleanup_internal_state_for_finish_input(&mut self) {
        self.scheduler.cancel_update_suggestion_strip();
        self.input_logic.finish_session();
    }

    fn is_ime_suppressed_by_hardware_keyboard(&self) -> bool {
        self.settings.has_hardware_keyboard && !self.host.is_input_view_shown()
    }

    // ========== Settings and dictionaries ==========

    fn load_settings(&mut self) {
        self.settings = self
            .host
            .load_settings(self.current_editor.as_ref(), &self.configuration);
        if !self.scheduler.has_pending_reopen_dictionaries() {
            self.reset_dictionaries_if_necessary();
        }
    }

    fn reset_dictionaries_if_necessary(&mut self) {
        match self.host.current_subtype() {
            Some(subtype) => self.dictionary.reset_dictionaries_if_necessary(&subtype.locale),
            None => tracing::error!("host reports no current subtype"),
        }
    }

    fn load_keyboard(&mut self) {
        self.scheduler.post_reopen_dictionaries();
        self.load_settings();
        let caps = self.input_logic.caps_state(&self.settings);
        if let Some(keyboard) = self.keyboard.as_mut() {
            keyboard.load_keyboard(self.current_editor.as_ref(), &self.settings, caps);
        }
    }

    // ========== Input ==========

    /// A software key was pressed. `code` is a code point (positive) or a
    /// named key code (zero or negative).
    pub fn on_code_input(&mut self, code: i32, x: i32, y: i32, is_key_repeat: bool) {
        let layout = self.keyboard.as_ref().and_then(|keyboard| keyboard.layout_kind());
        let event = decoder::decode_code_input(code, x, y, is_key_repeat, layout);
        self.on_event(event);
    }

    /// Run an already decoded event through the pipeline.
    pub fn on_event(&mut self, event: Event) {
        match event.key_code() {
            Some(CODE_SHORTCUT) => {
                self.host.switch_to_shortcut_ime();
                return;
            }
            Some(CODE_LANGUAGE_SWITCH) => {
                self.switch_to_next_subtype();
                return;
            }
            _ => {}
        }

        Pipeline {
            settings: &self.settings,
            input_logic: self.input_logic.as_mut(),
            keyboard: keyboard_mut(&mut self.keyboard),
            scheduler: &mut self.scheduler,
            subtype_state: &mut self.subtype_state,
        }
        .process(event);
    }

    pub fn on_text_input(&mut self, text: &str) {
        self.on_event(decoder::text_event(text));
    }

    pub fn pick_suggestion_manually(&mut self, suggestion: &SuggestedWordInfo) {
        self.on_event(Event::suggestion_picked(suggestion.word.clone()));
    }

    /// Returns true when the key was consumed.
    pub fn on_key_down(&mut self, raw: &RawKeyEvent) -> bool {
        let event = self.decoders.decode(raw);
        if !event.is_handled() {
            return false;
        }
        self.pressed_hardware_keys.insert(hardware_key_id(raw));
        self.on_event(event);
        true
    }

    /// Returns true when the matching key-down was consumed.
    pub fn on_key_up(&mut self, raw: &RawKeyEvent) -> bool {
        self.pressed_hardware_keys.remove(&hardware_key_id(raw))
    }

    // ========== Gesture input ==========

    pub fn on_start_batch_input(&mut self) {
        self.input_logic.on_start_batch_input(&self.settings);
    }

    pub fn on_update_batch_input(&mut self, pointers: &InputPointers) {
        self.input_logic.on_update_batch_input(pointers);
    }

    pub fn on_end_batch_input(&mut self, pointers: &InputPointers) {
        if let Some(words) = self.input_logic.on_end_batch_input(pointers) {
            self.scheduler
                .post_show_suggestion_strip(words.clone(), GesturePreview::Dismiss);
            self.scheduler.post_show_tail_batch_input_result(words);
        }
    }

    pub fn on_cancel_batch_input(&mut self) {
        self.input_logic.on_cancel_batch_input();
    }

    // ========== Suggestions ==========

    /// Words supplied by the application for the current field. `None` clears
    /// them.
    pub fn on_display_completions(&mut self, completions: Option<Vec<SuggestedWordInfo>>) {
        if !self.settings.input_attributes.application_specified_completions_on {
            return;
        }
        self.scheduler.cancel_update_suggestion_strip();
        match completions {
            Some(words) => {
                self.set_suggested_words(&SuggestedWords::application_completions(words));
            }
            None => self.set_neutral_suggestion_strip(),
        }
    }

    fn show_suggestion_strip(&mut self, words: &SuggestedWords) {
        if !self.suggestion_gate.admit(words.sequence_number) {
            return;
        }
        if words.is_empty() {
            self.set_neutral_suggestion_strip();
        } else {
            self.set_suggested_words(words);
        }
    }

    fn set_neutral_suggestion_strip(&mut self) {
        let neutral = if self.settings.bigram_prediction_enabled {
            SuggestedWords::empty()
        } else {
            SuggestedWords::punctuation(&self.settings.suggest_punctuation)
        };
        self.set_suggested_words(&neutral);
    }

    fn set_suggested_words(&mut self, words: &SuggestedWords) {
        let Some(strip) = self.suggestion_strip.as_mut() else {
            return;
        };
        if !self.host.is_input_view_shown() {
            return;
        }
        let visible = self.settings.is_suggestion_strip_visible();
        strip.set_visible(visible);
        if visible {
            strip.set_suggestions(words);
        }
    }

    fn perform_update_suggestion_strip(&mut self, input_style: InputStyle) {
        if !self.settings.needs_to_lookup_suggestions() {
            tracing::trace!("suggestions not needed for this field");
            return;
        }
        let seq = self.suggestion_gate.next_sequence();
        match self
            .input_logic
            .suggested_words(&self.settings, input_style, seq)
        {
            Some(mut words) => {
                words.sequence_number.get_or_insert(seq);
                self.show_suggestion_strip(&words);
            }
            None => tracing::trace!(seq, "suggestions will arrive asynchronously"),
        }
    }

    // ========== Subtypes ==========

    pub fn on_current_subtype_changed(&mut self, subtype: &Subtype) {
        tracing::info!(locale = %subtype.locale, layout = %subtype.layout, "subtype changed");
        self.input_logic
            .on_subtype_changed(&subtype.locale, &self.settings);
        self.load_keyboard();
    }

    pub fn switch_to_next_subtype(&mut self) {
        let fallback = self.settings.includes_other_imes_in_language_switch_list;
        if self.host.should_offer_switching_to_next_input_method(fallback) {
            self.host.switch_to_next_input_method(true);
            return;
        }

        let Some(current) = self.host.current_subtype() else {
            self.host.switch_to_next_input_method(true);
            return;
        };
        let host = &self.host;
        let target = self
            .subtype_state
            .switch_subtype(&current, |subtype| host.is_enabled_subtype_of_this_ime(subtype));
        match target {
            SwitchTarget::Subtype(subtype) => self.host.set_input_method_and_subtype(&subtype),
            SwitchTarget::NextInputMethod => {
                self.host.switch_to_next_input_method(true);
            }
        }
    }

    // ========== Posting from the host ==========

    pub fn post_broadcast(&mut self, broadcast: Broadcast) {
        if !self.is_alive() {
            tracing::debug!(?broadcast, "broadcast while not subscribed");
            return;
        }
        self.scheduler.post_broadcast(broadcast);
    }

    pub fn post_update_clipboard_pinned_clips(&mut self, clips: Vec<ClipboardEntry>) {
        self.scheduler.post_update_clipboard_pinned_clips(clips);
    }

    // ========== Task execution ==========

    /// Advance the clock to `now` and run every task that is due, including
    /// tasks posted through handles. Returns how many tasks ran.
    pub fn pump(&mut self, now: Instant) -> usize {
        self.scheduler.advance_to(now);
        self.scheduler.drain_inbox();

        let mut ran = 0;
        while let Some(task) = self.scheduler.pop_due() {
            if !self.is_alive() {
                tracing::debug!(?task, state = ?self.state, "discarding task for inactive service");
                continue;
            }
            self.handle_task(task);
            ran += 1;
        }
        ran
    }

    fn handle_task(&mut self, task: Task) {
        tracing::debug!(tag = ?task.tag(), "running task");
        match task {
            Task::UpdateShiftState => self.request_update_shift_state(),
            Task::PendingImsCallback => {
                let calls = self.coalescer.on_timeout();
                self.execute(calls);
            }
            Task::UpdateSuggestionStrip { input_style } => {
                self.scheduler.cancel_update_suggestion_strip();
                self.perform_update_suggestion_strip(input_style);
            }
            Task::ShowSuggestionStrip { words, preview } => {
                self.show_suggestion_strip(&words);
                if preview != GesturePreview::NotGesture {
                    if let Some(keyboard) = self.keyboard.as_mut() {
                        keyboard.show_gesture_floating_preview(
                            &words,
                            preview == GesturePreview::Dismiss,
                        );
                    }
                }
            }
            Task::ResumeSuggestions {
                include_resumed_word,
            } => self
                .input_logic
                .restart_suggestions_on_word_touched_by_cursor(&self.settings, include_resumed_word),
            Task::ResumeSuggestionsForStartInput => self
                .input_logic
                .restart_suggestions_on_word_touched_by_cursor(&self.settings, true),
            Task::ReopenDictionaries => {
                self.scheduler.post_wait_for_dictionary_load();
                self.reset_dictionaries_if_necessary();
            }
            Task::ShowTailBatchInputResult { words } => {
                if let Some(word) = words.first_word() {
                    self.on_event(Event::gesture_batch(word));
                }
                self.show_suggestion_strip(&words);
            }
            Task::ResetCaches {
                try_resume_suggestions,
                remaining_tries,
            } => self.retry_reset_caches(try_resume_suggestions, remaining_tries),
            Task::WaitForDictionaryLoad => {
                tracing::info!("timed out waiting for the main dictionary");
            }
            Task::DeallocateMemory => {
                if let Some(keyboard) = self.keyboard.as_mut() {
                    keyboard.deallocate_memory();
                }
            }
            Task::SwitchLanguage { subtype } => self.host.set_input_method_and_subtype(&subtype),
            Task::UpdateClipboardPinnedClips { clips } => {
                if let Some(keyboard) = self.keyboard.as_mut() {
                    keyboard.update_pinned_clips(&clips);
                }
            }
            Task::DictionaryAvailability { available } => {
                self.on_update_main_dictionary_availability(available)
            }
            Task::Broadcast(broadcast) => self.handle_broadcast(broadcast),
        }
    }

    fn request_update_shift_state(&mut self) {
        let caps = self.input_logic.caps_state(&self.settings);
        if let Some(keyboard) = self.keyboard.as_mut() {
            keyboard.request_update_shift_state(caps);
        }
    }

    fn retry_reset_caches(&mut self, try_resume_suggestions: bool, remaining_tries: u32) {
        if !self.input_logic.retry_reset_caches() {
            if remaining_tries > 1 {
                self.scheduler
                    .post_reset_caches(try_resume_suggestions, remaining_tries - 1);
                return;
            }
            tracing::warn!("cursor never became ready; continuing without cursor sync");
        }

        if try_resume_suggestions {
            self.scheduler.post_resume_suggestions(false, true);
        }
        let caps = self.input_logic.caps_state(&self.settings);
        if let Some(keyboard) = self.keyboard.as_mut() {
            keyboard.load_keyboard(self.current_editor.as_ref(), &self.settings, caps);
        }
    }

    fn on_update_main_dictionary_availability(&mut self, available: bool) {
        if let Some(keyboard) = self.keyboard.as_mut() {
            keyboard.set_main_dictionary_availability(available);
        }
        if self.scheduler.has_pending_wait_for_dictionary_load() {
            self.scheduler.cancel_wait_for_dictionary_load();
            self.scheduler.post_resume_suggestions(false, false);
        }
    }

    fn handle_broadcast(&mut self, broadcast: Broadcast) {
        match broadcast {
            Broadcast::PackageAdded(package) | Broadcast::PackageRemoved(package) => {
                tracing::debug!(%package, "package change; reopening dictionaries");
                self.scheduler.post_reopen_dictionaries();
            }
            Broadcast::NewDictionary => {
                self.scheduler.post_reopen_dictionaries();
            }
            Broadcast::RingerModeChanged => self.host.on_ringer_mode_changed(),
            Broadcast::UserUnlocked => {
                tracing::info!("user unlocked; requesting restart");
                self.host.request_restart();
            }
            Broadcast::HideSoftInput => self.host.request_hide_self(),
        }
    }
}
