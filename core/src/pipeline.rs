//! Input transaction pipeline.
//!
//! Feeds one [`Event`] to the input-logic engine and dispatches the follow-up
//! work its [`InputTransaction`] asks for. Side effects happen in a fixed
//! order: shift refresh, suggestion refresh, subtype usage, then the keyboard
//! view is told about the event.

use crate::collaborators::{InputLogic, KeyboardView};
use crate::event::{Event, EventKind};
use crate::scheduler::Scheduler;
use crate::settings::SettingsValues;
use crate::subtype::SubtypeState;
use crate::transaction::{InputTransaction, ScriptId, ShiftMode, ShiftUpdate};

/// Borrowed view of the service state one transaction needs.
pub struct Pipeline<'a> {
    pub settings: &'a SettingsValues,
    pub input_logic: &'a mut dyn InputLogic,
    pub keyboard: Option<&'a mut dyn KeyboardView>,
    pub scheduler: &'a mut Scheduler,
    pub subtype_state: &'a mut SubtypeState,
}

impl Pipeline<'_> {
    /// Run `event` through input logic and dispatch the resulting transaction.
    pub fn process(&mut self, event: Event) {
        let (shift_mode, script_id) = match self.keyboard.as_deref() {
            Some(keyboard) => (keyboard.shift_mode(), keyboard.script_id()),
            None => (ShiftMode::Unshifted, ScriptId::UNKNOWN),
        };

        let tx = match event.kind() {
            EventKind::Text(_) => self.input_logic.on_text_input(self.settings, &event, shift_mode),
            _ => self
                .input_logic
                .process_event(self.settings, &event, shift_mode, script_id),
        };

        let event = self.apply(tx);

        if let Some(keyboard) = self.keyboard.as_deref_mut() {
            let caps = self.input_logic.caps_state(self.settings);
            keyboard.on_event(&event, caps);
        }
    }

    /// Dispatch the follow-up work of a transaction and hand back its event.
    pub fn apply(&mut self, tx: InputTransaction) -> Event {
        match tx.required_shift_update() {
            ShiftUpdate::None => {}
            ShiftUpdate::Later => {
                self.scheduler.post_update_shift_state();
            }
            ShiftUpdate::Now => {
                if let Some(keyboard) = self.keyboard.as_deref_mut() {
                    let caps = self.input_logic.caps_state(self.settings);
                    keyboard.request_update_shift_state(caps);
                }
            }
        }

        if tx.requires_update_suggestions() {
            let style = tx.input_style();
            let outcome = self.scheduler.post_update_suggestion_strip(style);
            tracing::trace!(?style, ?outcome, "suggestion refresh requested");
        }

        if tx.did_affect_contents() {
            self.subtype_state.mark_current_used();
        }

        tx.into_event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::context::EditorInfo;
    use crate::decoder::LayoutKind;
    use crate::event::{EventSource, InputPointers};
    use crate::suggestions::SuggestedWords;
    use crate::task::Task;
    use crate::transaction::{CapsState, InputStyle};
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct StubLogic {
        shift: ShiftUpdate,
        suggestions: bool,
        contents: bool,
        text_inputs: usize,
    }

    impl InputLogic for StubLogic {
        fn start_session(&mut self, _: Option<&EditorInfo>, _: &SettingsValues) {}
        fn finish_session(&mut self) {}
        fn process_event(
            &mut self,
            _: &SettingsValues,
            event: &Event,
            _: ShiftMode,
            _: ScriptId,
        ) -> InputTransaction {
            let mut tx = InputTransaction::new(event.clone());
            tx.require_shift_update(self.shift);
            if self.suggestions {
                tx.set_requires_update_suggestions();
            }
            if self.contents {
                tx.set_did_affect_contents();
            }
            tx
        }
        fn on_text_input(&mut self, settings: &SettingsValues, event: &Event, shift: ShiftMode) -> InputTransaction {
            self.text_inputs += 1;
            self.process_event(settings, event, shift, ScriptId::UNKNOWN)
        }
        fn on_start_batch_input(&mut self, _: &SettingsValues) {}
        fn on_update_batch_input(&mut self, _: &InputPointers) {}
        fn on_end_batch_input(&mut self, _: &InputPointers) -> Option<SuggestedWords> {
            None
        }
        fn on_cancel_batch_input(&mut self) {}
        fn on_update_selection(&mut self, _: i32, _: i32, _: i32, _: i32, _: &SettingsValues) -> bool {
            false
        }
        fn reset_caches_upon_cursor_move(&mut self, _: i32, _: i32) -> bool {
            true
        }
        fn retry_reset_caches(&mut self) -> bool {
            true
        }
        fn suggested_words(&mut self, _: &SettingsValues, _: InputStyle, _: u64) -> Option<SuggestedWords> {
            None
        }
        fn restart_suggestions_on_word_touched_by_cursor(&mut self, _: &SettingsValues, _: bool) {}
        fn on_orientation_change(&mut self, _: &SettingsValues) {}
        fn on_subtype_changed(&mut self, _: &str, _: &SettingsValues) {}
        fn caps_state(&self, _: &SettingsValues) -> CapsState {
            CapsState::default()
        }
    }

    #[derive(Default)]
    struct StubKeyboard {
        log: Vec<&'static str>,
    }

    impl KeyboardView for StubKeyboard {
        fn layout_kind(&self) -> Option<LayoutKind> {
            Some(LayoutKind::Alphabet)
        }
        fn script_id(&self) -> ScriptId {
            ScriptId::LATIN
        }
        fn shift_mode(&self) -> ShiftMode {
            ShiftMode::Unshifted
        }
        fn request_update_shift_state(&mut self, _: CapsState) {
            self.log.push("shift");
        }
        fn on_event(&mut self, _: &Event, _: CapsState) {
            self.log.push("event");
        }
        fn save_keyboard_state(&mut self) {}
        fn load_keyboard(&mut self, _: Option<&EditorInfo>, _: &SettingsValues, _: CapsState) {}
        fn reset_keyboard_state_to_alphabet(&mut self, _: CapsState) {}
        fn closing(&mut self) {}
        fn deallocate_memory(&mut self) {}
        fn set_main_dictionary_availability(&mut self, _: bool) {}
        fn show_gesture_floating_preview(&mut self, _: &SuggestedWords, _: bool) {}
    }

    fn key(c: char) -> Event {
        Event::code_point_press(c as u32, None, false, EventSource::Software)
    }

    #[test]
    fn test_shift_later_posts_refresh() {
        let settings = SettingsValues::default();
        let mut logic = StubLogic {
            shift: ShiftUpdate::Later,
            ..StubLogic::default()
        };
        let mut keyboard = StubKeyboard::default();
        let mut scheduler = Scheduler::new(Config::default(), Instant::now());
        let mut subtype_state = SubtypeState::new();

        Pipeline {
            settings: &settings,
            input_logic: &mut logic,
            keyboard: Some(&mut keyboard),
            scheduler: &mut scheduler,
            subtype_state: &mut subtype_state,
        }
        .process(key('a'));

        assert!(scheduler.has_pending_update_shift_state());
        assert_eq!(keyboard.log, vec!["event"]);
    }

    #[test]
    fn test_shift_now_refreshes_before_event() {
        let settings = SettingsValues::default();
        let mut logic = StubLogic {
            shift: ShiftUpdate::Now,
            ..StubLogic::default()
        };
        let mut keyboard = StubKeyboard::default();
        let mut scheduler = Scheduler::new(Config::default(), Instant::now());
        let mut subtype_state = SubtypeState::new();

        Pipeline {
            settings: &settings,
            input_logic: &mut logic,
            keyboard: Some(&mut keyboard),
            scheduler: &mut scheduler,
            subtype_state: &mut subtype_state,
        }
        .process(key('a'));

        assert!(!scheduler.has_pending_update_shift_state());
        assert_eq!(keyboard.log, vec!["shift", "event"]);
    }

    #[test]
    fn test_suggestions_and_contents() {
        let start = Instant::now();
        let settings = SettingsValues::default();
        let mut logic = StubLogic {
            suggestions: true,
            contents: true,
            ..StubLogic::default()
        };
        let mut scheduler = Scheduler::new(Config::default(), start);
        let mut subtype_state = SubtypeState::new();

        let mut pipeline = Pipeline {
            settings: &settings,
            input_logic: &mut logic,
            keyboard: None,
            scheduler: &mut scheduler,
            subtype_state: &mut subtype_state,
        };
        pipeline.process(key('a'));
        pipeline.process(Event::gesture_batch("hello"));

        assert!(subtype_state.is_current_used());
        assert_eq!(scheduler.queue().len(), 1);
        scheduler.advance_to(start + Duration::from_millis(100));
        assert_eq!(
            scheduler.pop_due(),
            Some(Task::UpdateSuggestionStrip {
                input_style: InputStyle::TailBatch
            })
        );
    }

    #[test]
    fn test_text_goes_through_text_path() {
        let settings = SettingsValues::default();
        let mut logic = StubLogic::default();
        let mut scheduler = Scheduler::new(Config::default(), Instant::now());
        let mut subtype_state = SubtypeState::new();

        Pipeline {
            settings: &settings,
            input_logic: &mut logic,
            keyboard: None,
            scheduler: &mut scheduler,
            subtype_state: &mut subtype_state,
        }
        .process(Event::text(".com"));

        assert_eq!(logic.text_inputs, 1);
        assert!(!subtype_state.is_current_used());
        assert!(scheduler.queue().is_empty());
    }
}
