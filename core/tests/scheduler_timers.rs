// core/tests/scheduler_timers.rs
//! Integration tests for deferred work: coalesced refreshes, memory release,
//! dictionary readiness, cursor resync retries and background posts.

mod common;

use std::thread;

use common::{text_field, Harness, MockState};
use libsoftkey_core::{
    Broadcast, ClipboardEntry, Config, ServiceState, ShiftUpdate, SuggestedWordInfo,
    SuggestedWords,
};

fn started(state: MockState) -> Harness {
    let mut h = Harness::with_state(state);
    h.service.on_start_input(Some(text_field()), false);
    h.service.on_start_input_view(Some(text_field()), false);
    h.take_calls();
    h
}

fn async_words(word: &str, seq: u64) -> SuggestedWords {
    SuggestedWords {
        words: vec![SuggestedWordInfo::new(word, 1)],
        ..SuggestedWords::default()
    }
    .with_sequence(seq)
}

// ========== Coalescing ==========

#[test]
fn test_repost_pushes_suggestion_refresh_back() {
    let mut h = started(MockState {
        tx_suggestions: true,
        ..MockState::default()
    });

    h.service.on_code_input('a' as i32, 0, 0, false);
    h.pump_at(50);
    h.service.on_code_input('b' as i32, 0, 0, false);

    h.pump_at(100);
    assert_eq!(h.count("logic.suggested_words"), 0);
    h.pump_at(150);
    assert_eq!(h.count("logic.suggested_words"), 1);
}

#[test]
fn test_new_session_cancels_previous_timers() {
    let mut h = started(MockState {
        tx_suggestions: true,
        ..MockState::default()
    });
    h.service.on_code_input('a' as i32, 0, 0, false);
    assert!(h.service.scheduler().has_pending_update_suggestions());

    h.service.on_start_input_view(Some(text_field()), false);
    assert!(!h.service.scheduler().has_pending_update_suggestions());

    h.pump_at(500);
    assert_eq!(h.count("logic.suggested_words"), 0);
}

// ========== Memory release ==========

#[test]
fn test_memory_released_ten_seconds_after_view_closes() {
    let mut h = started(MockState::default());
    h.service.on_finish_input_view(false);

    h.pump_at(9_999);
    assert_eq!(h.count("keyboard.deallocate_memory"), 0);
    h.pump_at(10_000);
    assert_eq!(h.count("keyboard.deallocate_memory"), 1);
}

#[test]
fn test_reopened_view_keeps_memory() {
    let mut h = started(MockState::default());
    h.service.on_finish_input_view(false);
    h.pump_at(5_000);
    h.service.on_start_input_view(Some(text_field()), false);

    h.pump_at(20_000);
    assert_eq!(h.count("keyboard.deallocate_memory"), 0);
}

// ========== Dictionary readiness ==========

#[test]
fn test_dictionary_ready_resumes_suggestions() {
    let mut h = Harness::with_state(MockState {
        dictionary_ready: false,
        ..MockState::default()
    });
    h.service.on_start_input(Some(text_field()), false);
    h.service.on_start_input_view(Some(text_field()), false);
    assert_eq!(h.count("keyboard.dictionary_available false"), 1);
    assert!(h.service.scheduler().has_pending_wait_for_dictionary_load());
    h.take_calls();

    let handle = h.service.handle();
    assert!(handle.post_dictionary_availability(true));
    h.pump_at(10);

    assert_eq!(h.count("keyboard.dictionary_available true"), 1);
    assert_eq!(h.count("logic.restart_suggestions false"), 1);
    assert!(!h.service.scheduler().has_pending_wait_for_dictionary_load());
}

#[test]
fn test_dictionary_wait_times_out() {
    let mut h = Harness::with_state(MockState {
        dictionary_ready: false,
        ..MockState::default()
    });
    h.service.on_start_input(Some(text_field()), false);
    h.service.on_start_input_view(Some(text_field()), false);
    h.take_calls();

    h.pump_at(2_000);
    assert!(!h.service.scheduler().has_pending_wait_for_dictionary_load());

    // A late availability report no longer resumes suggestions
    h.service.handle().post_dictionary_availability(true);
    h.pump_at(2_010);
    assert_eq!(h.count("keyboard.dictionary_available true"), 1);
    assert_eq!(h.count("logic.restart_suggestions false"), 0);
}

// ========== Cursor resync ==========

#[test]
fn test_cursor_resync_gives_up_after_five_attempts() {
    let mut h = Harness::with_state(MockState {
        cursor_ready: false,
        ..MockState::default()
    });
    h.service.on_start_input(Some(text_field()), false);
    h.service.on_start_input_view(Some(text_field()), false);
    assert!(h.service.scheduler().has_pending_reset_caches());
    assert!(!h.service.scheduler().has_pending_resume_suggestions());
    h.take_calls();

    for ms in (20..=200).step_by(20) {
        h.pump_at(ms);
    }

    assert_eq!(h.state.borrow().retry_attempts, 5);
    assert!(!h.service.scheduler().has_pending_reset_caches());
    assert_eq!(h.count("keyboard.load 1"), 1);

    h.pump_at(300);
    assert_eq!(h.count("logic.restart_suggestions false"), 1);
}

#[test]
fn test_cursor_resync_recovers() {
    let mut h = Harness::with_state(MockState {
        cursor_ready: false,
        ..MockState::default()
    });
    h.service.on_start_input(Some(text_field()), false);
    h.service.on_start_input_view(Some(text_field()), false);
    h.take_calls();

    h.pump_at(20);
    h.pump_at(40);
    h.state.borrow_mut().cursor_ready = true;
    h.pump_at(60);

    assert_eq!(h.state.borrow().retry_attempts, 3);
    assert!(!h.service.scheduler().has_pending_reset_caches());
    assert_eq!(h.count("keyboard.load 1"), 1);
    assert!(h.service.scheduler().has_pending_resume_suggestions());
}

#[test]
fn test_cursor_resync_attempts_follow_config() {
    let config = Config {
        cursor_reset_attempts: 2,
        ..Config::default()
    };
    let mut h = Harness::with_config(config);
    h.state.borrow_mut().cursor_ready = false;
    h.service.on_start_input(Some(text_field()), false);
    h.service.on_start_input_view(Some(text_field()), false);

    for ms in (20..=200).step_by(20) {
        h.pump_at(ms);
    }
    assert_eq!(h.state.borrow().retry_attempts, 2);
}

#[test]
fn test_zero_cursor_attempts_schedules_no_retry() {
    let config = Config {
        cursor_reset_attempts: 0,
        ..Config::default()
    };
    let mut h = Harness::with_config(config);
    h.state.borrow_mut().cursor_ready = false;
    h.service.on_start_input(Some(text_field()), false);
    h.service.on_start_input_view(Some(text_field()), false);

    assert!(!h.service.scheduler().has_pending_reset_caches());
    assert_eq!(h.count("keyboard.load 1"), 1);
    assert_eq!(h.count("keyboard.save_state"), 0);

    for ms in (20..=200).step_by(20) {
        h.pump_at(ms);
    }
    assert_eq!(h.state.borrow().retry_attempts, 0);
}

// ========== Idle host ==========

#[test]
fn test_shift_refresh_delay_counts_from_the_keystroke() {
    let mut h = started(MockState {
        tx_shift: ShiftUpdate::Later,
        ..MockState::default()
    });
    h.pump_at(1_000);
    h.take_calls();

    h.at(5_000);
    h.service.on_code_input('a' as i32, 0, 0, false);

    h.pump_at(5_099);
    assert_eq!(h.count("keyboard.update_shift_state"), 0);
    h.pump_at(5_100);
    assert_eq!(h.count("keyboard.update_shift_state"), 1);
}

// ========== Suggestion ordering ==========

#[test]
fn test_stale_async_suggestions_are_dropped() {
    let mut h = started(MockState::default());
    let handle = h.service.handle();

    handle.post_show_suggestion_strip(async_words("newer", 5));
    h.pump_at(1);
    handle.post_show_suggestion_strip(async_words("older", 3));
    h.pump_at(2);
    handle.post_show_suggestion_strip(async_words("newest", 6));
    h.pump_at(3);

    assert_eq!(h.count("strip.set [newer]"), 1);
    assert_eq!(h.count("strip.set [older]"), 0);
    assert_eq!(h.count("strip.set [newest]"), 1);
}

#[test]
fn test_background_thread_posts() {
    let mut h = started(MockState::default());
    let handle = h.service.handle();

    let worker = thread::spawn(move || {
        handle.post_broadcast(Broadcast::RingerModeChanged);
        handle.post_dictionary_availability(true)
    });
    assert!(worker.join().unwrap());

    h.pump_at(1);
    assert_eq!(h.count("host.ringer_mode_changed"), 1);
    assert_eq!(h.count("keyboard.dictionary_available true"), 1);
}

// ========== Broadcasts ==========

#[test]
fn test_package_change_reopens_dictionaries() {
    let mut h = started(MockState::default());
    h.service
        .post_broadcast(Broadcast::PackageAdded("org.example.dict".to_string()));
    h.pump_at(0);

    assert_eq!(h.count("dict.reset en-US"), 1);
    assert!(h.service.scheduler().has_pending_wait_for_dictionary_load());
}

#[test]
fn test_broadcasts_reach_host() {
    let mut h = started(MockState::default());
    h.service.post_broadcast(Broadcast::UserUnlocked);
    h.service.post_broadcast(Broadcast::HideSoftInput);
    h.pump_at(0);

    assert_eq!(h.calls(), vec!["host.restart".to_string(), "host.hide_self".to_string()]);
}

#[test]
fn test_pinned_clips_forwarded_to_keyboard() {
    let mut h = started(MockState::default());
    h.service.post_update_clipboard_pinned_clips(vec![ClipboardEntry {
        id: 1,
        text: "pinned".to_string(),
        time_stamp: 0,
    }]);
    h.pump_at(0);
    assert_eq!(h.count("keyboard.pinned_clips 1"), 1);
}

// ========== Service teardown ==========

#[test]
fn test_tasks_discarded_after_destroy() {
    let mut h = started(MockState {
        tx_shift: libsoftkey_core::ShiftUpdate::Later,
        ..MockState::default()
    });
    h.service.on_code_input('a' as i32, 0, 0, false);
    let handle = h.service.handle();

    h.service.on_destroy();
    assert_eq!(h.service.state(), ServiceState::Destroyed);
    assert!(h.service.scheduler().queue().is_empty());

    handle.post_broadcast(Broadcast::RingerModeChanged);
    assert_eq!(h.pump_at(1_000), 0);
    assert_eq!(h.count("host.ringer_mode_changed"), 0);
    assert_eq!(h.count("keyboard.update_shift_state"), 0);
}

#[test]
fn test_broadcast_ignored_after_destroy() {
    let mut h = started(MockState::default());
    h.service.on_destroy();
    h.service.post_broadcast(Broadcast::NewDictionary);
    assert!(h.service.scheduler().queue().is_empty());
}
