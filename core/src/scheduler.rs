//! Deferred-message scheduler.
//!
//! A single-threaded task queue with explicit time. The owner advances the
//! clock with [`Scheduler::advance_to`] and pops due tasks one at a time;
//! nothing here sleeps or spawns. Posts read the injected [`Clock`] first, so
//! a delay is measured from the moment of the post even when the owner has
//! not pumped for a while. Background threads never touch the queue
//! directly: they post through a [`SchedulerHandle`] and their tasks are moved
//! into the queue, in arrival order, the next time the owner drains the inbox.
//!
//! Ordering: tasks run by due time, ties broken by enqueue order. A coalesced
//! post removes the queued instance and enqueues the new one afresh, so it
//! keeps only the latest arguments and runs at most once.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crate::clock::{Clock, ManualClock};
use crate::config::Config;
use crate::subtype::Subtype;
use crate::suggestions::SuggestedWords;
use crate::task::{Broadcast, ClipboardEntry, GesturePreview, PostPolicy, Task, TaskTag};
use crate::transaction::InputStyle;

/// Result of posting a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    Enqueued,
    /// An earlier instance with the same tag was replaced
    Coalesced,
}

// ========== TaskQueue ==========

/// Time-ordered task storage.
#[derive(Debug)]
pub struct TaskQueue {
    now: Instant,
    next_seq: u64,
    entries: BTreeMap<(Instant, u64), Task>,
}

impl TaskQueue {
    pub fn new(now: Instant) -> Self {
        Self {
            now,
            next_seq: 0,
            entries: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    /// Move the clock forward. Going backwards is ignored.
    pub fn advance_to(&mut self, now: Instant) {
        if now > self.now {
            self.now = now;
        }
    }

    pub fn post(&mut self, task: Task, delay: Duration) -> PostOutcome {
        let tag = task.tag();
        let outcome = match tag.policy() {
            PostPolicy::Coalesce if self.cancel(tag) > 0 => PostOutcome::Coalesced,
            _ => PostOutcome::Enqueued,
        };
        let due = self.now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::trace!(?tag, ?delay, ?outcome, "posted task");
        self.entries.insert((due, seq), task);
        outcome
    }

    /// Remove every queued task with `tag`. Returns how many were removed.
    pub fn cancel(&mut self, tag: TaskTag) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, task| task.tag() != tag);
        before - self.entries.len()
    }

    pub fn has_pending(&self, tag: TaskTag) -> bool {
        self.entries.values().any(|task| task.tag() == tag)
    }

    /// Pop the earliest task whose due time has been reached.
    pub fn pop_due(&mut self) -> Option<Task> {
        let (&key, _) = self.entries.iter().next()?;
        if key.0 > self.now {
            return None;
        }
        self.entries.remove(&key)
    }

    /// Due time of the earliest queued task.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    /// Queued tasks in execution order.
    pub fn pending_tags(&self) -> Vec<TaskTag> {
        self.entries.values().map(Task::tag).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ========== SchedulerHandle ==========

/// Cloneable, `Send` posting handle for background workers.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    sender: Sender<Task>,
}

impl SchedulerHandle {
    /// Post a task to run at the owner's next pump. Returns `false` if the
    /// scheduler is gone.
    pub fn post(&self, task: Task) -> bool {
        self.sender.send(task).is_ok()
    }

    pub fn post_dictionary_availability(&self, available: bool) -> bool {
        self.post(Task::DictionaryAvailability { available })
    }

    pub fn post_show_suggestion_strip(&self, words: SuggestedWords) -> bool {
        self.post(Task::ShowSuggestionStrip {
            words,
            preview: GesturePreview::NotGesture,
        })
    }

    pub fn post_broadcast(&self, broadcast: Broadcast) -> bool {
        self.post(Task::Broadcast(broadcast))
    }
}

// ========== Scheduler ==========

/// Task queue plus the inbox for background posts and the configured timings.
#[derive(Debug)]
pub struct Scheduler {
    queue: TaskQueue,
    inbox: Receiver<Task>,
    sender: Sender<Task>,
    clock: Box<dyn Clock>,
    config: Config,
}

impl Scheduler {
    /// Scheduler whose time only moves through [`Scheduler::advance_to`].
    pub fn new(config: Config, now: Instant) -> Self {
        Self::with_clock(config, ManualClock::new(now))
    }

    pub fn with_clock(config: Config, clock: impl Clock + 'static) -> Self {
        let (sender, inbox) = mpsc::channel();
        Self {
            queue: TaskQueue::new(clock.now()),
            inbox,
            sender,
            clock: Box::new(clock),
            config,
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            sender: self.sender.clone(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn queue(&self) -> &TaskQueue {
        &self.queue
    }

    pub fn now(&self) -> Instant {
        self.queue.now()
    }

    pub fn advance_to(&mut self, now: Instant) {
        self.queue.advance_to(now);
    }

    /// Catch the queue up with the clock.
    pub fn sync_clock(&mut self) {
        let now = self.clock.now();
        self.queue.advance_to(now);
    }

    /// Move tasks posted through handles into the queue. Returns how many
    /// were moved.
    pub fn drain_inbox(&mut self) -> usize {
        let mut moved = 0;
        while let Ok(task) = self.inbox.try_recv() {
            self.post(task, Duration::ZERO);
            moved += 1;
        }
        moved
    }

    pub fn post(&mut self, task: Task, delay: Duration) -> PostOutcome {
        self.sync_clock();
        self.queue.post(task, delay)
    }

    pub fn cancel(&mut self, tag: TaskTag) -> usize {
        self.queue.cancel(tag)
    }

    pub fn has_pending(&self, tag: TaskTag) -> bool {
        self.queue.has_pending(tag)
    }

    pub fn pop_due(&mut self) -> Option<Task> {
        self.queue.pop_due()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.next_deadline()
    }

    /// Drop the timers of the previous editing session.
    pub fn cancel_session_timers(&mut self) {
        for tag in TaskTag::ALL {
            if tag.is_session_scoped() {
                self.queue.cancel(tag);
            }
        }
    }

    /// Drop everything, including tasks still sitting in the inbox.
    pub fn clear(&mut self) {
        while self.inbox.try_recv().is_ok() {}
        self.queue.clear();
    }

    // ========== Shift state ==========

    pub fn post_update_shift_state(&mut self) -> PostOutcome {
        let delay = self.config.shift_state_delay();
        self.post(Task::UpdateShiftState, delay)
    }

    pub fn cancel_update_shift_state(&mut self) {
        self.queue.cancel(TaskTag::UpdateShiftState);
    }

    pub fn has_pending_update_shift_state(&self) -> bool {
        self.queue.has_pending(TaskTag::UpdateShiftState)
    }

    // ========== Suggestion strip ==========

    pub fn post_update_suggestion_strip(&mut self, input_style: InputStyle) -> PostOutcome {
        let delay = self.config.suggestion_update_delay();
        self
            .post(Task::UpdateSuggestionStrip { input_style }, delay)
    }

    pub fn cancel_update_suggestion_strip(&mut self) {
        self.queue.cancel(TaskTag::UpdateSuggestionStrip);
    }

    pub fn has_pending_update_suggestions(&self) -> bool {
        self.queue.has_pending(TaskTag::UpdateSuggestionStrip)
    }

    pub fn post_show_suggestion_strip(
        &mut self,
        words: SuggestedWords,
        preview: GesturePreview,
    ) -> PostOutcome {
        self
            .post(Task::ShowSuggestionStrip { words, preview }, Duration::ZERO)
    }

    pub fn post_show_tail_batch_input_result(&mut self, words: SuggestedWords) -> PostOutcome {
        self
            .post(Task::ShowTailBatchInputResult { words }, Duration::ZERO)
    }

    // ========== Resume suggestions ==========

    pub fn post_resume_suggestions(&mut self, include_resumed_word: bool, delayed: bool) -> PostOutcome {
        let delay = self.delay_if(delayed);
        self
            .post(Task::ResumeSuggestions { include_resumed_word }, delay)
    }

    pub fn has_pending_resume_suggestions(&self) -> bool {
        self.queue.has_pending(TaskTag::ResumeSuggestions)
    }

    pub fn post_resume_suggestions_for_start_input(&mut self, delayed: bool) -> PostOutcome {
        let delay = self.delay_if(delayed);
        self.post(Task::ResumeSuggestionsForStartInput, delay)
    }

    fn delay_if(&self, delayed: bool) -> Duration {
        if delayed {
            self.config.suggestion_update_delay()
        } else {
            Duration::ZERO
        }
    }

    // ========== Cursor sync retry ==========

    pub fn post_reset_caches(&mut self, try_resume_suggestions: bool, remaining_tries: u32) -> PostOutcome {
        let delay = self.config.cursor_reset_retry_delay();
        self.post(
            Task::ResetCaches {
                try_resume_suggestions,
                remaining_tries,
            },
            delay,
        )
    }

    pub fn has_pending_reset_caches(&self) -> bool {
        self.queue.has_pending(TaskTag::ResetCaches)
    }

    // ========== Dictionaries ==========

    pub fn post_reopen_dictionaries(&mut self) -> PostOutcome {
        self.post(Task::ReopenDictionaries, Duration::ZERO)
    }

    pub fn has_pending_reopen_dictionaries(&self) -> bool {
        self.queue.has_pending(TaskTag::ReopenDictionaries)
    }

    pub fn post_wait_for_dictionary_load(&mut self) -> PostOutcome {
        let delay = self.config.wait_for_dictionary_load();
        self.post(Task::WaitForDictionaryLoad, delay)
    }

    pub fn cancel_wait_for_dictionary_load(&mut self) {
        self.queue.cancel(TaskTag::WaitForDictionaryLoad);
    }

    pub fn has_pending_wait_for_dictionary_load(&self) -> bool {
        self.queue.has_pending(TaskTag::WaitForDictionaryLoad)
    }

    // ========== Memory ==========

    pub fn post_deallocate_memory(&mut self) -> PostOutcome {
        let delay = self.config.deallocate_memory();
        self.post(Task::DeallocateMemory, delay)
    }

    pub fn cancel_deallocate_memory(&mut self) {
        self.queue.cancel(TaskTag::DeallocateMemory);
    }

    pub fn has_pending_deallocate_memory(&self) -> bool {
        self.queue.has_pending(TaskTag::DeallocateMemory)
    }

    // ========== Orientation window ==========

    pub fn post_pending_ims_callback(&mut self) -> PostOutcome {
        let delay = self.config.pending_ims_callback();
        self.post(Task::PendingImsCallback, delay)
    }

    pub fn cancel_pending_ims_callback(&mut self) {
        self.queue.cancel(TaskTag::PendingImsCallback);
    }

    pub fn has_pending_ims_callback(&self) -> bool {
        self.queue.has_pending(TaskTag::PendingImsCallback)
    }

    // ========== Misc ==========

    pub fn post_switch_language(&mut self, subtype: Subtype) -> PostOutcome {
        self
            .post(Task::SwitchLanguage { subtype }, Duration::ZERO)
    }

    pub fn post_update_clipboard_pinned_clips(&mut self, clips: Vec<ClipboardEntry>) -> PostOutcome {
        self
            .post(Task::UpdateClipboardPinnedClips { clips }, Duration::ZERO)
    }

    pub fn post_broadcast(&mut self, broadcast: Broadcast) -> PostOutcome {
        self.post(Task::Broadcast(broadcast), Duration::ZERO)
    }
}
