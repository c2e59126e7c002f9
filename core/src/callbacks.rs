//! Orientation-change coalescing of host lifecycle callbacks.
//!
//! When the device rotates, the host tears the input connection down and
//! rebuilds it, often delivering a second round of finish/start callbacks for
//! the very field that is already applied. Running those twice makes the
//! keyboard flicker and throws away composing state, so the coalescer opens a
//! short window after the first post-rotation start-input-view and records,
//! rather than runs, the callbacks that arrive inside it.
//!
//! The coalescer never calls the service itself. Every entry point returns
//! the list of [`LifecycleCall`]s the service must execute, in order.
//!
//! Window states:
//!
//! ```text
//! Idle ──start_orientation_changing──▶ ChangingOrientation
//! ChangingOrientation ──start_input(restarting)──▶ PendingSuccessive
//! PendingSuccessive ──start_input_view──▶ AwaitingSecondCallback (timer armed)
//! AwaitingSecondCallback ──start_input_view / timeout──▶ Idle
//! ```

use crate::context::EditorInfo;
use crate::scheduler::Scheduler;

/// A lifecycle callback the service must run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleCall {
    FinishInputView {
        finishing_input: bool,
    },
    FinishInput,
    StartInput {
        editor: Option<EditorInfo>,
        restarting: bool,
    },
    StartInputView {
        editor: Option<EditorInfo>,
        restarting: bool,
    },
}

/// Callbacks recorded while the window is armed. Each kind is kept once;
/// a later start-input replaces the descriptor of an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeferredCallbacks {
    finish_input_view: Option<bool>,
    finish_input: bool,
    start_input: Option<(Option<EditorInfo>, bool)>,
}

impl DeferredCallbacks {
    pub fn is_empty(&self) -> bool {
        self.finish_input_view.is_none() && !self.finish_input && self.start_input.is_none()
    }

    /// Calls in execution order: finish-view, finish-input, start-input.
    pub fn into_calls(self) -> Vec<LifecycleCall> {
        let mut calls = Vec::with_capacity(3);
        if let Some(finishing_input) = self.finish_input_view {
            calls.push(LifecycleCall::FinishInputView {
                finishing_input: finishing_input || self.finish_input,
            });
        }
        if self.finish_input {
            calls.push(LifecycleCall::FinishInput);
        }
        if let Some((editor, restarting)) = self.start_input {
            calls.push(LifecycleCall::StartInput { editor, restarting });
        }
        calls
    }
}

/// State of the coalescing window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CallbackWindow {
    #[default]
    Idle,
    /// The configuration changed; waiting for the restarting start-input
    ChangingOrientation,
    /// First restarting start-input seen; the next start-input-view arms
    /// the timer
    PendingSuccessive,
    /// Timer armed; callbacks are recorded until the window closes
    AwaitingSecondCallback { deferred: DeferredCallbacks },
}

/// Owner of the coalescing window and of the last applied editor descriptor.
#[derive(Debug, Default)]
pub struct CallbackCoalescer {
    window: CallbackWindow,
    applied_editor: Option<EditorInfo>,
}

impl CallbackCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self) -> &CallbackWindow {
        &self.window
    }

    pub fn applied_editor(&self) -> Option<&EditorInfo> {
        self.applied_editor.as_ref()
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.window, CallbackWindow::AwaitingSecondCallback { .. })
    }

    /// Forget everything; used when the service is destroyed.
    pub fn reset(&mut self) {
        self.window = CallbackWindow::Idle;
        self.applied_editor = None;
    }

    /// The device configuration is about to change orientation.
    pub fn start_orientation_changing(&mut self, scheduler: &mut Scheduler) {
        scheduler.cancel_pending_ims_callback();
        if let CallbackWindow::AwaitingSecondCallback { deferred } = &self.window {
            if !deferred.is_empty() {
                tracing::debug!(?deferred, "dropping deferred callbacks on orientation change");
            }
        }
        self.window = CallbackWindow::ChangingOrientation;
    }

    pub fn on_start_input(
        &mut self,
        scheduler: &mut Scheduler,
        editor: Option<EditorInfo>,
        restarting: bool,
    ) -> Vec<LifecycleCall> {
        let mut calls = self.close_if_orphaned(scheduler);

        if let CallbackWindow::AwaitingSecondCallback { deferred } = &mut self.window {
            tracing::debug!(restarting, "deferring start-input");
            deferred.start_input = Some((editor, restarting));
            return calls;
        }

        if restarting && self.window == CallbackWindow::ChangingOrientation {
            self.window = CallbackWindow::PendingSuccessive;
        }
        calls.push(LifecycleCall::StartInput { editor, restarting });
        calls
    }

    pub fn on_start_input_view(
        &mut self,
        scheduler: &mut Scheduler,
        editor: Option<EditorInfo>,
        restarting: bool,
    ) -> Vec<LifecycleCall> {
        let mut calls = self.close_if_orphaned(scheduler);

        if self.is_armed() {
            scheduler.cancel_pending_ims_callback();
            let deferred = match std::mem::take(&mut self.window) {
                CallbackWindow::AwaitingSecondCallback { deferred } => deferred,
                _ => DeferredCallbacks::default(),
            };
            if EditorInfo::equivalent_for_keyboard(editor.as_ref(), self.applied_editor.as_ref()) {
                tracing::debug!(?deferred, "duplicate start-input-view closes window");
                return calls;
            }
            tracing::debug!(?deferred, "new field closes window");
            calls.extend(deferred.into_calls());
        } else if self.window == CallbackWindow::PendingSuccessive {
            scheduler.post_pending_ims_callback();
            self.window = CallbackWindow::AwaitingSecondCallback {
                deferred: DeferredCallbacks::default(),
            };
        }

        self.applied_editor = editor.clone();
        calls.push(LifecycleCall::StartInputView { editor, restarting });
        scheduler.cancel_deallocate_memory();
        calls
    }

    pub fn on_finish_input_view(
        &mut self,
        scheduler: &mut Scheduler,
        finishing_input: bool,
    ) -> Vec<LifecycleCall> {
        let mut calls = self.close_if_orphaned(scheduler);

        if let CallbackWindow::AwaitingSecondCallback { deferred } = &mut self.window {
            tracing::debug!(finishing_input, "deferring finish-input-view");
            deferred.finish_input_view = Some(finishing_input);
            return calls;
        }

        calls.push(LifecycleCall::FinishInputView { finishing_input });
        self.applied_editor = None;
        if !scheduler.has_pending_deallocate_memory() {
            scheduler.post_deallocate_memory();
        }
        calls
    }

    pub fn on_finish_input(&mut self, scheduler: &mut Scheduler) -> Vec<LifecycleCall> {
        let mut calls = self.close_if_orphaned(scheduler);

        if let CallbackWindow::AwaitingSecondCallback { deferred } = &mut self.window {
            tracing::debug!("deferring finish-input");
            deferred.finish_input = true;
            return calls;
        }

        calls.push(LifecycleCall::FinishInput);
        calls
    }

    /// The window timer fired without a second start-input-view.
    pub fn on_timeout(&mut self) -> Vec<LifecycleCall> {
        match std::mem::take(&mut self.window) {
            CallbackWindow::AwaitingSecondCallback { deferred } => {
                tracing::debug!(?deferred, "orientation window timed out");
                deferred.into_calls()
            }
            other => {
                tracing::debug!(window = ?other, "stale orientation window timeout");
                self.window = other;
                Vec::new()
            }
        }
    }

    /// An armed window whose timer is gone can never close on its own.
    /// Close it and run what it recorded.
    fn close_if_orphaned(&mut self, scheduler: &Scheduler) -> Vec<LifecycleCall> {
        if self.is_armed() && !scheduler.has_pending_ims_callback() {
            tracing::warn!("orientation window lost its timer; force-closing");
            return self.on_timeout();
        }
        Vec::new()
    }
}
