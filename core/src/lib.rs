//! libsoftkey-core
//!
//! Deferred-message scheduler and input dispatch pipeline for soft-keyboard
//! input methods.
//!
//! The crate sits between a host text-editing surface and the components that
//! actually produce text (input logic, dictionaries, keyboard view). It
//! serializes and coalesces the host's lifecycle callbacks so a rotation never
//! applies the same field twice, and it turns every keystroke or gesture into
//! a transaction whose follow-up work (shift refresh, suggestion refresh) is
//! scheduled on a single cooperative task queue.
//!
//! Public API:
//! - `InputMethodService` - Session context and host entry points
//! - `Scheduler` / `SchedulerHandle` - Deferred, coalesced tasks with explicit time
//! - `Clock` / `ManualClock` - Time source read whenever a task is posted
//! - `CallbackCoalescer` - Orientation-change coalescing window
//! - `Pipeline` - Event to transaction to side effects
//! - `Event` and the `decoder` functions - Normalized input events
//! - `DeviceDecoderTable` - Per-device hardware decoders
//! - `SubtypeState` - One-step "switch back" subtype tracker
//! - `Config` - Scheduler timings and limits

pub mod constants;

pub mod config;
pub use config::Config;

pub mod error;
pub use error::ConfigError;

// Data model
pub mod context;
pub use context::{EditorInfo, InputPurpose};

pub mod event;
pub use event::{BatchPoint, Coordinates, Event, EventKind, EventSource, InputPointers};

pub mod transaction;
pub use transaction::{CapsState, InputStyle, InputTransaction, ScriptId, ShiftMode, ShiftUpdate};

pub mod suggestions;
pub use suggestions::{SuggestedWordInfo, SuggestedWords, SuggestionGate};

pub mod settings;
pub use settings::{Configuration, InputAttributes, Orientation, SettingsValues};

pub mod subtype;
pub use subtype::{Subtype, SubtypeState, SwitchTarget};

// Decoding
pub mod decoder;
pub use decoder::{
    DeviceId, HardwareEventDecoder, HardwareKeyboardEventDecoder, LayoutKind, RawKeyEvent,
};

pub mod decoder_cache;
pub use decoder_cache::{DecoderFactory, DeviceDecoderTable};

// Scheduling
pub mod clock;
pub use clock::{Clock, ManualClock, SystemClock};

pub mod task;
pub use task::{Broadcast, ClipboardEntry, GesturePreview, PostPolicy, Task, TaskTag};

pub mod scheduler;
pub use scheduler::{PostOutcome, Scheduler, SchedulerHandle, TaskQueue};

pub mod callbacks;
pub use callbacks::{CallbackCoalescer, CallbackWindow, DeferredCallbacks, LifecycleCall};

// Dispatch
pub mod collaborators;
pub use collaborators::{
    Collaborators, DictionaryFacilitator, Host, InputLogic, KeyboardView, SuggestionStrip,
};

pub mod pipeline;
pub use pipeline::Pipeline;

pub mod service;
pub use service::{InputMethodService, ServiceState};
