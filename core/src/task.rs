//! Tasks carried by the deferred-message scheduler.

use crate::subtype::Subtype;
use crate::suggestions::SuggestedWords;
use crate::transaction::InputStyle;

/// What to do with the gesture floating preview when a strip update lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GesturePreview {
    /// Not a gesture update; leave the preview alone
    NotGesture,
    Show,
    Dismiss,
}

/// A pinned clipboard entry as shown on the clipboard keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    pub id: u64,
    pub text: String,
    pub time_stamp: i64,
}

/// System notifications the service subscribes to on create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Broadcast {
    PackageAdded(String),
    PackageRemoved(String),
    /// A dictionary pack delivered a new dictionary
    NewDictionary,
    RingerModeChanged,
    /// The device was unlocked after a direct-boot start
    UserUnlocked,
    HideSoftInput,
}

/// A unit of deferred work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    UpdateShiftState,
    /// Orientation-change window timeout
    PendingImsCallback,
    UpdateSuggestionStrip {
        input_style: InputStyle,
    },
    ShowSuggestionStrip {
        words: SuggestedWords,
        preview: GesturePreview,
    },
    ResumeSuggestions {
        include_resumed_word: bool,
    },
    ResumeSuggestionsForStartInput,
    ReopenDictionaries,
    ShowTailBatchInputResult {
        words: SuggestedWords,
    },
    /// Resync input-logic caches with the cursor after a failed attempt
    ResetCaches {
        try_resume_suggestions: bool,
        remaining_tries: u32,
    },
    WaitForDictionaryLoad,
    DeallocateMemory,
    SwitchLanguage {
        subtype: Subtype,
    },
    UpdateClipboardPinnedClips {
        clips: Vec<ClipboardEntry>,
    },
    /// Main dictionary readiness reported by a loader thread
    DictionaryAvailability {
        available: bool,
    },
    Broadcast(Broadcast),
}

/// Identity of a task, independent of its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskTag {
    UpdateShiftState,
    PendingImsCallback,
    UpdateSuggestionStrip,
    ShowSuggestionStrip,
    ResumeSuggestions,
    ResumeSuggestionsForStartInput,
    ReopenDictionaries,
    ShowTailBatchInputResult,
    ResetCaches,
    WaitForDictionaryLoad,
    DeallocateMemory,
    SwitchLanguage,
    UpdateClipboardPinnedClips,
    DictionaryAvailability,
    Broadcast,
}

/// How a new post interacts with an already queued task of the same tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostPolicy {
    /// Queue alongside any existing instance
    Append,
    /// Replace the queued instance; last write wins
    Coalesce,
}

impl TaskTag {
    pub const ALL: [TaskTag; 15] = [
        TaskTag::UpdateShiftState,
        TaskTag::PendingImsCallback,
        TaskTag::UpdateSuggestionStrip,
        TaskTag::ShowSuggestionStrip,
        TaskTag::ResumeSuggestions,
        TaskTag::ResumeSuggestionsForStartInput,
        TaskTag::ReopenDictionaries,
        TaskTag::ShowTailBatchInputResult,
        TaskTag::ResetCaches,
        TaskTag::WaitForDictionaryLoad,
        TaskTag::DeallocateMemory,
        TaskTag::SwitchLanguage,
        TaskTag::UpdateClipboardPinnedClips,
        TaskTag::DictionaryAvailability,
        TaskTag::Broadcast,
    ];

    pub fn policy(self) -> PostPolicy {
        match self {
            TaskTag::ReopenDictionaries | TaskTag::DictionaryAvailability | TaskTag::Broadcast => {
                PostPolicy::Append
            }
            _ => PostPolicy::Coalesce,
        }
    }

    /// Timers that belong to one editing session and are dropped when a new
    /// one starts.
    pub fn is_session_scoped(self) -> bool {
        matches!(
            self,
            TaskTag::UpdateShiftState
                | TaskTag::UpdateSuggestionStrip
                | TaskTag::ResumeSuggestions
                | TaskTag::ResumeSuggestionsForStartInput
                | TaskTag::ResetCaches
                | TaskTag::WaitForDictionaryLoad
                | TaskTag::DeallocateMemory
        )
    }
}

impl Task {
    pub fn tag(&self) -> TaskTag {
        match self {
            Task::UpdateShiftState => TaskTag::UpdateShiftState,
            Task::PendingImsCallback => TaskTag::PendingImsCallback,
            Task::UpdateSuggestionStrip { .. } => TaskTag::UpdateSuggestionStrip,
            Task::ShowSuggestionStrip { .. } => TaskTag::ShowSuggestionStrip,
            Task::ResumeSuggestions { .. } => TaskTag::ResumeSuggestions,
            Task::ResumeSuggestionsForStartInput => TaskTag::ResumeSuggestionsForStartInput,
            Task::ReopenDictionaries => TaskTag::ReopenDictionaries,
            Task::ShowTailBatchInputResult { .. } => TaskTag::ShowTailBatchInputResult,
            Task::ResetCaches { .. } => TaskTag::ResetCaches,
            Task::WaitForDictionaryLoad => TaskTag::WaitForDictionaryLoad,
            Task::DeallocateMemory => TaskTag::DeallocateMemory,
            Task::SwitchLanguage { .. } => TaskTag::SwitchLanguage,
            Task::UpdateClipboardPinnedClips { .. } => TaskTag::UpdateClipboardPinnedClips,
            Task::DictionaryAvailability { .. } => TaskTag::DictionaryAvailability,
            Task::Broadcast(_) => TaskTag::Broadcast,
        }
    }
}
