//! Suggestion results and the gate that keeps stale ones off the strip.

use serde::{Deserialize, Serialize};

use crate::transaction::InputStyle;

/// One candidate word with its engine score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedWordInfo {
    pub word: String,
    pub score: i32,
}

impl SuggestedWordInfo {
    pub fn new(word: impl Into<String>, score: i32) -> Self {
        Self {
            word: word.into(),
            score,
        }
    }
}

/// A batch of suggestions ready for the strip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuggestedWords {
    pub words: Vec<SuggestedWordInfo>,
    /// The word as typed, when the engine reports it
    pub typed_word: Option<String>,
    pub input_style: InputStyle,
    /// Sequence number of the request; `None` for results not tied to one
    /// (completions, punctuation)
    pub sequence_number: Option<u64>,
    pub is_punctuation: bool,
}

impl SuggestedWords {
    /// An empty result, which the strip shows as its neutral state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Punctuation suggestions shown when nothing is being composed.
    pub fn punctuation(marks: &[String]) -> Self {
        Self {
            words: marks
                .iter()
                .map(|mark| SuggestedWordInfo::new(mark.clone(), 0))
                .collect(),
            is_punctuation: true,
            ..Self::default()
        }
    }

    /// Words supplied by the application itself.
    pub fn application_completions(words: Vec<SuggestedWordInfo>) -> Self {
        Self {
            words,
            input_style: InputStyle::ApplicationSpecified,
            ..Self::default()
        }
    }

    pub fn with_sequence(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn first_word(&self) -> Option<&str> {
        self.words.first().map(|info| info.word.as_str())
    }
}

/// Monotonic sequence numbers for suggestion requests.
///
/// Results arrive out of order when computed asynchronously. A result whose
/// sequence number is lower than the last one applied is dropped.
#[derive(Debug, Clone, Default)]
pub struct SuggestionGate {
    next: u64,
    last_applied: Option<u64>,
}

impl SuggestionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the sequence number for a new request.
    pub fn next_sequence(&mut self) -> u64 {
        let seq = self.next;
        self.next += 1;
        seq
    }

    /// Decide whether a result may be applied, recording it if so.
    pub fn admit(&mut self, sequence_number: Option<u64>) -> bool {
        let Some(seq) = sequence_number else {
            return true;
        };
        match self.last_applied {
            Some(last) if seq < last => {
                tracing::debug!(seq, last, "dropping stale suggestions");
                false
            }
            _ => {
                self.last_applied = Some(seq);
                true
            }
        }
    }

    pub fn last_applied(&self) -> Option<u64> {
        self.last_applied
    }
}
