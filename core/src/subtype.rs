//! Subtypes and the one-step "switch back" tracker.

use serde::{Deserialize, Serialize};

/// A language/layout variant of the input method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subtype {
    pub id: u32,
    /// BCP-47 locale tag
    pub locale: String,
    /// Keyboard layout name (e.g. "qwerty")
    pub layout: String,
}

impl Subtype {
    pub fn new(id: u32, locale: impl Into<String>, layout: impl Into<String>) -> Self {
        Self {
            id,
            locale: locale.into(),
            layout: layout.into(),
        }
    }
}

/// What a subtype switch request resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchTarget {
    /// Toggle straight back to this subtype.
    Subtype(Subtype),
    /// Let the host cycle to the next input method / subtype.
    NextInputMethod,
}

/// Remembers the last subtype the user actually typed with.
#[derive(Debug, Clone, Default)]
pub struct SubtypeState {
    last_active: Option<Subtype>,
    current_used: bool,
}

impl SubtypeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that the current subtype produced a document change.
    pub fn mark_current_used(&mut self) {
        self.current_used = true;
    }

    pub fn is_current_used(&self) -> bool {
        self.current_used
    }

    pub fn last_active(&self) -> Option<&Subtype> {
        self.last_active.as_ref()
    }

    /// Resolve a "switch to next subtype" request.
    ///
    /// The current subtype is recorded as last-active only if it was used.
    /// The toggle target is the last-active subtype known before this call.
    pub fn switch_subtype(
        &mut self,
        current: &Subtype,
        is_enabled: impl Fn(&Subtype) -> bool,
    ) -> SwitchTarget {
        let previous = self.last_active.clone();

        if self.current_used {
            self.last_active = Some(current.clone());
            self.current_used = false;
        }

        match previous {
            Some(target) if target != *current && is_enabled(&target) => {
                tracing::debug!(from = %current.locale, to = %target.locale, "toggling back to last active subtype");
                SwitchTarget::Subtype(target)
            }
            _ => SwitchTarget::NextInputMethod,
        }
    }
}
