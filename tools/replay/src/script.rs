//! Session scripts: a device description plus timed host calls.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use libsoftkey_core::{Configuration, EditorInfo, Orientation, Subtype};

#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub device: Configuration,
    /// Enabled subtypes; the first one is current when the session starts
    #[serde(default, rename = "subtype")]
    pub subtypes: Vec<Subtype>,
    /// How long to keep pumping after the last step
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

fn default_settle_ms() -> u64 {
    15_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Milliseconds since the session started
    pub at_ms: u64,
    #[serde(flatten)]
    pub call: HostCall,
}

/// One call the host makes into the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    StartInput {
        editor: Option<EditorInfo>,
        #[serde(default)]
        restarting: bool,
    },
    StartInputView {
        editor: Option<EditorInfo>,
        #[serde(default)]
        restarting: bool,
    },
    FinishInputView {
        #[serde(default)]
        finishing_input: bool,
    },
    FinishInput,
    ConfigurationChanged {
        orientation: Orientation,
        #[serde(default)]
        has_hardware_keyboard: bool,
    },
    UpdateSelection {
        old_start: i32,
        old_end: i32,
        new_start: i32,
        new_end: i32,
    },
    CodeInput {
        code: i32,
        #[serde(default = "not_a_coordinate")]
        x: i32,
        #[serde(default = "not_a_coordinate")]
        y: i32,
        #[serde(default)]
        repeat: bool,
    },
    Text {
        text: String,
    },
    KeyDown {
        device: i32,
        key_code: i32,
        #[serde(default)]
        unicode_char: u32,
        #[serde(default)]
        shift: bool,
    },
    KeyUp {
        device: i32,
        key_code: i32,
    },
    SwitchSubtype,
    DictionaryAvailable {
        available: bool,
    },
    WindowHidden,
}

fn not_a_coordinate() -> i32 {
    libsoftkey_core::constants::NOT_A_COORDINATE
}

impl Script {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing script {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut script: Script = toml::from_str(content)?;
        if script.subtypes.is_empty() {
            bail!("script declares no [[subtype]]");
        }
        // Steps run in time order; equal times keep file order
        script.steps.sort_by_key(|step| step.at_ms);
        Ok(script)
    }

    pub fn last_step_ms(&self) -> u64 {
        self.steps.last().map(|step| step.at_ms).unwrap_or(0)
    }
}
