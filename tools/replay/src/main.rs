//! softkey-replay
//!
//! Drives the dispatch core through a scripted host session on a virtual
//! clock and prints every collaborator call with its timestamp. Useful for
//! checking how a rotation or a burst of typing is coalesced without a
//! device.

mod recorder;
mod script;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use libsoftkey_core::{Config, Configuration, InputMethodService, ManualClock, RawKeyEvent};

use recorder::{HostState, SharedHost, SharedTranscript, Transcript};
use script::{HostCall, Script};

#[derive(Parser, Debug)]
#[command(name = "softkey-replay")]
#[command(about = "Replay a scripted host session against the dispatch core")]
struct Args {
    /// Session script (TOML)
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Scheduler timings (TOML); defaults are used when omitted
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Write the effective configuration to PATH before replaying
    #[arg(long, value_name = "PATH")]
    save_config: Option<PathBuf>,

    /// Log scheduler activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => Config::load_toml(path)?,
        None => Config::default(),
    };
    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }
    if let Some(path) = &args.save_config {
        config.save_toml(path)?;
        tracing::info!(path = %path.display(), "saved configuration");
    }

    let script = Script::load(&args.script)?;
    tracing::info!(steps = script.steps.len(), "loaded script");

    let transcript = replay(config, &script);
    for (at, line) in &transcript.lines {
        println!("[{at:>6}ms] {line}");
    }
    Ok(())
}

fn replay(config: Config, script: &Script) -> Transcript {
    let transcript: SharedTranscript = Rc::new(RefCell::new(Transcript::default()));
    let host_state: SharedHost = Rc::new(RefCell::new(HostState {
        subtypes: script.subtypes.clone(),
        current: 0,
        input_view_shown: true,
        dictionary_ready: true,
    }));

    let start = Instant::now();
    let clock = ManualClock::new(start);
    let (collaborators, keyboard, strip) = recorder::build(&transcript, &host_state);
    let mut service = InputMethodService::new(config, collaborators, clock.clone());
    service.attach_input_view(keyboard, Some(strip));
    service.on_create(script.device);

    let mut configuration = script.device;
    for step in &script.steps {
        pump_until(&mut service, &transcript, &clock, start, step.at_ms);
        transcript.borrow_mut().now_ms = step.at_ms;
        clock.set(start + Duration::from_millis(step.at_ms));
        apply(&mut service, &host_state, &mut configuration, &step.call);
    }

    let end_ms = script.last_step_ms() + script.settle_ms;
    pump_until(&mut service, &transcript, &clock, start, end_ms);

    service.on_destroy();
    transcript.take()
}

/// Run every task due up to `until_ms`, stopping at each deadline on the way
/// so retries posted by a task see the right clock.
fn pump_until(
    service: &mut InputMethodService,
    transcript: &SharedTranscript,
    clock: &ManualClock,
    start: Instant,
    until_ms: u64,
) {
    let until = start + Duration::from_millis(until_ms);
    while let Some(deadline) = service.next_deadline() {
        if deadline > until {
            break;
        }
        let at_ms = deadline.duration_since(start).as_millis() as u64;
        transcript.borrow_mut().now_ms = at_ms;
        clock.set(deadline);
        service.pump(deadline);
    }
    transcript.borrow_mut().now_ms = until_ms;
    clock.set(until);
    service.pump(until);
}

fn apply(
    service: &mut InputMethodService,
    host_state: &SharedHost,
    configuration: &mut Configuration,
    call: &HostCall,
) {
    match call {
        HostCall::StartInput { editor, restarting } => {
            service.on_start_input(editor.clone(), *restarting)
        }
        HostCall::StartInputView { editor, restarting } => {
            service.on_start_input_view(editor.clone(), *restarting)
        }
        HostCall::FinishInputView { finishing_input } => {
            service.on_finish_input_view(*finishing_input)
        }
        HostCall::FinishInput => service.on_finish_input(),
        HostCall::ConfigurationChanged {
            orientation,
            has_hardware_keyboard,
        } => {
            configuration.orientation = *orientation;
            configuration.has_hardware_keyboard = *has_hardware_keyboard;
            service.on_configuration_changed(*configuration);
        }
        HostCall::UpdateSelection {
            old_start,
            old_end,
            new_start,
            new_end,
        } => service.on_update_selection(*old_start, *old_end, *new_start, *new_end),
        HostCall::CodeInput { code, x, y, repeat } => service.on_code_input(*code, *x, *y, *repeat),
        HostCall::Text { text } => service.on_text_input(text),
        HostCall::KeyDown {
            device,
            key_code,
            unicode_char,
            shift,
        } => {
            let mut raw = RawKeyEvent::press(*device, *key_code, *unicode_char);
            raw.shift = *shift;
            if !service.on_key_down(&raw) {
                tracing::info!(key_code, "key returned to host");
            }
        }
        HostCall::KeyUp { device, key_code } => {
            service.on_key_up(&RawKeyEvent::press(*device, *key_code, 0));
        }
        HostCall::SwitchSubtype => {
            let before = host_state.borrow().current_subtype().cloned();
            service.switch_to_next_subtype();
            let after = host_state.borrow().current_subtype().cloned();
            if let Some(subtype) = after.filter(|after| Some(after) != before.as_ref()) {
                service.on_current_subtype_changed(&subtype);
            }
        }
        HostCall::DictionaryAvailable { available } => {
            host_state.borrow_mut().dictionary_ready = *available;
            service.handle().post_dictionary_availability(*available);
        }
        HostCall::WindowHidden => service.on_window_hidden(),
    }
}
