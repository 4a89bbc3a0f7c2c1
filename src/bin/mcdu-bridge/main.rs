//! MCDU bridge entrypoint.
//!
//! # Architecture
//!
//! - Input thread: polls the panel for key reports and queues host commands
//! - Channel loop (main thread): websocket client that repaints the panel on
//!   every update and drains the command queue

mod channel;

use anyhow::{bail, Context, Result};
use crossbeam_channel::unbounded;
use hidapi::HidApi;
use mcdu_bridge::bridge::{spawn_input_thread, BridgeSession, InputPoller};
use mcdu_bridge::buttons::{ButtonDispatcher, MCDU_BINDINGS};
use mcdu_bridge::config::AppConfig;
use mcdu_bridge::device::{find_attached, list_attached, open_model, DeviceVariant};
use mcdu_bridge::{
    crash_log_path, init_logging, init_tracing, log_debug, log_file_path, tracing_log_path,
};
use std::panic;
use std::sync::{Arc, OnceLock};

use crate::channel::run_channel_loop;

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            mcdu_bridge::log_panic(info);
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());
            log_debug(&format!("panic at {location}"));
            previous(info);
        }));
    });
}

fn print_attached(api: &HidApi) {
    let attached = list_attached(api);
    if attached.is_empty() {
        println!("No supported MCDU devices attached.");
        return;
    }
    println!("Attached MCDU devices:");
    for model in attached {
        println!(
            "  {:04x}:{:04x}  {} ({})",
            model.vendor_id,
            model.product_id,
            model.name,
            DeviceVariant::from_mask(model.mask).label()
        );
    }
}

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_logging(&config);
    init_tracing(&config);
    install_panic_hook();
    log_debug("=== MCDU Bridge Started ===");
    log_debug(&format!("Log file: {:?}", log_file_path()));
    log_debug(&format!("Crash log: {:?}", crash_log_path()));
    log_debug(&format!("Trace log: {:?}", tracing_log_path()));

    let api = HidApi::new().context("failed to initialise hidapi")?;
    if config.list_devices {
        print_attached(&api);
        return Ok(());
    }

    let Some(model) = find_attached(&api) else {
        bail!("No compatible MCDU USB device found.");
    };
    let variant = config
        .variant
        .unwrap_or_else(|| DeviceVariant::from_mask(model.mask));
    log_debug(&format!("using {} as {}", model.name, variant.label()));
    println!("Found {} ({})", model.name, variant.label());

    let device = open_model(&api, model)?;
    let session = Arc::new(BridgeSession::new(device, variant));
    session.set_vertical_slew(config.vertical_slew());
    session.initialize()?;
    session.show_startup_screen()?;

    let (command_tx, command_rx) = unbounded::<String>();
    let poller = InputPoller::new(ButtonDispatcher::new(&MCDU_BINDINGS, variant, command_tx));
    let input = spawn_input_thread(Arc::clone(&session), poller, config.input_settings());

    let result = run_channel_loop(&session, &config, &command_rx);
    input.join();
    result
}
