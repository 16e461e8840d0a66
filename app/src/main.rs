use anyhow::{Context, anyhow};
use clap::Parser;
use phosphor_core::{
    ChannelSet, Config, FrameSource, Scope, Summary, SystemClock,
    initial_window_size,
};
use phosphor_decode::Decoded;
use phosphor_player::{PcmCursor, Player};
use sdl2::video::FullscreenType;
use std::{
    path::Path,
    process::ExitCode,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

mod args;
mod display;

use args::{Args, USAGE};
use display::SdlDisplay;

/// How long audio plays before the first batch is drawn. Roughly the
/// output latency of the audio device.
const AUDIO_LEAD: Duration = Duration::from_millis(100);

fn run(
    input: &Path,
    config: Config,
    interrupted: Arc<AtomicBool>,
) -> anyhow::Result<Summary> {
    let decoded = Decoded::run(input, &interrupted)?;
    let mut source = FrameSource::open(decoded.path())
        .context("Failed to open sound file")?;
    let cursor =
        PcmCursor::load(decoded.path()).context("Failed to open sound file")?;
    let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
    let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
    let (width, height) = initial_window_size(config.rotate);
    let mut window = video_subsystem
        .window("phosphor", width, height)
        .position_centered()
        .resizable()
        .build()?;
    if config.fullscreen {
        window
            .set_fullscreen(FullscreenType::Desktop)
            .map_err(|e| anyhow!(e))?;
    }
    // No vsync. The loop paces itself against the audio.
    let canvas = window.into_canvas().target_texture().build()?;
    let texture_creator = canvas.texture_creator();
    let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;
    let mut display = SdlDisplay::new(
        canvas,
        &texture_creator,
        event_pump,
        config.rotate,
        interrupted,
    )?;
    let player = Player::new().context("Failed to open audio")?;
    let stream = player
        .play(cursor, Default::default())
        .context("Failed to open audio")?;
    thread::sleep(AUDIO_LEAD);
    let mut scope = Scope::new(ChannelSet::for_mode(config.mode));
    let summary = scope.run(
        &mut source,
        &mut display,
        &mut SystemClock::new(),
        move || {
            drop(stream);
            drop(decoded);
        },
    )?;
    Ok(summary)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };
    let (input, config) = match args.validate() {
        Ok(Some(valid)) => valid,
        Ok(None) => {
            eprintln!("Usage: {}", USAGE);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!("Usage: {}", USAGE);
            return ExitCode::FAILURE;
        }
    };
    log::info!("{:?}", config);
    // Installed before anything that needs cleaning up is created. SDL leaves
    // an existing SIGINT handler in place, so this also covers the render
    // loop.
    let interrupted = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::Relaxed);
    }) {
        eprintln!("Error: failed to install interrupt handler: {}", e);
        return ExitCode::FAILURE;
    }
    match run(&input, config, interrupted) {
        Ok(summary) => {
            log::info!("{:?}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
