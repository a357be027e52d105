// Copyright (c) 2026 The minute-minder Authors. All rights reserved.

//! The minute-minder binary: a terminal stopwatch that chimes three times
//! at every full-minute mark while it runs.

use anyhow::Result;
use clap::Parser;
use crossbeam_channel::{unbounded, Sender};
use minute_minder::{
    app_version,
    audio::{AudioInterfaceEvent, AudioInterfaceInput, AudioStreamService},
    synth::{Waveform, DEFAULT_PITCH},
    Session,
};
use std::{
    io::{self, BufRead, Write},
    thread,
    time::{Duration, Instant},
};

/// How often the control loop resamples the stopwatch. Far finer than the
/// one-second granularity of the minute check, so a boundary's window can't
/// be skipped between samples.
const SAMPLE_PERIOD: Duration = Duration::from_millis(10);

/// How long the first Start waits for the audio interface to come up before
/// giving up on activation.
const ACTIVATION_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[clap(author, about, long_about = None)]
struct Args {
    /// Chime pitch in Hz
    #[clap(short = 'p', long, default_value_t = DEFAULT_PITCH)]
    pitch: f64,

    /// Chime waveform (sine, square, triangle)
    #[clap(short = 'w', long, default_value = "sine")]
    waveform: Waveform,

    /// Enable debug logging
    #[clap(short = 'd', long, value_parser)]
    debug: bool,

    /// Suppress the live display
    #[clap(short = 'q', long, value_parser)]
    quiet: bool,

    /// Print version and exit
    #[clap(short = 'v', long, value_parser)]
    version: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Command {
    StartStop,
    Reset,
    Quit,
}

// Blocking stdin reader on its own thread; the control loop polls the
// channel. EOF counts as quit so a closed stdin doesn't leave the loop
// running headless.
fn spawn_stdin_reader(sender: Sender<Command>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let command = match line.trim() {
                "" | "s" | "p" | "start" | "pause" => Command::StartStop,
                "r" | "reset" => Command::Reset,
                "q" | "quit" | "exit" => Command::Quit,
                other => {
                    println!("unrecognized command: {other:?}");
                    continue;
                }
            };
            if sender.send(command).is_err() || command == Command::Quit {
                break;
            }
        }
        let _ = sender.send(Command::Quit);
    });
}

/// The one-time audio activation step. Brings up the audio service, waits
/// for its first Reset event, and hands the session the queue and sample
/// rate. On failure the start action is aborted: we log the cause and the
/// session stays stopped, with no propagated error.
fn activate_audio(session: &mut Session) -> Option<AudioStreamService> {
    let service = AudioStreamService::start();
    let deadline = Instant::now() + ACTIVATION_TIMEOUT;
    loop {
        match service.receiver().recv_deadline(deadline) {
            Ok(AudioInterfaceEvent::Reset(sample_rate, queue)) => {
                session.set_audio_ready(sample_rate, queue);
                let _ = service.sender().send(AudioInterfaceInput::Play);
                return Some(service);
            }
            Ok(AudioInterfaceEvent::StartupFailed(reason)) => {
                log::warn!("audio activation failed: {reason}");
                return None;
            }
            // The stream can start asking for samples before we've seen the
            // Reset event. Not ready yet; keep waiting.
            Ok(AudioInterfaceEvent::NeedsAudio(_)) => continue,
            Err(_) => {
                log::warn!("audio activation timed out");
                return None;
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if args.version {
        println!("minute-minder {}", app_version());
        return Ok(());
    }

    let (command_sender, command_receiver) = unbounded();
    spawn_stdin_reader(command_sender);

    let mut session = Session::new_with(args.waveform, args.pitch);
    let mut audio: Option<AudioStreamService> = None;

    if !args.quiet {
        println!("minute-minder {}", app_version());
        println!("commands: [enter] start/pause, r reset, q quit");
    }

    let mut last_display = String::default();
    'control: loop {
        while let Ok(command) = command_receiver.try_recv() {
            match command {
                Command::StartStop => {
                    if !session.audio_ready() {
                        match activate_audio(&mut session) {
                            Some(service) => audio = Some(service),
                            // Activation failed; the start action is
                            // aborted and "nothing happens".
                            None => continue,
                        }
                    }
                    session.toggle(Instant::now());
                }
                Command::Reset => {
                    session.reset();
                }
                Command::Quit => break 'control,
            }
        }

        session.advance(Instant::now());

        if let Some(service) = audio.as_ref() {
            while let Ok(event) = service.receiver().try_recv() {
                match event {
                    AudioInterfaceEvent::NeedsAudio(count) => session.supply_audio(count),
                    AudioInterfaceEvent::Reset(sample_rate, queue) => {
                        session.set_audio_ready(sample_rate, queue)
                    }
                    AudioInterfaceEvent::StartupFailed(reason) => {
                        log::warn!("audio interface failed: {reason}")
                    }
                }
            }
        }

        if !args.quiet {
            let display = session.display();
            if display != last_display {
                print!("\r{display} ");
                io::stdout().flush()?;
                last_display = display;
            }
        }

        thread::sleep(SAMPLE_PERIOD);
    }

    if let Some(service) = audio.as_ref() {
        let _ = service.sender().send(AudioInterfaceInput::Quit);
    }
    if !args.quiet {
        println!();
    }
    Ok(())
}
