//! sortie-run: headless scenario runner.
//!
//! Usage:
//!   sortie-run run --scenario intercept.json --seconds 30 --throttle --engage
//!   sortie-run defaults > scenario.json

use std::path::PathBuf;
use std::process;

use log::{info, warn};

use skylance_core::commands::{ControlState, PilotCommand};
use skylance_core::config::ScenarioConfig;
use skylance_core::enums::SeekerStatus;
use skylance_core::state::SimSnapshot;
use skylance_sim::SimulationEngine;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "defaults" => cmd_defaults(),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "sortie-run: Skylance headless scenario runner\n\
         \n\
         Commands:\n\
         \n\
         run       Fly a scenario and print the final snapshot as JSON\n\
         \n\
           --scenario <path>  Scenario JSON (optional, default: built-in)\n\
           --seconds <S>      Simulated duration (default: 10)\n\
           --frame <dt>       Frame time in seconds (default: one fixed tick)\n\
           --throttle         Hold throttle up for the whole sortie\n\
           --engage           Lock the first radar contact and fire when ready\n\
           --events           Print events as they happen (JSON lines on stderr)\n\
         \n\
         defaults  Print the built-in scenario as JSON\n\
         \n\
         Examples:\n\
         \n\
           sortie-run run --seconds 60 --throttle --engage\n\
           sortie-run defaults > scenario.json\n"
    );
}

fn parse_value(args: &[String], flag: &str) -> Option<String> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

fn parse_f64(args: &[String], flag: &str, default: f64) -> f64 {
    match parse_value(args, flag) {
        Some(text) => match text.parse::<f64>() {
            Ok(value) if value > 0.0 => value,
            _ => {
                eprintln!("Error: {flag} expects a positive number, got {text}");
                process::exit(1);
            }
        },
        None => default,
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn cmd_defaults() {
    match serde_json::to_string_pretty(&ScenarioConfig::default()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn cmd_run(args: &[String]) {
    let config = match parse_value(args, "--scenario").map(PathBuf::from) {
        Some(path) => match ScenarioConfig::load(&path) {
            Ok(config) => {
                info!("loaded scenario {}", path.display());
                config
            }
            Err(e) => {
                eprintln!("Error loading {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => ScenarioConfig::default(),
    };

    let seconds = parse_f64(args, "--seconds", 10.0);
    let frame_dt = parse_f64(args, "--frame", config.dt());
    let engage = has_flag(args, "--engage");
    let print_events = has_flag(args, "--events");

    let mut engine = SimulationEngine::new(config);
    engine.set_controls(ControlState {
        throttle_up: has_flag(args, "--throttle"),
        ..Default::default()
    });

    let frames = (seconds / frame_dt).ceil() as u64;
    let mut last = None;
    for _ in 0..frames {
        let snapshot = engine.frame(frame_dt);
        if print_events {
            for event in &snapshot.events {
                if let Ok(line) = serde_json::to_string(event) {
                    eprintln!("{line}");
                }
            }
        }
        if engage {
            engage_step(&mut engine, &snapshot);
        }
        last = Some(snapshot);
    }

    let Some(snapshot) = last else {
        warn!("no frames were run");
        return;
    };
    info!(
        "sortie over at t = {:.2} s ({} ticks)",
        snapshot.time.elapsed_secs, snapshot.time.tick
    );
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Scripted pilot: lock the first contact, arm the seeker, fire once ready.
fn engage_step(engine: &mut SimulationEngine, snapshot: &SimSnapshot) {
    let (Some(radar), Some(armament)) = (&snapshot.radar, &snapshot.armament) else {
        return;
    };
    if armament.remaining == 0 {
        return;
    }
    if radar.locked.is_none() {
        if !radar.contacts.is_empty() {
            engine.queue_commands([PilotCommand::CycleTarget, PilotCommand::ToggleLock]);
        }
        return;
    }
    let in_flight = !snapshot.missiles.is_empty();
    match armament.seeker {
        SeekerStatus::Off if !in_flight => engine.queue_command(PilotCommand::Fire),
        SeekerStatus::Ready => engine.queue_command(PilotCommand::Fire),
        _ => {}
    }
}
