//! `rampage-headless [TUNING.json] [SECONDS]`
//!
//! Runs one scripted run in the demo town and logs what the scene layer
//! would have been told. Set `RUST_LOG=debug` for system-level detail.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use glam::Vec2;

use rampage_app::city::demo_city;
use rampage_app::game_loop::spawn_game_loop;
use rampage_app::state::{HostState, LoopCommand};
use rampage_core::commands::{HostCommand, PlayerInput};
use rampage_core::config::GameTuning;
use rampage_core::enums::GamePhase;
use rampage_core::events::GameEvent;
use rampage_sim::engine::SimConfig;

const DEFAULT_RUN_SECS: u64 = 30;

fn load_tuning(path: Option<&str>) -> Result<GameTuning> {
    let Some(path) = path else {
        return Ok(GameTuning::default());
    };
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading tuning file {path}"))?;
    GameTuning::from_json(&json).with_context(|| format!("loading tuning from {path}"))
}

/// Wander in widening circles, swinging every half second.
fn autopilot(elapsed: f32) -> PlayerInput {
    let angle = elapsed * 0.8;
    PlayerInput {
        movement: Vec2::new(angle.cos(), angle.sin()),
        action_held: (elapsed * 2.0).fract() < 0.5,
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::KillNotification {
            message,
            points,
            combo,
            is_pursuit,
        } => {
            let pursuit = if *is_pursuit { ", pursuit" } else { "" };
            log::info!("{message} +{points} (x{combo}{pursuit})")
        }
        GameEvent::TierUnlocked { tier, as_awaiting } => {
            log::info!("Unlocked {tier:?}{}", if *as_awaiting { " (waiting)" } else { "" })
        }
        GameEvent::VehicleSwapped { from, to } => log::info!("Swapped {from:?} -> {to:?}"),
        GameEvent::VehicleDestroyed { tier } => log::info!("{tier:?} destroyed"),
        GameEvent::RampageStarted { path } => log::info!("RAMPAGE ({path:?})"),
        GameEvent::RampageEnded { forced } => {
            log::info!("Rampage over{}", if *forced { " (out of fuel)" } else { "" })
        }
        GameEvent::AdversaryDismounted { from, .. } => log::info!("{from:?} rider dismounted"),
        GameEvent::PlayerTased { secs } => log::info!("Tased for {secs:.1}s"),
        GameEvent::StatsUpdate(_)
        | GameEvent::GameOver(_)
        | GameEvent::SpawnEffect { .. }
        | GameEvent::SceneryVisibility { .. }
        | GameEvent::GlowIntensity { .. } => log::trace!("{event:?}"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let tuning = load_tuning(args.first().map(String::as_str))?;
    let run_secs = match args.get(1) {
        Some(s) => s.parse().with_context(|| format!("invalid run length `{s}`"))?,
        None => DEFAULT_RUN_SECS,
    };

    let state = HostState::new();
    let config = SimConfig {
        tuning,
        ..Default::default()
    };
    let handle = spawn_game_loop(config, demo_city(), state.latest_snapshot.clone())
        .context("spawning game loop")?;
    if let Ok(mut tx) = state.command_tx.lock() {
        *tx = Some(handle.commands.clone());
    }

    state.send(LoopCommand::Host(HostCommand::StartRun));
    let started = Instant::now();
    let deadline = Duration::from_secs(run_secs);

    while started.elapsed() < deadline {
        state.send(LoopCommand::Input(autopilot(started.elapsed().as_secs_f32())));
        let Ok(report) = handle.reports.recv_timeout(Duration::from_secs(1)) else {
            anyhow::bail!("game loop stopped responding");
        };
        report.events.iter().for_each(log_event);
        if report.phase == GamePhase::GameOver {
            break;
        }
    }

    state.send(LoopCommand::Shutdown);
    if handle.thread.join().is_err() {
        anyhow::bail!("game loop thread panicked");
    }

    if let Some(snapshot) = state.latest() {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}
