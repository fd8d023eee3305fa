//! Game loop thread: runs the simulation engine at 60Hz and forwards each
//! tick's report to the driver.
//!
//! The engine and its physics collaborator are created inside the thread, so
//! neither needs to be `Send`. Commands arrive via `mpsc` channel; reports go
//! back on a second channel and the latest snapshot is stored in shared state
//! for polling.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rampage_core::commands::{FrameInput, PlayerInput};
use rampage_core::constants::TARGET_FRAME_RATE;
use rampage_core::state::StatsSnapshot;
use rampage_sim::collaborators::{Building, StaticWorld};
use rampage_sim::engine::{SimConfig, SimulationEngine, TickReport};

use crate::state::LoopCommand;

/// Nominal duration of one frame.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TARGET_FRAME_RATE as u64);

/// Handles to a running game loop.
pub struct GameLoopHandle {
    pub commands: mpsc::Sender<LoopCommand>,
    pub reports: mpsc::Receiver<TickReport>,
    pub thread: JoinHandle<()>,
}

/// Spawns the game loop in a new thread over a static world of `buildings`.
pub fn spawn_game_loop(
    config: SimConfig,
    buildings: Vec<Building>,
    latest_snapshot: Arc<Mutex<Option<StatsSnapshot>>>,
) -> io::Result<GameLoopHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();
    let (report_tx, report_rx) = mpsc::channel::<TickReport>();

    let thread = std::thread::Builder::new()
        .name("rampage-game-loop".into())
        .spawn(move || {
            let physics = StaticWorld::with_buildings(buildings);
            let engine = SimulationEngine::new(config).with_physics(Box::new(physics));
            run_game_loop(engine, cmd_rx, report_tx, &latest_snapshot);
        })?;

    Ok(GameLoopHandle {
        commands: cmd_tx,
        reports: report_rx,
        thread,
    })
}

/// Apply every pending command. Returns false when the loop should stop.
fn drain_commands(
    engine: &mut SimulationEngine,
    input: &mut PlayerInput,
    cmd_rx: &mpsc::Receiver<LoopCommand>,
) -> bool {
    loop {
        match cmd_rx.try_recv() {
            Ok(LoopCommand::Host(cmd)) => engine.queue_command(cmd),
            Ok(LoopCommand::Input(latest)) => *input = latest,
            Ok(LoopCommand::Shutdown) => return false,
            Err(mpsc::TryRecvError::Empty) => return true,
            Err(mpsc::TryRecvError::Disconnected) => return false,
        }
    }
}

/// The game loop. Runs until Shutdown, or until either channel disconnects.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    report_tx: mpsc::Sender<TickReport>,
    latest_snapshot: &Mutex<Option<StatsSnapshot>>,
) {
    let mut input = PlayerInput::default();
    let mut last_frame = Instant::now();
    let mut next_tick_time = last_frame;

    loop {
        // 1. Drain all pending commands
        if !drain_commands(&mut engine, &mut input, &cmd_rx) {
            log::info!("Game loop shutting down at tick {}", engine.time().tick);
            return;
        }

        // 2. Advance one frame by the real time elapsed (engine clamps it)
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        let report = engine.tick(&FrameInput {
            dt,
            input,
            camera: None,
        });

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(engine.snapshot(None));
        }

        // 4. Hand the report to the driver
        if report_tx.send(report).is_err() {
            return;
        }

        // 5. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind, reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}
