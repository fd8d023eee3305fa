//! Host state shared between the driver and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use rampage_core::commands::{HostCommand, PlayerInput};
use rampage_core::state::StatsSnapshot;

/// Messages sent from the driver to the game loop thread.
#[derive(Debug, Clone)]
pub enum LoopCommand {
    /// A run-level command to queue on the engine.
    Host(HostCommand),
    /// Latest controller state; held until the next one arrives.
    Input(PlayerInput),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// State the driver keeps while a game loop is running.
///
/// - `command_tx` is `None` until a loop has been spawned
/// - `latest_snapshot` is shared with the loop thread for polling
pub struct HostState {
    pub command_tx: Mutex<Option<mpsc::Sender<LoopCommand>>>,
    /// Updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<StatsSnapshot>>>,
}

impl Default for HostState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a command to the loop. Returns false when no loop is listening.
    pub fn send(&self, command: LoopCommand) -> bool {
        let Ok(guard) = self.command_tx.lock() else {
            return false;
        };
        match guard.as_ref() {
            Some(tx) => tx.send(command).is_ok(),
            None => false,
        }
    }

    /// Clone of the most recent snapshot, if a tick has completed.
    pub fn latest(&self) -> Option<StatsSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }
}
