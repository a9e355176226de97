//! Adapter runtime integration.
//!
//! Bridges the synchronous game logic with an async host: one tokio task
//! owns the logic and drains a single inbound event channel, so all state
//! mutation stays serialized. Delayed events are delivered by sleep tasks
//! feeding the same channel, and every emitted state snapshot is published
//! on a watch channel for any number of observers.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use token_trap_core::{Event, GameLogic, Scheduler, State, StatsStorage};
use token_trap_types::Settings;

/// Scheduler that re-enters delayed events through the pump's inbox
struct ChannelScheduler {
    tx: mpsc::UnboundedSender<Event>,
}

impl Scheduler for ChannelScheduler {
    fn schedule(&mut self, event: Event, delay_ms: u64) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            // The pump may be gone by delivery time; stale events just drop.
            let _ = tx.send(event);
        });
    }
}

/// Running game instance driven in real time
///
/// Must be created from within a tokio runtime. Dropping the handle stops
/// the pump.
pub struct GameRuntime {
    events_tx: mpsc::UnboundedSender<Event>,
    state_rx: watch::Receiver<State>,
    task: JoinHandle<()>,
}

impl GameRuntime {
    /// Spawn a game with in-memory stats backing
    pub fn spawn(settings: Settings, seed: u32) -> Self {
        Self::spawn_with_stats(settings, seed, StatsStorage::in_memory(settings))
    }

    pub fn spawn_with_stats(settings: Settings, seed: u32, stats: StatsStorage) -> Self {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel::<Event>();
        let scheduler = ChannelScheduler {
            tx: events_tx.clone(),
        };
        let mut logic = GameLogic::with_stats(settings, seed, scheduler, stats);
        let (state_tx, state_rx) = watch::channel(logic.state().clone());

        let task = tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                let state = logic.handle(event);
                if state_tx.send(state).is_err() {
                    break;
                }
            }
        });

        Self {
            events_tx,
            state_rx,
            task,
        }
    }

    /// Enqueue a UI event; processing order matches send order
    pub fn send(&self, event: Event) {
        let _ = self.events_tx.send(event);
    }

    /// Subscribe to state snapshots (one per handled event)
    pub fn watch(&self) -> watch::Receiver<State> {
        self.state_rx.clone()
    }

    /// The most recently emitted snapshot
    pub fn current_state(&self) -> State {
        self.state_rx.borrow().clone()
    }
}

impl Drop for GameRuntime {
    fn drop(&mut self) {
        self.task.abort();
    }
}
