//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and event
//! processing. It has **zero dependencies** on UI, networking, or I/O,
//! making it:
//!
//! - **Deterministic**: Same seed produces identical boards (for replays and tests)
//! - **Testable**: The scheduler is injected, so tests run logical time synchronously
//! - **Portable**: Can run under any driver (async runtime, headless, tests)
//!
//! # Module Structure
//!
//! - [`logic`]: The authoritative state machine; `handle(event) -> State`
//! - [`generator`]: Procedural row construction (key sequences, disguises, challenges)
//! - [`timer`]: The restartable row spawn clock and per-level interval
//! - [`row`]: Board rows, coordinates, and adjacency
//! - [`state`]: The snapshot emitted after every event
//! - [`event`]: Inbound and internally scheduled events
//! - [`scheduler`]: Delayed event delivery abstraction
//! - [`stats`]: Aggregate score statistics with pluggable storage
//! - [`rng`]: Seeded LCG behind all procedural decisions
//!
//! # Game Rules
//!
//! Players pair adjacent tokens sharing exactly one attribute; the pair
//! converts to the unique token completing both. A horizontal pair whose
//! conversion equals the rotating target clears its row. Clearing 10 rows
//! finishes a level; letting the spawn timer fill an 8-row board ends the
//! game.
//!
//! # Example
//!
//! ```
//! use token_trap_core::{Event, GameLogic, QueueScheduler};
//! use token_trap_types::Settings;
//!
//! let mut game = GameLogic::new(Settings::default(), 12345, QueueScheduler::new());
//! let state = game.handle(Event::NewGame);
//! assert_eq!(state.level, 1);
//! assert!(state.target.is_some());
//!
//! // The intro overlay finished; rows spawn and the timer runs.
//! let state = game.handle(Event::LevelTransition);
//! assert_eq!(state.rows.len(), 1);
//! ```

pub mod event;
pub mod generator;
pub mod logic;
pub mod rng;
pub mod row;
pub mod scheduler;
pub mod state;
pub mod stats;
pub mod timer;

pub use token_trap_types as types;

// Re-export commonly used types for convenience
pub use event::Event;
pub use generator::RowGenerator;
pub use logic::GameLogic;
pub use rng::SimpleRng;
pub use row::{adjacency, coordinates_of, AdjacencyResult, Coordinates, Row, RowId, TokenMint};
pub use scheduler::{QueueScheduler, Scheduler};
pub use state::{ScoreChange, ScoreChangeId, Selection, SelectionId, SolvedRow, State};
pub use stats::{MemoryStore, Stats, StatsStorage, StatsStore, StatsValues};
pub use timer::{row_interval_ms, RowTimer, RowTimerTick};
