//! Event module - everything the game logic reacts to
//!
//! The engine is driven by one serialized event stream. UI events arrive
//! from outside; the remaining variants are scheduled by the engine itself
//! with a delay and re-enter through the same stream. Every internally
//! scheduled variant carries identity (epoch, selection, row id, score
//! change id) so a delivery that was superseded by newer state is detected
//! and dropped.

use token_trap_types::TokenId;

use crate::row::RowId;
use crate::state::{ScoreChangeId, Selection};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Inbound surface.
    /// Reset everything and start a fresh game
    NewGame,
    /// The hosting view appeared; bootstraps the first game
    GameAppeared,
    /// Player tapped a token
    TokenSelected(TokenId),
    /// Level intro or level-complete overlay finished
    LevelTransition,
    /// Player asked to leave; pauses, or dismisses when already over
    CloseSelected,
    /// Player confirmed leaving while paused
    CloseConfirmed,
    /// Player returned from the pause overlay
    GameResumed,

    // Internally scheduled.
    /// Row timer tick; stale once the timer restarts
    TimerFired { epoch: u64 },
    /// Delayed resolution of a completed selection
    SelectionUpdate(Selection),
    /// Delayed removal of a cleared row
    SolvedRow(RowId),
    /// The board emptied out mid-level; respawn a row
    EmptyBoard,
    /// A transient score change reached the end of its display window
    ScoreChangeExpired(ScoreChangeId),
}
