//! State module - the snapshot emitted after every handled event
//!
//! `State` is the single source of truth the rendering layer consumes. The
//! game logic mutates its own copy and hands out a fresh clone per event;
//! observers never share mutable state with the engine.

use token_trap_types::{GamePhase, SelectionStatus, Token, TokenId, TokenPair};

use crate::row::{Row, RowId};
use crate::stats::Stats;

/// Stable identity of a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionId(pub u32);

/// A tap-driven pairing attempt
///
/// Born on the first tap, completed on the second, removed once its delayed
/// resolution runs. At most the most recent selection is live; older entries
/// are already resolving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub id: SelectionId,
    pub token1: Token,
    pub token_pair: Option<TokenPair>,
    pub status: SelectionStatus,
}

impl Selection {
    pub fn contains(&self, id: TokenId) -> bool {
        self.token1.id == id || self.token_pair.map_or(false, |p| p.contains(id))
    }
}

/// A row whose clear has been recorded but not yet applied
///
/// The row stays on the board (immutable to further selection) until the
/// removal event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolvedRow {
    pub row_id: RowId,
    /// Column span of the matched pair, for the clear highlight
    pub target_pair_range: (usize, usize),
}

/// Stable identity of a transient score change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoreChangeId(pub u32);

/// Short-lived score delta surfaced to the UI, auto-expiring after 1s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreChange {
    pub id: ScoreChangeId,
    pub amount: u32,
}

/// Complete game state snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// Increments per game; stats storage uses it to dedupe reports
    pub game_id: u32,
    pub rows: Vec<Row>,
    pub selections: Vec<Selection>,
    pub solved_rows: Vec<SolvedRow>,
    /// Training-mode pointer at the hinted key token, if any is on the board
    pub next_training_hint_token: Option<TokenId>,
    /// The token combination a full match must equal to clear a row
    pub target: Option<Token>,
    pub level: u32,
    pub score: u32,
    pub score_changes: Vec<ScoreChange>,
    /// Current row timer indicator value (0..=4)
    pub timer_value: u8,
    /// `None` while play is active
    pub game_phase: Option<GamePhase>,
    /// Populated once, when the game ends
    pub stats: Option<Stats>,
}

impl State {
    pub fn new(game_id: u32) -> Self {
        Self {
            game_id,
            rows: Vec::new(),
            selections: Vec::new(),
            solved_rows: Vec::new(),
            next_training_hint_token: None,
            target: None,
            level: 1,
            score: 0,
            score_changes: Vec::new(),
            timer_value: 0,
            game_phase: None,
            stats: None,
        }
    }

    /// Active play: no phase overlay is showing
    pub fn is_active(&self) -> bool {
        self.game_phase.is_none()
    }

    pub fn row_is_solved(&self, row_id: RowId) -> bool {
        self.solved_rows.iter().any(|s| s.row_id == row_id)
    }

    /// Rows occupying grid capacity (solved rows awaiting removal excluded)
    pub fn unsolved_row_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| !self.row_is_solved(r.id))
            .count()
    }

    pub fn find_token(&self, id: TokenId) -> Option<&Token> {
        self.rows.iter().find_map(|r| r.token(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::TokenMint;
    use arrayvec::ArrayVec;
    use token_trap_types::{Attributes, TokenColor, TokenIcon, GRID_SIZE};

    fn row(mint: &mut TokenMint) -> Row {
        let tokens: ArrayVec<Token, GRID_SIZE> = (0..GRID_SIZE)
            .map(|_| mint.token(Attributes::new(TokenColor::Gray, TokenIcon::Face)))
            .collect();
        Row::new(mint.row_id(), tokens, None)
    }

    #[test]
    fn fresh_state_is_active() {
        let state = State::new(1);
        assert!(state.is_active());
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert!(state.rows.is_empty());
        assert!(state.stats.is_none());
    }

    #[test]
    fn unsolved_count_excludes_pending_removals() {
        let mut mint = TokenMint::new();
        let mut state = State::new(1);
        state.rows.push(row(&mut mint));
        state.rows.push(row(&mut mint));
        assert_eq!(state.unsolved_row_count(), 2);

        state.solved_rows.push(SolvedRow {
            row_id: state.rows[0].id,
            target_pair_range: (2, 3),
        });
        assert_eq!(state.unsolved_row_count(), 1);
        assert!(state.row_is_solved(state.rows[0].id));
        assert!(!state.row_is_solved(state.rows[1].id));
    }

    #[test]
    fn selection_contains_covers_pair_tokens() {
        let mut mint = TokenMint::new();
        let a = mint.token(Attributes::new(TokenColor::Red, TokenIcon::Die));
        let b = mint.token(Attributes::new(TokenColor::Red, TokenIcon::Face));
        let c = mint.token(Attributes::new(TokenColor::Blue, TokenIcon::Die));

        let first_tap = Selection {
            id: SelectionId(1),
            token1: a,
            token_pair: None,
            status: token_trap_types::SelectionStatus::Selected,
        };
        assert!(first_tap.contains(a.id));
        assert!(!first_tap.contains(b.id));

        let completed = Selection {
            token_pair: Some(TokenPair::new(a, b)),
            ..first_tap
        };
        assert!(completed.contains(b.id));
        assert!(!completed.contains(c.id));
    }
}
