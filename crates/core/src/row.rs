//! Row module - board rows, coordinates, and adjacency
//!
//! The board is an ordered stack of rows, newest at index 0. Each row holds
//! exactly 8 tokens in a fixed-capacity array. Rows keep their identity for
//! their whole lifetime; cells are replaced in place when a partial match
//! converts.
//!
//! Coordinates are (row index, column index) derived from row order and
//! token position. All lookups key on token ids, never on attributes, since
//! attribute-equal duplicates coexist on the board.

use arrayvec::ArrayVec;

use token_trap_types::{Attributes, ChallengeType, Token, TokenId, GRID_SIZE};

/// Stable identity of a row instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(pub u32);

/// One board row: 8 tokens plus an optional challenge tag
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RowId,
    pub tokens: ArrayVec<Token, GRID_SIZE>,
    pub challenge_type: Option<ChallengeType>,
}

impl Row {
    pub fn new(
        id: RowId,
        tokens: ArrayVec<Token, GRID_SIZE>,
        challenge_type: Option<ChallengeType>,
    ) -> Self {
        Self {
            id,
            tokens,
            challenge_type,
        }
    }

    /// Column index of a token in this row
    pub fn position_of(&self, id: TokenId) -> Option<usize> {
        self.tokens.iter().position(|t| t.id == id)
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.position_of(id).is_some()
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Replace a token in place, preserving row identity
    pub fn replace(&mut self, id: TokenId, replacement: Token) -> bool {
        match self.position_of(id) {
            Some(index) => {
                self.tokens[index] = replacement;
                true
            }
            None => false,
        }
    }
}

/// Board position of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinates {
    pub row: usize,
    pub column: usize,
}

/// Spatial relation between two tapped tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjacencyResult {
    NotAdjacent,
    /// Same column, row indices differ by 1
    AdjacentVertical,
    /// Same row, column indices differ by 1; the only relation that can clear
    AdjacentHorizontal,
}

/// Locate a token anywhere on the board
pub fn coordinates_of(rows: &[Row], id: TokenId) -> Option<Coordinates> {
    rows.iter().enumerate().find_map(|(row, r)| {
        r.position_of(id).map(|column| Coordinates { row, column })
    })
}

/// Classify the spatial relation between two tokens on the board
pub fn adjacency(rows: &[Row], a: TokenId, b: TokenId) -> AdjacencyResult {
    let (Some(ca), Some(cb)) = (coordinates_of(rows, a), coordinates_of(rows, b)) else {
        return AdjacencyResult::NotAdjacent;
    };
    if ca.row == cb.row && ca.column.abs_diff(cb.column) == 1 {
        return AdjacencyResult::AdjacentHorizontal;
    }
    if ca.column == cb.column && ca.row.abs_diff(cb.row) == 1 {
        return AdjacencyResult::AdjacentVertical;
    }
    AdjacencyResult::NotAdjacent
}

/// Allocator for token and row identities
///
/// Ids increase monotonically within a game instance; they are never reused,
/// which is what lets delayed events detect staleness.
#[derive(Debug, Default)]
pub struct TokenMint {
    next_token: u32,
    next_row: u32,
}

impl TokenMint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&mut self, attributes: Attributes) -> Token {
        self.next_token += 1;
        Token::new(TokenId(self.next_token), attributes)
    }

    pub fn row_id(&mut self) -> RowId {
        self.next_row += 1;
        RowId(self.next_row)
    }
}
