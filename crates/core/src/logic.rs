//! Game logic module - the authoritative state machine
//!
//! `GameLogic` owns the complete game state and mutates it through one
//! serialized event stream: UI events arrive from outside, follow-up work
//! re-enters as delayed events through the injected [`Scheduler`]. After
//! every handled event the logic emits a fresh [`State`] snapshot for the
//! rendering layer.
//!
//! Invalid or stale operations (a tap on a solved row, a resolution for a
//! selection that no longer exists, a tick from a cancelled timer run) are
//! guarded no-ops, not errors: they are expected races between scheduled
//! callbacks and newer state.

use token_trap_types::{
    GamePhase, SelectionStatus, Settings, Token, TokenId, TokenPair, EMPTY_BOARD_RETRY_MS,
    GRID_SIZE, ROWS_PER_LEVEL, ROW_REMOVAL_MS, SCORE_CHANGE_EXPIRY_MS, SCORE_PLAIN_ROW,
    SELECTION_RESOLUTION_MS,
};

use crate::event::Event;
use crate::generator::RowGenerator;
use crate::rng::SimpleRng;
use crate::row::{adjacency, coordinates_of, AdjacencyResult, RowId, TokenMint};
use crate::scheduler::Scheduler;
use crate::state::{ScoreChange, ScoreChangeId, Selection, SelectionId, SolvedRow, State};
use crate::stats::StatsStorage;
use crate::timer::{row_interval_ms, RowTimer};

/// The core state machine: owns the board, interprets events, emits snapshots
pub struct GameLogic<S: Scheduler> {
    settings: Settings,
    scheduler: S,
    stats: StatsStorage,
    rng: SimpleRng,
    mint: TokenMint,
    generator: RowGenerator,
    timer: RowTimer,
    state: State,
    rows_cleared: u32,
    next_selection_id: u32,
    next_score_change_id: u32,
}

impl<S: Scheduler> GameLogic<S> {
    /// Create a logic instance with in-memory stats backing
    pub fn new(settings: Settings, seed: u32, scheduler: S) -> Self {
        Self::with_stats(settings, seed, scheduler, StatsStorage::in_memory(settings))
    }

    pub fn with_stats(settings: Settings, seed: u32, scheduler: S, stats: StatsStorage) -> Self {
        Self {
            settings,
            scheduler,
            stats,
            rng: SimpleRng::new(seed),
            mint: TokenMint::new(),
            generator: RowGenerator::new(settings),
            timer: RowTimer::new(),
            state: State::new(0),
            rows_cleared: 0,
            next_selection_id: 0,
            next_score_change_id: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The current snapshot (identical to the last value `handle` returned)
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Process one event and emit the resulting state snapshot
    pub fn handle(&mut self, event: Event) -> State {
        if self.state.game_phase == Some(GamePhase::GameDismissed) && event != Event::NewGame {
            return self.state.clone();
        }
        match event {
            Event::NewGame => self.start_new_game(),
            Event::GameAppeared => {
                // Bootstraps the first game; later appearances just re-emit.
                if self.state.target.is_none() {
                    self.start_new_game();
                }
            }
            Event::TokenSelected(token_id) => self.process_tap(token_id),
            Event::LevelTransition => self.process_level_transition(),
            Event::CloseSelected => self.process_close_selected(),
            Event::CloseConfirmed => self.process_close_confirmed(),
            Event::GameResumed => self.process_resume(),
            Event::TimerFired { epoch } => self.process_timer_fired(epoch),
            Event::SelectionUpdate(selection) => self.process_selection_update(selection),
            Event::SolvedRow(row_id) => self.process_solved_row(row_id),
            Event::EmptyBoard => self.process_empty_board(),
            Event::ScoreChangeExpired(id) => {
                self.state.score_changes.retain(|c| c.id != id);
            }
        }
        self.state.clone()
    }

    fn start_new_game(&mut self) {
        self.timer.cancel();
        let game_id = self.state.game_id + 1;
        self.state = State::new(game_id);
        self.rows_cleared = 0;
        self.start_level();
    }

    /// Enter the intro for the next level (or the first, on a fresh game)
    fn start_level(&mut self) {
        if self.state.score > 0 {
            self.state.level += 1;
        }
        self.state.rows.clear();
        self.state.solved_rows.clear();
        self.state.selections.clear();
        self.state.next_training_hint_token = None;
        self.rows_cleared = 0;

        self.timer.cancel();
        self.timer.reset_value();
        self.timer
            .set_interval(row_interval_ms(self.state.level, &self.settings));
        self.state.timer_value = 0;

        let target = self.next_target();
        self.state.target = Some(target);
        self.state.game_phase = Some(GamePhase::LevelIntro);
    }

    /// A fresh target whose attributes differ from the previous one
    fn next_target(&mut self) -> Token {
        let previous = self.state.target.map(|t| t.attributes);
        let mut attributes = self.rng.attributes();
        while Some(attributes) == previous {
            attributes = self.rng.attributes();
        }
        self.mint.token(attributes)
    }

    fn process_level_transition(&mut self) {
        match self.state.game_phase {
            Some(GamePhase::LevelIntro) => {
                self.state.game_phase = None;
                self.add_row();
                self.start_timer();
            }
            Some(GamePhase::LevelComplete) => self.start_level(),
            _ => {}
        }
    }

    fn process_tap(&mut self, token_id: TokenId) {
        if !self.state.is_active() {
            return;
        }
        let Some(coordinates) = coordinates_of(&self.state.rows, token_id) else {
            return;
        };
        if self.state.row_is_solved(self.state.rows[coordinates.row].id) {
            return;
        }
        if self
            .state
            .selections
            .iter()
            .any(|s| s.token_pair.map_or(false, |p| p.contains(token_id)))
        {
            return;
        }
        let token = self.state.rows[coordinates.row].tokens[coordinates.column];

        let pending = self
            .state
            .selections
            .last()
            .filter(|s| s.token_pair.is_none())
            .copied();
        let Some(pending) = pending else {
            self.next_selection_id += 1;
            self.state.selections.push(Selection {
                id: SelectionId(self.next_selection_id),
                token1: token,
                token_pair: None,
                status: SelectionStatus::Selected,
            });
            return;
        };

        let pair = TokenPair::new(pending.token1, token);
        let status = match adjacency(&self.state.rows, pending.token1.id, token_id) {
            AdjacencyResult::NotAdjacent => SelectionStatus::Rejected,
            AdjacencyResult::AdjacentVertical => {
                if pair.is_partial_match() {
                    SelectionStatus::PartialMatch
                } else {
                    SelectionStatus::Rejected
                }
            }
            AdjacencyResult::AdjacentHorizontal => {
                if !pair.is_partial_match() {
                    SelectionStatus::Rejected
                } else if pair.can_convert_to(self.state.target.as_ref()) {
                    SelectionStatus::TargetMatch
                } else {
                    SelectionStatus::PartialMatch
                }
            }
        };

        if status == SelectionStatus::TargetMatch {
            // Both tokens share the row for a horizontal match.
            if let Some(first) = coordinates_of(&self.state.rows, pending.token1.id) {
                let columns = (
                    first.column.min(coordinates.column),
                    first.column.max(coordinates.column),
                );
                self.state.solved_rows.push(SolvedRow {
                    row_id: self.state.rows[first.row].id,
                    target_pair_range: columns,
                });
            }
        }

        let updated = Selection {
            token_pair: Some(pair),
            status,
            ..pending
        };
        if let Some(stored) = self.state.selections.last_mut() {
            *stored = updated;
        }
        self.scheduler
            .schedule(Event::SelectionUpdate(updated), SELECTION_RESOLUTION_MS);
    }

    fn process_selection_update(&mut self, resolved: Selection) {
        let Some(index) = self
            .state
            .selections
            .iter()
            .position(|s| s.id == resolved.id)
        else {
            return;
        };
        if self.state.selections[index].token_pair.is_none() {
            return;
        }
        let selection = self.state.selections.remove(index);
        if selection.status == SelectionStatus::Rejected {
            return;
        }
        let Some(pair) = selection.token_pair else {
            return;
        };

        let solved_row_id =
            coordinates_of(&self.state.rows, pair.token1.id).map(|c| self.state.rows[c.row].id);
        self.convert_pair(&pair);

        if selection.status != SelectionStatus::TargetMatch {
            return;
        }
        if let Some(row_id) = solved_row_id {
            self.scheduler.schedule(Event::SolvedRow(row_id), ROW_REMOVAL_MS);
        }
        // Stop spawning when this clear ends the level or empties the board,
        // so a fresh row cannot race the clear animation.
        let clears_pending = self.rows_cleared + self.state.solved_rows.len() as u32;
        if clears_pending >= ROWS_PER_LEVEL || self.state.rows.len() == 1 {
            self.timer.cancel();
            self.timer.reset_value();
            self.state.timer_value = 0;
        }
    }

    /// Replace both pair tokens in place with the converted full-match token
    fn convert_pair(&mut self, pair: &TokenPair) {
        let Some(attributes) = pair.converted() else {
            return;
        };
        for token in [pair.token1, pair.token2] {
            let replacement = self.mint.token(attributes);
            if let Some(c) = coordinates_of(&self.state.rows, token.id) {
                self.state.rows[c.row].tokens[c.column] = replacement;
            }
            if self.state.next_training_hint_token == Some(token.id) {
                self.state.next_training_hint_token = None;
            }
        }
    }

    fn process_solved_row(&mut self, row_id: RowId) {
        let Some(row_index) = self.state.rows.iter().position(|r| r.id == row_id) else {
            return;
        };
        if !self.state.row_is_solved(row_id) {
            return;
        }
        let row = self.state.rows.remove(row_index);
        self.state.solved_rows.retain(|s| s.row_id != row_id);
        if let Some(hint) = self.state.next_training_hint_token {
            if row.contains(hint) {
                self.state.next_training_hint_token = None;
            }
        }

        let amount = row.challenge_type.map_or(SCORE_PLAIN_ROW, |c| c.clear_score());
        self.state.score += amount;
        self.next_score_change_id += 1;
        let change = ScoreChange {
            id: ScoreChangeId(self.next_score_change_id),
            amount,
        };
        self.state.score_changes.push(change);
        self.scheduler
            .schedule(Event::ScoreChangeExpired(change.id), SCORE_CHANGE_EXPIRY_MS);

        self.rows_cleared += 1;
        if self.rows_cleared >= ROWS_PER_LEVEL {
            self.state.game_phase = Some(GamePhase::LevelComplete);
        } else if self.state.rows.is_empty() {
            self.scheduler.schedule(Event::EmptyBoard, EMPTY_BOARD_RETRY_MS);
        }
    }

    fn process_empty_board(&mut self) {
        if !self.state.is_active() || !self.state.rows.is_empty() {
            return;
        }
        self.add_row();
        self.start_timer();
    }

    fn process_timer_fired(&mut self, epoch: u64) {
        if !self.timer.accepts(epoch) || !self.state.is_active() {
            return;
        }
        let tick = self.timer.tick();
        self.state.timer_value = tick.value;
        if tick.is_full {
            if self.can_add_row() {
                self.add_row();
            } else {
                self.end_game();
                return;
            }
        }
        self.scheduler
            .schedule(Event::TimerFired { epoch }, self.timer.interval_ms());
    }

    fn process_close_selected(&mut self) {
        match self.state.game_phase {
            None => {
                self.timer.cancel();
                self.state.game_phase = Some(GamePhase::GamePaused);
            }
            Some(GamePhase::GameOver) => {
                self.state.game_phase = Some(GamePhase::GameDismissed);
            }
            _ => {}
        }
    }

    fn process_close_confirmed(&mut self) {
        self.timer.cancel();
        self.state.game_phase = Some(GamePhase::GameDismissed);
    }

    fn process_resume(&mut self) {
        if self.state.game_phase != Some(GamePhase::GamePaused) {
            return;
        }
        self.state.game_phase = None;
        let epoch = self.timer.resume();
        self.state.timer_value = self.timer.value();
        self.scheduler
            .schedule(Event::TimerFired { epoch }, self.timer.interval_ms());
    }

    fn can_add_row(&self) -> bool {
        self.state.unsolved_row_count() < GRID_SIZE
    }

    fn add_row(&mut self) {
        let Some(target) = self.state.target else {
            return;
        };
        let row = self.generator.next_row(
            &target,
            self.state.level,
            &self.state.rows,
            &mut self.rng,
            &mut self.mint,
        );
        if self.settings.is_training_mode {
            if let Some(hint) = row.tokens.iter().find(|t| t.shows_training_hint) {
                self.state.next_training_hint_token = Some(hint.id);
            }
        }
        self.state.rows.insert(0, row);
    }

    fn start_timer(&mut self) {
        let epoch = self.timer.start();
        self.state.timer_value = 0;
        self.scheduler
            .schedule(Event::TimerFired { epoch }, self.timer.interval_ms());
    }

    fn end_game(&mut self) {
        self.timer.cancel();
        self.state.game_phase = Some(GamePhase::GameOver);
        self.state.stats = Some(self.stats.updated_stats(&self.state));
    }
}
