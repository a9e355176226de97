//! Headless autoplay runner (default binary).
//!
//! Drives a full game through the adapter runtime: acknowledges level
//! transitions, taps the key pair in the newest rows whenever one sits
//! adjacent, and prints one line per state change. Stops after the
//! configured level, or when the board fills up first.
//!
//! Usage: `token-trap [seed] [max-level]`

use anyhow::{Context, Result};

use token_trap::adapter::GameRuntime;
use token_trap::core::{Event, State};
use token_trap::types::{GamePhase, Settings, TokenId, TokenPair};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let seed = arg_or(1, 1).context("invalid seed argument")?;
    let max_level = arg_or(2, 3).context("invalid max-level argument")?;

    let runtime = GameRuntime::spawn(Settings::default(), seed);
    let mut watcher = runtime.watch();

    runtime.send(Event::GameAppeared);
    loop {
        watcher
            .changed()
            .await
            .context("game runtime stopped unexpectedly")?;
        let state = watcher.borrow_and_update().clone();
        print_summary(&state);

        match state.game_phase {
            Some(GamePhase::LevelIntro) | Some(GamePhase::LevelComplete) => {
                runtime.send(Event::LevelTransition);
            }
            Some(GamePhase::GamePaused) => {
                runtime.send(Event::CloseConfirmed);
            }
            Some(GamePhase::GameOver) | Some(GamePhase::GameDismissed) => {
                print_outcome(&state);
                break;
            }
            None => {
                if state.level > max_level {
                    runtime.send(Event::CloseSelected);
                } else if let Some((first, second)) = key_pair(&state) {
                    runtime.send(Event::TokenSelected(first));
                    runtime.send(Event::TokenSelected(second));
                }
            }
        }
    }

    Ok(())
}

fn arg_or(index: usize, default: u32) -> Result<u32> {
    match std::env::args().nth(index) {
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("expected a number, got {raw:?}")),
        None => Ok(default),
    }
}

/// An adjacent horizontal pair converting to the target, if one is tappable
fn key_pair(state: &State) -> Option<(TokenId, TokenId)> {
    if !state.selections.is_empty() {
        return None;
    }
    let target = state.target.as_ref()?;
    for row in &state.rows {
        if state.row_is_solved(row.id) {
            continue;
        }
        for i in 0..row.tokens.len() - 1 {
            let pair = TokenPair::new(row.tokens[i], row.tokens[i + 1]);
            if pair.can_convert_to(Some(target)) {
                return Some((row.tokens[i].id, row.tokens[i + 1].id));
            }
        }
    }
    None
}

fn print_summary(state: &State) {
    let phase = match state.game_phase {
        None => "active",
        Some(GamePhase::LevelIntro) => "level-intro",
        Some(GamePhase::LevelComplete) => "level-complete",
        Some(GamePhase::GameOver) => "game-over",
        Some(GamePhase::GamePaused) => "paused",
        Some(GamePhase::GameDismissed) => "dismissed",
    };
    let target = state
        .target
        .map(|t| format!("{}/{}", t.color().as_str(), t.icon().as_str()))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "level {:>2}  score {:>4}  rows {}  timer {}  target {:<10}  {}",
        state.level,
        state.score,
        state.rows.len(),
        state.timer_value,
        target,
        phase
    );
}

fn print_outcome(state: &State) {
    println!("final score: {}", state.score);
    if let Some(stats) = &state.stats {
        println!(
            "games {}  high {}  average {:.1}{}",
            stats.values.number_of_games,
            stats.values.high_score,
            stats.values.average_score,
            if stats.is_new_high_score {
                "  (new high score)"
            } else {
                ""
            }
        );
    }
}
