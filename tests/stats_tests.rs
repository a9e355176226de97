//! Stats storage behavior through the persisted JSON backing

use token_trap::adapter::JsonFileStore;
use token_trap::core::{Event, GameLogic, QueueScheduler, StatsStorage, StatsStore};
use token_trap::types::{Settings, SkillLevel};

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "token-trap-it-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn finished_state(game_id: u32, score: u32) -> token_trap::core::State {
    let mut state = token_trap::core::State::new(game_id);
    state.score = score;
    state
}

#[test]
fn records_survive_across_storage_instances() {
    let dir = temp_dir("persist");
    let settings = Settings::default();

    {
        let store = JsonFileStore::new(&dir).unwrap();
        let mut storage = StatsStorage::new(settings, Box::new(store));
        let stats = storage.updated_stats(&finished_state(1, 30));
        assert!(stats.is_new_high_score);
    }

    // A fresh session reads the same record back.
    let store = JsonFileStore::new(&dir).unwrap();
    let mut storage = StatsStorage::new(settings, Box::new(store.clone()));
    let stats = storage.updated_stats(&finished_state(1, 10));
    assert_eq!(stats.values.number_of_games, 2);
    assert_eq!(stats.values.high_score, 30);
    assert_eq!(stats.values.average_score, 20.0);
    assert!(!stats.is_new_high_score);

    // Keys stay per skill level.
    assert!(store.load("stats.basic").is_some());
    assert!(store.load("stats.expert").is_none());
}

#[test]
fn expert_and_basic_records_do_not_mix() {
    let dir = temp_dir("skills");
    let expert = Settings {
        skill_level: SkillLevel::Expert,
        is_training_mode: false,
    };

    let mut storage = StatsStorage::new(expert, Box::new(JsonFileStore::new(&dir).unwrap()));
    storage.updated_stats(&finished_state(1, 50));

    let store = JsonFileStore::new(&dir).unwrap();
    assert_eq!(store.load("stats.expert").unwrap().high_score, 50);
    assert!(store.load("stats.basic").is_none());
}

#[test]
fn game_logic_reports_into_the_json_store() {
    let dir = temp_dir("logic");
    let settings = Settings::default();
    let storage = StatsStorage::new(settings, Box::new(JsonFileStore::new(&dir).unwrap()));
    let mut engine = GameLogic::with_stats(settings, 8, QueueScheduler::new(), storage);

    engine.handle(Event::NewGame);
    engine.handle(Event::LevelTransition);
    // Let the spawn loop run the board to capacity.
    for _ in 0..60 {
        let Some(event) = engine.scheduler_mut().pop_next() else {
            break;
        };
        engine.handle(event);
        if engine.state().game_phase.is_some() {
            break;
        }
    }

    let stats = engine.state().stats.clone().expect("stats at game over");
    // Score stayed 0, so the stored record is untouched.
    assert_eq!(stats.values.number_of_games, 0);
    let store = JsonFileStore::new(&dir).unwrap();
    assert!(store.load("stats.basic").is_none());
}
