//! Integration tests for saving and restoring progress.

use math_forest::progress::{restore, snapshot};
use math_forest::{
    builtin_levels, Direction, FileStore, ForestError, ForestResult, GameSession, KeyValueStore,
    MemoryStore, SaveRecord,
};
use proptest::prelude::*;

/// A store that fails every operation.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> ForestResult<Option<String>> {
        Err(ForestError::Storage("unavailable".to_string()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> ForestResult<()> {
        Err(ForestError::Storage("unavailable".to_string()))
    }

    fn remove(&mut self, _key: &str) -> ForestResult<()> {
        Err(ForestError::Storage("unavailable".to_string()))
    }
}

#[test]
fn test_unknown_level_falls_back_to_first() -> ForestResult<()> {
    let catalog = builtin_levels()?;
    let record = SaveRecord {
        level_id: "level-that-was-removed".to_string(),
        solved_count: 3,
        answered_questions: vec!["q1".to_string(), "q2".to_string()],
    };

    let state = restore(&record, &catalog);
    assert_eq!(state.current_level_id, catalog.first().id);
    assert_eq!(state.solved_count(), 0);
    assert_eq!(state.player, catalog.first().start_position());
    Ok(())
}

#[test]
fn test_broken_store_never_blocks_play() -> ForestResult<()> {
    let catalog = builtin_levels()?;
    let first = catalog.first().id.clone();
    let mut session = GameSession::with_store(catalog, 1, Box::new(BrokenStore), "save", None);
    assert_eq!(session.state().current_level_id, first);

    let start = session.state().player;
    session.handle_move(Direction::Up);
    assert_ne!(session.state().player, start);
    session.clear_saved_progress();
    Ok(())
}

#[test]
fn test_malformed_save_is_ignored() -> ForestResult<()> {
    let mut store = MemoryStore::new();
    store.set("save", r#"{"levelId": 42, "answeredQuestions": "nope"}"#)?;

    let session = GameSession::with_store(builtin_levels()?, 1, Box::new(store), "save", Some("trail-1"));
    assert_eq!(session.state().current_level_id, "trail-1");
    assert_eq!(session.state().solved_count(), 0);
    Ok(())
}

#[test]
fn test_progress_survives_restart_with_file_store() -> ForestResult<()> {
    let dir = tempfile::tempdir()?;

    {
        let store = FileStore::open(dir.path())?;
        let mut session = GameSession::with_store(builtin_levels()?, 3, Box::new(store), "save", Some("trail-1"));
        // Start (3,20) -> question t5 at (3,18).
        session.handle_move(Direction::Up);
        session.handle_move(Direction::Up);
        let answer = session
            .state()
            .active_quiz
            .as_ref()
            .map(|quiz| quiz.correct_result.to_string())
            .expect("quiz on t5");
        session.confirm_answer(&answer);
        assert!(session.state().is_solved("t5"));
    }

    let store = FileStore::open(dir.path())?;
    let session = GameSession::with_store(builtin_levels()?, 3, Box::new(store), "save", None);
    assert_eq!(session.state().current_level_id, "trail-1");
    assert!(session.state().is_solved("t5"));
    assert_eq!(session.state().solved_count(), 1);
    Ok(())
}

#[test]
fn test_clear_saved_progress() -> ForestResult<()> {
    let store = MemoryStore::new();
    let mut session = GameSession::with_store(builtin_levels()?, 1, Box::new(store.clone()), "save", None);
    session.handle_move(Direction::Up);
    assert!(store.get("save")?.is_some());

    session.clear_saved_progress();
    assert!(store.get("save")?.is_none());
    Ok(())
}

proptest! {
    #[test]
    fn restore_snapshot_round_trip(
        level_pick in 0usize..3,
        ids in proptest::collection::vec("[a-z][0-9]", 0..6),
    ) {
        let catalog = builtin_levels().unwrap();
        let level_id = match level_pick {
            0 => "forest-1",
            1 => "trail-1",
            _ => "unknown",
        };
        let seed = SaveRecord {
            level_id: level_id.to_string(),
            solved_count: ids.len() as i64,
            answered_questions: ids,
        };

        let state = restore(&seed, &catalog);
        let again = restore(&snapshot(&state), &catalog);

        prop_assert_eq!(&again.current_level_id, &state.current_level_id);
        prop_assert_eq!(again.solved_ids(), state.solved_ids());
        prop_assert_eq!(again.solved_count(), again.solved_ids().len());
    }
}
