//! # Progress Tracking
//!
//! Completion checks plus the shape and restore policy of the saved
//! snapshot. Reading and writing the snapshot goes through a
//! [`KeyValueStore`]; any failure there means "no saved data" or "save
//! skipped" and never reaches gameplay.

use crate::game::{Level, LevelCatalog, PlayState};
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};

/// True iff `solved` meets `required`.
pub fn is_complete(solved: usize, required: usize) -> bool {
    solved >= required
}

/// Whether the player has solved enough questions on `level`.
pub fn check_completion(state: &PlayState, level: &Level) -> bool {
    is_complete(state.solved_count(), level.required_solved)
}

/// Edge-triggered completion detector.
///
/// [`observe`](ProgressTracker::observe) reports completion only the first
/// time it sees it, until [`reset`](ProgressTracker::reset).
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    announced: bool,
}

impl ProgressTracker {
    /// Creates a tracker that has not announced anything yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true exactly once per level, the first time it is complete.
    pub fn observe(&mut self, state: &PlayState, level: &Level) -> bool {
        if self.announced || !check_completion(state, level) {
            return false;
        }
        self.announced = true;
        log::info!("level {} complete", level.id);
        true
    }

    /// Whether completion has been announced.
    pub fn has_announced(&self) -> bool {
        self.announced
    }

    /// Forgets the announcement, for a level change.
    pub fn reset(&mut self) {
        self.announced = false;
    }
}

/// The persisted progress snapshot.
///
/// Every field defaults, so partial or older records still deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveRecord {
    pub level_id: String,
    pub solved_count: i64,
    #[serde(alias = "solvedQuestionIds")]
    pub answered_questions: Vec<String>,
}

/// Captures what needs saving from `state`.
pub fn snapshot(state: &PlayState) -> SaveRecord {
    SaveRecord {
        level_id: state.current_level_id.clone(),
        solved_count: state.solved_count() as i64,
        answered_questions: state.solved_ids().iter().cloned().collect(),
    }
}

/// Rebuilds a play state from a record.
///
/// An unknown level falls back to the first catalogue level with nothing
/// solved. Unknown question ids are kept and count toward completion. The
/// solved count always follows the id set; a disagreeing stored count is
/// ignored.
pub fn restore(record: &SaveRecord, catalog: &LevelCatalog) -> PlayState {
    let Some(level) = catalog.get(&record.level_id) else {
        log::warn!(
            "saved level '{}' is unknown, starting {}",
            record.level_id,
            catalog.first().id
        );
        return PlayState::for_level(catalog.first());
    };

    let mut state = PlayState::for_level(level);
    for id in &record.answered_questions {
        state.mark_solved(id);
    }

    let stored = record.solved_count.max(0) as usize;
    if stored != state.solved_count() {
        log::debug!(
            "saved count {} disagrees with {} saved ids",
            stored,
            state.solved_count()
        );
    }

    state
}

/// Reads and restores the saved snapshot.
///
/// Returns None when there is nothing usable: no store, a failing store, no
/// record, or a record that does not parse.
pub fn load_progress(
    store: Option<&dyn KeyValueStore>,
    key: &str,
    catalog: &LevelCatalog,
) -> Option<PlayState> {
    let raw = match store?.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("could not read saved progress: {}", e);
            return None;
        }
    };

    match serde_json::from_str::<SaveRecord>(&raw) {
        Ok(record) => Some(restore(&record, catalog)),
        Err(e) => {
            log::warn!("ignoring corrupted save: {}", e);
            None
        }
    }
}

/// Writes the snapshot, best effort. Returns whether it was stored.
pub fn save_progress(store: &mut dyn KeyValueStore, key: &str, state: &PlayState) -> bool {
    let result = serde_json::to_string(&snapshot(state))
        .map_err(crate::ForestError::from)
        .and_then(|json| store.set(key, &json));

    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("progress not saved: {}", e);
            false
        }
    }
}
