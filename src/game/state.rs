//! # Game State Module
//!
//! The mutable play state and the session that owns it.
//!
//! [`PlayState`] is a plain value the core modules operate on. [`GameSession`]
//! bundles it with the level catalogue, the random source, the completion
//! tracker and the save store, and is the single entry point the input and
//! rendering collaborators talk to. Each handler runs to completion before
//! returning, so the renderer never sees a half-applied event.

use crate::game::{
    movement, progress, quiz, Arrival, Direction, Level, LevelCatalog, MoveOutcome, Position,
    ProgressTracker, QuizInstance, QuizOutcome,
};
use crate::storage::KeyValueStore;
use crate::{ForestError, ForestResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-session progress on one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayState {
    pub current_level_id: String,
    pub player: Position,
    solved: BTreeSet<String>,
    pub active_quiz: Option<QuizInstance>,
}

/// Whether the player is walking around or answering a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Exploring,
    QuizActive,
}

impl PlayState {
    /// Creates a state on `level_id` with the player at `player`.
    pub fn new(level_id: impl Into<String>, player: Position) -> Self {
        Self {
            current_level_id: level_id.into(),
            player,
            solved: BTreeSet::new(),
            active_quiz: None,
        }
    }

    /// Fresh state for `level`: player on the start tile, nothing solved.
    pub fn for_level(level: &Level) -> Self {
        Self::new(level.id.clone(), level.start_position())
    }

    /// Current mode, derived from whether a quiz is open.
    pub fn mode(&self) -> GameMode {
        if self.active_quiz.is_some() {
            GameMode::QuizActive
        } else {
            GameMode::Exploring
        }
    }

    /// Whether question `id` has been answered correctly.
    pub fn is_solved(&self, id: &str) -> bool {
        self.solved.contains(id)
    }

    /// Records question `id` as solved. Returns false if it already was.
    pub fn mark_solved(&mut self, id: &str) -> bool {
        self.solved.insert(id.to_string())
    }

    /// Ids of all solved questions.
    pub fn solved_ids(&self) -> &BTreeSet<String> {
        &self.solved
    }

    /// Number of solved questions; always the size of the solved set.
    pub fn solved_count(&self) -> usize {
        self.solved.len()
    }
}

/// Importance of a player-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageImportance {
    Info,
    Success,
    Warning,
}

/// Something that happened while handling an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The player moved
    PlayerMoved { from: Position, to: Position },
    /// A quiz opened on a question tile
    QuizOpened { question_id: String, prompt: String },
    /// An answer was checked
    AnswerChecked {
        question_id: String,
        outcome: QuizOutcome,
    },
    /// The quiz overlay closed
    QuizClosed { question_id: String, solved: bool },
    /// The player stepped on the finish tile
    FinishReached { complete: bool },
    /// The level was completed for the first time
    LevelCompleted { level_id: String },
    /// A level was (re)loaded
    LevelLoaded { level_id: String },
    /// Text for the player
    Message {
        text: String,
        importance: MessageImportance,
    },
}

impl GameEvent {
    fn message(text: impl Into<String>, importance: MessageImportance) -> Self {
        GameEvent::Message {
            text: text.into(),
            importance,
        }
    }
}

/// Read-only view handed to the renderer each frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub level: &'a Level,
    /// One-based index of the level in the catalogue
    pub level_number: usize,
    pub player: Position,
    pub solved: &'a BTreeSet<String>,
    pub solved_count: usize,
    pub required_solved: usize,
    pub active_quiz: Option<&'a QuizInstance>,
}

/// A play session: the only owner of [`PlayState`].
pub struct GameSession {
    catalog: LevelCatalog,
    state: PlayState,
    tracker: ProgressTracker,
    rng: StdRng,
    store: Option<Box<dyn KeyValueStore>>,
    save_key: String,
    pending: Vec<GameEvent>,
}

fn current_level<'a>(catalog: &'a LevelCatalog, state: &PlayState) -> &'a Level {
    catalog
        .get(&state.current_level_id)
        .unwrap_or_else(|| catalog.first())
}

impl GameSession {
    /// Creates a session on the first level without persistence.
    ///
    /// # Examples
    ///
    /// ```
    /// use math_forest::{builtin_levels, GameSession};
    ///
    /// let session = GameSession::new(builtin_levels().unwrap(), 12345);
    /// assert_eq!(session.state().solved_count(), 0);
    /// assert_eq!(session.state().player, session.level().start_position());
    /// ```
    pub fn new(catalog: LevelCatalog, seed: u64) -> Self {
        let state = PlayState::for_level(catalog.first());
        let mut session = Self {
            catalog,
            state,
            tracker: ProgressTracker::new(),
            rng: StdRng::seed_from_u64(seed),
            store: None,
            save_key: crate::config::SAVE_KEY.to_string(),
            pending: Vec::new(),
        };
        session.pending = session.announce_completion();
        session
    }

    /// Creates a session backed by `store`, resuming the saved snapshot.
    ///
    /// Without a usable snapshot the session starts on `starting_level`
    /// (or the first level if that id is unknown). A snapshot that already
    /// meets the requirement queues the completion events, see
    /// [`take_pending_events`](GameSession::take_pending_events).
    pub fn with_store(
        catalog: LevelCatalog,
        seed: u64,
        store: Box<dyn KeyValueStore>,
        save_key: impl Into<String>,
        starting_level: Option<&str>,
    ) -> Self {
        let save_key = save_key.into();
        let state = progress::load_progress(Some(store.as_ref()), &save_key, &catalog)
            .unwrap_or_else(|| {
                let level = starting_level
                    .and_then(|id| catalog.get(id))
                    .unwrap_or_else(|| catalog.first());
                PlayState::for_level(level)
            });
        log::info!(
            "session on {} with {} solved",
            state.current_level_id,
            state.solved_count()
        );

        let mut session = Self {
            catalog,
            state,
            tracker: ProgressTracker::new(),
            rng: StdRng::seed_from_u64(seed),
            store: Some(store),
            save_key,
            pending: Vec::new(),
        };
        session.pending = session.announce_completion();
        session
    }

    /// Events produced while the session was set up, e.g. completion of a
    /// restored level. Drained on the first call.
    pub fn take_pending_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    /// The level being played.
    pub fn level(&self) -> &Level {
        current_level(&self.catalog, &self.state)
    }

    /// The current play state.
    pub fn state(&self) -> &PlayState {
        &self.state
    }

    /// All known levels.
    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// Whether the current level's requirement is met.
    pub fn is_complete(&self) -> bool {
        progress::check_completion(&self.state, self.level())
    }

    /// Handles a directional intent.
    pub fn handle_move(&mut self, direction: Direction) -> Vec<GameEvent> {
        let level = current_level(&self.catalog, &self.state);
        let outcome = movement::resolve_move(level, &mut self.state, direction, &mut self.rng);

        let MoveOutcome::Moved { from, to, arrival } = outcome else {
            return Vec::new();
        };

        let mut events = vec![GameEvent::PlayerMoved { from, to }];
        match arrival {
            Arrival::Question { id } => {
                let prompt = self
                    .state
                    .active_quiz
                    .as_ref()
                    .map(QuizInstance::prompt)
                    .unwrap_or_default();
                events.push(GameEvent::QuizOpened {
                    question_id: id,
                    prompt,
                });
            }
            Arrival::Finish => {
                let complete = progress::check_completion(&self.state, level);
                events.push(GameEvent::FinishReached { complete });
                if complete {
                    events.push(GameEvent::message(
                        "Well done! The level is finished.",
                        MessageImportance::Success,
                    ));
                    if self.tracker.observe(&self.state, level) {
                        events.push(GameEvent::LevelCompleted {
                            level_id: level.id.clone(),
                        });
                    }
                } else {
                    events.push(GameEvent::message(
                        format!(
                            "Solve the questions first ({}/{}).",
                            self.state.solved_count(),
                            level.required_solved
                        ),
                        MessageImportance::Warning,
                    ));
                }
            }
            Arrival::Open | Arrival::SolvedQuestion { .. } => {}
        }

        self.persist();
        events
    }

    /// Submits a typed answer to the open quiz.
    pub fn confirm_answer(&mut self, raw: &str) -> Vec<GameEvent> {
        let Some(question_id) = self
            .state
            .active_quiz
            .as_ref()
            .map(|quiz| quiz.source_question_id.clone())
        else {
            return Vec::new();
        };
        let Some(outcome) = quiz::submit(&mut self.state, raw) else {
            return Vec::new();
        };

        let importance = match outcome {
            QuizOutcome::Correct => MessageImportance::Success,
            QuizOutcome::Incorrect | QuizOutcome::Invalid => MessageImportance::Warning,
        };
        let mut events = vec![
            GameEvent::AnswerChecked {
                question_id: question_id.clone(),
                outcome,
            },
            GameEvent::message(outcome.message(), importance),
        ];

        if outcome == QuizOutcome::Correct {
            events.push(GameEvent::QuizClosed {
                question_id,
                solved: true,
            });
            events.extend(self.announce_completion());
            self.persist();
        }

        events
    }

    /// Closes the open quiz without solving it.
    pub fn cancel_quiz(&mut self) -> Vec<GameEvent> {
        let question_id = self
            .state
            .active_quiz
            .as_ref()
            .map(|quiz| quiz.source_question_id.clone());
        match question_id {
            Some(question_id) if quiz::cancel(&mut self.state) => vec![GameEvent::QuizClosed {
                question_id,
                solved: false,
            }],
            _ => Vec::new(),
        }
    }

    /// Switches to level `id`, discarding progress on the current one.
    pub fn load_level(&mut self, id: &str) -> ForestResult<Vec<GameEvent>> {
        let level = self
            .catalog
            .get(id)
            .ok_or_else(|| ForestError::InvalidAction(format!("unknown level '{}'", id)))?;
        self.state = PlayState::for_level(level);
        self.tracker.reset();
        log::info!("loaded level {}", id);
        self.persist();

        let mut events = vec![GameEvent::LevelLoaded {
            level_id: id.to_string(),
        }];
        events.extend(self.announce_completion());
        Ok(events)
    }

    /// Starts the current level over.
    pub fn restart_level(&mut self) -> Vec<GameEvent> {
        let id = self.level().id.clone();
        self.load_level(&id).unwrap_or_default()
    }

    /// Removes the saved snapshot, best effort.
    pub fn clear_saved_progress(&mut self) {
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.remove(&self.save_key) {
                log::warn!("could not clear saved progress: {}", e);
            }
        }
    }

    /// Snapshot of everything the renderer needs.
    pub fn frame_view(&self) -> FrameView<'_> {
        let level = self.level();
        FrameView {
            level,
            level_number: self.catalog.number_of(&level.id).unwrap_or(1),
            player: self.state.player,
            solved: self.state.solved_ids(),
            solved_count: self.state.solved_count(),
            required_solved: level.required_solved,
            active_quiz: self.state.active_quiz.as_ref(),
        }
    }

    /// Completion notice, produced only the first time the level is complete.
    fn announce_completion(&mut self) -> Vec<GameEvent> {
        let level = current_level(&self.catalog, &self.state);
        if !self.tracker.observe(&self.state, level) {
            return Vec::new();
        }
        let text = if level.has_finish() {
            "All questions solved! Head to the finish."
        } else {
            "All questions solved! The level is finished."
        };
        vec![
            GameEvent::message(text, MessageImportance::Success),
            GameEvent::LevelCompleted {
                level_id: level.id.clone(),
            },
        ]
    }

    fn persist(&mut self) {
        if let Some(store) = self.store.as_mut() {
            progress::save_progress(store.as_mut(), &self.save_key, &self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{LevelBlueprint, OperandRange, OperationKind, Question};
    use crate::storage::MemoryStore;

    // S Q . F
    fn catalog() -> LevelCatalog {
        let level = Level::from_blueprint(LevelBlueprint {
            id: "row".to_string(),
            name: "Row".to_string(),
            width: 4,
            height: 1,
            terrain: vec!["....".to_string()],
            objects: vec!["SQ.F".to_string()],
            questions: vec![Question::new(
                "q1",
                Position::new(1, 0),
                OperationKind::Addition,
                OperandRange::new(1, 5),
                OperandRange::new(1, 5),
            )],
            required_solved: 1,
        })
        .unwrap();
        LevelCatalog::new(vec![level]).unwrap()
    }

    fn answer(session: &GameSession) -> String {
        session
            .state()
            .active_quiz
            .as_ref()
            .unwrap()
            .correct_result
            .to_string()
    }

    #[test]
    fn test_mode_follows_quiz() {
        let mut session = GameSession::new(catalog(), 1);
        assert_eq!(session.state().mode(), GameMode::Exploring);
        session.handle_move(Direction::Right);
        assert_eq!(session.state().mode(), GameMode::QuizActive);
        session.cancel_quiz();
        assert_eq!(session.state().mode(), GameMode::Exploring);
    }

    #[test]
    fn test_blocked_move_emits_nothing() {
        let mut session = GameSession::new(catalog(), 1);
        assert!(session.handle_move(Direction::Left).is_empty());
        assert!(session.handle_move(Direction::Up).is_empty());
    }

    #[test]
    fn test_quiz_open_event_carries_prompt() {
        let mut session = GameSession::new(catalog(), 1);
        let events = session.handle_move(Direction::Right);
        let prompt = session.state().active_quiz.as_ref().unwrap().prompt();
        assert_eq!(
            events[1],
            GameEvent::QuizOpened {
                question_id: "q1".to_string(),
                prompt
            }
        );
    }

    #[test]
    fn test_finish_before_and_after_solving() {
        let mut session = GameSession::new(catalog(), 1);
        session.handle_move(Direction::Right);
        session.cancel_quiz();
        session.handle_move(Direction::Right);
        let events = session.handle_move(Direction::Right);
        assert!(events.contains(&GameEvent::FinishReached { complete: false }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::LevelCompleted { .. })));

        session.handle_move(Direction::Left);
        session.handle_move(Direction::Left);
        let raw = answer(&session);
        let events = session.confirm_answer(&raw);
        assert!(events.contains(&GameEvent::LevelCompleted {
            level_id: "row".to_string()
        }));

        session.handle_move(Direction::Right);
        let events = session.handle_move(Direction::Right);
        assert!(events.contains(&GameEvent::FinishReached { complete: true }));
        // Completion was already announced after the last answer.
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::LevelCompleted { .. })));
    }

    #[test]
    fn test_cancel_leaves_question_answerable() {
        let mut session = GameSession::new(catalog(), 1);
        session.handle_move(Direction::Right);
        let events = session.cancel_quiz();
        assert_eq!(
            events,
            vec![GameEvent::QuizClosed {
                question_id: "q1".to_string(),
                solved: false
            }]
        );
        assert!(session.cancel_quiz().is_empty());

        session.handle_move(Direction::Left);
        session.handle_move(Direction::Right);
        assert!(session.state().active_quiz.is_some());
    }

    #[test]
    fn test_confirm_without_quiz_is_noop() {
        let mut session = GameSession::new(catalog(), 1);
        assert!(session.confirm_answer("3").is_empty());
    }

    #[test]
    fn test_moves_are_persisted() {
        let store = MemoryStore::new();
        let mut session = GameSession::with_store(catalog(), 1, Box::new(store.clone()), "save", None);
        session.handle_move(Direction::Right);
        assert!(store.get("save").unwrap().is_some());
    }

    #[test]
    fn test_session_resumes_saved_progress() {
        let mut store = MemoryStore::new();
        store
            .set("save", r#"{"levelId":"row","solvedCount":1,"answeredQuestions":["q1"]}"#)
            .unwrap();
        let mut session = GameSession::with_store(catalog(), 1, Box::new(store), "save", None);
        assert!(session.state().is_solved("q1"));
        assert!(session.is_complete());

        session.handle_move(Direction::Right);
        assert!(session.state().active_quiz.is_none());
    }

    #[test]
    fn test_restored_completion_is_announced_once() {
        let level = Level::from_blueprint(LevelBlueprint {
            id: "open".to_string(),
            name: "Open".to_string(),
            width: 4,
            height: 1,
            terrain: vec!["....".to_string()],
            objects: vec!["SQ..".to_string()],
            questions: vec![Question::new(
                "q1",
                Position::new(1, 0),
                OperationKind::Addition,
                OperandRange::new(1, 5),
                OperandRange::new(1, 5),
            )],
            required_solved: 1,
        })
        .unwrap();
        let mut store = MemoryStore::new();
        store
            .set("save", r#"{"levelId":"open","answeredQuestions":["q1"]}"#)
            .unwrap();

        let catalog = LevelCatalog::new(vec![level]).unwrap();
        let mut session = GameSession::with_store(catalog, 1, Box::new(store), "save", None);
        let startup = session.take_pending_events();
        assert!(startup.contains(&GameEvent::LevelCompleted {
            level_id: "open".to_string()
        }));
        assert!(session.take_pending_events().is_empty());

        for _ in 0..3 {
            let events = session.handle_move(Direction::Right);
            assert!(!events
                .iter()
                .any(|e| matches!(e, GameEvent::LevelCompleted { .. })));
        }
    }

    #[test]
    fn test_fresh_session_has_no_pending_events() {
        let mut session = GameSession::new(catalog(), 1);
        assert!(session.take_pending_events().is_empty());
    }

    #[test]
    fn test_mark_solved_twice_counts_once() {
        let mut state = PlayState::new("row", Position::new(0, 0));
        assert!(state.mark_solved("q1"));
        assert!(!state.mark_solved("q1"));
        assert_eq!(state.solved_count(), 1);
        assert_eq!(state.solved_ids().len(), 1);
    }

    #[test]
    fn test_load_and_restart_level() {
        let mut session = GameSession::new(catalog(), 1);
        session.handle_move(Direction::Right);
        let raw = answer(&session);
        session.confirm_answer(&raw);
        assert_eq!(session.state().solved_count(), 1);

        let events = session.restart_level();
        assert_eq!(
            events,
            vec![GameEvent::LevelLoaded {
                level_id: "row".to_string()
            }]
        );
        assert_eq!(session.state().solved_count(), 0);
        assert_eq!(session.state().player, Position::new(0, 0));

        assert!(session.load_level("missing").is_err());
    }

    #[test]
    fn test_frame_view() {
        let mut session = GameSession::new(catalog(), 1);
        session.handle_move(Direction::Right);
        let view = session.frame_view();
        assert_eq!(view.level_number, 1);
        assert_eq!(view.player, Position::new(1, 0));
        assert_eq!(view.required_solved, 1);
        assert!(view.active_quiz.is_some());
    }
}
