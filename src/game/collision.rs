//! # Collision & Query
//!
//! Pure, total queries against a [`Level`]. Invalid coordinates degrade to
//! "impassable" / "nothing here" instead of erroring, so callers never need
//! their own bounds checks.

use crate::game::{Level, ObjectMarker, Position, Question};

/// Whether the player may stand on `pos`.
///
/// Out of bounds and obstacle markers block; every other tile is walkable,
/// whatever its terrain.
///
/// # Examples
///
/// ```
/// use math_forest::{builtin_levels, is_passable, Position};
///
/// let catalog = builtin_levels().unwrap();
/// let level = catalog.first();
/// assert!(!is_passable(level, Position::new(-1, 0)));
/// assert!(is_passable(level, level.start_position()));
/// ```
pub fn is_passable(level: &Level, pos: Position) -> bool {
    match level.object_at(pos) {
        None | Some(ObjectMarker::Obstacle) => false,
        Some(_) => true,
    }
}

/// The question placed at `pos`, if any.
pub fn question_at(level: &Level, pos: Position) -> Option<&Question> {
    level.question_at(pos)
}

/// Where the player starts on `level`.
pub fn player_start(level: &Level) -> Position {
    level.start_position()
}

/// Whether `pos` is the level's finish tile.
pub fn is_finish(level: &Level, pos: Position) -> bool {
    level.object_at(pos) == Some(ObjectMarker::Finish)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{LevelBlueprint, OperandRange, OperationKind};
    use proptest::prelude::*;

    fn level() -> Level {
        Level::from_blueprint(LevelBlueprint {
            id: "c".to_string(),
            name: "Collision".to_string(),
            width: 5,
            height: 4,
            terrain: vec![
                "#####".to_string(),
                "#...#".to_string(),
                "#...#".to_string(),
                "#####".to_string(),
            ],
            objects: vec![
                "TTTTT".to_string(),
                "TSQ.T".to_string(),
                "T..FT".to_string(),
                "TTTTT".to_string(),
            ],
            questions: vec![Question::new(
                "q1",
                Position::new(2, 1),
                OperationKind::Subtraction,
                OperandRange::new(5, 10),
                OperandRange::new(1, 5),
            )],
            required_solved: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_obstacles_block() {
        let level = level();
        assert!(!is_passable(&level, Position::new(0, 0)));
        assert!(!is_passable(&level, Position::new(4, 2)));
    }

    #[test]
    fn test_markers_other_than_obstacles_pass() {
        let level = level();
        assert!(is_passable(&level, Position::new(1, 1))); // start
        assert!(is_passable(&level, Position::new(2, 1))); // question
        assert!(is_passable(&level, Position::new(3, 1))); // empty
        assert!(is_passable(&level, Position::new(3, 2))); // finish
    }

    #[test]
    fn test_queries() {
        let level = level();
        assert_eq!(player_start(&level), Position::new(1, 1));
        assert_eq!(question_at(&level, Position::new(2, 1)).map(|q| q.id.as_str()), Some("q1"));
        assert!(is_finish(&level, Position::new(3, 2)));
        assert!(!is_finish(&level, Position::new(30, 2)));
    }

    proptest! {
        #[test]
        fn out_of_bounds_is_never_passable(x in -50i32..50, y in -50i32..50) {
            let level = level();
            prop_assume!(x < 0 || y < 0 || x >= 5 || y >= 4);
            prop_assert!(!is_passable(&level, Position::new(x, y)));
        }

        #[test]
        fn passability_follows_object_layer(x in 0i32..5, y in 0i32..4) {
            let level = level();
            let pos = Position::new(x, y);
            let blocked = level.object_at(pos) == Some(ObjectMarker::Obstacle);
            prop_assert_eq!(is_passable(&level, pos), !blocked);
        }
    }
}
