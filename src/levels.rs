//! # Built-in Levels
//!
//! The levels shipped with the game.

use crate::game::{
    Level, LevelBlueprint, LevelCatalog, OperandRange, OperationKind, Position, Question,
};
use crate::ForestResult;

const FOREST_TERRAIN: [&str; 40] = [
    "############",
    "############",
    "####....####",
    "###......###",
    "##........##",
    "##........##",
    "#..........#",
    "#..........#",
    "#....##....#",
    "#....##....#",
    "#..........#",
    "#..........#",
    "#....##....#",
    "#....##....#",
    "#..........#",
    "#..........#",
    "#....##....#",
    "#....##....#",
    "#..........#",
    "#..........#",
    "#....##....#",
    "#....##....#",
    "#..........#",
    "#..........#",
    "#....##....#",
    "#....##....#",
    "#..........#",
    "#..........#",
    "#....##....#",
    "#....##....#",
    "#..........#",
    "#..........#",
    "#....##....#",
    "#....##....#",
    "#..........#",
    "#..........#",
    "############",
    "############",
    "############",
    "############",
];

const FOREST_OBJECTS: [&str; 40] = [
    "............",
    "............",
    "............",
    ".....T......",
    "....TTT.....",
    "............",
    ".....Q......",
    "............",
    "....T.......",
    "............",
    "........T...",
    "............",
    ".....Q......",
    "............",
    "............",
    "....T.......",
    "............",
    ".....Q......",
    "............",
    "............",
    "....T.......",
    "............",
    ".....Q......",
    "............",
    "............",
    "............",
    "....T.......",
    "............",
    ".....Q......",
    "............",
    "............",
    "....T.......",
    "............",
    ".....S......",
    "............",
    "............",
    "............",
    "............",
    "............",
    "............",
];

const TRAIL_TERRAIN: [&str; 26] = [
    "...#...", "...#...", "...#...", "...#...", "...#...", "...#...", "...#...", "...#...",
    "...#...", "...#...", "...#...", "...#...", "...#...", "...#...", "...#...", "...#...",
    "...#...", "...#...", "...#...", "...#...", "...#...", "...#...", "...#...", "...#...",
    "...#...", "...#...",
];

const TRAIL_OBJECTS: [&str; 26] = [
    "WWWWWWW", "W..F..W", "W..Q..W", "W.....W", "W.....W", "W.....W", "W..Q..W", "W.....W",
    "W.....W", "W.....W", "W..Q..W", "W.....W", "W.....W", "W.....W", "W..Q..W", "W.....W",
    "W.....W", "W.....W", "W..Q..W", "W.....W", "W..S..W", "W.....W", "W.....W", "W.....W",
    "W.....W", "WWWWWWW",
];

fn rows(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

fn question(id: &str, x: i32, y: i32, operation: OperationKind, a: (u32, u32), b: (u32, u32)) -> Question {
    Question::new(
        id,
        Position::new(x, y),
        operation,
        OperandRange::new(a.0, a.1),
        OperandRange::new(b.0, b.1),
    )
}

/// The forest path: a tall map with five questions between the trees.
pub fn forest_path() -> LevelBlueprint {
    use OperationKind::{Addition, Subtraction};

    LevelBlueprint {
        id: "forest-1".to_string(),
        name: "Lesní stezka".to_string(),
        width: 12,
        height: 40,
        terrain: rows(&FOREST_TERRAIN),
        objects: rows(&FOREST_OBJECTS),
        questions: vec![
            question("q1", 5, 6, Addition, (1, 10), (1, 10)),
            question("q2", 5, 12, Subtraction, (5, 15), (1, 10)),
            question("q3", 5, 17, Addition, (2, 20), (2, 10)),
            question("q4", 5, 22, Subtraction, (10, 20), (1, 10)),
            question("q5", 5, 28, Addition, (1, 15), (1, 10)),
        ],
        required_solved: 5,
    }
}

/// The walled trail: a narrow corridor ending in a finish tile.
pub fn walled_trail() -> LevelBlueprint {
    use OperationKind::{Addition, Subtraction};

    LevelBlueprint {
        id: "trail-1".to_string(),
        name: "Lesní stezka II".to_string(),
        width: 7,
        height: 26,
        terrain: rows(&TRAIL_TERRAIN),
        objects: rows(&TRAIL_OBJECTS),
        questions: vec![
            question("t1", 3, 2, Addition, (1, 5), (1, 5)),
            question("t2", 3, 6, Subtraction, (5, 10), (1, 5)),
            question("t3", 3, 10, Addition, (1, 6), (1, 6)),
            question("t4", 3, 14, Subtraction, (5, 9), (1, 5)),
            question("t5", 3, 18, Addition, (2, 5), (2, 5)),
        ],
        required_solved: 5,
    }
}

/// Validates the shipped levels into a catalogue.
pub fn builtin_levels() -> ForestResult<LevelCatalog> {
    let levels = [forest_path(), walled_trail()]
        .into_iter()
        .map(Level::from_blueprint)
        .collect::<ForestResult<Vec<_>>>()?;
    LevelCatalog::new(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{is_passable, ObjectMarker};

    #[test]
    fn test_builtin_levels_validate() {
        let catalog = builtin_levels().unwrap();
        assert_eq!(catalog.levels().len(), 2);
        assert_eq!(catalog.first().id, "forest-1");
    }

    #[test]
    fn test_forest_start_and_questions() {
        let catalog = builtin_levels().unwrap();
        let forest = catalog.get("forest-1").unwrap();
        assert_eq!(forest.start_position(), Position::new(5, 33));
        assert!(is_passable(forest, forest.start_position()));
        assert_eq!(forest.questions().len(), 5);
        assert!(!forest.has_finish());
    }

    #[test]
    fn test_trail_is_walled_with_finish() {
        let catalog = builtin_levels().unwrap();
        let trail = catalog.get("trail-1").unwrap();
        assert_eq!(trail.start_position(), Position::new(3, 20));
        assert_eq!(trail.object_at(Position::new(3, 1)), Some(ObjectMarker::Finish));
        for x in 0..7 {
            assert!(!is_passable(trail, Position::new(x, 0)));
            assert!(!is_passable(trail, Position::new(x, 25)));
        }
    }
}
