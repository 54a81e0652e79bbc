//! # Level Model
//!
//! Immutable level templates: two tile layers, question definitions and the
//! number of questions a player has to solve.
//!
//! Levels are described by a [`LevelBlueprint`] using the character legends
//! below and validated once into a [`Level`]. After that nothing mutates
//! them; per-session progress lives in [`PlayState`](crate::PlayState).
//!
//! Terrain legend: `.`/`G` grass, `#`/`P` path.
//! Object legend: `.` empty, `T`/`W` obstacle, `Q` question, `S` start, `F` finish.

use crate::game::Position;
use crate::{config, ForestError, ForestResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Background classification of a tile. Cosmetic for movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Grass,
    Path,
}

impl TerrainKind {
    /// Parses a terrain map symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' | 'G' => Some(TerrainKind::Grass),
            '#' | 'P' => Some(TerrainKind::Path),
            _ => None,
        }
    }
}

/// Foreground marker of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectMarker {
    Empty,
    /// Trees and walls
    Obstacle,
    Question,
    Start,
    Finish,
}

impl ObjectMarker {
    /// Parses an object map symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(ObjectMarker::Empty),
            'T' | 'W' => Some(ObjectMarker::Obstacle),
            'Q' => Some(ObjectMarker::Question),
            'S' => Some(ObjectMarker::Start),
            'F' => Some(ObjectMarker::Finish),
            _ => None,
        }
    }
}

/// Row-major grid with all bounds checking in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Copy> TileGrid<T> {
    /// Parses text rows into a grid, rejecting ragged rows and unknown symbols.
    fn parse(
        layer: &str,
        width: u32,
        height: u32,
        rows: &[String],
        symbol: impl Fn(char) -> Option<T>,
    ) -> ForestResult<Self> {
        if rows.len() != height as usize {
            return Err(ForestError::InvalidLevel(format!(
                "{} layer has {} rows, expected {}",
                layer,
                rows.len(),
                height
            )));
        }

        let capacity = width.checked_mul(height).ok_or_else(|| {
            ForestError::InvalidLevel(format!("{} layer of {}x{} is too large", layer, width, height))
        })?;
        let mut cells = Vec::with_capacity(capacity as usize);
        for (y, row) in rows.iter().enumerate() {
            let count = row.chars().count();
            if count != width as usize {
                return Err(ForestError::InvalidLevel(format!(
                    "{} row {} has {} cells, expected {}",
                    layer, y, count, width
                )));
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = symbol(ch).ok_or_else(|| {
                    ForestError::InvalidLevel(format!(
                        "unknown {} symbol '{}' at ({}, {})",
                        layer, ch, x, y
                    ))
                })?;
                cells.push(cell);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Returns the cell at `pos`, or None outside `[0,width)×[0,height)`.
    pub fn get(&self, pos: Position) -> Option<T> {
        if !self.contains(pos) {
            return None;
        }
        let index = pos.y as usize * self.width as usize + pos.x as usize;
        self.cells.get(index).copied()
    }

    /// Whether `pos` lies inside the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Iterates all cells with their positions, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Position, T)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Position::new((i % width) as i32, (i / width) as i32), *cell))
    }
}

/// Arithmetic operation a question asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "add")]
    Addition,
    #[serde(rename = "sub")]
    Subtraction,
}

impl OperationKind {
    /// The operator as shown to the player.
    pub fn symbol(self) -> char {
        match self {
            OperationKind::Addition => '+',
            OperationKind::Subtraction => '-',
        }
    }
}

/// Inclusive operand bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperandRange {
    pub min: u32,
    pub max: u32,
}

impl OperandRange {
    /// Creates a new range. Validity (`min <= max`) is checked when the level is built.
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Whether `value` falls inside the range.
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A question definition placed on a `Q` tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub position: Position,
    pub operation: OperationKind,
    pub operand_a: OperandRange,
    pub operand_b: OperandRange,
}

impl Question {
    /// Creates a question definition.
    ///
    /// # Examples
    ///
    /// ```
    /// use math_forest::{OperandRange, OperationKind, Position, Question};
    ///
    /// let q = Question::new(
    ///     "q1",
    ///     Position::new(5, 6),
    ///     OperationKind::Addition,
    ///     OperandRange::new(1, 10),
    ///     OperandRange::new(1, 10),
    /// );
    /// assert_eq!(q.id, "q1");
    /// ```
    pub fn new(
        id: impl Into<String>,
        position: Position,
        operation: OperationKind,
        operand_a: OperandRange,
        operand_b: OperandRange,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            operation,
            operand_a,
            operand_b,
        }
    }
}

/// Textual description of a level, as written in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelBlueprint {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// `height` rows of `width` terrain symbols
    pub terrain: Vec<String>,
    /// `height` rows of `width` object symbols
    pub objects: Vec<String>,
    pub questions: Vec<Question>,
    pub required_solved: usize,
}

/// A validated, immutable level.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    terrain: TileGrid<TerrainKind>,
    objects: TileGrid<ObjectMarker>,
    questions: Vec<Question>,
    pub required_solved: usize,
}

impl Level {
    /// Validates a blueprint into a level.
    ///
    /// Fails on zero dimensions, ragged rows, unknown symbols, duplicate
    /// question ids, questions that are out of bounds or not on a `Q` marker,
    /// inverted operand ranges, an unreachable `required_solved` and a start
    /// tile the player cannot stand on.
    pub fn from_blueprint(blueprint: LevelBlueprint) -> ForestResult<Self> {
        let LevelBlueprint {
            id,
            name,
            width,
            height,
            terrain,
            objects,
            questions,
            required_solved,
        } = blueprint;

        if width == 0 || height == 0 {
            return Err(ForestError::InvalidLevel(format!(
                "level '{}' must have positive dimensions",
                id
            )));
        }

        let terrain = TileGrid::parse("terrain", width, height, &terrain, TerrainKind::from_symbol)?;
        let objects = TileGrid::parse("object", width, height, &objects, ObjectMarker::from_symbol)?;

        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id.as_str()) {
                return Err(ForestError::InvalidLevel(format!(
                    "duplicate question id '{}'",
                    question.id
                )));
            }
            if objects.get(question.position) != Some(ObjectMarker::Question) {
                return Err(ForestError::InvalidLevel(format!(
                    "question '{}' at ({}, {}) is not on a question marker",
                    question.id, question.position.x, question.position.y
                )));
            }
            for range in [question.operand_a, question.operand_b] {
                if range.min > range.max {
                    return Err(ForestError::InvalidLevel(format!(
                        "question '{}' has inverted operand range {}..{}",
                        question.id, range.min, range.max
                    )));
                }
            }
        }

        if required_solved > questions.len() {
            return Err(ForestError::InvalidLevel(format!(
                "level '{}' requires {} solved but has only {} questions",
                id,
                required_solved,
                questions.len()
            )));
        }

        let start = find_start(&objects);
        match objects.get(start) {
            None | Some(ObjectMarker::Obstacle) => {
                return Err(ForestError::InvalidLevel(format!(
                    "level '{}' starts on a blocked tile ({}, {})",
                    id, start.x, start.y
                )));
            }
            Some(_) => {}
        }

        Ok(Self {
            id,
            name,
            width,
            height,
            terrain,
            objects,
            questions,
            required_solved,
        })
    }

    /// Terrain at `pos`, or None outside the level.
    pub fn terrain_at(&self, pos: Position) -> Option<TerrainKind> {
        self.terrain.get(pos)
    }

    /// Object marker at `pos`, or None outside the level.
    pub fn object_at(&self, pos: Position) -> Option<ObjectMarker> {
        self.objects.get(pos)
    }

    /// The question placed at `pos`, if any.
    pub fn question_at(&self, pos: Position) -> Option<&Question> {
        self.questions.iter().find(|q| q.position == pos)
    }

    /// Looks a question up by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// All question definitions, in declaration order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Whether `pos` lies inside the level.
    pub fn contains(&self, pos: Position) -> bool {
        self.objects.contains(pos)
    }

    /// Whether the level has a finish tile.
    pub fn has_finish(&self) -> bool {
        self.objects.iter().any(|(_, marker)| marker == ObjectMarker::Finish)
    }

    /// The first `S` marker in row-major order, or [`config::FALLBACK_START`].
    ///
    /// Always a tile the player can stand on; levels where it is not are
    /// rejected by [`Level::from_blueprint`].
    pub fn start_position(&self) -> Position {
        find_start(&self.objects)
    }
}

fn find_start(objects: &TileGrid<ObjectMarker>) -> Position {
    objects
        .iter()
        .find(|(_, marker)| *marker == ObjectMarker::Start)
        .map(|(pos, _)| pos)
        .unwrap_or(config::FALLBACK_START)
}

/// The set of levels known to a session. Never empty.
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Creates a catalogue, rejecting an empty list and duplicate ids.
    pub fn new(levels: Vec<Level>) -> ForestResult<Self> {
        if levels.is_empty() {
            return Err(ForestError::InvalidState(
                "a level catalogue needs at least one level".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for level in &levels {
            if !seen.insert(level.id.as_str()) {
                return Err(ForestError::InvalidLevel(format!(
                    "duplicate level id '{}'",
                    level.id
                )));
            }
        }
        Ok(Self { levels })
    }

    /// The first level, used as the default.
    pub fn first(&self) -> &Level {
        &self.levels[0]
    }

    /// Looks a level up by id.
    pub fn get(&self, id: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// One-based position of a level in the catalogue, for display.
    pub fn number_of(&self, id: &str) -> Option<usize> {
        self.levels.iter().position(|level| level.id == id).map(|i| i + 1)
    }

    /// All levels in order.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    fn blueprint() -> LevelBlueprint {
        LevelBlueprint {
            id: "test".to_string(),
            name: "Test".to_string(),
            width: 4,
            height: 3,
            terrain: rows(&["....", ".##.", "...."]),
            objects: rows(&["T...", ".QS.", "...F"]),
            questions: vec![Question::new(
                "q1",
                Position::new(1, 1),
                OperationKind::Addition,
                OperandRange::new(1, 5),
                OperandRange::new(1, 5),
            )],
            required_solved: 1,
        }
    }

    #[test]
    fn test_level_accessors() {
        let level = Level::from_blueprint(blueprint()).unwrap();
        assert_eq!(level.terrain_at(Position::new(1, 1)), Some(TerrainKind::Path));
        assert_eq!(level.terrain_at(Position::new(0, 0)), Some(TerrainKind::Grass));
        assert_eq!(level.object_at(Position::new(0, 0)), Some(ObjectMarker::Obstacle));
        assert_eq!(level.object_at(Position::new(3, 2)), Some(ObjectMarker::Finish));
        assert_eq!(level.question_at(Position::new(1, 1)).map(|q| q.id.as_str()), Some("q1"));
        assert!(level.question_at(Position::new(2, 1)).is_none());
        assert!(level.has_finish());
    }

    #[test]
    fn test_out_of_bounds_lookups_return_none() {
        let level = Level::from_blueprint(blueprint()).unwrap();
        for pos in [
            Position::new(-1, 0),
            Position::new(0, -1),
            Position::new(4, 0),
            Position::new(0, 3),
        ] {
            assert!(level.terrain_at(pos).is_none());
            assert!(level.object_at(pos).is_none());
            assert!(level.question_at(pos).is_none());
        }
    }

    #[test]
    fn test_start_position_scans_for_marker() {
        let level = Level::from_blueprint(blueprint()).unwrap();
        assert_eq!(level.start_position(), Position::new(2, 1));
    }

    #[test]
    fn test_start_position_falls_back_without_marker() {
        let mut bp = blueprint();
        bp.objects = rows(&["T...", ".Q..", "...F"]);
        let level = Level::from_blueprint(bp).unwrap();
        assert_eq!(level.start_position(), config::FALLBACK_START);
    }

    #[test]
    fn test_rejects_fallback_start_on_obstacle() {
        let mut bp = blueprint();
        bp.objects = rows(&["....", ".TQ.", "...F"]);
        bp.questions[0].position = Position::new(2, 1);
        assert!(matches!(Level::from_blueprint(bp), Err(ForestError::InvalidLevel(_))));
    }

    #[test]
    fn test_rejects_fallback_start_out_of_bounds() {
        let tiny = |objects: &str| LevelBlueprint {
            id: "tiny".to_string(),
            name: "Tiny".to_string(),
            width: 1,
            height: 1,
            terrain: rows(&["."]),
            objects: rows(&[objects]),
            questions: Vec::new(),
            required_solved: 0,
        };
        assert!(matches!(Level::from_blueprint(tiny(".")), Err(ForestError::InvalidLevel(_))));

        let level = Level::from_blueprint(tiny("S")).unwrap();
        assert_eq!(level.start_position(), Position::new(0, 0));
    }

    #[test]
    fn test_rejects_oversized_dimensions() {
        let mut bp = blueprint();
        bp.width = u32::MAX;
        bp.height = 2;
        bp.terrain = rows(&["....", "...."]);
        bp.objects = rows(&["....", "...."]);
        assert!(matches!(Level::from_blueprint(bp), Err(ForestError::InvalidLevel(_))));
    }

    #[test]
    fn test_alternate_legend() {
        let mut bp = blueprint();
        bp.terrain = rows(&["GGGG", "GPPG", "GGGG"]);
        bp.objects = rows(&["WWWW", "WQSW", "WWWF"]);
        let level = Level::from_blueprint(bp).unwrap();
        assert_eq!(level.terrain_at(Position::new(2, 1)), Some(TerrainKind::Path));
        assert_eq!(level.object_at(Position::new(3, 1)), Some(ObjectMarker::Obstacle));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let mut bp = blueprint();
        bp.objects = rows(&["T...", ".QS", "...F"]);
        assert!(matches!(Level::from_blueprint(bp), Err(ForestError::InvalidLevel(_))));
    }

    #[test]
    fn test_rejects_wrong_row_count() {
        let mut bp = blueprint();
        bp.terrain = rows(&["....", "...."]);
        assert!(matches!(Level::from_blueprint(bp), Err(ForestError::InvalidLevel(_))));
    }

    #[test]
    fn test_rejects_unknown_symbol() {
        let mut bp = blueprint();
        bp.objects = rows(&["T..X", ".QS.", "...F"]);
        assert!(matches!(Level::from_blueprint(bp), Err(ForestError::InvalidLevel(_))));
    }

    #[test]
    fn test_rejects_question_off_marker() {
        let mut bp = blueprint();
        bp.questions[0].position = Position::new(2, 2);
        assert!(matches!(Level::from_blueprint(bp), Err(ForestError::InvalidLevel(_))));
    }

    #[test]
    fn test_rejects_question_out_of_bounds() {
        let mut bp = blueprint();
        bp.questions[0].position = Position::new(9, 9);
        assert!(matches!(Level::from_blueprint(bp), Err(ForestError::InvalidLevel(_))));
    }

    #[test]
    fn test_rejects_duplicate_question_ids() {
        let mut bp = blueprint();
        bp.objects = rows(&["T...", ".QSQ", "...F"]);
        let mut dup = bp.questions[0].clone();
        dup.position = Position::new(3, 1);
        bp.questions.push(dup);
        assert!(matches!(Level::from_blueprint(bp), Err(ForestError::InvalidLevel(_))));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let mut bp = blueprint();
        bp.questions[0].operand_b = OperandRange::new(5, 1);
        assert!(matches!(Level::from_blueprint(bp), Err(ForestError::InvalidLevel(_))));
    }

    #[test]
    fn test_rejects_unreachable_requirement() {
        let mut bp = blueprint();
        bp.required_solved = 2;
        assert!(matches!(Level::from_blueprint(bp), Err(ForestError::InvalidLevel(_))));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let mut bp = blueprint();
        bp.width = 0;
        assert!(matches!(Level::from_blueprint(bp), Err(ForestError::InvalidLevel(_))));
    }

    #[test]
    fn test_catalog() {
        let level = Level::from_blueprint(blueprint()).unwrap();
        assert!(LevelCatalog::new(Vec::new()).is_err());
        assert!(LevelCatalog::new(vec![level.clone(), level.clone()]).is_err());

        let catalog = LevelCatalog::new(vec![level]).unwrap();
        assert_eq!(catalog.first().id, "test");
        assert!(catalog.get("test").is_some());
        assert!(catalog.get("missing").is_none());
        assert_eq!(catalog.number_of("test"), Some(1));
    }

    #[test]
    fn test_operation_kind_serde_names() {
        let json = serde_json::to_string(&OperationKind::Subtraction).unwrap();
        assert_eq!(json, "\"sub\"");
        let parsed: OperationKind = serde_json::from_str("\"add\"").unwrap();
        assert_eq!(parsed, OperationKind::Addition);
    }
}
