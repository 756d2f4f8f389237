use serde::Deserialize;
use thiserror::Error;

/// Level content authored as `row,col,WORD,H|V` records. Any of these is a
/// content bug, so the compiled-in level refuses to load.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("record {index} is malformed: '{record}' (expected row,col,WORD,H|V)")]
    MalformedRecord { index: usize, record: String },
    #[error("record {index}: '{value}' is not a grid coordinate")]
    BadCoordinate { index: usize, value: String },
    #[error("record {index}: '{value}' is not a direction (H or V)")]
    BadDirection { index: usize, value: String },
    #[error("record {index}: empty word")]
    EmptyWord { index: usize },
    #[error("cell ({row}, {col}) holds '{existing}' but {word} needs '{wanted}' there")]
    Conflict {
        row: u32,
        col: u32,
        existing: char,
        wanted: char,
        word: String,
    },
    #[error("'{0}' is not a single letter")]
    BadLetter(String),
    #[error("level json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    fn parse(index: usize, value: &str) -> Result<Self, LevelError> {
        match value {
            "H" => Ok(Direction::Horizontal),
            "V" => Ok(Direction::Vertical),
            _ => Err(LevelError::BadDirection {
                index,
                value: value.to_string(),
            }),
        }
    }
}

/// One word's position on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPlacement {
    pub row: u32,
    pub col: u32,
    pub word: String,
    pub direction: Direction,
}

impl WordPlacement {
    /// `(row, col, letter)` for each letter, in reading order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, char)> + '_ {
        self.word.chars().enumerate().map(move |(i, letter)| {
            let i = i as u32;
            match self.direction {
                Direction::Horizontal => (self.row, self.col + i, letter),
                Direction::Vertical => (self.row + i, self.col, letter),
            }
        })
    }
}

/// Parse a `|`-separated layout. Blank records (e.g. a trailing `|`) are skipped.
pub fn parse_layout(layout: &str) -> Result<Vec<WordPlacement>, LevelError> {
    let mut placements = Vec::new();
    for (index, record) in layout.split('|').enumerate() {
        let record = record.trim();
        if record.is_empty() {
            continue;
        }
        let fields: Vec<&str> = record.split(',').map(str::trim).collect();
        let [row, col, word, direction] = fields[..] else {
            return Err(LevelError::MalformedRecord {
                index,
                record: record.to_string(),
            });
        };
        let coord = |value: &str| {
            value.parse::<u32>().map_err(|_| LevelError::BadCoordinate {
                index,
                value: value.to_string(),
            })
        };
        if word.is_empty() {
            return Err(LevelError::EmptyWord { index });
        }
        let placement = WordPlacement {
            row: coord(row)?,
            col: coord(col)?,
            word: word.to_string(),
            direction: Direction::parse(index, direction)?,
        };
        // The last letter must still have a representable coordinate.
        let (start, raw) = match placement.direction {
            Direction::Horizontal => (placement.col, col),
            Direction::Vertical => (placement.row, row),
        };
        let span = u32::try_from(word.chars().count() - 1).ok();
        if span.and_then(|span| start.checked_add(span)).is_none() {
            return Err(LevelError::BadCoordinate {
                index,
                value: raw.to_string(),
            });
        }
        placements.push(placement);
    }
    Ok(placements)
}

/// Parse the comma-separated wheel letters, e.g. `"G,O,D,L"`.
pub fn parse_letters(letters: &str) -> Result<Vec<char>, LevelError> {
    if letters.trim().is_empty() {
        return Ok(Vec::new());
    }
    letters
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            let mut chars = entry.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) => Ok(letter),
                _ => Err(LevelError::BadLetter(entry.to_string())),
            }
        })
        .collect()
}

/// Serialized form of `assets/level.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDef {
    pub letters: String,
    pub layout: String,
}

/// A parsed, ready-to-play level.
#[derive(Debug, Clone)]
pub struct Level {
    pub letters: Vec<char>,
    pub layout: String,
    pub placements: Vec<WordPlacement>,
}

const BUILTIN_LEVEL: &str = include_str!("../assets/level.json");

impl Level {
    pub fn new(letters: &str, layout: &str) -> Result<Self, LevelError> {
        Ok(Self {
            letters: parse_letters(letters)?,
            layout: layout.to_string(),
            placements: parse_layout(layout)?,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let def: LevelDef = serde_json::from_str(json)?;
        Self::new(&def.letters, &def.layout)
    }

    /// The level compiled into the playable.
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVEL)
    }

    /// Distinct placement words, in order of first appearance.
    pub fn target_words(&self) -> Vec<String> {
        let mut words: Vec<String> = Vec::with_capacity(self.placements.len());
        for p in &self.placements {
            if !words.contains(&p.word) {
                words.push(p.word.clone());
            }
        }
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_level_parses() {
        let level = Level::builtin().expect("built-in level must parse");
        assert_eq!(level.letters, vec!['G', 'O', 'D', 'L']);
        assert_eq!(level.placements.len(), 4);
        assert_eq!(level.target_words(), vec!["GOLD", "GOD", "DOG", "LOG"]);
    }

    #[test]
    fn placement_cells_follow_direction() {
        let p = &parse_layout("0,2,LOG,V").unwrap()[0];
        let cells: Vec<_> = p.cells().collect();
        assert_eq!(cells, vec![(0, 2, 'L'), (1, 2, 'O'), (2, 2, 'G')]);

        let p = &parse_layout("2,0,DOG,H").unwrap()[0];
        let cells: Vec<_> = p.cells().collect();
        assert_eq!(cells, vec![(2, 0, 'D'), (2, 1, 'O'), (2, 2, 'G')]);
    }

    #[test]
    fn malformed_records_are_rejected() {
        assert!(matches!(
            parse_layout("0,0,GOLD"),
            Err(LevelError::MalformedRecord { index: 0, .. })
        ));
        assert!(matches!(
            parse_layout("0,0,GOLD,H|x,0,GOD,V"),
            Err(LevelError::BadCoordinate { index: 1, .. })
        ));
        assert!(matches!(
            parse_layout("0,0,GOLD,D"),
            Err(LevelError::BadDirection { .. })
        ));
        assert!(matches!(parse_layout("0,0,,H"), Err(LevelError::EmptyWord { index: 0 })));
    }

    #[test]
    fn placement_running_off_the_grid_is_rejected() {
        let max = u32::MAX;
        assert!(matches!(
            parse_layout(&format!("0,{},GOLD,H", max - 1)),
            Err(LevelError::BadCoordinate { index: 0, .. })
        ));
        assert!(matches!(
            parse_layout(&format!("0,0,GOLD,H|{max},0,GOD,V")),
            Err(LevelError::BadCoordinate { index: 1, .. })
        ));
        // The last letter may sit on the final coordinate.
        let p = &parse_layout(&format!("{},0,GOD,V", max - 2)).unwrap()[0];
        assert_eq!(p.cells().last(), Some((max, 0, 'D')));
    }

    #[test]
    fn blank_records_are_skipped() {
        let placements = parse_layout("0,0,GOLD,H||0,0,GOD,V|").unwrap();
        assert_eq!(placements.len(), 2);
        assert!(parse_layout("").unwrap().is_empty());
    }

    #[test]
    fn letters_must_be_single_characters() {
        assert_eq!(parse_letters("G, O ,D,L").unwrap(), vec!['G', 'O', 'D', 'L']);
        assert!(matches!(parse_letters("G,OO"), Err(LevelError::BadLetter(s)) if s == "OO"));
        assert!(matches!(parse_letters("G,,L"), Err(LevelError::BadLetter(_))));
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(matches!(Level::from_json("{ \"letters\": 3 }"), Err(LevelError::Json(_))));
    }

    #[test]
    fn target_words_dedupe() {
        let level = Level::new("G,O,D", "0,0,GOD,H|0,0,GOD,V").unwrap();
        assert_eq!(level.target_words(), vec!["GOD"]);
    }
}
