use std::collections::HashMap;
use crate::level::{parse_layout, LevelError, WordPlacement};

/// Index into `Board::cells`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub usize);

/// One grid square. Crossing placements share the same cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub expected: char,
    pub solved: bool,
}

/// A cell that flipped to solved, with the letter's index in the guessed word
/// (drives the flight stagger).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealedCell {
    pub cell: CellId,
    pub letter_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reveal {
    /// At least one placement spells the guess.
    pub matched: bool,
    pub newly_solved: Vec<RevealedCell>,
}

/// Crossword grid state: placements, their cells and which cells are solved.
#[derive(Debug, Clone)]
pub struct Board {
    placements: Vec<WordPlacement>,
    cells: Vec<Cell>,
    index: HashMap<(u32, u32), CellId>,
    placement_cells: Vec<Vec<CellId>>,
}

impl Board {
    pub fn from_layout(layout: &str) -> Result<Self, LevelError> {
        Self::new(parse_layout(layout)?)
    }

    /// Build the grid, creating each cell the first time a placement touches it.
    pub fn new(placements: Vec<WordPlacement>) -> Result<Self, LevelError> {
        let mut cells: Vec<Cell> = Vec::new();
        let mut index = HashMap::new();
        let mut placement_cells = Vec::with_capacity(placements.len());

        for placement in &placements {
            let mut ids = Vec::with_capacity(placement.word.len());
            for (row, col, letter) in placement.cells() {
                let id = match index.get(&(row, col)) {
                    Some(&id) => {
                        let CellId(i) = id;
                        let existing = cells[i].expected;
                        if existing != letter {
                            return Err(LevelError::Conflict {
                                row,
                                col,
                                existing,
                                wanted: letter,
                                word: placement.word.clone(),
                            });
                        }
                        id
                    }
                    None => {
                        let id = CellId(cells.len());
                        cells.push(Cell { row, col, expected: letter, solved: false });
                        index.insert((row, col), id);
                        id
                    }
                };
                ids.push(id);
            }
            placement_cells.push(ids);
        }

        Ok(Self { placements, cells, index, placement_cells })
    }

    /// Mark every placement spelling `guess` as solved. Already solved cells
    /// are not reported again, so repeating a solved word still matches but
    /// reveals nothing.
    pub fn check_and_reveal(&mut self, guess: &str) -> Reveal {
        let mut reveal = Reveal::default();
        for (placement, ids) in self.placements.iter().zip(&self.placement_cells) {
            if placement.word != guess {
                continue;
            }
            reveal.matched = true;
            for (letter_index, &id) in ids.iter().enumerate() {
                let cell = &mut self.cells[id.0];
                if !cell.solved {
                    cell.solved = true;
                    reveal.newly_solved.push(RevealedCell { cell: id, letter_index });
                }
            }
        }
        reveal
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().enumerate().map(|(i, c)| (CellId(i), c))
    }

    pub fn cell_at(&self, row: u32, col: u32) -> Option<CellId> {
        self.index.get(&(row, col)).copied()
    }

    pub fn placements(&self) -> &[WordPlacement] {
        &self.placements
    }

    /// Every cell of every placement spelling `word` is solved.
    pub fn is_word_solved(&self, word: &str) -> bool {
        let mut found = false;
        for (placement, ids) in self.placements.iter().zip(&self.placement_cells) {
            if placement.word == word {
                found = true;
                if ids.iter().any(|id| !self.cells[id.0].solved) {
                    return false;
                }
            }
        }
        found
    }

    /// Inclusive `(min_row, min_col, max_row, max_col)`, `None` for an empty board.
    pub fn bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let first = self.cells.first()?;
        let init = (first.row, first.col, first.row, first.col);
        Some(self.cells.iter().fold(init, |(r0, c0, r1, c1), c| {
            (r0.min(c.row), c0.min(c.col), r1.max(c.row), c1.max(c.col))
        }))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LAYOUT: &str = "0,0,GOLD,H|0,0,GOD,V|2,0,DOG,H|0,2,LOG,V";

    #[test]
    fn single_word_reveals_its_row() {
        let mut board = Board::from_layout("0,0,GOLD,H").unwrap();
        let reveal = board.check_and_reveal("GOLD");
        assert!(reveal.matched);
        assert_eq!(reveal.newly_solved.len(), 4);
        for col in 0..4 {
            let id = board.cell_at(0, col).unwrap();
            assert!(board.cell(id).unwrap().solved);
        }
    }

    #[test]
    fn crossings_share_cells() {
        let board = Board::from_layout(LAYOUT).unwrap();
        // GOLD(4) + GOD(2 new) + DOG(2 new) + LOG(1 new)
        assert_eq!(board.len(), 9);
        assert_eq!(board.cell(board.cell_at(2, 2).unwrap()).unwrap().expected, 'G');
        assert_eq!(board.bounds(), Some((0, 0, 2, 3)));
    }

    #[test]
    fn crossing_cells_are_revealed_once() {
        let mut board = Board::from_layout(LAYOUT).unwrap();
        board.check_and_reveal("GOLD");
        let reveal = board.check_and_reveal("GOD");
        assert!(reveal.matched);
        let indices: Vec<_> = reveal.newly_solved.iter().map(|r| r.letter_index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn repeat_guess_matches_without_revealing() {
        let mut board = Board::from_layout(LAYOUT).unwrap();
        assert!(board.check_and_reveal("GOLD").matched);
        let again = board.check_and_reveal("GOLD");
        assert!(again.matched);
        assert!(again.newly_solved.is_empty());
        assert!(board.is_word_solved("GOLD"));
    }

    #[test]
    fn unknown_word_does_not_match() {
        let mut board = Board::from_layout("0,0,GOLD,H|0,0,GOD,V").unwrap();
        let reveal = board.check_and_reveal("DOG");
        assert_eq!(reveal, Reveal::default());
        assert!(board.cells().all(|(_, c)| !c.solved));
        assert!(!board.is_word_solved("DOG"));
    }

    #[test]
    fn conflicting_crossing_is_rejected() {
        let err = Board::from_layout("0,0,GOLD,H|0,0,DOG,V").unwrap_err();
        assert!(matches!(
            err,
            LevelError::Conflict { row: 0, col: 0, existing: 'G', wanted: 'D', .. }
        ));
    }

    fn placement() -> impl Strategy<Value = WordPlacement> {
        (0u32..4, 0u32..4, "[AB]{1,4}", any::<bool>()).prop_map(|(row, col, word, h)| {
            WordPlacement {
                row,
                col,
                word,
                direction: if h {
                    crate::level::Direction::Horizontal
                } else {
                    crate::level::Direction::Vertical
                },
            }
        })
    }

    proptest! {
        #[test]
        fn accepted_boards_agree_at_every_crossing(placements in prop::collection::vec(placement(), 1..6)) {
            if let Ok(board) = Board::new(placements.clone()) {
                for p in &placements {
                    for (row, col, letter) in p.cells() {
                        let id = board.cell_at(row, col).unwrap();
                        prop_assert_eq!(board.cell(id).unwrap().expected, letter);
                    }
                }
            }
        }

        #[test]
        fn reveal_is_idempotent(word_index in 0usize..4) {
            let mut board = Board::from_layout(LAYOUT).unwrap();
            let word = board.placements()[word_index].word.clone();
            board.check_and_reveal(&word);
            let snapshot: Vec<bool> = board.cells().map(|(_, c)| c.solved).collect();
            let again = board.check_and_reveal(&word);
            prop_assert!(again.matched);
            prop_assert!(again.newly_solved.is_empty());
            let after: Vec<bool> = board.cells().map(|(_, c)| c.solved).collect();
            prop_assert_eq!(snapshot, after);
        }
    }
}
