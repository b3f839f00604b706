use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Cell, CellPosition};
use crate::error::{BingoError, Result};

pub const GRID_SIZE: usize = 5;
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;
pub const FREE_POSITION: CellPosition = CellPosition { row: 2, col: 2 };
/// Events on a card that carries the free space.
pub const CARD_EVENT_COUNT: usize = CELL_COUNT - 1;

/// A 5x5 grid of cells. Replaced wholesale on every change, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Card {
    pub(crate) fn from_cells(cells: [[Cell; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn cell(&self, position: CellPosition) -> Option<&Cell> {
        self.get(position.row, position.col)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; GRID_SIZE]> {
        self.cells.iter()
    }

    /// Every cell with its position, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellPosition, &Cell)> {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (CellPosition::new(row, col), cell))
        })
    }

    pub fn has_free_space(&self) -> bool {
        self.iter().any(|(_, cell)| cell.is_free)
    }

    /// Labels of the non-free cells, row-major.
    pub fn events(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, cell)| !cell.is_free)
            .map(|(_, cell)| cell.event.as_str())
            .collect()
    }

    /// A copy of this card with the given cell's mark flipped. The caller checks bounds
    /// and the free space.
    pub(crate) fn with_toggled(&self, position: CellPosition) -> Card {
        let mut card = self.clone();
        let cell = &mut card.cells[position.row][position.col];
        *cell = cell.toggled();
        card
    }

    /// Structural check used before trusting a card that came from storage.
    pub fn validate(&self) -> Result<()> {
        let free_positions: Vec<CellPosition> = self
            .iter()
            .filter(|(_, cell)| cell.is_free)
            .map(|(position, _)| position)
            .collect();
        match free_positions.as_slice() {
            [] => (),
            [FREE_POSITION] => {
                if !self.cells[FREE_POSITION.row][FREE_POSITION.col].marked {
                    return Err(BingoError::InvalidEventList(
                        "free space is not marked".to_string(),
                    ));
                }
            }
            _ => {
                return Err(BingoError::InvalidEventList(format!(
                    "free space must be only at the center, found {:?}",
                    free_positions
                )))
            }
        }

        let mut seen = HashSet::new();
        for event in self.events() {
            if event.trim().is_empty() {
                return Err(BingoError::InvalidEventList("empty event label".to_string()));
            }
            if !seen.insert(event) {
                return Err(BingoError::DuplicateEvent(event.to_string()));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                let mark = match (cell.is_free, cell.marked) {
                    (true, _) => "[*]",
                    (false, true) => "[X]",
                    (false, false) => "[ ]",
                };
                f.write_str(mark)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
