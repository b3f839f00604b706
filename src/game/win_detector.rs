use itertools::Itertools;

use crate::model::{Card, CellPosition, GRID_SIZE};

/// Line wins found on a card, before blackout precedence is applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BingoResult {
    pub has_bingo: bool,
    pub win_type: Option<String>,
    pub winning_cells: Vec<CellPosition>,
}

struct Line {
    label: String,
    cells: Vec<CellPosition>,
}

/// Rows, then columns, then the two diagonals.
fn all_lines() -> Vec<Line> {
    let rows = (0..GRID_SIZE).map(|row| Line {
        label: format!("Row {}", row + 1),
        cells: (0..GRID_SIZE).map(|col| CellPosition::new(row, col)).collect(),
    });
    let columns = (0..GRID_SIZE).map(|col| Line {
        label: format!("Column {}", col + 1),
        cells: (0..GRID_SIZE).map(|row| CellPosition::new(row, col)).collect(),
    });
    let diagonals = [
        Line {
            label: "Diagonal \\\\".to_string(),
            cells: (0..GRID_SIZE).map(|i| CellPosition::new(i, i)).collect(),
        },
        Line {
            label: "Diagonal //".to_string(),
            cells: (0..GRID_SIZE)
                .map(|i| CellPosition::new(i, GRID_SIZE - 1 - i))
                .collect(),
        },
    ];
    rows.chain(columns).chain(diagonals).collect()
}

fn is_marked(card: &Card, position: CellPosition) -> bool {
    card.cell(position).map(|cell| cell.marked).unwrap_or(false)
}

pub fn count_marked(card: &Card) -> u8 {
    card.iter().filter(|(_, cell)| cell.marked).count() as u8
}

pub fn check_blackout(card: &Card) -> bool {
    card.iter().all(|(_, cell)| cell.marked)
}

/// Every complete line at once. Cells shared by two winning lines are listed once, in
/// the order they were first reached.
pub fn check_bingo(card: &Card) -> BingoResult {
    let winning_lines: Vec<Line> = all_lines()
        .into_iter()
        .filter(|line| line.cells.iter().all(|&position| is_marked(card, position)))
        .collect();

    if winning_lines.is_empty() {
        return BingoResult::default();
    }

    BingoResult {
        has_bingo: true,
        win_type: Some(winning_lines.iter().map(|line| line.label.as_str()).join(", ")),
        winning_cells: winning_lines
            .iter()
            .flat_map(|line| line.cells.iter().copied())
            .unique()
            .collect(),
    }
}
