use serde::{Deserialize, Serialize};

use super::card::GRID_SIZE;
use super::CellPosition;

pub const BLACKOUT_LABEL: &str = "Blackout";

/// The win report attached to the latest toggle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinState {
    pub has_bingo: bool,
    /// Comma-joined line labels, or `"Blackout"`.
    pub win_type: Option<String>,
    pub is_blackout: bool,
    pub winning_cells: Vec<CellPosition>,
}

impl WinState {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn blackout() -> Self {
        let winning_cells = (0..GRID_SIZE)
            .flat_map(|row| (0..GRID_SIZE).map(move |col| CellPosition::new(row, col)))
            .collect();
        Self {
            has_bingo: true,
            win_type: Some(BLACKOUT_LABEL.to_string()),
            is_blackout: true,
            winning_cells,
        }
    }

    /// True when `current` should be celebrated: a win appeared, or a line win became
    /// a blackout.
    pub fn is_new_win(previous: &WinState, current: &WinState) -> bool {
        current.has_bingo
            && (!previous.has_bingo || (!previous.is_blackout && current.is_blackout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_win() -> WinState {
        WinState {
            has_bingo: true,
            win_type: Some("Row 1".to_string()),
            is_blackout: false,
            winning_cells: (0..5).map(|col| CellPosition::new(0, col)).collect(),
        }
    }

    #[test]
    fn test_blackout_covers_every_cell() {
        let state = WinState::blackout();
        assert_eq!(state.winning_cells.len(), 25);
        assert_eq!(state.win_type.as_deref(), Some(BLACKOUT_LABEL));
        assert!(state.has_bingo && state.is_blackout);
    }

    #[test]
    fn test_new_win_edges() {
        let none = WinState::none();
        assert!(WinState::is_new_win(&none, &line_win()));
        assert!(!WinState::is_new_win(&line_win(), &line_win()));
        assert!(WinState::is_new_win(&line_win(), &WinState::blackout()));
        assert!(!WinState::is_new_win(&WinState::blackout(), &WinState::blackout()));
        assert!(!WinState::is_new_win(&line_win(), &none));
    }
}
