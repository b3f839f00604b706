use super::{CardId, CellPosition, SessionState, WinState};

/// Change notifications from the game session, emitted once an operation has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    CardDealt { card_id: CardId },
    SquareToggled { position: CellPosition, marked: bool },
    SessionStateChanged(SessionState),
    WinStateChanged(WinState),
    MarkedCountChanged(u8),
    NewWin(WinState),
}
