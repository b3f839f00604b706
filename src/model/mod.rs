pub mod card;
mod card_id;
mod cell;
mod cell_position;
pub mod event_catalog;
mod game_event;
mod game_stats;
mod session_state;
mod severity;
mod timer_state;
mod win_state;

pub use card::{Card, CARD_EVENT_COUNT, CELL_COUNT, FREE_POSITION, GRID_SIZE};
pub use card_id::CardId;
pub use cell::Cell;
pub use cell_position::CellPosition;
pub use event_catalog::{event_emoji, BINGO_EVENTS, FREE_SPACE};
pub use game_event::GameEvent;
pub use game_stats::{GameRecord, GameStats, GAME_HISTORY_LIMIT};
pub use session_state::SessionState;
pub use severity::Severity;
pub use timer_state::{format_elapsed, TimerState};
pub use win_state::{WinState, BLACKOUT_LABEL};
