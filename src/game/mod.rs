pub mod card_generator;
pub mod game_controller;
pub mod game_session;
pub mod inactivity_monitor;
pub mod notifier;
pub mod settings;
pub mod share_code;
pub mod stats_manager;
pub mod store;
pub mod win_detector;

pub use card_generator::{generate_card, shuffle};
pub use game_controller::{GameController, GameOverSummary, ResetOutcome};
pub use game_session::GameSession;
pub use inactivity_monitor::{InactivityMonitor, MonitorState};
pub use notifier::{LogNotifier, Notifier, ToastQueue};
pub use settings::{Settings, SettingsChange, SettingsManager, SettingsProvider};
pub use share_code::{decode_share_code, encode_share_code};
pub use stats_manager::StatsManager;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use win_detector::{check_bingo, check_blackout, count_marked, BingoResult};
