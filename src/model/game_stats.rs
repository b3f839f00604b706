use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// How many finished games the history keeps.
pub const GAME_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "date")]
    pub timestamp: i64,
    pub won: bool,
}

/// Long-lived statistics ledger. All times are whole seconds; timestamps are epoch
/// milliseconds.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStats {
    pub total_games: u32,
    pub total_bingos: u32,
    pub total_blackouts: u32,
    pub games_with_wins: u32,
    pub current_win_streak: u32,
    pub longest_win_streak: u32,
    pub fastest_bingo_time: Option<u64>,
    pub fastest_blackout_time: Option<u64>,
    pub win_times: Vec<u64>,
    pub blackout_times: Vec<u64>,
    /// Win-type label to count, in first-seen order.
    #[serde_as(as = "serde_with::Map<_, _>")]
    pub win_type_counts: Vec<(String, u32)>,
    pub last_game_start_time: Option<i64>,
    pub current_game_has_win: bool,
    pub game_history: Vec<GameRecord>,
}

impl GameStats {
    pub fn win_type_count(&self, win_type: &str) -> u32 {
        self.win_type_counts
            .iter()
            .find(|(label, _)| label == win_type)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub(crate) fn increment_win_type(&mut self, win_type: &str) {
        match self
            .win_type_counts
            .iter_mut()
            .find(|(label, _)| label == win_type)
        {
            Some((_, count)) => *count += 1,
            None => self.win_type_counts.push((win_type.to_string(), 1)),
        }
    }

    pub(crate) fn push_history(&mut self, record: GameRecord) {
        self.game_history.push(record);
        if self.game_history.len() > GAME_HISTORY_LIMIT {
            let excess = self.game_history.len() - GAME_HISTORY_LIMIT;
            self.game_history.drain(..excess);
        }
    }
}
