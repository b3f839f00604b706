use std::rc::Rc;

use log::{debug, info};
use serde::Serialize;

use super::settings::SettingsProvider;
use super::store::{load_json, save_json, KeyValueStore, STATS_KEY};
use crate::clock::{whole_seconds_between, Clock};
use crate::error::Result;
use crate::model::{GameRecord, GameStats, BLACKOUT_LABEL};

const EXPORT_VERSION: &str = "1.0";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsExport<'a> {
    stats: &'a GameStats,
    exported_at: String,
    version: &'static str,
}

/// Owns the persisted [`GameStats`] ledger and applies game outcomes to it.
pub struct StatsManager {
    store: Rc<dyn KeyValueStore>,
    settings: Rc<dyn SettingsProvider>,
    clock: Rc<dyn Clock>,
    stats: GameStats,
}

impl StatsManager {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        settings: Rc<dyn SettingsProvider>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let stats = load_json(store.as_ref(), STATS_KEY).unwrap_or_default();
        Self {
            store,
            settings,
            clock,
            stats,
        }
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    fn tracking(&self) -> bool {
        self.settings.settings().track_statistics
    }

    fn save(&self) {
        save_json(self.store.as_ref(), STATS_KEY, &self.stats);
    }

    pub fn record_game_start(&mut self) {
        if !self.tracking() {
            return;
        }
        self.stats.last_game_start_time = Some(self.clock.now_millis());
        self.stats.current_game_has_win = false;
        self.save();
    }

    pub fn record_bingo(&mut self, win_type: Option<&str>, is_blackout: bool) {
        if !self.tracking() {
            return;
        }
        let now = self.clock.now_millis();
        let game_time = self
            .stats
            .last_game_start_time
            .map(|start| whole_seconds_between(start, now));

        let stats = &mut self.stats;
        if is_blackout {
            stats.increment_win_type(BLACKOUT_LABEL);
        } else if let Some(win_type) = win_type {
            for label in win_type.split(',').map(str::trim).filter(|l| !l.is_empty()) {
                stats.increment_win_type(label);
            }
        }

        if let Some(seconds) = game_time.filter(|t| *t > 0) {
            let seconds = seconds as u64;
            let (times, fastest) = if is_blackout {
                (&mut stats.blackout_times, &mut stats.fastest_blackout_time)
            } else {
                (&mut stats.win_times, &mut stats.fastest_bingo_time)
            };
            times.push(seconds);
            *fastest = Some(fastest.map_or(seconds, |f| f.min(seconds)));
        }

        stats.total_bingos += 1;
        if is_blackout {
            stats.total_blackouts += 1;
        }
        // several wins in one game count once toward the streak
        if !stats.current_game_has_win {
            stats.current_win_streak += 1;
        }
        stats.longest_win_streak = stats.longest_win_streak.max(stats.current_win_streak);
        stats.current_game_has_win = true;

        info!(
            target: "stats",
            "Recorded {} after {:?}s; streak {}",
            if is_blackout { BLACKOUT_LABEL } else { win_type.unwrap_or("bingo") },
            game_time,
            stats.current_win_streak
        );
        self.save();
    }

    pub fn record_game_end(&mut self, won: bool) {
        if !self.tracking() {
            return;
        }
        let now = self.clock.now_millis();
        let stats = &mut self.stats;
        stats.push_history(GameRecord {
            timestamp: now,
            won,
        });
        stats.total_games += 1;
        if won {
            stats.games_with_wins += 1;
        } else {
            stats.current_win_streak = 0;
        }
        // primes the next game's timer before it is explicitly started
        stats.last_game_start_time = Some(now);
        stats.current_game_has_win = false;

        debug!(target: "stats", "Game ended; won: {}; total games: {}", won, stats.total_games);
        self.save();
    }

    /// The most frequent win type; the earliest recorded one wins ties.
    pub fn most_common_win_type(&self) -> Option<(&str, u32)> {
        self.stats
            .win_type_counts
            .iter()
            .fold(None, |best: Option<(&str, u32)>, (label, count)| match best {
                Some((_, best_count)) if best_count >= *count => best,
                _ => Some((label.as_str(), *count)),
            })
    }

    pub fn current_game_time(&self) -> u64 {
        match self.stats.last_game_start_time {
            Some(start) => whole_seconds_between(start, self.clock.now_millis()).max(0) as u64,
            None => 0,
        }
    }

    pub fn average_win_time(&self) -> Option<u64> {
        floor_mean(&self.stats.win_times)
    }

    pub fn average_blackout_time(&self) -> Option<u64> {
        floor_mean(&self.stats.blackout_times)
    }

    pub fn win_rate_percent(&self) -> u32 {
        if self.stats.total_games == 0 {
            return 0;
        }
        (self.stats.games_with_wins as f64 / self.stats.total_games as f64 * 100.0).round() as u32
    }

    /// The last `limit` bingo times, newest first.
    pub fn recent_win_times(&self, limit: usize) -> Vec<u64> {
        self.stats.win_times.iter().rev().take(limit).copied().collect()
    }

    pub fn recent_blackout_times(&self, limit: usize) -> Vec<u64> {
        self.stats
            .blackout_times
            .iter()
            .rev()
            .take(limit)
            .copied()
            .collect()
    }

    pub fn reset_stats(&mut self) {
        self.stats = GameStats {
            last_game_start_time: Some(self.clock.now_millis()),
            ..GameStats::default()
        };
        info!(target: "stats", "Statistics reset");
        self.save();
    }

    pub fn export_stats(&self) -> Result<String> {
        let now = self.clock.now_millis();
        let exported_at = chrono::DateTime::from_timestamp_millis(now)
            .unwrap_or_default()
            .to_rfc3339();
        Ok(serde_json::to_string_pretty(&StatsExport {
            stats: &self.stats,
            exported_at,
            version: EXPORT_VERSION,
        })?)
    }
}

fn floor_mean(times: &[u64]) -> Option<u64> {
    if times.is_empty() {
        return None;
    }
    Some(times.iter().sum::<u64>() / times.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::game::settings::Settings;
    use crate::game::store::MemoryStore;
    use crate::model::GAME_HISTORY_LIMIT;
    use std::cell::RefCell;

    struct Fixture {
        store: Rc<MemoryStore>,
        settings: Rc<RefCell<Settings>>,
        clock: ManualClock,
        manager: StatsManager,
    }

    fn fixture() -> Fixture {
        let store = Rc::new(MemoryStore::new());
        let settings = Rc::new(RefCell::new(Settings::default()));
        let clock = ManualClock::new(1_700_000_000_000);
        let manager = StatsManager::new(store.clone(), settings.clone(), Rc::new(clock.clone()));
        Fixture {
            store,
            settings,
            clock,
            manager,
        }
    }

    #[test]
    fn test_row_three_game_scenario() {
        let mut f = fixture();
        assert_eq!(f.manager.stats().total_games, 0);
        f.manager.record_game_start();
        f.clock.advance_secs(95);
        f.manager.record_bingo(Some("Row 3"), false);
        f.manager.record_game_end(true);

        let stats = f.manager.stats();
        assert_eq!(stats.total_games, 1);
        assert_eq!(stats.total_bingos, 1);
        assert_eq!(stats.games_with_wins, 1);
        assert_eq!(stats.current_win_streak, 1);
        assert_eq!(stats.win_type_counts, vec![("Row 3".to_string(), 1)]);
        assert_eq!(stats.win_times, vec![95]);
        assert_eq!(stats.fastest_bingo_time, Some(95));
        assert_eq!(stats.game_history.len(), 1);
        assert!(stats.game_history[0].won);
    }

    #[test]
    fn test_second_win_in_same_game_keeps_streak() {
        let mut f = fixture();
        f.manager.record_game_start();
        f.clock.advance_secs(30);
        f.manager.record_bingo(Some("Row 1, Column 2"), false);
        f.clock.advance_secs(600);
        f.manager.record_bingo(Some("Blackout"), true);

        let stats = f.manager.stats();
        assert_eq!(stats.current_win_streak, 1);
        assert_eq!(stats.longest_win_streak, 1);
        assert_eq!(stats.total_bingos, 2);
        assert_eq!(stats.total_blackouts, 1);
        assert_eq!(stats.win_type_count("Row 1"), 1);
        assert_eq!(stats.win_type_count("Column 2"), 1);
        assert_eq!(stats.win_type_count(BLACKOUT_LABEL), 1);
        assert_eq!(stats.blackout_times, vec![630]);
        assert_eq!(stats.fastest_blackout_time, Some(630));

        f.manager.record_game_end(true);
        assert_eq!(f.manager.stats().current_win_streak, 1);

        f.manager.record_game_start();
        f.manager.record_game_end(false);
        assert_eq!(f.manager.stats().current_win_streak, 0);
        assert_eq!(f.manager.stats().longest_win_streak, 1);
        assert_eq!(f.manager.stats().games_with_wins, 1);
        assert_eq!(f.manager.stats().total_games, 2);
    }

    #[test]
    fn test_streak_grows_across_won_games() {
        let mut f = fixture();
        for _ in 0..3 {
            f.manager.record_game_start();
            f.clock.advance_secs(10);
            f.manager.record_bingo(Some("Column 5"), false);
            f.manager.record_game_end(true);
        }
        assert_eq!(f.manager.stats().current_win_streak, 3);
        assert_eq!(f.manager.stats().longest_win_streak, 3);
        assert_eq!(f.manager.win_rate_percent(), 100);
    }

    #[test]
    fn test_sub_second_and_unstarted_wins_record_no_time() {
        let mut f = fixture();
        f.manager.record_bingo(Some("Row 2"), false);
        assert!(f.manager.stats().win_times.is_empty());
        assert_eq!(f.manager.stats().total_bingos, 1);

        f.manager.record_game_start();
        f.clock.advance_millis(999);
        f.manager.record_bingo(Some("Row 2"), false);
        assert!(f.manager.stats().win_times.is_empty());
        assert_eq!(f.manager.stats().fastest_bingo_time, None);
    }

    #[test]
    fn test_game_end_primes_the_next_timer() {
        let mut f = fixture();
        assert_eq!(f.manager.current_game_time(), 0);
        f.manager.record_game_start();
        f.clock.advance_millis(12_750);
        assert_eq!(f.manager.current_game_time(), 12);

        f.manager.record_game_end(false);
        assert_eq!(f.manager.current_game_time(), 0);
        assert_eq!(
            f.manager.stats().last_game_start_time,
            Some(f.clock.now_millis())
        );
    }

    #[test]
    fn test_history_keeps_last_hundred() {
        let mut f = fixture();
        for i in 0..(GAME_HISTORY_LIMIT + 20) {
            f.clock.advance_secs(1);
            f.manager.record_game_end(i % 3 == 0);
        }
        let history = &f.manager.stats().game_history;
        assert_eq!(history.len(), GAME_HISTORY_LIMIT);
        assert_eq!(history.last().unwrap().timestamp, f.clock.now_millis());
        assert_eq!(f.manager.stats().total_games, 120);
    }

    #[test]
    fn test_most_common_win_type_prefers_first_seen_on_tie() {
        let mut f = fixture();
        assert_eq!(f.manager.most_common_win_type(), None);
        f.manager.record_bingo(Some("Column 4"), false);
        f.manager.record_bingo(Some("Row 1"), false);
        assert_eq!(f.manager.most_common_win_type(), Some(("Column 4", 1)));
        f.manager.record_bingo(Some("Row 1"), false);
        assert_eq!(f.manager.most_common_win_type(), Some(("Row 1", 2)));
    }

    #[test]
    fn test_averages_floor() {
        let mut f = fixture();
        assert_eq!(f.manager.average_win_time(), None);
        for secs in [10, 20, 25] {
            f.manager.record_game_start();
            f.clock.advance_secs(secs);
            f.manager.record_bingo(Some("Row 5"), false);
            f.manager.record_game_end(true);
        }
        assert_eq!(f.manager.average_win_time(), Some(18));
        assert_eq!(f.manager.average_blackout_time(), None);
        assert_eq!(f.manager.recent_win_times(2), vec![25, 20]);
        assert_eq!(f.manager.stats().fastest_bingo_time, Some(10));
    }

    #[test]
    fn test_disabled_tracking_records_nothing() {
        let mut f = fixture();
        f.settings.borrow_mut().track_statistics = false;
        f.manager.record_game_start();
        f.manager.record_bingo(Some("Row 1"), false);
        f.manager.record_game_end(true);
        assert_eq!(*f.manager.stats(), GameStats::default());
        assert!(!f.store.contains(STATS_KEY));

        f.settings.borrow_mut().track_statistics = true;
        f.manager.record_game_end(false);
        assert_eq!(f.manager.stats().total_games, 1);
    }

    #[test]
    fn test_stats_survive_reload_and_reset() {
        let mut f = fixture();
        f.manager.record_bingo(Some("Row 1"), false);
        f.manager.record_game_end(true);

        let reloaded = StatsManager::new(
            f.store.clone(),
            f.settings.clone(),
            Rc::new(f.clock.clone()),
        );
        assert_eq!(reloaded.stats(), f.manager.stats());

        f.clock.advance_secs(5);
        f.manager.reset_stats();
        let stats = f.manager.stats();
        assert_eq!(stats.total_games, 0);
        assert!(stats.win_type_counts.is_empty());
        assert_eq!(stats.last_game_start_time, Some(f.clock.now_millis()));
    }

    #[test]
    fn test_export_wraps_stats() {
        let mut f = fixture();
        f.manager.record_game_end(false);
        let exported: serde_json::Value =
            serde_json::from_str(&f.manager.export_stats().unwrap()).unwrap();
        assert_eq!(exported["version"], "1.0");
        assert_eq!(exported["stats"]["totalGames"], 1);
        assert!(exported["exportedAt"]
            .as_str()
            .unwrap()
            .starts_with("2023-11-14T"));
    }

    #[test]
    fn test_recent_blackout_times_newest_first() {
        let mut f = fixture();
        assert!(f.manager.recent_blackout_times(10).is_empty());
        for secs in [300, 240, 410] {
            f.manager.record_game_start();
            f.clock.advance_secs(secs);
            f.manager.record_bingo(Some(BLACKOUT_LABEL), true);
            f.manager.record_game_end(true);
        }
        assert_eq!(f.manager.recent_blackout_times(2), vec![410, 240]);
        assert_eq!(f.manager.recent_blackout_times(10), vec![410, 240, 300]);
        assert!(f.manager.recent_win_times(10).is_empty());
        assert_eq!(f.manager.average_blackout_time(), Some(316));
    }
}
