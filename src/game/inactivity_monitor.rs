use std::rc::Rc;

use log::{debug, error, info};

use super::game_session::GameSession;
use super::notifier::Notifier;
use super::stats_manager::StatsManager;
use super::store::{load_json, save_json, KeyValueStore, LAST_ACTIVITY_KEY};
use crate::clock::Clock;
use crate::destroyable::Destroyable;
use crate::model::Severity;

/// A game with no interaction for longer than this is ended.
pub const INACTIVITY_THRESHOLD_MS: i64 = 30 * 60 * 1000;
pub const CHECK_INTERVAL_MS: i64 = 60 * 1000;
pub const INACTIVITY_MESSAGE: &str =
    "Your game was inactive for more than 30 minutes and has been ended.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Watching,
    /// A stale game was ended at this time; no further game is ended until activity
    /// resumes or no card is loaded.
    ForceEnded { at: i64 },
}

pub struct InactivityMonitor {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    last_activity: i64,
    state: MonitorState,
    next_check_at: Option<i64>,
}

impl InactivityMonitor {
    pub fn new(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        let last_activity = load_json::<i64>(store.as_ref(), LAST_ACTIVITY_KEY)
            .unwrap_or_else(|| clock.now_millis());
        Self {
            store,
            clock,
            last_activity,
            state: MonitorState::Watching,
            next_check_at: None,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn last_activity(&self) -> i64 {
        self.last_activity
    }

    /// Any user input counts as activity.
    pub fn record_activity(&mut self) {
        self.last_activity = self.clock.now_millis();
        save_json(self.store.as_ref(), LAST_ACTIVITY_KEY, &self.last_activity);
    }

    fn idle_for(&self, now: i64) -> i64 {
        now - self.last_activity
    }

    /// Ends the current game when it has gone stale: records a loss, deals a new card
    /// and notifies. Returns whether a game was ended.
    pub fn check_inactivity(
        &mut self,
        session: &mut GameSession,
        stats: &mut StatsManager,
        notifier: &dyn Notifier,
    ) -> bool {
        let now = self.clock.now_millis();
        let has_card = session.card().is_some();
        let game_started = stats.stats().last_game_start_time.is_some();
        let idle = self.idle_for(now);

        if !has_card || (game_started && idle < INACTIVITY_THRESHOLD_MS) {
            if let MonitorState::ForceEnded { .. } = self.state {
                debug!(target: "inactivity", "Activity resumed; watching again");
            }
            self.state = MonitorState::Watching;
        }

        if self.state != MonitorState::Watching {
            return false;
        }
        if !has_card || !game_started || idle <= INACTIVITY_THRESHOLD_MS {
            return false;
        }

        info!(target: "inactivity", "Ending game idle for {}s", idle / 1000);
        self.state = MonitorState::ForceEnded { at: now };
        stats.record_game_end(false);
        if let Err(e) = session.reset_game() {
            error!(target: "inactivity", "Failed to reset idle game: {}", e);
            notifier.notify("Failed to reset game. Please try again.", Severity::Error);
        }
        notifier.notify(INACTIVITY_MESSAGE, Severity::Warning);
        true
    }

    pub fn schedule_check(&mut self) {
        self.next_check_at = Some(self.clock.now_millis() + CHECK_INTERVAL_MS);
    }

    /// Safe to call when nothing is scheduled. Returns whether a check was pending.
    pub fn cancel_pending_check(&mut self) -> bool {
        self.next_check_at.take().is_some()
    }

    pub fn is_check_pending(&self) -> bool {
        self.next_check_at.is_some()
    }

    /// Runs the scheduled check once its time has come, then schedules the next one.
    pub fn run_due_check(
        &mut self,
        session: &mut GameSession,
        stats: &mut StatsManager,
        notifier: &dyn Notifier,
    ) -> bool {
        match self.next_check_at {
            Some(at) if self.clock.now_millis() >= at => {
                self.schedule_check();
                self.check_inactivity(session, stats, notifier)
            }
            _ => false,
        }
    }
}

impl Destroyable for InactivityMonitor {
    fn destroy(&mut self) {
        self.cancel_pending_check();
    }
}
