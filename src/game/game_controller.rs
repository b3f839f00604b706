use std::rc::Rc;

use log::{error, info, warn};

use super::game_session::GameSession;
use super::inactivity_monitor::InactivityMonitor;
use super::notifier::Notifier;
use super::settings::{SettingsChange, SettingsManager, SettingsProvider};
use super::share_code::{decode_share_code, encode_share_code};
use super::stats_manager::StatsManager;
use super::store::KeyValueStore;
use crate::clock::Clock;
use crate::destroyable::Destroyable;
use crate::error::{BingoError, Result};
use crate::events::{Channel, EventObserver};
use crate::model::{CardId, GameEvent, Severity, TimerState, WinState};

/// What the player saw when giving up mid-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub elapsed_secs: u64,
    pub marked_count: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The running game was abandoned without a win; the card stays until
    /// [`GameController::finish_give_up`].
    GaveUp(GameOverSummary),
    NewCard,
}

/// Application flow around a game: starting, playing, giving up, sharing and the
/// statistics that follow from it.
pub struct GameController {
    session: GameSession,
    stats: StatsManager,
    monitor: InactivityMonitor,
    settings: Rc<SettingsManager>,
    notifier: Rc<dyn Notifier>,
    clock: Rc<dyn Clock>,
    timer_state: TimerState,
    game_event_observer: EventObserver<GameEvent>,
}

impl GameController {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        let (game_event_emitter, game_event_observer) = Channel::new();
        let settings = Rc::new(SettingsManager::load(store.clone()));
        let settings_provider: Rc<dyn SettingsProvider> = settings.clone();
        let stats = StatsManager::new(store.clone(), settings_provider, clock.clone());
        let session = GameSession::new(store.clone(), clock.clone(), game_event_emitter);
        let monitor = InactivityMonitor::new(store, clock.clone());

        let mut controller = Self {
            session,
            stats,
            monitor,
            settings,
            notifier,
            clock,
            timer_state: TimerState::default(),
            game_event_observer,
        };
        if controller.session.card().is_some() {
            // a restored card whose start was never recorded starts counting now
            if controller.stats.stats().last_game_start_time.is_none() {
                controller.stats.record_game_start();
            }
            controller.sync_timer();
            controller.monitor.schedule_check();
        }
        controller
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.session = self.session.with_seed(seed);
        self
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn stats(&self) -> &StatsManager {
        &self.stats
    }

    pub fn settings(&self) -> &SettingsManager {
        &self.settings
    }

    pub fn timer_state(&self) -> &TimerState {
        &self.timer_state
    }

    pub fn monitor(&self) -> &InactivityMonitor {
        &self.monitor
    }

    pub fn events(&self) -> &EventObserver<GameEvent> {
        &self.game_event_observer
    }

    fn sync_timer(&mut self) {
        self.timer_state = match self.session.card_id() {
            Some(card_id) => {
                let started = self
                    .stats
                    .stats()
                    .last_game_start_time
                    .unwrap_or_else(|| self.clock.now_millis());
                TimerState::started(card_id.clone(), started)
            }
            None => TimerState::default(),
        };
    }

    fn fail(&self, message: &str, e: BingoError) -> BingoError {
        error!(target: "game_controller", "{}: {}", message, e);
        self.notifier.notify(message, Severity::Error);
        e
    }

    pub fn start_new_game(&mut self) -> Result<()> {
        self.session
            .initialize_card()
            .map_err(|e| self.fail("Failed to start new game. Please try again.", e))?;
        self.stats.record_game_start();
        self.monitor.record_activity();
        self.sync_timer();
        self.monitor.schedule_check();
        self.notifier.notify("New game started!", Severity::Success);
        Ok(())
    }

    /// Toggles a square for the player. Returns the win state when this toggle produced
    /// a new win, which has then been recorded in the statistics.
    pub fn toggle_square(&mut self, row: usize, col: usize) -> Option<WinState> {
        self.monitor.record_activity();
        let previous = self.session.win_state().clone();
        if !self.session.toggle_square(row, col) {
            return None;
        }
        let current = self.session.win_state();
        if !WinState::is_new_win(&previous, current) {
            return None;
        }
        let current = current.clone();
        self.stats
            .record_bingo(current.win_type.as_deref(), current.is_blackout);
        if current.is_blackout {
            self.timer_state = self.timer_state.ended(self.clock.now_millis());
        }
        Some(current)
    }

    /// Ends the current game. Without a win this is a give-up, recorded as a loss;
    /// otherwise the win is recorded and a new card is dealt.
    pub fn reset_game(&mut self) -> Result<ResetOutcome> {
        let state = self.session.state();
        let game_running = self.stats.stats().last_game_start_time.is_some() && state.has_card();
        if game_running && !state.is_won() {
            let summary = GameOverSummary {
                elapsed_secs: self.stats.current_game_time(),
                marked_count: self.session.marked_count(),
            };
            info!(target: "game_controller", "Gave up: {:?}", summary);
            self.stats.record_game_end(false);
            self.timer_state = self.timer_state.ended(self.clock.now_millis());
            return Ok(ResetOutcome::GaveUp(summary));
        }

        self.stats.record_game_end(self.session.has_achieved_bingo());
        self.session
            .reset_game()
            .map_err(|e| self.fail("Failed to reset game. Please try again.", e))?;
        self.sync_timer();
        Ok(ResetOutcome::NewCard)
    }

    /// Replaces the abandoned card after a give-up.
    pub fn finish_give_up(&mut self) -> Result<()> {
        self.session
            .reset_game()
            .map_err(|e| self.fail("Failed to reset game. Please try again.", e))?;
        self.sync_timer();
        Ok(())
    }

    pub fn new_game_after_win(&mut self) -> Result<()> {
        self.stats.record_game_end(self.session.has_achieved_bingo());
        self.session
            .reset_game()
            .map_err(|e| self.fail("Failed to start new game. Please try again.", e))?;
        self.sync_timer();
        self.notifier.notify("New game started!", Severity::Success);
        Ok(())
    }

    pub fn share_code(&self) -> Result<String> {
        let card = self.session.card().ok_or(BingoError::NoCard)?;
        encode_share_code(card)
    }

    /// Starts a game on the card encoded in `code`. Invalid codes leave the current game
    /// alone.
    pub fn load_shared_code(&mut self, code: &str) -> bool {
        let Some(events) = decode_share_code(code) else {
            warn!(target: "game_controller", "Ignoring invalid share code");
            self.notifier
                .notify("That shared card link is invalid.", Severity::Warning);
            return false;
        };
        if let Err(e) = self.session.load_shared_card(&events) {
            self.fail("Failed to load shared card. Please try again.", e);
            return false;
        }
        self.stats.record_game_start();
        self.monitor.record_activity();
        self.sync_timer();
        self.monitor.schedule_check();
        self.notifier.notify("Shared card loaded!", Severity::Success);
        true
    }

    pub fn record_activity(&mut self) {
        self.monitor.record_activity();
    }

    fn after_inactivity_check(&mut self, ended: bool) -> bool {
        if ended {
            self.sync_timer();
        }
        ended
    }

    pub fn check_inactivity(&mut self) -> bool {
        let ended = self.monitor.check_inactivity(
            &mut self.session,
            &mut self.stats,
            self.notifier.as_ref(),
        );
        self.after_inactivity_check(ended)
    }

    /// The application came back to the foreground.
    pub fn on_visible(&mut self) -> bool {
        self.check_inactivity()
    }

    /// Periodic driver for the scheduled inactivity check.
    pub fn tick(&mut self) -> bool {
        let ended = self.monitor.run_due_check(
            &mut self.session,
            &mut self.stats,
            self.notifier.as_ref(),
        );
        self.after_inactivity_check(ended)
    }

    /// One-second stopwatch tick scheduled for `card_id`; ignored once that card is gone.
    pub fn tick_timer(&mut self, card_id: &CardId) -> Option<&TimerState> {
        let ticked = self.timer_state.ticked(card_id, self.clock.now_millis())?;
        self.timer_state = ticked;
        Some(&self.timer_state)
    }

    pub fn update_settings(&mut self, change: &SettingsChange) {
        self.settings.update(change);
    }

    pub fn clear_stats(&mut self) {
        self.stats.reset_stats();
        self.notifier
            .notify("Statistics cleared successfully!", Severity::Success);
    }

    pub fn export_stats(&self) -> Result<String> {
        let exported = self
            .stats
            .export_stats()
            .map_err(|e| self.fail("Failed to export statistics. Please try again.", e))?;
        self.notifier
            .notify("Statistics exported successfully!", Severity::Success);
        Ok(exported)
    }
}

impl Destroyable for GameController {
    fn destroy(&mut self) {
        self.monitor.destroy();
        self.timer_state = self.timer_state.ended(self.clock.now_millis());
    }
}
