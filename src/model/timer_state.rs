use serde::{Deserialize, Serialize};

use super::CardId;
use crate::clock::whole_seconds_between;

/// Elapsed-time display state for the card currently in play.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub card_id: Option<CardId>,
    pub started_timestamp: Option<i64>,
    pub ended_timestamp: Option<i64>,
    pub elapsed_secs: u64,
}

impl TimerState {
    pub fn started(card_id: CardId, started_timestamp: i64) -> TimerState {
        TimerState {
            card_id: Some(card_id),
            started_timestamp: Some(started_timestamp),
            ended_timestamp: None,
            elapsed_secs: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_timestamp.is_some() && self.ended_timestamp.is_none()
    }

    pub fn elapsed_at(&self, now: i64) -> u64 {
        match self.started_timestamp {
            Some(start) => {
                let until = self.ended_timestamp.unwrap_or(now);
                whole_seconds_between(start, until).max(0) as u64
            }
            None => 0,
        }
    }

    /// Applies a one-second tick. Ticks scheduled for another card are ignored.
    pub fn ticked(&self, card_id: &CardId, now: i64) -> Option<TimerState> {
        if !self.is_running() || self.card_id.as_ref() != Some(card_id) {
            return None;
        }
        let mut new_state = self.clone();
        new_state.elapsed_secs = self.elapsed_at(now);
        Some(new_state)
    }

    pub fn ended(&self, now: i64) -> TimerState {
        let mut new_state = self.clone();
        if new_state.started_timestamp.is_some() && new_state.ended_timestamp.is_none() {
            new_state.ended_timestamp = Some(now);
        }
        new_state.elapsed_secs = new_state.elapsed_at(now);
        new_state
    }

    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed_secs)
    }
}

/// `MM:SS`, or `HH:MM:SS` once an hour has passed.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
