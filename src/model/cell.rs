use serde::{Deserialize, Serialize};

use super::event_catalog::FREE_SPACE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub event: String,
    pub is_free: bool,
    pub marked: bool,
}

impl Cell {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            is_free: false,
            marked: false,
        }
    }

    /// The center cell: always marked, never toggled.
    pub fn free() -> Self {
        Self {
            event: FREE_SPACE.to_string(),
            is_free: true,
            marked: true,
        }
    }

    pub(crate) fn toggled(&self) -> Self {
        Self {
            marked: !self.marked,
            ..self.clone()
        }
    }
}
