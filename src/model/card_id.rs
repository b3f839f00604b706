use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const RANDOM_SUFFIX_LEN: usize = 9;

/// Opaque token telling two card instances apart without comparing grids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Time-based with a random suffix; unique in practice within one session.
    pub fn generate(now_millis: i64) -> Self {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(RANDOM_SUFFIX_LEN)
            .collect();
        CardId(format!("card_{}_{}", now_millis, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        CardId(value)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_differ_at_same_instant() {
        let a = CardId::generate(1_700_000_000_000);
        let b = CardId::generate(1_700_000_000_000);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("card_1700000000000_"));
        assert_eq!(a.as_str().len(), "card_1700000000000_".len() + RANDOM_SUFFIX_LEN);
    }
}
