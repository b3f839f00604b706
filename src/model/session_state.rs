use serde::{Deserialize, Serialize};

/// Where a game session stands. `Blackout` is terminal until a new card is dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NoCard,
    Active,
    Won,
    Blackout,
}

impl SessionState {
    pub fn has_card(&self) -> bool {
        !matches!(self, SessionState::NoCard)
    }

    pub fn is_won(&self) -> bool {
        matches!(self, SessionState::Won | SessionState::Blackout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_won_and_card_predicates() {
        assert!(!SessionState::NoCard.has_card());
        assert!(!SessionState::NoCard.is_won());
        assert!(SessionState::Active.has_card());
        assert!(!SessionState::Active.is_won());
        assert!(SessionState::Won.is_won());
        assert!(SessionState::Blackout.is_won() && SessionState::Blackout.has_card());
    }
}
