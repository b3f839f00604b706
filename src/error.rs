use thiserror::Error;

#[derive(Debug, Error)]
pub enum BingoError {
    #[error("invalid coordinates: row={row}, col={col}")]
    InvalidCoordinates { row: usize, col: usize },

    #[error("no card is loaded")]
    NoCard,

    #[error("the free space cannot be toggled")]
    FreeCell,

    #[error("not enough events to build a card: {available} available, {required} required")]
    NotEnoughEvents { available: usize, required: usize },

    #[error("invalid event list: {0}")]
    InvalidEventList(String),

    #[error("duplicate event on card: {0}")]
    DuplicateEvent(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("invalid share code: {0}")]
    InvalidShareCode(String),

    #[error("storage failure: {0}")]
    Store(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl From<std::io::Error> for BingoError {
    fn from(error: std::io::Error) -> Self {
        BingoError::Store(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BingoError>;
