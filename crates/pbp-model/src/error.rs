use thiserror::Error;

#[derive(Debug, Error)]
pub enum PbpError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed clock value {value:?}: expected MM:SS")]
    MalformedDuration { value: String },
    #[error("event type {token:?} has no participant attribution rule")]
    UnmappedEventType { token: String },
    #[error("event index {event_idx} is not strictly increasing in game {game_id} period {period}")]
    EventOrderViolation {
        game_id: i64,
        period: i32,
        event_idx: i32,
    },
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

pub type Result<T> = std::result::Result<T, PbpError>;
