use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid server event: {0}")]
    InvalidEvent(#[from] serde_json::Error),
    #[error("unrecognized command: {0:?}")]
    UnknownCommand(String),
    #[error("command {command:?} is missing a lane index")]
    MissingLane { command: String },
    #[error("rename command {0:?} has no ':' separator")]
    MissingSeparator(String),
}
