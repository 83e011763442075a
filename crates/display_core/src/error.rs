use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech output is not supported on this display")]
    Unsupported,
    #[error("failed to start speech program {program:?}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid controller url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to connect websocket {url}: {source}")]
    Connect {
        url: String,
        source: tokio_tungstenite::tungstenite::Error,
    },
}
