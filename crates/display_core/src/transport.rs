//! WebSocket connection to the lane controller.

use async_trait::async_trait;
use futures::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use tokio::{
    net::TcpStream,
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

use crate::{channel::ChannelAdapter, error::TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Inbound text frames, in arrival order. `None` once the channel is closed.
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Option<String>;
}

#[async_trait]
impl FrameSource for mpsc::UnboundedReceiver<String> {
    async fn next_frame(&mut self) -> Option<String> {
        self.recv().await
    }
}

/// Normalizes a controller address into a websocket url.
///
/// `http(s)://` becomes `ws(s)://`, and a bare host gets `ws://{host}/ws`,
/// the path the controller serves its socket on.
pub fn websocket_url(raw: &str) -> Result<Url, TransportError> {
    let raw = raw.trim();
    let candidate = if let Some(rest) = raw.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = raw.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if raw.contains("://") {
        raw.to_string()
    } else {
        format!("ws://{}/ws", raw.trim_end_matches('/'))
    };

    let url = Url::parse(&candidate).map_err(|err| TransportError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(TransportError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}

pub struct WebSocketFrames {
    url: String,
    reader: SplitStream<WsStream>,
}

#[async_trait]
impl FrameSource for WebSocketFrames {
    async fn next_frame(&mut self) -> Option<String> {
        loop {
            match self.reader.next().await {
                Some(Ok(Message::Text(text))) => return Some(text),
                Some(Ok(Message::Close(_))) | None => {
                    info!(url = %self.url, "disconnected from controller");
                    return None;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(url = %self.url, %err, "websocket receive failed");
                    return None;
                }
            }
        }
    }
}

/// One live controller connection: the command side, the frame side and the
/// task that drains queued commands onto the socket.
pub struct Connection {
    pub commands: ChannelAdapter,
    pub frames: WebSocketFrames,
    writer: WriterHandle,
}

impl Connection {
    pub async fn open(url: &Url) -> Result<Self, TransportError> {
        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|source| TransportError::Connect {
                url: url.to_string(),
                source,
            })?;
        info!(url = %url, "connected to controller");

        let (ws_writer, ws_reader) = ws_stream.split();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(write_commands(ws_writer, outbound_rx, shutdown_rx));

        Ok(Self {
            commands: ChannelAdapter::new(outbound_tx),
            frames: WebSocketFrames {
                url: url.to_string(),
                reader: ws_reader,
            },
            writer: WriterHandle {
                shutdown: shutdown_tx,
                task,
            },
        })
    }

    pub fn split(self) -> (ChannelAdapter, WebSocketFrames, WriterHandle) {
        (self.commands, self.frames, self.writer)
    }
}

/// Handle to the command writer task.
pub struct WriterHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl WriterHandle {
    /// Flushes commands already queued, sends a close frame and waits for the
    /// writer to finish. Clones of the [`ChannelAdapter`] may still be alive;
    /// anything they queue afterwards is dropped.
    pub async fn close(self) {
        let _ = self.shutdown.send(());
        if let Err(err) = self.task.await {
            warn!(%err, "command writer ended abnormally");
        }
    }
}

async fn write_commands(
    mut ws_writer: SplitSink<WsStream, Message>,
    mut outbound: mpsc::UnboundedReceiver<String>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut draining = false;
    loop {
        let text = tokio::select! {
            biased;
            text = outbound.recv() => match text {
                Some(text) => text,
                None => break,
            },
            _ = &mut shutdown, if !draining => {
                draining = true;
                outbound.close();
                debug!("writer shutting down; flushing queued commands");
                continue;
            }
        };
        if let Err(err) = ws_writer.send(Message::Text(text)).await {
            warn!(%err, "websocket send failed; stopping command writer");
            return;
        }
    }
    debug!("command queue closed; closing websocket writer");
    let _ = ws_writer.close().await;
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
