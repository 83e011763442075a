//! Display side of the pit lane board: applies controller snapshots to lane
//! displays, speaks pit announcements and sends lane commands back.

pub mod announcer;
pub mod channel;
pub mod error;
pub mod reducer;
pub mod session;
pub mod speech;
pub mod transport;

pub use announcer::{AnnouncePolicy, AnnouncementEmitter};
pub use channel::ChannelAdapter;
pub use error::{SpeechError, TransportError};
pub use reducer::{LaneRenderTarget, LaneStateReducer, LaneView, PitControl};
pub use session::{DisplaySession, FrameOutcome};
pub use speech::{CommandSpeechSink, LogSpeechSink, SpeechSink, UnsupportedSpeechSink};
pub use transport::{websocket_url, Connection, FrameSource, WebSocketFrames, WriterHandle};
