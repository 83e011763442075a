use shared::{domain::LaneIndex, protocol::ClientCommand};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Outbound half of the controller channel.
///
/// Commands are encoded and queued for the writer task without waiting for
/// any acknowledgement; their effect shows up in a later snapshot. Cloning
/// shares the same connection.
#[derive(Debug, Clone)]
pub struct ChannelAdapter {
    outbound: mpsc::UnboundedSender<String>,
}

impl ChannelAdapter {
    pub fn new(outbound: mpsc::UnboundedSender<String>) -> Self {
        Self { outbound }
    }

    pub fn request_pit_toggle(&self, lane: LaneIndex) {
        self.send(ClientCommand::StartPit { lane });
    }

    pub fn rename_lane(&self, lane: LaneIndex, pilot_name: &str) {
        self.send(ClientCommand::Rename {
            lane,
            pilot_name: pilot_name.to_string(),
        });
    }

    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }

    fn send(&self, command: ClientCommand) {
        let lane = command.lane().0;
        let text = command.encode();
        match self.outbound.send(text) {
            Ok(()) => debug!(lane, "queued lane command"),
            Err(err) => warn!(lane, command = %err.0, "channel closed; dropping lane command"),
        }
    }
}
