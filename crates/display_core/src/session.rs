use shared::{domain::PitDirection, protocol::ServerEvent};
use tracing::{debug, info, warn};

use crate::{
    announcer::AnnouncementEmitter,
    channel::ChannelAdapter,
    reducer::{ApplyReport, LaneStateReducer},
    transport::FrameSource,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Applied(ApplyReport),
    Announced,
    Dropped,
}

/// One display's view of the controller: the command channel, the lane
/// reducer and the announcement emitter. Frames are handled strictly in
/// arrival order by whoever drives [`DisplaySession::run`].
pub struct DisplaySession {
    channel: ChannelAdapter,
    reducer: LaneStateReducer,
    emitter: AnnouncementEmitter,
    announce_transitions: bool,
}

impl DisplaySession {
    pub fn new(
        channel: ChannelAdapter,
        reducer: LaneStateReducer,
        emitter: AnnouncementEmitter,
    ) -> Self {
        Self {
            channel,
            reducer,
            emitter,
            announce_transitions: false,
        }
    }

    /// Also announce pit transitions found by comparing snapshots, for
    /// controllers that never send `announce` frames.
    pub fn with_transition_announcements(mut self, enabled: bool) -> Self {
        self.announce_transitions = enabled;
        self
    }

    pub fn channel(&self) -> &ChannelAdapter {
        &self.channel
    }

    pub fn lane_count(&self) -> usize {
        self.reducer.lane_count()
    }

    pub fn handle_frame(&mut self, frame: &str) -> FrameOutcome {
        let event = match ServerEvent::parse(frame) {
            Ok(event) => event,
            Err(err) => {
                warn!(%err, frame_len = frame.len(), "dropping controller frame");
                return FrameOutcome::Dropped;
            }
        };
        debug!(kind = event.kind(), "controller frame");

        match event {
            ServerEvent::Update { data } => {
                let report = self.reducer.apply(&data);
                if self.announce_transitions {
                    for transition in &report.transitions {
                        self.emitter.announce(
                            transition.lane,
                            &transition.pilot_name,
                            transition.direction == PitDirection::Entering,
                        );
                    }
                }
                FrameOutcome::Applied(report)
            }
            ServerEvent::Announce(event) => {
                self.emitter.announce_event(&event);
                FrameOutcome::Announced
            }
        }
    }

    /// Handles frames until the source closes. Returns how many frames were seen.
    pub async fn run<S: FrameSource>(&mut self, frames: &mut S) -> usize {
        let mut handled = 0;
        while let Some(frame) = frames.next_frame().await {
            self.handle_frame(&frame);
            handled += 1;
        }
        info!(frames = handled, "controller channel closed; keeping last lane state");
        handled
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
