use std::{fmt, str::FromStr, sync::Arc};

use shared::domain::{AnnounceEvent, LaneIndex, PitDirection};
use tracing::{debug, warn};

use crate::speech::SpeechSink;

/// Which pit direction gets its own sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnouncePolicy {
    /// Every announcement uses the pit-entry sentence.
    EntryOnly,
    #[default]
    BothDirections,
}

impl FromStr for AnnouncePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "entry-only" | "entry_only" | "entry" => Ok(Self::EntryOnly),
            "both" | "both-directions" | "both_directions" => Ok(Self::BothDirections),
            other => Err(format!(
                "unknown announce policy {other:?}; expected \"entry-only\" or \"both\""
            )),
        }
    }
}

impl fmt::Display for AnnouncePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntryOnly => f.write_str("entry-only"),
            Self::BothDirections => f.write_str("both"),
        }
    }
}

impl AnnouncePolicy {
    pub fn direction(self, is_pitting: bool) -> PitDirection {
        match self {
            Self::EntryOnly => PitDirection::Entering,
            Self::BothDirections => PitDirection::from_pitting(is_pitting),
        }
    }
}

/// Sentence for one pit change, with runs of whitespace collapsed so an
/// unnamed lane reads "Lane 2 pilot is pitting".
pub fn announcement_text(lane: LaneIndex, pilot_name: &str, direction: PitDirection) -> String {
    let sentence = match direction {
        PitDirection::Entering => format!("Lane {} pilot {pilot_name} is pitting", lane.number()),
        PitDirection::Leaving => {
            format!("Lane {} pilot {pilot_name} is leaving the pits", lane.number())
        }
    };
    sentence.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct AnnouncementEmitter {
    policy: AnnouncePolicy,
    sink: Arc<dyn SpeechSink>,
}

impl AnnouncementEmitter {
    pub fn new(policy: AnnouncePolicy, sink: Arc<dyn SpeechSink>) -> Self {
        Self { policy, sink }
    }

    /// Speaks one sentence for the lane. Sink failures are logged, never returned.
    pub fn announce(&self, lane: LaneIndex, pilot_name: &str, is_pitting: bool) {
        let text = announcement_text(lane, pilot_name, self.policy.direction(is_pitting));
        debug!(lane = lane.0, is_pitting, text = %text, "announcing pit change");
        if let Err(err) = self.sink.speak(&text) {
            warn!(lane = lane.0, %err, "speech sink rejected announcement");
        }
    }

    pub fn announce_event(&self, event: &AnnounceEvent) {
        self.announce(event.lane, &event.pilot_name, event.is_pitting);
    }
}

#[cfg(test)]
#[path = "tests/announcer_tests.rs"]
mod tests;
