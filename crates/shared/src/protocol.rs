use serde::{Deserialize, Serialize};

use crate::{
    domain::{AnnounceEvent, LaneIndex, Snapshot},
    error::ProtocolError,
};

const START_PREFIX: &str = "start";
const RENAME_PREFIX: &str = "update";
const RENAME_SEPARATOR: char = ':';

/// Inbound frames pushed by the controller, discriminated on `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Update { data: Snapshot },
    Announce(AnnounceEvent),
}

impl ServerEvent {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Update { .. } => "update",
            Self::Announce(_) => "announce",
        }
    }
}

/// Outbound lane commands. The controller expects flat text, not JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    StartPit { lane: LaneIndex },
    Rename { lane: LaneIndex, pilot_name: String },
}

impl ClientCommand {
    pub fn encode(&self) -> String {
        match self {
            Self::StartPit { lane } => encode_start_pit(*lane),
            Self::Rename { lane, pilot_name } => encode_rename(*lane, pilot_name),
        }
    }

    /// Parses wire text back into a command.
    ///
    /// Pilot names are not escaped on the wire, so a rename is split on the
    /// first `:` after the lane digits and everything after it is the name.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        if let Some(rest) = text.strip_prefix(START_PREFIX) {
            let (lane, tail) = split_lane(text, rest)?;
            if !tail.is_empty() {
                return Err(ProtocolError::UnknownCommand(text.to_string()));
            }
            return Ok(Self::StartPit { lane });
        }

        if let Some(rest) = text.strip_prefix(RENAME_PREFIX) {
            let (lane, tail) = split_lane(text, rest)?;
            let Some(pilot_name) = tail.strip_prefix(RENAME_SEPARATOR) else {
                return Err(ProtocolError::MissingSeparator(text.to_string()));
            };
            return Ok(Self::Rename {
                lane,
                pilot_name: pilot_name.to_string(),
            });
        }

        Err(ProtocolError::UnknownCommand(text.to_string()))
    }

    pub fn lane(&self) -> LaneIndex {
        match self {
            Self::StartPit { lane } | Self::Rename { lane, .. } => *lane,
        }
    }
}

pub fn encode_start_pit(lane: LaneIndex) -> String {
    format!("{START_PREFIX}{}", lane.0)
}

pub fn encode_rename(lane: LaneIndex, pilot_name: &str) -> String {
    format!("{RENAME_PREFIX}{}{RENAME_SEPARATOR}{pilot_name}", lane.0)
}

fn split_lane<'a>(text: &str, rest: &'a str) -> Result<(LaneIndex, &'a str), ProtocolError> {
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let (number, tail) = rest.split_at(digits);
    let lane = number
        .parse::<usize>()
        .map_err(|_| ProtocolError::MissingLane {
            command: text.to_string(),
        })?;
    Ok((LaneIndex(lane), tail))
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
