//! Keyboard intents typed on stdin, one per line.

use std::{io::BufRead, thread};

use display_core::ChannelAdapter;
use shared::domain::LaneIndex;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub const USAGE: &str = "commands: pit <lane>, name <lane> [pilot], quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    TogglePit(LaneIndex),
    Rename(LaneIndex, String),
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntentError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("missing lane number")]
    MissingLane,
    #[error("lane must be a number from 1 to {lane_count}, got {value:?}")]
    BadLane { value: String, lane_count: usize },
}

/// Parses one input line. Lanes are typed 1-based, as printed on the board.
pub fn parse_intent(line: &str, lane_count: usize) -> Result<Option<Intent>, IntentError> {
    let (command, rest) = split_word(line.trim());
    match command.to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "quit" | "exit" => Ok(Some(Intent::Quit)),
        "pit" => {
            let (lane, _) = split_word(rest);
            Ok(Some(Intent::TogglePit(parse_lane(lane, lane_count)?)))
        }
        "name" | "rename" => {
            let (lane, pilot) = split_word(rest);
            let lane = parse_lane(lane, lane_count)?;
            Ok(Some(Intent::Rename(lane, pilot.trim().to_string())))
        }
        other => Err(IntentError::UnknownCommand(other.to_string())),
    }
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

fn parse_lane(value: &str, lane_count: usize) -> Result<LaneIndex, IntentError> {
    if value.is_empty() {
        return Err(IntentError::MissingLane);
    }
    value
        .parse::<usize>()
        .ok()
        .and_then(LaneIndex::from_number)
        .filter(|lane| lane.0 < lane_count)
        .ok_or_else(|| IntentError::BadLane {
            value: value.to_string(),
            lane_count,
        })
}

/// Reads stdin on its own thread so a pending read never holds up shutdown.
pub fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    warn!(%err, "failed to read input");
                    return;
                }
            }
        }
    });
    rx
}

/// Forwards intents until the input closes or `quit` is typed.
pub async fn read_intents(
    mut lines: mpsc::UnboundedReceiver<String>,
    commands: ChannelAdapter,
    lane_count: usize,
) {
    while let Some(line) = lines.recv().await {
        match parse_intent(&line, lane_count) {
            Ok(Some(Intent::TogglePit(lane))) => commands.request_pit_toggle(lane),
            Ok(Some(Intent::Rename(lane, pilot))) => commands.rename_lane(lane, &pilot),
            Ok(Some(Intent::Quit)) => break,
            Ok(None) => {}
            Err(err) => eprintln!("{err}; {USAGE}"),
        }
    }
    debug!("input closed");
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
