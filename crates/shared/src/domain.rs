use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! index_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_newtype!(LaneIndex);

impl LaneIndex {
    /// Human facing lane number, as shown in headings and announcements.
    /// Saturates instead of wrapping for indices straight off the wire.
    pub fn number(self) -> usize {
        self.0.saturating_add(1)
    }

    /// Inverse of [`LaneIndex::number`]; `None` for lane number zero.
    pub fn from_number(number: usize) -> Option<Self> {
        number.checked_sub(1).map(Self)
    }
}

/// Authoritative state of one lane as reported by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneState {
    #[serde(default)]
    pub pilot_name: String,
    #[serde(default)]
    pub is_pitting: bool,
    #[serde(default)]
    pub countdown: u32,
}

impl LaneState {
    pub fn new(pilot_name: impl Into<String>, is_pitting: bool, countdown: u32) -> Self {
        Self {
            pilot_name: pilot_name.into(),
            is_pitting,
            countdown,
        }
    }

    pub fn is_counting_down(&self) -> bool {
        self.countdown > 0
    }
}

/// Full ordered lane list, one entry per lane in [`LaneIndex`] order.
pub type Snapshot = Vec<LaneState>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnounceEvent {
    pub lane: LaneIndex,
    #[serde(default)]
    pub pilot_name: String,
    #[serde(default)]
    pub is_pitting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitDirection {
    Entering,
    Leaving,
}

impl PitDirection {
    pub fn from_pitting(is_pitting: bool) -> Self {
        if is_pitting {
            Self::Entering
        } else {
            Self::Leaving
        }
    }
}
