//! Projection of controller snapshots onto the fixed set of lane displays.

use shared::domain::{LaneIndex, LaneState, PitDirection};
use tracing::debug;

pub const PIT_LABEL: &str = "Pit";
pub const LEAVE_PIT_LABEL: &str = "Leave Pit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitControl {
    pub label: String,
    pub enabled: bool,
    /// Set while the lane sits in the pit so the "Leave Pit" control stands out.
    pub emphasised: bool,
}

/// Everything a lane display shows, derived from one [`LaneState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneView {
    pub heading: String,
    pub control: PitControl,
    pub name_field: String,
}

pub trait LaneRenderTarget: Send {
    fn render(&mut self, lane: LaneIndex, view: &LaneView);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneTransition {
    pub lane: LaneIndex,
    pub pilot_name: String,
    pub direction: PitDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub lanes_applied: usize,
    pub lanes_ignored: usize,
    pub transitions: Vec<LaneTransition>,
}

pub fn project(lane: LaneIndex, state: &LaneState) -> LaneView {
    let control = if state.is_counting_down() {
        PitControl {
            label: state.countdown.to_string(),
            enabled: false,
            emphasised: false,
        }
    } else if state.is_pitting {
        PitControl {
            label: LEAVE_PIT_LABEL.to_string(),
            enabled: true,
            emphasised: true,
        }
    } else {
        PitControl {
            label: PIT_LABEL.to_string(),
            enabled: true,
            emphasised: false,
        }
    };

    LaneView {
        heading: heading(lane, &state.pilot_name),
        control,
        name_field: state.pilot_name.clone(),
    }
}

pub fn heading(lane: LaneIndex, pilot_name: &str) -> String {
    if pilot_name.is_empty() {
        format!("Lane {}", lane.number())
    } else {
        format!("Lane {}: {pilot_name}", lane.number())
    }
}

/// Applies full snapshots to a render target per lane.
///
/// The lane set is fixed at construction. Snapshot entries past the last
/// target are ignored and targets past the end of a short snapshot keep
/// whatever they rendered last.
pub struct LaneStateReducer {
    targets: Vec<Box<dyn LaneRenderTarget>>,
    last_pitting: Vec<Option<bool>>,
}

impl LaneStateReducer {
    pub fn new(targets: Vec<Box<dyn LaneRenderTarget>>) -> Self {
        let last_pitting = vec![None; targets.len()];
        Self {
            targets,
            last_pitting,
        }
    }

    pub fn lane_count(&self) -> usize {
        self.targets.len()
    }

    pub fn apply(&mut self, snapshot: &[LaneState]) -> ApplyReport {
        let mut report = ApplyReport {
            lanes_ignored: snapshot.len().saturating_sub(self.targets.len()),
            ..ApplyReport::default()
        };

        for (i, ((target, last), state)) in self
            .targets
            .iter_mut()
            .zip(self.last_pitting.iter_mut())
            .zip(snapshot)
            .enumerate()
        {
            let lane = LaneIndex(i);
            target.render(lane, &project(lane, state));

            if let Some(previous) = last.replace(state.is_pitting) {
                if previous != state.is_pitting {
                    report.transitions.push(LaneTransition {
                        lane,
                        pilot_name: state.pilot_name.clone(),
                        direction: PitDirection::from_pitting(state.is_pitting),
                    });
                }
            }
            report.lanes_applied += 1;
        }

        debug!(
            lanes_applied = report.lanes_applied,
            lanes_ignored = report.lanes_ignored,
            transitions = report.transitions.len(),
            "snapshot applied"
        );
        report
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
