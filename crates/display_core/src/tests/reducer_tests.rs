use super::*;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct RecordingLane {
    renders: Arc<Mutex<Vec<LaneView>>>,
}

impl RecordingLane {
    fn last(&self) -> Option<LaneView> {
        self.renders.lock().expect("renders").last().cloned()
    }

    fn render_count(&self) -> usize {
        self.renders.lock().expect("renders").len()
    }
}

impl LaneRenderTarget for RecordingLane {
    fn render(&mut self, _lane: LaneIndex, view: &LaneView) {
        self.renders.lock().expect("renders").push(view.clone());
    }
}

fn reducer_with_lanes(count: usize) -> (LaneStateReducer, Vec<RecordingLane>) {
    let lanes: Vec<RecordingLane> = (0..count).map(|_| RecordingLane::default()).collect();
    let targets = lanes
        .iter()
        .cloned()
        .map(|lane| Box::new(lane) as Box<dyn LaneRenderTarget>)
        .collect();
    (LaneStateReducer::new(targets), lanes)
}

#[test]
fn countdown_takes_priority_over_pitting() {
    for is_pitting in [false, true] {
        let view = project(LaneIndex(0), &LaneState::new("Ada", is_pitting, 3));
        assert_eq!(view.control.label, "3");
        assert!(!view.control.enabled);
        assert!(!view.control.emphasised);
    }
}

#[test]
fn steady_state_labels_follow_pitting_flag() {
    let pitting = project(LaneIndex(1), &LaneState::new("", true, 0));
    assert_eq!(pitting.control.label, LEAVE_PIT_LABEL);
    assert!(pitting.control.enabled);
    assert!(pitting.control.emphasised);

    let racing = project(LaneIndex(1), &LaneState::new("", false, 0));
    assert_eq!(racing.control.label, PIT_LABEL);
    assert!(racing.control.enabled);
    assert!(!racing.control.emphasised);
}

#[test]
fn heading_includes_pilot_only_when_named() {
    assert_eq!(heading(LaneIndex(0), ""), "Lane 1");
    assert_eq!(heading(LaneIndex(2), "Ada"), "Lane 3: Ada");

    let view = project(LaneIndex(3), &LaneState::new("Grace", false, 0));
    assert_eq!(view.heading, "Lane 4: Grace");
    assert_eq!(view.name_field, "Grace");
}

#[test]
fn applying_same_snapshot_twice_renders_identically() {
    let (mut reducer, lanes) = reducer_with_lanes(2);
    let snapshot = vec![LaneState::new("Ada", true, 0), LaneState::new("", false, 2)];

    reducer.apply(&snapshot);
    let first: Vec<_> = lanes.iter().map(RecordingLane::last).collect();
    let report = reducer.apply(&snapshot);
    let second: Vec<_> = lanes.iter().map(RecordingLane::last).collect();

    assert_eq!(first, second);
    assert!(report.transitions.is_empty());
}

#[test]
fn short_snapshot_leaves_remaining_lanes_untouched() {
    let (mut reducer, lanes) = reducer_with_lanes(4);
    reducer.apply(&vec![LaneState::new("Ada", false, 0); 4]);

    let report = reducer.apply(&[LaneState::new("Grace", true, 0)]);

    assert_eq!(report.lanes_applied, 1);
    assert_eq!(lanes[0].last().expect("lane 1").heading, "Lane 1: Grace");
    for (i, lane) in lanes.iter().enumerate().skip(1) {
        assert_eq!(lane.render_count(), 1);
        assert_eq!(
            lane.last().expect("lane").heading,
            format!("Lane {}: Ada", i + 1)
        );
    }
}

#[test]
fn long_snapshot_ignores_extra_entries() {
    let (mut reducer, lanes) = reducer_with_lanes(2);
    let report = reducer.apply(&vec![LaneState::default(); 5]);

    assert_eq!(report.lanes_applied, 2);
    assert_eq!(report.lanes_ignored, 3);
    assert!(lanes.iter().all(|lane| lane.render_count() == 1));
}

#[test]
fn snapshot_overwrites_name_field() {
    let (mut reducer, lanes) = reducer_with_lanes(1);
    reducer.apply(&[LaneState::new("Ada", false, 0)]);
    reducer.apply(&[LaneState::new("", false, 0)]);

    let view = lanes[0].last().expect("lane");
    assert_eq!(view.name_field, "");
    assert_eq!(view.heading, "Lane 1");
}

#[test]
fn reports_pit_transitions_between_snapshots() {
    let (mut reducer, _lanes) = reducer_with_lanes(2);

    let first = reducer.apply(&[LaneState::new("Ada", false, 0), LaneState::new("", true, 0)]);
    assert!(first.transitions.is_empty());

    let second = reducer.apply(&[LaneState::new("Ada", true, 3), LaneState::new("", false, 3)]);
    assert_eq!(
        second.transitions,
        vec![
            LaneTransition {
                lane: LaneIndex(0),
                pilot_name: "Ada".to_string(),
                direction: PitDirection::Entering,
            },
            LaneTransition {
                lane: LaneIndex(1),
                pilot_name: String::new(),
                direction: PitDirection::Leaving,
            },
        ]
    );

    let countdown_tick = reducer.apply(&[LaneState::new("Ada", true, 2), LaneState::new("", false, 2)]);
    assert!(countdown_tick.transitions.is_empty());
}
