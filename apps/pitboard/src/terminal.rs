//! Line-per-lane rendering on stdout.

use display_core::{LaneRenderTarget, LaneView};
use shared::domain::LaneIndex;

pub fn format_lane(view: &LaneView) -> String {
    let mut line = format!("{}  [{}]", view.heading, view.control.label);
    if view.control.emphasised {
        line.push('*');
    }
    if !view.control.enabled {
        line.push_str(" (disabled)");
    }
    line.push_str("  name=");
    line.push_str(&view.name_field);
    line
}

/// Prints a lane only when its view changes, so repeated snapshots stay quiet.
#[derive(Default)]
pub struct TerminalLane {
    last: Option<LaneView>,
}

impl LaneRenderTarget for TerminalLane {
    fn render(&mut self, _lane: LaneIndex, view: &LaneView) {
        if self.last.as_ref() == Some(view) {
            return;
        }
        println!("{}", format_lane(view));
        self.last = Some(view.clone());
    }
}

pub fn lane_targets(lane_count: usize) -> Vec<Box<dyn LaneRenderTarget>> {
    (0..lane_count)
        .map(|_| Box::new(TerminalLane::default()) as Box<dyn LaneRenderTarget>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use display_core::reducer::project;
    use shared::domain::LaneState;

    #[test]
    fn formats_each_control_state() {
        assert_eq!(
            format_lane(&project(LaneIndex(1), &LaneState::new("Ada", true, 0))),
            "Lane 2: Ada  [Leave Pit]*  name=Ada"
        );
        assert_eq!(
            format_lane(&project(LaneIndex(0), &LaneState::new("", true, 3))),
            "Lane 1  [3] (disabled)  name="
        );
        assert_eq!(
            format_lane(&project(LaneIndex(3), &LaneState::default())),
            "Lane 4  [Pit]  name="
        );
    }

    #[test]
    fn remembers_last_rendered_view() {
        let mut lane = TerminalLane::default();
        let view = project(LaneIndex(0), &LaneState::new("Ada", false, 0));
        lane.render(LaneIndex(0), &view);
        assert_eq!(lane.last.as_ref(), Some(&view));
    }
}
