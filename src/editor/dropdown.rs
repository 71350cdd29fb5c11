use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownSide {
    Below,
    Above,
}

/// Where the suggestion dropdown goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropdownPlacement {
    pub area: Rect,
    pub side: DropdownSide,
}

/// Place the dropdown against the editor.
///
/// Below if it fits there, otherwise above if it fits there, otherwise on
/// the roomier side (below on a tie), clamped to that side's space. The
/// dropdown starts at the editor's left edge and takes its width.
/// `measured` is the last rendered height; `estimate` stands in before the
/// first render.
pub fn place_dropdown(
    editor: Rect,
    viewport: Rect,
    measured: Option<u16>,
    estimate: u16,
) -> DropdownPlacement {
    let height = measured.unwrap_or(estimate);
    let space_below = viewport.bottom().saturating_sub(editor.bottom());
    let space_above = editor.y.saturating_sub(viewport.y);

    let side = if space_below >= height {
        DropdownSide::Below
    } else if space_above >= height {
        DropdownSide::Above
    } else if space_below >= space_above {
        DropdownSide::Below
    } else {
        DropdownSide::Above
    };

    let area = match side {
        DropdownSide::Below => {
            Rect::new(editor.x, editor.bottom(), editor.width, height.min(space_below))
        }
        DropdownSide::Above => {
            let h = height.min(space_above);
            Rect::new(editor.x, editor.y - h, editor.width, h)
        }
    };
    DropdownPlacement { area, side }
}

/// Owns the dropdown's viewport subscription and placement.
///
/// Viewport events (scroll, resize) are only listened to while the dropdown
/// is open. Each event schedules at most one pending frame; the frame
/// re-measures and re-places. Closing drops the subscription and all
/// position state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownTracker {
    subscribed: bool,
    frame_pending: bool,
    measured_height: Option<u16>,
    placement: Option<DropdownPlacement>,
}

impl DropdownTracker {
    pub fn open(&mut self) {
        if !self.subscribed {
            self.subscribed = true;
            tracing::debug!("dropdown opened, listening for viewport changes");
        }
        self.request_frame();
    }

    pub fn close(&mut self) {
        if self.subscribed {
            tracing::debug!("dropdown closed, viewport listener removed");
        }
        *self = DropdownTracker::default();
    }

    pub fn is_open(&self) -> bool {
        self.subscribed
    }

    /// A scroll or resize happened. Returns true if a frame was scheduled.
    pub fn viewport_changed(&mut self) -> bool {
        self.subscribed && self.request_frame()
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    fn request_frame(&mut self) -> bool {
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    /// Run the pending frame, if any, and return the current placement.
    pub fn run_frame(&mut self, editor: Rect, viewport: Rect, estimate: u16) -> Option<DropdownPlacement> {
        if self.subscribed && self.frame_pending {
            self.frame_pending = false;
            let placement = place_dropdown(editor, viewport, self.measured_height, estimate);
            tracing::trace!(?placement, "dropdown placed");
            self.placement = Some(placement);
        }
        self.placement
    }

    /// Record the rendered height. A change schedules a re-placement.
    pub fn record_height(&mut self, height: u16) {
        if self.subscribed && self.measured_height != Some(height) {
            self.measured_height = Some(height);
            self.request_frame();
        }
    }

    pub fn measured_height(&self) -> Option<u16> {
        self.measured_height
    }

    pub fn placement(&self) -> Option<DropdownPlacement> {
        self.placement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };

    #[test]
    fn test_places_below_when_room() {
        let editor = Rect::new(2, 3, 40, 3);
        let p = place_dropdown(editor, VIEWPORT, Some(8), 10);
        assert_eq!(p.side, DropdownSide::Below);
        assert_eq!(p.area, Rect::new(2, 6, 40, 8));
    }

    #[test]
    fn test_flips_above_when_no_room_below() {
        let editor = Rect::new(0, 18, 80, 3);
        let p = place_dropdown(editor, VIEWPORT, Some(8), 10);
        assert_eq!(p.side, DropdownSide::Above);
        assert_eq!(p.area, Rect::new(0, 10, 80, 8));
    }

    #[test]
    fn test_neither_fits_picks_roomier_side() {
        let editor = Rect::new(0, 8, 80, 6);
        // 8 rows above, 10 below, needs 12
        let p = place_dropdown(editor, VIEWPORT, Some(12), 10);
        assert_eq!(p.side, DropdownSide::Below);
        assert_eq!(p.area.height, 10);

        let editor = Rect::new(0, 12, 80, 6);
        // 12 rows above, 6 below
        let p = place_dropdown(editor, VIEWPORT, Some(14), 10);
        assert_eq!(p.side, DropdownSide::Above);
        assert_eq!(p.area, Rect::new(0, 0, 80, 12));
    }

    #[test]
    fn test_estimate_before_measurement() {
        let editor = Rect::new(0, 12, 80, 3);
        // 9 rows below: the estimate (10) does not fit, 12 rows above do
        let p = place_dropdown(editor, VIEWPORT, None, 10);
        assert_eq!(p.side, DropdownSide::Above);
    }

    #[test]
    fn test_tracker_single_pending_frame() {
        let mut t = DropdownTracker::default();
        assert!(!t.viewport_changed());
        t.open();
        assert!(t.frame_pending());
        assert!(!t.viewport_changed());
        let editor = Rect::new(0, 0, 80, 3);
        assert!(t.run_frame(editor, VIEWPORT, 10).is_some());
        assert!(!t.frame_pending());
        assert!(t.viewport_changed());
        assert!(!t.viewport_changed());
    }

    #[test]
    fn test_tracker_remeasures_on_height_change() {
        let mut t = DropdownTracker::default();
        t.open();
        let editor = Rect::new(0, 0, 80, 3);
        t.run_frame(editor, VIEWPORT, 10);
        t.record_height(5);
        assert!(t.frame_pending());
        let p = t.run_frame(editor, VIEWPORT, 10).unwrap();
        assert_eq!(p.area.height, 5);
        t.record_height(5);
        assert!(!t.frame_pending());
    }

    #[test]
    fn test_close_clears_everything() {
        let mut t = DropdownTracker::default();
        t.open();
        t.record_height(4);
        t.run_frame(Rect::new(0, 0, 10, 1), VIEWPORT, 10);
        t.close();
        assert_eq!(t, DropdownTracker::default());
        assert_eq!(t.run_frame(Rect::new(0, 0, 10, 1), VIEWPORT, 10), None);
    }
}
