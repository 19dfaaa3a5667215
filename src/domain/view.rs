// Chart view state and its transitions
use super::crosshair::CrosshairState;
use super::price::PlotSeries;
use super::series::SeriesSlot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Everything the chart is drawn from. Mutated only through the `on_*`
/// transitions, each of which reports whether a redraw is needed.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub series_a: PlotSeries,
    pub series_b: PlotSeries,
    pub crosshair_a: Option<CrosshairState>,
    pub crosshair_b: Option<CrosshairState>,
    pub size: Size,
    pub load_error: Option<String>,
    pub revision: u64,
}

impl ViewState {
    pub fn new(size: Size) -> Self {
        Self {
            series_a: Vec::new(),
            series_b: Vec::new(),
            crosshair_a: None,
            crosshair_b: None,
            size,
            load_error: None,
            revision: 0,
        }
    }

    pub fn series(&self, slot: SeriesSlot) -> &PlotSeries {
        match slot {
            SeriesSlot::A => &self.series_a,
            SeriesSlot::B => &self.series_b,
        }
    }

    pub fn crosshair(&self, slot: SeriesSlot) -> Option<&CrosshairState> {
        match slot {
            SeriesSlot::A => self.crosshair_a.as_ref(),
            SeriesSlot::B => self.crosshair_b.as_ref(),
        }
    }

    fn crosshair_mut(&mut self, slot: SeriesSlot) -> &mut Option<CrosshairState> {
        match slot {
            SeriesSlot::A => &mut self.crosshair_a,
            SeriesSlot::B => &mut self.crosshair_b,
        }
    }

    pub fn on_data_loaded(&mut self, slot: SeriesSlot, series: PlotSeries) -> bool {
        // an index into the previous data would point at the wrong point
        *self.crosshair_mut(slot) = None;
        match slot {
            SeriesSlot::A => self.series_a = series,
            SeriesSlot::B => self.series_b = series,
        }
        self.bump()
    }

    /// Pin `slot`'s crosshair to the point at `index`.
    ///
    /// Series B never shows a tooltip for its last point: landing there clears
    /// its crosshair instead. Series A has no such rule.
    pub fn on_pointer_near(&mut self, slot: SeriesSlot, index: usize) -> bool {
        let series = self.series(slot);
        let Some(point) = series.get(index).copied() else {
            return false;
        };

        let next = if slot == SeriesSlot::B && index == series.len() - 1 {
            None
        } else {
            Some(CrosshairState::new(index, point))
        };

        self.set_crosshair(slot, next)
    }

    pub fn on_pointer_leave(&mut self) -> bool {
        let a = self.set_crosshair(SeriesSlot::A, None);
        let b = self.set_crosshair(SeriesSlot::B, None);
        a || b
    }

    pub fn on_resize(&mut self, size: Size) -> bool {
        if self.size == size {
            return false;
        }
        self.size = size;
        self.bump()
    }

    pub fn on_load_failed(&mut self, slot: SeriesSlot, message: String) -> bool {
        // single line: the caption is drawn as one SVG text run
        let message = message.split_whitespace().collect::<Vec<_>>().join(" ");
        self.load_error = Some(format!("{} prices unavailable: {}", slot.label(), message));
        self.bump()
    }

    fn set_crosshair(&mut self, slot: SeriesSlot, next: Option<CrosshairState>) -> bool {
        let current = self.crosshair_mut(slot);
        if *current == next {
            return false;
        }
        *current = next;
        self.bump()
    }

    fn bump(&mut self) -> bool {
        self.revision += 1;
        true
    }
}

/// JSON view of the state for clients and diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub revision: u64,
    pub size: Size,
    pub series_a_len: usize,
    pub series_b_len: usize,
    pub crosshair_a: Option<CrosshairState>,
    pub crosshair_b: Option<CrosshairState>,
    pub load_error: Option<String>,
}

impl From<&ViewState> for ViewSnapshot {
    fn from(state: &ViewState) -> Self {
        Self {
            revision: state.revision,
            size: state.size,
            series_a_len: state.series_a.len(),
            series_b_len: state.series_b.len(),
            crosshair_a: state.crosshair_a.clone(),
            crosshair_b: state.crosshair_b.clone(),
            load_error: state.load_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PlotPoint;

    fn series(len: usize) -> PlotSeries {
        (0..len)
            .map(|i| PlotPoint {
                x: i as f64 * 86_400_000.0,
                y: i as f64,
                price: 1000.0 + i as f64,
            })
            .collect()
    }

    fn loaded_state() -> ViewState {
        let mut state = ViewState::new(Size::new(800, 600));
        state.on_data_loaded(SeriesSlot::A, series(5));
        state.on_data_loaded(SeriesSlot::B, series(4));
        state
    }

    #[test]
    fn test_pointer_near_sets_crosshair_a() {
        let mut state = loaded_state();
        assert!(state.on_pointer_near(SeriesSlot::A, 2));

        let crosshair = state.crosshair_a.clone().unwrap();
        assert_eq!(crosshair.index, 2);
        assert_eq!(crosshair.data, vec![state.series_a[2]]);
    }

    #[test]
    fn test_pointer_near_last_of_a_is_shown() {
        let mut state = loaded_state();
        state.on_pointer_near(SeriesSlot::A, 4);
        assert_eq!(state.crosshair_a.as_ref().map(|c| c.index), Some(4));
    }

    #[test]
    fn test_pointer_near_last_of_b_clears() {
        let mut state = loaded_state();
        state.on_pointer_near(SeriesSlot::B, 1);
        assert!(state.crosshair_b.is_some());

        assert!(state.on_pointer_near(SeriesSlot::B, 3));
        assert!(state.crosshair_b.is_none());

        // already clear, still clear
        assert!(!state.on_pointer_near(SeriesSlot::B, 3));
        assert!(state.crosshair_b.is_none());
    }

    #[test]
    fn test_pointer_near_out_of_range_ignored() {
        let mut state = loaded_state();
        let revision = state.revision;
        assert!(!state.on_pointer_near(SeriesSlot::A, 99));
        assert!(state.crosshair_a.is_none());
        assert_eq!(state.revision, revision);
    }

    #[test]
    fn test_pointer_leave_clears_both() {
        let mut state = loaded_state();
        state.on_pointer_near(SeriesSlot::A, 1);
        assert!(state.on_pointer_leave());
        assert!(state.crosshair_a.is_none());
        assert!(state.crosshair_b.is_none());

        assert!(!state.on_pointer_leave());
    }

    #[test]
    fn test_data_loaded_clears_stale_crosshair() {
        let mut state = loaded_state();
        state.on_pointer_near(SeriesSlot::A, 3);
        state.on_data_loaded(SeriesSlot::A, series(2));
        assert!(state.crosshair_a.is_none());
        assert_eq!(state.series_a.len(), 2);
    }

    #[test]
    fn test_resize_only_bumps_on_change() {
        let mut state = ViewState::new(Size::new(800, 600));
        assert!(!state.on_resize(Size::new(800, 600)));
        assert!(state.on_resize(Size::new(1024, 600)));
        assert_eq!(state.revision, 1);
    }

    #[test]
    fn test_load_failed_message_is_single_line() {
        let mut state = ViewState::new(Size::new(800, 600));
        state.on_load_failed(
            SeriesSlot::A,
            "status 502 Bad Gateway: <html>\r\n<head>\r\n</head>".to_string(),
        );

        let error = state.load_error.unwrap();
        assert!(!error.contains('\r') && !error.contains('\n'));
        assert_eq!(error, "2017 prices unavailable: status 502 Bad Gateway: <html> <head> </head>");
    }

    #[test]
    fn test_snapshot() {
        let mut state = loaded_state();
        state.on_load_failed(SeriesSlot::B, "timeout".to_string());
        let snapshot = ViewSnapshot::from(&state);

        assert_eq!(snapshot.series_a_len, 5);
        assert_eq!(snapshot.series_b_len, 4);
        assert_eq!(snapshot.load_error.as_deref(), Some("2021 prices unavailable: timeout"));
    }
}
