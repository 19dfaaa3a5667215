// Comparison series identity
use chrono::NaiveDate;
use serde::Serialize;

/// One of the two fixed years overlaid on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SeriesSlot {
    A,
    B,
}

impl SeriesSlot {
    pub const ALL: [SeriesSlot; 2] = [SeriesSlot::A, SeriesSlot::B];

    pub fn year(self) -> i32 {
        match self {
            SeriesSlot::A => 2017,
            SeriesSlot::B => 2021,
        }
    }

    /// Whole calendar year requested from the price history endpoint
    pub fn request_range(self) -> (NaiveDate, NaiveDate) {
        let year = self.year();
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
        let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
        (start, end)
    }

    /// Vertical offset of the tooltip box, in pixels from the top of the plot.
    /// Different per series so the two boxes stack instead of overlapping.
    pub fn tooltip_offset(self) -> u32 {
        match self {
            SeriesSlot::A => 400,
            SeriesSlot::B => 465,
        }
    }

    pub fn label(self) -> String {
        self.year().to_string()
    }
}
