// Plot geometry shared by the renderer and pointer hit-testing
use crate::domain::price::PlotSeries;
use crate::domain::view::Size;
use std::ops::Range;

pub const MARGIN: u32 = 10;
/// Width reserved for the y-axis tick labels
pub const Y_AXIS_WIDTH: u32 = 50;
pub const X_LABEL_AREA: u32 = 40;
pub const MIN_WIDTH: u32 = 200;
pub const MIN_HEIGHT: u32 = 150;

const DAY_MS: f64 = 86_400_000.0;
const Y_PADDING: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotLayout {
    pub width: u32,
    pub height: u32,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    x_domain: (f64, f64),
    y_domain: (f64, f64),
}

impl PlotLayout {
    pub fn new(size: Size, series: &[&PlotSeries]) -> Self {
        let width = size.width.max(MIN_WIDTH);
        let height = size.height.max(MIN_HEIGHT);

        let points = || series.iter().flat_map(|s| s.iter());
        let x_domain = widen(bounds(points().map(|p| p.x)).unwrap_or((0.0, DAY_MS)), DAY_MS);
        let y_domain = match bounds(points().map(|p| p.y)) {
            Some((lo, hi)) => {
                let (lo, hi) = widen((lo, hi), 1.0);
                let pad = (hi - lo) * Y_PADDING;
                (lo - pad, hi + pad)
            }
            None => (-1.0, 1.0),
        };

        Self {
            width,
            height,
            left: (MARGIN + Y_AXIS_WIDTH) as f64,
            right: (width - MARGIN) as f64,
            top: MARGIN as f64,
            bottom: (height - MARGIN - X_LABEL_AREA) as f64,
            x_domain,
            y_domain,
        }
    }

    pub fn x_range(&self) -> Range<f64> {
        self.x_domain.0..self.x_domain.1
    }

    pub fn y_range(&self) -> Range<f64> {
        self.y_domain.0..self.y_domain.1
    }

    pub fn x_to_px(&self, x: f64) -> f64 {
        let (lo, hi) = self.x_domain;
        self.left + (x - lo) / (hi - lo) * (self.right - self.left)
    }

    /// Data x under a pixel column, clamped to the plot area
    pub fn px_to_x(&self, px: f64) -> f64 {
        let (lo, hi) = self.x_domain;
        let px = px.clamp(self.left, self.right);
        lo + (px - self.left) / (self.right - self.left) * (hi - lo)
    }

    /// Index of the point whose x is closest to the pointer column.
    /// Ties go to the earlier point.
    pub fn nearest_index(&self, series: &PlotSeries, px: f64) -> Option<usize> {
        let target = self.px_to_x(px);
        series
            .iter()
            .map(|p| (p.x - target).abs())
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn widen((lo, hi): (f64, f64), by: f64) -> (f64, f64) {
    if hi > lo { (lo, hi) } else { (lo - by, hi + by) }
}
