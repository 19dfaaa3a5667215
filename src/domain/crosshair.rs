// Crosshair selection and tooltip content
use super::price::{format_tooltip_date, PlotPoint};
use super::series::SeriesSlot;
use serde::Serialize;

/// The point a series' crosshair is pinned to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrosshairState {
    pub index: usize,
    pub data: Vec<PlotPoint>,
}

impl CrosshairState {
    pub fn new(index: usize, point: PlotPoint) -> Self {
        Self {
            index,
            data: vec![point],
        }
    }

    pub fn point(&self) -> Option<&PlotPoint> {
        self.data.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipRow {
    pub title: String,
    pub value: String,
}

impl TooltipRow {
    fn new(title: &str, value: String) -> Self {
        Self {
            title: title.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub header: TooltipRow,
    pub items: Vec<TooltipRow>,
}

impl Tooltip {
    pub fn for_crosshair(slot: SeriesSlot, crosshair: &CrosshairState) -> Option<Self> {
        let point = crosshair.point()?;

        Some(Self {
            header: TooltipRow::new("Date", format_tooltip_date(point.x, slot.year())),
            items: vec![
                TooltipRow::new("Percentage increase", format!("{}%", js_round(point.y))),
                TooltipRow::new("Price", format!("${}", js_round(point.price))),
            ],
        })
    }

    /// Rows in display order, header first
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(&self.header)
            .chain(self.items.iter())
            .map(|row| format!("{}: {}", row.title, row.value))
            .collect()
    }
}

/// Round half toward positive infinity, as browsers' `Math.round` does
pub fn js_round(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
