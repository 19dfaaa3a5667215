// Rendering port used by the view service
use crate::domain::series::SeriesSlot;
use crate::domain::view::ViewState;

/// One rendered image of the chart
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub revision: u64,
    pub svg: String,
}

pub trait FrameRenderer: Send + Sync {
    fn render(&self, state: &ViewState) -> anyhow::Result<Frame>;

    /// For a pointer at pixel `(x, y)`, the index of the point nearest on the
    /// x-axis in every series that has data
    fn nearest_points(&self, state: &ViewState, x: f64, y: f64) -> Vec<(SeriesSlot, usize)>;
}
