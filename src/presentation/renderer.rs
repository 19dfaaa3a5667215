// SVG chart rendering with plotters
use crate::application::frame_renderer::{Frame, FrameRenderer};
use crate::domain::crosshair::Tooltip;
use crate::domain::price::PlotPoint;
use crate::domain::series::SeriesSlot;
use crate::domain::view::ViewState;
use crate::presentation::layout::{PlotLayout, MARGIN, X_LABEL_AREA, Y_AXIS_WIDTH};
use chrono::DateTime;
use plotters::prelude::*;
use plotters::style::FontStyle;
use thiserror::Error;

const FONT: &str = "sans-serif";
const TOOLTIP_WIDTH: i32 = 230;
const TOOLTIP_LINE_HEIGHT: i32 = 18;
const TOOLTIP_PADDING: i32 = 8;
const TOOLTIP_GAP: i32 = 10;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("drawing failed: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn series_color(slot: SeriesSlot) -> RGBColor {
    match slot {
        SeriesSlot::A => RGBColor(18, 147, 154),
        SeriesSlot::B => RGBColor(121, 199, 227),
    }
}

/// Month and day of a normalized x, for the time axis
fn date_label(x: f64) -> String {
    DateTime::from_timestamp_millis(x as i64)
        .map(|d| d.format("%b %d").to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default)]
pub struct ChartRenderer;

impl ChartRenderer {
    pub fn new() -> Self {
        Self
    }

    fn layout(state: &ViewState) -> PlotLayout {
        PlotLayout::new(state.size, &[&state.series_a, &state.series_b])
    }

    pub fn draw(&self, state: &ViewState) -> Result<String, RenderError> {
        let layout = Self::layout(state);
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (layout.width, layout.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let mut chart = ChartBuilder::on(&root)
                .margin(MARGIN)
                .x_label_area_size(X_LABEL_AREA)
                .y_label_area_size(Y_AXIS_WIDTH)
                .build_cartesian_2d(layout.x_range(), layout.y_range())
                .map_err(draw_err)?;

            chart
                .configure_mesh()
                .x_desc("Date")
                .y_desc("Percentage")
                .x_label_formatter(&|x| date_label(*x))
                .y_label_formatter(&|y| format!("{:.0}%", y))
                // no axis lines; the x baseline is drawn below on its own
                .axis_style(&RGBAColor(0, 0, 0, 0.0))
                .draw()
                .map_err(draw_err)?;

            let (x_range, y_range) = (layout.x_range(), layout.y_range());
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x_range.start, y_range.start), (x_range.end, y_range.start)],
                    BLACK.stroke_width(1),
                )))
                .map_err(draw_err)?;

            for slot in SeriesSlot::ALL {
                let color = series_color(slot);
                chart
                    .draw_series(LineSeries::new(
                        state.series(slot).iter().map(|p| (p.x, p.y)),
                        color.stroke_width(2),
                    ))
                    .map_err(draw_err)?
                    .label(slot.label())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK.mix(0.3))
                .draw()
                .map_err(draw_err)?;

            for slot in SeriesSlot::ALL {
                let Some(crosshair) = state.crosshair(slot) else {
                    continue;
                };
                let (Some(point), Some(tooltip)) =
                    (crosshair.point(), Tooltip::for_crosshair(slot, crosshair))
                else {
                    continue;
                };
                let color = series_color(slot);

                chart
                    .draw_series(std::iter::once(PathElement::new(
                        vec![(point.x, y_range.start), (point.x, y_range.end)],
                        BLACK.mix(0.4).stroke_width(1),
                    )))
                    .map_err(draw_err)?;
                chart
                    .draw_series(std::iter::once(Circle::new(
                        (point.x, point.y),
                        4,
                        color.filled(),
                    )))
                    .map_err(draw_err)?;

                draw_tooltip(&root, &layout, slot, point, &tooltip)?;
            }

            if let Some(error) = &state.load_error {
                root.draw(&Text::new(
                    error.clone(),
                    (layout.left as i32 + TOOLTIP_GAP, MARGIN as i32),
                    (FONT, 14).into_font().color(&RED),
                ))
                .map_err(draw_err)?;
            }

            root.present().map_err(draw_err)?;
        }
        Ok(svg)
    }
}

/// Tooltip box beside the crosshair, at the series' fixed vertical offset.
/// Flips to the left of the marker when it would run off the right edge.
fn draw_tooltip<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    layout: &PlotLayout,
    slot: SeriesSlot,
    point: &PlotPoint,
    tooltip: &Tooltip,
) -> Result<(), RenderError> {
    let lines = tooltip.lines();
    let marker = layout.x_to_px(point.x) as i32;
    let height = TOOLTIP_PADDING * 2 + TOOLTIP_LINE_HEIGHT * lines.len() as i32;

    let left = if marker + TOOLTIP_GAP + TOOLTIP_WIDTH > layout.right as i32 {
        marker - TOOLTIP_GAP - TOOLTIP_WIDTH
    } else {
        marker + TOOLTIP_GAP
    };
    let top = layout.top as i32 + slot.tooltip_offset() as i32;

    root.draw(&Rectangle::new(
        [(left, top), (left + TOOLTIP_WIDTH, top + height)],
        RGBColor(58, 58, 72).mix(0.9).filled(),
    ))
    .map_err(draw_err)?;

    for (i, line) in lines.into_iter().enumerate() {
        let style = if i == 0 {
            (FONT, 14).into_font().style(FontStyle::Bold).color(&WHITE)
        } else {
            (FONT, 13).into_font().color(&WHITE)
        };
        root.draw(&Text::new(
            line,
            (
                left + TOOLTIP_PADDING,
                top + TOOLTIP_PADDING + TOOLTIP_LINE_HEIGHT * i as i32,
            ),
            style,
        ))
        .map_err(draw_err)?;
    }

    Ok(())
}

impl FrameRenderer for ChartRenderer {
    fn render(&self, state: &ViewState) -> anyhow::Result<Frame> {
        Ok(Frame {
            revision: state.revision,
            svg: self.draw(state)?,
        })
    }

    fn nearest_points(&self, state: &ViewState, x: f64, _y: f64) -> Vec<(SeriesSlot, usize)> {
        let layout = Self::layout(state);
        SeriesSlot::ALL
            .into_iter()
            .filter_map(|slot| {
                layout
                    .nearest_index(state.series(slot), x)
                    .map(|index| (slot, index))
            })
            .collect()
    }
}
