//! PNG chart rendering
//!
//! Two chart shapes cover all four reports:
//!
//! - [`draw_histogram`]: vertical bars over a continuous x axis, optionally
//!   with a density line drawn on top (1200x800)
//! - [`draw_ranked_bars`]: horizontal bars, one per ranked item, first item at
//!   the top, coloured along a gradient (1400x1000)
//!
//! Rendering goes through the [`plotters`] bitmap backend. Text needs the
//! `ttf` feature and a system sans-serif font, which headless containers do
//! not always have; that is why the rendering tests are ignored by default.
//!
//! Charts with no data are still drawn, with empty axes.

pub mod palette;

pub use palette::Palette;

use crate::stats::Histogram;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),
}

type Result<T> = core::result::Result<T, PlotError>;

pub const HISTOGRAM_SIZE: (u32, u32) = (1200, 800);
pub const RANKED_SIZE: (u32, u32) = (1400, 1000);

/// Axis labels are cut to this many characters
pub const MAX_LABEL_CHARS: usize = 48;

const FONT: &str = "sans-serif";
const TITLE_FONT_SIZE: u32 = 36;
const AXIS_FONT_SIZE: u32 = 26;
const TICK_FONT_SIZE: u32 = 18;

pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
pub const PURPLE: RGBColor = RGBColor(128, 0, 128);

/// Bar fill opacity, low enough for an overlay line to show through
const BAR_ALPHA: f64 = 0.6;
/// Overlay lines are drawn at this fraction of the bar colour's brightness
const OVERLAY_SHADE: f64 = 0.6;
const MAX_COUNT_LABELS: usize = 11;

/// Title and axis descriptions for one chart
#[derive(Debug, Clone, Copy)]
pub struct ChartLabels<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
}

/// One bar of a ranked chart
#[derive(Debug, Clone, PartialEq)]
pub struct RankedBar {
    pub label: String,
    pub value: f64,
}

/// Shorten `text` to at most `max_chars` characters, marking the cut with "..."
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Upper bound for a value axis: a little headroom above the peak, and never
/// a zero-height range
fn axis_ceiling(peak: f64) -> f64 {
    if peak > 0.0 {
        peak * 1.05
    } else {
        1.0
    }
}

/// Number of y ticks for a count axis topping out at `y_hi`.
///
/// Never more ticks than whole numbers in range, so every tick is an integer.
fn count_axis_labels(y_hi: f64) -> usize {
    (y_hi.floor().max(1.0) as usize + 1).min(MAX_COUNT_LABELS)
}

fn bar_style(color: RGBColor) -> ShapeStyle {
    color.mix(BAR_ALPHA).filled()
}

fn overlay_style(color: RGBColor) -> ShapeStyle {
    let shade = |c: u8| (c as f64 * OVERLAY_SHADE).round() as u8;
    RGBColor(shade(color.0), shade(color.1), shade(color.2)).stroke_width(3)
}

/// Segment rows for `count` ranked bars, at least one. Integer ranges are
/// inclusive once segmented, so `0..n - 1` yields exactly `n` rows.
fn ranked_rows(count: usize) -> std::ops::Range<usize> {
    0..count.max(1) - 1
}

fn drawing_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Drawing(e.to_string())
}

/// Draw a count histogram with translucent black-edged bars and an optional
/// overlay line in a darker shade of the bar colour.
pub fn draw_histogram(
    output_path: &Path,
    histogram: &Histogram,
    overlay: &[(f64, f64)],
    color: RGBColor,
    labels: ChartLabels<'_>,
) -> Result<()> {
    let root = BitMapBackend::new(output_path, HISTOGRAM_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let (x_lo, x_hi) = histogram.range().unwrap_or((0.0, 1.0));
    let peak = overlay
        .iter()
        .map(|&(_, y)| y)
        .fold(histogram.max_count() as f64, f64::max);
    let y_hi = axis_ceiling(peak);

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, (FONT, TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_labels(count_axis_labels(y_hi))
        .x_desc(labels.x_desc)
        .y_desc(labels.y_desc)
        .axis_desc_style((FONT, AXIS_FONT_SIZE))
        .label_style((FONT, TICK_FONT_SIZE))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()
        .map_err(drawing_err)?;

    chart
        .draw_series(histogram.bins.iter().map(|bin| {
            Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], bar_style(color))
        }))
        .map_err(drawing_err)?;

    chart
        .draw_series(histogram.bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.start, 0.0), (bin.end, bin.count as f64)],
                BLACK.stroke_width(1),
            )
        }))
        .map_err(drawing_err)?;

    if !overlay.is_empty() {
        chart
            .draw_series(LineSeries::new(overlay.iter().copied(), overlay_style(color)))
            .map_err(drawing_err)?;
    }

    root.present().map_err(drawing_err)?;
    Ok(())
}

/// Draw horizontal bars, `bars[0]` at the top.
pub fn draw_ranked_bars(
    output_path: &Path,
    bars: &[RankedBar],
    palette: Palette,
    labels: ChartLabels<'_>,
) -> Result<()> {
    let root = BitMapBackend::new(output_path, RANKED_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let count = bars.len();
    let slots = count.max(1);
    let names: Vec<String> = bars
        .iter()
        .map(|b| truncate_label(&b.label, MAX_LABEL_CHARS))
        .collect();
    let widest = names.iter().map(|n| n.chars().count()).max().unwrap_or(0) as u32;
    let peak = bars.iter().map(|b| b.value).fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, (FONT, TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size((widest * 10 + 60).clamp(120, 560))
        .build_cartesian_2d(0f64..axis_ceiling(peak), ranked_rows(count).into_segmented())
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    // Row `slot` counted from the bottom holds rank `count - 1 - slot`
    let label_for = |slot: &SegmentValue<usize>| -> String {
        match slot {
            SegmentValue::CenterOf(s) | SegmentValue::Exact(s) if *s < count => {
                names[count - 1 - *s].clone()
            }
            _ => String::new(),
        }
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(slots)
        .x_desc(labels.x_desc)
        .y_desc(labels.y_desc)
        .axis_desc_style((FONT, AXIS_FONT_SIZE))
        .label_style((FONT, TICK_FONT_SIZE))
        .y_label_formatter(&label_for)
        .draw()
        .map_err(drawing_err)?;

    chart
        .draw_series(
            plotters::series::Histogram::horizontal(&chart)
                .margin(8)
                .style_func(move |slot, _| {
                    let rank = match slot {
                        SegmentValue::CenterOf(s) | SegmentValue::Exact(s) => {
                            count.saturating_sub(1 + *s)
                        }
                        SegmentValue::Last => 0,
                    };
                    palette.color(rank, count).filled()
                })
                .data(
                    bars.iter()
                        .enumerate()
                        .map(|(rank, bar)| (count - 1 - rank, bar.value)),
                ),
        )
        .map_err(drawing_err)?;

    root.present().map_err(drawing_err)?;
    Ok(())
}
