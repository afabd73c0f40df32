//! Horizontal stacked bar chart of per-product sentiment counts.

use crate::error::{ReviewError, Result};
use crate::types::ProductSummary;
use crate::utils::truncate_label;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

pub(crate) const POSITIVE_COLOR: RGBColor = RGBColor(76, 175, 80);
pub(crate) const NEGATIVE_COLOR: RGBColor = RGBColor(229, 57, 53);

/// Longest product label drawn on the category axis.
const MAX_LABEL_CHARS: usize = 32;

/// Render Positive and Negative counts for `rows` (one bar per product, first
/// row on top) to a PNG at `path`.
pub fn render_sentiment_bar(
    rows: &[ProductSummary],
    title: &str,
    path: &Path,
    size: (u32, u32),
) -> Result<()> {
    draw_sentiment_bar(rows, title, path, size).map_err(|e| ReviewError::render(path, e))?;
    info!("Bar chart saved: {}", path.display());
    Ok(())
}

/// Category axis values for `n` bars.
///
/// Integer ranges are inclusive in plotters, so `0..n - 1` yields `n`
/// segments. A single-value range collapses, so one bar keeps a spare slot.
fn category_range(n: u32) -> std::ops::Range<u32> {
    0..n.saturating_sub(1).max(1)
}

fn draw_sentiment_bar(
    rows: &[ProductSummary],
    title: &str,
    path: &Path,
    size: (u32, u32),
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let n = rows.len() as u32;
    let longest = rows
        .iter()
        .map(|s| s.positive + s.negative)
        .max()
        .unwrap_or(0)
        .max(1) as u32;
    let x_max = longest + longest / 10 + 1;

    // Segment i holds row n - 1 - i so the busiest product sits on top
    let labels: Vec<String> = rows
        .iter()
        .map(|s| truncate_label(&s.product_name, MAX_LABEL_CHARS))
        .collect();
    let label_for = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(i) if *i < n => labels[(n - 1 - *i) as usize].clone(),
        _ => String::new(),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(240)
        .build_cartesian_2d(0u32..x_max, category_range(n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(rows.len().max(1))
        .y_label_formatter(&label_for)
        .x_desc("Counts")
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    let bar = |y: u32, from: usize, to: usize, color: RGBColor| {
        let mut rect = Rectangle::new(
            [
                (from as u32, SegmentValue::Exact(y)),
                (to as u32, SegmentValue::Exact(y + 1)),
            ],
            color.filled(),
        );
        rect.set_margin(4, 4, 0, 0);
        rect
    };

    chart
        .draw_series(
            rows.iter()
                .enumerate()
                .map(|(i, s)| bar(n - 1 - i as u32, 0, s.positive, POSITIVE_COLOR)),
        )?
        .label("Positive")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], POSITIVE_COLOR.filled()));

    chart
        .draw_series(rows.iter().enumerate().map(|(i, s)| {
            bar(
                n - 1 - i as u32,
                s.positive,
                s.positive + s.negative,
                NEGATIVE_COLOR,
            )
        }))?
        .label("Negative")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], NEGATIVE_COLOR.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
