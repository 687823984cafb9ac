//! Bar chart of win share per attribute value with the fitted line (using Plotters)

use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

use super::correlation::CorrelationReport;
use crate::config::ChartConfig;
use crate::error::AnalysisError;

/// File name of the chart for a report, e.g. `Age_wins.png`
pub fn chart_file_name(report: &CorrelationReport) -> String {
    format!("{}_wins.png", report.column.name())
}

/// Render the report to a PNG in the configured output directory
pub fn render_wins_chart(
    report: &CorrelationReport,
    config: &ChartConfig,
) -> Result<PathBuf, AnalysisError> {
    std::fs::create_dir_all(&config.output_dir)?;
    let out_path = config.output_dir.join(chart_file_name(report));

    draw(report, &out_path, (config.width, config.height))
        .map_err(|e| AnalysisError::Chart(e.to_string()))?;

    info!("Wrote chart to {:?}", out_path);
    Ok(out_path)
}

fn draw(
    report: &CorrelationReport,
    out_path: &Path,
    size: (u32, u32),
) -> Result<(), Box<dyn std::error::Error>> {
    let column = report.column.name();
    let xs: Vec<f64> = report.buckets.iter().map(|b| b.value).collect();
    let x_min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Bars take 80% of the smallest gap between neighbouring values
    let min_gap = xs
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(f64::INFINITY, f64::min);
    let bar_width = if min_gap.is_finite() { min_gap * 0.8 } else { 0.8 };

    let fitted: Vec<(f64, f64)> = xs.iter().map(|&x| (x, report.fit.predict(x))).collect();
    let y_max = report
        .buckets
        .iter()
        .map(|b| b.weighted_average)
        .chain(fitted.iter().map(|&(_, y)| y))
        .fold(0.0, f64::max);
    let y_min = fitted.iter().map(|&(_, y)| y).fold(0.0, f64::min);

    let root = BitMapBackend::new(out_path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Relationship Between {column} and Wins"), ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (x_min - bar_width)..(x_max + bar_width),
            y_min..(y_max * 1.1).max(0.01),
        )?;
    chart
        .configure_mesh()
        .x_desc(column)
        .y_desc("Weighted Average of Wins")
        .draw()?;

    chart.draw_series(report.buckets.iter().map(|b| {
        Rectangle::new(
            [
                (b.value - bar_width / 2.0, 0.0),
                (b.value + bar_width / 2.0, b.weighted_average),
            ],
            BLUE.mix(0.7).filled(),
        )
    }))?;

    chart
        .draw_series(LineSeries::new(fitted, &RED))?
        .label("Regression Line")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    chart.configure_series_labels().border_style(&BLACK).draw()?;

    root.present()?;
    Ok(())
}
