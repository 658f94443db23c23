//! SVG charts drawn from the aggregates of an `EdaReport`.
//!
//! A chart that cannot be drawn is logged and skipped; the others are still
//! written.

use crate::error::ReporterError;
use analytics::{Distribution, EdaReport};
use configuration::ChartSettings;
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};

type DrawResult = Result<(), Box<dyn Error + Send + Sync>>;
type ChartFn = fn(&EdaReport, &Path, (u32, u32)) -> DrawResult;

/// Renders every chart into `settings.output_dir` and returns the files written.
///
/// Fails only when the output directory cannot be created.
pub fn render_charts(
    report: &EdaReport,
    settings: &ChartSettings,
) -> Result<Vec<PathBuf>, ReporterError> {
    std::fs::create_dir_all(&settings.output_dir).map_err(|source| ReporterError::ChartDir {
        path: settings.output_dir.clone(),
        source,
    })?;

    let charts: [(&str, ChartFn); 6] = [
        ("top_sharks", draw_top_sharks),
        ("deals_by_episode", draw_deals_by_episode),
        ("deal_equity_box", draw_deal_equity_box),
        ("amount_per_shark_box", draw_amount_per_shark_box),
        ("equity_trend", draw_equity_trend),
        ("episode_deal_closures", draw_episode_deal_closures),
    ];

    let size = (settings.width, settings.height);
    let mut written = Vec::new();
    for (name, draw) in charts {
        let path = settings.output_dir.join(format!("{name}.svg"));
        match draw(report, &path, size) {
            Ok(()) => {
                tracing::debug!(chart = name, path = %path.display(), "Chart written.");
                written.push(path);
            }
            Err(e) => {
                let err = ReporterError::Chart {
                    chart: name.to_string(),
                    message: e.to_string(),
                };
                tracing::warn!(error = %err, "Skipping chart.");
            }
        }
    }

    tracing::info!(
        charts = written.len(),
        dir = %settings.output_dir.display(),
        "Charts rendered."
    );
    Ok(written)
}

fn draw_top_sharks(report: &EdaReport, path: &Path, size: (u32, u32)) -> DrawResult {
    let bars: Vec<(String, usize)> = report
        .top_sharks
        .iter()
        .map(|s| (s.shark.clone(), s.deals))
        .collect();
    draw_bars(path, size, "Top Investing Sharks", "Shark", "Deals joined", &bars)
}

fn draw_deals_by_episode(report: &EdaReport, path: &Path, size: (u32, u32)) -> DrawResult {
    let bars: Vec<(String, usize)> = report
        .deals_by_episode
        .iter()
        .map(|e| (e.episode.to_string(), e.deals))
        .collect();
    draw_bars(path, size, "Deals per Episode", "Episode", "Deals", &bars)
}

fn draw_deal_equity_box(report: &EdaReport, path: &Path, size: (u32, u32)) -> DrawResult {
    draw_box(path, size, "Deal Equity Distribution", "Equity (%)", &report.deal_equity)
}

fn draw_amount_per_shark_box(report: &EdaReport, path: &Path, size: (u32, u32)) -> DrawResult {
    draw_box(
        path,
        size,
        "Amount Invested per Shark",
        "Amount",
        &report.amount_per_shark,
    )
}

fn draw_equity_trend(report: &EdaReport, path: &Path, size: (u32, u32)) -> DrawResult {
    let points: Vec<(String, f64)> = report
        .equity_trend
        .iter()
        .filter_map(|e| Some((e.episode.to_string(), e.average_equity?)))
        .collect();
    draw_line(path, size, "Average Deal Equity by Episode", "Equity (%)", &points)
}

fn draw_episode_deal_closures(report: &EdaReport, path: &Path, size: (u32, u32)) -> DrawResult {
    let points: Vec<(String, f64)> = report
        .deals_per_episode
        .iter()
        .map(|e| (e.episode.to_string(), e.deals as f64))
        .collect();
    draw_line(path, size, "Deals Closed per Episode", "Deals", &points)
}

/// One bar per labelled count, in the given order.
fn draw_bars(
    path: &Path,
    size: (u32, u32),
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[(String, usize)],
) -> DrawResult {
    if bars.is_empty() {
        return Err("nothing to plot".into());
    }
    let top = bars.iter().map(|(_, count)| *count).max().unwrap_or(0) as u32 + 1;

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0..bars.len() as u32).into_segmented(), 0u32..top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(bars.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(idx) => bars
                .get(*idx as usize)
                .map(|(label, _)| label.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.7).filled())
            .margin(10)
            .data(
                bars.iter()
                    .enumerate()
                    .map(|(idx, (_, count))| (idx as u32, *count as u32)),
            ),
    )?;

    root.present()?;
    Ok(())
}

/// A single box from min to max with the quartiles from `Distribution`.
fn draw_box(
    path: &Path,
    size: (u32, u32),
    caption: &str,
    y_desc: &str,
    dist: &Distribution,
) -> DrawResult {
    let (Some(min), Some(q1), Some(median), Some(q3), Some(max)) =
        (dist.min, dist.q1, dist.median, dist.q3, dist.max)
    else {
        return Err("no values to summarize".into());
    };
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(20)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..1f64, (min - pad)..(max + pad))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .y_desc(y_desc)
        .draw()?;

    let (left, right, center) = (0.35, 0.65, 0.5);
    chart.draw_series(std::iter::once(Rectangle::new(
        [(left, q1), (right, q3)],
        BLUE.mix(0.3).filled(),
    )))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(left, q1), (right, q3)],
        BLUE.stroke_width(2),
    )))?;
    chart.draw_series([
        PathElement::new(vec![(left, median), (right, median)], RED.stroke_width(2)),
        PathElement::new(vec![(center, q3), (center, max)], BLACK.stroke_width(1)),
        PathElement::new(vec![(center, q1), (center, min)], BLACK.stroke_width(1)),
        PathElement::new(vec![(0.42, max), (0.58, max)], BLACK.stroke_width(1)),
        PathElement::new(vec![(0.42, min), (0.58, min)], BLACK.stroke_width(1)),
    ])?;

    root.present()?;
    Ok(())
}

/// A line with point markers over labelled x positions.
fn draw_line(
    path: &Path,
    size: (u32, u32),
    caption: &str,
    y_desc: &str,
    points: &[(String, f64)],
) -> DrawResult {
    if points.is_empty() {
        return Err("nothing to plot".into());
    }
    let (low, high) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| {
            (lo.min(*y), hi.max(*y))
        });
    let pad = if high > low { (high - low) * 0.1 } else { 1.0 };
    let last = points.len() as i32 - 1;

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-1..last + 1, (low - pad).min(0.0)..(high + pad))?;

    chart
        .configure_mesh()
        .x_desc("Episode")
        .y_desc(y_desc)
        .x_labels(points.len().min(20))
        .x_label_formatter(&|idx| {
            usize::try_from(*idx)
                .ok()
                .and_then(|i| points.get(i))
                .map(|(label, _)| label.clone())
                .unwrap_or_default()
        })
        .draw()?;

    let coords: Vec<(i32, f64)> = points
        .iter()
        .enumerate()
        .map(|(idx, (_, y))| (idx as i32, *y))
        .collect();
    chart.draw_series(LineSeries::new(coords.clone(), &BLUE))?;
    chart.draw_series(coords.into_iter().map(|c| Circle::new(c, 3, BLUE.filled())))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{EpisodeDeals, EpisodeEquity, SharkDealCount, stats::describe};
    use core_types::EpisodeKey;

    fn settings(dir: &Path) -> ChartSettings {
        ChartSettings {
            output_dir: dir.to_path_buf(),
            ..ChartSettings::default()
        }
    }

    #[test]
    fn writes_one_svg_per_chart() {
        let dir = tempfile::tempdir().unwrap();
        let report = EdaReport {
            top_sharks: vec![SharkDealCount {
                shark: "aman".into(),
                deals: 3,
            }],
            deals_by_episode: vec![EpisodeDeals {
                episode: EpisodeKey::Number(1),
                deals: 3,
            }],
            deals_per_episode: vec![
                EpisodeDeals {
                    episode: EpisodeKey::Number(1),
                    deals: 3,
                },
                EpisodeDeals {
                    episode: EpisodeKey::Number(2),
                    deals: 0,
                },
            ],
            deal_equity: describe(&[2.0, 5.0, 10.0]),
            amount_per_shark: describe(&[100.0]),
            equity_trend: vec![EpisodeEquity {
                episode: EpisodeKey::Number(1),
                average_equity: Some(5.0),
            }],
            ..EdaReport::default()
        };

        let written = render_charts(&report, &settings(dir.path())).unwrap();

        assert_eq!(written.len(), 6);
        for path in written {
            let svg = std::fs::read_to_string(&path).unwrap();
            assert!(svg.contains("<svg"), "{} is not an SVG", path.display());
        }
    }

    #[test]
    fn empty_report_skips_charts_without_failing() {
        let dir = tempfile::tempdir().unwrap();
        let written = render_charts(&EdaReport::default(), &settings(dir.path())).unwrap();
        assert!(written.is_empty());
    }
}
