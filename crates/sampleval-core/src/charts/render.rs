//! SVG rendering of [`ChartSpec`]s with plotters.
//!
//! Log axes are drawn in log10 space and labelled with the untransformed
//! value. Facet panels are laid out side by side and share both axes.

use super::{ChartKind, ChartSpec, Panel, XValue};
use crate::errors::{PipelineError, Result};
use crate::labels::format_number;
use plotters::coord::types::RangedCoordf32;
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::ops::Range;
use std::path::Path;

const JITTER_SEED: u64 = 0x5eed;
const FONT: &str = "sans-serif";
const POINT_RADIUS: u32 = 3;

type DrawResult<T> = std::result::Result<T, Box<dyn Error>>;

/// Writes `spec` as an SVG file of `size` pixels.
pub fn render_svg(spec: &ChartSpec, path: &Path, size: (u32, u32)) -> Result<()> {
    draw(spec, path, size).map_err(|e| PipelineError::Render {
        chart: spec.name.to_string(),
        message: e.to_string(),
    })?;
    tracing::debug!(
        event = "chart_rendered",
        chart = spec.name,
        path = %path.display(),
        points = spec.point_count(),
    );
    Ok(())
}

/// Series of one panel in drawing coordinates.
struct PlacedSeries {
    color_index: usize,
    label: String,
    points: Vec<(f32, f32)>,
}

fn draw(spec: &ChartSpec, path: &Path, size: (u32, u32)) -> DrawResult<()> {
    let placed: Vec<(Option<String>, Vec<PlacedSeries>)> = if spec.panels.is_empty() {
        vec![(Some("no data".to_string()), Vec::new())]
    } else {
        spec.panels.iter().map(|p| place_panel(spec, p)).collect()
    };

    let all_points = || placed.iter().flat_map(|(_, s)| s).flat_map(|s| &s.points);
    let x_range = if spec.categories.is_empty() {
        padded_range(all_points().map(|p| p.0))
    } else {
        -0.5..(spec.categories.len() as f32 - 0.5)
    };
    let y_range = padded_range(all_points().map(|p| p.1));

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = if spec.legend_title.is_empty() {
        root
    } else {
        root.titled(&spec.legend_title, (FONT, 16))?
    };

    let areas = root.split_evenly((1, placed.len()));
    let last = placed.len() - 1;
    let mut rng = StdRng::seed_from_u64(JITTER_SEED);

    let x_fmt = |v: &f32| -> String {
        if !spec.categories.is_empty() {
            category_tick(&spec.categories, *v)
        } else {
            value_tick(*v, spec.log_x)
        }
    };
    let y_fmt = |v: &f32| value_tick(*v, spec.log_y);

    for (i, ((title, series), area)) in placed.iter().zip(areas.iter()).enumerate() {
        let mut builder = ChartBuilder::on(area);
        builder
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(if i == 0 { 70 } else { 40 });
        if let Some(title) = title {
            builder.caption(title, (FONT, 16));
        }
        let mut chart = builder.build_cartesian_2d(x_range.clone(), y_range.clone())?;

        let mut mesh = chart.configure_mesh();
        mesh.x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .x_desc(spec.x_label.as_str());
        if spec.categories.is_empty() {
            mesh.x_labels(6);
        } else {
            mesh.x_labels(spec.categories.len() + 1).disable_x_mesh();
        }
        if i == 0 {
            mesh.y_desc(spec.y_label.as_str());
        }
        mesh.draw()?;

        match spec.kind {
            ChartKind::Boxplot => {
                let (plot_w, _) = chart.plotting_area().dim_in_pixel();
                draw_boxes(&mut chart, series, spec.categories.len(), plot_w)?
            }
            ChartKind::Scatter { jitter } => {
                draw_points(&mut chart, series, jitter, &mut rng)?
            }
        }

        if i == last && !series.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }
    }

    root.present()?;
    Ok(())
}

fn color(index: usize) -> RGBAColor {
    Palette99::pick(index).mix(0.9)
}

type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf32, RangedCoordf32>>;

fn draw_points(
    chart: &mut Chart<'_, '_>,
    series: &[PlacedSeries],
    jitter: f32,
    rng: &mut StdRng,
) -> DrawResult<()> {
    for s in series {
        let c = color(s.color_index);
        let points: Vec<(f32, f32)> = s
            .points
            .iter()
            .map(|&(x, y)| {
                let dx = if jitter > 0.0 {
                    rng.random_range(-jitter..=jitter)
                } else {
                    0.0
                };
                (x + dx, y)
            })
            .collect();
        chart
            .draw_series(
                points
                    .into_iter()
                    .map(|p| Circle::new(p, POINT_RADIUS, c.filled())),
            )?
            .label(s.label.as_str())
            .legend(move |(x, y)| Circle::new((x, y), POINT_RADIUS, c.filled()));
    }
    Ok(())
}

/// Box per (category, series); series are dodged side by side inside the
/// category slot.
fn draw_boxes(
    chart: &mut Chart<'_, '_>,
    series: &[PlacedSeries],
    category_count: usize,
    plot_width: u32,
) -> DrawResult<()> {
    let groups = series.len().max(1) as f32;
    let slot = 0.8 / groups;
    let slot_px = plot_width as f32 / category_count.max(1) as f32 * slot;
    let box_width = (slot_px * 0.8).max(2.0) as u32;

    for (g, s) in series.iter().enumerate() {
        let c = color(s.color_index);
        let offset = -0.4 + slot * (g as f32 + 0.5);
        let boxes: Vec<_> = (0..category_count)
            .filter_map(|cat| {
                let ys: Vec<f32> = s
                    .points
                    .iter()
                    .filter(|(x, _)| *x as usize == cat)
                    .map(|(_, y)| *y)
                    .collect();
                if ys.is_empty() {
                    return None;
                }
                Some(
                    Boxplot::new_vertical(cat as f32 + offset, &Quartiles::new(&ys))
                        .width(box_width)
                        .whisker_width(0.5)
                        .style(c.stroke_width(2)),
                )
            })
            .collect();
        chart
            .draw_series(boxes)?
            .label(s.label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x - 5, y - 5), (x + 5, y + 5)], c.filled()));
    }
    Ok(())
}

/// Moves a panel into drawing coordinates, dropping points that cannot be
/// placed (unknown category, non-finite, or non-positive on a log axis).
fn place_panel(spec: &ChartSpec, panel: &Panel) -> (Option<String>, Vec<PlacedSeries>) {
    let labels = spec.series_labels();
    let series = panel
        .series
        .iter()
        .map(|s| {
            let points: Vec<(f32, f32)> = s
                .points
                .iter()
                .filter_map(|p| {
                    let x = match &p.x {
                        XValue::Category(c) => {
                            spec.categories.iter().position(|k| k == c)? as f32
                        }
                        XValue::Value(v) => axis_value(*v, spec.log_x)?,
                    };
                    Some((x, axis_value(p.y, spec.log_y)?))
                })
                .collect();
            if points.len() < s.points.len() {
                tracing::debug!(
                    event = "chart_points_skipped",
                    chart = spec.name,
                    series = %s.label,
                    skipped = s.points.len() - points.len(),
                );
            }
            PlacedSeries {
                color_index: labels.iter().position(|l| *l == s.label).unwrap_or(0),
                label: s.label.clone(),
                points,
            }
        })
        .collect();
    (panel.title.clone(), series)
}

fn axis_value(v: f64, log: bool) -> Option<f32> {
    if !v.is_finite() {
        return None;
    }
    if log {
        (v > 0.0).then(|| v.log10() as f32)
    } else {
        Some(v as f32)
    }
}

/// Range covering `values` with a 5% margin on both ends.
fn padded_range(values: impl Iterator<Item = f32>) -> Range<f32> {
    let (lo, hi) = values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.5 };
    (lo - pad)..(hi + pad)
}

fn category_tick(categories: &[String], v: f32) -> String {
    let idx = v.round();
    if (v - idx).abs() > 0.01 || idx < 0.0 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

fn value_tick(v: f32, log: bool) -> String {
    let value = if log { 10f64.powf(v as f64) } else { v as f64 };
    let precision = if value.abs() >= 100.0 || (log && value >= 1.0) {
        0
    } else {
        2
    };
    format_number(value, precision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{Point, Series};

    fn spec(kind: ChartKind, log_y: bool) -> ChartSpec {
        let series = |label: &str, ys: &[f64]| Series {
            label: label.into(),
            points: ys
                .iter()
                .enumerate()
                .map(|(i, y)| Point {
                    x: XValue::Category(if i % 2 == 0 { "a" } else { "b" }.into()),
                    y: *y,
                })
                .collect(),
        };
        ChartSpec {
            name: "test_chart",
            kind,
            x_label: "Sample Type".into(),
            y_label: "Sample Size".into(),
            legend_title: "t".into(),
            log_x: false,
            log_y,
            categories: vec!["a".into(), "b".into()],
            panels: vec![
                Panel {
                    title: Some("$t = 1$".into()),
                    series: vec![series("x", &[1.0, 10.0, 100.0, 1000.0, 0.0])],
                },
                Panel {
                    title: Some("$t = 2$".into()),
                    series: vec![series("x", &[5.0, 50.0]), series("y", &[7.0, 70.0])],
                },
            ],
        }
    }

    #[test]
    fn renders_boxplot_and_scatter_svg() {
        let dir = tempfile::tempdir().unwrap();
        for (kind, name) in [
            (ChartKind::Boxplot, "box.svg"),
            (ChartKind::Scatter { jitter: 0.3 }, "scatter.svg"),
        ] {
            let path = dir.path().join(name);
            render_svg(&spec(kind, true), &path, (800, 400)).unwrap();
            let svg = std::fs::read_to_string(&path).unwrap();
            assert!(svg.contains("<svg"));
            assert!(svg.contains("Sample Size"));
        }
    }

    #[test]
    fn jitter_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.svg");
        let b = dir.path().join("b.svg");
        let s = spec(ChartKind::Scatter { jitter: 0.3 }, false);
        render_svg(&s, &a, (600, 300)).unwrap();
        render_svg(&s, &b, (600, 300)).unwrap();
        assert_eq!(
            std::fs::read_to_string(a).unwrap(),
            std::fs::read_to_string(b).unwrap()
        );
    }

    #[test]
    fn empty_chart_still_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        let mut s = spec(ChartKind::Boxplot, true);
        s.panels.clear();
        render_svg(&s, &path, (400, 300)).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("no data"));
    }

    #[test]
    fn log_axis_drops_non_positive_values() {
        assert_eq!(axis_value(0.0, true), None);
        assert_eq!(axis_value(100.0, true), Some(2.0));
        assert_eq!(axis_value(-1.0, false), Some(-1.0));
        assert_eq!(axis_value(f64::NAN, false), None);
    }

    #[test]
    fn tick_labels() {
        assert_eq!(value_tick(3.0, true), "1,000");
        assert_eq!(value_tick(0.5, false), "0.50");
        let cats = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_tick(&cats, 1.0), "b");
        assert_eq!(category_tick(&cats, 0.5), "");
        assert_eq!(category_tick(&cats, 2.0), "");
    }

    #[test]
    fn ranges_are_padded() {
        let r = padded_range([1.0f32, 3.0].into_iter());
        assert!(r.start < 1.0 && r.end > 3.0);
        assert_eq!(padded_range(std::iter::empty()), 0.0..1.0);
        assert_eq!(padded_range([2.0f32].into_iter()), 1.5..2.5);
    }
}
