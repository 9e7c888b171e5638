//! Declarative chart descriptions built from the prepared table.
//!
//! A [`ChartSpec`] holds everything needed to draw one chart: already
//! filtered points grouped into legend series and facet panels. Rendering
//! lives in [`render`]; the fixed set of study charts lives in [`catalog`].

pub mod catalog;
pub mod render;

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartKind {
    Boxplot,
    /// Points; `jitter` is the maximal horizontal offset in category units.
    Scatter { jitter: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum XValue {
    Category(String),
    Value(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: XValue,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: Option<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub name: &'static str,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: String,
    pub log_x: bool,
    pub log_y: bool,
    /// Category order on the x axis; empty for a numeric x axis.
    pub categories: Vec<String>,
    pub panels: Vec<Panel>,
}

impl ChartSpec {
    pub fn point_count(&self) -> usize {
        self.panels
            .iter()
            .flat_map(|p| &p.series)
            .map(|s| s.points.len())
            .sum()
    }

    pub fn series_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for s in self.panels.iter().flat_map(|p| &p.series) {
            if !labels.contains(&s.label.as_str()) {
                labels.push(&s.label);
            }
        }
        labels
    }
}

/// One observation before it is sorted into panels and series.
#[derive(Debug, Clone)]
pub(crate) struct Observation {
    pub facet: Option<String>,
    pub group: String,
    pub x: XValue,
    pub y: f64,
}

/// Orders labels by their position in `preferred`, unknown labels last and
/// alphabetically.
pub(crate) fn order_key(preferred: &[&str], label: &str) -> (usize, String) {
    let pos = preferred
        .iter()
        .position(|p| *p == label)
        .unwrap_or(preferred.len());
    (pos, label.to_string())
}

/// Groups observations into facet panels (sorted by title) and series
/// (ordered by `group_order`).
pub(crate) fn into_panels(observations: Vec<Observation>, group_order: &[&str]) -> Vec<Panel> {
    let mut panels: BTreeMap<Option<String>, BTreeMap<(usize, String), Vec<Point>>> =
        BTreeMap::new();
    for obs in observations {
        panels
            .entry(obs.facet)
            .or_default()
            .entry(order_key(group_order, &obs.group))
            .or_default()
            .push(Point { x: obs.x, y: obs.y });
    }

    panels
        .into_iter()
        .map(|(title, series)| Panel {
            title,
            series: series
                .into_iter()
                .map(|((_, label), points)| Series { label, points })
                .collect(),
        })
        .collect()
}

/// Distinct categories used by the observations, ordered like [`order_key`].
pub(crate) fn categories_of(observations: &[Observation], preferred: &[&str]) -> Vec<String> {
    let mut keys: Vec<(usize, String)> = Vec::new();
    for obs in observations {
        if let XValue::Category(c) = &obs.x {
            let key = order_key(preferred, c);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys.sort();
    keys.into_iter().map(|(_, c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(facet: Option<&str>, group: &str, x: &str, y: f64) -> Observation {
        Observation {
            facet: facet.map(str::to_string),
            group: group.into(),
            x: XValue::Category(x.into()),
            y,
        }
    }

    #[test]
    fn panels_sorted_and_series_follow_preferred_order() {
        let panels = into_panels(
            vec![
                obs(Some("$t = 2$"), "YASA", "a", 1.0),
                obs(Some("$t = 1$"), "zzz", "a", 2.0),
                obs(Some("$t = 1$"), "YASA", "b", 3.0),
                obs(Some("$t = 1$"), "Field (Scoring)", "b", 4.0),
            ],
            &["Field (Scoring)", "YASA"],
        );
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].title.as_deref(), Some("$t = 1$"));
        let labels: Vec<&str> = panels[0].series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Field (Scoring)", "YASA", "zzz"]);
    }

    #[test]
    fn categories_preferred_first_then_alphabetical() {
        let observations = vec![
            obs(None, "g", "zeta", 1.0),
            obs(None, "g", "YASA", 1.0),
            obs(None, "g", "alpha", 1.0),
            obs(None, "g", "YASA", 2.0),
        ];
        assert_eq!(
            categories_of(&observations, &["YASA"]),
            vec!["YASA", "alpha", "zeta"]
        );
    }
}
