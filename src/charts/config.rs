//! Per-chart drawing configuration.
//!
//! Each chart call receives its dimensions and container explicitly instead
//! of reading shared constants.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Bar,
    Line,
    Pie,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Doughnut,
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Scatter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Doughnut => "doughnut",
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Outer SVG size, plot margins, and the selector of the host element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margin: Margin,
    pub container: String,
}

impl ChartConfig {
    pub fn default_for(kind: ChartKind) -> Self {
        let (width, height, margin, container) = match kind {
            ChartKind::Doughnut => (600.0, 400.0, Margin::default(), "#chart"),
            ChartKind::Bar => (600.0, 400.0, Margin::new(50.0, 70.0, 120.0, 100.0), ".chart"),
            ChartKind::Line => (600.0, 400.0, Margin::new(40.0, 20.0, 70.0, 80.0), "body"),
            ChartKind::Pie => (800.0, 500.0, Margin::default(), "#chart"),
            ChartKind::Scatter => (
                1200.0,
                500.0,
                Margin::new(50.0, 150.0, 100.0, 70.0),
                "#scatter-plot",
            ),
        };
        Self {
            width,
            height,
            margin,
            container: container.to_string(),
        }
    }

    /// Plot area width once margins are removed, never negative.
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// Radius for circular charts: half the shorter inner side.
    pub fn radius(&self) -> f64 {
        self.inner_width().min(self.inner_height()) / 2.0
    }
}

/// Configuration overrides keyed by chart kind.
///
/// Stored as a JSON object on disk; kinds not listed keep their defaults:
/// ```json
/// {
///   "bar": { "width": 800, "height": 500, "container": "#bars",
///            "margin": { "top": 20, "right": 20, "bottom": 60, "left": 80 } }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChartConfigSet {
    entries: HashMap<ChartKind, ChartConfig>,
}

impl ChartConfigSet {
    /// Loads overrides from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read chart config '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid chart config '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let entries: HashMap<ChartKind, ChartConfig> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    /// Returns the override for `kind`, or its default configuration.
    pub fn for_kind(&self, kind: ChartKind) -> ChartConfig {
        self.entries
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| ChartConfig::default_for(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_inner_dimensions() {
        let config = ChartConfig::default_for(ChartKind::Bar);
        assert_eq!(config.inner_width(), 430.0);
        assert_eq!(config.inner_height(), 230.0);
    }

    #[test]
    fn test_inner_dimensions_never_negative() {
        let config = ChartConfig {
            width: 50.0,
            height: 50.0,
            margin: Margin::new(40.0, 40.0, 40.0, 40.0),
            container: "#tiny".into(),
        };
        assert_eq!(config.inner_width(), 0.0);
        assert_eq!(config.radius(), 0.0);
    }

    #[test]
    fn test_doughnut_radius() {
        assert_eq!(ChartConfig::default_for(ChartKind::Doughnut).radius(), 200.0);
    }

    #[test]
    fn test_config_set_overrides_only_listed_kinds() {
        let set = ChartConfigSet::from_json(
            r##"{ "pie": { "width": 300, "height": 300, "container": "#pie" } }"##,
        )
        .unwrap();

        let pie = set.for_kind(ChartKind::Pie);
        assert_eq!(pie.width, 300.0);
        assert_eq!(pie.margin, Margin::default());
        assert_eq!(pie.container, "#pie");
        assert_eq!(set.for_kind(ChartKind::Scatter), ChartConfig::default_for(ChartKind::Scatter));
    }

    #[test]
    fn test_config_set_rejects_unknown_kind() {
        assert!(ChartConfigSet::from_json(r#"{ "radar": { "width": 1, "height": 1, "container": "x" } }"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(ChartConfigSet::load("/nonexistent/charts.json").is_err());
    }
}
