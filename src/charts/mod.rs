//! Chart-ready projections of the licensing dataset.
//!
//! Each of the five charts gets a function that filters and groups parsed
//! records into the series it draws, wrapped in a [`ChartDocument`] together
//! with its [`ChartConfig`]. Drawing is left to the front end.

pub mod config;
pub mod projections;

pub use config::{ChartConfig, ChartConfigSet, ChartKind, Margin};
pub use projections::{
    DEFAULT_DOUGHNUT_PERIOD, DEFAULT_LINE_SINCE, DEFAULT_PIE_YEAR, bar, doughnut, line, pie,
    pie_years, scatter,
};

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::AggregatedPoint;
use crate::record::Period;
use crate::taxation::TaxationClass;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoughnutSlice {
    pub taxation_class: TaxationClass,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub period: Period,
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub month_of_year: u8,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub period: Period,
    pub date: NaiveDate,
    pub taxation_class: TaxationClass,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Doughnut(Vec<DoughnutSlice>),
    Bar(Vec<AggregatedPoint<i32>>),
    Line(Vec<LinePoint>),
    Pie(Vec<PieSlice>),
    Scatter(Vec<ScatterPoint>),
}

impl ChartData {
    pub fn len(&self) -> usize {
        match self {
            ChartData::Doughnut(d) => d.len(),
            ChartData::Bar(d) => d.len(),
            ChartData::Line(d) => d.len(),
            ChartData::Pie(d) => d.len(),
            ChartData::Scatter(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest plotted value, 0 for empty data. Upper bound of the value axis.
    pub fn max_value(&self) -> f64 {
        let values: Box<dyn Iterator<Item = f64> + '_> = match self {
            ChartData::Doughnut(d) => Box::new(d.iter().map(|s| s.value)),
            ChartData::Bar(d) => Box::new(d.iter().flat_map(|p| p.values.values().copied())),
            ChartData::Line(d) => Box::new(d.iter().map(|p| p.value)),
            ChartData::Pie(d) => Box::new(d.iter().map(|s| s.value)),
            ChartData::Scatter(d) => Box::new(d.iter().map(|p| p.value)),
        };
        values.fold(0.0, f64::max)
    }

    /// Earliest and latest month on a time axis. `None` for charts without one
    /// and for empty series.
    pub fn period_extent(&self) -> Option<(Period, Period)> {
        let periods: Vec<Period> = match self {
            ChartData::Line(d) => d.iter().map(|p| p.period).collect(),
            ChartData::Scatter(d) => d.iter().map(|p| p.period).collect(),
            _ => return None,
        };
        let min = periods.iter().min()?;
        let max = periods.iter().max()?;
        Some((*min, *max))
    }
}

/// Everything a renderer needs for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDocument {
    pub kind: ChartKind,
    pub title: String,
    pub config: ChartConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_min: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_max: Option<Period>,
    pub y_max: f64,
    pub data: ChartData,
}

impl ChartDocument {
    pub fn new(kind: ChartKind, title: String, config: &ChartConfig, data: ChartData) -> Self {
        let extent = data.period_extent();
        Self {
            kind,
            title,
            config: config.clone(),
            x_min: extent.map(|(min, _)| min),
            x_max: extent.map(|(_, max)| max),
            y_max: data.max_value(),
            data,
        }
    }
}
