use std::collections::BTreeSet;
use tracing::debug;

use super::{
    ChartConfig, ChartData, ChartDocument, ChartKind, DoughnutSlice, LinePoint, PieSlice,
    ScatterPoint,
};
use crate::aggregate::{Order, Predicate, filter_by, group_and_sum, single_value_lookup};
use crate::record::{ParsedRecord, Period};
use crate::taxation::TaxationClass;

pub const DEFAULT_DOUGHNUT_PERIOD: Period = Period {
    year: 2019,
    month: 1,
};
pub const DEFAULT_LINE_SINCE: Period = Period {
    year: 2018,
    month: 12,
};
pub const DEFAULT_PIE_YEAR: i32 = 2019;

const DOUGHNUT_CLASSES: [TaxationClass; 2] =
    [TaxationClass::NewPrivateCars, TaxationClass::NewGoodsVehicles];
const BAR_CLASSES: [TaxationClass; 2] = [
    TaxationClass::NewPrivateCars,
    TaxationClass::SecondhandPrivateCars,
];
const SCATTER_CLASSES: [TaxationClass; 2] =
    [TaxationClass::NewTractors, TaxationClass::SecondhandTractors];

/// New private cars against new goods vehicles in a single month.
pub fn doughnut(records: &[ParsedRecord], period: Period, config: &ChartConfig) -> ChartDocument {
    let in_month = filter_by(
        records,
        &Predicate::All(vec![Predicate::Since(period), Predicate::Until(period)]),
    );
    let slices: Vec<DoughnutSlice> = DOUGHNUT_CLASSES
        .iter()
        .map(|class| DoughnutSlice {
            taxation_class: *class,
            label: class.display_name(),
            value: single_value_lookup(&in_month, *class),
        })
        .collect();

    debug!(%period, rows = in_month.len(), "Doughnut projected");
    ChartDocument::new(
        ChartKind::Doughnut,
        format!("New Private Cars vs New Goods Vehicles ({period})"),
        config,
        ChartData::Doughnut(slices),
    )
}

/// New against second-hand private cars, first month of each year.
pub fn bar(records: &[ParsedRecord], config: &ChartConfig) -> ChartDocument {
    let january = filter_by(records, &Predicate::MonthOfYear(1));
    let points = group_and_sum(&january, |r| r.year(), &BAR_CLASSES, Order::Chronological);

    debug!(years = points.len(), "Bar projected");
    ChartDocument::new(
        ChartKind::Bar,
        "Private Cars Licensed for the first time".to_string(),
        config,
        ChartData::Bar(points),
    )
}

/// Monthly new vehicle registrations from `since` onward.
pub fn line(records: &[ParsedRecord], since: Period, config: &ChartConfig) -> ChartDocument {
    let selected = filter_by(
        records,
        &Predicate::All(vec![
            Predicate::Class(TaxationClass::NewVehicles),
            Predicate::Since(since),
        ]),
    );
    let classes = [TaxationClass::NewVehicles];
    let points: Vec<LinePoint> =
        group_and_sum(&selected, |r| r.period, &classes, Order::Chronological)
            .into_iter()
            .filter_map(|p| {
                Some(LinePoint {
                    date: p.key.first_day()?,
                    value: p.value(TaxationClass::NewVehicles),
                    period: p.key,
                })
            })
            .collect();

    debug!(%since, points = points.len(), "Line projected");
    ChartDocument::new(
        ChartKind::Line,
        format!("New Vehicle Registrations (since {since})"),
        config,
        ChartData::Line(points),
    )
}

/// All vehicles registered in `year`, one slice per month.
pub fn pie(records: &[ParsedRecord], year: i32, config: &ChartConfig) -> ChartDocument {
    let selected = filter_by(
        records,
        &Predicate::All(vec![
            Predicate::Year(year),
            Predicate::Class(TaxationClass::AllVehicles),
        ]),
    );
    let classes = [TaxationClass::AllVehicles];
    let slices: Vec<PieSlice> =
        group_and_sum(&selected, |r| r.month_of_year(), &classes, Order::FirstSeen)
            .into_iter()
            .map(|p| PieSlice {
                month_of_year: p.key,
                label: format!("{:02}", p.key),
                value: p.value(TaxationClass::AllVehicles),
            })
            .collect();

    debug!(year, slices = slices.len(), "Pie projected");
    ChartDocument::new(
        ChartKind::Pie,
        format!("Registered Vehicles by Month for {year}"),
        config,
        ChartData::Pie(slices),
    )
}

/// Years offered by the pie chart's year selector, ascending.
pub fn pie_years(records: &[ParsedRecord]) -> Vec<i32> {
    records
        .iter()
        .filter(|r| r.taxation_class == TaxationClass::AllVehicles)
        .map(ParsedRecord::year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every new and second-hand tractor record as a dated point.
pub fn scatter(records: &[ParsedRecord], config: &ChartConfig) -> ChartDocument {
    let tractors = filter_by(records, &Predicate::classes(&SCATTER_CLASSES));
    let points: Vec<ScatterPoint> = tractors
        .iter()
        .filter_map(|r| {
            Some(ScatterPoint {
                period: r.period,
                date: r.period.first_day()?,
                taxation_class: r.taxation_class,
                value: r.value,
            })
        })
        .collect();

    debug!(points = points.len(), "Scatter projected");
    ChartDocument::new(
        ChartKind::Scatter,
        "Tractor Registrations Per Month".to_string(),
        config,
        ChartData::Scatter(points),
    )
}
