//! Output formatting and persistence for chart documents.
//!
//! Supports pretty-printing, JSON to stdout or file, and CSV export of
//! aggregated points.

use anyhow::Result;
use csv::Writer;
use serde::Serialize;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::aggregate::AggregatedPoint;
use crate::charts::ChartDocument;
use crate::taxation::TaxationClass;

/// Logs a chart document using Rust's debug pretty-print format.
pub fn print_pretty(doc: &ChartDocument) {
    debug!("{:#?}", doc);
}

/// Prints any serializable value to stdout as pretty JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a serializable value as pretty JSON, creating parent directories.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)?;
    info!(path = %path.display(), "JSON written");
    Ok(())
}

/// Writes aggregated points to a CSV file, one row per point.
///
/// Columns are `key` followed by one column per class in `classes`.
pub fn write_points_csv<K: Display>(
    path: &Path,
    points: &[AggregatedPoint<K>],
    classes: &[TaxationClass],
) -> Result<()> {
    let mut writer = Writer::from_path(path)?;

    let mut header = vec!["key".to_string()];
    header.extend(classes.iter().map(|c| c.canonical_name().to_string()));
    writer.write_record(&header)?;

    for point in points {
        let mut row = vec![point.key.to_string()];
        row.extend(classes.iter().map(|c| point.value(*c).to_string()));
        writer.write_record(&row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = points.len(), "CSV points written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Order, group_and_sum};
    use crate::charts::{ChartConfig, ChartKind, bar};
    use crate::record::ParsedRecord;
    use std::env;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn records() -> Vec<ParsedRecord> {
        vec![
            ParsedRecord {
                period: "2019M01".parse().unwrap(),
                taxation_class: TaxationClass::NewPrivateCars,
                value: 100.0,
            },
            ParsedRecord {
                period: "2020M01".parse().unwrap(),
                taxation_class: TaxationClass::SecondhandPrivateCars,
                value: 30.0,
            },
        ]
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        let doc = bar(&records(), &ChartConfig::default_for(ChartKind::Bar));
        print_pretty(&doc);
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let doc = bar(&records(), &ChartConfig::default_for(ChartKind::Bar));
        print_json(&doc).unwrap();
    }

    #[test]
    fn test_write_json_creates_directories() {
        let dir = temp_path("vehicle_charts_test_json");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("nested/bar.json");

        let doc = bar(&records(), &ChartConfig::default_for(ChartKind::Bar));
        write_json(&path, &doc).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["kind"], "bar");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_points_csv() {
        let path = temp_path("vehicle_charts_test_points.csv");
        let _ = fs::remove_file(&path);

        let classes = [TaxationClass::NewPrivateCars, TaxationClass::SecondhandPrivateCars];
        let points = group_and_sum(&records(), |r| r.year(), &classes, Order::FirstSeen);
        write_points_csv(&path, &points, &classes).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "key,New_Private_Cars,Secondhand_Private_Cars");
        assert_eq!(lines[1], "2019,100,0");
        assert_eq!(lines[2], "2020,0,30");

        fs::remove_file(&path).unwrap();
    }
}
