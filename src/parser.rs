//! CSV decoding for the vehicle licensing dataset.

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::error::AggregatorError;
use crate::record::{ParsedRecord, RawRecord};

/// Header names accepted for each required column, preferred spelling first.
const REQUIRED_COLUMNS: [(&str, &[&str]); 3] = [
    ("Month", &["Month"]),
    ("Taxation_Class", &["Taxation_Class", "Taxation Class"]),
    ("VALUE", &["VALUE", "Value"]),
];

/// Header positions of the required columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    month: usize,
    taxation_class: usize,
    value: usize,
}

impl ColumnIndex {
    /// Resolves every required column to exactly one header position.
    ///
    /// When a header carries several accepted spellings of a column, the
    /// preferred spelling wins and the others are treated as extra columns.
    fn resolve(headers: &StringRecord) -> Result<Self, AggregatorError> {
        let [month, taxation_class, value] = REQUIRED_COLUMNS.map(|(name, accepted)| {
            accepted
                .iter()
                .find_map(|spelling| headers.iter().position(|h| h == *spelling))
                .ok_or_else(|| AggregatorError::MissingColumn(name.to_string()))
        });
        Ok(Self {
            month: month?,
            taxation_class: taxation_class?,
            value: value?,
        })
    }

    fn extract(&self, record: &StringRecord, row: usize) -> RawRecord {
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();
        RawRecord {
            month: field(self.month),
            taxation_class: field(self.taxation_class),
            value: record
                .get(self.value)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            row: Some(row),
        }
    }
}

/// Reads delimited text with a header row into [`RawRecord`]s.
///
/// Each record is tagged with its 0-based data row. Rows the CSV reader
/// cannot decode are reported as [`AggregatorError::MalformedRecord`] at
/// `warn` and skipped.
///
/// # Errors
///
/// Returns [`AggregatorError::MissingColumn`] if the header row lacks one of
/// `Month`, `Taxation_Class` or `VALUE`.
pub fn read_raw_records(text: &str) -> Result<Vec<RawRecord>, AggregatorError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|_| AggregatorError::MissingColumn("header row".to_string()))?
        .clone();
    let columns = ColumnIndex::resolve(&headers)?;
    debug!(?columns, "CSV columns resolved");

    let mut rows = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        match result {
            Ok(record) => rows.push(columns.extract(&record, row)),
            Err(e) => {
                let err = AggregatorError::malformed(row, e.to_string());
                warn!(error = %err, "Skipping unreadable CSV row");
            }
        }
    }

    debug!(rows = rows.len(), "CSV rows read");
    Ok(rows)
}

/// Decodes raw rows, preserving input order.
///
/// A malformed row never aborts the batch: it is logged at `warn` and skipped.
pub fn parse(raw_rows: &[RawRecord]) -> Vec<ParsedRecord> {
    let mut skipped = 0usize;
    let parsed: Vec<ParsedRecord> = raw_rows
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| match decode(idx, raw) {
            Ok(rec) => Some(rec),
            Err(e) => {
                skipped += 1;
                warn!(error = %e, "Skipping malformed record");
                None
            }
        })
        .collect();

    debug!(kept = parsed.len(), skipped, "Records parsed");
    parsed
}

/// Decodes one row, labelling errors with its source row when known.
fn decode(idx: usize, raw: &RawRecord) -> Result<ParsedRecord, AggregatorError> {
    ParsedRecord::from_raw(raw, raw.row.unwrap_or(idx))
}

/// Reads and parses CSV text in one step.
pub fn load_records(text: &str) -> Result<Vec<ParsedRecord>, AggregatorError> {
    Ok(parse(&read_raw_records(text)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxation::TaxationClass;

    const SAMPLE: &str = "\
STATISTIC,Month,Taxation_Class,UNIT,VALUE
TEA17,2019M01,New_Private_Cars,Number,100
TEA17,2019M01,New Goods Vehicles,Number,40
TEA17,2020M01,New_Private_Cars,Number,120
";

    #[test]
    fn test_read_raw_records_ignores_extra_columns() {
        let rows = read_raw_records(SAMPLE).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].taxation_class, "New Goods Vehicles");
        assert_eq!(rows[2].value.as_deref(), Some("120"));
    }

    #[test]
    fn test_read_raw_records_missing_column() {
        let err = read_raw_records("Month,VALUE\n2019M01,3\n").unwrap_err();
        assert_eq!(err, AggregatorError::MissingColumn("Taxation_Class".into()));
    }

    #[test]
    fn test_read_raw_records_accepts_spaced_headers_and_bom() {
        let text = "\u{feff}Month,Taxation Class,Value\n2021M07,New_Tractors,9\n";
        let rows = read_raw_records(text).unwrap();
        assert_eq!(
            rows,
            vec![RawRecord::new("2021M07", "New_Tractors", Some("9")).with_row(0)]
        );
    }

    #[test]
    fn test_read_raw_records_prefers_canonical_spelling() {
        let text = "\
Month,Taxation_Class,Taxation Class,VALUE,Value
2019M01,New_Private_Cars,New private cars,100,1
2019M01,New_Goods_Vehicles,New goods vehicles,40,2
";
        let rows = read_raw_records(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].taxation_class, "New_Private_Cars");
        assert_eq!(rows[1].value.as_deref(), Some("40"));

        let parsed = parse(&rows);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].taxation_class, TaxationClass::NewGoodsVehicles);
    }

    #[test]
    fn test_read_raw_records_falls_back_to_alternate_spelling() {
        let text = "Month,Taxation Class,UNIT,Value\n2019M01,New Tractors,Number,12\n";
        let rows = read_raw_records(text).unwrap();
        assert_eq!(rows[0].taxation_class, "New Tractors");
        assert_eq!(rows[0].value.as_deref(), Some("12"));
    }

    #[test]
    fn test_rows_keep_source_position() {
        let text = "\
Month,Taxation_Class,VALUE
2019M01,New_Private_Cars,1
2019M02
2019/03,New_Private_Cars,3
2019M04,New_Private_Cars,4
";
        let rows = read_raw_records(text).unwrap();
        let positions: Vec<Option<usize>> = rows.iter().map(|r| r.row).collect();
        assert_eq!(positions, vec![Some(0), Some(1), Some(2), Some(3)]);

        // Short row decodes with empty fields and fails at its own position
        let err = decode(1, &rows[1]).unwrap_err();
        assert!(matches!(err, AggregatorError::MalformedRecord { row: 1, .. }));

        // Label follows the source row, not the position in the slice
        let tail = &rows[2..];
        let err = decode(0, &tail[0]).unwrap_err();
        assert!(matches!(err, AggregatorError::MalformedRecord { row: 2, .. }));

        let parsed = parse(&rows);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].value, 4.0);
    }

    #[test]
    fn test_read_raw_records_empty_value_is_none() {
        let rows = read_raw_records("Month,Taxation_Class,VALUE\n2019M02,All_Vehicles,\n").unwrap();
        assert_eq!(rows[0].value, None);
    }

    #[test]
    fn test_parse_skips_malformed_rows_and_keeps_order() {
        let raw = vec![
            RawRecord::new("2019M02", "New_Private_Cars", Some("5")),
            RawRecord::new("2019/03", "New_Private_Cars", Some("6")),
            RawRecord::new("2019M01", "New_Private_Cars", Some("x")),
        ];
        let parsed = parse(&raw);

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].period.to_string(), "2019M02");
        assert_eq!(parsed[1].period.to_string(), "2019M01");
        assert_eq!(parsed[1].value, 0.0);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parsed = load_records(SAMPLE).unwrap();
        let reserialized: Vec<RawRecord> = parsed.iter().map(ParsedRecord::to_raw).collect();
        assert_eq!(parse(&reserialized), parsed);
    }

    #[test]
    fn test_load_records_normalizes_vocabulary() {
        let parsed = load_records(SAMPLE).unwrap();
        assert_eq!(parsed[1].taxation_class, TaxationClass::NewGoodsVehicles);
    }
}
