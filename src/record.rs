//! Row types: the raw CSV row and its decoded form.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::AggregatorError;
use crate::taxation::TaxationClass;

/// A single row read from the licensing CSV, before any decoding.
///
/// `row` is the 0-based data row in the source, when the record came from one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRecord {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Taxation_Class")]
    pub taxation_class: String,
    #[serde(rename = "VALUE")]
    pub value: Option<String>,
    #[serde(skip)]
    pub row: Option<usize>,
}

impl RawRecord {
    pub fn new(month: &str, taxation_class: &str, value: Option<&str>) -> Self {
        Self {
            month: month.to_string(),
            taxation_class: taxation_class.to_string(),
            value: value.map(str::to_string),
            row: None,
        }
    }

    /// Tags the record with its source data row.
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("month '{0}' does not match YYYYMmm")]
pub struct InvalidPeriod(pub String);

/// A calendar month decoded from the `YYYYMmm` source format.
///
/// Ordering is numeric on `(year, month)`, never on the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    pub year: i32,
    pub month: u8,
}

impl Period {
    pub fn new(year: i32, month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// First calendar day of the month, for time-scaled axes.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), 1)
    }
}

impl FromStr for Period {
    type Err = InvalidPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidPeriod(s.to_string());
        let bytes = s.as_bytes();
        if !s.is_ascii() || bytes.len() != 7 || bytes[4] != b'M' {
            return Err(invalid());
        }
        let (year, month) = (&s[..4], &s[5..]);
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        Period::new(year, month).ok_or_else(invalid)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}M{:02}", self.year, self.month)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A [`RawRecord`] with its month decoded and value coerced to a count.
///
/// `value` is always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub period: Period,
    pub taxation_class: TaxationClass,
    pub value: f64,
}

impl ParsedRecord {
    /// Decodes one row. `row` is only used to label the error.
    pub fn from_raw(raw: &RawRecord, row: usize) -> Result<Self, AggregatorError> {
        let month = raw.month.trim();
        if month.is_empty() {
            return Err(AggregatorError::malformed(row, "empty month"));
        }
        let period: Period = month
            .parse()
            .map_err(|e: InvalidPeriod| AggregatorError::malformed(row, e.to_string()))?;
        let taxation_class = TaxationClass::from_label(&raw.taxation_class).ok_or_else(|| {
            AggregatorError::malformed(
                row,
                format!("unknown taxation class '{}'", raw.taxation_class),
            )
        })?;

        Ok(Self {
            period,
            taxation_class,
            value: coerce_value(raw.value.as_deref()),
        })
    }

    pub fn year(&self) -> i32 {
        self.period.year
    }

    pub fn month_of_year(&self) -> u8 {
        self.period.month
    }

    /// Re-serializes the record in source form with the canonical class label.
    pub fn to_raw(&self) -> RawRecord {
        RawRecord {
            month: self.period.to_string(),
            taxation_class: self.taxation_class.canonical_name().to_string(),
            value: Some(self.value.to_string()),
            row: None,
        }
    }
}

/// Missing, non-numeric, non-finite, or negative values all count as zero.
pub fn coerce_value(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}
