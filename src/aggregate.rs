//! Filtering and grouping of parsed licensing records.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::record::{ParsedRecord, Period};
use crate::taxation::TaxationClass;

/// Row predicates the charts combine.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Class(TaxationClass),
    Year(i32),
    MonthOfYear(u8),
    /// Inclusive lower bound on `(year, month)`.
    Since(Period),
    /// Inclusive upper bound on `(year, month)`.
    Until(Period),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn matches(&self, record: &ParsedRecord) -> bool {
        match self {
            Predicate::Class(class) => record.taxation_class == *class,
            Predicate::Year(year) => record.year() == *year,
            Predicate::MonthOfYear(month) => record.month_of_year() == *month,
            Predicate::Since(from) => record.period >= *from,
            Predicate::Until(to) => record.period <= *to,
            Predicate::All(preds) => preds.iter().all(|p| p.matches(record)),
            Predicate::Any(preds) => preds.iter().any(|p| p.matches(record)),
            Predicate::Not(pred) => !pred.matches(record),
        }
    }

    pub fn classes(classes: &[TaxationClass]) -> Self {
        Predicate::Any(classes.iter().copied().map(Predicate::Class).collect())
    }
}

/// Keeps the records accepted by `predicate`, in input order.
pub fn filter<P>(records: &[ParsedRecord], predicate: P) -> Vec<ParsedRecord>
where
    P: Fn(&ParsedRecord) -> bool,
{
    records.iter().filter(|r| predicate(r)).copied().collect()
}

/// [`filter`] driven by a [`Predicate`] value.
pub fn filter_by(records: &[ParsedRecord], predicate: &Predicate) -> Vec<ParsedRecord> {
    filter(records, |r| predicate.matches(r))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyField {
    Year,
    MonthOfYear,
    TaxationClass,
}

/// A grouping key built from any combination of [`KeyField`]s.
///
/// Unselected fields stay `None`. Field order gives year-then-month ordering,
/// so sorting keys is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AggregationKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_of_year: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxation_class: Option<TaxationClass>,
}

impl AggregationKey {
    pub fn project(record: &ParsedRecord, fields: &[KeyField]) -> Self {
        let mut key = AggregationKey {
            year: None,
            month_of_year: None,
            taxation_class: None,
        };
        for field in fields {
            match field {
                KeyField::Year => key.year = Some(record.year()),
                KeyField::MonthOfYear => key.month_of_year = Some(record.month_of_year()),
                KeyField::TaxationClass => key.taxation_class = Some(record.taxation_class),
            }
        }
        key
    }

    /// Returns a key function for [`group_and_sum`] over the given fields.
    pub fn by(fields: &[KeyField]) -> impl Fn(&ParsedRecord) -> AggregationKey + '_ {
        move |r| AggregationKey::project(r, fields)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Order in which each key first appears in the input.
    #[default]
    FirstSeen,
    /// Ascending key order.
    Chronological,
}

/// One group: its key and a summed value for every requested class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedPoint<K> {
    pub key: K,
    pub values: BTreeMap<TaxationClass, f64>,
}

impl<K> AggregatedPoint<K> {
    fn zeroed(key: K, classes: &[TaxationClass]) -> Self {
        Self {
            key,
            values: classes.iter().map(|c| (*c, 0.0)).collect(),
        }
    }

    /// Summed value for `class`; 0 if the class was not requested.
    pub fn value(&self, class: TaxationClass) -> f64 {
        self.values.get(&class).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }
}

fn accumulate<K>(point: &mut AggregatedPoint<K>, record: &ParsedRecord) {
    if let Some(sum) = point.values.get_mut(&record.taxation_class) {
        *sum += record.value;
    }
}

/// Groups records by `key_fn` and sums `value` per class in `classes`.
///
/// One point is emitted per distinct key found in `records`; every requested
/// class appears in every point, at 0 when the group has no rows for it.
pub fn group_and_sum<K, F>(
    records: &[ParsedRecord],
    key_fn: F,
    classes: &[TaxationClass],
    order: Order,
) -> Vec<AggregatedPoint<K>>
where
    K: Eq + Hash + Ord + Clone,
    F: Fn(&ParsedRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut points: Vec<AggregatedPoint<K>> = Vec::new();

    for record in records {
        let key = key_fn(record);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            points.push(AggregatedPoint::zeroed(key, classes));
            points.len() - 1
        });
        accumulate(&mut points[slot], record);
    }

    if order == Order::Chronological {
        points.sort_by(|a, b| a.key.cmp(&b.key));
    }
    points
}

/// Like [`group_and_sum`] but over a caller-fixed key set.
///
/// Emits exactly one point per entry of `keys`, in that order, zero-filled
/// when no record maps to it. Records whose key is not listed are ignored.
pub fn group_and_sum_over<K, F>(
    records: &[ParsedRecord],
    key_fn: F,
    keys: &[K],
    classes: &[TaxationClass],
) -> Vec<AggregatedPoint<K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&ParsedRecord) -> K,
{
    let mut points: Vec<AggregatedPoint<K>> = keys
        .iter()
        .map(|k| AggregatedPoint::zeroed(k.clone(), classes))
        .collect();
    let index: HashMap<K, usize> = keys
        .iter()
        .enumerate()
        .map(|(i, k)| (k.clone(), i))
        .rev()
        .collect();

    for record in records {
        if let Some(&slot) = index.get(&key_fn(record)) {
            accumulate(&mut points[slot], record);
        }
    }
    points
}

/// Sum of `value` over every record of `class`; 0 when none match.
pub fn single_value_lookup(records: &[ParsedRecord], class: TaxationClass) -> f64 {
    records
        .iter()
        .filter(|r| r.taxation_class == class)
        .map(|r| r.value)
        .sum()
}
