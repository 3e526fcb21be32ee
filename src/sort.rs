//! Sort keys - orderable values extracted from records for sorted scans.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::SystemTime;

use crate::storable::Storable;

/// A single sort-key value extracted from a record.
///
/// Values order first by kind (absent, then booleans, then numbers, then
/// text, then timestamps) and within a kind by their natural order.
/// Integers and floats compare numerically with each other.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SortValue {
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Time(SystemTime),
}

impl SortValue {
    fn kind_rank(&self) -> u8 {
        match self {
            SortValue::Absent => 0,
            SortValue::Bool(_) => 1,
            SortValue::Int(_) | SortValue::Float(_) => 2,
            SortValue::Text(_) => 3,
            SortValue::Time(_) => 4,
        }
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use SortValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Int(a), Float(b)) => cmp_int_float(*a, *b),
            (Float(a), Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Text(a), Text(b)) => a.cmp(b),
            (Time(a), Time(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

/// Exact numeric comparison of an integer against a float. Casting the
/// integer to f64 loses precision above 2^53, which would make distinct
/// large integers compare equal to the same float and break transitivity,
/// so ties on the lossy cast are resolved back in integer space.
fn cmp_int_float(a: i64, b: f64) -> Ordering {
    match (a as f64).total_cmp(&b) {
        Ordering::Equal => {
            // b is integer-valued here; 2^63 rounds up out of i64 range.
            if b >= 9_223_372_036_854_775_808.0 {
                Ordering::Less
            } else {
                a.cmp(&(b as i64))
            }
        }
        unequal => unequal,
    }
}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equality follows the total order, so Float(0.0) and Int(0) are equal
// while NaN still equals itself.
impl PartialEq for SortValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortValue {}

impl From<bool> for SortValue {
    fn from(value: bool) -> Self {
        SortValue::Bool(value)
    }
}

impl From<i32> for SortValue {
    fn from(value: i32) -> Self {
        SortValue::Int(i64::from(value))
    }
}

impl From<i64> for SortValue {
    fn from(value: i64) -> Self {
        SortValue::Int(value)
    }
}

impl From<u32> for SortValue {
    fn from(value: u32) -> Self {
        SortValue::Int(i64::from(value))
    }
}

impl From<f64> for SortValue {
    fn from(value: f64) -> Self {
        SortValue::Float(value)
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        SortValue::Text(value.to_string())
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        SortValue::Text(value)
    }
}

impl From<SystemTime> for SortValue {
    fn from(value: SystemTime) -> Self {
        SortValue::Time(value)
    }
}

impl<V: Into<SortValue>> From<Option<V>> for SortValue {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => SortValue::Absent,
        }
    }
}

/// Extracts one orderable value from a record.
pub struct SortKey<T> {
    select: Box<dyn Fn(&T) -> SortValue + Send + Sync>,
}

impl<T> SortKey<T> {
    /// A key sorting by any field or expression convertible to a
    /// [`SortValue`].
    pub fn by<F, V>(select: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<SortValue>,
    {
        SortKey {
            select: Box::new(move |record| select(record).into()),
        }
    }

    pub fn evaluate(&self, record: &T) -> SortValue {
        (self.select)(record)
    }
}

impl<T: Storable> SortKey<T> {
    /// The built-in default key: the stamped last-update timestamp.
    pub fn last_update() -> Self {
        SortKey::by(|record: &T| record.last_update())
    }
}

/// An ordered list of sort keys plus a scan direction.
///
/// Ties on the first key fall through to the next key; the record id and
/// then its partition key are always the final tiebreakers, so the
/// resulting scan order is total.
pub struct SortOrder<T> {
    keys: Vec<SortKey<T>>,
    descending: bool,
}

impl<T> SortOrder<T> {
    pub fn new(keys: Vec<SortKey<T>>, descending: bool) -> Self {
        SortOrder { keys, descending }
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    /// Evaluates every key against one record, in key order.
    pub fn evaluate(&self, record: &T) -> Vec<SortValue> {
        self.keys.iter().map(|key| key.evaluate(record)).collect()
    }

    /// Compares two decorated rows (sort-key tuple, id, partition key) in
    /// scan order. The partition key is the last tiebreaker because the
    /// same id may recur across partitions.
    pub fn compare(
        &self,
        a: (&[SortValue], &str, &str),
        b: (&[SortValue], &str, &str),
    ) -> Ordering {
        let forward = a
            .0
            .cmp(b.0)
            .then_with(|| a.1.cmp(b.1))
            .then_with(|| a.2.cmp(b.2));
        if self.descending {
            forward.reverse()
        } else {
            forward
        }
    }
}

impl<T: Storable> SortOrder<T> {
    /// The default order: the stamped last-update timestamp.
    pub fn by_last_update(descending: bool) -> Self {
        SortOrder::new(vec![SortKey::last_update()], descending)
    }
}
