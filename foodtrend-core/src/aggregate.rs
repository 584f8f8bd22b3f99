//! Group-by aggregation over price records.
//!
//! Rows whose group key has a missing component are dropped. Missing prices
//! are skipped inside a group: the mean of a group with no valid price is
//! `None`, its sum is `0.0`. Groups come out sorted ascending by key.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::{Field, PriceRecord};

/// Running sum and count of the non-missing values seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Reduction applied to each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Mean,
    Sum,
}

/// One output row of a group-by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStat<K> {
    pub key: K,
    /// Aggregated price; `None` only for a mean over no valid prices.
    pub value: Option<f64>,
    /// Number of non-missing prices in the group.
    pub count: usize,
}

/// Group `records` by `key` and reduce `price` per group.
pub fn group_by<'a, K, I, F>(records: I, key: F, aggregate: Aggregate) -> Vec<GroupStat<K>>
where
    K: Ord,
    I: IntoIterator<Item = &'a PriceRecord>,
    F: Fn(&PriceRecord) -> Option<K>,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for record in records {
        if let Some(k) = key(record) {
            groups.entry(k).or_default().push(record.price);
        }
    }
    groups
        .into_iter()
        .map(|(key, acc)| GroupStat {
            key,
            value: match aggregate {
                Aggregate::Mean => acc.mean(),
                Aggregate::Sum => Some(acc.sum()),
            },
            count: acc.count(),
        })
        .collect()
}

/// Mean price per value of one categorical column.
pub fn mean_by<'a, I>(records: I, field: Field) -> Vec<GroupStat<String>>
where
    I: IntoIterator<Item = &'a PriceRecord>,
{
    group_by(
        records,
        |r| r.category(field).map(str::to_owned),
        Aggregate::Mean,
    )
}

/// Mean price per (category, year).
pub fn mean_by_category_year<'a, I>(records: I, field: Field) -> Vec<GroupStat<(String, i32)>>
where
    I: IntoIterator<Item = &'a PriceRecord>,
{
    group_by(
        records,
        |r| Some((r.category(field)?.to_owned(), r.year?)),
        Aggregate::Mean,
    )
}

/// Total price per (year, month).
pub fn sum_by_year_month<'a, I>(records: I) -> Vec<GroupStat<(i32, i32)>>
where
    I: IntoIterator<Item = &'a PriceRecord>,
{
    group_by(records, |r| Some((r.year?, r.month?)), Aggregate::Sum)
}

/// True when the record's categorical value is one of `selected`.
pub fn is_selected(record: &PriceRecord, field: Field, selected: &[String]) -> bool {
    record
        .category(field)
        .is_some_and(|v| selected.iter().any(|s| s == v))
}

/// A labelled value in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub label: String,
    pub value: f64,
}

fn defined(stats: Vec<GroupStat<String>>) -> Vec<Ranked> {
    stats
        .into_iter()
        .filter_map(|s| {
            s.value.map(|value| Ranked {
                label: s.key,
                value,
            })
        })
        .collect()
}

/// Full ranking, highest value first. The sort is stable, so ties keep the
/// order the groups were produced in. Groups without a value are left out.
pub fn rank_descending(stats: Vec<GroupStat<String>>) -> Vec<Ranked> {
    let mut ranked = defined(stats);
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked
}

/// Full ranking, lowest value first (stable).
pub fn rank_ascending(stats: Vec<GroupStat<String>>) -> Vec<Ranked> {
    let mut ranked = defined(stats);
    ranked.sort_by(|a, b| a.value.total_cmp(&b.value));
    ranked
}

/// The `n` highest values, highest first.
pub fn largest(stats: Vec<GroupStat<String>>, n: usize) -> Vec<Ranked> {
    let mut ranked = rank_descending(stats);
    ranked.truncate(n);
    ranked
}

/// The `n` lowest values, lowest first.
pub fn smallest(stats: Vec<GroupStat<String>>, n: usize) -> Vec<Ranked> {
    let mut ranked = rank_ascending(stats);
    ranked.truncate(n);
    ranked
}

/// (min, max) over finite values; `None` when there are none.
pub fn value_range<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
