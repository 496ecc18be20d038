//! Credit-share math.
//!
//! A `CreditShare` maps contributor → fraction of lines; fractions sum to 1
//! unless the share is empty. `CreditTally` accumulates line-weighted totals
//! and normalizes them into a share.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CreditShare(BTreeMap<String, f64>);

impl CreditShare {
    /// Normalize raw per-contributor line counts into a share.
    pub fn from_line_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut tally = CreditTally::default();
        let mut total = 0;
        for (contributor, lines) in counts {
            tally.add_lines(contributor, lines);
            total += lines;
        }
        tally.into_share(total)
    }

    /// Fraction credited to `contributor`, 0 when absent.
    pub fn get(&self, contributor: &str) -> f64 {
        self.0.get(contributor).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, contributor: &str) -> bool {
        self.0.contains_key(contributor)
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contributors(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Line-weighted contributor totals.
#[derive(Debug, Default)]
pub struct CreditTally(BTreeMap<String, f64>);

impl CreditTally {
    pub fn add_lines(&mut self, contributor: impl Into<String>, lines: usize) {
        if lines == 0 {
            return;
        }
        *self.0.entry(contributor.into()).or_insert(0.0) += lines as f64;
    }

    /// Add a share scaled by the number of lines it covers.
    pub fn add_weighted(&mut self, share: &CreditShare, lines: usize) {
        if lines == 0 {
            return;
        }
        for (contributor, fraction) in share.iter() {
            *self.0.entry(contributor.to_string()).or_insert(0.0) += fraction * lines as f64;
        }
    }

    pub fn into_share(self, line_count: usize) -> CreditShare {
        if line_count == 0 {
            return CreditShare::default();
        }
        let total = line_count as f64;
        CreditShare(
            self.0
                .into_iter()
                .map(|(contributor, weight)| (contributor, weight / total))
                .collect(),
        )
    }
}
