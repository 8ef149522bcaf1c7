//! Reduction of API records into bucket counts and problem lists.

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use ratatui::style::Color;

/// A finite classification category.
pub trait Bucket: Copy + Eq + fmt::Debug + 'static {
    /// Every bucket, in display order.
    const ALL: &'static [Self];

    /// Position of the bucket in [`Bucket::ALL`].
    fn index(self) -> usize;

    /// Chart label.
    fn label(self) -> &'static str;

    /// Bar color.
    fn color(self) -> Color;

    /// Classify an API state string. Absent or unrecognized states land in
    /// the catch-all bucket.
    fn classify(state: Option<&str>) -> Self;
}

/// Record counts per bucket.
#[derive(Clone, PartialEq, Eq)]
pub struct Histogram<B: Bucket> {
    counts: Vec<u64>,
    _bucket: PhantomData<B>,
}

impl<B: Bucket> Histogram<B> {
    /// An empty histogram.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: vec![0; B::ALL.len()],
            _bucket: PhantomData,
        }
    }

    /// Classify every state and count it.
    pub fn from_states<'a>(states: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut histogram = Self::new();
        for state in states {
            histogram.add(B::classify(state));
        }
        histogram
    }

    /// Count one record.
    pub fn add(&mut self, bucket: B) {
        self.counts[bucket.index()] += 1;
    }

    /// Count of one bucket.
    #[must_use]
    pub fn count(&self, bucket: B) -> u64 {
        self.counts[bucket.index()]
    }

    /// Sum over all buckets.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// True when no bucket has a record.
    #[must_use]
    pub fn is_all_zero(&self) -> bool {
        self.counts.iter().all(|c| *c == 0)
    }

    /// Buckets with their counts, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (B, u64)> + '_ {
        B::ALL.iter().map(|b| (*b, self.count(*b)))
    }
}

impl<B: Bucket> Default for Histogram<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Bucket> fmt::Debug for Histogram<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Chart data to keep after a refresh.
///
/// An all-zero histogram never replaces what the chart shows: charts keep
/// their last non-empty data.
#[must_use]
pub fn keep_nonzero<B: Bucket>(
    fresh: Histogram<B>,
    previous: Option<Histogram<B>>,
) -> Option<Histogram<B>> {
    if fresh.is_all_zero() {
        previous
    } else {
        Some(fresh)
    }
}

/// `part * 100 / total`, or `None` when there is nothing to divide by.
#[must_use]
pub fn percent(part: u64, total: u64) -> Option<u16> {
    if total == 0 {
        return None;
    }
    // widened so byte counts near u64::MAX do not overflow
    Some((u128::from(part.min(total)) * 100 / u128::from(total)) as u16)
}

/// A problem of a named resource at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// Resource name.
    pub resource: String,
    /// What is wrong.
    pub message: String,
    /// When it was reported.
    pub time: DateTime<Utc>,
}

impl Problem {
    /// Build a problem from optional API fields.
    ///
    /// Returns `None` if a field is missing or the timestamp is not RFC 3339.
    pub fn from_parts(
        resource: Option<&str>,
        message: Option<String>,
        timestamp: Option<&str>,
    ) -> Option<Self> {
        Some(Self {
            resource: resource?.to_string(),
            message: message?,
            time: parse_timestamp(timestamp?)?,
        })
    }
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Sort newest first. Equal timestamps keep their order.
pub fn sort_newest_first(problems: &mut [Problem]) {
    problems.sort_by(|a, b| b.time.cmp(&a.time));
}
