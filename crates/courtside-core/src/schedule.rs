//! Scheduling core: half-open time slots, overlap detection, and temporal
//! bucketing of schedulable records relative to an explicit instant.
//!
//! Everything here is a pure function of its arguments. The current instant
//! is always passed in as `now`; nothing reads a live clock, so identical
//! inputs always produce identical output.

use chrono::{DateTime, Datelike, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Half-open time range `[start, end)`.
///
/// Well-formedness (`start < end`) is the caller's responsibility; a
/// malformed slot yields garbage classification, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Half-open intersection test. Slots that merely touch at an endpoint
    /// (`self.end == other.start`) do not overlap.
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Coach response to a booked session. Transitions one way: `Pending`
/// resolves to `Accepted` or `Rejected` exactly once, with no reversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionState {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ResolutionState {
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

/// A record that occupies a time slot and may carry a resolution state.
pub trait Schedulable {
    fn slot(&self) -> TimeSlot;

    /// `None` for record types with no resolution workflow (tournaments).
    fn resolution(&self) -> Option<ResolutionState> {
        None
    }
}

/// ## Summary
/// Returns the first member of `existing` whose slot overlaps `candidate`,
/// short-circuiting on the match.
///
/// `existing` must already be scoped by the caller (one coach's other
/// sessions, one user's own tournaments), and when editing a record in
/// place the caller must exclude that record from `existing` or the edit
/// will always conflict with itself.
pub fn first_conflict<'a, T, I>(candidate: TimeSlot, existing: I) -> Option<&'a T>
where
    T: Schedulable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    existing
        .into_iter()
        .find(|record| record.slot().overlaps(candidate))
}

/// True when `candidate` overlaps at least one member of `existing`. An
/// empty `existing` never conflicts.
pub fn conflicts<'a, T, I>(candidate: TimeSlot, existing: I) -> bool
where
    T: Schedulable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    first_conflict(candidate, existing).is_some()
}

/// Derived temporal classification. Computed fresh on every read relative
/// to the supplied instant; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Past,
    Ongoing,
    Upcoming,
}

impl Bucket {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Ongoing => "ongoing",
            Self::Upcoming => "upcoming",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ## Summary
/// Classifies one record relative to `now`. Rules apply in fixed priority
/// order; the first match wins:
///
/// 1. ended before `now` — `Past`;
/// 2. in-window (`start <= now <= end`) — `Ongoing` when resolved or when
///    the record carries no resolution state; a still-pending record is
///    demoted to `Past`, signalling a window that needed action and is
///    closing;
/// 3. otherwise (`start > now`) — `Upcoming`.
#[must_use]
pub fn classify(now: DateTime<Utc>, record: &impl Schedulable) -> Bucket {
    let TimeSlot { start, end } = record.slot();
    if end < now {
        Bucket::Past
    } else if start <= now && now <= end {
        match record.resolution() {
            Some(state) if state.is_resolved() => Bucket::Ongoing,
            Some(_) => Bucket::Past,
            None => Bucket::Ongoing,
        }
    } else {
        Bucket::Upcoming
    }
}

/// Records partitioned by [`classify`].
#[derive(Debug, Clone, Serialize)]
pub struct Buckets<T> {
    pub past: Vec<T>,
    pub ongoing: Vec<T>,
    pub upcoming: Vec<T>,
}

impl<T> Default for Buckets<T> {
    fn default() -> Self {
        Self {
            past: Vec::new(),
            ongoing: Vec::new(),
            upcoming: Vec::new(),
        }
    }
}

/// ## Summary
/// Partitions `records` into past/ongoing/upcoming relative to `now`,
/// preserving input order within each bucket.
pub fn bucketize<T, I>(now: DateTime<Utc>, records: I) -> Buckets<T>
where
    T: Schedulable,
    I: IntoIterator<Item = T>,
{
    let mut buckets = Buckets::default();
    for record in records {
        match classify(now, &record) {
            Bucket::Past => buckets.past.push(record),
            Bucket::Ongoing => buckets.ongoing.push(record),
            Bucket::Upcoming => buckets.upcoming.push(record),
        }
    }
    buckets
}

/// Inclusive Sunday-through-Saturday window in the UTC calendar.
///
/// Not a [`TimeSlot`]: both ends are inclusive, with the Saturday boundary
/// at 23:59:59.999.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WeekWindow {
    /// ## Summary
    /// The window of the week containing `now`: midnight UTC of the most
    /// recent Sunday through 23:59:59.999 UTC the following Saturday.
    #[must_use]
    pub fn containing(now: DateTime<Utc>) -> Self {
        let days_from_sunday = i64::from(now.weekday().num_days_from_sunday());
        let sunday = (now - TimeDelta::days(days_from_sunday)).date_naive();
        let start = sunday.and_time(NaiveTime::MIN).and_utc();
        let end = start + TimeDelta::days(7) - TimeDelta::milliseconds(1);
        Self { start, end }
    }

    #[must_use]
    pub fn contains(self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Count-only view of a coach's schedule, for dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub past: usize,
    pub ongoing: usize,
    pub upcoming: usize,
    pub this_week: usize,
}

/// ## Summary
/// Count variant of [`bucketize`]. Two deliberate differences from the
/// sequence variant:
///
/// - `ongoing` requires `Accepted` strictly; an in-window pending or
///   rejected record is counted in no bucket at all;
/// - `this_week` counts records whose start falls inside
///   [`WeekWindow::containing`]`(now)`, independently of bucketing, so one
///   record can contribute to both a bucket and the weekly count.
#[must_use]
pub fn dashboard_counts<'a, T, I>(now: DateTime<Utc>, records: I) -> DashboardCounts
where
    T: Schedulable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let week = WeekWindow::containing(now);
    let mut counts = DashboardCounts::default();
    for record in records {
        let TimeSlot { start, end } = record.slot();
        if week.contains(start) {
            counts.this_week += 1;
        }
        if end < now {
            counts.past += 1;
        } else if start <= now && now <= end {
            if record.resolution() == Some(ResolutionState::Accepted) {
                counts.ongoing += 1;
            }
        } else {
            counts.upcoming += 1;
        }
    }
    counts
}
