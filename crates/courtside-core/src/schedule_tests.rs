//! Unit tests for the scheduling core: overlap detection, temporal
//! bucketing, and the weekly dashboard counts.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc, Weekday};

use crate::schedule::{
    Bucket, Buckets, DashboardCounts, ResolutionState, Schedulable, TimeSlot, WeekWindow,
    bucketize, classify, conflicts, dashboard_counts, first_conflict,
};

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn slot(start: i64, end: i64) -> TimeSlot {
    TimeSlot::new(at(start), at(end))
}

struct Record {
    slot: TimeSlot,
    resolution: Option<ResolutionState>,
}

impl Schedulable for Record {
    fn slot(&self) -> TimeSlot {
        self.slot
    }

    fn resolution(&self) -> Option<ResolutionState> {
        self.resolution
    }
}

fn session(start: i64, end: i64, state: ResolutionState) -> Record {
    Record {
        slot: slot(start, end),
        resolution: Some(state),
    }
}

fn tournament(start: i64, end: i64) -> Record {
    Record {
        slot: slot(start, end),
        resolution: None,
    }
}

#[test_log::test]
fn overlap_is_symmetric() {
    let pairs = [
        (slot(10, 20), slot(15, 25)),
        (slot(10, 20), slot(20, 30)),
        (slot(10, 30), slot(15, 20)),
        (slot(0, 5), slot(50, 60)),
    ];
    for (a, b) in pairs {
        assert_eq!(a.overlaps(b), b.overlaps(a), "{a:?} vs {b:?}");
    }
}

#[test]
fn touching_endpoints_do_not_overlap() {
    assert!(!slot(10, 20).overlaps(slot(20, 30)));
    assert!(!slot(20, 30).overlaps(slot(10, 20)));
}

#[test]
fn strict_overlap_conflicts() {
    assert!(slot(10, 20).overlaps(slot(15, 25)));
}

#[test]
fn containment_conflicts_in_either_order() {
    assert!(slot(10, 30).overlaps(slot(15, 20)));
    assert!(slot(15, 20).overlaps(slot(10, 30)));
}

#[test]
fn empty_existing_set_never_conflicts() {
    let existing: Vec<Record> = Vec::new();
    assert!(!conflicts(slot(10, 20), &existing));
}

#[test]
fn first_conflict_returns_earliest_match() {
    let existing = vec![
        tournament(0, 5),
        tournament(12, 18),
        tournament(14, 22),
    ];
    let hit = first_conflict(slot(10, 20), &existing).unwrap();
    assert_eq!(hit.slot, slot(12, 18));
}

#[test]
fn editing_without_excluding_self_reports_a_false_conflict() {
    // A record always overlaps itself, so callers editing in place must
    // drop the edited record from the candidate set before checking.
    let existing = vec![tournament(10, 20)];
    assert!(conflicts(slot(10, 20), &existing));
}

#[test]
fn ended_record_is_past() {
    assert_eq!(classify(at(100), &session(10, 50, ResolutionState::Pending)), Bucket::Past);
    assert_eq!(classify(at(100), &tournament(10, 50)), Bucket::Past);
}

#[test]
fn in_window_accepted_session_is_ongoing() {
    assert_eq!(
        classify(at(100), &session(50, 150, ResolutionState::Accepted)),
        Bucket::Ongoing
    );
}

#[test]
fn in_window_rejected_session_is_ongoing() {
    // Resolved either way counts as ongoing in the sequence variant.
    assert_eq!(
        classify(at(100), &session(50, 150, ResolutionState::Rejected)),
        Bucket::Ongoing
    );
}

#[test]
fn in_window_pending_session_is_demoted_to_past() {
    assert_eq!(
        classify(at(100), &session(50, 150, ResolutionState::Pending)),
        Bucket::Past
    );
}

#[test]
fn in_window_tournament_is_ongoing_unconditionally() {
    assert_eq!(classify(at(100), &tournament(50, 150)), Bucket::Ongoing);
}

#[test]
fn future_record_is_upcoming() {
    assert_eq!(classify(at(100), &tournament(200, 300)), Bucket::Upcoming);
}

#[test]
fn window_boundaries_are_inclusive() {
    // end == now is still in-window (rule 1 is a strict comparison), as is
    // start == now.
    assert_eq!(
        classify(at(100), &session(50, 100, ResolutionState::Accepted)),
        Bucket::Ongoing
    );
    assert_eq!(
        classify(at(100), &session(100, 150, ResolutionState::Accepted)),
        Bucket::Ongoing
    );
}

#[test]
fn bucketize_partitions_and_preserves_order() {
    let records = vec![
        tournament(10, 50),
        tournament(200, 300),
        tournament(50, 150),
        tournament(20, 60),
        tournament(400, 500),
    ];
    let Buckets {
        past,
        ongoing,
        upcoming,
    } = bucketize(at(100), records);

    assert_eq!(past.iter().map(|r| r.slot).collect::<Vec<_>>(), vec![slot(10, 50), slot(20, 60)]);
    assert_eq!(ongoing.len(), 1);
    assert_eq!(
        upcoming.iter().map(|r| r.slot).collect::<Vec<_>>(),
        vec![slot(200, 300), slot(400, 500)]
    );
}

#[test]
fn bucketize_is_idempotent_for_identical_inputs() {
    let make = || {
        vec![
            session(10, 50, ResolutionState::Pending),
            session(50, 150, ResolutionState::Accepted),
            session(200, 300, ResolutionState::Pending),
        ]
    };
    let first = bucketize(at(100), make());
    let second = bucketize(at(100), make());

    let shape = |b: &Buckets<Record>| {
        (
            b.past.iter().map(|r| r.slot).collect::<Vec<_>>(),
            b.ongoing.iter().map(|r| r.slot).collect::<Vec<_>>(),
            b.upcoming.iter().map(|r| r.slot).collect::<Vec<_>>(),
        )
    };
    assert_eq!(shape(&first), shape(&second));
}

#[test]
fn week_window_runs_sunday_through_saturday_utc() {
    // 2025-01-08 is a Wednesday; its week is Sunday 2025-01-05 through
    // Saturday 2025-01-11.
    let now = NaiveDate::from_ymd_opt(2025, 1, 8)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap()
        .and_utc();
    assert_eq!(now.weekday(), Weekday::Wed);

    let week = WeekWindow::containing(now);
    assert_eq!(
        week.start,
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap().and_hms_opt(0, 0, 0).unwrap().and_utc()
    );
    assert_eq!(
        week.end,
        NaiveDate::from_ymd_opt(2025, 1, 11)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap()
            .and_utc()
    );
}

#[test]
fn week_window_on_a_sunday_starts_that_day() {
    let now = NaiveDate::from_ymd_opt(2025, 1, 5)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
        .and_utc();
    assert_eq!(now.weekday(), Weekday::Sun);
    assert_eq!(WeekWindow::containing(now).start, now - TimeDelta::hours(8));
}

#[test]
fn weekly_count_boundary_is_millisecond_exact() {
    let now = NaiveDate::from_ymd_opt(2025, 1, 8)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc();
    let week = WeekWindow::containing(now);

    let starting_at = |start: DateTime<Utc>| Record {
        slot: TimeSlot::new(start, start + TimeDelta::hours(1)),
        resolution: Some(ResolutionState::Accepted),
    };

    let records = vec![
        starting_at(week.start),
        starting_at(week.start - TimeDelta::milliseconds(1)),
        starting_at(week.end),
        starting_at(week.end + TimeDelta::milliseconds(1)),
    ];
    let counts = dashboard_counts(now, &records);
    assert_eq!(counts.this_week, 2);
}

#[test]
fn dashboard_ongoing_requires_accepted_strictly() {
    let records = vec![
        session(50, 150, ResolutionState::Accepted),
        session(50, 150, ResolutionState::Rejected),
        session(50, 150, ResolutionState::Pending),
    ];
    let counts = dashboard_counts(at(100), &records);

    // Rejected and pending in-window sessions land in no bucket at all.
    assert_eq!(counts.ongoing, 1);
    assert_eq!(counts.past, 0);
    assert_eq!(counts.upcoming, 0);
}

#[test]
fn dashboard_record_counts_toward_bucket_and_week_independently() {
    let now = NaiveDate::from_ymd_opt(2025, 1, 8)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc();

    // Started earlier this week and already over: past AND this_week.
    let record = Record {
        slot: TimeSlot::new(now - TimeDelta::days(2), now - TimeDelta::days(1)),
        resolution: Some(ResolutionState::Accepted),
    };
    let counts = dashboard_counts(now, std::slice::from_ref(&record));
    assert_eq!(
        counts,
        DashboardCounts {
            past: 1,
            ongoing: 0,
            upcoming: 0,
            this_week: 1,
        }
    );
}
