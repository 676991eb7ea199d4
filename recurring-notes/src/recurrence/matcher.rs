use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use super::Recurrence;

/// Where a schedule starts relative to the stored start date.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// The anchor is the day before the start date.
    #[default]
    PreviousDay,
    /// The anchor is the start date itself.
    StartDate,
}

impl AnchorPolicy {
    pub fn anchor(self, start_date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::PreviousDay => start_date.pred_opt(),
            Self::StartDate => Some(start_date),
        }
    }
}

/// Anything carrying a start date and a recurrence mode.
pub trait Schedule {
    /// `None` when the stored start date cannot be parsed.
    fn start_date(&self) -> Option<NaiveDate>;
    fn recurrence(&self) -> &Recurrence;
}

impl Recurrence {
    pub fn matches(&self, anchor: NaiveDate, query_date: NaiveDate) -> bool {
        if anchor > query_date {
            return false;
        }

        match self {
            Self::OneTime => anchor == query_date,
            Self::Daily => true,
            Self::Weekly => anchor.weekday() == query_date.weekday(),
            // no clamping: an anchor on the 31st skips shorter months
            Self::Monthly => anchor.day() == query_date.day(),
            Self::Unrecognized(_) => false,
        }
    }
}

pub fn is_active_on<S>(note: &S, query_date: NaiveDate, policy: AnchorPolicy) -> bool
where
    S: Schedule + ?Sized,
{
    note.start_date()
        .and_then(|start_date| policy.anchor(start_date))
        .is_some_and(|anchor| note.recurrence().matches(anchor, query_date))
}

/// Keeps the notes active on `query_date`, in their original order.
///
/// Without a query date the collection is returned untouched and the matcher is
/// never consulted.
pub fn active_notes_on<S: Schedule>(notes: Vec<S>, query_date: Option<NaiveDate>, policy: AnchorPolicy) -> Vec<S> {
    let Some(query_date) = query_date else {
        return notes;
    };

    notes
        .into_iter()
        .filter(|note| is_active_on(note, query_date, policy))
        .collect()
}

/// Days in `from..=to` on which at least one note is active, ascending.
pub fn active_dates_between<S: Schedule>(
    notes: &[S],
    from: NaiveDate,
    to: NaiveDate,
    policy: AnchorPolicy,
) -> Vec<NaiveDate> {
    from.iter_days()
        .take_while(|day| *day <= to)
        .filter(|day| notes.iter().any(|note| is_active_on(note, *day, policy)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::parse_date;

    #[derive(Debug, Clone, PartialEq)]
    struct TestNote {
        name: &'static str,
        start_date: &'static str,
        recurrence: Recurrence,
    }

    impl Schedule for TestNote {
        fn start_date(&self) -> Option<NaiveDate> {
            parse_date(self.start_date)
        }

        fn recurrence(&self) -> &Recurrence {
            &self.recurrence
        }
    }

    fn note(name: &'static str, start_date: &'static str, recurrence: &str) -> TestNote {
        TestNote {
            name,
            start_date,
            recurrence: Recurrence::from(recurrence),
        }
    }

    fn day(value: &str) -> NaiveDate {
        parse_date(value).unwrap()
    }

    fn active(note: &TestNote, query_date: &str) -> bool {
        is_active_on(note, day(query_date), AnchorPolicy::PreviousDay)
    }

    #[test]
    fn nothing_matches_before_anchor() {
        for recurrence in ["one-time", "daily", "weekly", "monthly"] {
            let note = note("n", "2024-03-10", recurrence);
            assert!(!active(&note, "2024-03-08"), "{recurrence}");
            assert!(!active(&note, "2024-02-09"), "{recurrence}");
            assert!(!active(&note, "2023-03-09"), "{recurrence}");
        }
    }

    #[test]
    fn one_time_matches_the_anchor_only() {
        let note = note("n", "2024-03-10", "one-time");

        assert!(active(&note, "2024-03-09"));
        assert!(!active(&note, "2024-03-10"));
        assert!(!active(&note, "2024-03-11"));
        assert!(!active(&note, "2025-03-09"));
    }

    #[test]
    fn daily_matches_every_day_from_anchor() {
        let note = note("n", "2024-03-10", "daily");

        assert!(active(&note, "2024-03-09"));
        assert!(active(&note, "2024-03-10"));
        assert!(active(&note, "2024-06-01"));
        assert!(active(&note, "2030-12-31"));
    }

    #[test]
    fn weekly_matches_same_weekday() {
        // anchor 2024-03-09 is a Saturday
        let note = note("n", "2024-03-10", "weekly");

        assert!(active(&note, "2024-03-09"));
        assert!(active(&note, "2024-03-16"));
        assert!(active(&note, "2024-11-30"));
        assert!(!active(&note, "2024-03-10"));
        assert!(!active(&note, "2024-03-12"));
        assert!(!active(&note, "2024-03-02"));
    }

    #[test]
    fn monthly_matches_same_day_of_month() {
        let note = note("n", "2024-03-10", "monthly");

        assert!(active(&note, "2024-03-09"));
        assert!(active(&note, "2024-04-09"));
        assert!(active(&note, "2025-01-09"));
        assert!(!active(&note, "2024-04-10"));
    }

    #[test]
    fn monthly_skips_short_months() {
        // anchor 2024-01-31
        let note = note("n", "2024-02-01", "monthly");

        assert!(active(&note, "2024-01-31"));
        assert!(!active(&note, "2024-02-29"));
        assert!(active(&note, "2024-03-31"));
        assert!(!active(&note, "2024-04-30"));
        assert!(!active(&note, "2024-05-01"));
    }

    #[test]
    fn unknown_recurrence_never_matches() {
        let note = note("n", "2024-03-10", "yearly");

        for query_date in ["2024-03-09", "2024-03-10", "2025-03-09", "2025-03-10"] {
            assert!(!active(&note, query_date));
        }
    }

    #[test]
    fn malformed_start_date_never_matches() {
        let note = note("n", "10/03/2024", "daily");

        for query_date in ["2024-03-09", "2024-03-10", "2099-01-01"] {
            assert!(!active(&note, query_date));
        }
    }

    #[test]
    fn anchor_underflow_has_no_anchor() {
        assert_eq!(AnchorPolicy::PreviousDay.anchor(NaiveDate::MIN), None);
        assert_eq!(AnchorPolicy::StartDate.anchor(NaiveDate::MIN), Some(NaiveDate::MIN));
    }

    #[test]
    fn start_date_policy_anchors_on_start_date() {
        let one_time = note("n", "2024-03-10", "one-time");
        let weekly = note("w", "2024-03-10", "weekly");
        let policy = AnchorPolicy::StartDate;

        assert!(is_active_on(&one_time, day("2024-03-10"), policy));
        assert!(!is_active_on(&one_time, day("2024-03-09"), policy));
        assert!(is_active_on(&weekly, day("2024-03-17"), policy));
        assert!(!is_active_on(&weekly, day("2024-03-16"), policy));
    }

    #[test]
    fn no_query_date_returns_everything() {
        let notes = vec![
            note("a", "2024-03-10", "one-time"),
            note("b", "garbage", "daily"),
            note("c", "2024-03-10", "yearly"),
        ];

        let result = active_notes_on(notes.clone(), None, AnchorPolicy::PreviousDay);
        assert_eq!(result, notes);
    }

    #[test]
    fn filter_is_stable_and_idempotent() {
        let notes = vec![
            note("a", "2024-03-01", "daily"),
            note("b", "2024-03-10", "one-time"),
            note("c", "garbage", "daily"),
            note("d", "2024-02-10", "monthly"),
            note("e", "2024-03-10", "weekly"),
            note("f", "2024-03-20", "daily"),
        ];
        let query_date = Some(day("2024-03-09"));

        let once = active_notes_on(notes, query_date, AnchorPolicy::PreviousDay);
        let names = once.iter().map(|n| n.name).collect::<Vec<_>>();
        assert_eq!(names, ["a", "b", "d", "e"]);

        let twice = active_notes_on(once.clone(), query_date, AnchorPolicy::PreviousDay);
        assert_eq!(twice, once);
    }

    #[test]
    fn active_dates_agree_with_filter() {
        let notes = vec![note("a", "2024-03-10", "weekly"), note("b", "2024-03-21", "one-time")];
        let (from, to) = (day("2024-03-01"), day("2024-03-31"));

        let dates = active_dates_between(&notes, from, to, AnchorPolicy::PreviousDay);
        assert_eq!(
            dates,
            ["2024-03-09", "2024-03-16", "2024-03-20", "2024-03-23", "2024-03-30"].map(day)
        );

        let expected = from
            .iter_days()
            .take_while(|d| *d <= to)
            .filter(|d| !active_notes_on(notes.clone(), Some(*d), AnchorPolicy::PreviousDay).is_empty())
            .collect::<Vec<_>>();
        assert_eq!(dates, expected);
    }

    #[test]
    fn active_dates_empty_range() {
        let notes = vec![note("a", "2024-03-10", "daily")];
        assert!(active_dates_between(&notes, day("2024-03-31"), day("2024-03-01"), AnchorPolicy::PreviousDay).is_empty());
    }
}
