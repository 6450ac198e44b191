//! The filter, search, sort and paginate stages.
//!
//! Each stage takes the records by value and returns the survivors in
//! order. Pass references (`Vec<&T>`) to run a view without cloning rows.

use std::cmp::Ordering;

use chrono::{NaiveDateTime, Weekday};

use crate::calculation::TimeWindow;
use crate::models::{FilterSpec, WindowKind};

use super::query::{PageSpec, SortDirection, SortSpec, View, ViewQuery};
use super::record::{FieldValue, Record};

/// Keeps the records whose timestamp falls in the window.
///
/// [`WindowKind::All`] returns the input untouched. Other windows are
/// resolved against `now` once, so every record is judged against the same
/// day and week.
pub fn filter_by_window<T: Record>(
    records: Vec<T>,
    filter: &FilterSpec,
    now: NaiveDateTime,
    week_start: Weekday,
) -> Vec<T> {
    if filter.window == WindowKind::All {
        return records;
    }

    let window = TimeWindow::resolve(filter, now, week_start);
    records
        .into_iter()
        .filter(|record| window.matches(record.timestamp()))
        .collect()
}

/// Keeps the records whose `field`, as text, contains `needle`.
///
/// The match is case-sensitive. An empty needle keeps everything; a record
/// missing the field never matches a non-empty needle.
pub fn filter_by_substring<T: Record>(records: Vec<T>, field: &str, needle: &str) -> Vec<T> {
    if needle.is_empty() {
        return records;
    }

    records
        .into_iter()
        .filter(|record| {
            record
                .field(field)
                .search_text()
                .is_some_and(|text| text.contains(needle))
        })
        .collect()
}

fn compare_values(a: &FieldValue, b: &FieldValue, direction: SortDirection) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match direction {
            SortDirection::Asc => a.cmp_present(b),
            SortDirection::Desc => b.cmp_present(a),
        },
    }
}

/// Sorts the records on one field.
///
/// The sort is stable. Records missing the field go last in either
/// direction.
pub fn sort_by<T: Record>(records: Vec<T>, sort: &SortSpec) -> Vec<T> {
    let mut keyed: Vec<(FieldValue, T)> = records
        .into_iter()
        .map(|record| (record.field(&sort.field), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_values(a, b, sort.direction));
    keyed.into_iter().map(|(_, record)| record).collect()
}

/// Returns one page of the records.
///
/// A zero page size or an index past the end yields an empty page; the
/// last page may be short.
pub fn paginate<T>(records: Vec<T>, page: &PageSpec) -> Vec<T> {
    if page.size == 0 {
        return Vec::new();
    }

    let start = page.index.saturating_mul(page.size);
    records.into_iter().skip(start).take(page.size).collect()
}

/// Runs a query: window, then search, then sort, then paginate.
///
/// # Example
///
/// ```
/// use attendance_engine::pipeline::{run, FieldValue, Record, SortSpec, ViewQuery};
/// use chrono::{NaiveDateTime, Weekday};
///
/// struct Name(&'static str);
///
/// impl Record for Name {
///     fn timestamp(&self) -> Option<NaiveDateTime> {
///         None
///     }
///
///     fn field(&self, _name: &str) -> FieldValue {
///         FieldValue::Text(self.0.to_string())
///     }
/// }
///
/// let now = NaiveDateTime::parse_from_str("2024-03-15 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let query = ViewQuery::new(SortSpec::asc("name"), 2);
/// let view = run(vec![Name("carol"), Name("alice"), Name("Bob")], &query, now, Weekday::Sun);
///
/// assert_eq!(view.total, 3);
/// let names: Vec<&str> = view.rows.iter().map(|n| n.0).collect();
/// assert_eq!(names, vec!["alice", "Bob"]);
/// ```
pub fn run<T: Record>(
    records: Vec<T>,
    query: &ViewQuery,
    now: NaiveDateTime,
    week_start: Weekday,
) -> View<T> {
    let rows = filter_by_window(records, query.filter(), now, week_start);
    let rows = filter_by_substring(rows, &query.search().field, &query.search().needle);
    let rows = sort_by(rows, query.sort());
    let total = rows.len();
    let page = query.page();

    View {
        rows: paginate(rows, &page),
        total,
        page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SearchSpec;
    use rust_decimal::Decimal;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: &'static str,
        name: Option<&'static str>,
        score: Option<i64>,
        at: Option<NaiveDateTime>,
    }

    impl Record for Item {
        fn timestamp(&self) -> Option<NaiveDateTime> {
            self.at
        }

        fn field(&self, name: &str) -> FieldValue {
            match name {
                "id" => FieldValue::Text(self.id.to_string()),
                "name" => FieldValue::from(self.name.map(str::to_string)),
                "score" => FieldValue::from(self.score.map(Decimal::from)),
                _ => FieldValue::Missing,
            }
        }
    }

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn item(id: &'static str, name: Option<&'static str>, score: Option<i64>, at: Option<&str>) -> Item {
        Item {
            id,
            name,
            score,
            at: at.map(make_datetime),
        }
    }

    fn ids<T: std::borrow::Borrow<Item>>(items: &[T]) -> Vec<&'static str> {
        items.iter().map(|i| i.borrow().id).collect()
    }

    fn sample() -> Vec<Item> {
        vec![
            item("1", Some("carol"), Some(10), Some("2024-03-15 09:00:00")),
            item("2", Some("alice"), Some(9), Some("2024-03-14 09:00:00")),
            item("3", None, Some(30), Some("2024-02-10 09:00:00")),
            item("4", Some("Bob"), None, None),
            item("5", Some("bob"), Some(9), Some("2023-03-15 09:00:00")),
        ]
    }

    fn now() -> NaiveDateTime {
        make_datetime("2024-03-15 12:00:00")
    }

    #[test]
    fn test_window_all_is_identity() {
        let filtered = filter_by_window(sample(), &FilterSpec::all(), now(), Weekday::Sun);
        assert_eq!(filtered, sample());
    }

    #[test]
    fn test_window_today() {
        let filtered = filter_by_window(sample(), &FilterSpec::today(), now(), Weekday::Sun);
        assert_eq!(ids(&filtered), vec!["1"]);
    }

    #[test]
    fn test_window_this_week() {
        // 2024-03-15 is a Friday; the week runs Sun 10th to Sat 16th.
        let filtered = filter_by_window(sample(), &FilterSpec::this_week(), now(), Weekday::Sun);
        assert_eq!(ids(&filtered), vec!["1", "2"]);
    }

    #[test]
    fn test_window_specific_month_is_zero_based() {
        let filtered = filter_by_window(sample(), &FilterSpec::month(2, 2024), now(), Weekday::Sun);
        assert_eq!(ids(&filtered), vec!["1", "2"]);

        let filtered = filter_by_window(sample(), &FilterSpec::month(1, 2024), now(), Weekday::Sun);
        assert_eq!(ids(&filtered), vec!["3"]);
    }

    #[test]
    fn test_window_month_without_year_matches_any_year() {
        let filter = FilterSpec {
            window: WindowKind::SpecificMonth,
            month: Some(2),
            year: None,
        };
        let filtered = filter_by_window(sample(), &filter, now(), Weekday::Sun);
        assert_eq!(ids(&filtered), vec!["1", "2", "5"]);
    }

    #[test]
    fn test_window_out_of_range_month_matches_nothing() {
        let filtered = filter_by_window(sample(), &FilterSpec::month(12, 2024), now(), Weekday::Sun);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_window_year_ignores_leftover_month() {
        let filter = FilterSpec {
            window: WindowKind::SpecificYear,
            month: Some(1),
            year: Some(2024),
        };
        let filtered = filter_by_window(sample(), &filter, now(), Weekday::Sun);
        assert_eq!(ids(&filtered), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_substring_is_case_sensitive() {
        let filtered = filter_by_substring(sample(), "name", "ob");
        assert_eq!(ids(&filtered), vec!["4", "5"]);

        let filtered = filter_by_substring(sample(), "name", "B");
        assert_eq!(ids(&filtered), vec!["4"]);
    }

    #[test]
    fn test_substring_on_numbers() {
        let filtered = filter_by_substring(sample(), "score", "0");
        assert_eq!(ids(&filtered), vec!["1", "3"]);
    }

    #[test]
    fn test_empty_needle_is_identity() {
        assert_eq!(filter_by_substring(sample(), "name", ""), sample());
    }

    #[test]
    fn test_missing_field_never_matches() {
        assert!(filter_by_substring(sample(), "nope", "a").is_empty());
    }

    #[test]
    fn test_sort_numeric_ascending_with_missing_last() {
        let sorted = sort_by(sample(), &SortSpec::asc("score"));
        assert_eq!(ids(&sorted), vec!["2", "5", "1", "3", "4"]);
    }

    #[test]
    fn test_sort_numeric_descending_with_missing_last() {
        let sorted = sort_by(sample(), &SortSpec::desc("score"));
        // Ties (2 and 5) keep input order.
        assert_eq!(ids(&sorted), vec!["3", "1", "2", "5", "4"]);
    }

    #[test]
    fn test_sort_text_locale_style() {
        let sorted = sort_by(sample(), &SortSpec::asc("name"));
        assert_eq!(ids(&sorted), vec!["2", "4", "5", "1", "3"]);

        let sorted = sort_by(sample(), &SortSpec::desc("name"));
        assert_eq!(ids(&sorted), vec!["1", "5", "4", "2", "3"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        for spec in [SortSpec::asc("score"), SortSpec::desc("name"), SortSpec::asc("id")] {
            let once = sort_by(sample(), &spec);
            let twice = sort_by(once.clone(), &spec);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_sort_by_references() {
        let items = sample();
        let refs: Vec<&Item> = items.iter().collect();
        let sorted = sort_by(refs, &SortSpec::asc("score"));
        assert_eq!(ids(&sorted), vec!["2", "5", "1", "3", "4"]);
    }

    #[test]
    fn test_paginate() {
        let records: Vec<u32> = (0..12).collect();
        assert_eq!(paginate(records.clone(), &PageSpec { index: 0, size: 5 }), vec![0, 1, 2, 3, 4]);
        assert_eq!(paginate(records.clone(), &PageSpec { index: 2, size: 5 }), vec![10, 11]);
        assert!(paginate(records.clone(), &PageSpec { index: 3, size: 5 }).is_empty());
        assert!(paginate(records.clone(), &PageSpec { index: 0, size: 0 }).is_empty());
        assert!(paginate(records, &PageSpec { index: usize::MAX, size: 5 }).is_empty());
    }

    #[test]
    fn test_pages_reconstruct_input() {
        let records: Vec<u32> = (0..23).collect();
        let mut rebuilt = Vec::new();
        let mut index = 0;
        loop {
            let page = paginate(records.clone(), &PageSpec { index, size: 4 });
            if page.is_empty() {
                break;
            }
            rebuilt.extend(page);
            index += 1;
        }
        assert_eq!(rebuilt, records);
    }

    #[test]
    fn test_run_applies_stages_in_order() {
        let mut query = ViewQuery::new(SortSpec::desc("score"), 1);
        query.set_filter(FilterSpec::year(2024));
        query.set_search(SearchSpec::new("id", ""));

        let view = run(sample(), &query, now(), Weekday::Sun);
        assert_eq!(view.total, 3);
        assert_eq!(ids(&view.rows), vec!["3"]);

        query.set_page_index(2);
        let view = run(sample(), &query, now(), Weekday::Sun);
        assert_eq!(ids(&view.rows), vec!["2"]);
        assert_eq!(view.page_count(), 3);
    }

    #[test]
    fn test_run_search_counts_before_paging() {
        let mut query = ViewQuery::new(SortSpec::asc("id"), 1);
        query.set_search(SearchSpec::new("name", "bo"));

        let view = run(sample(), &query, now(), Weekday::Sun);
        assert_eq!(view.total, 1);
        assert_eq!(ids(&view.rows), vec!["5"]);
    }
}
