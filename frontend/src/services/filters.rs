//! Derived views over an attendance snapshot.
//!
//! Pure functions: same snapshot and selector in, same result out.

use chrono::NaiveDate;
use shared::{AttendanceRecord, AttendanceStatus};

use crate::services::date_utils;

/// Present/absent tallies for one calendar day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyStats {
    pub present_count: usize,
    pub absent_count: usize,
}

impl DailyStats {
    pub fn total(&self) -> usize {
        self.present_count + self.absent_count
    }
}

/// Records belonging to `employee_id`, in snapshot order.
/// An empty selector keeps every record.
pub fn filter_by_employee<'a>(
    snapshot: &'a [AttendanceRecord],
    employee_id: &str,
) -> Vec<&'a AttendanceRecord> {
    if employee_id.is_empty() {
        return snapshot.iter().collect();
    }

    snapshot
        .iter()
        .filter(|record| record.employee_id == employee_id)
        .collect()
}

/// Tally statuses of the records dated `day`. Unrecognized statuses count toward neither side.
pub fn daily_stats(snapshot: &[AttendanceRecord], day: NaiveDate) -> DailyStats {
    snapshot
        .iter()
        .filter(|record| record.date == day)
        .fold(DailyStats::default(), |mut stats, record| {
            match record.status {
                AttendanceStatus::Present => stats.present_count += 1,
                AttendanceStatus::Absent => stats.absent_count += 1,
                AttendanceStatus::Unrecognized => {}
            }
            stats
        })
}

/// `daily_stats` for the client's local date
pub fn today_stats(snapshot: &[AttendanceRecord]) -> DailyStats {
    daily_stats(snapshot, date_utils::today())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, employee_id: &str, date: NaiveDate, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            date,
            status,
            created_at: None,
            employee_name: None,
            employee_department: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn sample() -> Vec<AttendanceRecord> {
        vec![
            record("1", "EMP001", day(14), AttendanceStatus::Present),
            record("2", "EMP002", day(14), AttendanceStatus::Absent),
            record("3", "EMP001", day(13), AttendanceStatus::Absent),
            record("4", "EMP003", day(14), AttendanceStatus::Present),
            record("5", "EMP001", day(12), AttendanceStatus::Present),
        ]
    }

    #[test]
    fn test_empty_selector_returns_everything_in_order() {
        let snapshot = sample();
        let filtered = filter_by_employee(&snapshot, "");
        let ids: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_selector_keeps_only_matching_records_in_order() {
        let snapshot = sample();
        let filtered = filter_by_employee(&snapshot, "EMP001");
        let ids: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "5"]);

        assert!(filter_by_employee(&snapshot, "EMP999").is_empty());
        // Exact match only
        assert!(filter_by_employee(&snapshot, "EMP00").is_empty());
    }

    #[test]
    fn test_daily_stats_three_present_two_absent() {
        let today = day(14);
        let yesterday = day(13);
        let snapshot = vec![
            record("1", "A", today, AttendanceStatus::Present),
            record("2", "B", today, AttendanceStatus::Present),
            record("3", "C", today, AttendanceStatus::Present),
            record("4", "D", today, AttendanceStatus::Absent),
            record("5", "E", today, AttendanceStatus::Absent),
            record("6", "A", yesterday, AttendanceStatus::Present),
            record("7", "B", yesterday, AttendanceStatus::Absent),
        ];

        let stats = daily_stats(&snapshot, today);
        assert_eq!(
            stats,
            DailyStats {
                present_count: 3,
                absent_count: 2
            }
        );
        assert_eq!(stats.total(), 5);
    }

    #[test]
    fn test_unrecognized_status_is_not_counted() {
        let snapshot = vec![
            record("1", "A", day(14), AttendanceStatus::Present),
            record("2", "B", day(14), AttendanceStatus::Unrecognized),
        ];
        let stats = daily_stats(&snapshot, day(14));
        assert_eq!(stats.present_count, 1);
        assert_eq!(stats.absent_count, 0);
    }

    #[test]
    fn test_duplicate_rows_for_same_day_are_all_counted() {
        let snapshot = vec![
            record("1", "A", day(14), AttendanceStatus::Present),
            record("2", "A", day(14), AttendanceStatus::Present),
        ];
        assert_eq!(daily_stats(&snapshot, day(14)).present_count, 2);
    }

    #[test]
    fn test_empty_snapshot() {
        assert_eq!(daily_stats(&[], day(14)), DailyStats::default());
        assert!(filter_by_employee(&[], "EMP001").is_empty());
    }
}
