use chrono::Datelike;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::{Attendance, AttendanceStatus};

/// Per-user counts for one calendar month, derived on demand. `absent` is
/// inferred by subtraction because no record exists for a day the employee
/// never checked in.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlySummary {
    #[schema(example = 8)]
    pub month: u32,

    #[schema(example = 2026)]
    pub year: i32,

    #[schema(example = 18)]
    pub present: u32,

    #[schema(example = 2)]
    pub late: u32,

    #[schema(example = 1)]
    pub leave: u32,

    #[schema(example = 5)]
    pub absent: u32,

    /// The records behind the counts, for UI drill-down.
    pub records: Vec<Attendance>,
}

/// Pure aggregation over a user's records. `expected_working_days` is a
/// policy constant supplied by the caller, not derived from the calendar.
pub fn summarize(
    records: &[Attendance],
    month: u32,
    year: i32,
    expected_working_days: u32,
) -> MonthlySummary {
    let records: Vec<Attendance> = records
        .iter()
        .filter(|r| r.date.month() == month && r.date.year() == year)
        .cloned()
        .collect();

    let count_of = |status: AttendanceStatus| -> u32 {
        records.iter().filter(|r| r.status == status).count() as u32
    };

    let present = count_of(AttendanceStatus::Present);
    let late = count_of(AttendanceStatus::Late);
    let leave = count_of(AttendanceStatus::Leave);
    let absent = expected_working_days.saturating_sub(present + late + leave);

    MonthlySummary {
        month,
        year,
        present,
        late,
        leave,
        absent,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::DressingCode;
    use chrono::NaiveDate;

    fn record(year: i32, month: u32, day: u32, status: AttendanceStatus) -> Attendance {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        Attendance {
            id: day as u64,
            user_id: 42,
            date,
            check_in: date.and_hms_opt(9, 0, 0),
            check_out: None,
            status,
            note: None,
            dressing: DressingCode::None,
        }
    }

    #[test]
    fn test_absence_inferred_by_subtraction() {
        let records = vec![
            record(2026, 8, 3, AttendanceStatus::Present),
            record(2026, 8, 4, AttendanceStatus::Present),
            record(2026, 8, 5, AttendanceStatus::Present),
            record(2026, 8, 6, AttendanceStatus::Late),
            record(2026, 8, 7, AttendanceStatus::Leave),
            record(2026, 8, 10, AttendanceStatus::Leave),
        ];
        let summary = summarize(&records, 8, 2026, 26);
        assert_eq!(summary.present, 3);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.leave, 2);
        assert_eq!(summary.absent, 20);
    }

    #[test]
    fn test_counts_plus_absent_cover_expected_days() {
        let records = vec![
            record(2026, 8, 3, AttendanceStatus::Present),
            record(2026, 8, 4, AttendanceStatus::Late),
            record(2026, 8, 5, AttendanceStatus::Leave),
        ];
        let summary = summarize(&records, 8, 2026, 26);
        assert_eq!(
            summary.present + summary.late + summary.leave + summary.absent,
            26
        );
    }

    #[test]
    fn test_absent_clamped_at_zero() {
        let records: Vec<Attendance> = (1..=28)
            .map(|day| record(2026, 8, day, AttendanceStatus::Present))
            .collect();
        let summary = summarize(&records, 8, 2026, 26);
        assert_eq!(summary.present, 28);
        assert_eq!(summary.absent, 0);
    }

    #[test]
    fn test_other_months_filtered_out() {
        let records = vec![
            record(2026, 7, 30, AttendanceStatus::Present),
            record(2026, 8, 3, AttendanceStatus::Present),
            record(2025, 8, 3, AttendanceStatus::Present),
        ];
        let summary = summarize(&records, 8, 2026, 26);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.records[0].date, NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
    }

    #[test]
    fn test_half_day_does_not_inflate_presence() {
        let records = vec![
            record(2026, 8, 3, AttendanceStatus::HalfDay),
            record(2026, 8, 4, AttendanceStatus::Present),
        ];
        let summary = summarize(&records, 8, 2026, 26);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.records.len(), 2);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let records = vec![
            record(2026, 8, 3, AttendanceStatus::Present),
            record(2026, 8, 4, AttendanceStatus::Late),
        ];
        let first = summarize(&records, 8, 2026, 26);
        let second = summarize(&records, 8, 2026, 26);
        assert_eq!(first.present, second.present);
        assert_eq!(first.late, second.late);
        assert_eq!(first.leave, second.leave);
        assert_eq!(first.absent, second.absent);
    }
}
