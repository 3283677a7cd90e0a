use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::error::ApiError;
use crate::model::attendance::{Attendance, AttendanceStatus};

/// Lateness rule supplied by the caller: the employee's scheduled entry time
/// plus the configured grace window. The core never hardcodes either value.
#[derive(Debug, Clone, Copy)]
pub struct LatenessPolicy {
    pub entry_time: NaiveTime,
    pub grace: Duration,
}

impl LatenessPolicy {
    /// A check-in after `entry_time + grace` is late; anything up to and
    /// including the deadline counts as present.
    pub fn classify(&self, at: NaiveDateTime) -> AttendanceStatus {
        let (deadline, wrapped) = self.entry_time.overflowing_add_signed(self.grace);
        if wrapped == 0 && at.time() > deadline {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        }
    }
}

/// Lifecycle of one user's attendance for one calendar day.
/// `NoRecord -> CheckedIn -> CheckedOut`, with `CheckedOut` terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    NoRecord,
    CheckedIn { at: NaiveDateTime },
    CheckedOut,
}

/// What a successful check-in should write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInEffect {
    pub at: NaiveDateTime,
    pub status: AttendanceStatus,
}

/// What a successful check-out should write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutEffect {
    pub at: NaiveDateTime,
}

impl DayState {
    /// Derive the state from today's stored row, if any.
    pub fn of(record: Option<&Attendance>) -> Self {
        match record {
            None => DayState::NoRecord,
            Some(row) if row.check_out.is_some() => DayState::CheckedOut,
            Some(row) => DayState::CheckedIn {
                at: row
                    .check_in
                    .unwrap_or_else(|| row.date.and_time(NaiveTime::MIN)),
            },
        }
    }

    /// First action of the day creates the record; any existing record,
    /// open or closed, rejects without mutation.
    pub fn check_in(
        self,
        at: NaiveDateTime,
        policy: &LatenessPolicy,
    ) -> Result<CheckInEffect, ApiError> {
        match self {
            DayState::NoRecord => Ok(CheckInEffect {
                at,
                status: policy.classify(at),
            }),
            DayState::CheckedIn { .. } | DayState::CheckedOut => Err(ApiError::AlreadyCheckedIn),
        }
    }

    /// Closes an open day. Check-out must not precede check-in.
    pub fn check_out(self, at: NaiveDateTime) -> Result<CheckOutEffect, ApiError> {
        match self {
            DayState::NoRecord => Err(ApiError::NoCheckInFound),
            DayState::CheckedOut => Err(ApiError::AlreadyCheckedOut),
            DayState::CheckedIn { at: checked_in } => {
                if at < checked_in {
                    Err(ApiError::InvalidTimeOrder)
                } else {
                    Ok(CheckOutEffect { at })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::DressingCode;
    use chrono::NaiveDate;

    fn policy() -> LatenessPolicy {
        LatenessPolicy {
            entry_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            grace: Duration::minutes(10),
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 6)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn open_row(check_in: NaiveDateTime) -> Attendance {
        Attendance {
            id: 1,
            user_id: 42,
            date: check_in.date(),
            check_in: Some(check_in),
            check_out: None,
            status: AttendanceStatus::Present,
            note: None,
            dressing: DressingCode::None,
        }
    }

    #[test]
    fn test_check_in_within_grace_is_present() {
        let effect = DayState::NoRecord.check_in(at(9, 5), &policy()).unwrap();
        assert_eq!(effect.status, AttendanceStatus::Present);
        assert_eq!(effect.at, at(9, 5));
    }

    #[test]
    fn test_check_in_past_grace_is_late() {
        let effect = DayState::NoRecord.check_in(at(9, 15), &policy()).unwrap();
        assert_eq!(effect.status, AttendanceStatus::Late);
    }

    #[test]
    fn test_grace_deadline_is_inclusive() {
        // 09:10 sharp with a 10-minute grace is still on time.
        let effect = DayState::NoRecord.check_in(at(9, 10), &policy()).unwrap();
        assert_eq!(effect.status, AttendanceStatus::Present);
    }

    #[test]
    fn test_second_check_in_rejected() {
        let state = DayState::of(Some(&open_row(at(9, 2))));
        assert_eq!(state.check_in(at(10, 0), &policy()), Err(ApiError::AlreadyCheckedIn));
    }

    #[test]
    fn test_check_in_after_checkout_rejected() {
        let mut row = open_row(at(9, 2));
        row.check_out = Some(at(18, 0));
        let state = DayState::of(Some(&row));
        assert_eq!(state, DayState::CheckedOut);
        assert_eq!(state.check_in(at(19, 0), &policy()), Err(ApiError::AlreadyCheckedIn));
    }

    #[test]
    fn test_check_out_without_check_in_rejected() {
        assert_eq!(
            DayState::NoRecord.check_out(at(18, 0)),
            Err(ApiError::NoCheckInFound)
        );
    }

    #[test]
    fn test_double_check_out_rejected() {
        assert_eq!(
            DayState::CheckedOut.check_out(at(18, 5)),
            Err(ApiError::AlreadyCheckedOut)
        );
    }

    #[test]
    fn test_check_out_before_check_in_rejected() {
        let state = DayState::of(Some(&open_row(at(9, 30))));
        assert_eq!(state.check_out(at(9, 0)), Err(ApiError::InvalidTimeOrder));
    }

    #[test]
    fn test_check_out_closes_open_day() {
        let state = DayState::of(Some(&open_row(at(9, 2))));
        let effect = state.check_out(at(18, 1)).unwrap();
        assert_eq!(effect.at, at(18, 1));
    }

    #[test]
    fn test_row_without_check_in_still_counts_as_open() {
        let mut row = open_row(at(9, 0));
        row.check_in = None;
        let state = DayState::of(Some(&row));
        assert!(matches!(state, DayState::CheckedIn { .. }));
    }
}
