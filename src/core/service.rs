use chrono::{NaiveDate, NaiveDateTime};
use sqlx::MySqlPool;

use crate::core::lifecycle::{DayState, LatenessPolicy};
use crate::core::summary::{self, MonthlySummary};
use crate::error::ApiError;
use crate::model::attendance::{Attendance, DressingCode};

const ATTENDANCE_COLUMNS: &str =
    "id, user_id, date, check_in, check_out, status, note, dressing";

/// Stateless facade over the attendance store. Handlers construct it per
/// request from the shared pool; it owns no state beyond the handle.
pub struct AttendanceService {
    pool: MySqlPool,
}

impl AttendanceService {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn record_for_day(
        &self,
        user_id: u64,
        day: NaiveDate,
    ) -> Result<Option<Attendance>, ApiError> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE user_id = ? AND date = ?"
        );
        let record = sqlx::query_as::<_, Attendance>(&sql)
            .bind(user_id)
            .bind(day)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    /// Create today's record. Two concurrent check-ins race on the existence
    /// check, so a duplicate-key violation from the `(user_id, date)` unique
    /// index is reported as `AlreadyCheckedIn`, not as a storage failure.
    pub async fn check_in(
        &self,
        user_id: u64,
        now: NaiveDateTime,
        policy: &LatenessPolicy,
        dressing: DressingCode,
        note: Option<&str>,
    ) -> Result<Attendance, ApiError> {
        let day = now.date();
        let state = DayState::of(self.record_for_day(user_id, day).await?.as_ref());
        let effect = state.check_in(now, policy)?;

        let result = sqlx::query(
            r#"
            INSERT INTO attendance (user_id, date, check_in, status, note, dressing)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(day)
        .bind(effect.at)
        .bind(effect.status)
        .bind(note)
        .bind(dressing)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Err(ApiError::AlreadyCheckedIn);
                }
            }
            tracing::error!(error = %e, user_id, "Check-in insert failed");
            return Err(ApiError::Internal);
        }

        self.record_for_day(user_id, day)
            .await?
            .ok_or(ApiError::Internal)
    }

    /// Close today's record. The `check_out IS NULL` predicate re-checks the
    /// precondition at write time; losing that race surfaces as
    /// `AlreadyCheckedOut` and the first timestamp wins.
    pub async fn check_out(
        &self,
        user_id: u64,
        now: NaiveDateTime,
        note: Option<&str>,
    ) -> Result<Attendance, ApiError> {
        let day = now.date();
        let state = DayState::of(self.record_for_day(user_id, day).await?.as_ref());
        let effect = state.check_out(now)?;

        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET check_out = ?, note = COALESCE(?, note)
            WHERE user_id = ?
            AND date = ?
            AND check_out IS NULL
            "#,
        )
        .bind(effect.at)
        .bind(note)
        .bind(user_id)
        .bind(day)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "Check-out update failed");
            ApiError::Internal
        })?;

        if result.rows_affected() == 0 {
            return Err(ApiError::AlreadyCheckedOut);
        }

        self.record_for_day(user_id, day)
            .await?
            .ok_or(ApiError::Internal)
    }

    /// A user's full history, newest first.
    pub async fn records_for(&self, user_id: u64) -> Result<Vec<Attendance>, ApiError> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE user_id = ? ORDER BY date DESC"
        );
        let records = sqlx::query_as::<_, Attendance>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    pub async fn monthly_summary(
        &self,
        user_id: u64,
        month: u32,
        year: i32,
        expected_working_days: u32,
    ) -> Result<MonthlySummary, ApiError> {
        let records = self.records_for(user_id).await?;
        Ok(summary::summarize(&records, month, year, expected_working_days))
    }
}
