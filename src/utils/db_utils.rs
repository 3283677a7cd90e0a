use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use sqlx::MySqlPool;

use crate::error::ApiError;

/// SQL bindable value enum
#[derive(Debug, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Null,
}

/// SQL update container
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Build a dynamic UPDATE from a JSON object. Only keys in `allowed` become
/// SET clauses; column names never come from the payload unchecked. String
/// values that look like dates, datetimes, or times of day are coerced so
/// DATE/TIME/DATETIME columns bind with the right type.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    allowed: &[&str],
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, ApiError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ApiError::validation("Payload must be a JSON object"))?;

    let mut columns = Vec::new();
    let mut values = Vec::new();

    for (key, value) in obj {
        if !allowed.contains(&key.as_str()) {
            continue;
        }

        let bound = match value {
            Value::String(s) => {
                if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    SqlValue::Date(d)
                } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                    SqlValue::DateTime(dt)
                } else if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M:%S")
                    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
                {
                    SqlValue::Time(t)
                } else {
                    SqlValue::String(s.clone())
                }
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SqlValue::I64(i)
                } else if let Some(f) = n.as_f64() {
                    SqlValue::F64(f)
                } else {
                    return Err(ApiError::validation("Unsupported numeric value"));
                }
            }
            Value::Bool(b) => SqlValue::Bool(*b),
            Value::Null => SqlValue::Null,
            _ => return Err(ApiError::validation("Unsupported JSON value type")),
        };

        columns.push(key.as_str());
        values.push(bound);
    }

    if columns.is_empty() {
        return Err(ApiError::validation("No updatable fields provided"));
    }

    let set_clause = columns
        .iter()
        .map(|c| format!("{} = ?", c))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    values.push(SqlValue::I64(id_value as i64));

    Ok(SqlUpdate { sql, values })
}

/// Execute the update
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Time(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ALLOWED: &[&str] = &["full_name", "entry_time", "annual_leaves", "status"];

    #[test]
    fn test_builds_set_clause_for_allowed_keys_only() {
        let payload = json!({
            "full_name": "Jane Doe",
            "role_id": 1,
            "password": "sneaky"
        });
        let update = build_update_sql("users", &payload, ALLOWED, "id", 42).unwrap();
        assert_eq!(update.sql, "UPDATE users SET full_name = ? WHERE id = ?");
        assert_eq!(
            update.values,
            vec![SqlValue::String("Jane Doe".to_string()), SqlValue::I64(42)]
        );
    }

    #[test]
    fn test_time_of_day_strings_coerced() {
        let payload = json!({ "entry_time": "09:30" });
        let update = build_update_sql("users", &payload, ALLOWED, "id", 42).unwrap();
        assert_eq!(
            update.values[0],
            SqlValue::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_date_strings_coerced() {
        let payload = json!({ "status": "2026-08-06" });
        let update = build_update_sql("users", &payload, ALLOWED, "id", 42).unwrap();
        assert_eq!(
            update.values[0],
            SqlValue::Date(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap())
        );
    }

    #[test]
    fn test_empty_or_fully_filtered_payload_rejected() {
        assert!(build_update_sql("users", &json!({}), ALLOWED, "id", 42).is_err());
        assert!(
            build_update_sql("users", &json!({"password": "x"}), ALLOWED, "id", 42).is_err()
        );
    }

    #[test]
    fn test_non_object_payload_rejected() {
        assert!(build_update_sql("users", &json!([1, 2]), ALLOWED, "id", 42).is_err());
    }
}
