use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use libsql::{params, Connection, Row, Value};

use crate::error::{ChronicleError, Result};
use crate::models::{format_timestamp, LifeRecord, RecordFilter, TimestampEncoding};

const SELECT_COLUMNS: &str =
    "id, user_id, data_type, content, activity, metrics, metadata, created_at";

/// Column value for a timestamp in the given encoding.
pub(crate) fn encode_timestamp(at: &DateTime<Utc>, encoding: TimestampEncoding) -> Value {
    match encoding {
        TimestampEncoding::String => Value::Text(format_timestamp(at)),
        TimestampEncoding::Native => Value::Integer(at.timestamp_millis()),
    }
}

/// Build the range query for one timestamp encoding.
///
/// Returns (sql, params). The `typeof` guard keeps each query to the rows
/// written in its own encoding, which is also what lets the comparison
/// operators stay type-consistent. Text timestamps are compared in their
/// `strftime` form so values without milliseconds or with an offset still
/// order correctly against the millisecond bounds.
pub(crate) fn build_range_query(
    filter: &RecordFilter,
    encoding: TimestampEncoding,
) -> (String, Vec<Value>) {
    let (stored_type, column) = match encoding {
        TimestampEncoding::String => ("text", "strftime('%Y-%m-%dT%H:%M:%fZ', created_at)"),
        TimestampEncoding::Native => ("integer", "created_at"),
    };

    let mut values = vec![
        Value::from(filter.user_id.clone()),
        Value::from(filter.data_type.as_str().to_string()),
    ];
    let mut clauses = vec![
        "user_id = ?1".to_string(),
        "data_type = ?2".to_string(),
        format!("typeof(created_at) = '{stored_type}'"),
    ];

    if let Some(activity) = &filter.activity {
        values.push(Value::from(activity.clone()));
        clauses.push(format!("activity = ?{}", values.len()));
    }

    if let Some(range) = &filter.range {
        values.push(encode_timestamp(&range.start, encoding));
        clauses.push(format!("{column} >= ?{}", values.len()));
        values.push(encode_timestamp(&range.end, encoding));
        clauses.push(format!("{column} <= ?{}", values.len()));
    }

    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM life_records WHERE {} ORDER BY {column} DESC, id ASC",
        clauses.join(" AND ")
    );
    (sql, values)
}

fn decode_created_at(id: &str, value: Value) -> Result<(DateTime<Utc>, TimestampEncoding)> {
    match value {
        Value::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|at| (at.with_timezone(&Utc), TimestampEncoding::String))
            .map_err(|e| {
                ChronicleError::Internal(format!("Invalid created_at '{text}' on record {id}: {e}"))
            }),
        Value::Integer(millis) => Utc
            .timestamp_millis_opt(millis)
            .single()
            .map(|at| (at, TimestampEncoding::Native))
            .ok_or_else(|| {
                ChronicleError::Internal(format!("Invalid created_at {millis} on record {id}"))
            }),
        other => Err(ChronicleError::Internal(format!(
            "Unsupported created_at value {other:?} on record {id}"
        ))),
    }
}

fn record_from_row(row: &Row) -> Result<LifeRecord> {
    let id: String = row.get(0)?;
    let data_type = row
        .get::<String>(2)?
        .parse()
        .map_err(ChronicleError::Internal)?;
    let metrics: HashMap<String, f64> =
        serde_json::from_str(&row.get::<String>(5)?).unwrap_or_default();
    let metadata = serde_json::from_str(&row.get::<String>(6)?).unwrap_or_default();
    let (created_at, encoding) = decode_created_at(&id, row.get_value(7)?)?;

    Ok(LifeRecord {
        user_id: row.get(1)?,
        data_type,
        content: row.get(3)?,
        activity: row.get::<Option<String>>(4)?,
        metrics,
        metadata,
        created_at,
        encoding,
        id,
    })
}

pub struct RecordRepository;

impl RecordRepository {
    pub async fn create(conn: &Connection, record: &LifeRecord) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO life_records (
                id, user_id, data_type, content, activity, metrics, metadata, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.id.clone(),
                record.user_id.clone(),
                record.data_type.as_str(),
                record.content.clone(),
                record.activity.clone(),
                serde_json::to_string(&record.metrics)?,
                serde_json::to_string(&record.metadata)?,
                encode_timestamp(&record.created_at, record.encoding),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn query_range(
        conn: &Connection,
        filter: &RecordFilter,
        encoding: TimestampEncoding,
    ) -> Result<Vec<LifeRecord>> {
        let (sql, values) = build_range_query(filter, encoding);
        let mut rows = conn.query(&sql, libsql::params_from_iter(values)).await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(record_from_row(&row)?);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataType, DateRange};
    use chrono::NaiveDate;

    fn day() -> DateRange {
        DateRange::day(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
    }

    #[test]
    fn test_build_range_query_unbounded() {
        let filter = RecordFilter::new("u1", DataType::Voice);
        let (sql, values) = build_range_query(&filter, TimestampEncoding::String);

        assert!(sql.contains("user_id = ?1 AND data_type = ?2 AND typeof(created_at) = 'text'"));
        assert!(!sql.contains("created_at >="));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_build_range_query_string_bounds() {
        let filter = RecordFilter::new("u1", DataType::Voice).with_range(Some(day()));
        let (sql, values) = build_range_query(&filter, TimestampEncoding::String);

        assert!(sql.contains(
            "strftime('%Y-%m-%dT%H:%M:%fZ', created_at) >= ?3 AND strftime('%Y-%m-%dT%H:%M:%fZ', created_at) <= ?4"
        ));
        assert!(matches!(&values[2], Value::Text(s) if s == "2026-10-18T00:00:00.000Z"));
        assert!(matches!(&values[3], Value::Text(s) if s == "2026-10-18T23:59:59.999Z"));
    }

    #[test]
    fn test_build_range_query_native_bounds_with_activity() {
        let filter = RecordFilter::new("u1", DataType::Location)
            .with_activity(Some("badminton".to_string()))
            .with_range(Some(day()));
        let (sql, values) = build_range_query(&filter, TimestampEncoding::Native);

        assert!(sql.contains("typeof(created_at) = 'integer'"));
        assert!(sql.contains("activity = ?3"));
        assert!(sql.contains("created_at >= ?4 AND created_at <= ?5"));
        assert!(matches!(values[3], Value::Integer(ms) if ms == day().start.timestamp_millis()));
        assert!(matches!(values[4], Value::Integer(ms) if ms == day().end.timestamp_millis()));
    }

    #[test]
    fn test_decode_created_at_both_encodings() {
        let at = day().start;

        let (decoded, encoding) =
            decode_created_at("r1", Value::Text(format_timestamp(&at))).unwrap();
        assert_eq!(decoded, at);
        assert_eq!(encoding, TimestampEncoding::String);

        let (decoded, encoding) =
            decode_created_at("r1", Value::Integer(at.timestamp_millis())).unwrap();
        assert_eq!(decoded, at);
        assert_eq!(encoding, TimestampEncoding::Native);

        assert!(decode_created_at("r1", Value::Text("yesterday".to_string())).is_err());
        assert!(decode_created_at("r1", Value::Null).is_err());
    }
}
