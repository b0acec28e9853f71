use chrono::Utc;
use libsql::{params, Connection, Value};

use crate::db::traits::{VectorEntry, VectorFilter, VectorMatch, VECTOR_DATE_FIELDS};
use crate::error::{ChronicleError, Result};
use crate::models::{format_timestamp, DateRange};

/// Build the disjunctive date predicate over the metadata date fields.
///
/// Text values are normalized through `strftime` so date-only and full
/// RFC 3339 strings compare correctly; numeric values are epoch millis.
/// Returns (sql_fragment, param_values) with placeholders from `start_idx`.
pub(crate) fn build_date_filter(range: &DateRange, start_idx: usize) -> (String, Vec<Value>) {
    let (text_lo, text_hi, num_lo, num_hi) =
        (start_idx, start_idx + 1, start_idx + 2, start_idx + 3);

    let clauses: Vec<String> = VECTOR_DATE_FIELDS
        .iter()
        .map(|field| {
            let path = format!("'$.{field}'");
            format!(
                "(json_type(metadata, {path}) = 'text' AND strftime('%Y-%m-%dT%H:%M:%fZ', json_extract(metadata, {path})) BETWEEN ?{text_lo} AND ?{text_hi}) \
                 OR (json_type(metadata, {path}) IN ('integer', 'real') AND json_extract(metadata, {path}) BETWEEN ?{num_lo} AND ?{num_hi})"
            )
        })
        .collect();

    let values = vec![
        Value::from(format_timestamp(&range.start)),
        Value::from(format_timestamp(&range.end)),
        Value::from(range.start.timestamp_millis()),
        Value::from(range.end.timestamp_millis()),
    ];

    (clauses.join(" OR "), values)
}

pub struct VectorRepository;

impl VectorRepository {
    pub async fn upsert(conn: &Connection, entry: &VectorEntry) -> Result<()> {
        let embedding_json = serde_json::to_string(&entry.embedding)?;

        conn.execute(
            r#"
            INSERT INTO vector_entries (
                id, user_id, source_id, data_type, content, metadata, embedding, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, vector32(?7), ?8)
            ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                source_id = excluded.source_id,
                data_type = excluded.data_type,
                content = excluded.content,
                metadata = excluded.metadata,
                embedding = excluded.embedding,
                updated_at = excluded.updated_at
            "#,
            params![
                entry.id.clone(),
                entry.user_id.clone(),
                entry.source_id.clone(),
                entry.data_type.as_str(),
                entry.content.clone(),
                serde_json::to_string(&entry.metadata)?,
                embedding_json,
                format_timestamp(&Utc::now()),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn search(
        conn: &Connection,
        embedding: &[f32],
        top_k: u32,
        filter: &VectorFilter,
    ) -> Result<Vec<VectorMatch>> {
        let embedding_json = serde_json::to_string(embedding)?;

        // Fixed params: ?1=embedding, ?2=user_id, ?3=limit
        let mut param_values: Vec<Value> = vec![
            Value::from(embedding_json),
            Value::from(filter.user_id.clone()),
            Value::from(top_k),
        ];
        let mut clauses = vec!["embedding IS NOT NULL".to_string(), "user_id = ?2".to_string()];

        if let Some(data_type) = filter.data_type {
            param_values.push(Value::from(data_type.as_str().to_string()));
            clauses.push(format!("data_type = ?{}", param_values.len()));
        }

        if let Some(range) = &filter.date_range {
            let (date_clause, date_values) = build_date_filter(range, param_values.len() + 1);
            clauses.push(format!("({date_clause})"));
            param_values.extend(date_values);
        }

        let query = format!(
            r#"
            SELECT
                id,
                source_id,
                data_type,
                content,
                metadata,
                1 - vector_distance_cos(embedding, vector32(?1)) as score
            FROM vector_entries
            WHERE {}
            ORDER BY score DESC, id ASC
            LIMIT ?3
            "#,
            clauses.join(" AND ")
        );

        let mut rows = conn
            .query(&query, libsql::params_from_iter(param_values))
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(VectorMatch {
                id: row.get(0)?,
                source_id: row.get(1)?,
                data_type: row
                    .get::<String>(2)?
                    .parse()
                    .map_err(ChronicleError::Internal)?,
                content: row.get(3)?,
                metadata: serde_json::from_str(&row.get::<String>(4)?).unwrap_or_default(),
                score: row.get::<f64>(5)? as f32,
            });
        }

        Ok(results)
    }
}
