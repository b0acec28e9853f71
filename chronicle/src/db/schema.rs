use libsql::Connection;

use crate::error::{ChronicleError, Result};

use super::MetadataRepository;

pub async fn init_schema(conn: &Connection, dimensions: usize) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Structured timeline. created_at is declared without a type so text
        -- and integer timestamps are stored exactly as written.
        CREATE TABLE IF NOT EXISTS life_records (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            data_type TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            activity TEXT,
            metrics TEXT NOT NULL DEFAULT '{}',
            metadata TEXT NOT NULL DEFAULT '{}',
            created_at NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_life_records_user_type_created
            ON life_records(user_id, data_type, created_at);
        CREATE INDEX IF NOT EXISTS idx_life_records_user_activity_created
            ON life_records(user_id, activity, created_at);

        -- Metadata key-value store
        CREATE TABLE IF NOT EXISTS chronicle_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .await?;

    create_vector_table(conn, dimensions).await?;

    Ok(())
}

async fn create_vector_table(conn: &Connection, dimensions: usize) -> Result<()> {
    if let Some(existing) = MetadataRepository::get_embedding_dimensions(conn).await? {
        if existing != dimensions {
            return Err(ChronicleError::VectorIndex(format!(
                "vector_entries holds {existing}-dimensional embeddings, configured model produces {dimensions}"
            )));
        }
    }

    conn.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS vector_entries (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            source_id TEXT NOT NULL,
            data_type TEXT NOT NULL,
            content TEXT NOT NULL,
            metadata TEXT NOT NULL DEFAULT '{{}}',
            embedding F32_BLOB({dimensions}),
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_vector_entries_user_type
            ON vector_entries(user_id, data_type);
        "#
    ))
    .await?;

    MetadataRepository::set_embedding_dimensions(conn, dimensions).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use libsql::Builder;

    async fn connection() -> (Connection, tempfile::TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("schema_test.db");
        let db = Builder::new_local(path.display().to_string())
            .build()
            .await
            .unwrap();
        (db.connect().unwrap(), temp_dir)
    }

    #[tokio::test]
    async fn test_created_at_has_no_type_affinity() {
        let (conn, _dir) = connection().await;
        init_schema(&conn, 4).await.unwrap();

        conn.execute(
            "INSERT INTO life_records (id, user_id, data_type, created_at) VALUES ('a', 'u', 'voice', '2026-10-18T09:30:00.000Z')",
            (),
        )
        .await
        .unwrap();
        conn.execute(
            "INSERT INTO life_records (id, user_id, data_type, created_at) VALUES ('b', 'u', 'voice', 1792316400000)",
            (),
        )
        .await
        .unwrap();

        let mut rows = conn
            .query("SELECT id, typeof(created_at) FROM life_records ORDER BY id", ())
            .await
            .unwrap();
        let mut types = Vec::new();
        while let Some(row) = rows.next().await.unwrap() {
            types.push((row.get::<String>(0).unwrap(), row.get::<String>(1).unwrap()));
        }

        assert_eq!(
            types,
            vec![
                ("a".to_string(), "text".to_string()),
                ("b".to_string(), "integer".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_init_schema_is_repeatable() {
        let (conn, _dir) = connection().await;
        init_schema(&conn, 4).await.unwrap();
        init_schema(&conn, 4).await.unwrap();

        let dims = MetadataRepository::get_embedding_dimensions(&conn).await.unwrap();
        assert_eq!(dims, Some(4));
    }

    #[tokio::test]
    async fn test_dimension_change_is_rejected() {
        let (conn, _dir) = connection().await;
        init_schema(&conn, 4).await.unwrap();

        let result = init_schema(&conn, 8).await;
        assert!(matches!(result, Err(ChronicleError::VectorIndex(_))));
    }
}
