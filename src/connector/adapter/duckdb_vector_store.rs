use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection, Row};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::interfaces::{VectorFilter, VectorStore};
use crate::domain::{DomainError, Language, VectorDocument};

/// A `VectorStore` backed by an embedded DuckDB database with the `vss`
/// extension, one table per named collection so collections can carry
/// different embedding dimensions side by side. DuckDB only allows one
/// write connection per file, so the connection is shared behind a mutex.
pub struct DuckdbVectorStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbVectorStore {
    pub fn new(path: &Path) -> Result<Self, DomainError> {
        let conn = Connection::open(path)
            .map_err(|e| DomainError::storage(format!("failed to open DuckDB database: {e}")))?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self, DomainError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DomainError::storage(format!("failed to open in-memory DuckDB: {e}")))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DomainError> {
        conn.execute_batch("INSTALL vss; LOAD vss; SET hnsw_enable_experimental_persistence = true;")
            .map_err(|e| DomainError::storage(format!("failed to load vss extension: {e}")))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS _collections (name TEXT PRIMARY KEY, dimension INTEGER NOT NULL);",
        )
        .map_err(|e| DomainError::storage(format!("failed to initialize collection registry: {e}")))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn table_name(collection: &str) -> String {
        let safe: String = collection
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        format!("chunks_{safe}")
    }

    fn vector_literal(vector: &[f32], dimension: usize) -> Result<String, DomainError> {
        if vector.len() != dimension {
            return Err(DomainError::schema_mismatch(format!(
                "expected dimension {dimension}, got {}",
                vector.len()
            )));
        }
        let mut s = String::with_capacity(vector.len() * 8 + 16);
        s.push('[');
        for (i, v) in vector.iter().enumerate() {
            if i > 0 {
                s.push_str(", ");
            }
            s.push_str(&v.to_string());
        }
        s.push_str(&format!("]::FLOAT[{dimension}]"));
        Ok(s)
    }

    fn dimension_of(conn: &Connection, collection: &str) -> Result<Option<usize>, DomainError> {
        conn.query_row(
            "SELECT dimension FROM _collections WHERE name = ?",
            params![collection],
            |row| row.get::<_, i64>(0),
        )
        .map(|d| Some(d as usize))
        .or_else(|e| match e {
            duckdb::Error::QueryReturnedNoRows => Ok(None),
            e => Err(DomainError::storage(format!("failed to read collection metadata: {e}"))),
        })
    }

    fn row_to_document(row: &Row, dimension: usize) -> Result<(VectorDocument, String), duckdb::Error> {
        let vector: Vec<f32> = (0..dimension)
            .map(|i| row.get::<_, f64>(7 + i).map(|v| v as f32))
            .collect::<Result<_, _>>()?;
        let id: String = row.get(0)?;
        let relative_path: String = row.get(1)?;
        let content: String = row.get(2)?;
        let start_line: i64 = row.get(3)?;
        let end_line: i64 = row.get(4)?;
        let language: String = row.get(5)?;
        let chunk_index: i64 = row.get(6)?;
        Ok((
            VectorDocument::new(
                id,
                vector,
                content,
                relative_path,
                start_line as u32,
                end_line as u32,
                Language::parse(&language),
                chunk_index as u32,
            ),
            String::new(),
        ))
    }
}

#[async_trait]
impl VectorStore for DuckdbVectorStore {
    async fn create_collection(&self, name: &str, dimension: usize) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        let table = Self::table_name(name);

        if Self::dimension_of(&conn, name)?.is_some() {
            return Ok(());
        }

        conn.execute(
            "INSERT INTO _collections (name, dimension) VALUES (?, ?)",
            params![name, dimension as i64],
        )
        .map_err(|e| DomainError::storage(format!("failed to register collection {name}: {e}")))?;

        let schema = format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{table}" (
                id TEXT PRIMARY KEY,
                relative_path TEXT NOT NULL,
                content TEXT NOT NULL,
                start_line INTEGER NOT NULL,
                end_line INTEGER NOT NULL,
                language TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                vector FLOAT[{dimension}] NOT NULL
            );
            CREATE INDEX IF NOT EXISTS "{table}_hnsw" ON "{table}" USING HNSW (vector) WITH (metric = 'cosine');
            "#
        );
        conn.execute_batch(&schema)
            .map_err(|e| DomainError::storage(format!("failed to create collection table {table}: {e}")))?;
        debug!("created collection {name} (dimension={dimension})");
        Ok(())
    }

    async fn has_collection(&self, name: &str) -> Result<bool, DomainError> {
        let conn = self.conn.lock().await;
        Ok(Self::dimension_of(&conn, name)?.is_some())
    }

    async fn drop_collection(&self, name: &str) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        let table = Self::table_name(name);
        conn.execute_batch(&format!("DROP TABLE IF EXISTS \"{table}\";"))
            .map_err(|e| DomainError::storage(format!("failed to drop collection {name}: {e}")))?;
        conn.execute("DELETE FROM _collections WHERE name = ?", params![name])
            .map_err(|e| DomainError::storage(format!("failed to unregister collection {name}: {e}")))?;
        Ok(())
    }

    async fn upsert(&self, collection: &str, documents: &[VectorDocument]) -> Result<(), DomainError> {
        if documents.is_empty() {
            return Ok(());
        }
        let conn = self.conn.lock().await;
        let dimension = Self::dimension_of(&conn, collection)?
            .ok_or_else(|| DomainError::not_found(format!("collection {collection}")))?;
        let table = Self::table_name(collection);

        for doc in documents {
            let array_lit = Self::vector_literal(doc.vector(), dimension)?;
            let sql = format!(
                "INSERT OR REPLACE INTO \"{table}\" \
                 (id, relative_path, content, start_line, end_line, language, chunk_index, vector) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, {array_lit})"
            );
            conn.execute(
                &sql,
                params![
                    doc.id(),
                    doc.relative_path(),
                    doc.content(),
                    doc.start_line() as i64,
                    doc.end_line() as i64,
                    doc.language().as_str(),
                    doc.chunk_index() as i64,
                ],
            )
            .map_err(|e| DomainError::storage(format!("failed to upsert document {}: {e}", doc.id())))?;
        }
        debug!("upserted {} documents into {collection}", documents.len());
        Ok(())
    }

    async fn delete_by_paths(&self, collection: &str, paths: &[String]) -> Result<u64, DomainError> {
        if paths.is_empty() {
            return Ok(0);
        }
        let conn = self.conn.lock().await;
        if Self::dimension_of(&conn, collection)?.is_none() {
            return Ok(0);
        }
        let table = Self::table_name(collection);
        let placeholders = paths.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let sql = format!("DELETE FROM \"{table}\" WHERE relative_path IN ({placeholders})");
        let deleted = conn
            .execute(&sql, duckdb::params_from_iter(paths.iter()))
            .map_err(|e| DomainError::storage(format!("failed to delete by paths: {e}")))?;
        Ok(deleted as u64)
    }

    async fn query(
        &self,
        collection: &str,
        query_vector: &[f32],
        limit: usize,
        filter: &VectorFilter,
    ) -> Result<Vec<(VectorDocument, f32)>, DomainError> {
        let conn = self.conn.lock().await;
        let dimension = match Self::dimension_of(&conn, collection)? {
            Some(d) => d,
            None => return Ok(Vec::new()),
        };
        let table = Self::table_name(collection);
        let array_lit = Self::vector_literal(query_vector, dimension)?;

        let vector_cols: Vec<String> = (0..dimension).map(|i| format!("vector[{}]", i + 1)).collect();
        let mut sql = format!(
            "SELECT id, relative_path, content, start_line, end_line, language, chunk_index, \
             {}, 1.0 - array_cosine_distance(vector, {array_lit}) AS score \
             FROM \"{table}\"",
            vector_cols.join(", ")
        );

        let mut where_clauses = Vec::new();
        if let Some(langs) = &filter.languages {
            let quoted = langs
                .iter()
                .map(|l| format!("'{}'", l.replace('\'', "''")))
                .collect::<Vec<_>>()
                .join(", ");
            where_clauses.push(format!("language IN ({quoted})"));
        }
        if let Some(prefix) = &filter.relative_path_prefix {
            where_clauses.push(format!("relative_path LIKE '{}%'", prefix.replace('\'', "''")));
        }
        if !where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clauses.join(" AND "));
        }
        sql.push_str(&format!(" ORDER BY array_cosine_distance(vector, {array_lit}) LIMIT ?"));

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::storage(format!("failed to prepare query: {e}")))?;
        let mut rows = stmt
            .query(params![limit as i64])
            .map_err(|e| DomainError::storage(format!("failed to run query: {e}")))?;

        let mut results = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| DomainError::storage(format!("failed to read query row: {e}")))?
        {
            let score: f32 = row
                .get(7 + dimension)
                .map_err(|e| DomainError::storage(format!("failed to read score: {e}")))?;
            if filter.min_score.map_or(false, |min| score < min) {
                continue;
            }
            let (doc, _) = Self::row_to_document(row, dimension)
                .map_err(|e| DomainError::storage(format!("failed to parse query row: {e}")))?;
            results.push((doc, score));
        }
        Ok(results)
    }

    async fn count(&self, collection: &str) -> Result<u64, DomainError> {
        let conn = self.conn.lock().await;
        if Self::dimension_of(&conn, collection)?.is_none() {
            return Ok(0);
        }
        let table = Self::table_name(collection);
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| row.get(0))
            .map_err(|e| DomainError::storage(format!("failed to count {collection}: {e}")))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, path: &str, vector: Vec<f32>) -> VectorDocument {
        VectorDocument::new(id.to_string(), vector, "content".to_string(), path.to_string(), 1, 2, Language::Rust, 0)
    }

    #[tokio::test]
    async fn test_create_and_count() {
        let store = DuckdbVectorStore::in_memory().unwrap();
        store.create_collection("c", 2).await.unwrap();
        assert!(store.has_collection("c").await.unwrap());
        assert_eq!(store.count("c").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upsert_and_query() {
        let store = DuckdbVectorStore::in_memory().unwrap();
        store.create_collection("c", 2).await.unwrap();
        store
            .upsert("c", &[doc("a", "a.rs", vec![1.0, 0.0]), doc("b", "b.rs", vec![0.0, 1.0])])
            .await
            .unwrap();

        let results = store.query("c", &[1.0, 0.0], 10, &VectorFilter::default()).await.unwrap();
        assert_eq!(results[0].0.id(), "a");
    }

    #[tokio::test]
    async fn test_delete_by_paths() {
        let store = DuckdbVectorStore::in_memory().unwrap();
        store.create_collection("c", 2).await.unwrap();
        store.upsert("c", &[doc("a", "a.rs", vec![1.0, 0.0])]).await.unwrap();
        let removed = store.delete_by_paths("c", &["a.rs".to_string()]).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.count("c").await.unwrap(), 0);
    }
}
