//! Generic catalog queries
//!
//! Read-only lookups shared by every [`CatalogEntity`]: list all, fetch one,
//! and fetch a batch by id list.

use crate::db::models::CatalogEntity;
use crate::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Upper bound on bound parameters per `IN (...)` query
///
/// Stays below the historical SQLite limit of 999 host parameters.
pub const MAX_IDS_PER_QUERY: usize = 900;

/// List every row of a table, ascending by id
pub async fn fetch_all<T: CatalogEntity>(pool: &SqlitePool) -> Result<Vec<T>> {
    let sql = format!("SELECT {} FROM {} ORDER BY id ASC", T::COLUMNS, T::TABLE);
    let rows = sqlx::query_as::<_, T>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Fetch a single row by primary key
pub async fn fetch_one<T: CatalogEntity>(pool: &SqlitePool, id: i64) -> Result<Option<T>> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?", T::COLUMNS, T::TABLE);
    let row = sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Fetch all rows whose id is in `ids`
///
/// An empty id list returns immediately without touching the database.
/// Ids missing from the table are simply absent from the result; row order
/// is ascending by id.
pub async fn fetch_by_ids<T: CatalogEntity>(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<T>> {
    let mut rows = Vec::new();

    for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM {} WHERE id IN (",
            T::COLUMNS,
            T::TABLE
        ));
        let mut separated = builder.separated(", ");
        for id in chunk {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id ASC");

        let batch = builder.build_query_as::<T>().fetch_all(pool).await?;
        rows.extend(batch);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;
    use crate::db::models::{Program, Resource};

    async fn seed_resources(pool: &SqlitePool) {
        for (id, name) in [(1, "Guide"), (2, "Cheatsheet"), (3, "Slides")] {
            sqlx::query("INSERT INTO resources (id, name, url) VALUES (?, ?, ?)")
                .bind(id)
                .bind(name)
                .bind(format!("https://example.test/{}", id))
                .execute(pool)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_fetch_all_orders_by_id() {
        let pool = init_memory_database().await.unwrap();
        for (id, name) in [(2, "Second"), (1, "First")] {
            sqlx::query("INSERT INTO programs (id, name) VALUES (?, ?)")
                .bind(id)
                .bind(name)
                .execute(&pool)
                .await
                .unwrap();
        }

        let programs: Vec<Program> = fetch_all(&pool).await.unwrap();
        let ids: Vec<i64> = programs.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_fetch_one_missing_is_none() {
        let pool = init_memory_database().await.unwrap();
        let program: Option<Program> = fetch_one(&pool, 42).await.unwrap();
        assert!(program.is_none());
    }

    #[tokio::test]
    async fn test_fetch_by_ids_skips_missing_rows() {
        let pool = init_memory_database().await.unwrap();
        seed_resources(&pool).await;

        let rows: Vec<Resource> = fetch_by_ids(&pool, &[3, 1, 99]).await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(rows[1].url.as_deref(), Some("https://example.test/3"));
    }

    #[tokio::test]
    async fn test_fetch_by_ids_empty_list() {
        let pool = init_memory_database().await.unwrap();
        seed_resources(&pool).await;

        let rows: Vec<Resource> = fetch_by_ids(&pool, &[]).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_by_ids_spans_chunks() {
        let pool = init_memory_database().await.unwrap();
        seed_resources(&pool).await;

        let mut ids: Vec<i64> = (1000..1000 + MAX_IDS_PER_QUERY as i64).collect();
        ids.push(2);

        let rows: Vec<Resource> = fetch_by_ids(&pool, &ids).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Cheatsheet");
    }
}
