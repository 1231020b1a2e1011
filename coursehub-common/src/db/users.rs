//! User lookups that go beyond a single table

use crate::db::models::{CatalogEntity, Course, UserMetadata};
use crate::Result;
use sqlx::SqlitePool;

/// Metadata row of a user, if any
///
/// Only one row per user is expected; the lowest id wins otherwise.
pub async fn fetch_user_metadata(pool: &SqlitePool, user_id: i64) -> Result<Option<UserMetadata>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE user_id = ? ORDER BY id ASC LIMIT 1",
        UserMetadata::COLUMNS,
        UserMetadata::TABLE
    );
    let row = sqlx::query_as::<_, UserMetadata>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Courses a user is enrolled in, ascending by course id
pub async fn fetch_enrolled_courses(pool: &SqlitePool, user_id: i64) -> Result<Vec<Course>> {
    let rows = sqlx::query_as::<_, Course>(
        r#"
        SELECT c.id, c.name, c.description, c.program_id, c.thumbnail_url
        FROM courses c
        INNER JOIN enrollments e ON e.course_id = c.id
        WHERE e.user_id = ?
        ORDER BY c.id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
