//! Database models
//!
//! One row type per catalog table. Serialized field names are camelCase to
//! match the HTTP API; column names are snake_case.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, Value, ValueRef};
use tracing::warn;

/// A catalog table that can be listed and fetched by id
///
/// `COLUMNS` is the exact select list used for every read, so timestamps and
/// other bookkeeping columns never leave the database layer.
pub trait CatalogEntity:
    for<'r> FromRow<'r, SqliteRow> + Serialize + Send + Unpin + 'static
{
    /// Table name
    const TABLE: &'static str;
    /// Comma-separated select list
    const COLUMNS: &'static str;
    /// Human-readable entity name used in "not found" messages
    const LABEL: &'static str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl CatalogEntity for Program {
    const TABLE: &'static str = "programs";
    const COLUMNS: &'static str = "id, name, description";
    const LABEL: &'static str = "Program";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub program_id: Option<i64>,
    pub thumbnail_url: Option<String>,
}

impl CatalogEntity for Course {
    const TABLE: &'static str = "courses";
    const COLUMNS: &'static str = "id, name, description, program_id, thumbnail_url";
    const LABEL: &'static str = "Course";
}

/// Course module
///
/// `start_date`/`end_date` are decoded leniently, see [`scheduling_timestamp`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub course_id: Option<i64>,
    pub cohort_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl CatalogEntity for Module {
    const TABLE: &'static str = "modules";
    const COLUMNS: &'static str =
        "id, name, description, course_id, cohort_id, start_date, end_date";
    const LABEL: &'static str = "Module";
}

impl<'r> FromRow<'r, SqliteRow> for Module {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            course_id: row.try_get("course_id")?,
            cohort_id: row.try_get("cohort_id")?,
            start_date: scheduling_timestamp(row, "start_date")?,
            end_date: scheduling_timestamp(row, "end_date")?,
        })
    }
}

/// A node of a module's content tree
///
/// `content_id` points into `videos`, `resources` or `examples` depending on
/// `section_type`; nothing enforces that the target row exists.
/// `section_id` is the parent section, `None` for top-level sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub section_type: String,
    pub content_id: Option<i64>,
    pub section_id: Option<i64>,
    pub module_id: Option<i64>,
}

impl CatalogEntity for Section {
    const TABLE: &'static str = "sections";
    const COLUMNS: &'static str =
        "id, name, description, type, content_id, section_id, module_id";
    const LABEL: &'static str = "Section";
}

impl Section {
    /// Parent section id; `0` is treated like `NULL` (top-level)
    pub fn parent_id(&self) -> Option<i64> {
        self.section_id.filter(|id| *id != 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub transcript: Option<String>,
}

impl CatalogEntity for Video {
    const TABLE: &'static str = "videos";
    const COLUMNS: &'static str = "id, name, description, url, transcript";
    const LABEL: &'static str = "Video";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl CatalogEntity for Resource {
    const TABLE: &'static str = "resources";
    const COLUMNS: &'static str = "id, name, description, url";
    const LABEL: &'static str = "Resource";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
}

impl CatalogEntity for Example {
    const TABLE: &'static str = "examples";
    const COLUMNS: &'static str = "id, name, description, industry";
    const LABEL: &'static str = "Example";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl CatalogEntity for Event {
    const TABLE: &'static str = "events";
    const COLUMNS: &'static str = "id, name, description, url, start_time, end_time";
    const LABEL: &'static str = "Event";
}

impl<'r> FromRow<'r, SqliteRow> for Event {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            url: row.try_get("url")?,
            start_time: scheduling_timestamp(row, "start_time")?,
            end_time: scheduling_timestamp(row, "end_time")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
}

impl CatalogEntity for Enrollment {
    const TABLE: &'static str = "enrollments";
    const COLUMNS: &'static str = "id, user_id, course_id";
    const LABEL: &'static str = "Enrollment";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl CatalogEntity for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str = "id, name, email, phone";
    const LABEL: &'static str = "User";
}

/// Profile details for a user, at most one row per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserMetadata {
    pub id: i64,
    pub user_id: i64,
    pub designation: Option<String>,
    pub company: Option<String>,
    /// Free-form JSON stored as text
    pub metadata: Option<serde_json::Value>,
    pub industry: Option<String>,
    pub picture_url: Option<String>,
    pub linkedin_url: Option<String>,
}

impl CatalogEntity for UserMetadata {
    const TABLE: &'static str = "usermetadatas";
    const COLUMNS: &'static str =
        "id, user_id, designation, company, metadata, industry, picture_url, linkedin_url";
    const LABEL: &'static str = "UserMetadata";
}

/// Assignment referenced by `ASSIGNMENT` sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl CatalogEntity for Assignment {
    const TABLE: &'static str = "assignments";
    const COLUMNS: &'static str = "id, name, description";
    const LABEL: &'static str = "Assignment";
}

/// Parse a stored timestamp
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff]` (SQLite `CURRENT_TIMESTAMP`
/// style, with or without `T`) and a bare `YYYY-MM-DD` (midnight UTC).
/// Naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Decode an optional scheduling column without failing the row
///
/// Text goes through [`parse_timestamp`], integers are Unix seconds.
/// Anything unparseable is logged and read as `None`.
pub fn scheduling_timestamp(row: &SqliteRow, column: &str) -> sqlx::Result<Option<DateTime<Utc>>> {
    let raw = row.try_get_raw(column)?;
    if raw.is_null() {
        return Ok(None);
    }

    let value = ValueRef::to_owned(&raw);
    let parsed = if let Ok(text) = value.try_decode::<String>() {
        parse_timestamp(&text)
    } else if let Ok(seconds) = value.try_decode::<i64>() {
        DateTime::from_timestamp(seconds, 0)
    } else {
        None
    };

    if parsed.is_none() {
        warn!(column, "Ignoring unparseable timestamp");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_serializes_type_and_camel_case() {
        let section = Section {
            id: 10,
            name: "Intro".to_string(),
            description: None,
            section_type: "VIDEO".to_string(),
            content_id: Some(100),
            section_id: None,
            module_id: Some(1),
        };

        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["type"], "VIDEO");
        assert_eq!(json["contentId"], 100);
        assert!(json["sectionId"].is_null());
        assert_eq!(json["moduleId"], 1);
        assert!(json.get("section_type").is_none());
    }

    #[test]
    fn test_course_serializes_camel_case() {
        let course = Course {
            id: 1,
            name: "Rust".to_string(),
            description: Some("Systems".to_string()),
            program_id: Some(3),
            thumbnail_url: None,
        };

        let json = serde_json::to_value(&course).unwrap();
        assert_eq!(json["programId"], 3);
        assert!(json["thumbnailUrl"].is_null());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let midnight = DateTime::parse_from_rfc3339("2025-09-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(parse_timestamp("2025-09-01"), Some(midnight));
        assert_eq!(parse_timestamp("2025-09-01T00:00:00Z"), Some(midnight));
        assert_eq!(parse_timestamp("2025-09-01 00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2025-09-01T02:00:00+02:00"), Some(midnight));
        assert_eq!(
            parse_timestamp("2025-09-01 17:30:00.250").map(|t| t.timestamp_millis()),
            Some(midnight.timestamp_millis() + (17 * 3600 + 30 * 60) * 1000 + 250)
        );
        assert_eq!(parse_timestamp("next tuesday"), None);
    }

    #[test]
    fn test_section_parent_id_treats_zero_as_top_level() {
        let mut section = Section {
            id: 1,
            name: "Loose".to_string(),
            description: None,
            section_type: "RESOURCE".to_string(),
            content_id: Some(2),
            section_id: Some(0),
            module_id: None,
        };
        assert_eq!(section.parent_id(), None);

        section.section_id = Some(7);
        assert_eq!(section.parent_id(), Some(7));
    }
}
