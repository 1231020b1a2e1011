//! SQLite implementation of [`CourseStore`]

use async_trait::async_trait;
use coursehub_common::db::{
    fetch_by_ids, scheduling_timestamp, Course, Example, Module, Resource, Section, Video,
};
use coursehub_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{CourseStore, CourseStructure, ModuleWithSections, ProgramSummary};

/// Course, program, modules and sections in one round trip
///
/// Rows arrive grouped by module then section, so a single pass can fold
/// them into the nested structure.
const COURSE_STRUCTURE_SQL: &str = r#"
    SELECT c.id AS course_id, c.name AS course_name, c.description AS course_description,
           c.program_id, c.thumbnail_url,
           p.id AS program_pk, p.name AS program_name,
           m.id AS module_pk, m.name AS module_name, m.description AS module_description,
           m.cohort_id, m.start_date, m.end_date,
           s.id AS section_pk, s.name AS section_name, s.description AS section_description,
           s.type AS section_type, s.content_id, s.section_id
    FROM courses c
    LEFT JOIN programs p ON p.id = c.program_id
    LEFT JOIN modules m ON m.course_id = c.id
    LEFT JOIN sections s ON s.module_id = m.id
    WHERE c.id = ?
    ORDER BY m.id ASC, s.id ASC
"#;

/// [`CourseStore`] backed by the catalog database
#[derive(Clone)]
pub struct SqliteCourseStore {
    db: SqlitePool,
}

impl SqliteCourseStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourseStore for SqliteCourseStore {
    async fn course_structure(&self, course_id: i64) -> Result<Option<CourseStructure>> {
        let rows = sqlx::query(COURSE_STRUCTURE_SQL)
            .bind(course_id)
            .fetch_all(&self.db)
            .await?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        let course = Course {
            id: first.try_get("course_id")?,
            name: first.try_get("course_name")?,
            description: first.try_get("course_description")?,
            program_id: first.try_get("program_id")?,
            thumbnail_url: first.try_get("thumbnail_url")?,
        };

        let program = match first.try_get::<Option<i64>, _>("program_pk")? {
            Some(id) => Some(ProgramSummary {
                id,
                name: first.try_get("program_name")?,
            }),
            None => None,
        };

        let mut modules: Vec<ModuleWithSections> = Vec::new();
        for row in &rows {
            let Some(module_id) = row.try_get::<Option<i64>, _>("module_pk")? else {
                // Course without modules yields a single all-NULL row
                continue;
            };

            if modules.last().map(|m| m.module.id) != Some(module_id) {
                modules.push(ModuleWithSections {
                    module: module_from_row(row, module_id, course.id)?,
                    sections: Vec::new(),
                });
            }

            if let Some(section) = section_from_row(row, module_id)? {
                if let Some(current) = modules.last_mut() {
                    current.sections.push(section);
                }
            }
        }

        tracing::debug!(
            course_id,
            modules = modules.len(),
            rows = rows.len(),
            "Loaded course structure"
        );

        Ok(Some(CourseStructure {
            course,
            program,
            modules,
        }))
    }

    async fn videos_by_ids(&self, ids: &[i64]) -> Result<Vec<Video>> {
        fetch_by_ids(&self.db, ids).await
    }

    async fn resources_by_ids(&self, ids: &[i64]) -> Result<Vec<Resource>> {
        fetch_by_ids(&self.db, ids).await
    }

    async fn examples_by_ids(&self, ids: &[i64]) -> Result<Vec<Example>> {
        fetch_by_ids(&self.db, ids).await
    }
}

fn module_from_row(row: &SqliteRow, module_id: i64, course_id: i64) -> Result<Module> {
    Ok(Module {
        id: module_id,
        name: row.try_get("module_name")?,
        description: row.try_get("module_description")?,
        course_id: Some(course_id),
        cohort_id: row.try_get("cohort_id")?,
        start_date: scheduling_timestamp(row, "start_date")?,
        end_date: scheduling_timestamp(row, "end_date")?,
    })
}

fn section_from_row(row: &SqliteRow, module_id: i64) -> Result<Option<Section>> {
    let Some(id) = row.try_get::<Option<i64>, _>("section_pk")? else {
        return Ok(None);
    };

    Ok(Some(Section {
        id,
        name: row.try_get("section_name")?,
        description: row.try_get("section_description")?,
        section_type: row.try_get("section_type")?,
        content_id: row.try_get("content_id")?,
        section_id: row.try_get("section_id")?,
        module_id: Some(module_id),
    }))
}
