//! Persistence collaborator for the course tree
//!
//! [`CourseStore`] is the only seam between the course tree assembler and
//! storage: one structural load plus one batched lookup per content kind.

use async_trait::async_trait;
use coursehub_common::db::{Course, Example, Module, Resource, Section, Video};
use coursehub_common::Result;
use serde::{Deserialize, Serialize};

mod sqlite_store;
pub use sqlite_store::SqliteCourseStore;

/// Program fields embedded in a course detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub id: i64,
    pub name: String,
}

/// A module with its flat section list, sections ascending by id
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleWithSections {
    pub module: Module,
    pub sections: Vec<Section>,
}

/// Course row plus everything hanging off it, modules ascending by id
#[derive(Debug, Clone, PartialEq)]
pub struct CourseStructure {
    pub course: Course,
    pub program: Option<ProgramSummary>,
    pub modules: Vec<ModuleWithSections>,
}

/// Read access needed to assemble a course detail
///
/// The `*_by_ids` lookups accept a possibly-empty id list and return an
/// empty result for it without error. Ids without a row are skipped.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Course with program, modules and sections; `None` if the course does not exist
    async fn course_structure(&self, course_id: i64) -> Result<Option<CourseStructure>>;

    async fn videos_by_ids(&self, ids: &[i64]) -> Result<Vec<Video>>;

    async fn resources_by_ids(&self, ids: &[i64]) -> Result<Vec<Resource>>;

    async fn examples_by_ids(&self, ids: &[i64]) -> Result<Vec<Example>>;
}
