//! Course detail assembly
//!
//! Turns one course's flat module/section rows into the nested detail view:
//!
//! 1. Load course, program, modules and sections in one read.
//! 2. Collect content ids per kind across every section, children included.
//! 3. Fetch each non-empty id set once, the three lookups running concurrently.
//! 4. Index child sections by parent id.
//! 5. Render top-level sections with their content; video content embeds the
//!    resolved child resources and examples.
//!
//! A content id with no matching row is not an error. Resource and example
//! content becomes `null`, video content becomes a shell that still carries
//! its children.

mod view;

pub use view::{
    ContentKind, CourseDetailView, ExampleContent, ModuleView, ResourceContent,
    SectionContent, SectionView, VideoContent, VideoDetails,
};

use coursehub_common::db::{Example, Resource, Section, Video};
use coursehub_common::Result;
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use tracing::debug;

use crate::db::{CourseStore, CourseStructure, ModuleWithSections};

/// Build the detail view of a course
///
/// Returns `Ok(None)` when the course does not exist; no content lookups are
/// issued in that case. Any storage failure fails the whole call.
pub async fn get_course_detail(
    store: &dyn CourseStore,
    course_id: i64,
) -> Result<Option<CourseDetailView>> {
    let Some(structure) = store.course_structure(course_id).await? else {
        return Ok(None);
    };

    let requests = ContentRequests::collect(&structure.modules);
    debug!(
        course_id,
        videos = requests.videos.len(),
        resources = requests.resources.len(),
        examples = requests.examples.len(),
        "Resolving section content"
    );

    let content = ContentIndex::fetch(store, &requests).await?;

    Ok(Some(render(&structure, &content)))
}

/// Deduplicated content ids to fetch, one set per kind
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ContentRequests {
    pub videos: BTreeSet<i64>,
    pub resources: BTreeSet<i64>,
    pub examples: BTreeSet<i64>,
}

impl ContentRequests {
    /// Classify every section of every module by its type tag
    ///
    /// Sections without a content id or with a non-content type are skipped.
    pub fn collect(modules: &[ModuleWithSections]) -> Self {
        let mut requests = Self::default();

        for section in modules.iter().flat_map(|m| m.sections.iter()) {
            let Some(content_id) = section.content_id else {
                continue;
            };
            if let Some(kind) = ContentKind::from_section_type(&section.section_type) {
                requests.ids_mut(kind).insert(content_id);
            }
        }

        requests
    }

    fn ids_mut(&mut self, kind: ContentKind) -> &mut BTreeSet<i64> {
        match kind {
            ContentKind::Video => &mut self.videos,
            ContentKind::Resource => &mut self.resources,
            ContentKind::Example => &mut self.examples,
        }
    }
}

/// Fetched content rows keyed by id
#[derive(Debug, Default, Clone)]
pub struct ContentIndex {
    pub videos: HashMap<i64, Video>,
    pub resources: HashMap<i64, Resource>,
    pub examples: HashMap<i64, Example>,
}

impl ContentIndex {
    /// Issue one lookup per non-empty id set and wait for all of them
    pub async fn fetch(store: &dyn CourseStore, requests: &ContentRequests) -> Result<Self> {
        let video_ids: Vec<i64> = requests.videos.iter().copied().collect();
        let resource_ids: Vec<i64> = requests.resources.iter().copied().collect();
        let example_ids: Vec<i64> = requests.examples.iter().copied().collect();

        let (videos, resources, examples) = tokio::try_join!(
            fetch_if_any(&video_ids, |ids| store.videos_by_ids(ids)),
            fetch_if_any(&resource_ids, |ids| store.resources_by_ids(ids)),
            fetch_if_any(&example_ids, |ids| store.examples_by_ids(ids)),
        )?;

        Ok(Self {
            videos: videos.into_iter().map(|v| (v.id, v)).collect(),
            resources: resources.into_iter().map(|r| (r.id, r)).collect(),
            examples: examples.into_iter().map(|e| (e.id, e)).collect(),
        })
    }

    fn resource(&self, content_id: Option<i64>) -> Option<ResourceContent> {
        content_id
            .and_then(|id| self.resources.get(&id))
            .map(ResourceContent::from)
    }

    fn example(&self, content_id: Option<i64>) -> Option<ExampleContent> {
        content_id
            .and_then(|id| self.examples.get(&id))
            .map(ExampleContent::from)
    }
}

/// Run `fetch` only when there is something to look up
async fn fetch_if_any<'a, T, F, Fut>(ids: &'a [i64], fetch: F) -> Result<Vec<T>>
where
    F: FnOnce(&'a [i64]) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    fetch(ids).await
}

/// Child sections keyed by parent section id, in load order
///
/// A `section_id` of `0` counts as no parent.
pub fn index_children(modules: &[ModuleWithSections]) -> HashMap<i64, Vec<&Section>> {
    let mut children: HashMap<i64, Vec<&Section>> = HashMap::new();

    for section in modules.iter().flat_map(|m| m.sections.iter()) {
        if let Some(parent_id) = section.parent_id() {
            children.entry(parent_id).or_default().push(section);
        }
    }

    children
}

/// Render the nested view from loaded structure and fetched content
pub fn render(structure: &CourseStructure, content: &ContentIndex) -> CourseDetailView {
    let children = index_children(&structure.modules);
    let course = &structure.course;

    let modules = structure
        .modules
        .iter()
        .map(|entry| {
            let module = &entry.module;
            ModuleView {
                id: module.id,
                name: module.name.clone(),
                description: module.description.clone(),
                cohort_id: module.cohort_id,
                start_date: module.start_date,
                end_date: module.end_date,
                sections: entry
                    .sections
                    .iter()
                    .filter(|s| s.parent_id().is_none())
                    .map(|s| render_section(s, content, &children))
                    .collect(),
            }
        })
        .collect();

    CourseDetailView {
        id: course.id,
        name: course.name.clone(),
        description: course.description.clone(),
        program_id: course.program_id,
        thumbnail_url: course.thumbnail_url.clone(),
        program: structure.program.clone(),
        modules,
    }
}

fn render_section(
    section: &Section,
    content: &ContentIndex,
    children: &HashMap<i64, Vec<&Section>>,
) -> SectionView {
    SectionView {
        id: section.id,
        name: section.name.clone(),
        description: section.description.clone(),
        section_type: section.section_type.clone(),
        content_id: section.content_id,
        section_id: section.section_id,
        content: resolve_content(section, content, children),
    }
}

fn resolve_content(
    section: &Section,
    content: &ContentIndex,
    children: &HashMap<i64, Vec<&Section>>,
) -> Option<SectionContent> {
    let content_id = section.content_id?;

    match ContentKind::from_section_type(&section.section_type)? {
        ContentKind::Video => {
            let (resources, examples) = resolve_children(
                children.get(&section.id).map(Vec::as_slice).unwrap_or_default(),
                content,
            );
            let video = match content.videos.get(&content_id) {
                Some(row) => VideoContent::from_row(row, resources, examples),
                None => VideoContent::shell(content_id, resources, examples),
            };
            Some(SectionContent::Video(video))
        }
        ContentKind::Resource => content.resource(Some(content_id)).map(SectionContent::Resource),
        ContentKind::Example => content.example(Some(content_id)).map(SectionContent::Example),
    }
}

/// Partition a parent's children into resolved resources and examples
///
/// Children whose row is missing, or whose type is neither resource nor
/// example, are dropped.
fn resolve_children(
    children: &[&Section],
    content: &ContentIndex,
) -> (Vec<ResourceContent>, Vec<ExampleContent>) {
    let mut resources = Vec::new();
    let mut examples = Vec::new();

    for child in children {
        match ContentKind::from_section_type(&child.section_type) {
            Some(ContentKind::Resource) => resources.extend(content.resource(child.content_id)),
            Some(ContentKind::Example) => examples.extend(content.example(child.content_id)),
            _ => {}
        }
    }

    (resources, examples)
}
