//! Course detail assembly against an instrumented in-memory store
//!
//! The store counts every lookup so tests can assert which queries the
//! assembler issues, not just what it renders.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use coursehub_api::course_tree::{get_course_detail, SectionContent};
use coursehub_api::db::{CourseStore, CourseStructure, ModuleWithSections, ProgramSummary};
use coursehub_common::db::{Course, Example, Module, Resource, Section, Video};
use coursehub_common::{Error, Result};
use serde_json::json;

#[derive(Default)]
struct CountingStore {
    courses: HashMap<i64, CourseStructure>,
    videos: Vec<Video>,
    resources: Vec<Resource>,
    examples: Vec<Example>,
    fail_content_lookups: bool,
    structure_calls: AtomicUsize,
    video_calls: AtomicUsize,
    resource_calls: AtomicUsize,
    example_calls: AtomicUsize,
    requested_video_ids: Mutex<Vec<Vec<i64>>>,
}

impl CountingStore {
    fn content_calls(&self) -> usize {
        self.video_calls.load(Ordering::SeqCst)
            + self.resource_calls.load(Ordering::SeqCst)
            + self.example_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<()> {
        if self.fail_content_lookups {
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn pick<T: Clone>(rows: &[T], ids: &[i64], id_of: impl Fn(&T) -> i64) -> Vec<T> {
    rows.iter().filter(|r| ids.contains(&id_of(r))).cloned().collect()
}

#[async_trait]
impl CourseStore for CountingStore {
    async fn course_structure(&self, course_id: i64) -> Result<Option<CourseStructure>> {
        self.structure_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.courses.get(&course_id).cloned())
    }

    async fn videos_by_ids(&self, ids: &[i64]) -> Result<Vec<Video>> {
        self.video_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_video_ids.lock().unwrap().push(ids.to_vec());
        self.check_failure()?;
        Ok(pick(&self.videos, ids, |v| v.id))
    }

    async fn resources_by_ids(&self, ids: &[i64]) -> Result<Vec<Resource>> {
        self.resource_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(pick(&self.resources, ids, |r| r.id))
    }

    async fn examples_by_ids(&self, ids: &[i64]) -> Result<Vec<Example>> {
        self.example_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(pick(&self.examples, ids, |e| e.id))
    }
}

fn section(id: i64, section_type: &str, content_id: Option<i64>, parent: Option<i64>) -> Section {
    Section {
        id,
        name: format!("Section {}", id),
        description: None,
        section_type: section_type.to_string(),
        content_id,
        section_id: parent,
        module_id: None,
    }
}

fn module(id: i64, sections: Vec<Section>) -> ModuleWithSections {
    ModuleWithSections {
        module: Module {
            id,
            name: format!("Module {}", id),
            description: None,
            course_id: Some(1),
            cohort_id: None,
            start_date: None,
            end_date: None,
        },
        sections,
    }
}

fn course(modules: Vec<ModuleWithSections>) -> CourseStructure {
    CourseStructure {
        course: Course {
            id: 1,
            name: "Course 1".to_string(),
            description: Some("Sample".to_string()),
            program_id: Some(9),
            thumbnail_url: None,
        },
        program: Some(ProgramSummary {
            id: 9,
            name: "Program 9".to_string(),
        }),
        modules,
    }
}

fn video(id: i64) -> Video {
    Video {
        id,
        name: format!("Video {}", id),
        description: None,
        url: Some(format!("https://video.test/{}", id)),
        transcript: None,
    }
}

fn resource(id: i64) -> Resource {
    Resource {
        id,
        name: format!("Resource {}", id),
        description: None,
        url: Some(format!("https://resource.test/{}", id)),
    }
}

fn example(id: i64) -> Example {
    Example {
        id,
        name: format!("Example {}", id),
        description: None,
        industry: Some("Retail".to_string()),
    }
}

/// Course 1: one module, video section 10 with resource child 11
fn sample_store() -> CountingStore {
    let mut store = CountingStore::default();
    store.courses.insert(
        1,
        course(vec![module(
            1,
            vec![
                section(10, "VIDEO", Some(100), None),
                section(11, "RESOURCE", Some(200), Some(10)),
            ],
        )]),
    );
    store.videos.push(video(100));
    store.resources.push(resource(200));
    store
}

#[tokio::test]
async fn test_missing_course_issues_no_content_lookups() {
    let store = sample_store();

    let detail = get_course_detail(&store, 404).await.unwrap();
    assert!(detail.is_none());
    assert_eq!(store.structure_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.content_calls(), 0);
}

#[tokio::test]
async fn test_child_attached_under_video() {
    let store = sample_store();

    let detail = get_course_detail(&store, 1).await.unwrap().unwrap();
    assert_eq!(detail.program.as_ref().map(|p| p.id), Some(9));
    assert_eq!(detail.modules.len(), 1);

    let sections = &detail.modules[0].sections;
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].id, 10);

    match &sections[0].content {
        Some(SectionContent::Video(content)) => {
            assert_eq!(content.id, 100);
            assert_eq!(content.details.as_ref().unwrap().name, "Video 100");
            let child_ids: Vec<i64> = content.resources.iter().map(|r| r.id).collect();
            assert_eq!(child_ids, vec![200]);
            assert!(content.examples.is_empty());
        }
        other => panic!("expected video content, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_video_becomes_shell() {
    let mut store = sample_store();
    store.videos.clear();

    let detail = get_course_detail(&store, 1).await.unwrap().unwrap();
    let content = serde_json::to_value(&detail.modules[0].sections[0].content).unwrap();
    assert_eq!(
        content,
        json!({
            "id": 100,
            "type": "video",
            "resources": [{
                "id": 200,
                "name": "Resource 200",
                "description": null,
                "url": "https://resource.test/200",
                "type": "resource"
            }],
            "examples": []
        })
    );
}

#[tokio::test]
async fn test_no_lookup_for_absent_kinds() {
    let store = sample_store();

    get_course_detail(&store, 1).await.unwrap().unwrap();
    assert_eq!(store.video_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.resource_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.example_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_course_without_content_issues_no_lookups() {
    let mut store = CountingStore::default();
    store.courses.insert(
        1,
        course(vec![
            module(1, vec![section(1, "ASSIGNMENT", Some(5), None)]),
            module(2, vec![section(2, "VIDEO", None, None)]),
        ]),
    );

    let detail = get_course_detail(&store, 1).await.unwrap().unwrap();
    assert_eq!(store.content_calls(), 0);
    assert!(detail
        .modules
        .iter()
        .flat_map(|m| m.sections.iter())
        .all(|s| s.content.is_none()));
}

#[tokio::test]
async fn test_ids_deduplicated_across_modules() {
    let mut store = CountingStore::default();
    store.courses.insert(
        1,
        course(vec![
            module(1, vec![section(1, "VIDEO", Some(100), None), section(2, "video", Some(101), None)]),
            module(2, vec![section(3, "Video", Some(100), None)]),
        ]),
    );
    store.videos.extend([video(100), video(101)]);

    let detail = get_course_detail(&store, 1).await.unwrap().unwrap();
    assert_eq!(store.video_calls.load(Ordering::SeqCst), 1);

    let mut requested = store.requested_video_ids.lock().unwrap()[0].clone();
    requested.sort_unstable();
    assert_eq!(requested, vec![100, 101]);

    let second_module = &detail.modules[1].sections[0];
    assert!(matches!(&second_module.content, Some(SectionContent::Video(v)) if v.id == 100));
}

#[tokio::test]
async fn test_children_partitioned_by_type() {
    let mut store = CountingStore::default();
    store.courses.insert(
        1,
        course(vec![module(
            1,
            vec![
                section(5, "EXAMPLE", Some(300), Some(20)),
                section(6, "RESOURCE", Some(200), None),
                section(20, "VIDEO", Some(100), None),
                section(21, "RESOURCE", Some(201), Some(20)),
                section(22, "RESOURCE", Some(999), Some(20)),
                section(23, "ASSIGNMENT", Some(1), Some(20)),
            ],
        )]),
    );
    store.videos.push(video(100));
    store.resources.extend([resource(200), resource(201)]);
    store.examples.push(example(300));

    let detail = get_course_detail(&store, 1).await.unwrap().unwrap();
    let sections = &detail.modules[0].sections;

    let top_ids: Vec<i64> = sections.iter().map(|s| s.id).collect();
    assert_eq!(top_ids, vec![6, 20]);

    assert!(matches!(&sections[0].content, Some(SectionContent::Resource(r)) if r.id == 200));

    match &sections[1].content {
        Some(SectionContent::Video(content)) => {
            let resource_ids: Vec<i64> = content.resources.iter().map(|r| r.id).collect();
            let example_ids: Vec<i64> = content.examples.iter().map(|e| e.id).collect();
            assert_eq!(resource_ids, vec![201]);
            assert_eq!(example_ids, vec![300]);
        }
        other => panic!("expected video content, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_resource_and_example_are_null() {
    let mut store = CountingStore::default();
    store.courses.insert(
        1,
        course(vec![module(
            1,
            vec![
                section(1, "RESOURCE", Some(200), None),
                section(2, "EXAMPLE", Some(300), None),
            ],
        )]),
    );

    let detail = get_course_detail(&store, 1).await.unwrap().unwrap();
    assert!(detail.modules[0].sections.iter().all(|s| s.content.is_none()));
    assert_eq!(store.resource_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.example_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_content_lookup_failure_fails_whole_call() {
    let mut store = sample_store();
    store.fail_content_lookups = true;

    let err = get_course_detail(&store, 1).await.unwrap_err();
    assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn test_zero_parent_id_is_top_level() {
    let mut store = CountingStore::default();
    store.courses.insert(
        1,
        course(vec![module(
            1,
            vec![
                section(1, "RESOURCE", Some(200), Some(0)),
                section(2, "VIDEO", Some(100), None),
            ],
        )]),
    );
    store.videos.push(video(100));
    store.resources.push(resource(200));

    let detail = get_course_detail(&store, 1).await.unwrap().unwrap();
    let sections = &detail.modules[0].sections;

    let ids: Vec<i64> = sections.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(sections[0].section_id, Some(0));
    assert!(matches!(&sections[0].content, Some(SectionContent::Resource(r)) if r.id == 200));
    assert!(matches!(&sections[1].content, Some(SectionContent::Video(v)) if v.resources.is_empty()));
}
