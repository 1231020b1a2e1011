//! Rendered course detail
//!
//! Field names serialize in camelCase. Every content object carries a
//! `type` of `video`, `resource` or `example`.

use chrono::{DateTime, Utc};
use coursehub_common::db::{Example, Resource, Video};
use serde::Serialize;

use crate::db::ProgramSummary;

/// Content table a section's `content_id` points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Video,
    Resource,
    Example,
}

impl ContentKind {
    /// Kind named by a section `type` tag, compared case-insensitively
    ///
    /// `ASSIGNMENT` and unknown tags carry no resolvable content.
    pub fn from_section_type(section_type: &str) -> Option<Self> {
        if section_type.eq_ignore_ascii_case("VIDEO") {
            Some(Self::Video)
        } else if section_type.eq_ignore_ascii_case("RESOURCE") {
            Some(Self::Resource)
        } else if section_type.eq_ignore_ascii_case("EXAMPLE") {
            Some(Self::Example)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub program_id: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub program: Option<ProgramSummary>,
    pub modules: Vec<ModuleView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub cohort_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Top-level sections only
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Type tag exactly as stored
    #[serde(rename = "type")]
    pub section_type: String,
    pub content_id: Option<i64>,
    pub section_id: Option<i64>,
    pub content: Option<SectionContent>,
}

/// Resolved content of a top-level section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionContent {
    Video(VideoContent),
    Resource(ResourceContent),
    Example(ExampleContent),
}

/// Video content with its child resources and examples
///
/// When the video row is missing, `details` is `None` and the object
/// degrades to `{id, type, resources, examples}` so children survive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoContent {
    pub id: i64,
    #[serde(flatten)]
    pub details: Option<VideoDetails>,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub resources: Vec<ResourceContent>,
    pub examples: Vec<ExampleContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoDetails {
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub transcript: Option<String>,
}

impl VideoContent {
    pub fn from_row(
        video: &Video,
        resources: Vec<ResourceContent>,
        examples: Vec<ExampleContent>,
    ) -> Self {
        Self {
            id: video.id,
            details: Some(VideoDetails {
                name: video.name.clone(),
                description: video.description.clone(),
                url: video.url.clone(),
                transcript: video.transcript.clone(),
            }),
            kind: ContentKind::Video,
            resources,
            examples,
        }
    }

    /// Placeholder for a video id with no matching row
    pub fn shell(
        content_id: i64,
        resources: Vec<ResourceContent>,
        examples: Vec<ExampleContent>,
    ) -> Self {
        Self {
            id: content_id,
            details: None,
            kind: ContentKind::Video,
            resources,
            examples,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceContent {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

impl From<&Resource> for ResourceContent {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id,
            name: resource.name.clone(),
            description: resource.description.clone(),
            url: resource.url.clone(),
            kind: ContentKind::Resource,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleContent {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

impl From<&Example> for ExampleContent {
    fn from(example: &Example) -> Self {
        Self {
            id: example.id,
            name: example.name.clone(),
            description: example.description.clone(),
            industry: example.industry.clone(),
            kind: ContentKind::Example,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_kind_case_insensitive() {
        assert_eq!(ContentKind::from_section_type("video"), Some(ContentKind::Video));
        assert_eq!(ContentKind::from_section_type("Resource"), Some(ContentKind::Resource));
        assert_eq!(ContentKind::from_section_type("EXAMPLE"), Some(ContentKind::Example));
        assert_eq!(ContentKind::from_section_type("ASSIGNMENT"), None);
        assert_eq!(ContentKind::from_section_type(""), None);
    }

    #[test]
    fn test_video_shell_serialization() {
        let shell = SectionContent::Video(VideoContent::shell(100, Vec::new(), Vec::new()));

        assert_eq!(
            serde_json::to_value(&shell).unwrap(),
            json!({"id": 100, "type": "video", "resources": [], "examples": []})
        );
    }

    #[test]
    fn test_full_video_serialization() {
        let video = Video {
            id: 100,
            name: "Intro".to_string(),
            description: None,
            url: Some("https://video.test/100".to_string()),
            transcript: Some("Hello.".to_string()),
        };
        let content = SectionContent::Video(VideoContent::from_row(&video, Vec::new(), Vec::new()));

        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value["id"], 100);
        assert_eq!(value["name"], "Intro");
        assert_eq!(value["transcript"], "Hello.");
        assert_eq!(value["type"], "video");
        assert!(value["description"].is_null());
    }

    #[test]
    fn test_example_serialization() {
        let example = Example {
            id: 3,
            name: "Retail churn".to_string(),
            description: Some("case".to_string()),
            industry: Some("Retail".to_string()),
        };

        assert_eq!(
            serde_json::to_value(SectionContent::Example((&example).into())).unwrap(),
            json!({
                "id": 3,
                "name": "Retail churn",
                "description": "case",
                "industry": "Retail",
                "type": "example"
            })
        );
    }
}
