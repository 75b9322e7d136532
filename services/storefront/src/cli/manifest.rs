//! The JSON manifest accepted by `course create`.
//!
//! Numeric fields may be written as numbers or as text, the same way an admin would
//! type them into the course form. File paths are resolved against the manifest's
//! own directory.

use crate::error::CliError;
use robokit_core::authoring::{CourseForm, LessonDraft};
use robokit_core::domain::Upload;
use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Deserialize)]
pub struct LessonManifest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub pdf: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct CourseManifest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub general_objective: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub age_min: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub age_max: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub activities_count: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub duration_hours: Option<String>,
    #[serde(default)]
    pub components_included: String,
    #[serde(default)]
    pub cover_image: Option<PathBuf>,
    #[serde(default)]
    pub lessons: Vec<LessonManifest>,
}

/// Everything the authoring workflow needs, with files already read into memory.
#[derive(Debug)]
pub struct AuthoringInput {
    pub form: CourseForm,
    pub cover_image: Option<Upload>,
    pub lessons: Vec<LessonDraft>,
}

impl CourseManifest {
    pub fn from_json(raw: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Fills in a `CourseForm` the way an empty form would start out.
    pub fn to_form(&self) -> Result<CourseForm, CliError> {
        let defaults = CourseForm::default();
        let difficulty_level = match self.difficulty_level.as_deref() {
            None | Some("") => defaults.difficulty_level,
            Some(raw) => raw.parse().map_err(CliError::Usage)?,
        };
        let or_default = |value: &Option<String>, fallback: String| value.clone().unwrap_or(fallback);
        Ok(CourseForm {
            title: self.title.clone(),
            description: self.description.clone(),
            general_objective: self.general_objective.clone(),
            category: self.category.clone(),
            difficulty_level,
            price: or_default(&self.price, defaults.price),
            age_min: or_default(&self.age_min, defaults.age_min),
            age_max: or_default(&self.age_max, defaults.age_max),
            activities_count: or_default(&self.activities_count, defaults.activities_count),
            duration_hours: or_default(&self.duration_hours, defaults.duration_hours),
            components_included: self.components_included.clone(),
        })
    }

    /// Reads the referenced files relative to `base_dir`.
    pub async fn load(self, base_dir: &Path) -> Result<AuthoringInput, CliError> {
        let form = self.to_form()?;
        let cover_image = match &self.cover_image {
            Some(path) => Some(read_upload(base_dir, path).await?),
            None => None,
        };
        let mut lessons = Vec::with_capacity(self.lessons.len());
        for entry in self.lessons {
            let mut draft = LessonDraft::new(entry.title);
            draft.description = entry.description;
            if let Some(minutes) = entry.duration_minutes {
                draft.duration_minutes = minutes;
            }
            if let Some(path) = &entry.pdf {
                draft.pdf = Some(read_upload(base_dir, path).await?);
            }
            lessons.push(draft);
        }
        Ok(AuthoringInput {
            form,
            cover_image,
            lessons,
        })
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

async fn read_upload(base_dir: &Path, path: &Path) -> Result<Upload, CliError> {
    let full = base_dir.join(path);
    let bytes = tokio::fs::read(&full).await.map_err(|e| {
        CliError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", full.display(), e),
        ))
    })?;
    let file_name = full
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Upload::new(file_name, content_type_for(&full), bytes))
}
