//! crates/robokit_core/src/authoring.rs
//!
//! The course authoring workflow: uploads the cover image, creates the course, then
//! creates each lesson (with its optional PDF) one after the other.
//!
//! Failures before the course exists abort the run. Failures of a single lesson are
//! recorded in the returned `AuthoringReport` and the run moves on to the next draft.

use crate::domain::{
    Course, CoverImage, Difficulty, FileAssociation, Lesson, NewCourse, NewLesson, StoredFile,
    Upload, LESSON_PDF_PURPOSE,
};
use crate::ports::{CourseStore, FileStore, LessonStore, PortError};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

const DEFAULT_AGE_MIN: u32 = 5;
const DEFAULT_AGE_MAX: u32 = 16;
const DEFAULT_LESSON_MINUTES: u32 = 30;
const COURSE_CREATION_FALLBACK: &str = "Error al crear el curso";

//=========================================================================================
// Inputs
//=========================================================================================

/// The course form as typed by an administrator. Numeric fields stay raw text
/// until the payload is assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseForm {
    pub title: String,
    pub description: String,
    pub general_objective: String,
    pub category: String,
    pub difficulty_level: Difficulty,
    pub price: String,
    pub age_min: String,
    pub age_max: String,
    pub activities_count: String,
    pub duration_hours: String,
    pub components_included: String,
}

impl Default for CourseForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            general_objective: String::new(),
            category: String::new(),
            difficulty_level: Difficulty::Beginner,
            price: String::new(),
            age_min: DEFAULT_AGE_MIN.to_string(),
            age_max: DEFAULT_AGE_MAX.to_string(),
            activities_count: String::new(),
            duration_hours: String::new(),
            components_included: String::new(),
        }
    }
}

/// A lesson waiting to be created, in authoring order.
#[derive(Debug, Clone)]
pub struct LessonDraft {
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub pdf: Option<Upload>,
}

impl LessonDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            duration_minutes: DEFAULT_LESSON_MINUTES,
            pdf: None,
        }
    }
}

//=========================================================================================
// Errors
//=========================================================================================

/// A form field that must not be blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Description,
    GeneralObjective,
    Category,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequiredField::Title => "title",
            RequiredField::Description => "description",
            RequiredField::GeneralObjective => "general_objective",
            RequiredField::Category => "category",
        };
        f.write_str(name)
    }
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Problems detected before any collaborator is called.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<RequiredField>),
    #[error("price must not be negative (got {0})")]
    NegativePrice(f64),
    #[error("age_min ({min}) must not be greater than age_max ({max})")]
    InvertedAgeRange { min: u32, max: u32 },
    #[error("lesson {position} must last at least one minute")]
    ZeroDuration { position: usize },
}

/// Failures that abort the whole workflow.
#[derive(Debug, thiserror::Error)]
pub enum AuthoringError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Error al subir la imagen de portada: {0}")]
    ImageUpload(#[source] PortError),
    #[error("{message}")]
    CourseCreation {
        message: String,
        #[source]
        source: PortError,
    },
}

impl AuthoringError {
    fn course_creation(source: PortError) -> Self {
        let message = match &source {
            PortError::Backend(message) if !message.trim().is_empty() => message.clone(),
            PortError::Backend(_) => COURSE_CREATION_FALLBACK.to_string(),
            other => other.to_string(),
        };
        AuthoringError::CourseCreation { message, source }
    }
}

//=========================================================================================
// Report
//=========================================================================================

/// The step of a lesson's cycle that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonStage {
    PdfUpload,
    LessonCreation,
    FileAssociation,
}

impl fmt::Display for LessonStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LessonStage::PdfUpload => "PDF upload",
            LessonStage::LessonCreation => "lesson creation",
            LessonStage::FileAssociation => "file association",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LessonStatus {
    /// The lesson exists and, when a PDF was supplied, the PDF is linked.
    Created {
        lesson: Lesson,
        file: Option<StoredFile>,
    },
    /// The lesson exists but its uploaded PDF could not be linked.
    LinkFailed {
        lesson: Lesson,
        file: StoredFile,
        error: PortError,
    },
    /// The lesson was not created.
    Failed { stage: LessonStage, error: PortError },
    /// The run was cancelled before this draft was reached.
    Cancelled,
}

/// What happened to one lesson draft.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonOutcome {
    /// 1-based position of the draft in the authoring list.
    pub position: usize,
    pub title: String,
    pub status: LessonStatus,
}

impl LessonOutcome {
    pub fn lesson(&self) -> Option<&Lesson> {
        match &self.status {
            LessonStatus::Created { lesson, .. } | LessonStatus::LinkFailed { lesson, .. } => {
                Some(lesson)
            }
            LessonStatus::Failed { .. } | LessonStatus::Cancelled => None,
        }
    }
}

/// The created course together with the fate of every lesson draft.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthoringReport {
    pub course: Course,
    pub lessons: Vec<LessonOutcome>,
}

impl AuthoringReport {
    pub fn created_lessons(&self) -> Vec<&Lesson> {
        self.lessons.iter().filter_map(LessonOutcome::lesson).collect()
    }

    /// Drafts the workflow actually started on.
    pub fn attempted(&self) -> usize {
        self.lessons
            .iter()
            .filter(|o| o.status != LessonStatus::Cancelled)
            .count()
    }

    /// Positions of drafts that produced no lesson.
    pub fn failed_positions(&self) -> Vec<usize> {
        self.lessons
            .iter()
            .filter(|o| matches!(o.status, LessonStatus::Failed { .. }))
            .map(|o| o.position)
            .collect()
    }

    /// Positions of lessons whose PDF is not linked.
    pub fn unlinked_positions(&self) -> Vec<usize> {
        self.lessons
            .iter()
            .filter(|o| matches!(o.status, LessonStatus::LinkFailed { .. }))
            .map(|o| o.position)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.lessons
            .iter()
            .all(|o| matches!(o.status, LessonStatus::Created { .. }))
    }
}

//=========================================================================================
// Payload Assembly
//=========================================================================================

impl CourseForm {
    /// Checks the form and the drafts without contacting any collaborator.
    pub fn validate(&self, drafts: &[LessonDraft]) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push(RequiredField::Title);
        }
        if self.description.trim().is_empty() {
            missing.push(RequiredField::Description);
        }
        if self.general_objective.trim().is_empty() {
            missing.push(RequiredField::GeneralObjective);
        }
        if self.category.trim().is_empty() {
            missing.push(RequiredField::Category);
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let price = parse_price(&self.price);
        if price < 0.0 {
            return Err(ValidationError::NegativePrice(price));
        }
        let (min, max) = self.age_bounds();
        if min > max {
            return Err(ValidationError::InvertedAgeRange { min, max });
        }
        if let Some(index) = drafts.iter().position(|d| d.duration_minutes == 0) {
            return Err(ValidationError::ZeroDuration { position: index + 1 });
        }
        Ok(())
    }

    fn age_bounds(&self) -> (u32, u32) {
        (
            parse_count(&self.age_min, DEFAULT_AGE_MIN),
            parse_count(&self.age_max, DEFAULT_AGE_MAX),
        )
    }

    /// Builds the course payload with numeric fields coerced to their types.
    pub fn to_new_course(&self, cover_image: Option<CoverImage>) -> NewCourse {
        let (age_min, age_max) = self.age_bounds();
        NewCourse {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            general_objective: self.general_objective.trim().to_string(),
            category: self.category.trim().to_string(),
            difficulty_level: self.difficulty_level,
            price: parse_price(&self.price),
            age_min,
            age_max,
            activities_count: parse_count(&self.activities_count, 0),
            duration_hours: parse_count(&self.duration_hours, 0),
            components_included: self.components_included.clone(),
            cover_image,
        }
    }
}

/// Parses the leading number of a price, so `"12.5 USD"` is 12.5.
/// Blank or unreadable input means free.
fn parse_price(raw: &str) -> f64 {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    end = digits_from(end);
    if bytes.get(end) == Some(&b'.') {
        end = digits_from(end + 1);
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    raw[..end]
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
}

/// Parses the leading digits of `raw`. Blank, unreadable or zero input
/// falls back to `default`.
fn parse_count(raw: &str, default: u32) -> u32 {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits
        .parse()
        .ok()
        .filter(|n| *n != 0)
        .unwrap_or(default)
}

//=========================================================================================
// Workflow
//=========================================================================================

/// Runs the authoring workflow against the course, lesson and file collaborators.
#[derive(Clone)]
pub struct CourseAuthoring {
    courses: Arc<dyn CourseStore>,
    lessons: Arc<dyn LessonStore>,
    files: Arc<dyn FileStore>,
}

impl CourseAuthoring {
    pub fn new(
        courses: Arc<dyn CourseStore>,
        lessons: Arc<dyn LessonStore>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            courses,
            lessons,
            files,
        }
    }

    /// Creates a course and its lessons.
    ///
    /// Lessons are created strictly in order. A lesson's order index is its position
    /// among the lessons created so far, so a skipped draft leaves no gap. Once
    /// `cancel` fires, the remaining drafts are reported as cancelled without being
    /// sent anywhere.
    pub async fn create_course(
        &self,
        form: &CourseForm,
        cover_image: Option<&Upload>,
        drafts: &[LessonDraft],
        cancel: &CancellationToken,
    ) -> Result<AuthoringReport, AuthoringError> {
        let span = info_span!("create_course", run_id = %Uuid::new_v4(), title = %form.title);
        self.run(form, cover_image, drafts, cancel)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        form: &CourseForm,
        cover_image: Option<&Upload>,
        drafts: &[LessonDraft],
        cancel: &CancellationToken,
    ) -> Result<AuthoringReport, AuthoringError> {
        form.validate(drafts)?;

        // --- 1. Cover image ---
        let cover = match cover_image {
            Some(image) => {
                let stored = self.files.upload_image(image).await.map_err(|e| {
                    error!("Cover image upload failed: {}", e);
                    AuthoringError::ImageUpload(e)
                })?;
                info!("Cover image uploaded to {}", stored.url);
                Some(CoverImage {
                    url: stored.url,
                    public_id: stored.public_id,
                })
            }
            None => None,
        };

        // --- 2. Course record ---
        let payload = form.to_new_course(cover);
        let course = self.courses.create_course(&payload).await.map_err(|e| {
            error!("Course creation failed: {}", e);
            AuthoringError::course_creation(e)
        })?;
        info!("Course {} created. Creating {} lessons.", course.id, drafts.len());

        // --- 3. Lessons, one full cycle at a time ---
        let mut outcomes = Vec::with_capacity(drafts.len());
        let mut next_order = 1;
        for (index, draft) in drafts.iter().enumerate() {
            let position = index + 1;
            let status = if cancel.is_cancelled() {
                LessonStatus::Cancelled
            } else {
                self.create_lesson(&course, draft, position, next_order).await
            };
            if matches!(
                status,
                LessonStatus::Created { .. } | LessonStatus::LinkFailed { .. }
            ) {
                next_order += 1;
            }
            outcomes.push(LessonOutcome {
                position,
                title: draft.title.clone(),
                status,
            });
        }

        let report = AuthoringReport {
            course,
            lessons: outcomes,
        };
        info!(
            "Authoring finished: {}/{} lessons created.",
            report.created_lessons().len(),
            drafts.len()
        );
        Ok(report)
    }

    async fn create_lesson(
        &self,
        course: &Course,
        draft: &LessonDraft,
        position: usize,
        lesson_order: u32,
    ) -> LessonStatus {
        let uploaded = match &draft.pdf {
            Some(pdf) => match self.files.upload_pdf(pdf).await {
                Ok(file) => Some(file),
                Err(error) => {
                    warn!("Lesson {}: PDF upload failed, skipping lesson: {}", position, error);
                    return LessonStatus::Failed {
                        stage: LessonStage::PdfUpload,
                        error,
                    };
                }
            },
            None => None,
        };

        let new_lesson = NewLesson {
            course_id: course.id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            lesson_order,
            duration_minutes: draft.duration_minutes,
        };
        let lesson = match self.lessons.create_lesson(&new_lesson).await {
            Ok(lesson) => lesson,
            Err(error) => {
                warn!("Lesson {}: creation failed: {}", position, error);
                return LessonStatus::Failed {
                    stage: LessonStage::LessonCreation,
                    error,
                };
            }
        };

        let Some(file) = uploaded else {
            return LessonStatus::Created { lesson, file: None };
        };

        let association = FileAssociation {
            lesson_id: lesson.id,
            file_id: file.id,
            purpose: LESSON_PDF_PURPOSE.to_string(),
            display_order: 1,
        };
        match self.files.associate(&association).await {
            Ok(()) => LessonStatus::Created {
                lesson,
                file: Some(file),
            },
            Err(error) => {
                warn!("Lesson {}: linking file {} failed: {}", position, file.id, error);
                LessonStatus::LinkFailed { lesson, file, error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::course;
    use crate::domain::{
        CourseId, CourseListQuery, CoursePatch, FileId, LessonId, StoredImage,
    };
    use crate::ports::PortResult;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        UploadImage(String),
        CreateCourse(NewCourse),
        UploadPdf(String),
        CreateLesson(NewLesson),
        Associate(FileAssociation),
    }

    /// An in-memory backend that records every call and fails on demand.
    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<Call>>,
        fail_image: bool,
        fail_course: Option<PortError>,
        fail_pdfs: Vec<String>,
        fail_lessons: Vec<String>,
        fail_links: bool,
        cancel_after_lessons: Option<(usize, CancellationToken)>,
    }

    impl FakeBackend {
        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn lesson_calls(&self) -> Vec<NewLesson> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::CreateLesson(lesson) => Some(lesson),
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl CourseStore for FakeBackend {
        async fn create_course(&self, payload: &NewCourse) -> PortResult<Course> {
            self.record(Call::CreateCourse(payload.clone()));
            if let Some(error) = &self.fail_course {
                return Err(error.clone());
            }
            let mut created = course(42, &payload.title);
            created.cover_image = payload.cover_image.clone();
            Ok(created)
        }

        async fn get_course(&self, id: CourseId) -> PortResult<Course> {
            Err(PortError::NotFound(id.to_string()))
        }

        async fn list_courses(&self, _query: &CourseListQuery) -> PortResult<Vec<Course>> {
            Ok(Vec::new())
        }

        async fn update_course(&self, id: CourseId, _patch: &CoursePatch) -> PortResult<Course> {
            Err(PortError::NotFound(id.to_string()))
        }

        async fn delete_course(&self, _id: CourseId) -> PortResult<()> {
            Ok(())
        }

        async fn list_categories(&self) -> PortResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl LessonStore for FakeBackend {
        async fn create_lesson(&self, lesson: &NewLesson) -> PortResult<Lesson> {
            self.record(Call::CreateLesson(lesson.clone()));
            if self.fail_lessons.contains(&lesson.title) {
                return Err(PortError::Backend("lesson rejected".to_string()));
            }
            let created = self.lesson_calls().len();
            if let Some((limit, token)) = &self.cancel_after_lessons {
                if created >= *limit {
                    token.cancel();
                }
            }
            Ok(Lesson {
                id: LessonId(100 + created as i64),
                course_id: lesson.course_id,
                title: lesson.title.clone(),
                description: Some(lesson.description.clone()),
                lesson_order: lesson.lesson_order,
                duration_minutes: lesson.duration_minutes,
                file: None,
            })
        }

        async fn list_lessons(&self, _course_id: CourseId) -> PortResult<Vec<Lesson>> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl FileStore for FakeBackend {
        async fn upload_image(&self, image: &Upload) -> PortResult<StoredImage> {
            self.record(Call::UploadImage(image.file_name.clone()));
            if self.fail_image {
                return Err(PortError::Network("connection reset".to_string()));
            }
            Ok(StoredImage {
                url: "https://cdn.example/cover.png".to_string(),
                public_id: "covers/abc".to_string(),
            })
        }

        async fn upload_pdf(&self, pdf: &Upload) -> PortResult<StoredFile> {
            self.record(Call::UploadPdf(pdf.file_name.clone()));
            if self.fail_pdfs.contains(&pdf.file_name) {
                return Err(PortError::Backend("Error al subir PDF".to_string()));
            }
            Ok(StoredFile {
                id: FileId(pdf.file_name.len() as i64),
                url: format!("https://cdn.example/{}", pdf.file_name),
                original_name: pdf.file_name.clone(),
            })
        }

        async fn associate(&self, association: &FileAssociation) -> PortResult<()> {
            self.record(Call::Associate(association.clone()));
            if self.fail_links {
                return Err(PortError::Network("timeout".to_string()));
            }
            Ok(())
        }
    }

    fn authoring(backend: &Arc<FakeBackend>) -> CourseAuthoring {
        CourseAuthoring::new(backend.clone(), backend.clone(), backend.clone())
    }

    fn form() -> CourseForm {
        CourseForm {
            title: "Robot Seguidor de Línea".to_string(),
            description: "Construye un robot que sigue líneas".to_string(),
            general_objective: "Aprender sensores infrarrojos".to_string(),
            category: "Robótica Básica".to_string(),
            price: "79.99".to_string(),
            ..CourseForm::default()
        }
    }

    fn pdf(name: &str) -> Upload {
        Upload::new(name, "application/pdf", b"%PDF-1.4".to_vec())
    }

    fn draft_with_pdf(title: &str, file: &str) -> LessonDraft {
        LessonDraft {
            pdf: Some(pdf(file)),
            ..LessonDraft::new(title)
        }
    }

    #[tokio::test]
    async fn missing_fields_abort_before_any_call() {
        let backend = Arc::new(FakeBackend::default());
        let mut incomplete = form();
        incomplete.category = "  ".to_string();
        incomplete.general_objective = String::new();

        let err = authoring(&backend)
            .create_course(&incomplete, None, &[LessonDraft::new("L1")], &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            AuthoringError::Validation(ValidationError::MissingFields(fields)) => {
                assert_eq!(
                    fields,
                    vec![RequiredField::GeneralObjective, RequiredField::Category]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn inverted_age_range_is_rejected_locally() {
        let backend = Arc::new(FakeBackend::default());
        let mut bad = form();
        bad.age_min = "12".to_string();
        bad.age_max = "8".to_string();

        let err = authoring(&backend)
            .create_course(&bad, None, &[], &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthoringError::Validation(ValidationError::InvertedAgeRange { min: 12, max: 8 })
        ));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn image_failure_creates_no_course() {
        let backend = Arc::new(FakeBackend {
            fail_image: true,
            ..FakeBackend::default()
        });
        let cover = Upload::new("cover.png", "image/png", vec![1, 2, 3]);

        let err = authoring(&backend)
            .create_course(&form(), Some(&cover), &[], &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthoringError::ImageUpload(_)));
        assert_eq!(backend.calls(), vec![Call::UploadImage("cover.png".to_string())]);
    }

    #[tokio::test]
    async fn course_payload_carries_coerced_numbers_and_cover() {
        let backend = Arc::new(FakeBackend::default());
        let mut typed = form();
        typed.price = "abc".to_string();
        typed.age_min = String::new();
        typed.activities_count = "12 actividades".to_string();
        let cover = Upload::new("cover.png", "image/png", vec![1]);

        let report = authoring(&backend)
            .create_course(&typed, Some(&cover), &[], &CancellationToken::new())
            .await
            .unwrap();

        let payload = backend
            .calls()
            .into_iter()
            .find_map(|c| match c {
                Call::CreateCourse(p) => Some(p),
                _ => None,
            })
            .unwrap();
        assert_eq!(payload.price, 0.0);
        assert_eq!(payload.age_min, 5);
        assert_eq!(payload.age_max, 16);
        assert_eq!(payload.activities_count, 12);
        assert_eq!(payload.duration_hours, 0);
        assert_eq!(
            payload.cover_image,
            Some(CoverImage {
                url: "https://cdn.example/cover.png".to_string(),
                public_id: "covers/abc".to_string(),
            })
        );
        assert!(report.lessons.is_empty());
        assert!(report.is_complete());
    }

    #[test]
    fn zero_ages_fall_back_and_price_keeps_its_leading_number() {
        let mut typed = form();
        typed.price = "12.5abc".to_string();
        typed.age_min = "0".to_string();
        typed.age_max = "0".to_string();

        assert_eq!(typed.validate(&[]), Ok(()));
        let payload = typed.to_new_course(None);
        assert_eq!(
            (payload.price, payload.age_min, payload.age_max),
            (12.5, 5, 16)
        );

        typed.price = "-5 pesos".to_string();
        assert_eq!(typed.validate(&[]), Err(ValidationError::NegativePrice(-5.0)));
        typed.price = ".5".to_string();
        assert_eq!(typed.to_new_course(None).price, 0.5);
        typed.price = "1e".to_string();
        assert_eq!(typed.to_new_course(None).price, 1.0);
    }

    #[tokio::test]
    async fn course_failure_surfaces_backend_message_and_skips_lessons() {
        let backend = Arc::new(FakeBackend {
            fail_course: Some(PortError::Backend("Título duplicado".to_string())),
            ..FakeBackend::default()
        });

        let err = authoring(&backend)
            .create_course(&form(), None, &[LessonDraft::new("L1")], &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Título duplicado");
        assert!(backend.lesson_calls().is_empty());
    }

    #[tokio::test]
    async fn blank_backend_message_falls_back_to_generic_text() {
        let backend = Arc::new(FakeBackend {
            fail_course: Some(PortError::Backend(String::new())),
            ..FakeBackend::default()
        });

        let err = authoring(&backend)
            .create_course(&form(), None, &[], &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), COURSE_CREATION_FALLBACK);
    }

    #[tokio::test]
    async fn failed_pdf_skips_only_that_lesson_and_keeps_orders_contiguous() {
        let backend = Arc::new(FakeBackend {
            fail_pdfs: vec!["dos.pdf".to_string()],
            ..FakeBackend::default()
        });
        let drafts = vec![
            draft_with_pdf("Uno", "uno.pdf"),
            draft_with_pdf("Dos", "dos.pdf"),
            draft_with_pdf("Tres", "tres.pdf"),
        ];

        let report = authoring(&backend)
            .create_course(&form(), None, &drafts, &CancellationToken::new())
            .await
            .unwrap();

        let created: Vec<(String, u32)> = report
            .created_lessons()
            .iter()
            .map(|l| (l.title.clone(), l.lesson_order))
            .collect();
        assert_eq!(
            created,
            vec![("Uno".to_string(), 1), ("Tres".to_string(), 2)]
        );
        assert_eq!(report.failed_positions(), vec![2]);
        assert_eq!(report.attempted(), 3);
        assert!(!report.is_complete());
        assert!(matches!(
            report.lessons[1].status,
            LessonStatus::Failed {
                stage: LessonStage::PdfUpload,
                ..
            }
        ));
        // Lesson "Dos" never reached the lesson store.
        assert_eq!(backend.lesson_calls().len(), 2);
    }

    #[tokio::test]
    async fn uploaded_pdfs_are_linked_to_their_lesson() {
        let backend = Arc::new(FakeBackend::default());
        let drafts = vec![LessonDraft::new("Intro"), draft_with_pdf("Motores", "motores.pdf")];

        let report = authoring(&backend)
            .create_course(&form(), None, &drafts, &CancellationToken::new())
            .await
            .unwrap();

        let links: Vec<FileAssociation> = backend
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Associate(a) => Some(a),
                _ => None,
            })
            .collect();
        assert_eq!(
            links,
            vec![FileAssociation {
                lesson_id: LessonId(102),
                file_id: FileId("motores.pdf".len() as i64),
                purpose: LESSON_PDF_PURPOSE.to_string(),
                display_order: 1,
            }]
        );
        assert!(report.is_complete());
        assert_eq!(report.created_lessons().len(), 2);
    }

    #[tokio::test]
    async fn lesson_creation_failure_is_recorded_and_run_continues() {
        let backend = Arc::new(FakeBackend {
            fail_lessons: vec!["Rota".to_string()],
            ..FakeBackend::default()
        });
        let drafts = vec![LessonDraft::new("Rota"), LessonDraft::new("Sana")];

        let report = authoring(&backend)
            .create_course(&form(), None, &drafts, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.failed_positions(), vec![1]);
        let survivors = report.created_lessons();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].lesson_order, 1);
    }

    #[tokio::test]
    async fn link_failure_keeps_lesson_but_flags_it() {
        let backend = Arc::new(FakeBackend {
            fail_links: true,
            ..FakeBackend::default()
        });
        let drafts = vec![draft_with_pdf("Sensores", "sensores.pdf"), LessonDraft::new("Cierre")];

        let report = authoring(&backend)
            .create_course(&form(), None, &drafts, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.created_lessons().len(), 2);
        assert_eq!(report.unlinked_positions(), vec![1]);
        assert!(report.failed_positions().is_empty());
        assert!(!report.is_complete());
        assert_eq!(report.created_lessons()[1].lesson_order, 2);
    }

    #[tokio::test]
    async fn cancellation_stops_remaining_lessons() {
        let token = CancellationToken::new();
        let backend = Arc::new(FakeBackend {
            cancel_after_lessons: Some((1, token.clone())),
            ..FakeBackend::default()
        });
        let drafts = vec![
            LessonDraft::new("A"),
            LessonDraft::new("B"),
            LessonDraft::new("C"),
        ];

        let report = authoring(&backend)
            .create_course(&form(), None, &drafts, &token)
            .await
            .unwrap();

        assert_eq!(report.created_lessons().len(), 1);
        assert_eq!(report.attempted(), 1);
        assert_eq!(report.lessons[1].status, LessonStatus::Cancelled);
        assert_eq!(report.lessons[2].status, LessonStatus::Cancelled);
        assert_eq!(backend.lesson_calls().len(), 1);
    }

    #[tokio::test]
    async fn zero_minute_lesson_is_rejected_up_front() {
        let backend = Arc::new(FakeBackend::default());
        let drafts = vec![LessonDraft::new("Ok"), LessonDraft {
            duration_minutes: 0,
            ..LessonDraft::new("Vacía")
        }];

        let err = authoring(&backend)
            .create_course(&form(), None, &drafts, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthoringError::Validation(ValidationError::ZeroDuration { position: 2 })
        ));
        assert!(backend.calls().is_empty());
    }
}
