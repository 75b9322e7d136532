//! services/storefront/src/adapters/wire.rs
//!
//! "Impure" record structs mirroring the backend's JSON, and their conversion into
//! the core domain types. Shape mismatches are reported as `PortError::InvalidResponse`
//! here, at the boundary, instead of leaking half-filled values into the core.

use chrono::{DateTime, NaiveDateTime, Utc};
use robokit_core::domain::{
    AuthSession, Course, CourseId, CoursePatch, CourseStatus, CoverImage, Difficulty,
    FileAssociation, FileId, FileRef, Lesson, LessonId, NewCourse, NewLesson, Role, StoredFile,
    StoredImage, User, LESSON_PDF_PURPOSE,
};
use robokit_core::ports::{PortError, PortResult};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

//=========================================================================================
// Lenient Scalar Decoding
//=========================================================================================
// MySQL DECIMAL and TINYINT columns arrive as strings or as 0/1, so numbers and
// booleans accept either form. Anything else is rejected.
//=========================================================================================

fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => number_from(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected a number, got {}", value))),
    }
}

fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = opt_f64(deserializer)? else {
        return Ok(None);
    };
    if number < 0.0 || number.fract() != 0.0 || number > f64::from(u32::MAX) {
        return Err(de::Error::custom(format!(
            "expected a non-negative integer, got {}",
            number
        )));
    }
    Ok(Some(number as u32))
}

fn flexible_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| de::Error::custom(format!("expected an integer id, got {}", value)))
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(true),
        Some(Value::Bool(b)) => Ok(b),
        Some(value) => match number_from(&value) {
            Some(n) => Ok(n != 0.0),
            None => Err(de::Error::custom(format!("expected a boolean, got {}", value))),
        },
    }
}

fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
}

fn default_true() -> bool {
    true
}

//=========================================================================================
// Response Envelope
//=========================================================================================

/// The `{success, data, message}` wrapper around every backend response.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Decodes the `data` member into a record type.
pub fn decode_data<T: serde::de::DeserializeOwned>(data: Option<Value>) -> PortResult<T> {
    serde_json::from_value(data.unwrap_or(Value::Null))
        .map_err(|e| PortError::InvalidResponse(e.to_string()))
}

//=========================================================================================
// Read Records
//=========================================================================================

#[derive(Debug, Deserialize)]
pub struct CourseRecord {
    #[serde(deserialize_with = "flexible_id")]
    id: i64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    general_objective: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty_level: Option<String>,
    #[serde(default, deserialize_with = "opt_f64")]
    price: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    original_price: Option<f64>,
    #[serde(default, deserialize_with = "opt_u32")]
    age_min: Option<u32>,
    #[serde(default, deserialize_with = "opt_u32")]
    age_max: Option<u32>,
    #[serde(default, deserialize_with = "opt_u32")]
    duration_hours: Option<u32>,
    #[serde(default, deserialize_with = "opt_u32")]
    activities_count: Option<u32>,
    #[serde(default)]
    cover_image_url: Option<String>,
    #[serde(default)]
    cover_image_public_id: Option<String>,
    #[serde(default)]
    components_included: Option<String>,
    #[serde(default, deserialize_with = "opt_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default = "default_true", deserialize_with = "flexible_bool")]
    is_active: bool,
}

impl CourseRecord {
    pub fn to_domain(self) -> PortResult<Course> {
        let difficulty_level = match self.difficulty_level.as_deref() {
            None | Some("") => Difficulty::default(),
            Some(raw) => raw.parse().map_err(PortError::InvalidResponse)?,
        };
        let status = match self.status.as_deref() {
            None | Some("") => CourseStatus::default(),
            Some(raw) => raw.parse().map_err(PortError::InvalidResponse)?,
        };
        let cover_image = self.cover_image_url.map(|url| CoverImage {
            url,
            public_id: self.cover_image_public_id.unwrap_or_default(),
        });
        Ok(Course {
            id: CourseId(self.id),
            title: self.title,
            description: self.description.unwrap_or_default(),
            general_objective: self.general_objective,
            category: self.category,
            difficulty_level,
            price: self.price,
            original_price: self.original_price,
            age_min: self.age_min,
            age_max: self.age_max,
            duration_hours: self.duration_hours,
            activities_count: self.activities_count,
            cover_image,
            components_included: self.components_included,
            created_at: self.created_at,
            status,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LessonFileRecord {
    #[serde(alias = "file_id", deserialize_with = "flexible_id")]
    id: i64,
    cloudinary_url: String,
    #[serde(default)]
    original_name: Option<String>,
    #[serde(default)]
    file_purpose: Option<String>,
    #[serde(default, deserialize_with = "opt_u32")]
    display_order: Option<u32>,
}

impl LessonFileRecord {
    fn to_domain(self) -> FileRef {
        FileRef {
            id: FileId(self.id),
            url: self.cloudinary_url,
            original_name: self.original_name.unwrap_or_default(),
            purpose: self
                .file_purpose
                .unwrap_or_else(|| LESSON_PDF_PURPOSE.to_string()),
            display_order: self.display_order.unwrap_or(1),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LessonRecord {
    #[serde(deserialize_with = "flexible_id")]
    id: i64,
    #[serde(deserialize_with = "flexible_id")]
    course_id: i64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "opt_u32")]
    lesson_order: Option<u32>,
    #[serde(default, deserialize_with = "opt_u32")]
    duration_minutes: Option<u32>,
    #[serde(default)]
    files: Vec<LessonFileRecord>,
}

impl LessonRecord {
    pub fn to_domain(self) -> Lesson {
        let file = self
            .files
            .into_iter()
            .filter(|f| f.file_purpose.as_deref().map_or(true, |p| p == LESSON_PDF_PURPOSE))
            .min_by_key(|f| f.display_order.unwrap_or(1))
            .map(LessonFileRecord::to_domain);
        Lesson {
            id: LessonId(self.id),
            course_id: CourseId(self.course_id),
            title: self.title,
            description: self.description,
            lesson_order: self.lesson_order.unwrap_or(0),
            duration_minutes: self.duration_minutes.unwrap_or(30),
            file,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadedImageRecord {
    cloudinary_url: String,
    cloudinary_public_id: String,
}

impl UploadedImageRecord {
    pub fn to_domain(self) -> StoredImage {
        StoredImage {
            url: self.cloudinary_url,
            public_id: self.cloudinary_public_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadedPdfRecord {
    #[serde(deserialize_with = "flexible_id")]
    id: i64,
    cloudinary_url: String,
    #[serde(default)]
    original_name: Option<String>,
}

impl UploadedPdfRecord {
    pub fn to_domain(self) -> StoredFile {
        StoredFile {
            id: FileId(self.id),
            url: self.cloudinary_url,
            original_name: self.original_name.unwrap_or_default(),
        }
    }
}

/// The account object; the login handle travels in a field named `user`.
#[derive(Debug, Deserialize, Serialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "flexible_id")]
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub user: String,
    pub role: String,
}

impl UserRecord {
    pub fn to_domain(self) -> PortResult<User> {
        let role: Role = self.role.parse().map_err(PortError::InvalidResponse)?;
        Ok(User {
            id: self.id,
            name: self.name,
            handle: self.user,
            role,
        })
    }

    pub fn from_domain(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            user: user.handle.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}

/// The profile endpoint answers with the account either bare or under `user`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProfileRecord {
    Wrapped { user: UserRecord },
    Bare(UserRecord),
}

impl ProfileRecord {
    pub fn to_domain(self) -> PortResult<User> {
        match self {
            ProfileRecord::Wrapped { user } | ProfileRecord::Bare(user) => user.to_domain(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRecord {
    token: String,
    user: UserRecord,
}

impl LoginRecord {
    pub fn to_domain(self) -> PortResult<AuthSession> {
        if self.token.trim().is_empty() {
            return Err(PortError::InvalidResponse("login returned an empty token".to_string()));
        }
        Ok(AuthSession {
            token: self.token,
            user: self.user.to_domain()?,
        })
    }
}

//=========================================================================================
// Write Bodies
//=========================================================================================

#[derive(Debug, Serialize)]
pub struct NewCourseBody<'a> {
    title: &'a str,
    description: &'a str,
    general_objective: &'a str,
    category: &'a str,
    difficulty_level: &'static str,
    price: f64,
    age_min: u32,
    age_max: u32,
    activities_count: u32,
    duration_hours: u32,
    components_included: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cover_image_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cover_image_public_id: Option<&'a str>,
}

impl<'a> From<&'a NewCourse> for NewCourseBody<'a> {
    fn from(course: &'a NewCourse) -> Self {
        Self {
            title: &course.title,
            description: &course.description,
            general_objective: &course.general_objective,
            category: &course.category,
            difficulty_level: course.difficulty_level.as_str(),
            price: course.price,
            age_min: course.age_min,
            age_max: course.age_max,
            activities_count: course.activities_count,
            duration_hours: course.duration_hours,
            components_included: &course.components_included,
            cover_image_url: course.cover_image.as_ref().map(|c| c.url.as_str()),
            cover_image_public_id: course.cover_image.as_ref().map(|c| c.public_id.as_str()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewLessonBody<'a> {
    course_id: i64,
    title: &'a str,
    description: &'a str,
    lesson_order: u32,
    duration_minutes: u32,
    is_active: u8,
}

impl<'a> From<&'a NewLesson> for NewLessonBody<'a> {
    fn from(lesson: &'a NewLesson) -> Self {
        Self {
            course_id: lesson.course_id.0,
            title: &lesson.title,
            description: &lesson.description,
            lesson_order: lesson.lesson_order,
            duration_minutes: lesson.duration_minutes,
            is_active: 1,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileAssociationBody<'a> {
    lesson_id: i64,
    file_id: i64,
    file_purpose: &'a str,
    display_order: u32,
}

impl<'a> From<&'a FileAssociation> for FileAssociationBody<'a> {
    fn from(association: &'a FileAssociation) -> Self {
        Self {
            lesson_id: association.lesson_id.0,
            file_id: association.file_id.0,
            file_purpose: &association.purpose,
            display_order: association.display_order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CoursePatchBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
}

impl From<&CoursePatch> for CoursePatchBody {
    fn from(patch: &CoursePatch) -> Self {
        Self {
            status: patch.status.map(CourseStatus::as_str),
            is_active: patch.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub user: &'a str,
    pub password: &'a str,
}
