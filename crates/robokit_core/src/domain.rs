//! crates/robokit_core/src/domain.rs
//!
//! Defines the pure, core data structures for the storefront.
//! These structs are independent of the REST backend and of any serialization format.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Identifiers
//=========================================================================================

/// Backend-issued identifier of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseId(pub i64);

/// Backend-issued identifier of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LessonId(pub i64);

/// Backend-issued identifier of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub i64);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//=========================================================================================
// Enumerations
//=========================================================================================

/// The difficulty a course is targeted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// The value stored by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    /// The label shown to shoppers.
    pub fn display_label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Principiante",
            Difficulty::Intermediate => "Intermedio",
            Difficulty::Advanced => "Avanzado",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "principiante" => Ok(Difficulty::Beginner),
            "intermediate" | "intermedio" => Ok(Difficulty::Intermediate),
            "advanced" | "avanzado" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty level '{}'", other)),
        }
    }
}

/// Publication status of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CourseStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

impl CourseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CourseStatus::Draft => "draft",
            CourseStatus::Published => "published",
            CourseStatus::Archived => "archived",
        }
    }
}

impl FromStr for CourseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(CourseStatus::Draft),
            "published" => Ok(CourseStatus::Published),
            "archived" => Ok(CourseStatus::Archived),
            other => Err(format!("unknown course status '{}'", other)),
        }
    }
}

/// Role attached to an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Customer => "user",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            "user" | "customer" => Ok(Role::Customer),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

//=========================================================================================
// Catalog Records
//=========================================================================================

/// Hosted cover image of a course.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverImage {
    pub url: String,
    pub public_id: String,
}

/// A purchasable educational kit.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub general_objective: Option<String>,
    pub category: Option<String>,
    pub difficulty_level: Difficulty,
    /// Missing prices are treated as free.
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub duration_hours: Option<u32>,
    pub activities_count: Option<u32>,
    pub cover_image: Option<CoverImage>,
    /// Newline-delimited list of the kit's components.
    pub components_included: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub status: CourseStatus,
    pub is_active: bool,
}

impl Course {
    pub fn effective_price(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }

    /// Discount against the original price, in whole percent.
    ///
    /// Only present when the original price is strictly above the current price.
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?;
        let price = self.effective_price();
        if original > price && original > 0.0 {
            Some(((original - price) / original * 100.0).round() as u32)
        } else {
            None
        }
    }

    /// `Gratis` for free kits, `$12.50` otherwise.
    pub fn price_label(&self) -> String {
        let price = self.effective_price();
        if price > 0.0 {
            format!("${:.2}", price)
        } else {
            "Gratis".to_string()
        }
    }

    /// The individual entries of `components_included`.
    pub fn components(&self) -> Vec<&str> {
        self.components_included
            .as_deref()
            .map(|text| {
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A file attached to a lesson.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRef {
    pub id: FileId,
    pub url: String,
    pub original_name: String,
    pub purpose: String,
    pub display_order: u32,
}

/// An ordered sub-unit of a course.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub id: LessonId,
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    /// 1-based position among the course's lessons.
    pub lesson_order: u32,
    pub duration_minutes: u32,
    pub file: Option<FileRef>,
}

//=========================================================================================
// Accounts
//=========================================================================================

/// An authenticated account as returned by the auth collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    /// The login handle; the backend calls this field `user`.
    pub handle: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Staff)
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

/// A bearer token together with the account it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

//=========================================================================================
// Write Payloads
//=========================================================================================

/// A binary file handed to the file store.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Result of uploading a cover image.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    pub url: String,
    pub public_id: String,
}

/// Result of uploading a lesson document.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub id: FileId,
    pub url: String,
    pub original_name: String,
}

/// The course payload submitted to the course store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub general_objective: String,
    pub category: String,
    pub difficulty_level: Difficulty,
    pub price: f64,
    pub age_min: u32,
    pub age_max: u32,
    pub activities_count: u32,
    pub duration_hours: u32,
    pub components_included: String,
    pub cover_image: Option<CoverImage>,
}

/// The lesson payload submitted to the lesson store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLesson {
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub lesson_order: u32,
    pub duration_minutes: u32,
}

/// Purpose tag used when linking a lesson's document.
pub const LESSON_PDF_PURPOSE: &str = "lesson_pdf";

/// Links an uploaded file to a lesson.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAssociation {
    pub lesson_id: LessonId,
    pub file_id: FileId,
    pub purpose: String,
    pub display_order: u32,
}

/// Partial update of a course.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoursePatch {
    pub status: Option<CourseStatus>,
    pub is_active: Option<bool>,
}

/// Server-side narrowing of the course listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseListQuery {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub include_inactive: bool,
}
