//! crates/robokit_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the storefront's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the REST backend and of where the session is persisted.

use crate::domain::{
    AuthSession, Course, CourseId, CourseListQuery, CoursePatch, Credentials, FileAssociation,
    Lesson, NewCourse, NewLesson, StoredFile, StoredImage, Upload, User,
};
use async_trait::async_trait;
use std::sync::RwLock;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the transport and the backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    /// The collaborator could not be reached.
    #[error("Network error: {0}")]
    Network(String),
    /// The collaborator answered with `success: false`.
    #[error("{0}")]
    Backend(String),
    /// The collaborator answered with a body that does not match the expected schema.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn create_course(&self, course: &NewCourse) -> PortResult<Course>;

    async fn get_course(&self, id: CourseId) -> PortResult<Course>;

    async fn list_courses(&self, query: &CourseListQuery) -> PortResult<Vec<Course>>;

    async fn update_course(&self, id: CourseId, patch: &CoursePatch) -> PortResult<Course>;

    async fn delete_course(&self, id: CourseId) -> PortResult<()>;

    async fn list_categories(&self) -> PortResult<Vec<String>>;
}

#[async_trait]
pub trait LessonStore: Send + Sync {
    async fn create_lesson(&self, lesson: &NewLesson) -> PortResult<Lesson>;

    /// Lessons of a course, in lesson order.
    async fn list_lessons(&self, course_id: CourseId) -> PortResult<Vec<Lesson>>;
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload_image(&self, image: &Upload) -> PortResult<StoredImage>;

    async fn upload_pdf(&self, pdf: &Upload) -> PortResult<StoredFile>;

    async fn associate(&self, association: &FileAssociation) -> PortResult<()>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> PortResult<AuthSession>;

    /// Checks that the currently persisted token is still accepted.
    async fn verify(&self) -> PortResult<()>;

    async fn logout(&self) -> PortResult<()>;

    async fn profile(&self) -> PortResult<User>;
}

//=========================================================================================
// Session Persistence
//=========================================================================================

/// Key-value persistence of the bearer token and the account it belongs to.
///
/// Reads happen before every authenticated request, so implementations must be cheap
/// and must never cache a token that has since been cleared.
pub trait SessionStore: Send + Sync {
    fn token(&self) -> Option<String>;

    fn user(&self) -> Option<User>;

    fn save(&self, session: &AuthSession) -> PortResult<()>;

    fn clear(&self) -> PortResult<()>;
}

/// A `SessionStore` that lives for the duration of the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Option<AuthSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: AuthSession) -> Self {
        Self {
            inner: RwLock::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|s| s.token.clone()))
    }

    fn user(&self) -> Option<User> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|s| s.user.clone()))
    }

    fn save(&self, session: &AuthSession) -> PortResult<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|e| PortError::Unexpected(format!("session lock poisoned: {}", e)))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|e| PortError::Unexpected(format!("session lock poisoned: {}", e)))?;
        *guard = None;
        Ok(())
    }
}
