//! services/storefront/src/context.rs
//!
//! Wires the concrete adapters to the core ports once at startup.

use crate::adapters::{
    ApiClient, FileSessionStore, HttpAuthService, HttpCourseStore, HttpFileStore, HttpLessonStore,
};
use crate::config::Config;
use crate::error::CliError;
use robokit_core::authoring::CourseAuthoring;
use robokit_core::ports::{AuthService, CourseStore, FileStore, LessonStore, SessionStore};
use robokit_core::SessionController;
use std::sync::Arc;

/// Shared handles to every collaborator, created once and passed to all commands.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub api: ApiClient,
    pub session: Arc<dyn SessionStore>,
    pub courses: Arc<dyn CourseStore>,
    pub lessons: Arc<dyn LessonStore>,
    pub files: Arc<dyn FileStore>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    pub fn from_config(config: Config) -> Result<Self, CliError> {
        let session: Arc<dyn SessionStore> =
            Arc::new(FileSessionStore::new(config.session_path.clone()));
        Self::with_session(config, session)
    }

    /// Builds the context around an existing session store.
    pub fn with_session(config: Config, session: Arc<dyn SessionStore>) -> Result<Self, CliError> {
        let api = ApiClient::new(
            config.api_base_url.clone(),
            config.request_timeout,
            session.clone(),
        )?;
        Ok(Self {
            config: Arc::new(config),
            courses: Arc::new(HttpCourseStore::new(api.clone())),
            lessons: Arc::new(HttpLessonStore::new(api.clone())),
            files: Arc::new(HttpFileStore::new(api.clone())),
            auth: Arc::new(HttpAuthService::new(api.clone())),
            api,
            session,
        })
    }

    pub fn authoring(&self) -> CourseAuthoring {
        CourseAuthoring::new(self.courses.clone(), self.lessons.clone(), self.files.clone())
    }

    pub fn session_controller(&self) -> SessionController {
        SessionController::new(self.auth.clone(), self.session.clone())
    }
}
