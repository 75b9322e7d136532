pub mod app_state;
pub mod authoring;
pub mod catalog;
pub mod domain;
pub mod ports;

pub use app_state::{reduce, Action, AppState, AuthMode, Page, SessionController};
pub use authoring::{
    AuthoringError, AuthoringReport, CourseAuthoring, CourseForm, LessonDraft, LessonOutcome,
    LessonStatus, ValidationError,
};
pub use catalog::{query, CatalogStats, FilterConfig, Selector, SortKey};
pub use domain::{Course, CourseId, Difficulty, Lesson, Role, Upload, User};
pub use ports::{
    AuthService, CourseStore, FileStore, LessonStore, MemorySessionStore, PortError, PortResult,
    SessionStore,
};
