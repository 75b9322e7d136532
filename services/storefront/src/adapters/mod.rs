pub mod auth;
pub mod courses;
pub mod files;
pub mod http;
pub mod session_file;
pub mod wire;

pub use auth::HttpAuthService;
pub use courses::{HttpCourseStore, HttpLessonStore};
pub use files::HttpFileStore;
pub use http::ApiClient;
pub use session_file::FileSessionStore;
