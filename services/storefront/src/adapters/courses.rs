//! services/storefront/src/adapters/courses.rs
//!
//! Implements the `CourseStore` and `LessonStore` ports against the `/api/courses`
//! family of endpoints.

use super::http::ApiClient;
use super::wire::{CoursePatchBody, CourseRecord, LessonRecord, NewCourseBody, NewLessonBody};
use async_trait::async_trait;
use reqwest::Method;
use robokit_core::domain::{Course, CourseId, CourseListQuery, CoursePatch, Lesson, NewCourse, NewLesson};
use robokit_core::ports::{CourseStore, LessonStore, PortResult};

//=========================================================================================
// Courses
//=========================================================================================

#[derive(Clone)]
pub struct HttpCourseStore {
    api: ApiClient,
}

impl HttpCourseStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

/// Turns the listing filter into query parameters, leaving unset ones out.
fn list_params(query: &CourseListQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        params.push(("category", category.to_string()));
    }
    if let Some(difficulty) = query.difficulty {
        params.push(("difficulty", difficulty.as_str().to_string()));
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        params.push(("search", search.trim().to_string()));
    }
    if let Some(min) = query.min_price {
        params.push(("minPrice", min.to_string()));
    }
    if let Some(max) = query.max_price {
        params.push(("maxPrice", max.to_string()));
    }
    if query.include_inactive {
        params.push(("include_inactive", "true".to_string()));
    }
    params
}

#[async_trait]
impl CourseStore for HttpCourseStore {
    async fn create_course(&self, course: &NewCourse) -> PortResult<Course> {
        let path = "/api/courses";
        let builder = self
            .api
            .request(Method::POST, path)
            .json(&NewCourseBody::from(course));
        let record: CourseRecord = self.api.send(path, builder).await?;
        record.to_domain()
    }

    async fn get_course(&self, id: CourseId) -> PortResult<Course> {
        let path = format!("/api/courses/{}", id);
        let builder = self.api.request(Method::GET, &path);
        let record: CourseRecord = self.api.send(&path, builder).await?;
        record.to_domain()
    }

    async fn list_courses(&self, query: &CourseListQuery) -> PortResult<Vec<Course>> {
        let path = "/api/courses";
        let builder = self
            .api
            .request(Method::GET, path)
            .query(&list_params(query));
        let records: Vec<CourseRecord> = self.api.send(path, builder).await?;
        records.into_iter().map(CourseRecord::to_domain).collect()
    }

    async fn update_course(&self, id: CourseId, patch: &CoursePatch) -> PortResult<Course> {
        let path = format!("/api/courses/{}", id);
        let builder = self
            .api
            .request(Method::PUT, &path)
            .json(&CoursePatchBody::from(patch));
        let record: CourseRecord = self.api.send(&path, builder).await?;
        record.to_domain()
    }

    async fn delete_course(&self, id: CourseId) -> PortResult<()> {
        let path = format!("/api/courses/{}", id);
        let builder = self.api.request(Method::DELETE, &path);
        self.api.send_unit(&path, builder).await
    }

    async fn list_categories(&self) -> PortResult<Vec<String>> {
        let path = "/api/courses/categories";
        let builder = self.api.request(Method::GET, path);
        self.api.send(path, builder).await
    }
}

//=========================================================================================
// Lessons
//=========================================================================================

#[derive(Clone)]
pub struct HttpLessonStore {
    api: ApiClient,
}

impl HttpLessonStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl LessonStore for HttpLessonStore {
    async fn create_lesson(&self, lesson: &NewLesson) -> PortResult<Lesson> {
        let path = "/api/courses/lessons";
        let builder = self
            .api
            .request(Method::POST, path)
            .json(&NewLessonBody::from(lesson));
        let record: LessonRecord = self.api.send(path, builder).await?;
        Ok(record.to_domain())
    }

    async fn list_lessons(&self, course_id: CourseId) -> PortResult<Vec<Lesson>> {
        let path = format!("/api/courses/{}/lessons", course_id);
        let builder = self.api.request(Method::GET, &path);
        let records: Vec<LessonRecord> = self.api.send(&path, builder).await?;
        let mut lessons: Vec<Lesson> = records.into_iter().map(LessonRecord::to_domain).collect();
        lessons.sort_by_key(|lesson| lesson.lesson_order);
        Ok(lessons)
    }
}
