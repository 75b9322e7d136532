//! `course ...`: the admin panel's course management actions.

use super::manifest::CourseManifest;
use super::render;
use super::CourseListArgs;
use crate::context::AppContext;
use crate::error::CliError;
use robokit_core::catalog::CatalogStats;
use robokit_core::domain::{CourseId, CourseListQuery, CoursePatch, CourseStatus};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn list(ctx: &AppContext, args: &CourseListArgs) -> Result<(), CliError> {
    let courses = ctx.courses.list_courses(&args.to_query()).await?;
    println!("{}", render::course_table(&courses));
    Ok(())
}

pub async fn show(ctx: &AppContext, id: i64) -> Result<(), CliError> {
    let id = CourseId(id);
    let course = ctx.courses.get_course(id).await?;
    let lessons = ctx.lessons.list_lessons(id).await?;
    print!("{}", render::course_details(&course, &lessons));
    Ok(())
}

pub async fn delete(ctx: &AppContext, id: i64) -> Result<(), CliError> {
    ctx.courses.delete_course(CourseId(id)).await?;
    info!("Course {} deleted", id);
    println!("Curso #{} eliminado", id);
    Ok(())
}

pub async fn set_status(ctx: &AppContext, id: i64, status: CourseStatus) -> Result<(), CliError> {
    let patch = CoursePatch {
        status: Some(status),
        ..CoursePatch::default()
    };
    let course = ctx.courses.update_course(CourseId(id), &patch).await?;
    println!("Curso #{} ahora está {}", course.id, course.status.as_str());
    Ok(())
}

pub async fn set_active(ctx: &AppContext, id: i64, active: bool) -> Result<(), CliError> {
    let patch = CoursePatch {
        is_active: Some(active),
        ..CoursePatch::default()
    };
    let course = ctx.courses.update_course(CourseId(id), &patch).await?;
    info!(id, active = course.is_active, "Course visibility changed");
    if course.is_active {
        println!("Curso #{} activado", course.id);
    } else {
        println!("Curso #{} desactivado", course.id);
    }
    Ok(())
}

pub async fn stats(ctx: &AppContext) -> Result<(), CliError> {
    let query = CourseListQuery {
        include_inactive: true,
        ..CourseListQuery::default()
    };
    let courses = ctx.courses.list_courses(&query).await?;
    println!("{}", render::stats(&CatalogStats::from_courses(&courses)));
    Ok(())
}

pub async fn categories(ctx: &AppContext) -> Result<(), CliError> {
    for category in ctx.courses.list_categories().await? {
        println!("{}", category);
    }
    Ok(())
}

/// Runs the authoring workflow for a manifest. Ctrl-C stops before the next lesson.
pub async fn create(ctx: &AppContext, manifest_path: &Path) -> Result<(), CliError> {
    let raw = tokio::fs::read_to_string(manifest_path).await?;
    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let input = CourseManifest::from_json(&raw)?.load(base_dir).await?;

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; remaining lessons will be skipped");
                cancel.cancel();
            }
        })
    };

    let result = ctx
        .authoring()
        .create_course(
            &input.form,
            input.cover_image.as_ref(),
            &input.lessons,
            &cancel,
        )
        .await;
    watcher.abort();

    let report = result?;
    println!("{}", render::authoring_report(&report));
    if !report.is_complete() {
        warn!(
            failed = ?report.failed_positions(),
            unlinked = ?report.unlinked_positions(),
            "Course created with incomplete lessons"
        );
    }
    Ok(())
}
