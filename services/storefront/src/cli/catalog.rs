//! `catalog`: the shopper's view of the course grid.

use super::{render, CatalogArgs};
use crate::context::AppContext;
use crate::error::CliError;
use robokit_core::catalog::{self, FilterConfig, Selector, DEFAULT_MAX_PRICE};
use robokit_core::domain::CourseListQuery;
use tracing::debug;

/// Maps the command line flags onto the grid's filter controls.
pub fn filters_from_args(args: &CatalogArgs) -> FilterConfig {
    let selector = |value: &Option<String>| value.as_deref().map(Selector::parse).unwrap_or_default();
    FilterConfig {
        category: selector(&args.category),
        level: selector(&args.level),
        age: selector(&args.age),
        search: args.search.clone().unwrap_or_default(),
        max_price: args.max_price.unwrap_or(DEFAULT_MAX_PRICE),
    }
}

pub async fn list(ctx: &AppContext, args: &CatalogArgs) -> Result<(), CliError> {
    let courses = ctx.courses.list_courses(&CourseListQuery::default()).await?;
    let filters = filters_from_args(args);
    let shown = catalog::query(&courses, &filters, args.sort);
    debug!(fetched = courses.len(), shown = shown.len(), "catalog filtered");

    if shown.is_empty() {
        println!("No se encontraron cursos");
        return Ok(());
    }
    for course in &shown {
        println!("{}", render::course_card(course));
    }
    println!("{} de {} cursos", shown.len(), courses.len());
    Ok(())
}
