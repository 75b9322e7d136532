//! crates/robokit_core/src/catalog.rs
//!
//! The catalog query engine: a pure filter and sort over the in-memory course list,
//! plus the summary figures shown on the admin dashboard.

use crate::domain::Course;
use std::collections::HashSet;
use std::convert::Infallible;
use std::str::FromStr;

/// Default upper bound of the price slider.
pub const DEFAULT_MAX_PRICE: f64 = 300.0;

// Age bounds assumed for courses that do not declare one.
const OPEN_AGE_MIN: u32 = 0;
const OPEN_AGE_MAX: u32 = 100;

//=========================================================================================
// Filter Configuration
//=========================================================================================

/// A dropdown value: either the "all" sentinel or a concrete choice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    /// Reads a raw dropdown value. Empty input, `all` and `Todos` mean no constraint.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed.eq_ignore_ascii_case("todos")
        {
            Selector::All
        } else {
            Selector::Only(trimmed.to_string())
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Selector::All => None,
            Selector::Only(value) => Some(value),
        }
    }
}

impl FromStr for Selector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Selector::parse(s))
    }
}

/// The shopper-facing filter state of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub category: Selector,
    pub level: Selector,
    /// A `"N-M años"` style token.
    pub age: Selector,
    pub search: String,
    /// Inclusive upper bound on the course price.
    pub max_price: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            category: Selector::All,
            level: Selector::All,
            age: Selector::All,
            search: String::new(),
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    MostRecent,
    PriceAsc,
    PriceDesc,
    /// Activity count stands in for a rating until real ratings exist.
    MostActive,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "most-recent" | "recent" | "popularity" => Ok(SortKey::MostRecent),
            "price-asc" | "price-low" => Ok(SortKey::PriceAsc),
            "price-desc" | "price-high" => Ok(SortKey::PriceDesc),
            "most-active" | "rating" => Ok(SortKey::MostActive),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

//=========================================================================================
// Query
//=========================================================================================

/// Filters and orders `courses` without touching the input slice.
pub fn query(courses: &[Course], filters: &FilterConfig, sort: SortKey) -> Vec<Course> {
    let age_range = filters.age.value().and_then(parse_age_range);
    let search = filters.search.to_lowercase();

    let mut selected: Vec<Course> = courses
        .iter()
        .filter(|course| matches_category(course, &filters.category))
        .filter(|course| matches_level(course, &filters.level))
        .filter(|course| age_range.map_or(true, |range| overlaps_age(course, range)))
        .filter(|course| matches_search(course, &search))
        .filter(|course| course.effective_price() <= filters.max_price)
        .cloned()
        .collect();

    sort_courses(&mut selected, sort);
    selected
}

fn matches_category(course: &Course, selector: &Selector) -> bool {
    match selector.value() {
        None => true,
        Some(wanted) => course
            .category
            .as_deref()
            .is_some_and(|category| category.to_lowercase().contains(&wanted.to_lowercase())),
    }
}

/// Maps a difficulty label from the filter dropdown to the stored value.
pub fn level_from_label(label: &str) -> String {
    match label {
        "Principiante" => "beginner".to_string(),
        "Intermedio" => "intermediate".to_string(),
        "Avanzado" => "advanced".to_string(),
        other => other.to_lowercase(),
    }
}

fn matches_level(course: &Course, selector: &Selector) -> bool {
    match selector.value() {
        None => true,
        Some(label) => course.difficulty_level.as_str() == level_from_label(label),
    }
}

/// Extracts `[lo, hi]` from a token such as `"8-12 años"`.
///
/// Returns `None` unless exactly two integers are present.
pub fn parse_age_range(token: &str) -> Option<(u32, u32)> {
    let numbers: Vec<u32> = token
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();
    match numbers.as_slice() {
        [lo, hi] => Some((*lo, *hi)),
        _ => None,
    }
}

fn overlaps_age(course: &Course, (lo, hi): (u32, u32)) -> bool {
    let course_min = course.age_min.unwrap_or(OPEN_AGE_MIN);
    let course_max = course.age_max.unwrap_or(OPEN_AGE_MAX);
    lo <= course_max && hi >= course_min
}

fn matches_search(course: &Course, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let contains = |text: &str| text.to_lowercase().contains(needle);
    contains(&course.title)
        || contains(&course.description)
        || course.category.as_deref().is_some_and(contains)
        || course.general_objective.as_deref().is_some_and(contains)
}

fn sort_courses(courses: &mut [Course], sort: SortKey) {
    match sort {
        // `None < Some`, so undated courses end up last.
        SortKey::MostRecent => courses.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::PriceAsc => {
            courses.sort_by(|a, b| a.effective_price().total_cmp(&b.effective_price()))
        }
        SortKey::PriceDesc => {
            courses.sort_by(|a, b| b.effective_price().total_cmp(&a.effective_price()))
        }
        SortKey::MostActive => courses.sort_by(|a, b| {
            b.activities_count
                .unwrap_or(0)
                .cmp(&a.activities_count.unwrap_or(0))
        }),
    }
}

//=========================================================================================
// Dashboard Figures
//=========================================================================================

/// Summary of a course listing for the admin dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats {
    pub total: usize,
    pub active: usize,
    pub categories: usize,
    pub average_price: f64,
}

impl CatalogStats {
    pub fn from_courses(courses: &[Course]) -> Self {
        let active = courses.iter().filter(|c| c.is_active).count();
        let categories = courses
            .iter()
            .filter_map(|c| c.category.as_deref())
            .collect::<HashSet<_>>()
            .len();
        let average_price = if courses.is_empty() {
            0.0
        } else {
            courses.iter().map(Course::effective_price).sum::<f64>() / courses.len() as f64
        };
        Self {
            total: courses.len(),
            active,
            categories,
            average_price,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{Course, CourseId, CourseStatus, Difficulty};
    use chrono::{TimeZone, Utc};

    pub fn course(id: i64, title: &str) -> Course {
        let day = (id.rem_euclid(28) + 1) as u32;
        Course {
            id: CourseId(id),
            title: title.to_string(),
            description: format!("Descripción de {}", title),
            general_objective: None,
            category: Some("Robótica".to_string()),
            difficulty_level: Difficulty::Beginner,
            price: Some(50.0),
            original_price: None,
            age_min: Some(6),
            age_max: Some(10),
            duration_hours: Some(3),
            activities_count: Some(5),
            cover_image: None,
            components_included: None,
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()),
            status: CourseStatus::Published,
            is_active: true,
        }
    }
}
