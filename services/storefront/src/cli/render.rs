//! Plain-text rendering of courses, lessons and authoring reports.

use robokit_core::authoring::{AuthoringReport, LessonStatus};
use robokit_core::catalog::CatalogStats;
use robokit_core::domain::{Course, Lesson};
use std::fmt::Write;

fn age_label(course: &Course) -> String {
    match (course.age_min, course.age_max) {
        (Some(min), Some(max)) => format!("{}-{} años", min, max),
        (Some(min), None) => format!("{}+ años", min),
        (None, Some(max)) => format!("hasta {} años", max),
        (None, None) => "todas las edades".to_string(),
    }
}

/// One catalog card on a single line.
pub fn course_card(course: &Course) -> String {
    let mut line = format!(
        "#{:<4} {}  [{}] {} | {}",
        course.id.0,
        course.title,
        course.category.as_deref().unwrap_or("Sin categoría"),
        course.difficulty_level.display_label(),
        age_label(course),
    );
    let _ = write!(line, " | {}", course.price_label());
    if let (Some(discount), Some(original)) = (course.discount_percent(), course.original_price) {
        let _ = write!(line, " (antes ${:.2}, -{}%)", original, discount);
    }
    if !course.is_active {
        line.push_str(" [inactivo]");
    }
    line
}

/// The admin table: one row per course with its status and active flag.
pub fn course_table(courses: &[Course]) -> String {
    let mut out = format!(
        "{:<5} {:<28} {:<16} {:<12} {:>10} {:<10} {}\n",
        "ID", "Título", "Categoría", "Nivel", "Precio", "Estado", "Activo"
    );
    for course in courses {
        let _ = writeln!(
            out,
            "{:<5} {:<28} {:<16} {:<12} {:>10} {:<10} {}",
            course.id.0,
            course.title,
            course.category.as_deref().unwrap_or("-"),
            course.difficulty_level.display_label(),
            course.price_label(),
            course.status.as_str(),
            if course.is_active { "sí" } else { "no" },
        );
    }
    let _ = write!(out, "{} cursos", courses.len());
    out
}

pub fn course_details(course: &Course, lessons: &[Lesson]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", course_card(course));
    let _ = writeln!(out, "Estado: {}", course.status.as_str());
    if !course.description.is_empty() {
        let _ = writeln!(out, "\n{}", course.description);
    }
    if let Some(objective) = &course.general_objective {
        let _ = writeln!(out, "\nObjetivo general: {}", objective);
    }
    if let Some(hours) = course.duration_hours {
        let _ = writeln!(out, "Duración: {} h", hours);
    }
    if let Some(activities) = course.activities_count {
        let _ = writeln!(out, "Actividades: {}", activities);
    }
    let components = course.components();
    if !components.is_empty() {
        let _ = writeln!(out, "\nComponentes incluidos:");
        for component in components {
            let _ = writeln!(out, "  - {}", component);
        }
    }
    let _ = writeln!(out, "\nLecciones ({}):", lessons.len());
    for lesson in lessons {
        let _ = write!(
            out,
            "  {}. {} ({} min)",
            lesson.lesson_order, lesson.title, lesson.duration_minutes
        );
        if let Some(file) = &lesson.file {
            let _ = write!(out, " [PDF: {}]", file.original_name);
        }
        out.push('\n');
    }
    out
}

pub fn stats(stats: &CatalogStats) -> String {
    format!(
        "Cursos: {}\nActivos: {}\nCategorías: {}\nPrecio promedio: ${:.2}",
        stats.total, stats.active, stats.categories, stats.average_price
    )
}

pub fn authoring_report(report: &AuthoringReport) -> String {
    let mut out = format!("Curso creado: #{} {}\n", report.course.id, report.course.title);
    for outcome in &report.lessons {
        let line = match &outcome.status {
            LessonStatus::Created { lesson, file: Some(file) } => format!(
                "ok     lección {} -> orden {} con PDF {}",
                outcome.position, lesson.lesson_order, file.original_name
            ),
            LessonStatus::Created { lesson, file: None } => format!(
                "ok     lección {} -> orden {}",
                outcome.position, lesson.lesson_order
            ),
            LessonStatus::LinkFailed { lesson, error, .. } => format!(
                "aviso  lección {} -> orden {}, PDF sin asociar: {}",
                outcome.position, lesson.lesson_order, error
            ),
            LessonStatus::Failed { stage, error } => format!(
                "error  lección {} ({}): {}",
                outcome.position, stage, error
            ),
            LessonStatus::Cancelled => format!("omitida lección {} (cancelado)", outcome.position),
        };
        let _ = writeln!(out, "  {} \"{}\"", line, outcome.title);
    }
    let _ = write!(
        out,
        "{}/{} lecciones creadas",
        report.created_lessons().len(),
        report.lessons.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use robokit_core::authoring::{LessonOutcome, LessonStage};
    use robokit_core::domain::{CourseId, CourseStatus, Difficulty, LessonId};
    use robokit_core::ports::PortError;

    fn walker() -> Course {
        Course {
            id: CourseId(2),
            title: "Robot Caminante".to_string(),
            description: "Construye un robot que camina".to_string(),
            general_objective: None,
            category: Some("Robótica".to_string()),
            difficulty_level: Difficulty::Intermediate,
            price: Some(129.99),
            original_price: Some(159.99),
            age_min: Some(8),
            age_max: Some(14),
            duration_hours: Some(6),
            activities_count: Some(12),
            cover_image: None,
            components_included: Some("Servos\n\nTornillos\n".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            status: CourseStatus::Published,
            is_active: true,
        }
    }

    fn lesson(id: i64, order: u32) -> Lesson {
        Lesson {
            id: LessonId(id),
            course_id: CourseId(2),
            title: format!("Lección {}", order),
            description: None,
            lesson_order: order,
            duration_minutes: 30,
            file: None,
        }
    }

    #[test]
    fn card_shows_price_discount_and_label() {
        assert_eq!(
            course_card(&walker()),
            "#2    Robot Caminante  [Robótica] Intermedio | 8-14 años | $129.99 (antes $159.99, -19%)"
        );

        let mut free = walker();
        free.price = None;
        free.original_price = None;
        free.is_active = false;
        assert!(course_card(&free).ends_with("| Gratis [inactivo]"));
    }

    #[test]
    fn table_shows_status_and_active_flag() {
        let mut draft = walker();
        draft.id = CourseId(7);
        draft.title = "Brazo".to_string();
        draft.status = CourseStatus::Draft;
        draft.is_active = false;
        draft.price = None;

        let text = course_table(&[walker(), draft]);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 4);
        assert!(rows[0].starts_with("ID    Título"));
        assert!(rows[1].starts_with("2     Robot Caminante"));
        assert!(rows[1].ends_with("$129.99 published  sí"));
        assert!(rows[2].ends_with("Gratis draft      no"));
        assert_eq!(rows[3], "2 cursos");
    }

    #[test]
    fn details_list_components_and_lessons() {
        let text = course_details(&walker(), &[lesson(10, 1), lesson(11, 2)]);
        assert!(text.contains("  - Servos\n  - Tornillos\n"));
        assert!(text.contains("Lecciones (2):\n  1. Lección 1 (30 min)\n  2. Lección 2 (30 min)\n"));
    }

    #[test]
    fn report_counts_created_lessons() {
        let report = AuthoringReport {
            course: walker(),
            lessons: vec![
                LessonOutcome {
                    position: 1,
                    title: "Motores".to_string(),
                    status: LessonStatus::Created { lesson: lesson(10, 1), file: None },
                },
                LessonOutcome {
                    position: 2,
                    title: "Sensores".to_string(),
                    status: LessonStatus::Failed {
                        stage: LessonStage::LessonCreation,
                        error: PortError::Backend("rechazada".to_string()),
                    },
                },
                LessonOutcome {
                    position: 3,
                    title: "Final".to_string(),
                    status: LessonStatus::Cancelled,
                },
            ],
        };
        let text = authoring_report(&report);
        assert!(text.contains("error  lección 2 (lesson creation): rechazada \"Sensores\""));
        assert!(text.ends_with("1/3 lecciones creadas"));
    }
}
