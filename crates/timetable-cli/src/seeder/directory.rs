//! Directory seeding: faculties, departments, teachers, buildings,
//! auditoriums and groups.

use fake::Fake;
use fake::faker::company::en::Industry;
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;
use rayon::prelude::*;
use sqlx::{Postgres, Transaction};

use super::models::{
    AuditoriumSeed, BuildingSeed, DepartmentSeed, DirectoryIds, FacultySeed, GroupSeed, SeedConfig,
    TeacherSeed,
};

const BATCH_SIZE: usize = 500;
const BUILDING_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Builds `($1, $2), ($3, $4), ...` for a multi-row INSERT.
pub(crate) fn values_clause(rows: usize, columns: usize) -> String {
    (0..rows)
        .map(|row| {
            let params: Vec<String> = (1..=columns)
                .map(|col| format!("${}", row * columns + col))
                .collect();
            format!("({})", params.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Upper-case initials of every word, e.g. `"Applied Mathematics"` -> `"AM"`.
fn initials(title: &str) -> String {
    title
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn generate_faculties(count: usize) -> Vec<FacultySeed> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let industry: String = Industry().fake();
            let title = format!("Faculty of {}", industry);
            // Suffix keeps the short title unique when industries repeat.
            let title_short = format!("{}{}", initials(&title), i + 1);
            FacultySeed { title, title_short }
        })
        .collect()
}

pub fn generate_departments(faculties: usize, per_faculty: usize) -> Vec<DepartmentSeed> {
    (0..faculties * per_faculty)
        .into_par_iter()
        .map(|i| {
            let industry: String = Industry().fake();
            let title = format!("Department of {}", industry);
            DepartmentSeed {
                title_short: initials(&title),
                title,
                faculty_idx: i / per_faculty.max(1),
            }
        })
        .collect()
}

pub fn generate_teachers(count: usize, departments: usize) -> Vec<TeacherSeed> {
    (0..count)
        .into_par_iter()
        .map(|_| {
            let first: String = FirstName().fake();
            let middle: String = FirstName().fake();
            let last: String = LastName().fake();
            let short_name = format!(
                "{} {}. {}.",
                last,
                first.chars().next().unwrap_or('X'),
                middle.chars().next().unwrap_or('X')
            );
            TeacherSeed {
                full_name: format!("{} {} {}", last, first, middle),
                short_name,
                department_idx: rand::thread_rng().gen_range(0..departments.max(1)),
            }
        })
        .collect()
}

pub fn generate_buildings(count: usize) -> Vec<BuildingSeed> {
    BUILDING_LETTERS
        .chars()
        .cycle()
        .take(count)
        .enumerate()
        .map(|(i, letter)| BuildingSeed {
            title: format!("Academic building {}", i + 1),
            letter: letter.to_string(),
        })
        .collect()
}

pub fn generate_auditoriums(buildings: usize, per_building: usize) -> Vec<AuditoriumSeed> {
    (0..buildings * per_building)
        .into_par_iter()
        .map(|i| {
            let n = i % per_building.max(1);
            let floor = n / 10 + 1;
            AuditoriumSeed {
                number: format!("{}{:02}", floor, n % 10 + 1),
                building_idx: i / per_building.max(1),
            }
        })
        .collect()
}

/// Group numbers are `<course><faculty:02><group>`, e.g. `3012`.
pub fn generate_groups(faculties: usize, courses: u8, per_course: u8) -> Vec<GroupSeed> {
    let per_course = per_course.min(9);
    (0..faculties)
        .flat_map(|faculty_idx| {
            (1..=courses).flat_map(move |course| {
                (1..=per_course).map(move |g| GroupSeed {
                    number: format!("{}{:02}{}", course, faculty_idx + 1, g),
                    course: i32::from(course),
                    faculty_idx,
                })
            })
        })
        .collect()
}

/// Generates and inserts every directory table inside `tx`.
pub async fn seed_directory(
    tx: &mut Transaction<'_, Postgres>,
    config: &SeedConfig,
) -> Result<DirectoryIds, Box<dyn std::error::Error>> {
    let faculties = generate_faculties(config.faculties);
    let departments = generate_departments(config.faculties, config.departments_per_faculty);
    let teachers = generate_teachers(config.teachers, departments.len());
    let buildings = generate_buildings(config.buildings);
    let auditoriums = generate_auditoriums(config.buildings, config.auditoriums_per_building);
    let groups = generate_groups(config.faculties, config.courses, config.groups_per_course);

    let mut ids = DirectoryIds::default();

    for chunk in faculties.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO faculty (title, title_short) VALUES {} RETURNING id",
            values_clause(chunk.len(), 2)
        );
        let mut q = sqlx::query_scalar::<_, i32>(&query);
        for faculty in chunk {
            q = q.bind(&faculty.title).bind(&faculty.title_short);
        }
        ids.faculties.extend(q.fetch_all(&mut **tx).await?);
    }
    println!("   ✓ {} faculties", ids.faculties.len());

    for chunk in departments.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO department (title, title_short, faculty_id) VALUES {} RETURNING id",
            values_clause(chunk.len(), 3)
        );
        let mut q = sqlx::query_scalar::<_, i32>(&query);
        for department in chunk {
            q = q
                .bind(&department.title)
                .bind(&department.title_short)
                .bind(ids.faculties.get(department.faculty_idx).copied());
        }
        ids.departments.extend(q.fetch_all(&mut **tx).await?);
    }
    println!("   ✓ {} departments", ids.departments.len());

    for chunk in teachers.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO teacher (full_name, short_name) VALUES {} RETURNING id",
            values_clause(chunk.len(), 2)
        );
        let mut q = sqlx::query_scalar::<_, i32>(&query);
        for teacher in chunk {
            q = q.bind(&teacher.full_name).bind(&teacher.short_name);
        }
        ids.teachers.extend(q.fetch_all(&mut **tx).await?);
    }

    let memberships: Vec<(i32, i32)> = teachers
        .iter()
        .zip(&ids.teachers)
        .filter_map(|(teacher, &id)| {
            ids.departments
                .get(teacher.department_idx)
                .map(|&department_id| (id, department_id))
        })
        .collect();
    for chunk in memberships.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO teacher_department (teacher_id, department_id) VALUES {}",
            values_clause(chunk.len(), 2)
        );
        let mut q = sqlx::query(&query);
        for (teacher_id, department_id) in chunk {
            q = q.bind(teacher_id).bind(department_id);
        }
        q.execute(&mut **tx).await?;
    }
    println!("   ✓ {} teachers", ids.teachers.len());

    for chunk in buildings.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO building (title, letter) VALUES {} RETURNING id",
            values_clause(chunk.len(), 2)
        );
        let mut q = sqlx::query_scalar::<_, i32>(&query);
        for building in chunk {
            q = q.bind(&building.title).bind(&building.letter);
        }
        ids.buildings.extend(q.fetch_all(&mut **tx).await?);
    }

    for chunk in auditoriums.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO auditorium (number, building_id) VALUES {} RETURNING id",
            values_clause(chunk.len(), 2)
        );
        let mut q = sqlx::query_scalar::<_, i32>(&query);
        for auditorium in chunk {
            q = q
                .bind(&auditorium.number)
                .bind(ids.buildings.get(auditorium.building_idx).copied());
        }
        ids.auditoriums.extend(q.fetch_all(&mut **tx).await?);
    }
    println!(
        "   ✓ {} buildings with {} auditoriums",
        ids.buildings.len(),
        ids.auditoriums.len()
    );

    for chunk in groups.chunks(BATCH_SIZE) {
        let query = format!(
            r#"INSERT INTO "group" (number, course, faculty_id) VALUES {} RETURNING id"#,
            values_clause(chunk.len(), 3)
        );
        let mut q = sqlx::query_scalar::<_, i32>(&query);
        for group in chunk {
            q = q
                .bind(&group.number)
                .bind(group.course)
                .bind(ids.faculties.get(group.faculty_idx).copied());
        }
        ids.groups.extend(q.fetch_all(&mut **tx).await?);
    }
    println!("   ✓ {} groups", ids.groups.len());

    Ok(ids)
}
