//! Lesson seeding.
//!
//! Weeks alternate numerator and denominator starting from
//! [`SeedConfig::start_monday`]. A share of lessons is written with the
//! `unknown` label so the server has something to resolve.

use chrono::{Duration, NaiveTime};
use fake::Fake;
use fake::faker::lorem::en::Words;
use rand::Rng;
use rayon::prelude::*;
use sqlx::{Postgres, Transaction};
use timetable_models::schedule::{LessonType, WeekType, WeekTypeLabel};

use super::directory::values_clause;
use super::models::{DirectoryIds, LESSON_SLOTS, LessonSeed, SeedConfig};

const BATCH_SIZE: usize = 1000;
const SUBJECTS_PER_GROUP: usize = 8;
const MAX_LESSONS_PER_DAY: usize = 4;
const STUDY_DAYS: i64 = 6;

/// Label written for the week `week_index` weeks after the start Monday.
pub fn label_for_week(week_index: usize) -> WeekType {
    if week_index % 2 == 0 {
        WeekType::Numerator
    } else {
        WeekType::Denominator
    }
}

fn subject_title() -> String {
    let words: Vec<String> = Words(2..4).fake();
    let mut title = words.join(" ");
    if let Some(first) = title.get(..1) {
        title = first.to_uppercase() + &title[1..];
    }
    title
}

fn slot_time(hm: (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hm.0, hm.1, 0).unwrap_or_default()
}

/// Generates lessons for every group in parallel.
///
/// Each group gets its own subject list. A day holds up to four lessons in
/// consecutive slots starting at a random slot, and some days stay empty.
pub fn generate_lessons(
    config: &SeedConfig,
    groups: usize,
    teachers: usize,
    auditoriums: usize,
) -> Vec<LessonSeed> {
    let lesson_types: Vec<&'static str> = LessonType::ALL
        .iter()
        .filter(|t| **t != LessonType::Unknown)
        .map(|t| t.as_str())
        .collect();
    let unknown_ratio = config.unknown_ratio.clamp(0.0, 1.0);

    (0..groups)
        .into_par_iter()
        .flat_map_iter(|group_idx| {
            let mut rng = rand::thread_rng();
            let subjects: Vec<(String, usize)> = (0..SUBJECTS_PER_GROUP)
                .map(|_| (subject_title(), rng.gen_range(0..teachers.max(1))))
                .collect();
            let mut lessons = Vec::new();

            for week in 0..config.weeks {
                let monday = config.start_monday + Duration::weeks(week as i64);
                let label = WeekTypeLabel::from(label_for_week(week)).as_str();

                for day in 0..STUDY_DAYS {
                    let count = rng.gen_range(0..=MAX_LESSONS_PER_DAY);
                    if count == 0 {
                        continue;
                    }
                    let first_slot = rng.gen_range(0..=LESSON_SLOTS.len() - count);

                    for (time, start, end) in &LESSON_SLOTS[first_slot..first_slot + count] {
                        let (title, teacher_idx) = &subjects[rng.gen_range(0..subjects.len())];
                        let week_type = if rng.gen_bool(unknown_ratio) {
                            WeekTypeLabel::Unknown.as_str()
                        } else {
                            label
                        };
                        lessons.push(LessonSeed {
                            group_idx,
                            date: monday + Duration::days(day),
                            time: *time,
                            start_time: slot_time(*start),
                            end_time: slot_time(*end),
                            title: title.clone(),
                            lesson_type: lesson_types[rng.gen_range(0..lesson_types.len())],
                            week_type,
                            teacher_idx: *teacher_idx,
                            auditorium_idx: rng.gen_range(0..auditoriums.max(1)),
                        });
                    }
                }
            }

            lessons
        })
        .collect()
}

/// Inserts lessons and their teacher/auditorium links inside `tx`.
/// Returns the number of inserted lessons.
pub async fn seed_lessons(
    tx: &mut Transaction<'_, Postgres>,
    config: &SeedConfig,
    ids: &DirectoryIds,
) -> Result<usize, Box<dyn std::error::Error>> {
    let lessons = generate_lessons(
        config,
        ids.groups.len(),
        ids.teachers.len(),
        ids.auditoriums.len(),
    );

    let mut inserted = 0;
    for chunk in lessons.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO lesson (group_id, date, time, start_time, end_time, title, type, week_type) \
             VALUES {} RETURNING id",
            values_clause(chunk.len(), 8)
        );
        let mut q = sqlx::query_scalar::<_, i32>(&query);
        for lesson in chunk {
            q = q
                .bind(ids.groups[lesson.group_idx])
                .bind(lesson.date)
                .bind(lesson.time)
                .bind(lesson.start_time)
                .bind(lesson.end_time)
                .bind(&lesson.title)
                .bind(lesson.lesson_type)
                .bind(lesson.week_type);
        }
        let lesson_ids = q.fetch_all(&mut **tx).await?;

        let links: Vec<(i32, Option<i32>, Option<i32>)> = chunk
            .iter()
            .zip(&lesson_ids)
            .map(|(lesson, &lesson_id)| {
                (
                    lesson_id,
                    ids.teachers.get(lesson.teacher_idx).copied(),
                    ids.auditoriums.get(lesson.auditorium_idx).copied(),
                )
            })
            .filter(|(_, teacher, auditorium)| teacher.is_some() || auditorium.is_some())
            .collect();

        if !links.is_empty() {
            let query = format!(
                "INSERT INTO lesson_auditorium_teacher (lesson_id, teacher_id, auditorium_id) VALUES {}",
                values_clause(links.len(), 3)
            );
            let mut q = sqlx::query(&query);
            for (lesson_id, teacher_id, auditorium_id) in &links {
                q = q.bind(lesson_id).bind(teacher_id).bind(auditorium_id);
            }
            q.execute(&mut **tx).await?;
        }

        inserted += lesson_ids.len();
    }

    Ok(inserted)
}
