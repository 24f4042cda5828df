use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use timetable_models::{
    EntityProfile, EntitySelector, GroupInfo, LessonRecord, TeacherAuditorium, TeacherInfo,
    auditoriums::Auditorium,
    ids::{AuditoriumId, TeacherId},
};

use super::{LessonStore, NearestLesson, StoreError};

/// In-memory lesson store used by tests and local demos.
///
/// Lessons register their group, teachers and auditoriums automatically, so a
/// store built only from lessons already answers profile lookups.
#[derive(Debug, Clone, Default)]
pub struct MemoryLessonStore {
    lessons: Vec<LessonRecord>,
    groups: BTreeMap<String, GroupInfo>,
    teachers: BTreeMap<TeacherId, (TeacherInfo, Vec<String>)>,
    auditoriums: BTreeMap<AuditoriumId, Auditorium>,
    delay: Option<Duration>,
}

impl MemoryLessonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lesson(mut self, lesson: LessonRecord) -> Self {
        if let Some(group) = &lesson.group {
            self.groups
                .entry(group.number.as_str().to_owned())
                .or_insert_with(|| group.clone());
        }
        for pair in &lesson.teacher_auditoriums {
            if let Some(teacher) = &pair.teacher {
                self.teachers
                    .entry(teacher.id)
                    .or_insert_with(|| (teacher.clone(), Vec::new()));
            }
            if let Some(auditorium) = &pair.auditorium {
                self.auditoriums
                    .entry(auditorium.id)
                    .or_insert_with(|| auditorium.clone());
            }
        }
        self.lessons.push(lesson);
        self
    }

    pub fn with_lessons(self, lessons: impl IntoIterator<Item = LessonRecord>) -> Self {
        lessons.into_iter().fold(self, Self::with_lesson)
    }

    pub fn with_group(mut self, group: GroupInfo) -> Self {
        self.groups.insert(group.number.as_str().to_owned(), group);
        self
    }

    pub fn with_teacher(mut self, teacher: TeacherInfo, departments: Vec<String>) -> Self {
        self.teachers.insert(teacher.id, (teacher, departments));
        self
    }

    pub fn with_auditorium(mut self, auditorium: Auditorium) -> Self {
        self.auditoriums.insert(auditorium.id, auditorium);
        self
    }

    /// Every call sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// The lesson as seen by `selector`, or `None` if it does not belong to it.
    fn select(selector: &EntitySelector, lesson: &LessonRecord) -> Option<LessonRecord> {
        if let EntitySelector::Group(number) = selector {
            return lesson
                .group
                .as_ref()
                .filter(|group| group.number == *number)
                .map(|_| lesson.clone());
        }

        let keep = |pair: &TeacherAuditorium| match selector {
            EntitySelector::Teacher(id) => pair.teacher.as_ref().is_some_and(|t| t.id == *id),
            EntitySelector::Auditorium(id) => {
                pair.auditorium.as_ref().is_some_and(|a| a.id == *id)
            }
            EntitySelector::Group(_) => true,
        };

        let pairs: Vec<TeacherAuditorium> = lesson
            .teacher_auditoriums
            .iter()
            .filter(|pair| keep(pair))
            .cloned()
            .collect();
        if pairs.is_empty() {
            return None;
        }

        Some(LessonRecord {
            teacher_auditoriums: pairs,
            ..lesson.clone()
        })
    }

    fn selected<'a>(
        &'a self,
        selector: &'a EntitySelector,
    ) -> impl Iterator<Item = LessonRecord> + 'a {
        self.lessons
            .iter()
            .filter_map(move |lesson| Self::select(selector, lesson))
    }
}

#[async_trait]
impl LessonStore for MemoryLessonStore {
    async fn fetch_lesson_window(
        &self,
        selector: &EntitySelector,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LessonRecord>, StoreError> {
        self.pause().await;

        let mut lessons: Vec<LessonRecord> = self
            .selected(selector)
            .filter(|lesson| lesson.date >= start && lesson.date <= end)
            .collect();
        lessons.sort_by(|a, b| (a.date, &a.time, a.id).cmp(&(b.date, &b.time, b.id)));
        Ok(lessons)
    }

    async fn fetch_nearest_labeled_lesson(
        &self,
        selector: &EntitySelector,
        direction: NearestLesson,
    ) -> Result<Option<LessonRecord>, StoreError> {
        self.pause().await;

        let labeled = self
            .selected(selector)
            .filter(|lesson| lesson.week_type.known().is_some());
        let nearest = match direction {
            NearestLesson::Before(date) => labeled
                .filter(|lesson| lesson.date < date)
                .max_by_key(|lesson| (lesson.date, lesson.id)),
            NearestLesson::After(date) => labeled
                .filter(|lesson| lesson.date > date)
                .min_by_key(|lesson| (lesson.date, lesson.id)),
        };
        Ok(nearest)
    }

    async fn entity_profile(
        &self,
        selector: &EntitySelector,
    ) -> Result<Option<EntityProfile>, StoreError> {
        self.pause().await;

        let profile = match selector {
            EntitySelector::Group(number) => self
                .groups
                .get(number.as_str())
                .cloned()
                .map(EntityProfile::Group),
            EntitySelector::Teacher(id) => {
                self.teachers
                    .get(id)
                    .cloned()
                    .map(|(teacher, departments)| EntityProfile::Teacher {
                        teacher,
                        departments,
                    })
            }
            EntitySelector::Auditorium(id) => self
                .auditoriums
                .get(id)
                .cloned()
                .map(EntityProfile::Auditorium),
        };
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timetable_models::{GroupNumber, LessonType, WeekTypeLabel, ids::LessonId};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn teacher(id: i32, name: &str) -> TeacherInfo {
        TeacherInfo {
            id: TeacherId::new(id),
            full_name: name.to_string(),
            short_name: name.to_string(),
            link: None,
        }
    }

    fn lesson(id: i32, day: u32, label: WeekTypeLabel, teachers: &[TeacherInfo]) -> LessonRecord {
        LessonRecord {
            id: LessonId::new(id),
            date: date(day),
            time: "08.10-09.45".into(),
            start_time: None,
            end_time: None,
            title: "Физика".into(),
            lesson_type: LessonType::Lecture,
            week_type: label,
            teacher_auditoriums: teachers
                .iter()
                .map(|t| TeacherAuditorium {
                    teacher: Some(t.clone()),
                    auditorium: None,
                })
                .collect(),
            group: Some(GroupInfo {
                number: GroupNumber::new("344").unwrap(),
                course: 3,
                faculty: "ФИТ".into(),
            }),
        }
    }

    fn store() -> MemoryLessonStore {
        let a = teacher(1, "Иванов И.И.");
        let b = teacher(2, "Петров П.П.");
        MemoryLessonStore::new().with_lessons([
            lesson(1, 3, WeekTypeLabel::Numerator, &[a.clone()]),
            lesson(2, 11, WeekTypeLabel::Unknown, &[a.clone(), b.clone()]),
            lesson(3, 28, WeekTypeLabel::Denominator, &[b]),
        ])
    }

    #[tokio::test]
    async fn test_window_is_inclusive() {
        let group = EntitySelector::Group(GroupNumber::new("344").unwrap());
        let lessons = store()
            .fetch_lesson_window(&group, date(3), date(11))
            .await
            .unwrap();
        assert_eq!(lessons.len(), 2);
    }

    #[tokio::test]
    async fn test_teacher_selector_keeps_only_own_pairs() {
        let teacher = EntitySelector::Teacher(TeacherId::new(2));
        let lessons = store()
            .fetch_lesson_window(&teacher, date(1), date(31))
            .await
            .unwrap();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].teacher_auditoriums.len(), 1);
        assert_eq!(
            lessons[0].teacher_auditoriums[0].teacher.as_ref().unwrap().id,
            TeacherId::new(2)
        );
    }

    #[tokio::test]
    async fn test_nearest_skips_unknown_labels() {
        let group = EntitySelector::Group(GroupNumber::new("344").unwrap());
        let store = store();

        let before = store
            .fetch_nearest_labeled_lesson(&group, NearestLesson::Before(date(20)))
            .await
            .unwrap();
        assert_eq!(before.map(|l| l.id), Some(LessonId::new(1)));

        let after = store
            .fetch_nearest_labeled_lesson(&group, NearestLesson::After(date(3)))
            .await
            .unwrap();
        assert_eq!(after.map(|l| l.id), Some(LessonId::new(3)));

        let none = store
            .fetch_nearest_labeled_lesson(&group, NearestLesson::Before(date(3)))
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_profiles_register_from_lessons() {
        let store = store();
        assert!(
            store
                .entity_exists(&EntitySelector::Teacher(TeacherId::new(1)))
                .await
                .unwrap()
        );
        assert!(
            !store
                .entity_exists(&EntitySelector::Auditorium(AuditoriumId::new(1)))
                .await
                .unwrap()
        );
        let store = store.with_teacher(teacher(1, "Иванов И.И."), vec!["Кафедра физики".into()]);
        match store
            .entity_profile(&EntitySelector::Teacher(TeacherId::new(1)))
            .await
            .unwrap()
        {
            Some(EntityProfile::Teacher { departments, .. }) => {
                assert_eq!(departments, vec!["Кафедра физики".to_string()])
            }
            other => panic!("unexpected profile: {:?}", other),
        }
    }
}
