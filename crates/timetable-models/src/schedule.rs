//! Lesson, week and schedule models.
//!
//! [`LessonRecord`] is what the lesson store hands to the engine: one dated
//! lesson with its teacher/auditorium links. The engine turns records into
//! [`LessonSlot`]s bucketed into a [`ScheduleGrid`], and the view types at the
//! bottom of this module are what the HTTP layer serializes.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::auditoriums::Auditorium;
use crate::ids::{AuditoriumId, LessonId, TeacherId};
use crate::value_types::GroupNumber;

/// Display text of a placeholder slot.
pub const EMPTY_LESSON_TEXT: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

// ============================================================================
// Week types
// ============================================================================

/// One of the two alternating weeks of the timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeekType {
    /// Числитель
    Numerator,
    /// Знаменатель
    Denominator,
}

impl WeekType {
    pub const ALL: [WeekType; 2] = [WeekType::Numerator, WeekType::Denominator];

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Numerator => Self::Denominator,
            Self::Denominator => Self::Numerator,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numerator => "numerator",
            Self::Denominator => "denominator",
        }
    }

    pub fn title_ru(self) -> &'static str {
        match self {
            Self::Numerator => "числитель",
            Self::Denominator => "знаменатель",
        }
    }
}

impl fmt::Display for WeekType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Week tag stored on a lesson row. Rows imported without a tag carry `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeekTypeLabel {
    Numerator,
    Denominator,
    #[default]
    Unknown,
}

impl WeekTypeLabel {
    pub fn known(self) -> Option<WeekType> {
        match self {
            Self::Numerator => Some(WeekType::Numerator),
            Self::Denominator => Some(WeekType::Denominator),
            Self::Unknown => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numerator => "numerator",
            Self::Denominator => "denominator",
            Self::Unknown => "unknown",
        }
    }

    /// Reads a stored tag. Anything unrecognised counts as unknown.
    pub fn from_db(value: &str) -> Self {
        value.parse().unwrap_or(Self::Unknown)
    }
}

impl From<WeekType> for WeekTypeLabel {
    fn from(week_type: WeekType) -> Self {
        match week_type {
            WeekType::Numerator => Self::Numerator,
            WeekType::Denominator => Self::Denominator,
        }
    }
}

impl FromStr for WeekTypeLabel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "numerator" => Ok(Self::Numerator),
            "denominator" => Ok(Self::Denominator),
            "unknown" | "" => Ok(Self::Unknown),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

// ============================================================================
// Lesson types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    Lecture,
    Lab,
    Practice,
    Coursework,
    CourseProject,
    Exam,
    Zachet,
    Consultation,
    Elective,
    #[default]
    Unknown,
}

impl LessonType {
    pub const ALL: [LessonType; 10] = [
        LessonType::Lecture,
        LessonType::Lab,
        LessonType::Practice,
        LessonType::Coursework,
        LessonType::CourseProject,
        LessonType::Exam,
        LessonType::Zachet,
        LessonType::Consultation,
        LessonType::Elective,
        LessonType::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lecture => "lecture",
            Self::Lab => "lab",
            Self::Practice => "practice",
            Self::Coursework => "coursework",
            Self::CourseProject => "course_project",
            Self::Exam => "exam",
            Self::Zachet => "zachet",
            Self::Consultation => "consultation",
            Self::Elective => "elective",
            Self::Unknown => "unknown",
        }
    }

    /// Prefix used in lesson display text. Empty for unknown lessons.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Lecture => "Лек.",
            Self::Lab => "Лаб.",
            Self::Practice => "Упр.",
            Self::Coursework => "Курс. раб.",
            Self::CourseProject => "Курс. проект",
            Self::Exam => "Экз.",
            Self::Zachet => "Зач.",
            Self::Consultation => "Конс.",
            Self::Elective => "Факультатив",
            Self::Unknown => "",
        }
    }

    pub fn description_ru(self) -> &'static str {
        match self {
            Self::Lecture => "лекция",
            Self::Lab => "лабораторная работа",
            Self::Practice => "практика",
            Self::Coursework => "курсовая работа",
            Self::CourseProject => "курсовой проект",
            Self::Exam => "экзамен",
            Self::Zachet => "зачет",
            Self::Consultation => "консультация",
            Self::Elective => "факультатив",
            Self::Unknown => "",
        }
    }

    /// Reads a stored type. Anything unrecognised counts as unknown.
    pub fn from_db(value: &str) -> Self {
        value.parse().unwrap_or(Self::Unknown)
    }
}

impl FromStr for LessonType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == trimmed)
            .ok_or_else(|| UnknownVariant(trimmed.to_string()))
    }
}

/// Entry of the lesson types reference list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LessonTypeInfo {
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub abbreviation: String,
    pub description: String,
}

impl From<LessonType> for LessonTypeInfo {
    fn from(lesson_type: LessonType) -> Self {
        Self {
            lesson_type,
            abbreviation: lesson_type.abbreviation().to_string(),
            description: lesson_type.description_ru().to_string(),
        }
    }
}

// ============================================================================
// Weekdays
// ============================================================================

/// Academic weekday. Sunday never carries lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// `None` for Sundays.
    pub fn from_date(date: NaiveDate) -> Option<Self> {
        Self::from_chrono(date.weekday())
    }

    pub fn from_chrono(weekday: chrono::Weekday) -> Option<Self> {
        match weekday {
            chrono::Weekday::Mon => Some(Self::Monday),
            chrono::Weekday::Tue => Some(Self::Tuesday),
            chrono::Weekday::Wed => Some(Self::Wednesday),
            chrono::Weekday::Thu => Some(Self::Thursday),
            chrono::Weekday::Fri => Some(Self::Friday),
            chrono::Weekday::Sat => Some(Self::Saturday),
            chrono::Weekday::Sun => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
        }
    }
}

// ============================================================================
// Participants
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct TeacherInfo {
    pub id: TeacherId,
    /// Full name, e.g. "Иванов Иван Иванович"
    pub full_name: String,
    /// Name with initials, e.g. "Иванов И.И."
    pub short_name: String,
    /// Link to the teacher's page on the university site
    pub link: Option<String>,
}

/// A teacher and the room they teach a lesson in. Either side may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub struct TeacherAuditorium {
    pub teacher: Option<TeacherInfo>,
    pub auditorium: Option<Auditorium>,
}

impl TeacherAuditorium {
    pub fn is_empty(&self) -> bool {
        self.teacher.is_none() && self.auditorium.is_none()
    }

    /// `"<short name> <auditorium>"`, or whichever side is present.
    pub fn label(&self) -> String {
        let teacher = self.teacher.as_ref().map(|t| t.short_name.as_str());
        let auditorium = self.auditorium.as_ref().map(|a| a.display_name.as_str());
        match (teacher, auditorium) {
            (Some(t), Some(a)) => format!("{} {}", t, a),
            (Some(t), None) => t.to_string(),
            (None, Some(a)) => a.to_string(),
            (None, None) => String::new(),
        }
    }

    fn sort_key(&self) -> (&str, &str) {
        (
            self.teacher.as_ref().map_or("", |t| t.short_name.as_str()),
            self.auditorium.as_ref().map_or("", |a| a.display_name.as_str()),
        )
    }

    /// Deterministic participant order: teacher short name, then auditorium display name.
    pub fn cmp_display(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key()).then_with(|| {
            let ids = |p: &Self| {
                (
                    p.teacher.as_ref().map(|t| t.id),
                    p.auditorium.as_ref().map(|a| a.id),
                )
            };
            ids(self).cmp(&ids(other))
        })
    }
}

/// The group a lesson row belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct GroupInfo {
    pub number: GroupNumber,
    pub course: i32,
    /// Short faculty title
    pub faculty: String,
}

// ============================================================================
// Records and slots
// ============================================================================

/// One dated lesson as read from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonRecord {
    pub id: LessonId,
    pub date: NaiveDate,
    /// Zero-padded slot label, e.g. "08.10-09.45"
    pub time: String,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub title: String,
    pub lesson_type: LessonType,
    pub week_type: WeekTypeLabel,
    pub teacher_auditoriums: Vec<TeacherAuditorium>,
    pub group: Option<GroupInfo>,
}

impl LessonRecord {
    pub fn weekday(&self) -> Option<Weekday> {
        Weekday::from_date(self.date)
    }
}

/// A resolved, display-ready entry of a day's schedule.
///
/// Participant lists are filled according to what the rows carried; each
/// schedule view picks the ones it exposes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LessonSlot {
    pub time: String,
    pub lesson: String,
    pub title: String,
    pub lesson_type: Option<LessonType>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub teacher_auditoriums: Vec<TeacherAuditorium>,
    pub teachers: Vec<TeacherInfo>,
    pub auditoriums: Vec<Auditorium>,
    pub groups: Vec<GroupNumber>,
    pub faculties: Vec<String>,
    pub courses: Vec<i32>,
    /// Smallest id among the merged rows; `None` for placeholders.
    pub first_lesson_id: Option<LessonId>,
}

impl LessonSlot {
    pub fn placeholder(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            lesson: EMPTY_LESSON_TEXT.to_string(),
            ..Self::default()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.first_lesson_id.is_none()
    }
}

// ============================================================================
// Grid containers
// ============================================================================

/// Lessons of one week, keyed by weekday. All six days are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Week<L> {
    pub monday: Vec<L>,
    pub tuesday: Vec<L>,
    pub wednesday: Vec<L>,
    pub thursday: Vec<L>,
    pub friday: Vec<L>,
    pub saturday: Vec<L>,
}

impl<L> Default for Week<L> {
    fn default() -> Self {
        Self {
            monday: Vec::new(),
            tuesday: Vec::new(),
            wednesday: Vec::new(),
            thursday: Vec::new(),
            friday: Vec::new(),
            saturday: Vec::new(),
        }
    }
}

impl<L> Week<L> {
    pub fn day(&self, weekday: Weekday) -> &Vec<L> {
        match weekday {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
        }
    }

    pub fn day_mut(&mut self, weekday: Weekday) -> &mut Vec<L> {
        match weekday {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
        }
    }

    pub fn days(&self) -> impl Iterator<Item = (Weekday, &Vec<L>)> {
        Weekday::ALL.into_iter().map(move |day| (day, self.day(day)))
    }

    pub fn map<M>(self, mut f: impl FnMut(L) -> M) -> Week<M> {
        let mut convert = |day: Vec<L>| day.into_iter().map(&mut f).collect::<Vec<M>>();
        Week {
            monday: convert(self.monday),
            tuesday: convert(self.tuesday),
            wednesday: convert(self.wednesday),
            thursday: convert(self.thursday),
            friday: convert(self.friday),
            saturday: convert(self.saturday),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days().all(|(_, lessons)| lessons.is_empty())
    }
}

/// Both alternating weeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NumeratorDenominator<L> {
    pub numerator: Week<L>,
    pub denominator: Week<L>,
}

impl<L> Default for NumeratorDenominator<L> {
    fn default() -> Self {
        Self {
            numerator: Week::default(),
            denominator: Week::default(),
        }
    }
}

impl<L> NumeratorDenominator<L> {
    pub fn week(&self, week_type: WeekType) -> &Week<L> {
        match week_type {
            WeekType::Numerator => &self.numerator,
            WeekType::Denominator => &self.denominator,
        }
    }

    pub fn week_mut(&mut self, week_type: WeekType) -> &mut Week<L> {
        match week_type {
            WeekType::Numerator => &mut self.numerator,
            WeekType::Denominator => &mut self.denominator,
        }
    }

    pub fn map<M>(self, mut f: impl FnMut(L) -> M) -> NumeratorDenominator<M> {
        NumeratorDenominator {
            numerator: self.numerator.map(&mut f),
            denominator: self.denominator.map(&mut f),
        }
    }
}

/// The engine's output grid.
pub type ScheduleGrid = NumeratorDenominator<LessonSlot>;

// ============================================================================
// Selectors and profiles
// ============================================================================

/// Which timetable is being asked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntitySelector {
    Group(GroupNumber),
    Teacher(TeacherId),
    Auditorium(AuditoriumId),
}

impl EntitySelector {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Group(_) => "group",
            Self::Teacher(_) => "teacher",
            Self::Auditorium(_) => "auditorium",
        }
    }

    pub fn key(&self) -> String {
        match self {
            Self::Group(number) => number.to_string(),
            Self::Teacher(id) => id.to_string(),
            Self::Auditorium(id) => id.to_string(),
        }
    }
}

impl fmt::Display for EntitySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.key())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityProfile {
    Group(GroupInfo),
    Teacher {
        teacher: TeacherInfo,
        departments: Vec<String>,
    },
    Auditorium(Auditorium),
}

// ============================================================================
// Schedule views
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StudentLesson {
    /// Slot label, e.g. "08.10-09.45"
    pub time: String,
    /// Display text: type abbreviation, title, teachers and rooms
    pub lesson: String,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: Option<LessonType>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub teacher_auditoriums: Vec<TeacherAuditorium>,
}

impl From<LessonSlot> for StudentLesson {
    fn from(slot: LessonSlot) -> Self {
        Self {
            time: slot.time,
            lesson: slot.lesson,
            title: slot.title,
            lesson_type: slot.lesson_type,
            date: slot.date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            teacher_auditoriums: slot.teacher_auditoriums,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeacherLesson {
    pub time: String,
    pub lesson: String,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: Option<LessonType>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub faculties: Vec<String>,
    pub groups: Vec<GroupNumber>,
    pub courses: Vec<i32>,
    pub auditoriums: Vec<Auditorium>,
}

impl From<LessonSlot> for TeacherLesson {
    fn from(slot: LessonSlot) -> Self {
        Self {
            time: slot.time,
            lesson: slot.lesson,
            title: slot.title,
            lesson_type: slot.lesson_type,
            date: slot.date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            faculties: slot.faculties,
            groups: slot.groups,
            courses: slot.courses,
            auditoriums: slot.auditoriums,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditoriumLesson {
    pub time: String,
    pub lesson: String,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: Option<LessonType>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub faculties: Vec<String>,
    pub groups: Vec<GroupNumber>,
    pub courses: Vec<i32>,
    pub teachers: Vec<TeacherInfo>,
}

impl From<LessonSlot> for AuditoriumLesson {
    fn from(slot: LessonSlot) -> Self {
        Self {
            time: slot.time,
            lesson: slot.lesson,
            title: slot.title,
            lesson_type: slot.lesson_type,
            date: slot.date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            faculties: slot.faculties,
            groups: slot.groups,
            courses: slot.courses,
            teachers: slot.teachers,
        }
    }
}

/// Two-week timetable of a student group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StudentSchedule {
    pub group: GroupNumber,
    pub faculty: String,
    pub course: i32,
    /// Numerator week range, "DD.MM-DD.MM"
    pub numerator_period: String,
    /// Denominator week range, "DD.MM-DD.MM"
    pub denominator_period: String,
    /// Week type of the week containing the requested date
    pub input_week_type: WeekType,
    /// Distinct slot labels across both weeks
    pub lessons_times: Vec<String>,
    pub schedule: NumeratorDenominator<StudentLesson>,
}

/// Two-week timetable of a teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeacherSchedule {
    pub teacher: TeacherInfo,
    pub departments: Vec<String>,
    pub numerator_period: String,
    pub denominator_period: String,
    pub input_week_type: WeekType,
    pub lessons_times: Vec<String>,
    pub schedule: NumeratorDenominator<TeacherLesson>,
}

/// Two-week occupancy of an auditorium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditoriumSchedule {
    pub auditorium: Auditorium,
    pub numerator_period: String,
    pub denominator_period: String,
    pub input_week_type: WeekType,
    pub lessons_times: Vec<String>,
    pub schedule: NumeratorDenominator<AuditoriumLesson>,
}
