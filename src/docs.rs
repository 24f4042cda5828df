use utoipa::OpenApi;

use timetable_models::auditoriums::{Auditorium, Building};
use timetable_models::day::{DayInfo, WeekTypeSource};
use timetable_models::faculties::{CourseFaculties, Faculty, FacultyCourseGroups, FacultyCourses};
use timetable_models::teachers::Department;
use timetable_models::{
    AuditoriumLesson, AuditoriumSchedule, LessonType, LessonTypeInfo, StudentLesson,
    StudentSchedule, TeacherAuditorium, TeacherInfo, TeacherLesson, TeacherSchedule, WeekType,
};

use crate::modules::schedule::model::BatchGroupsRequest;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::schedule::controller::get_group_schedule,
        crate::modules::schedule::controller::get_group_schedules,
        crate::modules::schedule::controller::get_teacher_schedule,
        crate::modules::schedule::controller::get_auditorium_schedule,
        crate::modules::day::controller::get_day,
        crate::modules::faculties::controller::get_faculties,
        crate::modules::faculties::controller::get_faculties_with_courses,
        crate::modules::faculties::controller::get_faculties_by_course,
        crate::modules::faculties::controller::get_courses,
        crate::modules::faculties::controller::get_groups,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_departments,
        crate::modules::auditoriums::controller::get_buildings,
        crate::modules::auditoriums::controller::get_building,
        crate::modules::auditoriums::controller::get_auditoriums,
        crate::modules::auditoriums::controller::get_auditorium,
        crate::modules::lesson_types::controller::get_lesson_types,
    ),
    components(
        schemas(
            StudentSchedule,
            TeacherSchedule,
            AuditoriumSchedule,
            StudentLesson,
            TeacherLesson,
            AuditoriumLesson,
            TeacherAuditorium,
            TeacherInfo,
            BatchGroupsRequest,
            WeekType,
            LessonType,
            LessonTypeInfo,
            DayInfo,
            WeekTypeSource,
            Faculty,
            FacultyCourses,
            CourseFaculties,
            FacultyCourseGroups,
            Department,
            Building,
            Auditorium,
        )
    ),
    tags(
        (name = "Schedule", description = "Two-week schedules of groups, teachers and auditoriums"),
        (name = "Directory", description = "Faculties, courses, groups, teachers, rooms and lesson types")
    ),
    info(
        title = "Timetable API",
        version = "0.1.0",
        description = "Bi-weekly university timetable: numerator/denominator week resolution and schedule assembly.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_schedule_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/schedule/groups/{group}"));
        assert!(doc.paths.paths.contains_key("/api/v1/day"));
        assert_eq!(doc.paths.paths.len(), 17);
    }
}
