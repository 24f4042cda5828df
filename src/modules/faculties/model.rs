pub use timetable_models::faculties::{
    CourseFaculties, CoursesQuery, DateQuery, Faculty, FacultiesByCourseQuery, FacultyCourseGroups,
    FacultyCourses, GroupsQuery,
};
