pub use timetable_models::teachers::{
    Department, DepartmentFilterParams, TeacherFilterParams, TeacherInfo,
};
