pub use timetable_models::auditoriums::{
    Auditorium, AuditoriumFilterParams, AuditoriumRow, Building,
};
