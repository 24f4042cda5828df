use super::model::{LessonType, LessonTypeInfo};

pub struct LessonTypeService;

impl LessonTypeService {
    pub fn list() -> Vec<LessonTypeInfo> {
        LessonType::ALL.into_iter().map(LessonTypeInfo::from).collect()
    }
}
