use axum::Json;
use tracing::instrument;

use crate::modules::lesson_types::model::LessonTypeInfo;
use crate::modules::lesson_types::service::LessonTypeService;

#[utoipa::path(
    get,
    path = "/api/v1/lesson-types",
    responses(
        (status = 200, description = "Lesson types with abbreviations and descriptions", body = Vec<LessonTypeInfo>)
    ),
    tag = "Directory"
)]
#[instrument]
pub async fn get_lesson_types() -> Json<Vec<LessonTypeInfo>> {
    Json(LessonTypeService::list())
}
