use serde::Serialize;

#[derive(Debug, Serialize, Default)]
pub struct ClassResponse {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<db::models::class::Model> for ClassResponse {
    fn from(m: db::models::class::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            title: m.title,
            description: m.description,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct SessionResponse {
    pub id: i64,
    pub class_id: i64,
    pub title: String,
    pub attendance_enabled: bool,
    pub attendance_start_time: Option<String>,
    pub attendance_end_time: Option<String>,
    pub late_threshold_minutes: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<db::models::class_session::Model> for SessionResponse {
    fn from(m: db::models::class_session::Model) -> Self {
        Self {
            id: m.id,
            class_id: m.class_id,
            title: m.title,
            attendance_enabled: m.attendance_enabled,
            attendance_start_time: m.attendance_start_time.map(|t| t.to_rfc3339()),
            attendance_end_time: m.attendance_end_time.map(|t| t.to_rfc3339()),
            late_threshold_minutes: m.late_threshold_minutes,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}
