use serde::Serialize;

/// Standard JSON envelope for every endpoint:
///
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Attendance code created"
/// }
/// ```
///
/// `success` mirrors the HTTP status class so clients scripting against
/// the API don't have to inspect status codes, and `message` carries the
/// human-readable rejection reason on failures.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Error responses carry `T::default()` as data, since there is no
    /// useful payload to return.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}
