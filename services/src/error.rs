use sea_orm::{DbErr, TransactionError};
use thiserror::Error;

/// Result type for attendance engine operations.
pub type AttendanceResult<T> = Result<T, AttendanceError>;

/// Everything the engine can reject with. All variants except `Storage`
/// and `RosterInconsistent` are client-recoverable and surfaced verbatim
/// as rejection reasons.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Not authorized to manage attendance for this session")]
    NotAuthorized,

    #[error("Invalid expiration: {0}")]
    InvalidExpiration(String),

    #[error("Session not found")]
    SessionNotFound,

    #[error("Attendance is not enabled for this session")]
    AttendanceDisabled,

    #[error("No active attendance code for this session")]
    NoActiveCode,

    #[error("Attendance code has expired")]
    CodeExpired,

    #[error("Submitted code does not match the active code")]
    CodeMismatch,

    #[error("Attendance already recorded for this session")]
    AlreadyCheckedIn,

    #[error("Not enrolled as a student in this class")]
    NotEnrolled,

    #[error("Attendance records exceed the enrolled roster for this session")]
    RosterInconsistent,

    #[error("Storage error: {0}")]
    Storage(#[from] DbErr),
}

impl From<TransactionError<AttendanceError>> for AttendanceError {
    fn from(err: TransactionError<AttendanceError>) -> Self {
        match err {
            TransactionError::Connection(e) => AttendanceError::Storage(e),
            TransactionError::Transaction(e) => e,
        }
    }
}
