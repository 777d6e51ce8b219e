use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A short-lived check-in code issued for one class session.
///
/// At most one code per session is active at a time; superseded and
/// deactivated codes are kept as history. Time expiry is evaluated lazily
/// by the callers — a row whose `expires_at` has passed is simply unusable,
/// nothing sweeps it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    /// Instructor or admin who issued the code.
    pub issued_by: i64,
    /// 8-character upper-case alphanumeric code students type in.
    pub code: String,
    /// False once explicitly deactivated or superseded by a newer code.
    pub is_active: bool,
    /// Whether `expires_at` was computed from a duration at creation time.
    pub auto_expire: bool,
    /// None means the code never expires by time.
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_session::Entity",
        from = "Column::SessionId",
        to = "super::class_session::Column::Id"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::IssuedBy",
        to = "super::user::Column::Id"
    )]
    Issuer,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
}

impl Related<super::class_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// How long a code remains usable, from the perspective of a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRemaining {
    /// No time-based expiry configured.
    Unlimited,
    /// Remaining validity; zero once the deadline has passed.
    Remaining(Duration),
}

impl Model {
    /// True iff the code has a deadline and it lies strictly in the past.
    /// Depends on nothing but `expires_at` and `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(deadline) if deadline < now)
    }

    /// A code is usable while it is active and not time-expired.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired(now)
    }

    pub fn time_remaining(&self, now: DateTime<Utc>) -> TimeRemaining {
        match self.expires_at {
            None => TimeRemaining::Unlimited,
            Some(deadline) => TimeRemaining::Remaining((deadline - now).max(Duration::zero())),
        }
    }
}
