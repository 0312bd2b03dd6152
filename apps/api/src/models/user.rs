use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A ledger row. Created lazily on the first authenticated request with
/// 3 free credits; the only mutation this service performs is the decrement
/// in `CreditLedger::charge`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    pub credits: i32,
    pub tier: String,
    pub created_at: DateTime<Utc>,
}
