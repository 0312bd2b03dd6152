#![allow(dead_code)] // MemoryCreditLedger backs tests and DB-less dev runs

//! Credit Ledger — the paywall gate behind every paid AI operation.
//!
//! The ledger is a trait so handlers and the search orchestrator can be
//! tested against the in-memory backend. `PgCreditLedger` is the production
//! implementation; it is constructed once in `main` and passed by reference
//! through `AppState` — no module-level singleton.
//!
//! Known gap: check-then-charge is not held under a transaction across the
//! costly AI call, so two concurrent requests from the same user can both
//! pass the check. Expected per-user concurrency is 1; the guarded UPDATE in
//! `charge` still keeps any single charge from driving the stored balance
//! negative.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::UserIdentity;
use crate::models::user::User;

/// Credits granted to a user on first contact.
pub const INITIAL_FREE_CREDITS: i32 = 3;
pub const FREE_TIER: &str = "free";

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient credits")]
    InsufficientCredits,

    #[error("user not found")]
    UserNotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read-only balance snapshot used by dry-run (pre-flight) checks.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CreditStatus {
    pub ok: bool,
    pub remaining: i32,
}

/// The ledger seam. Carried in `AppState` as `Arc<dyn CreditLedger>`.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Idempotent lookup-or-create. The creation path grants
    /// `INITIAL_FREE_CREDITS` on the free tier; an existing record is
    /// returned untouched.
    async fn get_or_create(&self, identity: &UserIdentity) -> Result<User, LedgerError>;

    /// Read-only dry run so callers can pre-flight the paywall before
    /// issuing a costly search. Never mutates the balance.
    async fn check(&self, user_id: Uuid) -> Result<CreditStatus, LedgerError>;

    /// Decrements the balance by one. Must only be invoked after the costly
    /// operation succeeds — a failed AI call never charges.
    async fn charge(&self, user_id: Uuid) -> Result<User, LedgerError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PgCreditLedger — production backend
// ────────────────────────────────────────────────────────────────────────────

pub struct PgCreditLedger {
    pool: PgPool,
}

impl PgCreditLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CreditLedger for PgCreditLedger {
    async fn get_or_create(&self, identity: &UserIdentity) -> Result<User, LedgerError> {
        // Insert-if-absent, then read back. ON CONFLICT keeps the existing
        // record (and its spent balance) untouched.
        sqlx::query(
            "INSERT INTO users (external_id, email, credits, tier)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (external_id) DO NOTHING",
        )
        .bind(&identity.external_id)
        .bind(&identity.email)
        .bind(INITIAL_FREE_CREDITS)
        .bind(FREE_TIER)
        .execute(&self.pool)
        .await?;

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_id = $1")
            .bind(&identity.external_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn check(&self, user_id: Uuid) -> Result<CreditStatus, LedgerError> {
        let credits: i32 = sqlx::query_scalar("SELECT credits FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(LedgerError::UserNotFound)?;

        Ok(CreditStatus {
            ok: credits > 0,
            remaining: credits,
        })
    }

    async fn charge(&self, user_id: Uuid) -> Result<User, LedgerError> {
        // Single guarded statement: the WHERE clause keeps this charge from
        // taking the stored balance below zero.
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET credits = credits - 1
             WHERE id = $1 AND credits > 0
             RETURNING *",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match user {
            Some(user) => {
                tracing::info!(user_id = %user_id, remaining = user.credits, "Charged 1 credit");
                Ok(user)
            }
            None => Err(LedgerError::InsufficientCredits),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryCreditLedger — dev/test backend
// ────────────────────────────────────────────────────────────────────────────

/// In-memory ledger with the same semantics as the Postgres backend. Used by
/// unit tests and runnable standalone for local development without a DB.
#[derive(Default)]
pub struct MemoryCreditLedger {
    users: RwLock<HashMap<String, User>>,
    /// Counts calls to `charge`, successful or not. Lets tests assert that
    /// dry-run paths never attempt a charge.
    pub charge_attempts: AtomicU64,
}

impl MemoryCreditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test helper: force a specific balance for an existing user.
    pub async fn set_credits(&self, external_id: &str, credits: i32) {
        if let Some(user) = self.users.write().await.get_mut(external_id) {
            user.credits = credits;
        }
    }
}

#[async_trait]
impl CreditLedger for MemoryCreditLedger {
    async fn get_or_create(&self, identity: &UserIdentity) -> Result<User, LedgerError> {
        let mut users = self.users.write().await;
        let user = users
            .entry(identity.external_id.clone())
            .or_insert_with(|| User {
                id: Uuid::new_v4(),
                external_id: identity.external_id.clone(),
                email: identity.email.clone(),
                credits: INITIAL_FREE_CREDITS,
                tier: FREE_TIER.to_string(),
                created_at: chrono::Utc::now(),
            });
        Ok(user.clone())
    }

    async fn check(&self, user_id: Uuid) -> Result<CreditStatus, LedgerError> {
        let users = self.users.read().await;
        let user = users
            .values()
            .find(|u| u.id == user_id)
            .ok_or(LedgerError::UserNotFound)?;
        Ok(CreditStatus {
            ok: user.credits > 0,
            remaining: user.credits,
        })
    }

    async fn charge(&self, user_id: Uuid) -> Result<User, LedgerError> {
        self.charge_attempts.fetch_add(1, Ordering::SeqCst);

        let mut users = self.users.write().await;
        let user = users
            .values_mut()
            .find(|u| u.id == user_id)
            .ok_or(LedgerError::UserNotFound)?;

        if user.credits <= 0 {
            return Err(LedgerError::InsufficientCredits);
        }
        user.credits -= 1;
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: &str) -> UserIdentity {
        UserIdentity {
            external_id: id.to_string(),
            email: format!("{id}@example.com"),
        }
    }

    #[tokio::test]
    async fn test_get_or_create_grants_initial_credits() {
        let ledger = MemoryCreditLedger::new();
        let user = ledger.get_or_create(&identity("ext-1")).await.unwrap();
        assert_eq!(user.credits, INITIAL_FREE_CREDITS);
        assert_eq!(user.tier, FREE_TIER);
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let ledger = MemoryCreditLedger::new();
        let first = ledger.get_or_create(&identity("ext-1")).await.unwrap();
        ledger.charge(first.id).await.unwrap();

        let second = ledger.get_or_create(&identity("ext-1")).await.unwrap();
        assert_eq!(second.id, first.id);
        // Re-creation must not reset a spent balance.
        assert_eq!(second.credits, INITIAL_FREE_CREDITS - 1);
    }

    #[tokio::test]
    async fn test_check_never_mutates_balance() {
        let ledger = MemoryCreditLedger::new();
        let user = ledger.get_or_create(&identity("ext-1")).await.unwrap();

        for _ in 0..5 {
            let status = ledger.check(user.id).await.unwrap();
            assert!(status.ok);
            assert_eq!(status.remaining, INITIAL_FREE_CREDITS);
        }
        assert_eq!(ledger.charge_attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_charge_decrements_until_exhausted() {
        let ledger = MemoryCreditLedger::new();
        let user = ledger.get_or_create(&identity("ext-1")).await.unwrap();

        assert_eq!(ledger.charge(user.id).await.unwrap().credits, 2);
        assert_eq!(ledger.charge(user.id).await.unwrap().credits, 1);
        assert_eq!(ledger.charge(user.id).await.unwrap().credits, 0);

        let err = ledger.charge(user.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientCredits));

        // The failed charge left the balance at exactly zero, never below.
        let status = ledger.check(user.id).await.unwrap();
        assert!(!status.ok);
        assert_eq!(status.remaining, 0);
    }

    #[tokio::test]
    async fn test_check_unknown_user() {
        let ledger = MemoryCreditLedger::new();
        let err = ledger.check(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, LedgerError::UserNotFound));
    }
}
