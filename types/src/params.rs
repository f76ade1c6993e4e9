//! Per-deployment bond parameters.
//!
//! These are fixed when an engine is constructed. Every field has a serde
//! default so a partial TOML table is enough to override a single value.

use crate::amount::REWARD_UNIT;
use crate::error::TypesError;
use serde::{Deserialize, Serialize};

/// Constants that shape accrual, anniversaries and proof domains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondParams {
    /// Application identifier hashed into both action domains.
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// Length of one yield accrual period in seconds.
    #[serde(default = "default_accrual_period_secs")]
    pub accrual_period_secs: u64,

    /// Raw reward units accrued per bond per accrual period.
    #[serde(default = "default_unit_reward", with = "crate::amount::raw_amount")]
    pub unit_reward: u128,

    /// Length of one anniversary (milestone) period in seconds.
    #[serde(default = "default_milestone_period_secs")]
    pub milestone_period_secs: u64,

    /// Raw reward units seeded to each partner when a bond is formed.
    #[serde(default = "default_initial_reward", with = "crate::amount::raw_amount")]
    pub initial_reward: u128,

    /// Whether proof nullifiers are tracked per action domain and rejected on reuse.
    #[serde(default = "default_true")]
    pub replay_guard: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_app_id() -> String {
    "app_vow_bonding".to_string()
}

fn default_accrual_period_secs() -> u64 {
    60
}

fn default_unit_reward() -> u128 {
    REWARD_UNIT
}

fn default_milestone_period_secs() -> u64 {
    365 * 24 * 3600
}

fn default_initial_reward() -> u128 {
    100 * REWARD_UNIT
}

fn default_true() -> bool {
    true
}

// ── Impl ───────────────────────────────────────────────────────────────

impl BondParams {
    /// Reject parameter sets the engine cannot run with.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.app_id.is_empty() {
            return Err(TypesError::InvalidParams("app_id must not be empty".into()));
        }
        if self.accrual_period_secs == 0 {
            return Err(TypesError::InvalidParams(
                "accrual_period_secs must be non-zero".into(),
            ));
        }
        if self.milestone_period_secs == 0 {
            return Err(TypesError::InvalidParams(
                "milestone_period_secs must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for BondParams {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
            accrual_period_secs: default_accrual_period_secs(),
            unit_reward: default_unit_reward(),
            milestone_period_secs: default_milestone_period_secs(),
            initial_reward: default_initial_reward(),
            replay_guard: default_true(),
        }
    }
}
