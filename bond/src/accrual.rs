//! Yield accrual arithmetic.
//!
//! Yield is a pure function of whole accrual periods elapsed since the last
//! claim: `periods = (now − last_claim) / accrual_period`,
//! `reward = periods × unit_reward`. Claims reset `last_claim` to `now`,
//! so any partial period at claim time is forfeited.

use crate::bond::Bond;
use crate::error::BondError;
use vow_types::{BondParams, Timestamp};

/// Pending yield for a bond at `now`. Inactive bonds accrue nothing.
pub fn pending_yield(bond: &Bond, now: Timestamp, params: &BondParams) -> Result<u128, BondError> {
    if !bond.active {
        return Ok(0);
    }
    let periods = bond
        .last_claim
        .whole_periods_until(now, params.accrual_period_secs);
    (periods as u128)
        .checked_mul(params.unit_reward)
        .ok_or(BondError::Overflow)
}

/// Each partner's share of `total`. An odd raw unit is left unminted.
pub fn split_evenly(total: u128) -> u128 {
    total / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use vow_types::{Identity, Nullifier};

    fn params() -> BondParams {
        BondParams {
            accrual_period_secs: 60,
            unit_reward: 1,
            ..BondParams::default()
        }
    }

    fn bond_at(last_claim: u64) -> Bond {
        Bond {
            partner_a: Identity::from_low_u64(1),
            partner_b: Identity::from_low_u64(2),
            nullifier_a: Nullifier::from_u64(1),
            nullifier_b: Nullifier::from_u64(2),
            bond_start: Timestamp::new(0),
            last_claim: Timestamp::new(last_claim),
            last_milestone: 0,
            active: true,
        }
    }

    #[test]
    fn hundred_periods_yield_hundred_units() {
        let b = bond_at(1_000);
        let now = Timestamp::new(1_000 + 100 * 60);
        assert_eq!(pending_yield(&b, now, &params()).unwrap(), 100);
    }

    #[test]
    fn partial_period_does_not_count() {
        let b = bond_at(0);
        assert_eq!(pending_yield(&b, Timestamp::new(59), &params()).unwrap(), 0);
        assert_eq!(pending_yield(&b, Timestamp::new(119), &params()).unwrap(), 1);
    }

    #[test]
    fn inactive_bond_is_zero() {
        let mut b = bond_at(0);
        b.active = false;
        assert_eq!(pending_yield(&b, Timestamp::new(6_000), &params()).unwrap(), 0);
    }

    #[test]
    fn overflow_is_reported() {
        let b = bond_at(0);
        let p = BondParams {
            accrual_period_secs: 1,
            unit_reward: u128::MAX,
            ..BondParams::default()
        };
        assert!(matches!(
            pending_yield(&b, Timestamp::new(2), &p),
            Err(BondError::Overflow)
        ));
    }

    #[test]
    fn split_drops_odd_unit() {
        assert_eq!(split_evenly(100), 50);
        assert_eq!(split_evenly(21), 10);
        assert_eq!(split_evenly(1), 0);
    }
}
