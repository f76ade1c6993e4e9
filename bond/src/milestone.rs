//! Anniversary catch-up planning.
//!
//! A bond earns one anniversary per whole milestone period since it was
//! formed. Periods not yet issued are caught up in one call, capped by the
//! highest period the anniversary issuer has metadata for.

use crate::bond::Bond;
use crate::error::BondError;
use std::ops::RangeInclusive;
use vow_types::Timestamp;

/// The periods a catch-up call will issue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatchUpPlan {
    /// Whole milestone periods since the bond started.
    pub periods_elapsed: u64,
    /// First period to issue (`last_milestone + 1`).
    pub start: u32,
    /// Last period to issue, `min(periods_elapsed, schedule_ceiling)`.
    pub ceiling: u32,
}

impl CatchUpPlan {
    pub fn periods(&self) -> RangeInclusive<u32> {
        self.start..=self.ceiling
    }

    /// Whether the schedule ceiling, not elapsed time, bounded this plan.
    pub fn is_capped(&self) -> bool {
        self.periods_elapsed > u64::from(self.ceiling)
    }
}

/// Work out which anniversary periods are outstanding for `bond` at `now`.
///
/// Fails with [`BondError::NothingToClaim`] when no full period has elapsed,
/// every elapsed period was already issued, or the schedule stops short of
/// the next period.
pub fn plan_catch_up(
    bond: &Bond,
    now: Timestamp,
    milestone_period_secs: u64,
    schedule_ceiling: u32,
) -> Result<CatchUpPlan, BondError> {
    let periods_elapsed = bond.bond_start.whole_periods_until(now, milestone_period_secs);
    if periods_elapsed == 0 || periods_elapsed <= u64::from(bond.last_milestone) {
        return Err(BondError::NothingToClaim);
    }
    let ceiling = periods_elapsed.min(u64::from(schedule_ceiling)) as u32;
    let start = bond.last_milestone.checked_add(1).ok_or(BondError::Overflow)?;
    if start > ceiling {
        return Err(BondError::NothingToClaim);
    }
    Ok(CatchUpPlan {
        periods_elapsed,
        start,
        ceiling,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vow_types::{Identity, Nullifier};

    const YEAR: u64 = 365 * 24 * 3600;

    fn bond(last_milestone: u32) -> Bond {
        Bond {
            partner_a: Identity::from_low_u64(1),
            partner_b: Identity::from_low_u64(2),
            nullifier_a: Nullifier::from_u64(1),
            nullifier_b: Nullifier::from_u64(2),
            bond_start: Timestamp::new(0),
            last_claim: Timestamp::new(0),
            last_milestone,
            active: true,
        }
    }

    #[test]
    fn three_periods_under_ceiling() {
        let plan = plan_catch_up(&bond(0), Timestamp::new(3 * YEAR), YEAR, 4).unwrap();
        assert_eq!(plan.periods(), 1..=3);
        assert!(!plan.is_capped());
    }

    #[test]
    fn ten_periods_capped_at_four() {
        let plan = plan_catch_up(&bond(0), Timestamp::new(10 * YEAR), YEAR, 4).unwrap();
        assert_eq!(plan.periods(), 1..=4);
        assert_eq!(plan.periods_elapsed, 10);
        assert!(plan.is_capped());
    }

    #[test]
    fn resumes_after_last_milestone() {
        let plan = plan_catch_up(&bond(4), Timestamp::new(10 * YEAR), YEAR, 6).unwrap();
        assert_eq!(plan.periods(), 5..=6);
    }

    #[test]
    fn nothing_before_first_period() {
        let err = plan_catch_up(&bond(0), Timestamp::new(YEAR - 1), YEAR, 4).unwrap_err();
        assert!(matches!(err, BondError::NothingToClaim));
    }

    #[test]
    fn nothing_when_already_issued() {
        let err = plan_catch_up(&bond(3), Timestamp::new(3 * YEAR), YEAR, 4).unwrap_err();
        assert!(matches!(err, BondError::NothingToClaim));
    }

    #[test]
    fn nothing_when_schedule_exhausted() {
        let err = plan_catch_up(&bond(4), Timestamp::new(10 * YEAR), YEAR, 4).unwrap_err();
        assert!(matches!(err, BondError::NothingToClaim));
    }

    #[test]
    fn empty_schedule_yields_nothing() {
        let err = plan_catch_up(&bond(0), Timestamp::new(2 * YEAR), YEAR, 0).unwrap_err();
        assert!(matches!(err, BondError::NothingToClaim));
    }
}
