//! Splits a total charge across participant housing units.

use std::collections::BTreeMap;

use crate::currency::{div_round, round2, Money};
use crate::domain::{DistributionEntry, DistributionType, HouseId, HousingUnit};
use crate::errors::{QuotaError, Result};

/// Allocation rule together with its policy-specific inputs.
#[derive(Debug, Clone)]
pub enum DistributionPolicy {
    /// Every participant owes the same rounded share.
    Equal,
    /// Shares weighted by per-unit factors; a missing factor counts as 1.
    Proportional { factors: BTreeMap<HouseId, f64> },
    /// Amounts supplied verbatim by the caller.
    Custom { amounts: BTreeMap<HouseId, Money> },
    /// Shares given as percentages of the total; missing entries default to
    /// an even split.
    Percentage { percentages: BTreeMap<HouseId, f64> },
}

impl DistributionPolicy {
    pub fn basis(&self) -> DistributionType {
        match self {
            DistributionPolicy::Equal => DistributionType::Equal,
            DistributionPolicy::Proportional { .. } => DistributionType::Proportional,
            DistributionPolicy::Custom { .. } => DistributionType::Custom,
            DistributionPolicy::Percentage { .. } => DistributionType::Percentage,
        }
    }
}

/// Allocates `total_amount` across `participants` under the given policy.
///
/// Pure: the caller persists the result into the quota's distribution map
/// and seeds the payment sub-ledgers from it.
pub fn distribute(
    total_amount: Money,
    participants: &[HousingUnit],
    policy: &DistributionPolicy,
) -> Result<BTreeMap<HouseId, DistributionEntry>> {
    if participants.is_empty() {
        return Err(QuotaError::NoParticipants);
    }
    if total_amount < 0 {
        return Err(QuotaError::InvalidAmount(format!(
            "total amount must not be negative, got {total_amount}"
        )));
    }

    let basis = policy.basis();
    let count = participants.len() as u32;
    let mut shares = BTreeMap::new();

    match policy {
        DistributionPolicy::Equal => {
            let amount = div_round(total_amount, count);
            let percentage = round2(100.0 / f64::from(count));
            for unit in participants {
                shares.insert(
                    unit.id.clone(),
                    DistributionEntry {
                        amount,
                        percentage,
                        basis,
                    },
                );
            }
        }
        DistributionPolicy::Proportional { factors } => {
            let factor_sum: f64 = participants
                .iter()
                .map(|unit| factors.get(&unit.id).copied().unwrap_or(1.0))
                .sum();
            if factor_sum <= 0.0 {
                return Err(QuotaError::InvalidAmount(
                    "proportional factors must sum to a positive value".into(),
                ));
            }
            for unit in participants {
                let factor = factors.get(&unit.id).copied().unwrap_or(1.0);
                let amount = (total_amount as f64 * factor / factor_sum).round() as Money;
                shares.insert(
                    unit.id.clone(),
                    DistributionEntry {
                        amount,
                        percentage: round2(100.0 * factor / factor_sum),
                        basis,
                    },
                );
            }
        }
        DistributionPolicy::Custom { amounts } => {
            for unit in participants {
                let amount = amounts.get(&unit.id).copied().unwrap_or(0);
                let percentage = if total_amount == 0 {
                    0.0
                } else {
                    round2(100.0 * amount as f64 / total_amount as f64)
                };
                shares.insert(
                    unit.id.clone(),
                    DistributionEntry {
                        amount,
                        percentage,
                        basis,
                    },
                );
            }
        }
        DistributionPolicy::Percentage { percentages } => {
            let fallback = 100.0 / f64::from(count);
            for unit in participants {
                let percentage = percentages.get(&unit.id).copied().unwrap_or(fallback);
                let amount = (total_amount as f64 * percentage / 100.0).round() as Money;
                shares.insert(
                    unit.id.clone(),
                    DistributionEntry {
                        amount,
                        percentage: round2(percentage),
                        basis,
                    },
                );
            }
        }
    }

    Ok(shares)
}

/// Outcome of checking caller-supplied custom amounts against the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomValidation {
    pub valid: bool,
    pub difference: Money,
    pub sum: Money,
}

/// UI-facing check: custom amounts must match the total within one peso.
pub fn validate_custom_distribution(
    total_amount: Money,
    amounts: &BTreeMap<HouseId, Money>,
) -> CustomValidation {
    let sum: Money = amounts.values().sum();
    let difference = total_amount - sum;
    CustomValidation {
        valid: difference.abs() < 1,
        difference,
        sum,
    }
}

/// Outcome of checking caller-supplied percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentageValidation {
    pub valid: bool,
    pub total: f64,
    pub difference: f64,
}

/// UI-facing check: percentages must sum to 100 within 0.1.
pub fn validate_percentage_distribution(
    percentages: &BTreeMap<HouseId, f64>,
) -> PercentageValidation {
    let total: f64 = percentages.values().sum();
    let difference = 100.0 - total;
    PercentageValidation {
        valid: difference.abs() < 0.1,
        total,
        difference,
    }
}
