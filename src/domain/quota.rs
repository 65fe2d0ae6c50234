use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::HouseId;
use super::payment::PaymentEntry;
use crate::currency::Money;
use crate::errors::QuotaError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuotaCategory {
    Water,
    Repairs,
    Maintenance,
    Projects,
    Services,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    OneTime,
    Installments,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DistributionType {
    Equal,
    Proportional,
    Custom,
    Percentage,
}

impl FromStr for DistributionType {
    type Err = QuotaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(DistributionType::Equal),
            "proportional" => Ok(DistributionType::Proportional),
            "custom" => Ok(DistributionType::Custom),
            "percentage" => Ok(DistributionType::Percentage),
            other => Err(QuotaError::InvalidPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuotaStatus {
    Pending,
    Active,
    Completed,
}

impl QuotaStatus {
    /// Snapshot taken once at creation; never re-derived automatically.
    pub fn derive(
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        if end_date.is_some_and(|end| end < today) {
            QuotaStatus::Completed
        } else if start_date.is_some_and(|start| start > today) {
            QuotaStatus::Pending
        } else {
            QuotaStatus::Active
        }
    }
}

/// Community-wide installment plan counters, distinct from any single
/// participant's own progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallmentSchedule {
    pub total: u32,
    pub paid: u32,
    pub pending: u32,
}

impl InstallmentSchedule {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            paid: 0,
            pending: total,
        }
    }
}

/// One participant's share of the distributed total, retained for audit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistributionEntry {
    pub amount: Money,
    pub percentage: f64,
    pub basis: DistributionType,
}

/// Caller-facing input for creating a quota.
#[derive(Debug, Clone)]
pub struct NewQuota {
    pub name: String,
    pub description: String,
    pub category: QuotaCategory,
    pub total_amount: Money,
    pub payment_type: PaymentType,
    /// Required for installment quotas; ignored otherwise.
    pub installment_count: Option<u32>,
    pub due_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// A chargeable obligation levied on a subset of housing units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quota {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: QuotaCategory,
    /// Sum owed across all participants combined.
    pub total_amount: Money,
    pub payment_type: PaymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<InstallmentSchedule>,
    /// Community-wide per-installment reference value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_amount: Option<Money>,
    pub distribution_type: DistributionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub status: QuotaStatus,
    #[serde(default)]
    pub payments: BTreeMap<HouseId, PaymentEntry>,
    #[serde(default)]
    pub distribution: BTreeMap<HouseId, DistributionEntry>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    /// Optimistic concurrency stamp, bumped by the store on every write.
    #[serde(default)]
    pub version: u64,
}

impl Quota {
    pub fn payment(&self, house_id: &str) -> Option<&PaymentEntry> {
        self.payments.get(house_id)
    }

    pub fn participant_count(&self) -> usize {
        self.payments.len()
    }
}
