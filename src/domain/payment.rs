use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::HouseId;
use crate::currency::Money;

/// Collection state of one participant's sub-ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

/// One abono applied against a one-time quota's remaining balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartialPayment {
    pub voucher_number: String,
    pub amount: Money,
    pub paid_at: DateTime<Utc>,
    pub recorded_by: String,
}

/// One installment recorded against an installment quota.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstallmentPayment {
    pub voucher_number: String,
    pub amount: Money,
    /// 1-based position in the participant's plan, monotonically increasing.
    pub installment_number: u32,
    pub paid_at: DateTime<Utc>,
    pub recorded_by: String,
}

/// Payment history shape, fixed at quota creation. A sub-ledger never mixes
/// abonos and installments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentLedger {
    OneTime {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        voucher_number: Option<String>,
        #[serde(default)]
        partial_payments: Vec<PartialPayment>,
    },
    Installments {
        monthly_amount: Money,
        installments_paid: u32,
        installments_pending: u32,
        #[serde(default)]
        installment_payments: Vec<InstallmentPayment>,
    },
}

/// Per-participant sub-ledger inside a quota's payments map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentEntry {
    pub house_id: HouseId,
    /// This participant's total obligation under the quota.
    pub amount: Money,
    /// This participant's share of the quota total.
    pub percentage: f64,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub ledger: PaymentLedger,
}

impl PaymentEntry {
    pub fn one_time(house_id: HouseId, amount: Money, percentage: f64) -> Self {
        Self {
            house_id,
            amount,
            percentage,
            status: PaymentStatus::Pending,
            paid_at: None,
            ledger: PaymentLedger::OneTime {
                voucher_number: None,
                partial_payments: Vec::new(),
            },
        }
    }

    pub fn installments(
        house_id: HouseId,
        amount: Money,
        percentage: f64,
        monthly_amount: Money,
        plan_total: u32,
    ) -> Self {
        Self {
            house_id,
            amount,
            percentage,
            status: PaymentStatus::Pending,
            paid_at: None,
            ledger: PaymentLedger::Installments {
                monthly_amount,
                installments_paid: 0,
                installments_pending: plan_total,
                installment_payments: Vec::new(),
            },
        }
    }

    /// Sum of the amounts recorded in the sub-ledger's history list.
    pub fn recorded_total(&self) -> Money {
        match &self.ledger {
            PaymentLedger::OneTime {
                partial_payments, ..
            } => partial_payments.iter().map(|p| p.amount).sum(),
            PaymentLedger::Installments {
                installment_payments,
                ..
            } => installment_payments.iter().map(|p| p.amount).sum(),
        }
    }

    /// Amount this participant contributes to collection aggregates: the
    /// full obligation when paid, the recorded history when partial.
    pub fn collected(&self) -> Money {
        match self.status {
            PaymentStatus::Paid => self.amount,
            PaymentStatus::Partial => self.recorded_total(),
            PaymentStatus::Pending => 0,
        }
    }

    /// Outstanding balance; zero once the participant is paid.
    pub fn remaining(&self) -> Money {
        if self.status == PaymentStatus::Paid {
            0
        } else {
            (self.amount - self.recorded_total()).max(0)
        }
    }

    /// Installments recorded so far, zero for one-time ledgers.
    pub fn installments_recorded(&self) -> u32 {
        match &self.ledger {
            PaymentLedger::Installments {
                installments_paid, ..
            } => *installments_paid,
            PaymentLedger::OneTime { .. } => 0,
        }
    }
}
