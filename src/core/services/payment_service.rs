//! Applies payment events to per-participant sub-ledgers.
//!
//! Every operation validates before mutating: a failed call leaves the quota
//! untouched. The caller persists the updated sub-ledger afterwards.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::currency::Money;
use crate::domain::{
    Context, InstallmentPayment, PartialPayment, PaymentEntry, PaymentLedger, PaymentStatus,
    PaymentType, Quota,
};
use crate::errors::{QuotaError, Result};

/// Validated mutations over one participant's payment sub-ledger.
pub struct PaymentService;

impl PaymentService {
    /// Records a full payment (one-time quotas) or `count` installments
    /// (installment quotas) against one participant.
    pub fn record_payment(
        quota: &mut Quota,
        house_id: &str,
        voucher_number: &str,
        count: u32,
        ctx: &Context,
    ) -> Result<PaymentEntry> {
        let voucher = normalized_voucher(voucher_number)?;
        match quota.payment_type {
            PaymentType::Installments => {
                Self::record_installments(quota, house_id, voucher, count, ctx)
            }
            PaymentType::OneTime => Self::record_full_payment(quota, house_id, voucher, ctx),
        }
    }

    /// Records an abono against a one-time quota's remaining balance.
    pub fn record_partial_payment(
        quota: &mut Quota,
        house_id: &str,
        voucher_number: &str,
        amount: Money,
        ctx: &Context,
    ) -> Result<PaymentEntry> {
        let voucher = normalized_voucher(voucher_number)?;
        if quota.payment_type != PaymentType::OneTime {
            return Err(QuotaError::InvalidAmount(
                "abonos apply to one-time quotas only".into(),
            ));
        }
        if amount <= 0 {
            return Err(QuotaError::InvalidAmount(format!(
                "abono amount must be positive, got {amount}"
            )));
        }
        let quota_id = quota.id;
        let entry = quota
            .payments
            .get_mut(house_id)
            .ok_or_else(|| QuotaError::UnknownParticipant(house_id.to_string()))?;
        if entry.status == PaymentStatus::Paid {
            return Err(QuotaError::ExcessPayment { remaining: 0 });
        }
        let already_paid = entry.recorded_total();
        let remaining = entry.amount - already_paid;
        if amount > remaining {
            return Err(QuotaError::ExcessPayment { remaining });
        }

        let now = Utc::now();
        let PaymentLedger::OneTime {
            partial_payments, ..
        } = &mut entry.ledger
        else {
            return Err(QuotaError::InvalidAmount(
                "participant ledger does not accept abonos".into(),
            ));
        };
        partial_payments.push(PartialPayment {
            voucher_number: voucher,
            amount,
            paid_at: now,
            recorded_by: ctx.actor_id.clone(),
        });
        apply_transition(entry, already_paid + amount, now);
        info!(quota = %quota_id, house = house_id, amount, "abono recorded");
        Ok(entry.clone())
    }

    /// Clears every payment record for one participant, reverting the
    /// sub-ledger to its freshly created state. Destructive; callers are
    /// expected to confirm first.
    pub fn reset_payment(quota: &mut Quota, house_id: &str, ctx: &Context) -> Result<PaymentEntry> {
        let quota_id = quota.id;
        let plan_total = quota.installments.as_ref().map(|schedule| schedule.total);
        let entry = quota
            .payments
            .get_mut(house_id)
            .ok_or_else(|| QuotaError::UnknownParticipant(house_id.to_string()))?;
        entry.status = PaymentStatus::Pending;
        entry.paid_at = None;
        entry.ledger = match &entry.ledger {
            PaymentLedger::OneTime { .. } => PaymentLedger::OneTime {
                voucher_number: None,
                partial_payments: Vec::new(),
            },
            PaymentLedger::Installments { monthly_amount, .. } => PaymentLedger::Installments {
                monthly_amount: *monthly_amount,
                installments_paid: 0,
                installments_pending: plan_total.unwrap_or(0),
                installment_payments: Vec::new(),
            },
        };
        let updated = entry.clone();
        refresh_schedule(quota);
        info!(quota = %quota_id, house = house_id, actor = %ctx.actor_id, "payment records cleared");
        Ok(updated)
    }

    fn record_full_payment(
        quota: &mut Quota,
        house_id: &str,
        voucher: String,
        ctx: &Context,
    ) -> Result<PaymentEntry> {
        let quota_id = quota.id;
        let entry = quota
            .payments
            .get_mut(house_id)
            .ok_or_else(|| QuotaError::UnknownParticipant(house_id.to_string()))?;
        if entry.status == PaymentStatus::Paid {
            return Err(QuotaError::ExcessPayment { remaining: 0 });
        }
        let PaymentLedger::OneTime { voucher_number, .. } = &mut entry.ledger else {
            return Err(QuotaError::InvalidAmount(
                "participant ledger expects installments".into(),
            ));
        };
        *voucher_number = Some(voucher);
        let obligation = entry.amount;
        let now = Utc::now();
        apply_transition(entry, obligation, now);
        info!(quota = %quota_id, house = house_id, actor = %ctx.actor_id, "full payment recorded");
        Ok(entry.clone())
    }

    fn record_installments(
        quota: &mut Quota,
        house_id: &str,
        voucher: String,
        count: u32,
        ctx: &Context,
    ) -> Result<PaymentEntry> {
        let plan_total = quota
            .installments
            .as_ref()
            .map(|schedule| schedule.total)
            .ok_or_else(|| {
                QuotaError::InvalidAmount("quota has no installment schedule".into())
            })?;
        if count == 0 {
            return Err(QuotaError::InvalidAmount(
                "installment count must be at least 1".into(),
            ));
        }
        let quota_id = quota.id;
        let entry = quota
            .payments
            .get_mut(house_id)
            .ok_or_else(|| QuotaError::UnknownParticipant(house_id.to_string()))?;
        let obligation = entry.amount;
        let now = Utc::now();

        let paid_total = {
            let PaymentLedger::Installments {
                monthly_amount,
                installments_paid,
                installments_pending,
                installment_payments,
            } = &mut entry.ledger
            else {
                return Err(QuotaError::InvalidAmount(
                    "participant ledger does not track installments".into(),
                ));
            };
            let recorded = installment_payments.len() as u32;
            let slots_left = plan_total.saturating_sub(recorded);
            if count > slots_left {
                let history: Money = installment_payments.iter().map(|p| p.amount).sum();
                return Err(QuotaError::ExcessPayment {
                    remaining: (obligation - history).max(0),
                });
            }
            for _ in 0..count {
                let number = installment_payments.len() as u32 + 1;
                // The closing installment absorbs the rounding remainder so
                // the history sums exactly to the participant's obligation.
                let amount = if number == plan_total {
                    obligation - *monthly_amount * Money::from(plan_total - 1)
                } else {
                    *monthly_amount
                };
                installment_payments.push(InstallmentPayment {
                    voucher_number: voucher.clone(),
                    amount,
                    installment_number: number,
                    paid_at: now,
                    recorded_by: ctx.actor_id.clone(),
                });
            }
            *installments_paid = installment_payments.len() as u32;
            *installments_pending = plan_total - *installments_paid;
            installment_payments.iter().map(|p| p.amount).sum()
        };
        apply_transition(entry, paid_total, now);
        let updated = entry.clone();
        refresh_schedule(quota);
        debug!(quota = %quota_id, house = house_id, count, "installments recorded");
        Ok(updated)
    }
}

/// Single source of the pending/partial/paid decision; every recorder path
/// routes status changes through here.
fn transition(amount_paid: Money, amount: Money) -> PaymentStatus {
    if amount_paid >= amount {
        PaymentStatus::Paid
    } else if amount_paid > 0 {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Pending
    }
}

fn apply_transition(entry: &mut PaymentEntry, amount_paid: Money, now: DateTime<Utc>) {
    let next = transition(amount_paid, entry.amount);
    if next == PaymentStatus::Paid && entry.status != PaymentStatus::Paid {
        entry.paid_at = Some(now);
    }
    entry.status = next;
}

/// Keeps the community-wide counters in step with the slowest participant.
fn refresh_schedule(quota: &mut Quota) {
    if let Some(schedule) = quota.installments.as_mut() {
        let rounds = quota
            .payments
            .values()
            .map(PaymentEntry::installments_recorded)
            .min()
            .unwrap_or(0);
        schedule.paid = rounds.min(schedule.total);
        schedule.pending = schedule.total - schedule.paid;
    }
}

fn normalized_voucher(voucher_number: &str) -> Result<String> {
    let trimmed = voucher_number.trim();
    if trimmed.is_empty() {
        return Err(QuotaError::MissingVoucher);
    }
    Ok(trimmed.to_string())
}
