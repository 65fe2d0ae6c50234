//! Creation and bulk lifecycle operations over quota documents.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::core::distributor::{self, DistributionPolicy};
use crate::core::services::PaymentService;
use crate::currency::div_round;
use crate::domain::{
    Context, HouseId, HousingUnit, InstallmentSchedule, NewQuota, PaymentEntry, PaymentType,
    Quota, QuotaStatus,
};
use crate::errors::{QuotaError, Result};

pub struct QuotaService;

impl QuotaService {
    /// Builds a quota document: runs the distributor once, seeds one payment
    /// sub-ledger per participant, and snapshots the status from the date
    /// fields. The caller persists the result.
    pub fn create(
        input: NewQuota,
        participants: &[HousingUnit],
        policy: &DistributionPolicy,
        ctx: &Context,
    ) -> Result<Quota> {
        let distribution = distributor::distribute(input.total_amount, participants, policy)?;

        let schedule = match input.payment_type {
            PaymentType::Installments => {
                let total = input.installment_count.filter(|c| *c >= 1).ok_or_else(|| {
                    QuotaError::InvalidAmount(
                        "installment quotas need a positive installment count".into(),
                    )
                })?;
                Some(InstallmentSchedule::new(total))
            }
            PaymentType::OneTime => None,
        };
        let monthly_amount = schedule
            .as_ref()
            .map(|s| div_round(input.total_amount, s.total));

        let now = Utc::now();
        let status = QuotaStatus::derive(input.start_date, input.end_date, now.date_naive());

        let mut payments = BTreeMap::new();
        for (house_id, share) in &distribution {
            let entry = match &schedule {
                Some(s) => PaymentEntry::installments(
                    house_id.clone(),
                    share.amount,
                    share.percentage,
                    div_round(share.amount, s.total),
                    s.total,
                ),
                None => PaymentEntry::one_time(house_id.clone(), share.amount, share.percentage),
            };
            payments.insert(house_id.clone(), entry);
        }

        let quota = Quota {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            category: input.category,
            total_amount: input.total_amount,
            payment_type: input.payment_type,
            installments: schedule,
            monthly_amount,
            distribution_type: policy.basis(),
            due_date: input.due_date,
            start_date: input.start_date,
            end_date: input.end_date,
            status,
            payments,
            distribution,
            created_at: now,
            created_by: ctx.actor_id.clone(),
            version: 0,
        };
        info!(
            quota = %quota.id,
            participants = quota.participant_count(),
            actor = %ctx.actor_id,
            "quota created"
        );
        Ok(quota)
    }

    /// Clears the payment records of every participant.
    pub fn reset_all_payments(quota: &mut Quota, ctx: &Context) -> Result<()> {
        let houses: Vec<HouseId> = quota.payments.keys().cloned().collect();
        for house in &houses {
            PaymentService::reset_payment(quota, house, ctx)?;
        }
        Ok(())
    }
}
