//! Read-side aggregates, recomputed on every call; nothing is cached.

use std::collections::BTreeMap;

use crate::currency::{round2, Money};
use crate::domain::{PaymentEntry, Quota, QuotaCategory, QuotaStatus};

pub struct SummaryService;

/// Collection progress of a single quota.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaProgress {
    pub collected: Money,
    pub pending: Money,
    pub percentage: f64,
    pub total_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryStats {
    pub count: usize,
    pub total: Money,
    pub collected: Money,
}

/// Fleet-wide collection statistics across a set of quotas.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotasStats {
    pub total_quotas: usize,
    pub active_quotas: usize,
    pub completed_quotas: usize,
    pub total_amount: Money,
    pub collected_amount: Money,
    pub pending_amount: Money,
    pub collection_rate: f64,
    pub by_category: BTreeMap<QuotaCategory, CategoryStats>,
}

impl SummaryService {
    pub fn quota_progress(quota: &Quota) -> QuotaProgress {
        let collected: Money = quota.payments.values().map(PaymentEntry::collected).sum();
        let pending = quota.total_amount - collected;
        let percentage = if quota.total_amount == 0 {
            0.0
        } else {
            round2(100.0 * collected as f64 / quota.total_amount as f64)
        };
        QuotaProgress {
            collected,
            pending,
            percentage,
            total_amount: quota.total_amount,
        }
    }

    pub fn quotas_stats(quotas: &[Quota]) -> QuotasStats {
        let mut stats = QuotasStats {
            total_quotas: quotas.len(),
            active_quotas: 0,
            completed_quotas: 0,
            total_amount: 0,
            collected_amount: 0,
            pending_amount: 0,
            collection_rate: 0.0,
            by_category: BTreeMap::new(),
        };
        for quota in quotas {
            let progress = Self::quota_progress(quota);
            stats.total_amount += progress.total_amount;
            stats.collected_amount += progress.collected;
            stats.pending_amount += progress.pending;
            match quota.status {
                QuotaStatus::Active => stats.active_quotas += 1,
                QuotaStatus::Completed => stats.completed_quotas += 1,
                QuotaStatus::Pending => {}
            }
            let bucket = stats.by_category.entry(quota.category).or_default();
            bucket.count += 1;
            bucket.total += progress.total_amount;
            bucket.collected += progress.collected;
        }
        if stats.total_amount != 0 {
            stats.collection_rate =
                round2(100.0 * stats.collected_amount as f64 / stats.total_amount as f64);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distributor::DistributionPolicy;
    use crate::core::services::{PaymentService, QuotaService};
    use crate::domain::{Context, HousingUnit, NewQuota, PaymentType};

    fn ctx() -> Context {
        Context::new("admin")
    }

    fn quota(category: QuotaCategory, total: Money, houses: &[&str]) -> Quota {
        let participants: Vec<HousingUnit> = houses
            .iter()
            .map(|id| HousingUnit::new(*id, format!("Casa {id}")))
            .collect();
        QuotaService::create(
            NewQuota {
                name: "Cuota".into(),
                description: String::new(),
                category,
                total_amount: total,
                payment_type: PaymentType::OneTime,
                installment_count: None,
                due_date: None,
                start_date: None,
                end_date: None,
            },
            &participants,
            &DistributionPolicy::Equal,
            &ctx(),
        )
        .unwrap()
    }

    #[test]
    fn fully_paid_single_participant_reads_one_hundred_percent() {
        let mut q = quota(QuotaCategory::Water, 100_000, &["a1"]);
        PaymentService::record_payment(&mut q, "a1", "V-1", 1, &ctx()).unwrap();

        let progress = SummaryService::quota_progress(&q);
        assert_eq!(progress.collected, 100_000);
        assert_eq!(progress.pending, 0);
        assert_eq!(progress.percentage, 100.0);
    }

    #[test]
    fn partial_participants_contribute_their_recorded_history() {
        let mut q = quota(QuotaCategory::Repairs, 100_000, &["a1", "b2"]);
        PaymentService::record_partial_payment(&mut q, "a1", "V-1", 20_000, &ctx()).unwrap();

        let progress = SummaryService::quota_progress(&q);
        assert_eq!(progress.collected, 20_000);
        assert_eq!(progress.pending, 80_000);
        assert_eq!(progress.percentage, 20.0);
    }

    #[test]
    fn zero_total_reports_zero_percentage() {
        let q = quota(QuotaCategory::Other, 0, &["a1"]);
        let progress = SummaryService::quota_progress(&q);
        assert_eq!(progress.percentage, 0.0);
        assert_eq!(progress.collected, 0);
    }

    #[test]
    fn progress_is_idempotent_on_an_unmutated_ledger() {
        let mut q = quota(QuotaCategory::Services, 90_000, &["a1", "b2", "c3"]);
        PaymentService::record_partial_payment(&mut q, "b2", "V-9", 15_000, &ctx()).unwrap();

        let first = SummaryService::quota_progress(&q);
        let second = SummaryService::quota_progress(&q);
        assert_eq!(first, second);
    }

    #[test]
    fn stats_group_by_category_and_count_statuses() {
        let mut water = quota(QuotaCategory::Water, 100_000, &["a1"]);
        PaymentService::record_payment(&mut water, "a1", "V-1", 1, &ctx()).unwrap();
        let mut repairs = quota(QuotaCategory::Repairs, 200_000, &["a1", "b2"]);
        repairs.status = QuotaStatus::Completed;
        let other_water = quota(QuotaCategory::Water, 50_000, &["b2"]);

        let stats = SummaryService::quotas_stats(&[water, repairs, other_water]);
        assert_eq!(stats.total_quotas, 3);
        assert_eq!(stats.active_quotas, 2);
        assert_eq!(stats.completed_quotas, 1);
        assert_eq!(stats.total_amount, 350_000);
        assert_eq!(stats.collected_amount, 100_000);
        assert_eq!(stats.pending_amount, 250_000);
        assert_eq!(stats.collection_rate, 28.57);

        let water_bucket = &stats.by_category[&QuotaCategory::Water];
        assert_eq!(water_bucket.count, 2);
        assert_eq!(water_bucket.total, 150_000);
        assert_eq!(water_bucket.collected, 100_000);
    }

    #[test]
    fn stats_on_empty_slice_are_all_zero() {
        let stats = SummaryService::quotas_stats(&[]);
        assert_eq!(stats.total_quotas, 0);
        assert_eq!(stats.collection_rate, 0.0);
        assert!(stats.by_category.is_empty());
    }
}
