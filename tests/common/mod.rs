#![allow(dead_code)]

use quota_core::core::distributor::DistributionPolicy;
use quota_core::core::services::QuotaService;
use quota_core::currency::Money;
use quota_core::domain::{Context, HousingUnit, NewQuota, PaymentType, Quota, QuotaCategory};

pub fn admin() -> Context {
    Context::new("admin@condominio")
}

pub fn houses(ids: &[&str]) -> Vec<HousingUnit> {
    ids.iter()
        .map(|id| HousingUnit::new(*id, format!("Casa {}", id.to_uppercase())))
        .collect()
}

pub fn one_time_quota(name: &str, total: Money, participants: &[HousingUnit]) -> Quota {
    QuotaService::create(
        NewQuota {
            name: name.into(),
            description: String::new(),
            category: QuotaCategory::Maintenance,
            total_amount: total,
            payment_type: PaymentType::OneTime,
            installment_count: None,
            due_date: None,
            start_date: None,
            end_date: None,
        },
        participants,
        &DistributionPolicy::Equal,
        &admin(),
    )
    .expect("quota creation")
}

pub fn installment_quota(
    name: &str,
    total: Money,
    count: u32,
    participants: &[HousingUnit],
) -> Quota {
    QuotaService::create(
        NewQuota {
            name: name.into(),
            description: String::new(),
            category: QuotaCategory::Projects,
            total_amount: total,
            payment_type: PaymentType::Installments,
            installment_count: Some(count),
            due_date: None,
            start_date: None,
            end_date: None,
        },
        participants,
        &DistributionPolicy::Equal,
        &admin(),
    )
    .expect("quota creation")
}
