pub mod common;
pub mod payment;
pub mod quota;

pub use common::{Context, HouseId, HousingUnit, RESERVED_GATE_ID};
pub use payment::{
    InstallmentPayment, PartialPayment, PaymentEntry, PaymentLedger, PaymentStatus,
};
pub use quota::{
    DistributionEntry, DistributionType, InstallmentSchedule, NewQuota, PaymentType, Quota,
    QuotaCategory, QuotaStatus,
};
