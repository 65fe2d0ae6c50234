pub mod payment_service;
pub mod quota_service;
pub mod summary_service;

pub use payment_service::PaymentService;
pub use quota_service::QuotaService;
pub use summary_service::SummaryService;
