pub mod json_backend;

use uuid::Uuid;

use crate::domain::{HousingUnit, PaymentEntry, Quota};
use crate::errors::Result;

/// Abstraction over document stores holding quota and housing-unit
/// documents.
pub trait QuotaStore: Send + Sync {
    /// Writes the full document. Fails with `VersionConflict` when the
    /// caller's copy is stale; returns the new stored version.
    fn save(&self, quota: &Quota) -> Result<u64>;

    fn load(&self, id: Uuid) -> Result<Quota>;

    /// All quota documents, newest first.
    fn list(&self) -> Result<Vec<Quota>>;

    /// Hard delete; there is no soft-delete.
    fn delete(&self, id: Uuid) -> Result<()>;

    /// Field-scoped write of a single participant sub-ledger, guarded by
    /// the document version so concurrent admins cannot clobber each other's
    /// edits to other participants. Returns the new stored version.
    fn update_payment(
        &self,
        quota_id: Uuid,
        house_id: &str,
        entry: &PaymentEntry,
        expected_version: u64,
    ) -> Result<u64>;

    /// Housing units eligible for distribution; the reserved gate unit is
    /// never included.
    fn list_houses(&self) -> Result<Vec<HousingUnit>>;
}

pub use json_backend::JsonStorage;
