use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::config::app_data_dir;
use crate::domain::{HousingUnit, PaymentEntry, Quota};
use crate::errors::{QuotaError, Result};

use super::QuotaStore;

const QUOTA_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const QUOTAS_DIR: &str = "quotas";
const HOUSES_FILE: &str = "houses.json";

/// Reference document backend: one pretty-printed JSON file per quota plus
/// a housing-unit registry, written atomically via a staged temp file.
#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
    quotas_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: PathBuf) -> Result<Self> {
        ensure_dir(&root)?;
        let quotas_dir = root.join(QUOTAS_DIR);
        ensure_dir(&quotas_dir)?;
        Ok(Self { root, quotas_dir })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(app_data_dir())
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn quota_path(&self, id: Uuid) -> PathBuf {
        self.quotas_dir.join(format!("{id}.{QUOTA_EXTENSION}"))
    }

    fn houses_path(&self) -> PathBuf {
        self.root.join(HOUSES_FILE)
    }

    /// Replaces the housing-unit registry wholesale.
    pub fn save_houses(&self, houses: &[HousingUnit]) -> Result<()> {
        let json = serde_json::to_string_pretty(houses)?;
        write_atomic(&self.houses_path(), &json)
    }
}

impl QuotaStore for JsonStorage {
    fn save(&self, quota: &Quota) -> Result<u64> {
        let path = self.quota_path(quota.id);
        if path.exists() {
            let current = load_quota_from_path(&path)?;
            if current.version != quota.version {
                return Err(QuotaError::VersionConflict {
                    expected: quota.version,
                    actual: current.version,
                });
            }
        }
        let mut doc = quota.clone();
        doc.version = quota.version + 1;
        let json = serde_json::to_string_pretty(&doc)?;
        write_atomic(&path, &json)?;
        Ok(doc.version)
    }

    fn load(&self, id: Uuid) -> Result<Quota> {
        let path = self.quota_path(id);
        if !path.exists() {
            return Err(QuotaError::QuotaNotFound(id.to_string()));
        }
        load_quota_from_path(&path)
    }

    fn list(&self) -> Result<Vec<Quota>> {
        let mut quotas = Vec::new();
        for entry in fs::read_dir(&self.quotas_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(QUOTA_EXTENSION) {
                continue;
            }
            // Unparsable documents are skipped rather than failing the list.
            let contents = match fs::read_to_string(&path) {
                Ok(value) => value,
                Err(_) => continue,
            };
            match serde_json::from_str::<Quota>(&contents) {
                Ok(quota) => quotas.push(quota),
                Err(_) => continue,
            }
        }
        quotas.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(quotas)
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let path = self.quota_path(id);
        if !path.exists() {
            return Err(QuotaError::QuotaNotFound(id.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    fn update_payment(
        &self,
        quota_id: Uuid,
        house_id: &str,
        entry: &PaymentEntry,
        expected_version: u64,
    ) -> Result<u64> {
        let path = self.quota_path(quota_id);
        if !path.exists() {
            return Err(QuotaError::QuotaNotFound(quota_id.to_string()));
        }
        let mut doc = load_quota_from_path(&path)?;
        if doc.version != expected_version {
            return Err(QuotaError::VersionConflict {
                expected: expected_version,
                actual: doc.version,
            });
        }
        if !doc.payments.contains_key(house_id) {
            return Err(QuotaError::UnknownParticipant(house_id.to_string()));
        }
        doc.payments.insert(house_id.to_string(), entry.clone());
        doc.version += 1;
        let json = serde_json::to_string_pretty(&doc)?;
        write_atomic(&path, &json)?;
        Ok(doc.version)
    }

    fn list_houses(&self) -> Result<Vec<HousingUnit>> {
        let path = self.houses_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(path)?;
        let houses: Vec<HousingUnit> = serde_json::from_str(&data)?;
        Ok(houses.into_iter().filter(|h| !h.is_gate()).collect())
    }
}

fn load_quota_from_path(path: &Path) -> Result<Quota> {
    let data = fs::read_to_string(path)?;
    let quota: Quota = serde_json::from_str(&data)?;
    Ok(quota)
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::core::distributor::DistributionPolicy;
    use crate::core::services::QuotaService;
    use crate::domain::{Context, NewQuota, PaymentType, QuotaCategory, RESERVED_GATE_ID};

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(temp.path().to_path_buf()).expect("json storage");
        (storage, temp)
    }

    fn sample_quota() -> Quota {
        QuotaService::create(
            NewQuota {
                name: "Gasto común extraordinario".into(),
                description: String::new(),
                category: QuotaCategory::Maintenance,
                total_amount: 60_000,
                payment_type: PaymentType::OneTime,
                installment_count: None,
                due_date: None,
                start_date: None,
                end_date: None,
            },
            &[
                HousingUnit::new("a1", "Casa A1"),
                HousingUnit::new("b2", "Casa B2"),
            ],
            &DistributionPolicy::Equal,
            &Context::new("admin"),
        )
        .unwrap()
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let quota = sample_quota();
        let version = storage.save(&quota).expect("save quota");
        assert_eq!(version, 1);

        let loaded = storage.load(quota.id).expect("load quota");
        assert_eq!(loaded.name, quota.name);
        assert_eq!(loaded.payments, quota.payments);
        assert_eq!(loaded.version, 1);
    }

    #[test]
    fn stale_save_is_rejected() {
        let (storage, _guard) = storage_with_temp_dir();
        let quota = sample_quota();
        storage.save(&quota).unwrap();

        // Second save with the original version-0 copy must conflict.
        let err = storage.save(&quota).unwrap_err();
        assert!(matches!(
            err,
            QuotaError::VersionConflict {
                expected: 0,
                actual: 1
            }
        ));
    }

    #[test]
    fn update_payment_touches_only_one_participant() {
        let (storage, _guard) = storage_with_temp_dir();
        let quota = sample_quota();
        storage.save(&quota).unwrap();

        let mut entry = quota.payments["a1"].clone();
        entry.status = crate::domain::PaymentStatus::Paid;
        let version = storage
            .update_payment(quota.id, "a1", &entry, 1)
            .expect("scoped update");
        assert_eq!(version, 2);

        let loaded = storage.load(quota.id).unwrap();
        assert_eq!(
            loaded.payments["a1"].status,
            crate::domain::PaymentStatus::Paid
        );
        assert_eq!(loaded.payments["b2"], quota.payments["b2"]);
    }

    #[test]
    fn update_payment_with_stale_version_conflicts() {
        let (storage, _guard) = storage_with_temp_dir();
        let quota = sample_quota();
        storage.save(&quota).unwrap();

        let entry = quota.payments["a1"].clone();
        let err = storage
            .update_payment(quota.id, "a1", &entry, 7)
            .unwrap_err();
        assert!(matches!(
            err,
            QuotaError::VersionConflict {
                expected: 7,
                actual: 1
            }
        ));
    }

    #[test]
    fn missing_quota_reports_not_found() {
        let (storage, _guard) = storage_with_temp_dir();
        let err = storage.load(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, QuotaError::QuotaNotFound(_)));
        let err = storage.delete(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, QuotaError::QuotaNotFound(_)));
    }

    #[test]
    fn house_registry_excludes_the_gate_unit() {
        let (storage, _guard) = storage_with_temp_dir();
        storage
            .save_houses(&[
                HousingUnit::new("a1", "Casa A1"),
                HousingUnit::new(RESERVED_GATE_ID, "Portería"),
            ])
            .unwrap();

        let houses = storage.list_houses().expect("list houses");
        assert_eq!(houses.len(), 1);
        assert_eq!(houses[0].id, "a1");
    }
}
