//! The record store: owns the ledger entries and keeps the blob store in
//! sync with them.
//!
//! Every mutating operation validates first, then changes the in-memory
//! collection and writes the whole collection back before returning. A
//! failed validation or lookup leaves both untouched.

use super::error::{LedgerError, Result};
use super::record::{Category, IdGenerator, Record, RecordFields, TransactionType, ValidFields};
use super::storage::{BlobStore, TRANSACTIONS_KEY};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct RecordStore {
    records: Vec<Record>,
    backend: Arc<dyn BlobStore>,
    ids: IdGenerator,
    persistence_error: Option<LedgerError>,
    /// The stored blob could not be parsed; only a whole-collection
    /// replacement may write over it.
    unreadable_blob: bool,
}

impl RecordStore {
    /// Reads the persisted collection. A missing blob yields an empty
    /// ledger. A failing backend or an unparsable blob also yields an empty
    /// ledger but switches the session to memory only, so the unread data
    /// is never overwritten by an ordinary edit.
    pub fn load(backend: Arc<dyn BlobStore>) -> Self {
        let mut persistence_error = None;
        let mut unreadable_blob = false;
        let records = match backend.get(TRANSACTIONS_KEY) {
            Ok(Some(blob)) => match parse_records(&blob) {
                Ok(records) => {
                    debug!("Loaded {} transactions", records.len());
                    records
                }
                Err(e) => {
                    warn!("Stored transactions are unreadable, changes will not be saved: {e}");
                    persistence_error = Some(LedgerError::PersistenceUnavailable(format!(
                        "stored transactions are unreadable ({e}); run `clear --yes` or `import` to replace them"
                    )));
                    unreadable_blob = true;
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No stored transactions, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read transactions, changes will not be saved: {e:#}");
                persistence_error = Some(LedgerError::PersistenceUnavailable(format!("{e:#}")));
                Vec::new()
            }
        };

        Self {
            ids: IdGenerator::starting_after(&records),
            records,
            backend,
            persistence_error,
            unreadable_blob,
        }
    }

    /// Records newest-first.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// False once a read or write of the backend has failed in this session.
    pub fn is_durable(&self) -> bool {
        self.persistence_error.is_none()
    }

    pub fn persistence_error(&self) -> Option<&LedgerError> {
        self.persistence_error.as_ref()
    }

    pub fn add(&mut self, fields: &RecordFields) -> Result<Record> {
        self.add_at(fields, Utc::now())
    }

    pub fn add_at(&mut self, fields: &RecordFields, now: DateTime<Utc>) -> Result<Record> {
        let valid = fields.validate()?;
        let record = self.insert(valid, now);
        info!(id = record.id, "Transaction added");
        Ok(record)
    }

    pub fn update(&mut self, id: u64, fields: &RecordFields) -> Result<Record> {
        let valid = fields.validate()?;
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(LedgerError::NotFound(id))?;
        record.apply(valid);
        let updated = record.clone();

        self.persist();
        info!(id, "Transaction updated");
        Ok(updated)
    }

    pub fn remove(&mut self, id: u64) -> Result<()> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(LedgerError::NotFound(id))?;
        self.records.remove(index);

        self.persist();
        info!(id, "Transaction deleted");
        Ok(())
    }

    pub fn clear(&mut self) {
        let count = self.records.len();
        self.records.clear();
        self.release_unreadable_blob();
        self.persist();
        info!(count, "All transactions cleared");
    }

    /// Replaces the whole collection with the records in `payload`, a JSON
    /// array of transactions.
    pub fn replace_all(&mut self, payload: &str) -> Result<()> {
        let records = parse_records(payload)?;
        for record in &records {
            self.ids.observe(record.id);
        }
        self.records = records;

        self.release_unreadable_blob();
        self.persist();
        info!(count = self.records.len(), "Transactions imported");
        Ok(())
    }

    /// The export format: the full collection as indented JSON.
    pub fn export(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records)
    }

    /// Fills an empty ledger with a few example transactions. Returns
    /// whether anything was added.
    pub fn seed_demo(&mut self, today: NaiveDate) -> bool {
        if !self.records.is_empty() {
            return false;
        }

        let days_ago = |n: u64| today.checked_sub_days(Days::new(n)).unwrap_or(today);
        let now = Utc::now();
        // oldest first, each insert lands on top
        let demo = [
            ("Gas Station", 45.00, Category::Transport, TransactionType::Expense, days_ago(2)),
            ("Grocery Shopping", 85.50, Category::Food, TransactionType::Expense, days_ago(1)),
            ("Salary Payment", 3000.0, Category::Salary, TransactionType::Income, today),
        ];
        for (description, amount, category, kind, date) in demo {
            let id = self.ids.next_id(now);
            self.records.insert(
                0,
                Record::new(
                    id,
                    ValidFields {
                        description: description.to_string(),
                        amount,
                        category,
                        kind,
                        date,
                    },
                    now,
                ),
            );
        }

        self.persist();
        info!("Seeded demo transactions");
        true
    }

    fn insert(&mut self, fields: ValidFields, now: DateTime<Utc>) -> Record {
        let id = self.ids.next_id(now);
        let record = Record::new(id, fields, now);
        self.records.insert(0, record.clone());
        self.persist();
        record
    }

    /// Re-enables writes that were held back only because the stored blob
    /// was unparsable. Backend failures stay in effect.
    fn release_unreadable_blob(&mut self) {
        if self.unreadable_blob {
            debug!("Replacing unreadable transaction data");
            self.unreadable_blob = false;
            self.persistence_error = None;
        }
    }

    fn persist(&mut self) {
        if self.persistence_error.is_some() {
            debug!("Store unavailable, keeping changes in memory");
            return;
        }

        let result = serde_json::to_string(&self.records)
            .map_err(anyhow::Error::from)
            .and_then(|blob| self.backend.put(TRANSACTIONS_KEY, &blob));
        if let Err(e) = result {
            warn!("Failed to save transactions, continuing in memory: {e:#}");
            self.persistence_error = Some(LedgerError::PersistenceUnavailable(format!("{e:#}")));
        }
    }
}

/// Parses a JSON array of records. Each record must satisfy the same rules
/// as user input; amounts are normalized to their magnitude.
fn parse_records(payload: &str) -> Result<Vec<Record>> {
    let mut records: Vec<Record> =
        serde_json::from_str(payload).map_err(|e| LedgerError::InvalidFormat(e.to_string()))?;

    let mut seen = HashSet::new();
    for record in &mut records {
        if !seen.insert(record.id) {
            return Err(LedgerError::InvalidFormat(format!(
                "duplicate transaction id {}",
                record.id
            )));
        }

        let description = record.description.trim();
        if description.is_empty() {
            return Err(LedgerError::InvalidFormat(format!(
                "transaction {} has no description",
                record.id
            )));
        }
        record.description = description.to_string();

        if !record.amount.is_finite() || record.amount == 0.0 {
            return Err(LedgerError::InvalidFormat(format!(
                "transaction {} has amount {}, expected a non-zero number",
                record.id, record.amount
            )));
        }
        record.amount = record.amount.abs();
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Backend whose writes start failing on demand.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
        fail_reads: AtomicBool,
    }

    impl BlobStore for FlakyStore {
        fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(anyhow!("disk on fire"));
            }
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(anyhow!("disk full"));
            }
            self.inner.put(key, value)
        }
    }

    fn fields(description: &str, amount: &str, category: &str, kind: &str) -> RecordFields {
        RecordFields {
            description: description.to_string(),
            amount: amount.to_string(),
            category: category.to_string(),
            kind: kind.to_string(),
            date: "2024-01-01".to_string(),
        }
    }

    fn salary() -> RecordFields {
        fields("Salary", "3000", "salary", "income")
    }

    fn coffee() -> RecordFields {
        fields("Coffee", "-4.5", "food", "expense")
    }

    fn empty_store() -> (Arc<MemoryStore>, RecordStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = RecordStore::load(backend.clone());
        (backend, store)
    }

    #[test]
    fn test_add_then_load_returns_same_record() {
        let (backend, mut store) = empty_store();
        let added = store.add(&coffee()).unwrap();

        let reloaded = RecordStore::load(backend);
        assert_eq!(reloaded.records(), &[added.clone()]);
        assert_eq!(added.description, "Coffee");
        assert_eq!(added.amount, 4.5);
        assert_eq!(added.category, Category::Food);
        assert_eq!(added.kind, TransactionType::Expense);
    }

    #[test]
    fn test_add_prepends_newest_first() {
        let (_, mut store) = empty_store();
        let first = store.add(&salary()).unwrap();
        let second = store.add(&coffee()).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].id, second.id);
        assert_eq!(store.records()[1].id, first.id);
        assert!(second.id > first.id);
    }

    #[test]
    fn test_add_invalid_leaves_store_untouched() {
        let (backend, mut store) = empty_store();
        store.add(&salary()).unwrap();
        let before = backend.get(TRANSACTIONS_KEY).unwrap();

        let result = store.add(&fields("", "10", "food", "expense"));
        assert!(matches!(result, Err(LedgerError::ValidationFailed(_))));
        assert_eq!(store.len(), 1);
        assert_eq!(backend.get(TRANSACTIONS_KEY).unwrap(), before);
    }

    #[test]
    fn test_rapid_adds_get_unique_ids() {
        let (_, mut store) = empty_store();
        let now = Utc::now();
        let ids: HashSet<u64> = (0..50)
            .map(|_| store.add_at(&coffee(), now).unwrap().id)
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_update_replaces_fields_in_place() {
        let (backend, mut store) = empty_store();
        let original = store.add(&salary()).unwrap();
        store.add(&coffee()).unwrap();

        let updated = store
            .update(original.id, &fields("Bonus", "500", "freelance", "income"))
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.description, "Bonus");
        assert_eq!(updated.category, Category::Freelance);
        // position is unchanged
        assert_eq!(store.records()[1], updated);

        let reloaded = RecordStore::load(backend);
        assert_eq!(reloaded.get(original.id), Some(&updated));
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let (_, mut store) = empty_store();
        store.add(&salary()).unwrap();
        let before = store.records().to_vec();

        let result = store.update(42, &coffee());
        assert_eq!(result, Err(LedgerError::NotFound(42)));
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn test_update_validates_before_lookup() {
        let (_, mut store) = empty_store();
        let added = store.add(&salary()).unwrap();

        let result = store.update(added.id, &fields("Salary", "zero", "salary", "income"));
        assert!(matches!(result, Err(LedgerError::ValidationFailed(_))));
        assert_eq!(store.get(added.id), Some(&added));
    }

    #[test]
    fn test_remove_twice() {
        let (_, mut store) = empty_store();
        let added = store.add(&salary()).unwrap();
        store.add(&coffee()).unwrap();

        store.remove(added.id).unwrap();
        assert_eq!(store.remove(added.id), Err(LedgerError::NotFound(added.id)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_persists_empty_collection() {
        let (backend, mut store) = empty_store();
        store.add(&salary()).unwrap();
        store.clear();

        assert!(store.is_empty());
        assert_eq!(backend.get(TRANSACTIONS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_replace_all_rejects_non_array() {
        let (_, mut store) = empty_store();
        store.add(&salary()).unwrap();
        let before = store.records().to_vec();

        let result = store.replace_all("not an array");
        assert!(matches!(result, Err(LedgerError::InvalidFormat(_))));
        assert_eq!(store.records(), before.as_slice());

        let result = store.replace_all(r#"{"id": 1}"#);
        assert!(matches!(result, Err(LedgerError::InvalidFormat(_))));
        let result = store.replace_all(r#"[{"id": 1, "description": "x"}]"#);
        assert!(matches!(result, Err(LedgerError::InvalidFormat(_))));
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn test_replace_all_rejects_empty_description() {
        let (_, mut store) = empty_store();
        store.add(&salary()).unwrap();
        let before = store.records().to_vec();

        let payload = r#"[{"id": 1, "description": "   ", "amount": 12, "category": "food", "type": "expense", "date": "2024-01-01"}]"#;
        let result = store.replace_all(payload);
        assert!(matches!(result, Err(LedgerError::InvalidFormat(_))));
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn test_replace_all_rejects_zero_amount() {
        let (backend, mut store) = empty_store();
        store.add(&salary()).unwrap();
        let stored = backend.get(TRANSACTIONS_KEY).unwrap();

        let payload = r#"[{"id": 1, "description": "", "amount": 0, "category": "food", "type": "expense", "date": "2024-01-01"}]"#;
        assert!(matches!(
            store.replace_all(payload),
            Err(LedgerError::InvalidFormat(_))
        ));
        let payload = r#"[{"id": 1, "description": "Free lunch", "amount": 0, "category": "food", "type": "expense", "date": "2024-01-01"}]"#;
        assert!(matches!(
            store.replace_all(payload),
            Err(LedgerError::InvalidFormat(_))
        ));

        assert_eq!(store.len(), 1);
        assert_eq!(backend.get(TRANSACTIONS_KEY).unwrap(), stored);
    }

    #[test]
    fn test_replace_all_trims_descriptions() {
        let (_, mut store) = empty_store();
        let payload = r#"[{"id": 1, "description": "  Rent ", "amount": -950, "category": "bills", "type": "expense", "date": "2024-01-01"}]"#;
        store.replace_all(payload).unwrap();
        assert_eq!(store.records()[0].description, "Rent");
        assert_eq!(store.records()[0].amount, 950.0);
    }

    #[test]
    fn test_replace_all_rejects_duplicate_ids() {
        let (_, mut store) = empty_store();
        let payload = r#"[
            {"id": 5, "description": "A", "amount": 1, "category": "food", "type": "expense", "date": "2024-01-01"},
            {"id": 5, "description": "B", "amount": 2, "category": "food", "type": "expense", "date": "2024-01-02"}
        ]"#;
        assert!(matches!(
            store.replace_all(payload),
            Err(LedgerError::InvalidFormat(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_all_then_add_keeps_ids_unique() {
        let (backend, mut store) = empty_store();
        store.add(&salary()).unwrap();

        let future_id = u64::try_from(Utc::now().timestamp_millis()).unwrap() + 3_600_000;
        let payload = format!(
            r#"[{{"id": {future_id}, "description": "Rent", "amount": -950, "category": "bills",
                "type": "expense", "date": "2024-03-01", "timestamp": "2024-03-01T08:00:00Z"}}]"#
        );
        store.replace_all(&payload).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].amount, 950.0);

        let added = store.add(&coffee()).unwrap();
        assert_eq!(added.id, future_id + 1);
        assert_eq!(RecordStore::load(backend).len(), 2);
    }

    #[test]
    fn test_export_is_importable() {
        let (_, mut store) = empty_store();
        store.add(&salary()).unwrap();
        store.add(&coffee()).unwrap();
        let exported = store.export().unwrap();
        assert!(exported.starts_with("[\n  {"));

        let (_, mut other) = empty_store();
        other.replace_all(&exported).unwrap();
        assert_eq!(other.records(), store.records());
    }

    #[test]
    fn test_load_corrupt_blob_is_not_overwritten() {
        let backend = Arc::new(MemoryStore::new());
        backend.put(TRANSACTIONS_KEY, "{{{ definitely not json").unwrap();

        let mut store = RecordStore::load(backend.clone());
        assert!(store.is_empty());
        assert!(!store.is_durable());

        store.add(&salary()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            backend.get(TRANSACTIONS_KEY).unwrap().as_deref(),
            Some("{{{ definitely not json")
        );
    }

    #[test]
    fn test_one_bad_stored_record_keeps_the_rest_on_disk() {
        let backend = Arc::new(MemoryStore::new());
        let blob = r#"[
            {"id": 1, "description": "Rent", "amount": 950, "category": "bills", "type": "expense", "date": "2024-02-01"},
            {"id": 2, "description": "Move", "amount": 10, "category": "other", "type": "transfer", "date": "2024-02-02"}
        ]"#;
        backend.put(TRANSACTIONS_KEY, blob).unwrap();

        let mut store = RecordStore::load(backend.clone());
        assert!(store.is_empty());
        assert!(matches!(
            store.persistence_error(),
            Some(LedgerError::PersistenceUnavailable(_))
        ));

        let added = store.add(&coffee()).unwrap();
        store.update(added.id, &salary()).unwrap();
        assert_eq!(backend.get(TRANSACTIONS_KEY).unwrap().as_deref(), Some(blob));
    }

    #[test]
    fn test_clear_replaces_unreadable_blob() {
        let backend = Arc::new(MemoryStore::new());
        backend.put(TRANSACTIONS_KEY, "not json").unwrap();

        let mut store = RecordStore::load(backend.clone());
        assert!(!store.is_durable());
        store.clear();
        assert!(store.is_durable());
        assert_eq!(backend.get(TRANSACTIONS_KEY).unwrap().as_deref(), Some("[]"));

        store.add(&salary()).unwrap();
        assert_eq!(RecordStore::load(backend).len(), 1);
    }

    #[test]
    fn test_import_replaces_unreadable_blob() {
        let backend = Arc::new(MemoryStore::new());
        backend.put(TRANSACTIONS_KEY, "not json").unwrap();

        let mut store = RecordStore::load(backend.clone());
        // a rejected import changes nothing
        assert!(store.replace_all("still not json").is_err());
        assert!(!store.is_durable());

        let payload = r#"[{"id": 3, "description": "Rent", "amount": 950, "category": "bills", "type": "expense", "date": "2024-02-01"}]"#;
        store.replace_all(payload).unwrap();
        assert!(store.is_durable());
        assert_eq!(RecordStore::load(backend).len(), 1);
    }

    #[test]
    fn test_clear_keeps_backend_read_failure() {
        let backend = Arc::new(FlakyStore::default());
        backend.put(TRANSACTIONS_KEY, r#"[]"#).unwrap();
        backend.fail_reads.store(true, Ordering::SeqCst);

        let mut store = RecordStore::load(backend.clone());
        store.clear();
        assert!(!store.is_durable());
    }

    #[test]
    fn test_write_failure_degrades_to_memory() {
        let backend = Arc::new(FlakyStore::default());
        let mut store = RecordStore::load(backend.clone());
        store.add(&salary()).unwrap();
        assert!(store.is_durable());

        backend.fail_writes.store(true, Ordering::SeqCst);
        let added = store.add(&coffee()).unwrap();
        assert!(!store.is_durable());
        assert!(matches!(
            store.persistence_error(),
            Some(LedgerError::PersistenceUnavailable(_))
        ));
        // the collection is still usable
        assert_eq!(store.len(), 2);
        store.remove(added.id).unwrap();
        assert_eq!(store.len(), 1);

        backend.fail_writes.store(false, Ordering::SeqCst);
        assert_eq!(RecordStore::load(backend).len(), 1);
    }

    #[test]
    fn test_read_failure_never_overwrites_stored_data() {
        let backend = Arc::new(FlakyStore::default());
        backend.put(TRANSACTIONS_KEY, "[]").unwrap();
        backend.fail_reads.store(true, Ordering::SeqCst);

        let mut store = RecordStore::load(backend.clone());
        assert!(!store.is_durable());
        store.add(&salary()).unwrap();

        assert_eq!(
            backend.inner.get(TRANSACTIONS_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_seed_demo_only_when_empty() {
        let (_, mut store) = empty_store();
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert!(store.seed_demo(today));
        assert_eq!(store.len(), 3);
        assert_eq!(store.records()[0].description, "Salary Payment");
        assert_eq!(store.records()[0].date, today);
        assert_eq!(
            store.records()[2].date,
            NaiveDate::from_ymd_opt(2024, 5, 8).unwrap()
        );

        assert!(!store.seed_demo(today));
        assert_eq!(store.len(), 3);
    }
}
