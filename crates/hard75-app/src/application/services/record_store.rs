use log::{debug, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use hard75_domain::day_record::{DayKey, DayRecord};
use hard75_domain::namespace::{Namespace, LAST_UID_KEY};
use hard75_domain::shared::DomainError;
use hard75_domain::storage::KeyValueStore;

/// Per-namespace day records and streak ratchet over a `KeyValueStore`.
///
/// Reads never fail: missing or corrupt data reads as empty. Writes surface
/// storage errors so the caller can log them and carry on.
pub struct RecordStore {
    kv: Arc<dyn KeyValueStore>,
}

impl RecordStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn get_all(&self, namespace: &Namespace) -> BTreeMap<DayKey, DayRecord> {
        let key = namespace.days_key();
        self.raw_entries(namespace)
            .await
            .into_iter()
            .filter_map(|(date, value)| match parse_entry(&date, value) {
                Ok(record) => Some((record.date(), record)),
                Err(e) => {
                    warn!("[store] skip malformed day key={} date={}: {}", key, date, e);
                    None
                }
            })
            .collect()
    }

    pub async fn get_day(&self, namespace: &Namespace, date: DayKey) -> Option<DayRecord> {
        self.get_all(namespace).await.remove(&date)
    }

    /// Upsert one day; the last write for a date wins. Other dates are
    /// written back as stored, including entries that do not parse.
    pub async fn save_day(
        &self,
        namespace: &Namespace,
        date: DayKey,
        record: DayRecord,
    ) -> Result<(), DomainError> {
        let mut entries = self.raw_entries(namespace).await;
        entries.insert(date.to_string(), serde_json::to_value(record.with_date(date))?);
        self.put_entries(namespace, &entries).await?;

        debug!(
            "[store] saved day ns={} date={} days={}",
            namespace,
            date,
            entries.len()
        );
        Ok(())
    }

    /// Delete one day; absent days are not an error
    pub async fn remove_day(&self, namespace: &Namespace, date: DayKey) -> Result<(), DomainError> {
        let mut entries = self.raw_entries(namespace).await;
        if entries.remove(&date.to_string()).is_none() {
            return Ok(());
        }
        self.put_entries(namespace, &entries).await?;

        debug!("[store] removed day ns={} date={}", namespace, date);
        Ok(())
    }

    /// Stored all-time longest streak; missing or unparseable reads as 0
    pub async fn stored_longest(&self, namespace: &Namespace) -> u32 {
        match self.kv.get(&namespace.longest_key()).await {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or(0),
            Ok(None) => 0,
            Err(e) => {
                warn!("[store] read longest failed ns={}: {}", namespace, e);
                0
            }
        }
    }

    /// Persist `candidate` only if it beats the stored value; returns the
    /// value now stored
    pub async fn ratchet_longest(
        &self,
        namespace: &Namespace,
        candidate: u32,
    ) -> Result<u32, DomainError> {
        let stored = self.stored_longest(namespace).await;
        if candidate <= stored {
            return Ok(stored);
        }

        self.kv
            .set(&namespace.longest_key(), &candidate.to_string())
            .await?;
        debug!(
            "[store] longest raised ns={} from={} to={}",
            namespace, stored, candidate
        );
        Ok(candidate)
    }

    pub async fn last_seen_namespace(&self) -> Option<Namespace> {
        match self.kv.get(LAST_UID_KEY).await {
            Ok(value) => value.map(|v| Namespace::parse(&v)),
            Err(e) => {
                warn!("[store] read last uid failed: {}", e);
                None
            }
        }
    }

    pub async fn remember_namespace(&self, namespace: &Namespace) -> Result<(), DomainError> {
        self.kv.set(LAST_UID_KEY, namespace.as_str()).await
    }

    /// The stored map as JSON values; a missing or corrupt blob reads empty
    async fn raw_entries(&self, namespace: &Namespace) -> BTreeMap<String, Value> {
        let key = namespace.days_key();
        let raw = match self.kv.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                warn!("[store] read failed key={}: {}", key, e);
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("[store] corrupt blob treated as empty key={}: {}", key, e);
                BTreeMap::new()
            }
        }
    }

    async fn put_entries(
        &self,
        namespace: &Namespace,
        entries: &BTreeMap<String, Value>,
    ) -> Result<(), DomainError> {
        let raw = serde_json::to_string(entries)?;
        self.kv.set(&namespace.days_key(), &raw).await
    }
}

/// The map key is authoritative for the record's date
fn parse_entry(date: &str, mut value: Value) -> Result<DayRecord, DomainError> {
    let date = DayKey::parse(date)?;
    if let Value::Object(fields) = &mut value {
        fields.insert("date".to_string(), Value::String(date.to_string()));
    }
    let record: DayRecord = serde_json::from_value(value)?;
    Ok(record.with_date(date))
}
