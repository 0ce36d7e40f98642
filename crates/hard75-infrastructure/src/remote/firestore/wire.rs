//! Firestore REST payloads for the `users/{uid}/logs/{date}` collection.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

use hard75_domain::day_record::DayKey;
use hard75_domain::remote_log::RemoteLogEntry;

pub(super) const LOGS_COLLECTION: &str = "logs";

/// Typed Firestore value; only the variants the log documents use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) enum FieldValue {
    StringValue(String),
    BooleanValue(bool),
    TimestampValue(DateTime<Utc>),
    NullValue(Option<()>),
}

#[derive(Debug, Deserialize)]
pub(super) struct Document {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

/// One element of the `runQuery` response array
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RunQueryItem {
    #[serde(default)]
    pub document: Option<Document>,
}

/// Relative document path of one day's log
pub(super) fn log_document_path(uid: &str, date: DayKey) -> String {
    format!("users/{}/{}/{}", uid, LOGS_COLLECTION, date)
}

/// Merge write: only `date` and `complete` change, `savedAt` takes the
/// server's request time
pub(super) fn commit_body(document_name: &str, date: DayKey, complete: bool) -> Value {
    json!({
        "writes": [{
            "update": {
                "name": document_name,
                "fields": {
                    "date": FieldValue::StringValue(date.to_string()),
                    "complete": FieldValue::BooleanValue(complete),
                }
            },
            "updateMask": { "fieldPaths": ["date", "complete"] },
            "updateTransforms": [{
                "fieldPath": "savedAt",
                "setToServerValue": "REQUEST_TIME"
            }]
        }]
    })
}

/// Most recent `limit` logs by date, newest first
pub(super) fn recent_logs_query(limit: usize) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": LOGS_COLLECTION }],
            "orderBy": [{
                "field": { "fieldPath": "date" },
                "direction": "DESCENDING"
            }],
            "limit": limit
        }
    })
}

/// Map query results to log entries, skipping documents that do not parse
pub(super) fn entries_from_query(items: Vec<RunQueryItem>) -> Vec<RemoteLogEntry> {
    items
        .into_iter()
        .filter_map(|item| item.document)
        .filter_map(|doc| match entry_from_document(&doc) {
            Some(entry) => Some(entry),
            None => {
                warn!("[sync] skip malformed remote log document name={}", doc.name);
                None
            }
        })
        .collect()
}

fn entry_from_document(doc: &Document) -> Option<RemoteLogEntry> {
    let field = |name: &str| {
        doc.fields
            .get(name)
            .and_then(|v| serde_json::from_value::<FieldValue>(v.clone()).ok())
    };

    let date = match field("date")? {
        FieldValue::StringValue(s) => DayKey::parse(&s).ok()?,
        _ => return None,
    };
    let complete = matches!(field("complete"), Some(FieldValue::BooleanValue(true)));
    let saved_at = match field("savedAt") {
        Some(FieldValue::TimestampValue(ts)) => Some(ts),
        _ => None,
    };

    Some(RemoteLogEntry {
        date,
        complete,
        saved_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_document_path() {
        let date = DayKey::parse("2025-04-02").unwrap();
        assert_eq!(log_document_path("u1", date), "users/u1/logs/2025-04-02");
    }

    #[test]
    fn test_commit_body_merges_named_fields_only() {
        let date = DayKey::parse("2025-04-02").unwrap();
        let body = commit_body("projects/p/databases/(default)/documents/users/u1/logs/2025-04-02", date, true);
        let write = &body["writes"][0];

        assert_eq!(write["update"]["fields"]["date"]["stringValue"], "2025-04-02");
        assert_eq!(write["update"]["fields"]["complete"]["booleanValue"], true);
        assert_eq!(write["updateMask"]["fieldPaths"], json!(["date", "complete"]));
        assert_eq!(write["updateTransforms"][0]["fieldPath"], "savedAt");
        assert_eq!(write["updateTransforms"][0]["setToServerValue"], "REQUEST_TIME");
    }

    #[test]
    fn test_recent_logs_query_orders_descending_with_limit() {
        let q = recent_logs_query(100);
        assert_eq!(q["structuredQuery"]["from"][0]["collectionId"], "logs");
        assert_eq!(q["structuredQuery"]["orderBy"][0]["direction"], "DESCENDING");
        assert_eq!(q["structuredQuery"]["limit"], 100);
    }

    #[test]
    fn test_entries_from_query_parses_documents() {
        let raw = json!([
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/users/u1/logs/2025-04-02",
                    "fields": {
                        "date": { "stringValue": "2025-04-02" },
                        "complete": { "booleanValue": true },
                        "savedAt": { "timestampValue": "2025-04-02T19:01:02.345Z" }
                    }
                },
                "readTime": "2025-04-03T00:00:00Z"
            },
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/users/u1/logs/2025-04-01",
                    "fields": {
                        "date": { "stringValue": "2025-04-01" },
                        "complete": { "booleanValue": false }
                    }
                }
            },
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/users/u1/logs/bad",
                    "fields": { "date": { "stringValue": "not-a-date" } }
                }
            }
        ]);
        let items: Vec<RunQueryItem> = serde_json::from_value(raw).unwrap();
        let entries = entries_from_query(items);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date.to_string(), "2025-04-02");
        assert!(entries[0].complete);
        assert!(entries[0].saved_at.is_some());
        assert!(!entries[1].complete);
        assert!(entries[1].saved_at.is_none());
    }

    #[test]
    fn test_empty_query_result() {
        let items: Vec<RunQueryItem> =
            serde_json::from_value(json!([{ "readTime": "2025-04-03T00:00:00Z" }])).unwrap();
        assert!(entries_from_query(items).is_empty());
    }
}
