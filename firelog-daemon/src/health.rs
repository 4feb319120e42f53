//! Daemon health report.
//!
//! The daemon is healthy as long as it is serving. Per-vendor collection
//! sizes and load times are included so operators can spot a vendor whose
//! directory has never loaded.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use firelog_core::types::Vendor;
use firelog_log_pipeline::RecordStore;

/// Health report returned by `GET /health`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonHealth {
    /// Always `"ok"` while the HTTP server answers.
    pub status: &'static str,
    pub version: &'static str,
    /// Seconds since the daemon started.
    pub uptime_secs: u64,
    pub collections: Vec<CollectionHealth>,
}

/// Current state of one vendor collection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionHealth {
    pub vendor: Vendor,
    pub records: usize,
    pub parse_failures: usize,
    /// `None` until the first successful reload.
    pub loaded_at: Option<DateTime<Utc>>,
}

impl DaemonHealth {
    pub fn collect(store: &RecordStore, started: Instant) -> Self {
        let collections = Vendor::ALL
            .iter()
            .map(|&vendor| {
                let collection = store.get_all(vendor);
                CollectionHealth {
                    vendor,
                    records: collection.len(),
                    parse_failures: collection.failures().len(),
                    loaded_at: collection.loaded_at(),
                }
            })
            .collect();

        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: started.elapsed().as_secs(),
            collections,
        }
    }
}

#[cfg(test)]
mod tests {
    use firelog_log_pipeline::RecordStoreBuilder;

    use super::*;

    #[test]
    fn fresh_store_reports_unloaded_collections() {
        let store = RecordStoreBuilder::new().build().unwrap();
        let health = DaemonHealth::collect(&store, Instant::now());

        assert_eq!(health.status, "ok");
        assert_eq!(health.collections.len(), 3);
        assert!(health.collections.iter().all(|c| c.records == 0));
        assert!(health.collections.iter().all(|c| c.loaded_at.is_none()));
    }

    #[test]
    fn serializes_camel_case() {
        let store = RecordStoreBuilder::new().build().unwrap();
        let json = serde_json::to_value(DaemonHealth::collect(&store, Instant::now())).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json.get("uptimeSecs").is_some());
        assert_eq!(json["collections"][1]["vendor"], "tplink");
        assert!(json["collections"][0]["loadedAt"].is_null());
    }
}
