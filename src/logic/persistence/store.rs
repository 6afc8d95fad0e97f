//! Intercept Store
//!
//! Append-only SQLite log: one row per Target per cycle, never deduplicated.
//! Feeds heat maps / map export downstream.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};

use super::record::InterceptRecord;
use super::StoreError;
use crate::logic::observation::Band;
use crate::logic::threat::{Confidence, Target};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS intercepts (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    recorded_at  TEXT    NOT NULL,
    ssid         TEXT    NOT NULL,
    bssid        TEXT    NOT NULL,
    vendor       TEXT    NOT NULL,
    signal       INTEGER NOT NULL,
    band         TEXT    NOT NULL,
    encryption   TEXT    NOT NULL,
    latitude     REAL,
    longitude    REAL,
    speed_mps    REAL,
    distance_m   REAL    NOT NULL,
    is_threat    INTEGER NOT NULL,
    threat_label TEXT    NOT NULL,
    confidence   TEXT    NOT NULL,
    is_mobile    INTEGER NOT NULL,
    is_pacing    INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_intercepts_bssid ON intercepts(bssid);
";

const INSERT: &str = "
INSERT INTO intercepts (
    recorded_at, ssid, bssid, vendor, signal, band, encryption,
    latitude, longitude, speed_mps, distance_m,
    is_threat, threat_label, confidence, is_mobile, is_pacing
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
";

pub struct InterceptStore {
    conn: Mutex<Connection>,
}

impl InterceptStore {
    /// Open (or create) the database file
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        log::info!("Intercept store opened: {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Append one cycle in a single transaction; returns rows written
    pub fn append(&self, recorded_at: DateTime<Utc>, targets: &[Target]) -> Result<usize, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let ts = recorded_at.to_rfc3339();

        {
            let mut stmt = tx.prepare_cached(INSERT)?;
            for t in targets {
                let r = InterceptRecord::from_target(t, recorded_at);
                stmt.execute(params![
                    ts,
                    r.ssid,
                    r.bssid,
                    r.vendor,
                    r.signal as i64,
                    r.band.as_str(),
                    r.encryption,
                    r.latitude,
                    r.longitude,
                    r.speed_mps,
                    r.distance_m,
                    r.is_threat,
                    r.threat_label,
                    r.confidence.as_str(),
                    r.is_mobile,
                    r.is_pacing,
                ])?;
            }
        }

        tx.commit()?;
        Ok(targets.len())
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM intercepts", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    pub fn count_for(&self, bssid: &str) -> Result<u64, StoreError> {
        let conn = self.conn.lock();
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM intercepts WHERE bssid = ?1",
            params![bssid],
            |row| row.get(0),
        )?;
        Ok(n as u64)
    }

    /// Newest rows first
    pub fn recent(&self, limit: usize) -> Result<Vec<InterceptRecord>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT recorded_at, ssid, bssid, vendor, signal, band, encryption,
                    latitude, longitude, speed_mps, distance_m,
                    is_threat, threat_label, confidence, is_mobile, is_pacing
             FROM intercepts ORDER BY id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            let recorded_at: String = row.get(0)?;
            let signal: i64 = row.get(4)?;
            let band: String = row.get(5)?;
            let confidence: String = row.get(13)?;

            Ok(InterceptRecord {
                recorded_at: DateTime::parse_from_rfc3339(&recorded_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_default(),
                ssid: row.get(1)?,
                bssid: row.get(2)?,
                vendor: row.get(3)?,
                signal: signal.clamp(0, 100) as u8,
                band: Band::parse(&band),
                encryption: row.get(6)?,
                latitude: row.get(7)?,
                longitude: row.get(8)?,
                speed_mps: row.get(9)?,
                distance_m: row.get(10)?,
                is_threat: row.get(11)?,
                threat_label: row.get(12)?,
                confidence: Confidence::parse(&confidence),
                is_mobile: row.get(14)?,
                is_pacing: row.get(15)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::observation::{Observation, ObserverFix};
    use crate::logic::threat::Verdict;
    use tempfile::tempdir;

    fn sample_target(ssid: &str, bssid: &str) -> Target {
        let obs = Observation::new(ssid, bssid, 72, Band::Ghz5)
            .with_encryption("WPA2")
            .with_observer(ObserverFix::located(45.5, -122.6).with_speed(11.0));
        let mut t = Target::from_observation(&obs, bssid.to_string());
        t.apply_verdict(&Verdict::threat("[POLICE]", Confidence::Low));
        t.distance_m = 5.2;
        t
    }

    #[test]
    fn test_append_and_read_back() {
        let dir = tempdir().unwrap();
        let store = InterceptStore::open(&dir.path().join("logs").join("intercepts.db")).unwrap();

        let now = Utc::now();
        let targets = vec![
            sample_target("PoliceNet", "AA:BB:CC:00:00:01"),
            sample_target("Other", "AA:BB:CC:00:00:02"),
        ];
        assert_eq!(store.append(now, &targets).unwrap(), 2);

        let rows = store.recent(10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ssid, "Other");
        assert_eq!(rows[1], InterceptRecord::from_target(&targets[0], rows[1].recorded_at));
        assert_eq!(rows[1].confidence, Confidence::Low);
        assert_eq!(rows[1].band, Band::Ghz5);
        assert_eq!(rows[1].latitude, Some(45.5));
    }

    #[test]
    fn test_append_only_not_deduplicated() {
        let store = InterceptStore::open_in_memory().unwrap();
        let targets = vec![sample_target("PoliceNet", "AA:BB:CC:00:00:01")];

        store.append(Utc::now(), &targets).unwrap();
        store.append(Utc::now(), &targets).unwrap();

        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.count_for("AA:BB:CC:00:00:01").unwrap(), 2);
        assert_eq!(store.count_for("AA:BB:CC:00:00:09").unwrap(), 0);
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("intercepts.db");
        {
            let store = InterceptStore::open(&path).unwrap();
            store.append(Utc::now(), &[sample_target("A", "AA:BB:CC:00:00:01")]).unwrap();
        }
        let store = InterceptStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}
