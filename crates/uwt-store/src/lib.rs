//! Filesystem archive of dated raw processing-time snapshots.
//!
//! Layout: `root/{form_code}/{office_code}/{YYYY-MM-DD}.json`, one file per
//! (form, office, date). Date stems are fixed-width and zero-padded so
//! lexicographic and chronological order coincide. Files are written
//! pretty-printed with sorted keys, which keeps day-to-day archive diffs
//! readable. Nothing here deletes or compacts: the archive only grows.

pub mod error;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

pub use error::StoreError;

/// A dated snapshot read back from the archive.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub payload: Value,
}

/// Handle to the snapshot archive rooted at one directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Archives the raw payload for a (form, office) pair under `date`,
    /// creating parent directories as needed. Writing the same key twice
    /// overwrites: a same-day re-run replaces the earlier capture.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on filesystem failure or
    /// [`StoreError::Serialize`] if the payload cannot be serialized.
    pub async fn write(
        &self,
        form_code: &str,
        office_code: &str,
        date: NaiveDate,
        payload: &Value,
    ) -> Result<PathBuf, StoreError> {
        let dir = self.pair_dir(form_code, office_code);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_error(&dir, e))?;

        let path = dir.join(format!("{date}.json"));
        let body = to_pretty_sorted(payload)?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| io_error(&path, e))?;

        tracing::debug!(form = %form_code, office = %office_code, path = %path.display(), "snapshot written");
        Ok(path)
    }

    /// Loads the most recent snapshot for a (form, office) pair: the
    /// greatest date-stemmed `*.json` file in the pair's directory.
    /// Non-date files are ignored.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] when the pair has no archived snapshot.
    /// - [`StoreError::Io`] on filesystem failure.
    /// - [`StoreError::Corrupt`] when the snapshot file is not valid JSON.
    pub async fn latest(&self, form_code: &str, office_code: &str) -> Result<Snapshot, StoreError> {
        let dir = self.pair_dir(form_code, office_code);

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(self.not_found(form_code, office_code));
            }
            Err(e) => return Err(io_error(&dir, e)),
        };

        let mut latest: Option<NaiveDate> = None;
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&dir, e))? {
            if let Some(date) = snapshot_date(&entry.file_name()) {
                latest = Some(latest.map_or(date, |cur| cur.max(date)));
            }
        }

        let Some(date) = latest else {
            return Err(self.not_found(form_code, office_code));
        };

        let path = dir.join(format!("{date}.json"));
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| io_error(&path, e))?;
        let payload = serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            path: path.display().to_string(),
            source: e,
        })?;

        Ok(Snapshot { date, payload })
    }

    fn pair_dir(&self, form_code: &str, office_code: &str) -> PathBuf {
        self.root.join(form_code).join(office_code)
    }

    fn not_found(&self, form_code: &str, office_code: &str) -> StoreError {
        StoreError::NotFound {
            form_code: form_code.to_string(),
            office_code: office_code.to_string(),
        }
    }
}

/// Extracts the snapshot date from a `YYYY-MM-DD.json` file name.
fn snapshot_date(file_name: &std::ffi::OsStr) -> Option<NaiveDate> {
    let name = Path::new(file_name);
    if name.extension()? != "json" {
        return None;
    }
    let stem = name.file_stem()?.to_str()?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}

/// Serializes a payload pretty-printed with 4-space indentation. Key order
/// is sorted by construction (`serde_json::Value` maps are ordered), which
/// keeps archived files byte-stable across re-serialization.
fn to_pretty_sorted(payload: &Value) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    payload.serialize(&mut ser)?;
    Ok(buf)
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payload(marker: &str) -> Value {
        serde_json::json!({
            "data": {
                "processing_time": {
                    "form_name": "I-485",
                    "office_code": "NBC",
                    "range": null,
                    "subtypes": [{ "form_type": marker, "range": [] }]
                }
            }
        })
    }

    #[tokio::test]
    async fn write_creates_dated_file_under_pair_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let path = store
            .write("I-485", "NBC", date(2024, 1, 15), &payload("x"))
            .await
            .unwrap();

        assert_eq!(
            path,
            dir.path().join("I-485").join("NBC").join("2024-01-15.json")
        );
        assert!(path.is_file());
    }

    #[tokio::test]
    async fn write_output_is_pretty_printed_with_sorted_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let value = serde_json::json!({ "b": 1, "a": { "d": 2, "c": 3 } });
        let path = store
            .write("I-90", "NBC", date(2024, 1, 1), &value)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "{\n    \"a\": {\n        \"c\": 3,\n        \"d\": 2\n    },\n    \"b\": 1\n}"
        );
    }

    #[tokio::test]
    async fn same_day_write_overwrites_instead_of_duplicating() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let day = date(2024, 1, 15);

        store.write("I-485", "NBC", day, &payload("first")).await.unwrap();
        store.write("I-485", "NBC", day, &payload("second")).await.unwrap();

        let pair_dir = dir.path().join("I-485").join("NBC");
        let count = std::fs::read_dir(&pair_dir).unwrap().count();
        assert_eq!(count, 1);

        let snapshot = store.latest("I-485", "NBC").await.unwrap();
        assert_eq!(snapshot.payload, payload("second"));
    }

    #[tokio::test]
    async fn latest_picks_chronologically_greatest_date() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        store.write("I-485", "NBC", date(2024, 1, 1), &payload("a")).await.unwrap();
        store.write("I-485", "NBC", date(2024, 1, 15), &payload("b")).await.unwrap();
        store.write("I-485", "NBC", date(2023, 12, 31), &payload("c")).await.unwrap();

        let snapshot = store.latest("I-485", "NBC").await.unwrap();
        assert_eq!(snapshot.date, date(2024, 1, 15));
        assert_eq!(snapshot.payload, payload("b"));
    }

    #[tokio::test]
    async fn latest_ignores_non_snapshot_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.write("I-485", "NBC", date(2024, 1, 1), &payload("a")).await.unwrap();

        let pair_dir = dir.path().join("I-485").join("NBC");
        std::fs::write(pair_dir.join("notes.txt"), "scratch").unwrap();
        std::fs::write(pair_dir.join("9999-99-99.json"), "{}").unwrap();

        let snapshot = store.latest("I-485", "NBC").await.unwrap();
        assert_eq!(snapshot.date, date(2024, 1, 1));
    }

    #[tokio::test]
    async fn latest_on_unknown_pair_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let result = store.latest("I-485", "NBC").await;
        assert!(
            matches!(
                result,
                Err(StoreError::NotFound { ref form_code, ref office_code })
                    if form_code == "I-485" && office_code == "NBC"
            ),
            "expected NotFound, got: {result:?}"
        );
    }

    #[tokio::test]
    async fn latest_on_directory_without_snapshots_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let pair_dir = dir.path().join("I-485").join("NBC");
        std::fs::create_dir_all(&pair_dir).unwrap();
        std::fs::write(pair_dir.join("readme.md"), "empty").unwrap();

        let result = store.latest("I-485", "NBC").await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn latest_on_corrupt_snapshot_is_corrupt_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let pair_dir = dir.path().join("I-485").join("NBC");
        std::fs::create_dir_all(&pair_dir).unwrap();
        std::fs::write(pair_dir.join("2024-01-01.json"), "{truncated").unwrap();

        let result = store.latest("I-485", "NBC").await;
        assert!(
            matches!(result, Err(StoreError::Corrupt { .. })),
            "expected Corrupt, got: {result:?}"
        );
    }
}
