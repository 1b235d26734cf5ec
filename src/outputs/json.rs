//! JSON snapshot of the result table.
//!
//! Files are grouped by local date and named after the time of day:
//! `{json_output_dir}/{date}/{time_of_day}.json`. A later run in the same
//! slot overwrites the earlier file.

use crate::models::{ResultTable, TableSnapshot};
use crate::utils::time_of_day;
use chrono::Local;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Stamp `table` with the current local date and time.
pub fn snapshot(table: &ResultTable, source: &str) -> TableSnapshot {
    let now = Local::now();
    TableSnapshot {
        source: source.to_string(),
        local_date: now.date_naive().to_string(),
        time_of_day: time_of_day(),
        local_time: now.time().to_string(),
        columns: table.columns().iter().map(|c| c.to_string()).collect(),
        articles: table.records.clone(),
    }
}

/// Where a snapshot is written under `json_output_dir`.
pub fn snapshot_path(json_output_dir: &str, snapshot: &TableSnapshot) -> PathBuf {
    Path::new(json_output_dir)
        .join(&snapshot.local_date)
        .join(format!("{}.json", snapshot.time_of_day))
}

/// Serialize `table` to `{json_output_dir}/{date}/{time_of_day}.json`.
///
/// # Returns
///
/// The path written, or an error if directory creation or the write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_table(
    table: &ResultTable,
    source: &str,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let snapshot = snapshot(table, source);
    let json = serde_json::to_string_pretty(&snapshot)?;
    let path = snapshot_path(json_output_dir, &snapshot);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), rows = table.len(), "Wrote JSON snapshot");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleRecord, NOT_AVAILABLE};
    use tempfile::tempdir;

    fn table() -> ResultTable {
        ResultTable::from_records(vec![ArticleRecord {
            url: "https://www.euronews.com/2025/05/06/eu-summit".to_string(),
            title: "EU summit".to_string(),
            author: NOT_AVAILABLE.to_string(),
            publication_date: "2025-05-06".to_string(),
            content: "First.\nSecond.".to_string(),
        }])
    }

    #[test]
    fn test_snapshot_path_layout() {
        let snap = TableSnapshot {
            source: "s".to_string(),
            local_date: "2025-05-06".to_string(),
            time_of_day: "evening".to_string(),
            local_time: "20:30:00".to_string(),
            columns: vec![],
            articles: vec![],
        };
        assert_eq!(
            snapshot_path("/tmp/out", &snap),
            PathBuf::from("/tmp/out/2025-05-06/evening.json")
        );
    }

    #[tokio::test]
    async fn test_write_table_round_trips() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().join("json");
        let dir_str = dir.to_string_lossy().to_string();

        let path = write_table(&table(), "https://www.euronews.com/", &dir_str)
            .await
            .unwrap();
        assert!(path.starts_with(&dir));

        let raw = fs::read_to_string(&path).await.unwrap();
        let back: TableSnapshot = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.source, "https://www.euronews.com/");
        assert_eq!(back.articles.len(), 1);
        assert_eq!(back.articles[0].author, NOT_AVAILABLE);
        assert_eq!(back.columns[3], "publication_date");
    }
}
