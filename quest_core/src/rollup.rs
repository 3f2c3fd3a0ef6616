//! CSV rollup for archiving the event journal.
//!
//! The CSV is synced before the journal is renamed, so a crash mid-rollup
//! can duplicate rows but never lose them.

use crate::journal::{read_events, EventRecord};
use crate::Result;
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    recorded_at: String,
    goal_index: usize,
    goal_name: String,
    goal_kind: String,
    points: u32,
    bonus: u32,
    completed: bool,
    score_after: u64,
}

impl From<&EventRecord> for CsvRow {
    fn from(event: &EventRecord) -> Self {
        CsvRow {
            id: event.id.to_string(),
            recorded_at: event.recorded_at.to_rfc3339(),
            goal_index: event.goal_index,
            goal_name: event.goal_name.clone(),
            goal_kind: event.goal_kind.tag().to_string(),
            points: event.points,
            bonus: event.bonus,
            completed: event.completed,
            score_after: event.score_after,
        }
    }
}

/// Roll up journal events into CSV and archive the journal
///
/// 1. Reads all events from the journal
/// 2. Appends them to the CSV file (headers only when the file is new)
/// 3. Syncs the CSV to disk
/// 4. Renames the journal to `.jsonl.processed`
///
/// Returns the number of events written.
pub fn journal_to_csv_and_archive(journal_path: &Path, csv_path: &Path) -> Result<usize> {
    let events = read_events(journal_path)?;

    if events.is_empty() {
        tracing::info!("No events in journal to roll up");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for event in &events {
        writer.serialize(CsvRow::from(event))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} events to CSV", events.len());

    let processed_path = journal_path.with_extension("jsonl.processed");
    std::fs::rename(journal_path, &processed_path)?;

    tracing::info!("Archived journal to {:?}", processed_path);

    Ok(events.len())
}

/// Remove all `.processed` journal archives in a directory
pub fn cleanup_processed_journals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.extension().is_some_and(|ext| ext == "processed") {
            std::fs::remove_file(&path)?;
            tracing::debug!("Removed processed journal: {:?}", path);
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed journals", count);
    }

    Ok(count)
}
