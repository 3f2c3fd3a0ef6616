//! Event journal: an append-only history of recorded events.
//!
//! Events are appended to a JSONL (JSON Lines) file with file locking.
//! The ledger file remains the source of truth for score and goal state;
//! the journal only records how it got there.

use crate::{EventReport, GoalKind, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One recorded event
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventRecord {
    pub id: Uuid,
    pub goal_index: usize,
    pub goal_name: String,
    pub goal_kind: GoalKind,
    /// Total points awarded, bonus included
    pub points: u32,
    pub bonus: u32,
    pub completed: bool,
    pub score_after: u64,
    pub recorded_at: DateTime<Utc>,
}

impl EventRecord {
    /// Build a journal entry from a ledger report
    pub fn from_report(report: &EventReport, score_after: u64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal_index: report.index,
            goal_name: report.name.clone(),
            goal_kind: report.kind,
            points: report.outcome.points,
            bonus: report.outcome.bonus,
            completed: report.completed,
            score_after,
            recorded_at,
        }
    }
}

/// Event sink trait for persisting events
pub trait EventSink {
    fn append(&mut self, event: &EventRecord) -> Result<()>;
}

/// JSONL-based event sink with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl EventSink for JsonlJournal {
    fn append(&mut self, event: &EventRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(event)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended event {} to journal", event.id);
        Ok(())
    }
}

/// Read all events from a journal file
///
/// A missing journal is empty. Unparsable lines are skipped with a warning.
pub fn read_events(path: &Path) -> Result<Vec<EventRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut events = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<EventRecord>(&line) {
            Ok(event) => events.push(event),
            Err(e) => {
                tracing::warn!("Failed to parse event at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} events from journal", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedQuote, Goal, Ledger};

    fn recorded_event(ledger: &mut Ledger, index: usize) -> EventRecord {
        let report = ledger
            .record_event(index, &mut FixedQuote::new("Go"))
            .unwrap();
        EventRecord::from_report(&report, ledger.score(), Utc::now())
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.push(Goal::eternal("Read", "Scriptures", 100));
        ledger.push(Goal::checklist("Temple", "Attend", 10, 2, 40).unwrap());
        ledger
    }

    #[test]
    fn test_from_report_copies_outcome() {
        let mut ledger = sample_ledger();
        recorded_event(&mut ledger, 2);
        let event = recorded_event(&mut ledger, 2);

        assert_eq!(event.goal_index, 2);
        assert_eq!(event.goal_name, "Temple");
        assert_eq!(event.goal_kind, GoalKind::Checklist);
        assert_eq!(event.points, 50);
        assert_eq!(event.bonus, 40);
        assert!(event.completed);
        assert_eq!(event.score_after, 60);
    }

    #[test]
    fn test_append_and_read_events() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("events.jsonl");

        let mut ledger = sample_ledger();
        let mut journal = JsonlJournal::new(&path);
        let mut ids = Vec::new();
        for index in [1, 1, 2] {
            let event = recorded_event(&mut ledger, index);
            ids.push(event.id);
            journal.append(&event).unwrap();
        }

        let events = read_events(&path).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), ids);
        assert_eq!(events[2].score_after, 210);
    }

    #[test]
    fn test_read_missing_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let events = read_events(&temp_dir.path().join("none.jsonl")).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("events.jsonl");

        let mut ledger = sample_ledger();
        let mut journal = JsonlJournal::new(&path);
        journal.append(&recorded_event(&mut ledger, 1)).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{ not json").unwrap();
        drop(file);

        journal.append(&recorded_event(&mut ledger, 1)).unwrap();

        let events = read_events(&path).unwrap();
        assert_eq!(events.len(), 2);
    }
}
