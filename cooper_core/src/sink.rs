//! Submit contract for finished evaluations, and the JSONL test log that
//! backs it in the CLI.
//!
//! One test per line. A record is serialized before the log is opened and
//! written with a single call under an exclusive `fs2` lock, so readers
//! never see half a test. Readers take a shared lock and drop lines they
//! cannot parse, reporting the count once per read.

use crate::history::sort_newest_first;
use crate::{Result, TestRecord};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Receiver of submitted test records
pub trait TestSink {
    fn submit(&mut self, record: &TestRecord) -> Result<()>;
}

/// Test log on disk, one JSON record per line
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TestSink for JsonlSink {
    fn submit(&mut self, record: &TestRecord) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        log.lock_exclusive()?;
        let written = log.write_all(&line).and_then(|()| log.sync_data());
        log.unlock()?;
        written?;

        tracing::debug!(
            "Logged test {} for student {} ({} bytes)",
            record.id,
            record.student_id,
            line.len()
        );
        Ok(())
    }
}

/// Sink that keeps records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<TestRecord>,
}

impl TestSink for MemorySink {
    fn submit(&mut self, record: &TestRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Every readable record in the log, in the order they were submitted
pub fn read_records(path: &Path) -> Result<Vec<TestRecord>> {
    scan_log(path, |_| true)
}

/// One student's records, newest first
///
/// Records belonging to other students are never kept in memory.
pub fn read_records_for(path: &Path, student_id: Uuid) -> Result<Vec<TestRecord>> {
    let mut records = scan_log(path, |r| r.student_id == student_id)?;
    sort_newest_first(&mut records);
    Ok(records)
}

fn scan_log<F>(path: &Path, mut keep: F) -> Result<Vec<TestRecord>>
where
    F: FnMut(&TestRecord) -> bool,
{
    let log = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    log.lock_shared()?;

    let mut records = Vec::new();
    let mut unreadable = 0usize;
    let mut failure = None;

    for (idx, line) in BufReader::new(&log).lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                failure = Some(e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<TestRecord>(&line) {
            Ok(record) if keep(&record) => records.push(record),
            Ok(_) => {}
            Err(e) => {
                unreadable += 1;
                tracing::debug!("Unreadable test log line {}: {}", idx + 1, e);
            }
        }
    }

    log.unlock()?;
    if let Some(e) = failure {
        return Err(e.into());
    }

    if unreadable > 0 {
        tracing::warn!("Skipped {} unreadable lines in {:?}", unreadable, path);
    }
    tracing::debug!("Kept {} test records from {:?}", records.len(), path);
    Ok(records)
}
