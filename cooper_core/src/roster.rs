//! Student roster persistence with file locking.
//!
//! The roster is a single JSON document. Saves go through a temp file in
//! the same directory and an atomic rename. `update` holds an exclusive
//! lock on a sidecar `<roster>.lock` file for its whole load-modify-save,
//! so concurrent writers queue instead of overwriting each other.

use crate::{Error, Result, Student};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// All students known to this installation
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Roster {
    pub students: Vec<Student>,
}

impl Roster {
    /// Load the roster from a file with shared locking
    ///
    /// Returns an empty roster if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No roster file found, starting empty");
            return Ok(Self::default());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        match serde_json::from_str::<Roster>(&contents) {
            Ok(roster) => {
                tracing::debug!("Loaded {} students from {:?}", roster.students.len(), path);
                Ok(roster)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse roster {:?}: {}. Starting empty.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save the roster atomically with exclusive locking
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().ok_or_else(|| {
            Error::Other(format!("roster path {:?} has no parent directory", path))
        })?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} students to {:?}", self.students.len(), path);
        Ok(())
    }

    /// Load, modify and save the roster under the writer lock
    ///
    /// The roster is left untouched if `f` fails.
    pub fn update<F, T>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut Roster) -> Result<T>,
    {
        let lock_path = lock_path(path);
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        lock.lock_exclusive()?;
        tracing::debug!("Holding roster lock {:?}", lock_path);

        let result = Self::load(path).and_then(|mut roster| {
            let out = f(&mut roster)?;
            roster.save(path)?;
            Ok(out)
        });

        lock.unlock()?;
        result
    }

    /// Add a student and return its id
    pub fn add(&mut self, student: Student) -> Uuid {
        let id = student.id;
        tracing::info!("Adding student {} ({})", student.name, id);
        self.students.push(student);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Find a student by id or by unique case-insensitive name
    pub fn find(&self, query: &str) -> Result<&Student> {
        let query = query.trim();
        if let Ok(id) = Uuid::parse_str(query) {
            return self
                .get(id)
                .ok_or_else(|| Error::StudentNotFound(query.to_string()));
        }

        let wanted = query.to_lowercase();
        let mut matches = self
            .students
            .iter()
            .filter(|s| s.name.to_lowercase() == wanted);

        match (matches.next(), matches.next()) {
            (Some(student), None) => Ok(student),
            (Some(_), Some(_)) => Err(Error::AmbiguousStudent(query.to_string())),
            (None, _) => Err(Error::StudentNotFound(query.to_string())),
        }
    }

    /// Flip a student's active flag, returning the new value
    pub fn toggle_active(&mut self, id: Uuid) -> Result<bool> {
        let student = self
            .students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(Error::UnknownStudentId(id))?;
        student.is_active = !student.is_active;
        tracing::info!(
            "Student {} is now {}",
            student.id,
            if student.is_active { "active" } else { "inactive" }
        );
        Ok(student.is_active)
    }

    /// Active students sorted by name
    pub fn active(&self) -> Vec<&Student> {
        let mut out: Vec<_> = self.students.iter().filter(|s| s.is_active).collect();
        out.sort_by_key(|s| s.name.to_lowercase());
        out
    }

    /// All students sorted by name
    pub fn all(&self) -> Vec<&Student> {
        let mut out: Vec<_> = self.students.iter().collect();
        out.sort_by_key(|s| s.name.to_lowercase());
        out
    }
}

/// Sidecar file serialising roster writers: `students.json.lock`
fn lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "roster".into());
    name.push(".lock");
    path.with_file_name(name)
}
