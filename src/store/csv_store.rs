//! Append-only CSV store
//!
//! All datasets are plain UTF-8 CSV files with a mandatory header row. Rows
//! are only ever appended; the one exception is [`CsvStore::normalize`],
//! which rewrites a dataset atomically through a temporary file.
//!
//! Writes to the same file are serialized by a mutex owned by that file, so
//! appends to different datasets proceed in parallel while the rows of one
//! batch are never interleaved with another writer's rows.

use crate::store::traits::{CsvRecord, StoreError, StoreResult};
use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Outcome of rewriting a dataset in place
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Rows written back
    pub kept: usize,
    /// Rows dropped because their key (or whole content) was already seen
    pub duplicates: usize,
    /// Rows dropped because every field was empty
    pub empty: usize,
    /// Rows that could not be read and were skipped
    pub malformed: usize,
}

impl std::fmt::Display for NormalizeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} kept, {} duplicates, {} empty, {} malformed",
            self.kept, self.duplicates, self.empty, self.malformed
        )
    }
}

/// Rows read from a dataset, with malformed rows already skipped
#[derive(Debug, Clone, Default)]
struct Snapshot {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    malformed: usize,
}

/// Thread-safe, header-initializing CSV writer and reader
#[derive(Debug, Default)]
pub struct CsvStore {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl CsvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mutex guarding one file, creating it on first use
    fn file_lock(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn lock(guard: &Mutex<()>) -> MutexGuard<'_, ()> {
        guard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates `path` with a header row if it does not exist yet
    ///
    /// An existing file is left untouched. A zero-length file (left behind by
    /// a crash between create and first write) receives the header.
    pub fn initialize(&self, path: &Path, headers: &[&str]) -> StoreResult<()> {
        let lock = self.file_lock(path);
        let _guard = Self::lock(&lock);
        initialize_locked(path, headers)
    }

    /// Appends one row, initializing the file first if needed
    pub fn append_one<R: CsvRecord>(&self, path: &Path, row: &R) -> StoreResult<()> {
        self.append_many(path, std::slice::from_ref(row))
    }

    /// Appends a batch of rows under a single lock acquisition
    pub fn append_many<R: CsvRecord>(&self, path: &Path, rows: &[R]) -> StoreResult<()> {
        let lock = self.file_lock(path);
        let _guard = Self::lock(&lock);

        initialize_locked(path, R::HEADERS)?;
        if rows.is_empty() {
            return Ok(());
        }

        let file = OpenOptions::new().append(true).open(path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        tracing::trace!("Appended {} row(s) to {}", rows.len(), path.display());
        Ok(())
    }

    /// Returns true if the dataset file exists
    pub fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Reads every value of a named column
    ///
    /// A missing file reads as empty. Malformed rows are skipped.
    pub fn read_column(&self, path: &Path, column: &str) -> StoreResult<Vec<String>> {
        let lock = self.file_lock(path);
        let _guard = Self::lock(&lock);

        let Some(snapshot) = read_snapshot(path)? else {
            return Ok(Vec::new());
        };
        let index = column_index(&snapshot.headers, path, column)?;

        Ok(snapshot
            .rows
            .into_iter()
            .map(|mut row| std::mem::take(&mut row[index]))
            .collect())
    }

    /// Reads the distinct non-empty values of a named column
    pub fn read_keys(&self, path: &Path, column: &str) -> StoreResult<HashSet<String>> {
        Ok(self
            .read_column(path, column)?
            .into_iter()
            .filter(|value| !value.trim().is_empty())
            .collect())
    }

    /// Counts the readable data rows of a dataset
    pub fn count_rows(&self, path: &Path) -> StoreResult<usize> {
        let lock = self.file_lock(path);
        let _guard = Self::lock(&lock);
        Ok(read_snapshot(path)?.map_or(0, |snapshot| snapshot.rows.len()))
    }

    /// Rewrites a dataset without malformed, fully empty or duplicate rows
    ///
    /// Rows sharing a non-empty `key_column` value keep only the first
    /// occurrence; rows with an empty key are deduplicated on their whole
    /// content. The rewrite goes through a temporary file that replaces the
    /// original, so a crash never leaves a truncated dataset behind.
    pub fn normalize(&self, path: &Path, key_column: &str) -> StoreResult<NormalizeReport> {
        let lock = self.file_lock(path);
        let _guard = Self::lock(&lock);

        let Some(snapshot) = read_snapshot(path)? else {
            return Ok(NormalizeReport::default());
        };
        let key_index = column_index(&snapshot.headers, path, key_column)?;

        let mut report = NormalizeReport {
            malformed: snapshot.malformed,
            ..NormalizeReport::default()
        };
        let mut seen_keys = HashSet::new();
        let mut seen_rows = HashSet::new();
        let mut kept = Vec::with_capacity(snapshot.rows.len());

        for row in snapshot.rows {
            if row.iter().all(|field| field.trim().is_empty()) {
                report.empty += 1;
                continue;
            }

            let key = row[key_index].trim();
            let first = if key.is_empty() {
                seen_rows.insert(row.clone())
            } else {
                seen_keys.insert(key.to_string())
            };

            if first {
                kept.push(row);
            } else {
                report.duplicates += 1;
            }
        }
        report.kept = kept.len();

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        {
            let mut writer = WriterBuilder::new().from_path(&tmp_path)?;
            writer.write_record(&snapshot.headers)?;
            for row in &kept {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp_path, path)?;

        Ok(report)
    }

    /// Deletes a dataset file, returning whether it existed
    pub fn remove(&self, path: &Path) -> StoreResult<bool> {
        let lock = self.file_lock(path);
        let _guard = Self::lock(&lock);

        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Writes the header row unless the file already has content
///
/// A non-empty file whose last row was cut off mid-write gets its line
/// terminated, so the next appended row starts on a line of its own.
/// Caller must hold the file's lock.
fn initialize_locked(path: &Path, headers: &[&str]) -> StoreResult<()> {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
        Err(e) => return Err(e.into()),
    };

    if size > 0 {
        warn_on_header_mismatch(path, headers);
        return terminate_torn_row(path);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(headers)?;
    writer.flush()?;

    tracing::debug!("Initialized {}", path.display());
    Ok(())
}

/// Appends a line break if the file does not end with one
fn terminate_torn_row(path: &Path) -> StoreResult<()> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(());
    }

    tracing::warn!(
        "{} ends in an unterminated row; closing it before appending",
        path.display()
    );
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(b"\n")?;
    Ok(())
}

fn warn_on_header_mismatch(path: &Path, expected: &[&str]) {
    let Ok(mut reader) = ReaderBuilder::new().from_path(path) else {
        return;
    };
    if let Ok(found) = reader.headers() {
        if found.iter().ne(expected.iter().copied()) {
            tracing::warn!(
                "Header of {} does not match the expected columns; appended rows may be misaligned",
                path.display()
            );
        }
    }
}

/// Reads a whole dataset, skipping rows that fail to parse or have the wrong
/// number of fields. Returns `None` if the file does not exist.
fn read_snapshot(path: &Path) -> StoreResult<Option<Snapshot>> {
    let mut reader = match ReaderBuilder::new().flexible(false).from_path(path) {
        Ok(reader) => reader,
        Err(e) => {
            if let csv::ErrorKind::Io(io) = e.kind() {
                if io.kind() == std::io::ErrorKind::NotFound {
                    return Ok(None);
                }
            }
            return Err(e.into());
        }
    };

    let headers: Vec<String> = decode(reader.byte_headers()?);
    let mut snapshot = Snapshot {
        headers,
        ..Snapshot::default()
    };

    let mut record = ByteRecord::new();
    loop {
        match reader.read_byte_record(&mut record) {
            Ok(true) => snapshot.rows.push(decode(&record)),
            Ok(false) => break,
            Err(e) => {
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    return Err(e.into());
                }
                tracing::debug!("Skipping malformed row in {}: {}", path.display(), e);
                snapshot.malformed += 1;
            }
        }
    }

    if snapshot.malformed > 0 {
        tracing::warn!(
            "Skipped {} malformed row(s) in {}",
            snapshot.malformed,
            path.display()
        );
    }

    Ok(Some(snapshot))
}

/// Decodes a raw record, replacing invalid UTF-8 sequences
fn decode(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

fn column_index(headers: &[String], path: &Path, column: &str) -> StoreResult<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| StoreError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}
