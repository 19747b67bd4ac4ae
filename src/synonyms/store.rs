/*!
 * Synonym cache persistence.
 *
 * Resolutions are written as an append-only log and read back in full when a
 * cache is constructed. Three backends share the `SynonymStore` trait:
 * - `JsonLogStore`: one JSON object per line in a plain text file
 * - `SqliteStore`: a single SQLite table, last writer wins per key
 * - `MemoryStore`: nothing leaves the process
 */

use chrono::Utc;
use log::{debug, info, warn};
use parking_lot::Mutex;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::errors::StoreError;

/// One persisted resolution. `candidates == None` records that no synonyms are known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymRecord {
    pub word: String,
    pub tag: String,
    pub candidates: Option<Vec<String>>,
}

impl SynonymRecord {
    pub fn new(word: impl Into<String>, tag: impl Into<String>, candidates: Option<Vec<String>>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
            candidates,
        }
    }
}

/// Append-only persistence boundary of the synonym cache
pub trait SynonymStore: Send + Sync {
    /// Read every record, oldest first
    fn load(&self) -> Result<Vec<SynonymRecord>, StoreError>;

    /// Append one record
    fn append(&self, record: &SynonymRecord) -> Result<(), StoreError>;

    /// Human readable location, for logs
    fn describe(&self) -> String;
}

/// JSON lines log file
#[derive(Debug)]
pub struct JsonLogStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLogStore {
    /// Use the log at `path`, creating parent directories as needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SynonymStore for JsonLogStore {
    fn load(&self) -> Result<Vec<SynonymRecord>, StoreError> {
        if !self.path.exists() {
            debug!("No synonym log at {:?} yet", self.path);
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;
        let last = lines.len();
        let mut records = Vec::with_capacity(last);

        for (number, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SynonymRecord>(line) {
                Ok(record) => records.push(record),
                // A torn final line is what an interrupted append leaves behind
                Err(e) if number + 1 == last => {
                    warn!("Ignoring incomplete last line of {:?}: {}", self.path, e);
                }
                Err(e) => {
                    return Err(StoreError::Encoding {
                        line: number + 1,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!("Loaded {} synonym records from {:?}", records.len(), self.path);
        Ok(records)
    }

    fn append(&self, record: &SynonymRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record).map_err(|e| StoreError::Encoding {
            line: 0,
            message: e.to_string(),
        })?;
        line.push('\n');

        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json log {:?}", self.path)
    }
}

/// SQLite table keyed by (word, tag)
pub struct SqliteStore {
    db_path: PathBuf,
    connection: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db_path = path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Opening synonym database at: {:?}", db_path);
        let conn = Connection::open(&db_path)?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Mutex::new(conn),
        })
    }

    /// In-memory database (for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             CREATE TABLE IF NOT EXISTS synonyms (
                 word TEXT NOT NULL,
                 tag TEXT NOT NULL,
                 candidates TEXT,
                 recorded_at TEXT NOT NULL,
                 PRIMARY KEY (word, tag)
             );",
        )?;
        Ok(())
    }
}

impl SynonymStore for SqliteStore {
    fn load(&self) -> Result<Vec<SynonymRecord>, StoreError> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare("SELECT word, tag, candidates FROM synonyms ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for (index, row) in rows.enumerate() {
            let (word, tag, raw) = row?;
            let candidates = match raw {
                Some(raw) => Some(serde_json::from_str(&raw).map_err(|e| StoreError::Encoding {
                    line: index + 1,
                    message: e.to_string(),
                })?),
                None => None,
            };
            records.push(SynonymRecord::new(word, tag, candidates));
        }

        info!("Loaded {} synonym records from {:?}", records.len(), self.db_path);
        Ok(records)
    }

    fn append(&self, record: &SynonymRecord) -> Result<(), StoreError> {
        let candidates = match &record.candidates {
            Some(list) => Some(serde_json::to_string(list).map_err(|e| StoreError::Encoding {
                line: 0,
                message: e.to_string(),
            })?),
            None => None,
        };

        let conn = self.connection.lock();
        conn.execute(
            "INSERT OR REPLACE INTO synonyms (word, tag, candidates, recorded_at) VALUES (?1, ?2, ?3, ?4)",
            params![record.word, record.tag, candidates, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite {:?}", self.db_path)
    }
}

/// Store that keeps records in memory only
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SynonymRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store
    pub fn with_records(records: Vec<SynonymRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl SynonymStore for MemoryStore {
    fn load(&self) -> Result<Vec<SynonymRecord>, StoreError> {
        Ok(self.records.lock().clone())
    }

    fn append(&self, record: &SynonymRecord) -> Result<(), StoreError> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
