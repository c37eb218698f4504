//! Key-addressed persistence over the embedded SQLite database.
//!
//! `Database` owns at most one open connection. It is constructed by the
//! application root and shared with every binding through an `Arc`, so there
//! is no process-global connection state. Callers that race on the first
//! open serialize on the internal lock and all observe the same connection.

use std::error::Error;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, ErrorCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::db;
use crate::domain::collection::{Collection, UnknownCollectionError};

/// A row that can live in a collection. The primary key is always `id`.
pub trait Record: Serialize + DeserializeOwned + Clone {
    fn id(&self) -> &str;
}

pub struct Database {
    path: String,
    conn: Mutex<Option<Connection>>,
    opens: AtomicUsize,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            conn: Mutex::new(None),
            opens: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Startup hook: open eagerly so a bad path surfaces before any command.
    pub fn init(&self) -> Result<(), StorageError> {
        self.connect()
    }

    /// Ensure a connection exists, opening it and creating any missing
    /// collections if absent. A failed open leaves nothing cached.
    pub fn connect(&self) -> Result<(), StorageError> {
        self.with_connection(|_| Ok(()))
    }

    /// Drop the cached connection. The next operation reopens it.
    pub fn close(&self) {
        if self.lock().take().is_some() {
            debug!(path = %self.path, "closed database connection");
        }
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    /// Number of physical opens performed over the lifetime of this manager.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn put<T: Record>(&self, collection: &str, item: &T) -> Result<T, StorageError> {
        let collection = Collection::from_str(collection)?;
        let body = serde_json::to_string(item)?;
        self.with_connection(|conn| {
            let tx = conn.transaction()?;
            db::upsert_row(&tx, collection, item.id(), &body)?;
            tx.commit()?;
            Ok(())
        })?;
        debug!(%collection, id = item.id(), "put row");
        Ok(item.clone())
    }

    pub fn get_all<T: Record>(&self, collection: &str) -> Result<Vec<T>, StorageError> {
        let collection = Collection::from_str(collection)?;
        let bodies = self.with_connection(|conn| Ok(db::list_rows(conn, collection)?))?;
        debug!(%collection, rows = bodies.len(), "read all rows");
        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(StorageError::from))
            .collect()
    }

    /// Not found is `Ok(None)`, never an error.
    pub fn get_by_id<T: Record>(&self, collection: &str, id: &str) -> Result<Option<T>, StorageError> {
        let collection = Collection::from_str(collection)?;
        let body = self.with_connection(|conn| Ok(db::get_row(conn, collection, id)?))?;
        debug!(%collection, id, found = body.is_some(), "read row");
        body.map(|raw| serde_json::from_str(&raw).map_err(StorageError::from))
            .transpose()
    }

    /// Deleting a key that does not exist succeeds.
    pub fn remove(&self, collection: &str, id: &str) -> Result<(), StorageError> {
        let collection = Collection::from_str(collection)?;
        let deleted = self.with_connection(|conn| {
            let tx = conn.transaction()?;
            let deleted = db::delete_row(&tx, collection, id)?;
            tx.commit()?;
            Ok(deleted)
        })?;
        debug!(%collection, id, deleted, "removed row");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open(&self) -> Result<Connection, StorageError> {
        ensure_parent_dir(&self.path)?;
        let conn = db::open_connection(&self.path).map_err(StorageError::Open)?;
        let count = self.opens.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(path = %self.path, opens = count, "opened database connection");
        Ok(conn)
    }

    fn with_connection<R>(
        &self,
        op: impl FnOnce(&mut Connection) -> Result<R, StorageError>,
    ) -> Result<R, StorageError> {
        let mut guard = self.lock();
        let conn = match guard.take() {
            Some(conn) => conn,
            None => self.open()?,
        };
        let conn = guard.insert(conn);
        let result = op(conn);
        if let Err(err) = &result {
            if err.is_connection_failure() {
                debug!(path = %self.path, error = %err, "dropping broken database connection");
                *guard = None;
            }
        }
        result
    }
}

fn ensure_parent_dir(path: &str) -> Result<(), StorageError> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[derive(Debug)]
pub enum StorageError {
    Open(rusqlite::Error),
    Db(rusqlite::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
    UnknownCollection(UnknownCollectionError),
}

impl StorageError {
    fn is_connection_failure(&self) -> bool {
        match self {
            StorageError::Open(_) | StorageError::Io(_) => true,
            StorageError::Db(err) => matches!(
                err.sqlite_error_code(),
                Some(
                    ErrorCode::CannotOpen
                        | ErrorCode::NotADatabase
                        | ErrorCode::DatabaseCorrupt
                        | ErrorCode::SystemIoFailure
                )
            ),
            StorageError::Json(_) | StorageError::UnknownCollection(_) => false,
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Open(err) => write!(f, "failed to open database: {}", err),
            StorageError::Db(err) => write!(f, "database error: {}", err),
            StorageError::Json(err) => write!(f, "row serialization error: {}", err),
            StorageError::Io(err) => write!(f, "I/O error: {}", err),
            StorageError::UnknownCollection(err) => write!(f, "{}", err),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StorageError::Open(err) => Some(err),
            StorageError::Db(err) => Some(err),
            StorageError::Json(err) => Some(err),
            StorageError::Io(err) => Some(err),
            StorageError::UnknownCollection(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        StorageError::Db(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        StorageError::Json(value)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        StorageError::Io(value)
    }
}

impl From<UnknownCollectionError> for StorageError {
    fn from(value: UnknownCollectionError) -> Self {
        StorageError::UnknownCollection(value)
    }
}

#[cfg(test)]
mod tests;
