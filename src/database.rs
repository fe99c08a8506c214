//! Link store backed by the embedded redb database
//!
//! This module owns the table definitions, database initialization, and the
//! [`LinkStore`] through which every handler reads and writes links.
//!
//! Each operation runs as a single redb transaction on the blocking thread
//! pool. redb admits only one write transaction at a time, so the existence
//! check in [`LinkStore::create`] and the read-update-commit in
//! [`LinkStore::increment_click`] are serialized by the storage layer itself.

use std::sync::Arc;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::config::Config;
use crate::model::Link;
use crate::validate::{is_valid_code, is_valid_url};

/// Main table for storing links
///
/// Key: short code
/// Value: JSON-serialized [`Link`]
///
/// Example:
/// - Key: "aZ3k9Q"
/// - Value: '{"id":"...","code":"aZ3k9Q","targetUrl":"https://example.com",...}'
pub const TABLE_LINKS: TableDefinition<&str, &str> = TableDefinition::new("links_v1");

/// Creation-order index used for newest-first listing
///
/// Key: composite "{created_at_micros:020}:{code}"
/// Value: short code
///
/// The zero-padded timestamp keeps lexicographic order equal to chronological
/// order; the code suffix keeps keys unique when two links share a microsecond.
pub const TABLE_CREATED_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("created_index_v1");

/// Failures reported by the link store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("code already exists: {0}")]
    Conflict(String),

    #[error("link not found: {0}")]
    NotFound(String),

    /// The database could not be opened, read, or written
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be encoded or decoded
    #[error("record codec error: {0}")]
    Codec(String),
}

macro_rules! unavailable_from {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for StoreError {
                fn from(err: $err) -> Self {
                    StoreError::Unavailable(err.to_string())
                }
            }
        )*
    };
}

unavailable_from!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Codec(err.to_string())
    }
}

/// Initializes the embedded database and creates required tables
///
/// Creates or opens the database file at `db_path`, then opens both tables in
/// a write transaction so they exist before the first read.
///
/// # Example
///
/// ```no_run
/// # use shortlink::database::init_db;
/// let db = init_db("data.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    // Create or open the database file
    let db = Database::create(db_path)?;

    // Begin a write transaction to create tables
    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_LINKS)?;
        write_txn.open_table(TABLE_CREATED_INDEX)?;
    }
    // Commit the transaction to persist the table structures
    write_txn.commit()?;

    Ok(db)
}

fn index_key(link: &Link) -> String {
    format!("{:020}:{}", link.created_at.timestamp_micros(), link.code)
}

fn decode(raw: &str) -> Result<Link, StoreError> {
    Ok(serde_json::from_str(raw)?)
}

/// Persistent mapping of code to [`Link`]
#[derive(Clone)]
pub struct LinkStore {
    db: Arc<Database>,
}

impl LinkStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Runs a blocking database operation off the async executor.
    async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Database) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(db.as_ref()))
            .await
            .map_err(|err| StoreError::Unavailable(format!("store task failed: {err}")))?
    }

    /// Checks that the database answers a read transaction.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.run(|db| {
            let read_txn = db.begin_read()?;
            read_txn.open_table(TABLE_LINKS)?;
            Ok(())
        })
        .await
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let code = code.to_string();
        self.run(move |db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(TABLE_LINKS)?;

            // Deserialize the JSON record if the code is present
            let link = match table.get(code.as_str())? {
                Some(raw) => Some(decode(raw.value())?),
                None => None,
            };
            Ok(link)
        })
        .await
    }

    pub async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        let code = code.to_string();
        self.run(move |db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(TABLE_LINKS)?;
            let found = table.get(code.as_str())?.is_some();
            Ok(found)
        })
        .await
    }

    /// Inserts a new link with zero clicks.
    ///
    /// The existence check and the insert share one write transaction, so two
    /// racing creates for the same code cannot both succeed: the loser gets
    /// [`StoreError::Conflict`].
    pub async fn create(&self, code: &str, target_url: &str) -> Result<Link, StoreError> {
        if !is_valid_code(code) {
            return Err(StoreError::Validation(format!("malformed code: {code:?}")));
        }
        if !is_valid_url(target_url) {
            return Err(StoreError::Validation(format!(
                "malformed target URL: {target_url:?}"
            )));
        }

        let code = code.to_string();
        let target_url = target_url.to_string();
        self.run(move |db| {
            let now = Utc::now();
            let link = Link {
                id: Uuid::new_v4().to_string(),
                code: code.clone(),
                target_url,
                clicks: 0,
                created_at: now,
                last_clicked: None,
                updated_at: now,
            };
            let record_json = serde_json::to_string(&link)?;

            // Begin a write transaction
            let write_txn = db.begin_write()?;
            {
                let mut links = write_txn.open_table(TABLE_LINKS)?;

                // Check if the code is already taken
                if links.get(code.as_str())?.is_some() {
                    return Err(StoreError::Conflict(code));
                }
                links.insert(code.as_str(), record_json.as_str())?;

                // Record creation order for listing
                let mut index = write_txn.open_table(TABLE_CREATED_INDEX)?;
                index.insert(index_key(&link).as_str(), code.as_str())?;
            }

            // Commit the transaction to persist the data
            write_txn.commit()?;

            Ok(link)
        })
        .await
    }

    /// Records one click: `clicks += 1`, `last_clicked = updated_at = now`.
    ///
    /// Read, update and commit happen inside one write transaction, so
    /// concurrent increments for the same code never lose updates.
    pub async fn increment_click(&self, code: &str) -> Result<Link, StoreError> {
        let code = code.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            let link = {
                let mut links = write_txn.open_table(TABLE_LINKS)?;
                let raw = links
                    .get(code.as_str())?
                    .map(|guard| guard.value().to_string());
                let Some(raw) = raw else {
                    return Err(StoreError::NotFound(code));
                };

                // Bump the counter and both timestamps together
                let mut link = decode(&raw)?;
                let now = Utc::now();
                link.clicks += 1;
                link.last_clicked = Some(now);
                link.updated_at = now;

                // Overwrite the record in place
                let record_json = serde_json::to_string(&link)?;
                links.insert(code.as_str(), record_json.as_str())?;
                link
            };

            // Nothing is visible to readers until this commit
            write_txn.commit()?;

            Ok(link)
        })
        .await
    }

    /// Returns every link, newest first.
    pub async fn list(&self) -> Result<Vec<Link>, StoreError> {
        self.run(|db| {
            let read_txn = db.begin_read()?;
            let index = read_txn.open_table(TABLE_CREATED_INDEX)?;
            let links = read_txn.open_table(TABLE_LINKS)?;

            // Walk the index backwards: newest keys sort last
            let mut results = Vec::new();
            for entry in index.iter()?.rev() {
                let (key, code) = entry?;
                match links.get(code.value())? {
                    Some(raw) => results.push(decode(raw.value())?),
                    None => warn!(index_key = key.value(), "index entry without link record"),
                }
            }
            Ok(results)
        })
        .await
    }

    pub async fn delete(&self, code: &str) -> Result<(), StoreError> {
        let code = code.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            {
                let mut links = write_txn.open_table(TABLE_LINKS)?;
                let removed = links
                    .remove(code.as_str())?
                    .map(|guard| guard.value().to_string());
                let Some(raw) = removed else {
                    return Err(StoreError::NotFound(code));
                };

                // Delete from the creation index as well
                let link = decode(&raw)?;
                let mut index = write_txn.open_table(TABLE_CREATED_INDEX)?;
                index.remove(index_key(&link).as_str())?;
            }

            // Commit the transaction to persist the deletion
            write_txn.commit()?;

            Ok(())
        })
        .await
    }
}

/// Application state shared across all request handlers
///
/// Built once at startup and cloned into each handler by Axum.
#[derive(Clone)]
pub struct AppState {
    pub store: LinkStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            store: LinkStore::new(Arc::new(db)),
            config: Arc::new(config),
        }
    }
}
