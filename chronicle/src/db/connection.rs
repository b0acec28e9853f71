use libsql::{Builder, Connection};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

const REMOTE_SCHEMES: [&str; 3] = ["libsql://", "https://", "http://"];

/// Where the record store lives, as read from `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Location {
    /// Remote database, every query goes over the network.
    Remote { url: String, token: String },
    /// Local file kept in sync with a remote primary.
    Replica {
        path: String,
        url: String,
        token: String,
    },
    Memory,
    File(String),
}

impl Location {
    pub(crate) fn from_config(config: &DatabaseConfig) -> Self {
        let url = config.url.trim();
        if REMOTE_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
            let token = config.auth_token.clone().unwrap_or_default();
            return match &config.local_path {
                Some(path) => Self::Replica {
                    path: path.clone(),
                    url: url.to_string(),
                    token,
                },
                None => Self::Remote {
                    url: url.to_string(),
                    token,
                },
            };
        }

        match url.strip_prefix("file:").unwrap_or(url) {
            ":memory:" => Self::Memory,
            path => Self::File(path.to_string()),
        }
    }

    fn is_replica(&self) -> bool {
        matches!(self, Self::Replica { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Remote { .. } => "remote",
            Self::Replica { .. } => "replica",
            Self::Memory => "memory",
            Self::File(_) => "file",
        }
    }

    async fn open(&self) -> Result<libsql::Database> {
        let db = match self {
            Self::Remote { url, token } => {
                Builder::new_remote(url.clone(), token.clone()).build().await?
            }
            Self::Replica { path, url, token } => {
                Builder::new_remote_replica(path, url.clone(), token.clone())
                    .build()
                    .await?
            }
            Self::Memory => Builder::new_local(":memory:").build().await?,
            Self::File(path) => Builder::new_local(path).build().await?,
        };
        Ok(db)
    }
}

/// Connection pragmas applied once at open. Unknown values fall back to the
/// defaults rather than reaching SQLite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pragmas {
    pub busy_timeout_ms: u64,
    pub journal_mode: &'static str,
    pub synchronous: &'static str,
}

impl Default for Pragmas {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5000,
            journal_mode: "WAL",
            synchronous: "NORMAL",
        }
    }
}

impl Pragmas {
    fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            busy_timeout_ms: lookup("DATABASE_BUSY_TIMEOUT_MS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.busy_timeout_ms),
            journal_mode: lookup("DATABASE_JOURNAL_MODE")
                .and_then(|v| journal_mode(&v))
                .unwrap_or(defaults.journal_mode),
            synchronous: lookup("DATABASE_SYNCHRONOUS")
                .and_then(|v| synchronous(&v))
                .unwrap_or(defaults.synchronous),
        }
    }

    fn statements(&self) -> [(&'static str, String); 3] {
        [
            ("busy_timeout", self.busy_timeout_ms.to_string()),
            ("journal_mode", self.journal_mode.to_string()),
            ("synchronous", self.synchronous.to_string()),
        ]
    }

    /// Failures are logged and skipped; remote databases reject most of these.
    async fn apply(&self, conn: &Connection) {
        for (pragma, value) in self.statements() {
            if let Err(error) = conn.execute_batch(&format!("PRAGMA {pragma} = {value}")).await {
                tracing::warn!(pragma, value = %value, error = %error, "Failed to set SQLite pragma");
            }
        }
    }
}

fn journal_mode(value: &str) -> Option<&'static str> {
    const MODES: [&str; 6] = ["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];
    let value = value.trim().to_uppercase();
    MODES.into_iter().find(|mode| *mode == value)
}

fn synchronous(value: &str) -> Option<&'static str> {
    const LEVELS: [&str; 4] = ["OFF", "NORMAL", "FULL", "EXTRA"];
    let value = value.trim().to_uppercase();
    LEVELS.into_iter().find(|level| *level == value)
}

/// Shared handle to the record store; clones reuse the same database.
#[derive(Clone)]
pub struct Database {
    db: Arc<libsql::Database>,
    dimensions: usize,
    replica: bool,
}

impl Database {
    /// Open the database and create tables sized for `dimensions`-wide embeddings.
    pub async fn new(config: &DatabaseConfig, dimensions: usize) -> Result<Self> {
        let location = Location::from_config(config);
        let pragmas = Pragmas::from_env();

        let database = Self {
            db: Arc::new(location.open().await?),
            dimensions,
            replica: location.is_replica(),
        };

        let conn = database.connect()?;
        pragmas.apply(&conn).await;
        schema::init_schema(&conn, dimensions).await?;

        tracing::debug!(
            location = location.label(),
            dimensions,
            journal_mode = pragmas.journal_mode,
            "Opened record store"
        );
        Ok(database)
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(self.db.connect()?)
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Pull from the remote primary. A no-op unless this is an embedded replica.
    pub async fn sync(&self) -> Result<()> {
        if !self.replica {
            return Ok(());
        }
        let replicated = self.db.sync().await?;
        tracing::info!(replicated = ?replicated, "Database synced");
        Ok(())
    }
}
