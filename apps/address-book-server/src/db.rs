use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use runtime::DatabaseConfig;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, SqlxSqliteConnector};
use url::Url;

use api_ingress::HealthCheck;

pub const MEMORY_DSN: &str = "sqlite::memory:";

const DEFAULT_MAX_CONNS: u32 = 10;
const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5000;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

/// Detect DB backend from the DSN scheme.
pub fn detect_backend(dsn: &str) -> Result<Backend> {
    let raw = dsn.trim();
    if raw.is_empty() {
        bail!("Database URL not configured");
    }
    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{raw}': {e}"))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok(Backend::Sqlite),
        "postgres" | "postgresql" => Ok(Backend::Postgres),
        other => bail!("Unsupported database type: {other}"),
    }
}

fn is_memory(dsn: &str) -> bool {
    dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:")
}

/// Rewrite a sqlite DSN so that a relative file path lives under `base_dir`.
/// Forward slashes are used on every platform.
pub fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if is_memory(dsn) {
        return Ok(MEMORY_DSN.to_owned());
    }
    let rest = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {dsn})"))?;

    let (path_part, query) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    if path_part.is_empty() {
        bail!("Empty SQLite path in DSN");
    }

    let mut path = PathBuf::from(path_part);
    if path.is_relative() {
        path = base_dir.join(path);
    }
    if create_dirs {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }

    let mut out = format!("sqlite://{}", path.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// DSN the server actually connects to. `mock` swaps in an in-memory SQLite.
pub fn resolve_dsn(cfg: &DatabaseConfig, mock: bool, base_dir: &Path) -> Result<String> {
    if mock {
        return Ok(MEMORY_DSN.to_owned());
    }
    let dsn = cfg.url.trim();
    match detect_backend(dsn)? {
        Backend::Sqlite => absolutize_sqlite_dsn(dsn, base_dir, true),
        Backend::Postgres => Ok(dsn.to_owned()),
    }
}

pub async fn connect(cfg: &DatabaseConfig, dsn: &str) -> Result<DatabaseConnection> {
    let max_conns = cfg.max_conns.unwrap_or(DEFAULT_MAX_CONNS);

    match detect_backend(dsn)? {
        Backend::Sqlite => {
            let busy_timeout = cfg.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS);
            let opts = SqliteConnectOptions::from_str(dsn)
                .with_context(|| format!("Invalid SQLite DSN '{dsn}'"))?
                .create_if_missing(true)
                .busy_timeout(Duration::from_millis(u64::from(busy_timeout)));

            let pool_opts = SqlitePoolOptions::new().acquire_timeout(ACQUIRE_TIMEOUT);
            // each in-memory connection is a separate database: pin exactly one
            let pool_opts = if is_memory(dsn) {
                pool_opts
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
            } else {
                pool_opts.max_connections(max_conns)
            };

            tracing::info!("Connecting to database: {}", dsn);
            let pool = pool_opts
                .connect_with(opts)
                .await
                .context("Failed to open SQLite database")?;
            Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
        }
        Backend::Postgres => {
            let mut opts = ConnectOptions::new(dsn.to_owned());
            opts.max_connections(max_conns)
                .acquire_timeout(ACQUIRE_TIMEOUT)
                .sqlx_logging(false);

            tracing::info!("Connecting to PostgreSQL");
            Database::connect(opts)
                .await
                .context("Failed to connect to PostgreSQL")
        }
    }
}

/// `/api/healthchecker` probe: one round trip to the database.
pub struct DbHealthCheck {
    db: DatabaseConnection,
}

impl DbHealthCheck {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HealthCheck for DbHealthCheck {
    async fn check(&self) -> Result<()> {
        self.db.ping().await.context("Database ping failed")
    }
}
