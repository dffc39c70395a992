//! Access to the MySQL grant tables
//!
//! Only rows with a non-null fingerprint column are ever read, and every
//! write names a fingerprint. Rows this tool did not create are invisible to
//! it.

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::grant::{Grant, PrivFlag};
use crate::statement::{FINGERPRINT_COLUMN, Statement};
use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder};

/// Tables that get the fingerprint column
pub const MANAGED_TABLES: [&str; 2] = ["user", "db"];

const SELECT_MANAGED_GRANTS: &str = "SELECT User, Host, Create_priv, Drop_priv, nixos_sha256 \
                                     FROM user WHERE nixos_sha256 IS NOT NULL";

const COLUMN_EXISTS: &str = "SELECT COLUMN_NAME FROM information_schema.COLUMNS \
                             WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? AND COLUMN_NAME = ?";

/// Storage backend for grants
pub trait GrantStore {
    /// Find tables missing the fingerprint column and add it to them
    ///
    /// Returns the tables that lacked the column. With `dry_run` nothing is
    /// altered.
    fn ensure_schema(&mut self, dry_run: bool) -> Result<Vec<&'static str>>;

    /// Read every grant this tool manages
    fn fetch_actual_grants(&mut self) -> Result<Vec<Grant>>;

    /// Run one mutating statement
    fn execute(&mut self, statement: &Statement) -> Result<()>;

    /// Make direct grant-table edits visible to the server
    fn flush_privileges(&mut self) -> Result<()>;
}

/// A blocking connection to the `mysql` schema
pub struct MysqlStore {
    conn: Conn,
}

impl MysqlStore {
    pub fn connect(credentials: &Credentials) -> Result<Self> {
        log::debug!("Connecting with {credentials:?}");

        let opts = OptsBuilder::new()
            .user(Some(credentials.username.as_str()))
            .pass(Some(credentials.password.as_str()))
            .db_name(Some(credentials.database))
            .ip_or_hostname(credentials.host.as_deref())
            .socket(
                credentials
                    .socket
                    .as_ref()
                    .map(|path| path.to_string_lossy().into_owned()),
            );

        let conn = Conn::new(opts).map_err(|source| Error::Connection {
            target: credentials.target(),
            source,
        })?;

        Ok(Self { conn })
    }
}

impl GrantStore for MysqlStore {
    fn ensure_schema(&mut self, dry_run: bool) -> Result<Vec<&'static str>> {
        let mut missing = Vec::new();

        for table in MANAGED_TABLES {
            let existing: Option<String> = self
                .conn
                .exec_first(COLUMN_EXISTS, (table, FINGERPRINT_COLUMN))
                .map_err(|source| Error::SchemaMigration { table, source })?;

            if existing.is_some() {
                log::debug!("Table '{table}' already has '{FINGERPRINT_COLUMN}'");
                continue;
            }

            missing.push(table);
            if dry_run {
                continue;
            }

            // Table names come from MANAGED_TABLES, never from input
            self.conn
                .query_drop(format!(
                    "ALTER TABLE {table} ADD COLUMN {FINGERPRINT_COLUMN} CHAR(64)"
                ))
                .map_err(|source| Error::SchemaMigration { table, source })?;
        }

        Ok(missing)
    }

    fn fetch_actual_grants(&mut self) -> Result<Vec<Grant>> {
        let rows: Vec<(String, String, String, String, String)> =
            self.conn.query(SELECT_MANAGED_GRANTS)?;
        log::debug!("Found {} managed rows in user table", rows.len());

        rows.into_iter()
            .map(|(user, host, create, drop, fingerprint)| -> Result<Grant> {
                Ok(Grant::new(
                    user,
                    host,
                    PrivFlag::from_column("Create_priv", &create)?,
                    PrivFlag::from_column("Drop_priv", &drop)?,
                    Some(fingerprint),
                ))
            })
            .collect()
    }

    fn execute(&mut self, statement: &Statement) -> Result<()> {
        log::debug!("Executing {:?}: {statement}", statement.intent());
        self.conn
            .exec_drop(statement.sql(), statement.params().to_vec())?;
        Ok(())
    }

    fn flush_privileges(&mut self) -> Result<()> {
        log::debug!("Flushing privileges");
        self.conn.query_drop("FLUSH PRIVILEGES")?;
        Ok(())
    }
}
