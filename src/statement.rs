//! SQL statements that mutate `mysql.user`
//!
//! Values are always sent as bound parameters. [`quote_literal`] exists only
//! to render a statement for logs and dry runs.

use crate::grant::Grant;
use std::fmt;

/// Name of the column this tool owns
pub const FINGERPRINT_COLUMN: &str = "nixos_sha256";

const REVOKE_SQL: &str = "DELETE FROM user WHERE User = ? AND Host = ? AND nixos_sha256 = ?";
const GRANT_SQL: &str = "INSERT INTO user (User, Host, Create_priv, Drop_priv, nixos_sha256) \
                         VALUES (?, ?, ?, ?, ?)";

/// What a statement does to its grant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Grant,
    Revoke,
}

/// A parameterized statement: SQL text with `?` placeholders plus values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    intent: Intent,
    sql: &'static str,
    params: Vec<String>,
}

impl Statement {
    /// Delete exactly the row this grant was read from
    ///
    /// Matching on the fingerprint too means a row that was rewritten since
    /// we read it is left alone.
    pub fn revoke(grant: &Grant) -> Self {
        Self {
            intent: Intent::Revoke,
            sql: REVOKE_SQL,
            params: vec![
                grant.user().to_string(),
                grant.host().to_string(),
                grant.fingerprint().to_string(),
            ],
        }
    }

    /// Insert a new row carrying the grant's fingerprint
    pub fn grant(grant: &Grant) -> Self {
        Self {
            intent: Intent::Grant,
            sql: GRANT_SQL,
            params: vec![
                grant.user().to_string(),
                grant.host().to_string(),
                grant.create_priv().as_str().to_string(),
                grant.drop_priv().as_str().to_string(),
                grant.fingerprint().to_string(),
            ],
        }
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn sql(&self) -> &'static str {
        self.sql
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params = self.params.iter();
        for (i, chunk) in self.sql.split('?').enumerate() {
            if i > 0 {
                match params.next() {
                    Some(value) => f.write_str(&quote_literal(value))?,
                    None => f.write_str("?")?,
                }
            }
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

/// Quote a string as a MySQL literal
///
/// Follows `mysql_real_escape_string`: backslash, both quotes, NUL, `\n`,
/// `\r` and Ctrl-Z are escaped.
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}
