//! Global user grants and their content fingerprints
//!
//! A grant's identity is its fingerprint, nothing else. Freshly derived
//! grants hash their fields; grants read back from MySQL keep whatever
//! fingerprint was stored with the row, so the table stays the record of
//! what this tool last applied.

use crate::error::{Error, Result};
use crate::input::DesiredUserState;
use declarative::Resource;
use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A `Y`/`N` privilege column value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivFlag {
    Yes,
    No,
}

impl PrivFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Y",
            Self::No => "N",
        }
    }

    /// Parse a value read from a `*_priv` column
    pub fn from_column(column: &'static str, value: &str) -> Result<Self> {
        match value {
            "Y" => Ok(Self::Yes),
            "N" => Ok(Self::No),
            other => Err(Error::UnexpectedValue {
                column,
                value: other.to_string(),
            }),
        }
    }
}

impl From<bool> for PrivFlag {
    fn from(granted: bool) -> Self {
        if granted { Self::Yes } else { Self::No }
    }
}

impl fmt::Display for PrivFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `mysql.user` as far as this tool is concerned
#[derive(Debug, Clone)]
pub struct Grant {
    user: String,
    host: String,
    create_priv: PrivFlag,
    drop_priv: PrivFlag,
    fingerprint: String,
}

impl Grant {
    /// Build a grant; a stored fingerprint is taken as-is
    pub fn new(
        user: impl Into<String>,
        host: impl Into<String>,
        create_priv: PrivFlag,
        drop_priv: PrivFlag,
        stored_fingerprint: Option<String>,
    ) -> Self {
        let user = user.into();
        let host = host.into();
        let fingerprint = stored_fingerprint
            .unwrap_or_else(|| fingerprint(&user, &host, create_priv, drop_priv));

        Self {
            user,
            host,
            create_priv,
            drop_priv,
            fingerprint,
        }
    }

    /// Derive the grant a declared user should have
    pub fn from_desired(state: &DesiredUserState) -> Self {
        Self::new(
            state.user.as_str(),
            state.host.as_deref().unwrap_or_default(),
            state.has_global("create").into(),
            state.has_global("drop").into(),
            None,
        )
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn create_priv(&self) -> PrivFlag {
        self.create_priv
    }

    pub fn drop_priv(&self) -> PrivFlag {
        self.drop_priv
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// SHA-256 over the grant fields, hex encoded
///
/// Each field is length-prefixed so `("ab", "c")` and `("a", "bc")`
/// hash differently.
pub fn fingerprint(user: &str, host: &str, create_priv: PrivFlag, drop_priv: PrivFlag) -> String {
    let mut hasher = Sha256::new();
    for field in [user, host, create_priv.as_str(), drop_priv.as_str()] {
        hasher.update((field.len() as u64).to_be_bytes());
        hasher.update(field.as_bytes());
    }
    hex::encode(hasher.finalize())
}

impl PartialEq for Grant {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for Grant {}

impl Hash for Grant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint.hash(state);
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}'@'{}' user permission (create={}, drop={})",
            self.user, self.host, self.create_priv, self.drop_priv
        )
    }
}

impl Resource for Grant {
    fn id(&self) -> &str {
        &self.fingerprint
    }

    fn description(&self) -> String {
        self.to_string()
    }
}
