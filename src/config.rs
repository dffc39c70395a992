use crate::cli::Cli;
use std::fmt;
use std::path::PathBuf;

/// Account used when no `--user-name` is given
pub const DEFAULT_USERNAME: &str = "root";

/// Server socket used when no `--host` is given
pub const DEFAULT_SOCKET: &str = "/var/run/mysqld/mysqld.sock";

/// The grant tables live in this schema
pub const GRANT_DATABASE: &str = "mysql";

/// Where and how to connect to MySQL
///
/// Built once from the command line and never changed afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub host: Option<String>,
    pub socket: Option<PathBuf>,
    pub database: &'static str,
}

impl Credentials {
    /// Resolve credentials from parsed arguments
    ///
    /// A host always wins over a socket.
    pub fn from_cli(cli: &Cli) -> Self {
        let socket = match &cli.host {
            Some(_) => None,
            None => Some(
                cli.socket
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET)),
            ),
        };

        Self {
            username: cli.user_name.clone(),
            password: cli.password.clone(),
            host: cli.host.clone(),
            socket,
            database: GRANT_DATABASE,
        }
    }

    /// Human-readable connection target, for messages
    pub fn target(&self) -> String {
        match (&self.host, &self.socket) {
            (Some(host), _) => format!("{}@{}", self.username, host),
            (None, Some(socket)) => format!("{}@{}", self.username, socket.display()),
            (None, None) => format!("{}@localhost", self.username),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: String::new(),
            host: None,
            socket: Some(PathBuf::from(DEFAULT_SOCKET)),
            database: GRANT_DATABASE,
        }
    }
}

// Keep the password out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("socket", &self.socket)
            .field("database", &self.database)
            .finish()
    }
}
