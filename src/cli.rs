use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_USERNAME;

#[derive(Parser, Debug)]
#[command(name = "nixos-mysql-permissions")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(
    about = "Converge MySQL user privileges to a declared state",
    long_about = "Reads the desired privileges as JSON on stdin and converges the \
                  mysql.user table to match. Only rows previously written by this \
                  tool are ever changed."
)]
// -h is taken by --host
#[command(disable_help_flag = true)]
pub struct Cli {
    /// MySQL user to connect as
    #[arg(short = 'u', long, default_value = DEFAULT_USERNAME)]
    pub user_name: String,

    /// MySQL password
    #[arg(short = 'p', long, env = "MYSQL_PWD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// MySQL host (disables the socket connection)
    #[arg(short = 'h', long)]
    pub host: Option<String>,

    /// MySQL server socket [default: /var/run/mysqld/mysqld.sock]
    #[arg(short = 's', long)]
    pub socket: Option<PathBuf>,

    /// Show what would change without touching the database
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    #[allow(dead_code)]
    pub help: Option<bool>,
}
