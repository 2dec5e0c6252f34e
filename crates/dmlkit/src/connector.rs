//! Connection contract and configuration.
//!
//! A [`Connector`] is the only part of dmlkit that talks to a database. The
//! session drives it; anything that can open a connection, run a statement and
//! hand back column-major text results can sit behind it.

use crate::error::{DbResult, ErrorCode, QueryError};
use crate::table::Columnar;
use std::time::Duration;

/// Database connection driven by a [`Session`](crate::Session).
///
/// Implementations keep at most one open connection. `open` on an open
/// connection and `close` on a closed one are no-ops.
pub trait Connector: Send {
    /// Whether a usable connection is currently held.
    fn is_connected(&self) -> bool;

    /// Open the connection.
    ///
    /// Failures are [`QueryError::Connection`] with code
    /// [`ErrorCode::ServerUnreachable`], [`ErrorCode::BadCredentials`] or
    /// [`ErrorCode::Unclassified`].
    fn open(&mut self) -> impl std::future::Future<Output = DbResult<()>> + Send;

    /// Close the connection.
    fn close(&mut self) -> impl std::future::Future<Output = DbResult<()>> + Send;

    /// Run a statement and return the number of affected rows.
    fn execute(&mut self, sql: &str) -> impl std::future::Future<Output = DbResult<u64>> + Send;

    /// Run a query and return its result column by column, headers first.
    ///
    /// SQL NULL cells are reported as the [`NULL`](crate::NULL) sentinel.
    fn query(&mut self, sql: &str)
    -> impl std::future::Future<Output = DbResult<Columnar>> + Send;
}

/// Default user name.
pub const DEFAULT_USER: &str = "root";
/// Default server host.
pub const DEFAULT_SERVER: &str = "localhost";

/// Connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Database name.
    pub database: String,
    /// User name.
    pub user: String,
    /// Password (may be empty).
    pub password: String,
    /// Server host name or address.
    pub server: String,
    /// Server port. `None` uses the driver default.
    pub port: Option<u16>,
    /// Timeout for establishing the connection. `None` waits for the OS.
    pub connect_timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// Settings for `database` with user `root`, an empty password, on `localhost`.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            server: DEFAULT_SERVER.to_string(),
            port: None,
            connect_timeout: None,
        }
    }

    /// Set the user name.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the server host.
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Set the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Render as `SERVER=<s>;DATABASE=<d>;UID=<u>;PASSWORD=<p>;`.
    ///
    /// `PORT=<n>;` is appended when a port is set.
    pub fn connection_string(&self) -> String {
        let mut s = format!(
            "SERVER={};DATABASE={};UID={};PASSWORD={};",
            self.server, self.database, self.user, self.password
        );
        if let Some(port) = self.port {
            s.push_str(&format!("PORT={port};"));
        }
        s
    }

    /// Parse a string produced by [`ConnectionConfig::connection_string`].
    ///
    /// Keys are case-insensitive; `DATABASE` is required, the rest fall back
    /// to the defaults. Values cannot contain `;`.
    pub fn parse(s: &str) -> DbResult<Self> {
        let mut database = None;
        let mut config = Self::new(String::new());

        for part in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                invalid_connection_string(format!("expected KEY=VALUE, got '{part}'"))
            })?;
            let value = value.trim().to_string();
            match key.trim().to_ascii_uppercase().as_str() {
                "SERVER" => config.server = value,
                "DATABASE" => database = Some(value),
                "UID" => config.user = value,
                "PASSWORD" => config.password = value,
                "PORT" => {
                    let port = value.parse::<u16>().map_err(|e| {
                        invalid_connection_string(format!("invalid PORT '{value}': {e}"))
                    })?;
                    config.port = Some(port);
                }
                other => {
                    return Err(invalid_connection_string(format!("unknown key '{other}'")));
                }
            }
        }

        config.database = database
            .filter(|d| !d.is_empty())
            .ok_or_else(|| invalid_connection_string("DATABASE is required"))?;
        Ok(config)
    }

    /// Read settings from the environment.
    ///
    /// | variable          | default     |
    /// |-------------------|-------------|
    /// | `DMLKIT_DATABASE` | (required)  |
    /// | `DMLKIT_USER`     | `root`      |
    /// | `DMLKIT_PASSWORD` | empty       |
    /// | `DMLKIT_SERVER`   | `localhost` |
    /// | `DMLKIT_PORT`     | driver      |
    pub fn from_env() -> DbResult<Self> {
        let database = std::env::var("DMLKIT_DATABASE")
            .map_err(|_| invalid_connection_string("DMLKIT_DATABASE must be set"))?;
        let mut config = Self::new(database);

        if let Ok(user) = std::env::var("DMLKIT_USER") {
            config.user = user;
        }
        if let Ok(password) = std::env::var("DMLKIT_PASSWORD") {
            config.password = password;
        }
        if let Ok(server) = std::env::var("DMLKIT_SERVER") {
            config.server = server;
        }
        if let Ok(port) = std::env::var("DMLKIT_PORT") {
            let port = port.parse::<u16>().map_err(|e| {
                invalid_connection_string(format!("invalid DMLKIT_PORT '{port}': {e}"))
            })?;
            config.port = Some(port);
        }
        Ok(config)
    }

    /// Driver configuration for `tokio-postgres`.
    pub fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&self.server)
            .dbname(&self.database)
            .user(&self.user)
            .application_name("dmlkit");
        if !self.password.is_empty() {
            pg.password(&self.password);
        }
        if let Some(port) = self.port {
            pg.port(port);
        }
        if let Some(timeout) = self.connect_timeout {
            pg.connect_timeout(timeout);
        }
        pg
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

fn invalid_connection_string(message: impl Into<String>) -> QueryError {
    QueryError::argument(ErrorCode::InvalidConnectionString, message)
}

/// Shortcut for [`ConnectionConfig::connection_string`].
pub fn connection_string(database: &str, user: &str, password: &str, server: &str) -> String {
    ConnectionConfig::new(database)
        .user(user)
        .password(password)
        .server(server)
        .connection_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ConnectionConfig::new("test");
        assert_eq!(cfg.user, "root");
        assert_eq!(cfg.password, "");
        assert_eq!(cfg.server, "localhost");
        assert_eq!(
            cfg.connection_string(),
            "SERVER=localhost;DATABASE=test;UID=root;PASSWORD=;"
        );
    }

    #[test]
    fn connection_string_shortcut() {
        assert_eq!(
            connection_string("test", "Manager", "12345678", "db.local"),
            "SERVER=db.local;DATABASE=test;UID=Manager;PASSWORD=12345678;"
        );
    }

    #[test]
    fn parse_round_trip() {
        let cfg = ConnectionConfig::new("test")
            .user("Manager")
            .password("12345678")
            .server("10.0.0.5")
            .port(5433);
        assert_eq!(ConnectionConfig::parse(&cfg.connection_string()).unwrap(), cfg);
    }

    #[test]
    fn parse_is_case_insensitive_and_fills_defaults() {
        let cfg = ConnectionConfig::parse("database=shop; uid = app").unwrap();
        assert_eq!(cfg.database, "shop");
        assert_eq!(cfg.user, "app");
        assert_eq!(cfg.server, "localhost");
        assert_eq!(cfg.password, "");
    }

    #[test]
    fn parse_errors() {
        assert_eq!(ConnectionConfig::parse("SERVER=x;").unwrap_err().code(), 13);
        assert_eq!(ConnectionConfig::parse("DATABASE=x;FOO=1").unwrap_err().code(), 13);
        assert_eq!(ConnectionConfig::parse("DATABASE=x;PORT=abc").unwrap_err().code(), 13);
        assert_eq!(ConnectionConfig::parse("DATABASE").unwrap_err().code(), 13);
    }

    #[test]
    fn pg_config_carries_settings() {
        let pg = ConnectionConfig::new("test")
            .user("Manager")
            .password("secret")
            .port(5433)
            .to_pg_config();
        assert_eq!(pg.get_dbname(), Some("test"));
        assert_eq!(pg.get_user(), Some("Manager"));
        assert_eq!(pg.get_password(), Some(&b"secret"[..]));
        assert_eq!(pg.get_ports(), &[5433]);
    }
}
