use std::env;

/// Database configuration.
///
/// Reads from `GOALSPLIT_DATABASE_URL`, then `DATABASE_URL`, falling back to
/// `postgresql://localhost:5432/goalsplit` when neither is set.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full PostgreSQL connection URL.
    pub database_url: String,
}

impl DbConfig {
    /// The default connection URL used when no environment variable is set.
    pub const DEFAULT_URL: &str = "postgresql://localhost:5432/goalsplit";

    /// Environment variables consulted, in priority order.
    pub const ENV_VARS: [&str; 2] = ["GOALSPLIT_DATABASE_URL", "DATABASE_URL"];

    /// Build a config from the environment.
    pub fn from_env() -> Self {
        let database_url = Self::url_from_env().unwrap_or_else(|| Self::DEFAULT_URL.to_owned());
        Self { database_url }
    }

    /// The first non-empty database URL found in [`Self::ENV_VARS`].
    pub fn url_from_env() -> Option<String> {
        Self::ENV_VARS
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|url| !url.trim().is_empty())
    }

    /// Build a config from an explicit URL (useful for tests and CLI flags).
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Extract the database name from the URL.
    ///
    /// Query parameters (`?sslmode=...`) are ignored. Returns `None` if the
    /// URL has no path component.
    pub fn database_name(&self) -> Option<&str> {
        let without_query = self
            .database_url
            .split('?')
            .next()
            .unwrap_or(&self.database_url);
        without_query
            .rsplit_once('/')
            .map(|(_, name)| name)
            .filter(|s| !s.is_empty() && !s.contains(':'))
    }

    /// Return a URL pointing at the `postgres` maintenance database on the
    /// same host. Used to issue `CREATE DATABASE` when the target DB does not
    /// yet exist.
    pub fn maintenance_url(&self) -> String {
        let (base, query) = match self.database_url.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (self.database_url.as_str(), None),
        };
        let mut url = match base.rfind('/') {
            Some(pos) => format!("{}/postgres", &base[..pos]),
            None => base.to_owned(),
        };
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
