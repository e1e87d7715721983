//! Database configuration.

use std::time::Duration;

/// Configuration for opening a database.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the database file if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to enforce foreign-key constraints (`PRAGMA foreign_keys`).
    pub foreign_keys: bool,

    /// How long a statement waits on a locked database before failing
    /// (`PRAGMA busy_timeout`).
    pub busy_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            foreign_keys: true,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the database file if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to enforce foreign-key constraints.
    #[must_use]
    pub const fn foreign_keys(mut self, value: bool) -> Self {
        self.foreign_keys = value;
        self
    }

    /// Sets the busy timeout.
    #[must_use]
    pub const fn busy_timeout(mut self, value: Duration) -> Self {
        self.busy_timeout = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.create_if_missing);
        assert!(config.foreign_keys);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .create_if_missing(false)
            .foreign_keys(false)
            .busy_timeout(Duration::from_millis(250));

        assert!(!config.create_if_missing);
        assert!(!config.foreign_keys);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
    }
}
