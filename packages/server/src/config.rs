use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

/// Default delay between two poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Property read as the task status (a select property).
pub const DEFAULT_STATUS_PROPERTY: &str = "Date";

/// Property read as the task title.
pub const DEFAULT_TITLE_PROPERTY: &str = "Name";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub notion_key: String,
    pub notion_base_url: Option<String>,
    pub port: u16,
    pub watch: WatchConfig,
}

/// What the poller watches and how often.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Database whose rows are tracked.
    pub collection_id: String,
    pub status_property: String,
    pub title_property: String,
    pub poll_interval: Duration,
}

impl WatchConfig {
    pub fn new(collection_id: impl Into<String>) -> Self {
        Self {
            collection_id: collection_id.into(),
            status_property: DEFAULT_STATUS_PROPERTY.to_string(),
            title_property: DEFAULT_TITLE_PROPERTY.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let poll_secs: u64 = env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_POLL_INTERVAL.as_secs().to_string())
            .parse()
            .context("POLL_INTERVAL_SECS must be a whole number of seconds")?;
        if poll_secs == 0 {
            anyhow::bail!("POLL_INTERVAL_SECS must be greater than zero");
        }

        Ok(Self {
            notion_key: env::var("NOTION_KEY").context("NOTION_KEY must be set")?,
            notion_base_url: env::var("NOTION_BASE_URL").ok(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            watch: WatchConfig {
                collection_id: env::var("NOTION_DATABASE_ID")
                    .context("NOTION_DATABASE_ID must be set")?,
                status_property: env::var("STATUS_PROPERTY")
                    .unwrap_or_else(|_| DEFAULT_STATUS_PROPERTY.to_string()),
                title_property: env::var("TITLE_PROPERTY")
                    .unwrap_or_else(|_| DEFAULT_TITLE_PROPERTY.to_string()),
                poll_interval: Duration::from_secs(poll_secs),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests in this module share the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "NOTION_KEY",
        "NOTION_DATABASE_ID",
        "NOTION_BASE_URL",
        "PORT",
        "POLL_INTERVAL_SECS",
        "STATUS_PROPERTY",
        "TITLE_PROPERTY",
    ];

    fn load_with(vars: &[(&str, &str)]) -> Result<Config> {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for name in VARS {
            env::remove_var(name);
        }
        for (name, value) in vars {
            env::set_var(name, value);
        }
        let config = Config::from_env();
        for name in VARS {
            env::remove_var(name);
        }
        config
    }

    const REQUIRED: [(&str, &str); 2] = [("NOTION_KEY", "secret"), ("NOTION_DATABASE_ID", "db1")];

    #[test]
    fn test_defaults_apply_when_only_required_vars_are_set() {
        let config = load_with(&REQUIRED).unwrap();

        assert_eq!(config.notion_key, "secret");
        assert_eq!(config.notion_base_url, None);
        assert_eq!(config.port, 3000);
        assert_eq!(config.watch.collection_id, "db1");
        assert_eq!(config.watch.status_property, "Date");
        assert_eq!(config.watch.title_property, "Name");
        assert_eq!(config.watch.poll_interval, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides_are_read() {
        let config = load_with(&[
            ("NOTION_KEY", "secret"),
            ("NOTION_DATABASE_ID", "db1"),
            ("PORT", "8080"),
            ("POLL_INTERVAL_SECS", "30"),
            ("STATUS_PROPERTY", "Status"),
            ("TITLE_PROPERTY", "Task"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.watch.poll_interval, Duration::from_secs(30));
        assert_eq!(config.watch.status_property, "Status");
        assert_eq!(config.watch.title_property, "Task");
    }

    #[test]
    fn test_missing_required_vars_are_rejected() {
        let no_key = load_with(&[("NOTION_DATABASE_ID", "db1")]).unwrap_err();
        let no_database = load_with(&[("NOTION_KEY", "secret")]).unwrap_err();

        assert!(format!("{:#}", no_key).contains("NOTION_KEY"));
        assert!(format!("{:#}", no_database).contains("NOTION_DATABASE_ID"));
    }

    #[test]
    fn test_invalid_poll_interval_is_rejected() {
        let zero = load_with(&[REQUIRED[0], REQUIRED[1], ("POLL_INTERVAL_SECS", "0")]).unwrap_err();
        let words =
            load_with(&[REQUIRED[0], REQUIRED[1], ("POLL_INTERVAL_SECS", "often")]).unwrap_err();

        assert!(format!("{:#}", zero).contains("greater than zero"));
        assert!(format!("{:#}", words).contains("POLL_INTERVAL_SECS"));
    }
}
