//! Configuration loading with multi-layer merge

use super::{CatalogConfig, DigestConfig, EmailConfig, StorageConfig, TrendConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the Postmark server token
pub const ENV_POSTMARK_TOKEN: &str = "POSTMARK_TOKEN";

/// Environment variable overriding the sender address
pub const ENV_SENDER_EMAIL: &str = "SENDER_EMAIL";

/// Environment variable holding the default recipient
pub const ENV_RECIPIENT_EMAIL: &str = "RECIPIENT_EMAIL";

/// Top-level rising-stars configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RisingStarsConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub trend: TrendConfig,

    #[serde(default)]
    pub digest: DigestConfig,

    #[serde(default)]
    pub email: EmailConfig,
}

impl RisingStarsConfig {
    /// Load configuration from the standard hierarchy
    ///
    /// Load order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. ~/.config/rising-stars/config.toml
    /// 3. .rising-stars/config.toml (working directory)
    /// 4. Explicit `--config` file
    /// 5. Environment variables, including a `.env` file in the working
    ///    directory (variables already set in the process win)
    ///
    /// A file layer only overrides fields whose value differs from the
    /// built-in default, so a later file cannot reset a field that an
    /// earlier file changed back to its default value.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                let user_config = Self::load_file(&user_config_path)
                    .with_context(|| format!("loading {}", user_config_path.display()))?;
                config.merge(user_config);
            }
        }

        let project_config_path = PathBuf::from(".rising-stars/config.toml");
        if project_config_path.exists() {
            let project_config = Self::load_file(&project_config_path)
                .with_context(|| format!("loading {}", project_config_path.display()))?;
            config.merge(project_config);
        }

        if let Some(path) = explicit {
            let explicit_config =
                Self::load_file(path).with_context(|| format!("loading {}", path.display()))?;
            config.merge(explicit_config);
        }

        dotenvy::dotenv().ok();
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Get the user config path (~/.config/rising-stars/config.toml)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rising-stars/config.toml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Self) {
        self.storage.merge(other.storage);
        self.catalog.merge(other.catalog);
        self.trend.merge(other.trend);
        self.digest.merge(other.digest);
        self.email.merge(other.email);
    }

    /// Apply environment overrides; empty values are ignored
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = lookup(ENV_POSTMARK_TOKEN) {
            self.email.server_token = Some(token);
        }
        if let Some(sender) = lookup(ENV_SENDER_EMAIL) {
            self.email.sender = sender;
        }
        if let Some(recipient) = lookup(ENV_RECIPIENT_EMAIL) {
            self.email.recipient = Some(recipient);
        }
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<()> {
        let mut errors = self.trend.validate().err().unwrap_or_default();

        if self.catalog.limit == 0 {
            errors.push("catalog.limit must be at least 1".into());
        }
        if self.digest.max_featured == 0 {
            errors.push("digest.max_featured must be at least 1".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("invalid configuration:\n  {}", errors.join("\n  "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = RisingStarsConfig::default();
        assert_eq!(config.catalog.limit, 500);
        assert_eq!(config.digest.max_featured, 10);
        assert_eq!(config.trend.cooldown_days, 14);
        assert!(config.email.server_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
            [storage]
            db_path = "/var/lib/rising-stars/newsletter.db"

            [trend]
            cooldown_days = 21

            [digest]
            max_featured = 5

            [email]
            recipient = "team@example.com"
        "#
        )
        .unwrap();

        let config = RisingStarsConfig::load_file(&config_path).unwrap();
        assert_eq!(config.storage.db_path, "/var/lib/rising-stars/newsletter.db");
        assert_eq!(config.trend.cooldown_days, 21);
        assert_eq!(config.trend.weekly_likes_threshold, 0.25);
        assert_eq!(config.digest.max_featured, 5);
        assert_eq!(config.email.recipient.as_deref(), Some("team@example.com"));
        assert_eq!(config.catalog.limit, 500);
    }

    #[test]
    fn test_load_rejects_unknown_section() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[mystery]\nkey = 1\n").unwrap();

        assert!(RisingStarsConfig::load_file(&config_path).is_err());
    }

    #[test]
    fn test_config_merge() {
        let mut base = RisingStarsConfig::default();
        base.digest.max_featured = 5;
        base.email.recipient = Some("base@example.com".into());

        let mut override_config = RisingStarsConfig::default();
        override_config.trend.cooldown_days = 7;
        override_config.email.recipient = Some("override@example.com".into());

        base.merge(override_config);

        // Override wins where it differs from the defaults
        assert_eq!(base.trend.cooldown_days, 7);
        assert_eq!(base.email.recipient.as_deref(), Some("override@example.com"));

        // Untouched fields keep the base value
        assert_eq!(base.digest.max_featured, 5);
    }

    #[test]
    fn test_apply_env() {
        let env: HashMap<&str, &str> = [
            (ENV_POSTMARK_TOKEN, "secret-token"),
            (ENV_SENDER_EMAIL, "digest@example.com"),
            (ENV_RECIPIENT_EMAIL, "   "),
        ]
        .into_iter()
        .collect();

        let mut config = RisingStarsConfig::default();
        config.email.recipient = Some("file@example.com".into());
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.email.server_token.as_deref(), Some("secret-token"));
        assert_eq!(config.email.sender, "digest@example.com");
        // Blank env values do not clobber the file value
        assert_eq!(config.email.recipient.as_deref(), Some("file@example.com"));
    }

    #[test]
    fn test_apply_env_from_dotenv_file() {
        let dir = TempDir::new().unwrap();
        let env_path = dir.path().join(".env");
        std::fs::write(
            &env_path,
            "POSTMARK_TOKEN=file-token\nRECIPIENT_EMAIL=\"team@example.com\"\n# comment\n",
        )
        .unwrap();

        let env: HashMap<String, String> = dotenvy::from_path_iter(&env_path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        let mut config = RisingStarsConfig::default();
        config.apply_env(|key| env.get(key).cloned());

        assert_eq!(config.email.server_token.as_deref(), Some("file-token"));
        assert_eq!(config.email.recipient.as_deref(), Some("team@example.com"));
        assert_eq!(config.email.sender, "newsletter@openhands.dev");
    }

    #[test]
    fn test_merge_cannot_reset_to_default() {
        let mut config = RisingStarsConfig::default();

        let mut user = RisingStarsConfig::default();
        user.trend.cooldown_days = 21;
        config.merge(user);

        // A later layer asking for the default value is indistinguishable from silence
        let project = RisingStarsConfig::default();
        config.merge(project);

        assert_eq!(config.trend.cooldown_days, 21);
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = RisingStarsConfig::default();
        config.catalog.limit = 0;
        config.digest.max_featured = 0;
        config.trend.cooldown_days = -3;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("catalog.limit"));
        assert!(err.contains("digest.max_featured"));
        assert!(err.contains("cooldown_days"));
    }
}
