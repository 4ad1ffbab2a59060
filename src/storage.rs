use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{BASE_URL_ENV, DEFAULT_API_PREFIX, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

const CONFIG_FILE: &str = "config.yaml";

/// Endpoint paths, relative to `base_url + api_prefix`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub sign_in: String,
    pub sign_out: String,
    pub forgot_password: String,
    pub reset_password: String,
    pub sign_up: String,
    pub user_info: String,
    pub settings_profile: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            sign_in: String::from("/sign-in"),
            sign_out: String::from("/sign-out"),
            forgot_password: String::from("/forgot-password"),
            reset_password: String::from("/reset-password"),
            sign_up: String::from("/main/register"),
            user_info: String::from("/userauth/userinfo"),
            settings_profile: String::from("/settings/profile/"),
        }
    }
}

/// Client configuration persisted as YAML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_prefix: String,
    pub timeout_secs: u64,
    /// When true, ignores TLS certificate errors (local dev servers)
    pub accept_invalid_certs: bool,
    pub endpoints: Endpoints,
    /// Prefilled into the sign-in form
    pub remembered_email: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: String::from(DEFAULT_BASE_URL),
            api_prefix: String::from(DEFAULT_API_PREFIX),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: false,
            endpoints: Endpoints::default(),
            remembered_email: None,
        }
    }
}

impl ClientConfig {
    /// Full URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url.trim_end_matches('/'),
            self.api_prefix.trim_end_matches('/'),
            path
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Loads and saves the client configuration
pub struct Storage {
    pub config: ClientConfig,
    config_dir: PathBuf,
}

impl Storage {
    /// Open `~/.accountdesk`, falling back to defaults when nothing is saved
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".accountdesk");
        Self::open(config_dir)
    }

    pub fn open(config_dir: PathBuf) -> Self {
        let mut storage = Storage {
            config: ClientConfig::default(),
            config_dir,
        };

        if let Err(e) = storage.load() {
            tracing::warn!(error = %e, "Using default configuration");
        }
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.is_empty() {
                storage.config.base_url = base_url;
            }
        }
        storage
    }

    fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Ensure config directory exists
    fn ensure_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)
                .with_context(|| format!("creating {}", self.config_dir.display()))?;
        }
        Ok(())
    }

    pub fn load(&mut self) -> Result<()> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        self.config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.ensure_dir()?;
        let path = self.config_path();
        let content = serde_yaml::to_string(&self.config)?;
        fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Remember the last email that signed in successfully
    pub fn remember_email(&mut self, email: &str) -> Result<()> {
        if self.config.remembered_email.as_deref() == Some(email) {
            return Ok(());
        }
        self.config.remembered_email = Some(email.to_string());
        self.save()
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = ClientConfig::default();
        assert_eq!(
            config.url(&config.endpoints.settings_profile),
            "https://localhost:7295/api/settings/profile/"
        );
        assert_eq!(
            config.url(&config.endpoints.user_info),
            "https://localhost:7295/api/userauth/userinfo"
        );
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_url_trims_trailing_slashes() {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:8080/".into(),
            api_prefix: "".into(),
            ..Default::default()
        };
        assert_eq!(config.url("/sign-in"), "http://127.0.0.1:8080/sign-in");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = Storage {
            config: ClientConfig::default(),
            config_dir: dir.path().join("absent"),
        };
        storage.load().unwrap();
        assert_eq!(storage.config, ClientConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = Storage {
            config: ClientConfig::default(),
            config_dir: dir.path().join("cfg"),
        };
        storage.config.base_url = "http://10.0.0.5:5000".into();
        storage.remember_email("ana@example.com").unwrap();

        let mut reloaded = Storage {
            config: ClientConfig::default(),
            config_dir: dir.path().join("cfg"),
        };
        reloaded.load().unwrap();
        assert_eq!(reloaded.config.base_url, "http://10.0.0.5:5000");
        assert_eq!(reloaded.config.remembered_email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "base_url: http://api.local\nendpoints:\n  sign_in: /auth/login\n",
        )
        .unwrap();
        let mut storage = Storage {
            config: ClientConfig::default(),
            config_dir: dir.path().to_path_buf(),
        };
        storage.load().unwrap();
        assert_eq!(storage.config.base_url, "http://api.local");
        assert_eq!(storage.config.endpoints.sign_in, "/auth/login");
        assert_eq!(storage.config.endpoints.sign_up, "/main/register");
        assert_eq!(storage.config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_bad_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "base_url: [unterminated").unwrap();
        let mut storage = Storage {
            config: ClientConfig::default(),
            config_dir: dir.path().to_path_buf(),
        };
        assert!(storage.load().is_err());
    }

    #[test]
    fn test_env_base_url_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "base_url: http://api.local\n").unwrap();

        // the environment is shared by every test thread; restore it before asserting
        let previous = std::env::var(BASE_URL_ENV).ok();
        std::env::set_var(BASE_URL_ENV, "http://override.test:8080");
        let overridden = Storage::open(dir.path().to_path_buf());
        std::env::set_var(BASE_URL_ENV, "");
        let ignored = Storage::open(dir.path().to_path_buf());
        match previous {
            Some(value) => std::env::set_var(BASE_URL_ENV, value),
            None => std::env::remove_var(BASE_URL_ENV),
        }

        assert_eq!(overridden.config.base_url, "http://override.test:8080");
        assert_eq!(
            overridden.config.url(&overridden.config.endpoints.sign_in),
            "http://override.test:8080/api/sign-in"
        );
        assert_eq!(ignored.config.base_url, "http://api.local");
    }
}
