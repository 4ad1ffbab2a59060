//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default origin of the account API
pub const DEFAULT_BASE_URL: &str = "https://localhost:7295";

/// Default path prefix shared by every endpoint
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable that overrides the configured base URL
pub const BASE_URL_ENV: &str = "ACCOUNTDESK_BASE_URL";

/// Simulated latency of the profile save operation
pub const SAVE_LATENCY_MS: u64 = 500;

/// How long an alert stays on screen
pub const ALERT_TIMEOUT_MS: u64 = 3000;

/// Prefix of country flag images
pub const FLAG_IMAGE_DIR: &str = "/img/countries";

/// Log file written next to the working directory
pub const LOG_FILE: &str = "accountdesk.log";

/// Application name
pub const APP_NAME: &str = "Account Desk";
