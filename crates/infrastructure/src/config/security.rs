//! Security configuration: admin credentials and rate limiting.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::default_true;

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Admin username for HTTP Basic authentication
    ///
    /// Defaults to `admin`; override via `RAWANMAP_SECURITY__ADMIN_USERNAME`.
    #[serde(default = "default_admin_username", skip_serializing)]
    pub admin_username: SecretString,

    /// Admin password for HTTP Basic authentication
    ///
    /// Defaults to `password`; override via `RAWANMAP_SECURITY__ADMIN_PASSWORD`.
    #[serde(default = "default_admin_password", skip_serializing)]
    pub admin_password: SecretString,

    /// Path prefix gated behind admin authentication
    #[serde(default = "default_admin_path_prefix")]
    pub admin_path_prefix: String,

    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub rate_limit_enabled: bool,

    /// Requests per minute per IP for public routes
    #[serde(default = "default_rate_limit")]
    pub rate_limit_rpm: u32,

    /// Requests per minute per IP for admin and mutating routes
    #[serde(default = "default_admin_rate_limit")]
    pub admin_rate_limit_rpm: u32,
}

fn default_admin_username() -> SecretString {
    SecretString::from("admin")
}

fn default_admin_password() -> SecretString {
    SecretString::from("password")
}

fn default_admin_path_prefix() -> String {
    "/admin".to_string()
}

const fn default_rate_limit() -> u32 {
    120
}

const fn default_admin_rate_limit() -> u32 {
    30
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
            admin_path_prefix: default_admin_path_prefix(),
            rate_limit_enabled: true,
            rate_limit_rpm: default_rate_limit(),
            admin_rate_limit_rpm: default_admin_rate_limit(),
        }
    }
}

impl SecurityConfig {
    /// Whether the built-in development credentials are still active
    ///
    /// Checked at startup to warn when running in production with defaults.
    #[must_use]
    pub fn uses_default_credentials(&self) -> bool {
        self.admin_username.expose_secret() == "admin"
            && self.admin_password.expose_secret() == "password"
    }
}
