use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SwaggerError};

/// Key of the plugin's section inside the host configuration document.
pub const CONFIG_NAMESPACE: &str = "swagger";

const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];

/// Overrides for the `info` object of the served document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwaggerInfo {
    pub title: String,
    pub version: String,
    pub terms_of_service: String,
    pub description: String,
}

/// Plugin configuration. Empty strings and an empty `schemes` list mean
/// "leave the document's value alone".
///
/// Deserializes from the flat key set used by host configuration files:
///
/// ```rust
/// use axum_swagger_assets::SwaggerConfig;
/// use serde_json::json;
///
/// let host_config = json!({
///     "swagger": {
///         "user": "admin",
///         "pass": "secret",
///         "title": "My API",
///         "schemes": ["https"],
///         "basePath": "/v1"
///     }
/// });
///
/// let config = SwaggerConfig::from_host_config(&host_config).unwrap();
/// assert_eq!(config.basic_auth_user, "admin");
/// assert_eq!(config.info.title, "My API");
/// assert_eq!(config.base_path, "/v1");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwaggerConfig {
    #[serde(flatten)]
    pub info: SwaggerInfo,
    pub schemes: Vec<String>,
    pub host: String,
    pub base_path: String,
    #[serde(rename = "user")]
    pub basic_auth_user: String,
    #[serde(rename = "pass")]
    pub basic_auth_pass: String,
    /// Take the client IP from `X-Forwarded-For` / `X-Real-IP` before the
    /// socket address. Only enable behind a proxy that overwrites them.
    pub trust_forwarded_headers: bool,
}

impl SwaggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the `swagger` section of a host configuration document. A missing
    /// section yields the default configuration.
    pub fn from_host_config(host_config: &Value) -> Result<Self> {
        let section = match host_config.get(CONFIG_NAMESPACE) {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(section) => section.clone(),
        };

        let config: Self = serde_json::from_value(section)
            .map_err(|e| SwaggerError::InvalidConfig(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.basic_auth_user.is_empty() && !self.basic_auth_pass.is_empty() {
            return Err(SwaggerError::InvalidConfig(
                "`pass` is set but `user` is empty".to_string(),
            ));
        }

        if let Some(scheme) = self
            .schemes
            .iter()
            .find(|scheme| !ALLOWED_SCHEMES.contains(&scheme.as_str()))
        {
            return Err(SwaggerError::InvalidConfig(format!(
                "unsupported scheme `{scheme}`, expected one of {ALLOWED_SCHEMES:?}"
            )));
        }

        if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
            return Err(SwaggerError::InvalidConfig(format!(
                "`basePath` must start with `/`, got `{}`",
                self.base_path
            )));
        }

        Ok(())
    }

    pub fn auth_enabled(&self) -> bool {
        !self.basic_auth_user.is_empty()
    }

    pub fn with_basic_auth(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.basic_auth_user = user.into();
        self.basic_auth_pass = pass.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_schemes<I, T>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.info.title = title.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.info.version = version.into();
        self
    }

    pub fn with_terms_of_service(mut self, terms_of_service: impl Into<String>) -> Self {
        self.info.terms_of_service = terms_of_service.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.info.description = description.into();
        self
    }

    pub fn with_trusted_forwarded_headers(mut self, trust: bool) -> Self {
        self.trust_forwarded_headers = trust;
        self
    }
}

impl fmt::Debug for SwaggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwaggerConfig")
            .field("info", &self.info)
            .field("schemes", &self.schemes)
            .field("host", &self.host)
            .field("base_path", &self.base_path)
            .field("basic_auth_user", &self.basic_auth_user)
            .field("basic_auth_pass", &"<redacted>")
            .field("trust_forwarded_headers", &self.trust_forwarded_headers)
            .finish()
    }
}
