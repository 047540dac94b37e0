use axum::{Router, middleware::from_fn_with_state};
use tower_http::services::ServeDir;

use crate::{
    assets::AssetSource,
    config::SwaggerConfig,
    error::{Result, SwaggerError},
    handlers::serve_asset,
    middleware::{SwaggerState, swagger_gate},
    storage::{FailureStore, InMemoryFailureStore},
};

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Prefix the Swagger UI is mounted under unless overridden.
pub const DEFAULT_PREFIX: &str = "/swagger";

/// A feature that installs itself into a host application's router.
pub trait Plugin {
    fn name(&self) -> &str;

    fn author(&self) -> &str;

    fn version(&self) -> &str;

    fn description(&self) -> &str;

    /// Returns `router` with the plugin's routes added.
    fn install(&self, router: Router) -> Router;

    /// Releases whatever the plugin holds outside the router. The routes
    /// themselves go away with the router they were installed into.
    fn remove(&self) -> Result<()> {
        Ok(())
    }
}

/// Swagger UI assets mounted under a prefix, gated by [`swagger_gate`].
///
/// ```rust
/// use axum::Router;
/// use axum_swagger_assets::{AssetSource, Plugin, SwaggerConfig, SwaggerPlugin};
///
/// let config = SwaggerConfig::new()
///     .with_basic_auth("admin", "secret")
///     .with_title("Pet Store");
/// let assets = AssetSource::memory([
///     ("index.html", "<html></html>"),
///     ("swagger.json", r#"{"swagger":"2.0","host":"{host}"}"#),
/// ]);
///
/// let swagger = SwaggerPlugin::new(config, assets).unwrap();
/// let app: Router = swagger.install(Router::new());
/// ```
pub struct SwaggerPlugin<S = InMemoryFailureStore> {
    state: SwaggerState<S>,
    prefix: String,
}

impl SwaggerPlugin<InMemoryFailureStore> {
    /// Plugin with a process-local failure counter store.
    pub fn new(config: SwaggerConfig, assets: AssetSource) -> Result<Self> {
        Self::with_store(config, assets, InMemoryFailureStore::new())
    }
}

impl<S: FailureStore + 'static> SwaggerPlugin<S> {
    /// Validates `config` and builds a plugin counting failures in `store`.
    pub fn with_store(config: SwaggerConfig, assets: AssetSource, store: S) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            state: SwaggerState::new(config, assets, store),
            prefix: DEFAULT_PREFIX.to_string(),
        })
    }

    /// Mounts the assets under `prefix` instead of `/swagger`.
    pub fn with_prefix(mut self, prefix: impl AsRef<str>) -> Result<Self> {
        let trimmed = prefix.as_ref().trim_matches('/');
        if trimmed.is_empty() {
            return Err(SwaggerError::InvalidConfig(
                "the swagger prefix cannot be the root path".to_string(),
            ));
        }

        self.prefix = format!("/{trimmed}");
        Ok(self)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn state(&self) -> &SwaggerState<S> {
        &self.state
    }

    /// A router serving only the Swagger prefix.
    pub fn router(&self) -> Router {
        self.install(Router::new())
    }

    fn service(&self) -> Router {
        let router = match &self.state.assets {
            AssetSource::Directory(root) => Router::new().fallback_service(ServeDir::new(root)),
            AssetSource::Memory(_) => Router::new().fallback(serve_asset::<S>),
        };

        router
            .layer(from_fn_with_state(self.state.clone(), swagger_gate::<S>))
            .with_state(self.state.clone())
    }
}

impl<S: FailureStore + 'static> Plugin for SwaggerPlugin<S> {
    fn name(&self) -> &str {
        NAME
    }

    fn author(&self) -> &str {
        AUTHOR
    }

    fn version(&self) -> &str {
        VERSION
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn install(&self, router: Router) -> Router {
        tracing::debug!(
            prefix = %self.prefix,
            auth = self.state.config.auth_enabled(),
            "installing swagger assets"
        );
        router.nest_service(&self.prefix, self.service())
    }
}
