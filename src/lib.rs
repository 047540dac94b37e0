pub mod assets;
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod patch;
pub mod plugin;
pub mod storage;

pub use assets::{AssetSource, SWAGGER_DOCUMENT, StaticFile};
pub use config::{SwaggerConfig, SwaggerInfo};
pub use error::{Result, SwaggerError};
pub use middleware::{
    AUTH_FAILED_INTERVAL, GateOutcome, GateRequest, MAX_AUTH_ATTEMPTS, SwaggerState, swagger_gate,
};
pub use patch::{patch_document, render_document};
pub use plugin::{Plugin, SwaggerPlugin};
#[cfg(feature = "cloudflare-kv")]
pub use storage::CloudflareKvFailureStore;
pub use storage::{FailureStore, InMemoryFailureStore};

pub mod prelude {
    pub use crate::{
        assets::{AssetSource, StaticFile},
        clock::{Clock, ManualClock, SystemClock},
        config::{SwaggerConfig, SwaggerInfo},
        error::{Result, SwaggerError},
        middleware::{
            AUTH_FAILED_INTERVAL, GateOutcome, MAX_AUTH_ATTEMPTS, SwaggerState, swagger_gate,
        },
        plugin::{Plugin, SwaggerPlugin},
        storage::{FailureStore, InMemoryFailureStore},
    };

    #[cfg(feature = "cloudflare-kv")]
    pub use crate::storage::CloudflareKvFailureStore;
}
