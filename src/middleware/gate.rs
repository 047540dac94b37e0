use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use time::Duration;

use crate::{
    assets::{AssetSource, StaticFile, is_swagger_document},
    auth::{client_ip, verify_basic_auth},
    config::SwaggerConfig,
    error::{Result, SwaggerError},
    patch::render_document,
    storage::{FailureStore, failure_key},
};

/// Failures tolerated per client before further requests get a `403`.
pub const MAX_AUTH_ATTEMPTS: u32 = 10;

/// How long a client's failure counter lives after its latest failure.
pub const AUTH_FAILED_INTERVAL: Duration = Duration::minutes(1);

pub struct SwaggerState<S> {
    pub config: Arc<SwaggerConfig>,
    pub assets: AssetSource,
    pub store: Arc<S>,
}

impl<S> Clone for SwaggerState<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            assets: self.assets.clone(),
            store: self.store.clone(),
        }
    }
}

impl<S: FailureStore> SwaggerState<S> {
    pub fn new(config: SwaggerConfig, assets: AssetSource, store: S) -> Self {
        Self {
            config: Arc::new(config),
            assets,
            store: Arc::new(store),
        }
    }
}

/// What the gate decided for a request.
pub enum GateOutcome {
    /// Let the static asset service answer.
    Continue,
    /// Send this response; nothing after the gate runs.
    RespondAndStop(Response),
}

/// The parts of a request the gate looks at.
#[derive(Debug, Clone, Copy)]
pub struct GateRequest<'a> {
    pub client_ip: &'a str,
    /// Path relative to the mount prefix.
    pub path: &'a str,
    pub host: Option<&'a str>,
    pub headers: &'a HeaderMap,
}

/// Runs basic auth (when configured) and serves a patched `swagger.json`
/// when the request targets one.
pub async fn evaluate<S: FailureStore>(
    state: &SwaggerState<S>,
    request: &GateRequest<'_>,
) -> GateOutcome {
    if state.config.auth_enabled() {
        if let Err(err) = authenticate(state, request).await {
            return GateOutcome::RespondAndStop(err.into_response());
        }
    }

    if !is_swagger_document(request.path) {
        return GateOutcome::Continue;
    }

    let Some(file) = state.assets.resolve(request.path).await else {
        return GateOutcome::Continue;
    };

    match serve_document(&state.config, &file, request.host).await {
        Ok(response) => GateOutcome::RespondAndStop(response),
        Err(err) => {
            tracing::error!(
                path = %file.relative_path(),
                error = %err,
                "failed to serve swagger document"
            );
            GateOutcome::RespondAndStop(err.into_response())
        }
    }
}

async fn authenticate<S: FailureStore>(
    state: &SwaggerState<S>,
    request: &GateRequest<'_>,
) -> Result<()> {
    let key = failure_key(request.client_ip);

    let failures = state.store.failure_count(&key).await.inspect_err(|err| {
        tracing::error!(
            client_ip = %request.client_ip,
            error = %err,
            "failed to read auth failure counter"
        );
    })?;
    if failures > MAX_AUTH_ATTEMPTS {
        tracing::warn!(client_ip = %request.client_ip, failures, "swagger basic auth locked out");
        return Err(SwaggerError::AuthLockout);
    }

    if let Err(err) = verify_basic_auth(
        request.headers,
        &state.config.basic_auth_user,
        &state.config.basic_auth_pass,
    ) {
        let failures = state
            .store
            .record_failure(&key, AUTH_FAILED_INTERVAL)
            .await
            .inspect_err(|err| {
                tracing::error!(
                    client_ip = %request.client_ip,
                    error = %err,
                    "failed to record auth failure"
                );
            })?;
        tracing::warn!(
            client_ip = %request.client_ip,
            failures,
            reason = %err,
            "swagger basic auth failed"
        );
        return Err(err);
    }

    Ok(())
}

async fn serve_document(
    config: &SwaggerConfig,
    file: &StaticFile,
    request_host: Option<&str>,
) -> Result<Response> {
    let content = file.content().await?;

    let body = match render_document(&content, config, request_host) {
        Ok(patched) => {
            tracing::debug!(path = %file.relative_path(), "serving patched swagger document");
            Body::from(patched)
        }
        Err(SwaggerError::DocumentParse(err)) => {
            tracing::warn!(
                path = %file.relative_path(),
                error = %err,
                "swagger document is not a JSON object, serving it unmodified"
            );
            Body::from(content)
        }
        Err(err) => return Err(err),
    };

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Pre-serve middleware for everything under the Swagger prefix.
///
/// Reads the client address from [`ConnectInfo<SocketAddr>`], so the app has
/// to be served with `into_make_service_with_connect_info::<SocketAddr>()`;
/// without it every client shares the `unknown` failure counter.
pub async fn swagger_gate<S: FailureStore>(
    State(state): State<SwaggerState<S>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_ip = client_ip(
        request.headers(),
        peer,
        state.config.trust_forwarded_headers,
    );
    let host = request_host(&request);

    let gate_request = GateRequest {
        client_ip: &client_ip,
        path: request.uri().path(),
        host: host.as_deref(),
        headers: request.headers(),
    };

    let outcome = evaluate(&state, &gate_request).await;
    match outcome {
        GateOutcome::Continue => next.run(request).await,
        GateOutcome::RespondAndStop(response) => response,
    }
}

fn request_host(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|authority| authority.to_string()))
}
