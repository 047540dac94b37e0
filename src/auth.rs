use std::net::SocketAddr;

use axum::http::{HeaderMap, header};
use base64::{Engine, engine::general_purpose::STANDARD};
use subtle::ConstantTimeEq;

use crate::error::{Result, SwaggerError};

/// Key used when neither headers nor the socket reveal the client.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Username and password carried by an `Authorization: Basic` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

pub fn extract_basic_credentials(headers: &HeaderMap) -> Result<BasicCredentials> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .ok_or(SwaggerError::MissingCredentials)?
        .to_str()
        .map_err(|_| SwaggerError::InvalidCredentials)?;

    let (scheme, encoded) = header_value
        .trim()
        .split_once(' ')
        .ok_or(SwaggerError::InvalidCredentials)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(SwaggerError::InvalidCredentials);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| SwaggerError::InvalidCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| SwaggerError::InvalidCredentials)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(SwaggerError::InvalidCredentials)?;

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Checks the request's basic auth credentials against the configured pair.
///
/// Both fields are always compared, in constant time for equal lengths.
pub fn verify_basic_auth(headers: &HeaderMap, user: &str, pass: &str) -> Result<()> {
    let credentials = extract_basic_credentials(headers)?;

    let user_matches = credentials.username.as_bytes().ct_eq(user.as_bytes());
    let pass_matches = credentials.password.as_bytes().ct_eq(pass.as_bytes());
    if bool::from(user_matches & pass_matches) {
        Ok(())
    } else {
        Err(SwaggerError::InvalidCredentials)
    }
}

/// Resolves the address failures are counted against.
///
/// Forwarding headers are only consulted when `trust_forwarded` is set,
/// `X-Forwarded-For` (first hop) winning over `X-Real-IP`.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded: bool) -> String {
    if trust_forwarded {
        let forwarded = headers
            .get("X-Forwarded-For")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim);
        let real_ip = headers
            .get("X-Real-IP")
            .and_then(|value| value.to_str().ok())
            .map(str::trim);

        if let Some(ip) = [forwarded, real_ip]
            .into_iter()
            .flatten()
            .find(|ip| !ip.is_empty() && !ip.eq_ignore_ascii_case(UNKNOWN_CLIENT))
        {
            return ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
