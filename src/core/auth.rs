//! Authentication gate for protected transport targets.
//!
//! A candidate credential is extracted from the first of four request
//! locations that yields a non-empty value, then compared against the
//! configured shared secret with exact string equality:
//!
//! 1. `Authorization: Bearer <token>` header
//! 2. `X-API-Key` header
//! 3. `api-key` header (lowercase variant)
//! 4. `api_key` query parameter
//!
//! A gate constructed without a secret reports a configuration error on
//! every check, distinct from an authentication failure, so operators do
//! not mistake misconfiguration for an attack. In practice the process
//! refuses to start without a secret (see `Config::from_env`); the
//! per-check error is the backstop.

use std::collections::HashMap;

use http::HeaderMap;
use http::header::AUTHORIZATION;

use super::error::{Error, Result};

/// Everything a credential can be extracted from.
struct CredentialSource<'a> {
    headers: &'a HeaderMap,
    query: HashMap<String, String>,
}

/// A single credential extractor. Extractors are tried in order; the
/// first non-empty value wins.
type Extractor = fn(&CredentialSource<'_>) -> Option<String>;

const EXTRACTORS: &[Extractor] = &[
    bearer_token,
    api_key_header,
    api_key_header_lowercase,
    query_parameter,
];

fn bearer_token(source: &CredentialSource<'_>) -> Option<String> {
    source
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}

fn api_key_header(source: &CredentialSource<'_>) -> Option<String> {
    source
        .headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn api_key_header_lowercase(source: &CredentialSource<'_>) -> Option<String> {
    source
        .headers
        .get("api-key")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn query_parameter(source: &CredentialSource<'_>) -> Option<String> {
    source.query.get("api_key").cloned()
}

/// The authentication gate applied to protected transport targets.
///
/// Holds the shared secret by value, passed in at construction time, so
/// there is no order-of-initialization hazard between configuration and
/// request handling.
#[derive(Debug, Clone)]
pub struct ApiKeyGate {
    secret: Option<String>,
}

impl ApiKeyGate {
    /// Create a gate with the configured server secret.
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    /// Check an inbound request's credential.
    ///
    /// Returns `Ok(false)` for absent or mismatched credentials (the
    /// caller maps that to a rejection response) and `Err(Error::Config)`
    /// if the gate has no secret to compare against.
    ///
    /// The comparison is plain string equality. A timing-safe comparison
    /// would be a reasonable hardening follow-up.
    pub fn authenticate(&self, headers: &HeaderMap, raw_query: Option<&str>) -> Result<bool> {
        let Some(secret) = self.secret.as_deref() else {
            return Err(Error::config("server API key is not configured"));
        };

        let source = CredentialSource {
            headers,
            query: parse_query(raw_query),
        };

        let candidate = EXTRACTORS
            .iter()
            .find_map(|extract| extract(&source).filter(|v| !v.is_empty()));

        Ok(candidate.as_deref() == Some(secret))
    }
}

fn parse_query(raw_query: Option<&str>) -> HashMap<String, String> {
    raw_query
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default()
}
