//! Access-token provider for Google APIs
//!
//! Supports a pre-issued token or the service-account flow: sign a JWT
//! assertion with the key's RSA private key and exchange it at the token
//! endpoint for a short-lived bearer token. Exchanged tokens are cached
//! until shortly before they expire.

use super::types::{CachedToken, ServiceAccountKey, BIGQUERY_SCOPE};
use crate::config::WarehouseCredentials;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::StringMap;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Lifetime requested for signed assertions
const ASSERTION_LIFETIME_SECONDS: i64 = 3600;

/// Where tokens come from
#[derive(Debug, Clone)]
enum TokenSource {
    Static(String),
    ServiceAccount {
        key: ServiceAccountKey,
        scope: String,
    },
    Unconfigured,
}

/// Hands out bearer tokens for warehouse requests
#[derive(Debug, Clone)]
pub struct TokenProvider {
    source: TokenSource,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    http: HttpClient,
}

impl TokenProvider {
    /// Always return the given token
    pub fn from_token(token: impl Into<String>, http: HttpClient) -> Self {
        Self::with_source(TokenSource::Static(token.into()), http)
    }

    /// Exchange service-account assertions for BigQuery-scoped tokens
    pub fn from_service_account(key: ServiceAccountKey, http: HttpClient) -> Self {
        Self::with_source(
            TokenSource::ServiceAccount {
                key,
                scope: BIGQUERY_SCOPE.to_string(),
            },
            http,
        )
    }

    /// Build a provider from the pipeline's configured credentials
    pub fn from_credentials(credentials: &WarehouseCredentials, http: HttpClient) -> Result<Self> {
        match credentials {
            WarehouseCredentials::AccessToken(token) => Ok(Self::from_token(token.clone(), http)),
            WarehouseCredentials::ServiceAccountFile(path) => {
                let key = ServiceAccountKey::from_file(path)?;
                Ok(Self::from_service_account(key, http))
            }
            WarehouseCredentials::None => Ok(Self::with_source(TokenSource::Unconfigured, http)),
        }
    }

    fn with_source(source: TokenSource, http: HttpClient) -> Self {
        Self {
            source,
            cached_token: Arc::new(RwLock::new(None)),
            http,
        }
    }

    /// Project that owns the service account, if known
    pub fn project_id(&self) -> Option<&str> {
        match &self.source {
            TokenSource::ServiceAccount { key, .. } => key.project_id.as_deref(),
            _ => None,
        }
    }

    /// Get a valid token, exchanging a new one if necessary
    pub async fn access_token(&self) -> Result<String> {
        let (key, scope) = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::Unconfigured => {
                return Err(Error::auth(
                    "No warehouse credentials configured; set GOOGLE_APPLICATION_CREDENTIALS or GOOGLE_OAUTH_ACCESS_TOKEN",
                ))
            }
            TokenSource::ServiceAccount { key, scope } => (key, scope),
        };

        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.exchange_assertion(key, scope).await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Sign a JWT for the service account and trade it for an access token
    async fn exchange_assertion(&self, key: &ServiceAccountKey, scope: &str) -> Result<CachedToken> {
        let jwt = sign_assertion(key, scope)?;

        let mut form = StringMap::new();
        form.insert(
            "grant_type".to_string(),
            "urn:ietf:params:oauth:grant-type:jwt-bearer".to_string(),
        );
        form.insert("assertion".to_string(), jwt);

        debug!("Exchanging service-account assertion at {}", key.token_uri);

        let response: TokenResponse = self
            .http
            .request_json(Method::POST, &key.token_uri, RequestConfig::new().form(form))
            .await
            .map_err(|e| Error::TokenExchange {
                message: e.to_string(),
            })?;

        Ok(response.into_cached_token())
    }
}

/// Build the signed RS256 assertion for a service account
pub fn sign_assertion(key: &ServiceAccountKey, scope: &str) -> Result<String> {
    let now = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: scope.to_string(),
        aud: key.token_uri.clone(),
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECONDS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid.clone_from(&key.private_key_id);

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| Error::auth(format!("Invalid private key: {e}")))?;

    encode(&header, &claims, &encoding_key)
        .map_err(|e| Error::auth(format!("Failed to encode JWT: {e}")))
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}

/// JWT claims for the service-account grant
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}
