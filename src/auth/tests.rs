//! Tests for the auth module

use super::*;
use crate::config::WarehouseCredentials;
use crate::http::HttpClient;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_PRIVATE_KEY: &str = include_str!("../../tests/fixtures/test_rsa_key.pem");
const TEST_PUBLIC_KEY: &str = include_str!("../../tests/fixtures/test_rsa_key.pub.pem");

fn test_key(token_uri: &str) -> ServiceAccountKey {
    ServiceAccountKey {
        key_type: Some("service_account".to_string()),
        project_id: Some("analytics-prod".to_string()),
        private_key_id: Some("key-1".to_string()),
        private_key: TEST_PRIVATE_KEY.to_string(),
        client_email: "etl@analytics-prod.iam.gserviceaccount.com".to_string(),
        token_uri: token_uri.to_string(),
    }
}

#[tokio::test]
async fn test_static_token() {
    let provider = TokenProvider::from_token("ya29.static", HttpClient::new().unwrap());
    assert_eq!(provider.access_token().await.unwrap(), "ya29.static");
    assert!(provider.project_id().is_none());
}

#[tokio::test]
async fn test_unconfigured_credentials() {
    let provider =
        TokenProvider::from_credentials(&WarehouseCredentials::None, HttpClient::new().unwrap())
            .unwrap();
    let err = provider.access_token().await.unwrap_err();
    assert!(matches!(err, crate::Error::Auth { .. }));
}

#[tokio::test]
async fn test_missing_key_file() {
    let credentials =
        WarehouseCredentials::ServiceAccountFile("/nonexistent/service-account.json".into());
    let err = TokenProvider::from_credentials(&credentials, HttpClient::new().unwrap()).unwrap_err();
    assert!(matches!(err, crate::Error::FileNotFound { .. }));
}

#[test]
fn test_sign_assertion_claims() {
    let key = test_key(GOOGLE_TOKEN_URI);
    let jwt = sign_assertion(&key, BIGQUERY_SCOPE).unwrap();

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[GOOGLE_TOKEN_URI]);
    let decoded = decode::<AssertionClaims>(
        &jwt,
        &DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY.as_bytes()).unwrap(),
        &validation,
    )
    .unwrap();

    assert_eq!(decoded.header.kid.as_deref(), Some("key-1"));
    assert_eq!(
        decoded.claims.iss,
        "etl@analytics-prod.iam.gserviceaccount.com"
    );
    assert_eq!(decoded.claims.scope, BIGQUERY_SCOPE);
    assert_eq!(decoded.claims.exp - decoded.claims.iat, 3600);
}

#[test]
fn test_sign_assertion_invalid_key() {
    let mut key = test_key(GOOGLE_TOKEN_URI);
    key.private_key = "not a pem".to_string();
    assert!(sign_assertion(&key, BIGQUERY_SCOPE).is_err());
}

#[tokio::test]
async fn test_service_account_exchange_is_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("jwt-bearer"))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.exchanged",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let key = test_key(&format!("{}/token", mock_server.uri()));
    let provider = TokenProvider::from_service_account(key, HttpClient::new().unwrap());

    assert_eq!(provider.project_id(), Some("analytics-prod"));
    assert_eq!(provider.access_token().await.unwrap(), "ya29.exchanged");
    assert_eq!(provider.access_token().await.unwrap(), "ya29.exchanged");
}

#[tokio::test]
async fn test_service_account_exchange_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&mock_server)
        .await;

    let key = test_key(&format!("{}/token", mock_server.uri()));
    let provider = TokenProvider::from_service_account(key, HttpClient::new().unwrap());

    let err = provider.access_token().await.unwrap_err();
    assert!(matches!(err, crate::Error::TokenExchange { .. }));
    assert!(err.to_string().contains("invalid_grant"));
}
