//! Tests for the auth module

use super::*;
use crate::types::{Method, StringMap};
use base64::Engine;
use serde_json::json;

fn data(items: &[(&str, &str)]) -> StringMap {
    items
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn fixed() -> OAuthParams {
    OAuthParams::new(1_700_000_000, "abcdef123456")
}

fn get(url: &str) -> PreparedRequest {
    PreparedRequest::new(url, Method::GET)
}

#[test]
fn test_no_auth_passthrough() {
    let auth = AuthStrategy::from_config("none", &StringMap::new()).unwrap();
    let req = get("https://example.com/api").header("Accept", "application/json");

    let prepared = auth.prepare_request(req.clone()).unwrap();
    assert_eq!(prepared, req);
}

#[test]
fn test_unknown_type_falls_back_to_none() {
    let auth = AuthStrategy::from_config("kerberos", &StringMap::new()).unwrap();
    assert_eq!(auth.auth_type(), AuthType::None);
    assert!(auth.fields().is_empty());
}

#[test]
fn test_basic_auth() {
    let auth =
        AuthStrategy::from_config("basic", &data(&[("username", "user"), ("password", "pass")]))
            .unwrap();

    let prepared = auth.prepare_request(get("https://example.com/api")).unwrap();
    let header = prepared.headers.get("Authorization").unwrap();
    assert!(header.starts_with("Basic "));

    let encoded = header.strip_prefix("Basic ").unwrap();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), "user:pass");
}

#[test]
fn test_basic_auth_requires_username() {
    let err = AuthStrategy::from_config("basic", &data(&[("password", "pass")])).unwrap_err();
    assert!(err.is_config_error());
    assert!(err.to_string().contains("auth_data.username"));
}

#[test]
fn test_caller_headers_untouched() {
    let auth = AuthStrategy::from_config("oauth2", &data(&[("access_token", "tok")])).unwrap();
    let original = get("https://example.com/api").header("X-Trace", "1");

    let prepared = auth.prepare_request(original.clone()).unwrap();

    assert!(original.headers.get("Authorization").is_none());
    assert_eq!(prepared.headers.get("X-Trace").unwrap(), "1");
    assert_eq!(prepared.headers.get("Authorization").unwrap(), "Bearer tok");
}

#[test]
fn test_api_key_header() {
    let auth = AuthStrategy::from_config(
        "api_key",
        &data(&[
            ("api_key", "test-key-123"),
            ("api_key_location", "header"),
            ("api_key_name", "X-API-Key"),
        ]),
    )
    .unwrap();

    let prepared = auth.prepare_request(get("https://example.com/api")).unwrap();
    assert_eq!(prepared.headers.get("X-API-Key").unwrap(), "test-key-123");
    assert_eq!(prepared.url, "https://example.com/api");
}

#[test]
fn test_api_key_query() {
    let auth = AuthStrategy::from_config(
        "api_key",
        &data(&[
            ("api_key", "secret123"),
            ("api_key_location", "query"),
            ("api_key_name", "apikey"),
        ]),
    )
    .unwrap();

    let prepared = auth
        .prepare_request(get("https://example.com/api?page=2"))
        .unwrap();
    assert_eq!(prepared.url, "https://example.com/api?page=2&apikey=secret123");
    assert!(prepared.headers.is_empty());
}

#[test]
fn test_api_key_query_replaces_existing() {
    let auth = AuthStrategy::from_config(
        "api_key",
        &data(&[
            ("api_key", "new"),
            ("api_key_location", "query"),
            ("api_key_name", "key"),
        ]),
    )
    .unwrap();

    let prepared = auth
        .prepare_request(get("https://example.com/api?key=old"))
        .unwrap();
    assert_eq!(prepared.url, "https://example.com/api?key=new");
}

#[test]
fn test_api_key_query_keeps_existing_encoding() {
    let auth = AuthStrategy::from_config(
        "api_key",
        &data(&[
            ("api_key", "v"),
            ("api_key_location", "query"),
            ("api_key_name", "key"),
        ]),
    )
    .unwrap();

    let prepared = auth
        .prepare_request(get("https://x.io/a?q=a%20b"))
        .unwrap();
    assert_eq!(prepared.url, "https://x.io/a?q=a%20b&key=v");
}

#[test]
fn test_oauth1_plaintext_signature() {
    let auth = AuthStrategy::from_config(
        "oauth1",
        &data(&[
            ("consumer_key", "ck"),
            ("consumer_secret", "A"),
            ("token", "tk"),
            ("token_secret", "B"),
            ("signature_method", "PLAINTEXT"),
        ]),
    )
    .unwrap();

    let prepared = auth
        .prepare_request_with(get("https://api.example.com/items"), &fixed())
        .unwrap();
    let header = prepared.headers.get("Authorization").unwrap();

    assert_eq!(
        header,
        "OAuth oauth_consumer_key=\"ck\", oauth_token=\"tk\", \
         oauth_signature_method=\"PLAINTEXT\", oauth_timestamp=\"1700000000\", \
         oauth_nonce=\"abcdef123456\", oauth_version=\"1.0\", oauth_signature=\"A%26B\""
    );
}

#[test]
fn test_oauth1_hmac_signature_is_deterministic() {
    let auth = AuthStrategy::from_config(
        "oauth1",
        &data(&[
            ("consumer_key", "ck"),
            ("consumer_secret", "cs"),
            ("token", "tk"),
            ("token_secret", "ts"),
        ]),
    )
    .unwrap();

    let req = get("https://api.example.com/items").body(json!({"q": "rust"}));
    let first = auth.prepare_request_with(req.clone(), &fixed()).unwrap();
    let second = auth.prepare_request_with(req, &fixed()).unwrap();

    let header = first.headers.get("Authorization").unwrap();
    assert_eq!(header, second.headers.get("Authorization").unwrap());
    assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
    assert!(!header.contains("oauth_signature=\"cs%26ts\""));
}

#[test]
fn test_oauth1_signature_depends_on_body() {
    let auth = AuthStrategy::from_config(
        "oauth1",
        &data(&[("consumer_key", "ck"), ("consumer_secret", "cs")]),
    )
    .unwrap();

    let a = auth
        .prepare_request_with(
            get("https://api.example.com/items").body(json!({"q": "a"})),
            &fixed(),
        )
        .unwrap();
    let b = auth
        .prepare_request_with(
            get("https://api.example.com/items").body(json!({"q": "b"})),
            &fixed(),
        )
        .unwrap();

    assert_ne!(
        a.headers.get("Authorization"),
        b.headers.get("Authorization")
    );
}

#[test]
fn test_oauth1_rsa_is_config_error() {
    let auth = AuthStrategy::from_config(
        "oauth1",
        &data(&[
            ("consumer_key", "ck"),
            ("consumer_secret", "cs"),
            ("signature_method", "RSA-SHA1"),
        ]),
    )
    .unwrap();

    let err = auth
        .prepare_request_with(get("https://api.example.com"), &fixed())
        .unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn test_oauth1_unknown_signature_method() {
    let err = AuthStrategy::from_config(
        "oauth1",
        &data(&[
            ("consumer_key", "ck"),
            ("consumer_secret", "cs"),
            ("signature_method", "MD5"),
        ]),
    )
    .unwrap_err();
    assert!(matches!(err, crate::Error::InvalidConfigValue { .. }));
}

#[test]
fn test_oauth2_bearer() {
    let auth =
        AuthStrategy::from_config("oauth2", &data(&[("access_token", "my-bearer-token")]))
            .unwrap();

    let prepared = auth.prepare_request(get("https://example.com/api")).unwrap();
    assert_eq!(
        prepared.headers.get("Authorization").unwrap(),
        "Bearer my-bearer-token"
    );
}

#[test]
fn test_trademe_application_mode() {
    let auth = AuthStrategy::from_config(
        "trademe",
        &data(&[
            ("consumer_key", "ck"),
            ("consumer_secret", "A"),
            ("token", "tk"),
            ("token_secret", "B"),
            ("auth_type", "application"),
        ]),
    )
    .unwrap();

    let prepared = auth
        .prepare_request_with(get("http://api.trademe.co.nz/v1/Search.json"), &fixed())
        .unwrap();

    assert_eq!(prepared.url, "https://api.trademe.co.nz/v1/Search.json");
    let header = prepared.headers.get("Authorization").unwrap();
    assert!(header.contains("oauth_signature_method=\"PLAINTEXT\""));
    assert!(header.ends_with("oauth_signature=\"A%26\""));
    assert!(!header.contains("oauth_token="));
}

#[test]
fn test_trademe_member_mode() {
    let auth = AuthStrategy::from_config(
        "trademe",
        &data(&[
            ("consumer_key", "ck"),
            ("consumer_secret", "A"),
            ("token", "tk"),
            ("token_secret", "B"),
            ("auth_type", "member"),
        ]),
    )
    .unwrap();

    let prepared = auth
        .prepare_request_with(get("https://api.trademe.co.nz/v1/MyTradeMe.json"), &fixed())
        .unwrap();

    let header = prepared.headers.get("Authorization").unwrap();
    assert!(header.contains("oauth_token=\"tk\""));
    assert!(header.ends_with("oauth_signature=\"A%26B\""));
}

#[test]
fn test_trademe_member_without_token_signs_as_application() {
    let auth = AuthStrategy::from_config(
        "trademe",
        &data(&[
            ("consumer_key", "ck"),
            ("consumer_secret", "A"),
            ("auth_type", "member"),
        ]),
    )
    .unwrap();

    let prepared = auth
        .prepare_request_with(get("https://api.trademe.co.nz/v1"), &fixed())
        .unwrap();
    assert!(prepared
        .headers
        .get("Authorization")
        .unwrap()
        .ends_with("oauth_signature=\"A%26\""));
}

#[test]
fn test_auth_fields_order() {
    let keys: Vec<String> = auth_fields(AuthType::OAuth1)
        .into_iter()
        .map(|f| f.key)
        .collect();
    assert_eq!(
        keys,
        vec![
            "consumer_key",
            "consumer_secret",
            "token",
            "token_secret",
            "signature_method"
        ]
    );

    let api_key = auth_fields(AuthType::ApiKey);
    assert_eq!(api_key[1].input_kind, InputKind::Select);
    assert_eq!(api_key[1].options[0].value, "query");
    assert_eq!(api_key[1].options[1].label, "Header");

    assert!(auth_fields(AuthType::None).is_empty());
    assert_eq!(auth_fields(AuthType::OAuth2)[4].input_kind, InputKind::Url);
}

#[test]
fn test_auth_fields_serialize() {
    let json = serde_json::to_value(auth_fields(AuthType::Basic)).unwrap();
    assert_eq!(
        json,
        json!([
            {"key": "username", "label": "Username", "input_kind": "text"},
            {"key": "password", "label": "Password", "input_kind": "password"}
        ])
    );
}

#[test]
fn test_debug_hides_credentials() {
    let auth =
        AuthStrategy::from_config("oauth2", &data(&[("access_token", "super-secret")])).unwrap();
    let debug = format!("{auth:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("OAuth2"));
}
