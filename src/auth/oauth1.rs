//! OAuth 1.0a signing primitives
//!
//! Shared by the standard OAuth 1 strategy and the TradeMe variant.

use super::types::SignatureMethod;
use crate::error::{Error, Result};
use crate::types::{flatten_object, JsonValue};
use base64::Engine as _;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;

/// RFC 3986 unreserved characters stay literal, everything else is escaped
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string per RFC 3986
pub(crate) fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, RFC3986).to_string()
}

/// Body members that take part in the signature
pub(crate) fn body_params(body: &JsonValue) -> Vec<(String, String)> {
    flatten_object(body)
}

/// Build `METHOD&enc(url)&enc(sorted query)`
pub(crate) fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let query = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(url),
        encode(&query)
    )
}

/// Produce `oauth_signature` for the given method
pub(crate) fn sign(method: SignatureMethod, base_string: &str, signing_key: &str) -> Result<String> {
    match method {
        SignatureMethod::Plaintext => Ok(signing_key.to_string()),
        SignatureMethod::HmacSha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(signing_key.as_bytes())
                .map_err(|e| Error::auth(format!("Invalid HMAC key: {e}")))?;
            mac.update(base_string.as_bytes());
            let digest = mac.finalize().into_bytes();
            Ok(base64::engine::general_purpose::STANDARD.encode(digest))
        }
        SignatureMethod::RsaSha1 => Err(Error::auth(
            "RSA-SHA1 signing is not supported; use HMAC-SHA1 or PLAINTEXT",
        )),
    }
}

/// Serialize parameters as `OAuth k="v", ...`, keeping their order
pub(crate) fn authorization_header(params: &[(String, String)]) -> String {
    let parts = params
        .iter()
        .map(|(k, v)| format!("{k}=\"{}\"", encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {parts}")
}

#[cfg(test)]
mod oauth1_tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_encode_rfc3986() {
        assert_eq!(encode("abc-._~"), "abc-._~");
        assert_eq!(encode("a b"), "a%20b");
        assert_eq!(encode("a+b&c=d"), "a%2Bb%26c%3Dd");
        assert_eq!(encode("https://x.io/p"), "https%3A%2F%2Fx.io%2Fp");
        assert_eq!(encode("é"), "%C3%A9");
    }

    #[test]
    fn test_base_string_sorts_params() {
        let params = pairs(&[("b", "2"), ("a", "1 1"), ("c", "x")]);
        let base = signature_base_string("get", "https://api.example.com/v1", &params);
        assert_eq!(
            base,
            "GET&https%3A%2F%2Fapi.example.com%2Fv1&a%3D1%25201%26b%3D2%26c%3Dx"
        );
    }

    #[test]
    fn test_body_params_in_base_string() {
        let mut params = pairs(&[("oauth_nonce", "n")]);
        params.extend(body_params(&json!({"q": "a b"})));
        let base = signature_base_string("POST", "https://x.io", &params);
        assert!(base.ends_with("&oauth_nonce%3Dn%26q%3Da%2520b"));
    }

    #[test]
    fn test_plaintext_signature_is_key() {
        let sig = sign(SignatureMethod::Plaintext, "ignored", "A&B").unwrap();
        assert_eq!(sig, "A&B");
    }

    #[test]
    fn test_hmac_sha1_known_vector() {
        // RFC 2202 test case 2
        let sig = sign(
            SignatureMethod::HmacSha1,
            "what do ya want for nothing?",
            "Jefe",
        )
        .unwrap();
        assert_eq!(sig, "7/zfauXrL6LSdBbV8YTfnCWafHk=");
    }

    #[test]
    fn test_rsa_sha1_rejected() {
        let err = sign(SignatureMethod::RsaSha1, "base", "key").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_authorization_header_format() {
        let header = authorization_header(&pairs(&[
            ("oauth_consumer_key", "key"),
            ("oauth_signature", "A&B"),
        ]));
        assert_eq!(
            header,
            r#"OAuth oauth_consumer_key="key", oauth_signature="A%26B""#
        );
    }
}
