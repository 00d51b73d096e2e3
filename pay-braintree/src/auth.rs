//! Authorization headers for gateway calls.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use pay_types::{Credentials, PaymentError};
use secrecy::ExposeSecret;

pub const HDR_AUTHORIZATION: &str = "Authorization";
pub const HDR_API_VERSION: &str = "X-ApiVersion";
pub const HDR_CONTENT_TYPE: &str = "Content-Type";
pub const HDR_ACCEPT: &str = "Accept";

/// Gateway API version sent with every call.
pub const API_VERSION: &str = "4";

const CONTENT_TYPE_JSON: &str = "application/json";

/// Builds the `Authorization` header value for the given credentials.
///
/// A key pair maps to Basic auth over `public:private`, an access token to
/// Bearer auth. Blank credentials cannot authorize anything.
pub fn authorization_value(system: &str, credentials: &Credentials) -> Result<String, PaymentError> {
    match credentials {
        Credentials::KeyPair {
            public_key,
            private_key,
        } => {
            let pair = format!("{}:{}", public_key, private_key.expose_secret());
            Ok(format!("Basic {}", STANDARD.encode(pair.as_bytes())))
        }
        Credentials::Bearer { access_token } => {
            Ok(format!("Bearer {}", access_token.expose_secret()))
        }
        Credentials::Blank => Err(PaymentError::UnsupportedCredentials {
            system: system.to_string(),
            kind: credentials.kind(),
        }),
    }
}

/// Full header set for a gateway call.
pub fn gateway_headers(
    system: &str,
    credentials: &Credentials,
    with_body: bool,
) -> Result<Vec<(&'static str, String)>, PaymentError> {
    let mut headers = vec![
        (HDR_AUTHORIZATION, authorization_value(system, credentials)?),
        (HDR_API_VERSION, API_VERSION.to_string()),
        (HDR_ACCEPT, CONTENT_TYPE_JSON.to_string()),
    ];
    if with_body {
        headers.push((HDR_CONTENT_TYPE, CONTENT_TYPE_JSON.to_string()));
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth() {
        let creds = Credentials::key_pair("public", "private");
        let value = authorization_value("braintree", &creds).unwrap();
        // base64("public:private")
        assert_eq!(value, "Basic cHVibGljOnByaXZhdGU=");
    }

    #[test]
    fn test_bearer_auth() {
        let creds = Credentials::bearer("access_token$sandbox$abc");
        let value = authorization_value("braintree", &creds).unwrap();
        assert_eq!(value, "Bearer access_token$sandbox$abc");
    }

    #[test]
    fn test_blank_credentials_rejected() {
        let result = authorization_value("braintree", &Credentials::Blank);
        assert!(matches!(
            result,
            Err(PaymentError::UnsupportedCredentials { kind: "blank", .. })
        ));
    }

    #[test]
    fn test_headers_carry_api_version() {
        let creds = Credentials::bearer("t");
        let headers = gateway_headers("braintree", &creds, false).unwrap();
        assert!(headers.contains(&(HDR_API_VERSION, "4".to_string())));
        assert!(!headers.iter().any(|(k, _)| *k == HDR_CONTENT_TYPE));

        let headers = gateway_headers("braintree", &creds, true).unwrap();
        assert!(headers.contains(&(HDR_CONTENT_TYPE, "application/json".to_string())));
    }
}
