//! Configuration loading from environment.

use std::env;

use pay_braintree::{ConnectionParameters, SANDBOX_API_URI};
use pay_types::Credentials;

/// Gateway connection settings.
#[derive(Debug)]
pub struct Config {
    pub api_uri: String,
    pub merchant_id: String,
    pub credentials: Credentials,
}

impl Config {
    /// Loads configuration from environment variables. Command-line values,
    /// when given, take the place of `BRAINTREE_API_URI` and `BRAINTREE_MERCHANT_ID`.
    pub fn from_env(api_uri: Option<String>, merchant_id: Option<String>) -> anyhow::Result<Self> {
        Self::from_sources(api_uri, merchant_id, |key| env::var(key).ok())
    }

    fn from_sources(
        api_uri: Option<String>,
        merchant_id: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        Self::from_lookup(|key| match key {
            "BRAINTREE_API_URI" if api_uri.is_some() => api_uri.clone(),
            "BRAINTREE_MERCHANT_ID" if merchant_id.is_some() => merchant_id.clone(),
            _ => lookup(key),
        })
    }

    /// Loads configuration through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_uri = var("BRAINTREE_API_URI").unwrap_or_else(|| SANDBOX_API_URI.to_string());
        let merchant_id = var("BRAINTREE_MERCHANT_ID").ok_or_else(|| {
            anyhow::anyhow!("BRAINTREE_MERCHANT_ID (or --merchant-id) is required")
        })?;

        let credentials = match (
            var("BRAINTREE_PUBLIC_KEY"),
            var("BRAINTREE_PRIVATE_KEY"),
            var("BRAINTREE_ACCESS_TOKEN"),
        ) {
            (Some(public_key), Some(private_key), _) => {
                Credentials::key_pair(public_key, private_key)
            }
            (_, _, Some(token)) => Credentials::bearer(token),
            _ => anyhow::bail!(
                "set BRAINTREE_PUBLIC_KEY and BRAINTREE_PRIVATE_KEY, or BRAINTREE_ACCESS_TOKEN"
            ),
        };

        Ok(Self {
            api_uri,
            merchant_id,
            credentials,
        })
    }

    pub fn connection_parameters(&self) -> anyhow::Result<ConnectionParameters> {
        Ok(ConnectionParameters::new(
            self.api_uri.clone(),
            self.merchant_id.clone(),
            self.credentials.clone(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_key_pair_with_default_uri() {
        let config = Config::from_lookup(lookup(&[
            ("BRAINTREE_MERCHANT_ID", "m-1"),
            ("BRAINTREE_PUBLIC_KEY", "pub"),
            ("BRAINTREE_PRIVATE_KEY", "priv"),
        ]))
        .unwrap();

        assert_eq!(config.api_uri, SANDBOX_API_URI);
        assert_eq!(config.merchant_id, "m-1");
        assert_eq!(config.credentials.kind(), "key_pair");
    }

    #[test]
    fn test_access_token() {
        let config = Config::from_lookup(lookup(&[
            ("BRAINTREE_API_URI", "https://gateway.test"),
            ("BRAINTREE_MERCHANT_ID", "m-1"),
            ("BRAINTREE_ACCESS_TOKEN", "access_token$abc"),
        ]))
        .unwrap();

        assert_eq!(config.api_uri, "https://gateway.test");
        assert_eq!(config.credentials.kind(), "bearer");
    }

    #[test]
    fn test_half_key_pair_falls_back_to_token() {
        let config = Config::from_lookup(lookup(&[
            ("BRAINTREE_MERCHANT_ID", "m-1"),
            ("BRAINTREE_PUBLIC_KEY", "pub"),
            ("BRAINTREE_ACCESS_TOKEN", "tok"),
        ]))
        .unwrap();

        assert_eq!(config.credentials.kind(), "bearer");
    }

    #[test]
    fn test_missing_values_fail() {
        assert!(Config::from_lookup(lookup(&[("BRAINTREE_ACCESS_TOKEN", "tok")])).is_err());
        assert!(Config::from_lookup(lookup(&[("BRAINTREE_MERCHANT_ID", "m-1")])).is_err());
        assert!(
            Config::from_lookup(lookup(&[
                ("BRAINTREE_MERCHANT_ID", " "),
                ("BRAINTREE_ACCESS_TOKEN", "tok"),
            ]))
            .is_err()
        );
    }

    #[test]
    fn test_command_line_values_win() {
        let env = lookup(&[
            ("BRAINTREE_API_URI", "https://gateway.test"),
            ("BRAINTREE_ACCESS_TOKEN", "tok"),
        ]);

        let config =
            Config::from_sources(Some("https://other.test/".into()), Some("m-cli".into()), &env)
                .unwrap();
        let params = config.connection_parameters().unwrap();
        assert_eq!(params.api_uri(), "https://other.test");
        assert_eq!(params.merchant_id(), "m-cli");

        let config = Config::from_sources(None, Some("m-cli".into()), &env).unwrap();
        assert_eq!(config.api_uri, "https://gateway.test");

        assert!(Config::from_sources(None, None, &env).is_err());
    }

    #[test]
    fn test_connection_parameters() {
        let config = Config::from_lookup(lookup(&[
            ("BRAINTREE_API_URI", "https://gateway.test/"),
            ("BRAINTREE_MERCHANT_ID", "m-1"),
            ("BRAINTREE_ACCESS_TOKEN", "tok"),
        ]))
        .unwrap();

        let params = config.connection_parameters().unwrap();
        assert_eq!(params.api_uri(), "https://gateway.test");
        assert_eq!(params.merchant_id(), "m-1");
    }
}
