//! Credentials a session presents to the gateway.

use secrecy::SecretString;

/// How a user authenticates to the gateway.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Static public/private API key pair.
    KeyPair {
        public_key: String,
        private_key: SecretString,
    },
    /// OAuth-style access token.
    Bearer { access_token: SecretString },
    /// No credentials at all (anonymous user).
    Blank,
}

impl Credentials {
    pub fn key_pair(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Credentials::KeyPair {
            public_key: public_key.into(),
            private_key: SecretString::new(private_key.into()),
        }
    }

    pub fn bearer(access_token: impl Into<String>) -> Self {
        Credentials::Bearer {
            access_token: SecretString::new(access_token.into()),
        }
    }

    /// Short variant name, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::KeyPair { .. } => "key_pair",
            Credentials::Bearer { .. } => "bearer",
            Credentials::Blank => "blank",
        }
    }
}

/// Identity on whose behalf gateway calls are made.
#[derive(Debug, Clone)]
pub struct User {
    pub name: String,
    pub credentials: Credentials,
}

impl User {
    pub fn new(name: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            name: name.into(),
            credentials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::key_pair("public", "very-private");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("public"));
        assert!(!printed.contains("very-private"));

        let creds = Credentials::bearer("access-token-value");
        assert!(!format!("{:?}", creds).contains("access-token-value"));
    }

    #[test]
    fn test_kind() {
        assert_eq!(Credentials::bearer("t").kind(), "bearer");
        assert_eq!(Credentials::Blank.kind(), "blank");
    }
}
