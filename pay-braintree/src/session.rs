//! Connection parameters and sessions.

use pay_types::{Credentials, PaySession, PaymentError, User};
use uuid::Uuid;

/// Production gateway endpoint.
pub const PRODUCTION_API_URI: &str = "https://api.braintreegateway.com";
/// Sandbox gateway endpoint.
pub const SANDBOX_API_URI: &str = "https://api.sandbox.braintreegateway.com";

/// Everything needed to open a session: where, as which merchant, and how.
#[derive(Debug, Clone)]
pub struct ConnectionParameters {
    api_uri: String,
    merchant_id: String,
    user: User,
}

impl ConnectionParameters {
    /// Creates connection parameters.
    ///
    /// # Validation
    /// - API URI and merchant id cannot be blank
    pub fn new(
        api_uri: impl Into<String>,
        merchant_id: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self, PaymentError> {
        let api_uri = api_uri.into().trim().trim_end_matches('/').to_string();
        let merchant_id = merchant_id.into().trim().to_string();
        if api_uri.is_empty() {
            return Err(PaymentError::Configuration(
                "API URI cannot be empty".into(),
            ));
        }
        if merchant_id.is_empty() {
            return Err(PaymentError::Configuration(
                "Merchant id cannot be empty".into(),
            ));
        }
        let user = User::new(merchant_id.clone(), credentials);
        Ok(Self {
            api_uri,
            merchant_id,
            user,
        })
    }

    pub fn api_uri(&self) -> &str {
        &self.api_uri
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}

/// A session against the gateway.
///
/// Not shared between concurrent call sequences; each caller owns its own.
#[derive(Debug)]
pub struct BraintreeSession {
    id: Uuid,
    system: String,
    params: ConnectionParameters,
    valid: bool,
}

impl BraintreeSession {
    pub(crate) fn new(system: impl Into<String>, params: ConnectionParameters) -> Self {
        Self {
            id: Uuid::new_v4(),
            system: system.into(),
            params,
            valid: true,
        }
    }

    /// Name of the pay system that opened this session.
    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn merchant_id(&self) -> &str {
        self.params.merchant_id()
    }

    pub fn api_uri(&self) -> &str {
        self.params.api_uri()
    }

    /// Invalidates the session. Further operations fail with `SessionInvalid`.
    pub fn end(&mut self) {
        if self.valid {
            tracing::debug!(session_id = %self.id, "session ended");
        }
        self.valid = false;
    }

    /// Fails with `SessionInvalid` unless the session is still usable.
    pub(crate) fn ensure_valid(&self, operation: &'static str) -> Result<(), PaymentError> {
        if self.valid {
            Ok(())
        } else {
            Err(PaymentError::SessionInvalid {
                system: self.system.clone(),
                operation,
            })
        }
    }
}

impl PaySession for BraintreeSession {
    fn id(&self) -> Uuid {
        self.id
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn user(&self) -> &User {
        self.params.user()
    }
}

impl std::fmt::Display for BraintreeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}@{}]", self.system, self.id, self.params.merchant_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConnectionParameters {
        ConnectionParameters::new(
            "https://gateway.test/",
            "merchant-1",
            Credentials::key_pair("pub", "priv"),
        )
        .unwrap()
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        assert_eq!(params().api_uri(), "https://gateway.test");
    }

    #[test]
    fn test_blank_merchant_fails() {
        let result = ConnectionParameters::new("https://gateway.test", " ", Credentials::Blank);
        assert!(matches!(result, Err(PaymentError::Configuration(_))));
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = BraintreeSession::new("braintree", params());
        assert!(session.is_valid());
        assert!(session.ensure_valid("charge").is_ok());
        assert_eq!(session.user().name, "merchant-1");

        session.end();

        assert!(!session.is_valid());
        assert!(matches!(
            session.ensure_valid("charge"),
            Err(PaymentError::SessionInvalid {
                operation: "charge",
                ..
            })
        ));
    }
}
